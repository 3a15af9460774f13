// Domain Error Types

use thiserror::Error;

/// Outcome kinds of the broker core.
///
/// Every failure surfaced by a put or get carries exactly one of these kinds,
/// no matter how many layers of context were added on the way up
/// (see [`crate::AppError::kind`]).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("broker is full")]
    BrokerFull,

    #[error("queue not found: {0}")]
    QueueNotFound(String),

    #[error("queue is full: {0}")]
    QueueFull(String),

    #[error("message not found")]
    MessageNotFound,

    /// Wait elapsed or the caller cancelled before a message arrived
    #[error("wait timeout")]
    WaitTimeout,

    #[error("invalid message: content must not be empty")]
    InvalidMessage,
}

pub type Result<T> = std::result::Result<T, DomainError>;
