//! SDK Error Types

use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// Server error codes (see relay-api-rpc `error::code`)
mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
}

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Connection error: {0}")]
    Connection(String),

    /// Rejected input (bad queue name, empty message)
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Unknown queue, or the get waited without receiving a message
    #[error("Not found: {0}")]
    NotFound(String),

    /// Queue or broker at capacity
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("RPC error ({code}): {message}")]
    Rpc { code: i32, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<jsonrpsee::core::ClientError> for SdkError {
    fn from(e: jsonrpsee::core::ClientError) -> Self {
        match e {
            jsonrpsee::core::ClientError::Call(call_err) => {
                let message = call_err.message().to_string();
                match call_err.code() {
                    code::VALIDATION_ERROR => SdkError::Validation(message),
                    code::NOT_FOUND => SdkError::NotFound(message),
                    code::CONFLICT => SdkError::Conflict(message),
                    code => SdkError::Rpc { code, message },
                }
            }
            jsonrpsee::core::ClientError::Transport(e) => {
                SdkError::Transport(format!("Transport error: {}", e))
            }
            jsonrpsee::core::ClientError::RestartNeeded(_) => {
                SdkError::Connection("Connection restart needed".to_string())
            }
            jsonrpsee::core::ClientError::ParseError(e) => SdkError::Serialization(e),
            _ => SdkError::Other(e.to_string()),
        }
    }
}
