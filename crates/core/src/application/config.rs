// Broker Configuration

use super::constants::{DEFAULT_MAX_MESSAGES, DEFAULT_MAX_QUEUES, DEFAULT_WAIT_TIMEOUT};
use crate::error::{AppError, Result};
use std::time::Duration;

/// Capacity bounds and wait policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    /// Maximum number of queues (0 = unbounded)
    pub max_queues: usize,

    /// Maximum stored messages per queue (0 = unbounded)
    pub max_messages: usize,

    /// Wait applied to a get that does not specify its own timeout
    pub default_wait_timeout: Duration,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            max_queues: DEFAULT_MAX_QUEUES,
            max_messages: DEFAULT_MAX_MESSAGES,
            default_wait_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }
}

impl BrokerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.default_wait_timeout.is_zero() {
            return Err(AppError::Config(
                "default wait timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
