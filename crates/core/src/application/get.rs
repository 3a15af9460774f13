// Get Use Case

use super::CancelToken;
use crate::domain::{Broker, DomainError, Message, WaiterRegistry};
use crate::error::{Result, ResultExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const OP: &str = "MessageGetter.get";

/// Get orchestration: resolve, try storage, else wait for a handoff
pub struct MessageGetter {
    broker: Arc<Broker>,
    waiters: Arc<WaiterRegistry>,
    default_wait_timeout: Duration,
}

impl MessageGetter {
    pub fn new(
        broker: Arc<Broker>,
        waiters: Arc<WaiterRegistry>,
        default_wait_timeout: Duration,
    ) -> Self {
        Self {
            broker,
            waiters,
            default_wait_timeout,
        }
    }

    /// Take the next message from `queue_name`.
    ///
    /// Storage is checked and the waiter registered under the queue's
    /// handoff turn, so a concurrent put either sees this waiter or stores
    /// before the check. With storage empty the call blocks for
    /// `wait_timeout` (or the configured default) unless `cancel` fires
    /// first. Never creates the queue.
    pub async fn get(
        &self,
        queue_name: &str,
        wait_timeout: Option<Duration>,
        cancel: &CancelToken,
    ) -> Result<Message> {
        let queue = self.broker.get_queue(queue_name).await.op(OP)?;

        let registration = {
            let _turn = queue.handoff_turn().await;
            match queue.get_message().await {
                Ok(message) => return Ok(message),
                Err(e) if e.is(&DomainError::MessageNotFound) => {}
                Err(e) => return Err(e.context(OP)),
            }
            self.waiters.register(queue.name())
        };

        let timeout = wait_timeout.unwrap_or(self.default_wait_timeout);
        debug!(queue = %queue_name, ?timeout, "Queue empty, waiting for producer");

        registration.wait(timeout, cancel).await.op(OP)
    }
}
