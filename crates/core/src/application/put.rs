// Put Use Case

use crate::domain::{Broker, Delivery, DomainError, Message, Queue, WaiterRegistry};
use crate::error::{AppError, Result, ResultExt};
use std::sync::Arc;
use tracing::debug;

const OP: &str = "MessagePutter.put";

/// How a successful put reached its consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// Handed directly to a blocked get; storage was never touched
    Delivered,
    /// Appended to the queue's storage
    Stored,
}

/// Put orchestration: resolve-or-create, hand off, else store
pub struct MessagePutter {
    broker: Arc<Broker>,
    waiters: Arc<WaiterRegistry>,
}

impl MessagePutter {
    pub fn new(broker: Arc<Broker>, waiters: Arc<WaiterRegistry>) -> Self {
        Self { broker, waiters }
    }

    /// Put `message` onto `queue_name`.
    ///
    /// Waiters are checked before storage. A handoff is not subject to the
    /// queue's length bound.
    pub async fn put(&self, queue_name: &str, message: Message) -> Result<PutOutcome> {
        if !message.is_valid() {
            return Err(AppError::from(DomainError::InvalidMessage).context(OP));
        }

        let queue = self.resolve_queue(queue_name).await.op(OP)?;
        let _turn = queue.handoff_turn().await;

        let message = match self.waiters.notify(queue.name(), message) {
            Delivery::Delivered => {
                debug!(queue = %queue_name, "Message handed off to waiting consumer");
                return Ok(PutOutcome::Delivered);
            }
            Delivery::NoWaiter(message) => message,
        };

        queue.put_message(message).await.op(OP)?;
        debug!(queue = %queue_name, "Message stored");
        Ok(PutOutcome::Stored)
    }

    async fn resolve_queue(&self, queue_name: &str) -> Result<Arc<Queue>> {
        match self.broker.get_queue(queue_name).await {
            Ok(queue) => Ok(queue),
            Err(e) if matches!(e.kind(), Some(DomainError::QueueNotFound(_))) => {
                self.broker.create_queue(queue_name).await
            }
            Err(e) => Err(e),
        }
    }
}
