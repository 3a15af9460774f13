// Queue Domain Model

use crate::domain::{DomainError, Message};
use crate::error::{AppError, Result};
use crate::port::QueueStorage;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Queue identifier
pub type QueueName = String;

/// Named FIFO queue with an optional length bound (0 = unbounded)
pub struct Queue {
    name: QueueName,
    max_messages: usize,
    storage: Arc<dyn QueueStorage>,
    // Serializes length check + append so concurrent puts cannot overshoot.
    // MessagePutter already holds `handoff` here; this covers direct Queue callers.
    put_lock: Mutex<()>,
    // Orders "check storage, then register" against "check waiters, then store"
    handoff: Mutex<()>,
}

impl Queue {
    pub fn new(name: impl Into<String>, max_messages: usize, storage: Arc<dyn QueueStorage>) -> Self {
        Self {
            name: name.into(),
            max_messages,
            storage,
            put_lock: Mutex::new(()),
            handoff: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    /// Exclusive turn at deciding between storage and a direct handoff.
    ///
    /// A get holds it while checking storage and registering as a waiter, a
    /// put while checking for waiters and storing. Without it a put could
    /// store a message just after a get found the queue empty and just
    /// before that get registered.
    pub async fn handoff_turn(&self) -> MutexGuard<'_, ()> {
        self.handoff.lock().await
    }

    /// Pop the oldest stored message
    pub async fn get_message(&self) -> Result<Message> {
        self.storage
            .get_first_message(&self.name)
            .await?
            .ok_or(AppError::Domain(DomainError::MessageNotFound))
    }

    /// Append a message, failing with `QueueFull` at the bound
    pub async fn put_message(&self, message: Message) -> Result<()> {
        let _guard = self.put_lock.lock().await;

        if self.is_full().await? {
            return Err(DomainError::QueueFull(self.name.clone()).into());
        }

        self.storage.put_message_to_end(&self.name, message).await
    }

    /// Number of stored messages
    pub async fn message_count(&self) -> Result<usize> {
        self.storage.count_messages(&self.name).await
    }

    async fn is_full(&self) -> Result<bool> {
        if self.max_messages == 0 {
            return Ok(false);
        }

        let count = self.storage.count_messages(&self.name).await?;
        Ok(count >= self.max_messages)
    }
}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("name", &self.name)
            .field("max_messages", &self.max_messages)
            .finish_non_exhaustive()
    }
}
