// Broker Domain Model

use crate::domain::{DomainError, Queue};
use crate::error::Result;
use crate::port::BrokerStorage;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Registry of queues with an optional queue-count bound (0 = unbounded)
pub struct Broker {
    max_queues: usize,
    storage: Arc<dyn BrokerStorage>,
    // Serializes lookup + count + register across distinct new names
    create_lock: Mutex<()>,
}

impl Broker {
    pub fn new(max_queues: usize, storage: Arc<dyn BrokerStorage>) -> Self {
        Self {
            max_queues,
            storage,
            create_lock: Mutex::new(()),
        }
    }

    pub fn max_queues(&self) -> usize {
        self.max_queues
    }

    /// Look up an existing queue
    pub async fn get_queue(&self, name: &str) -> Result<Arc<Queue>> {
        self.storage
            .get_queue(name)
            .await?
            .ok_or_else(|| DomainError::QueueNotFound(name.to_string()).into())
    }

    /// Create a queue, or return the existing one.
    ///
    /// An already-registered name is returned even when the broker is at its
    /// bound; only genuinely new names are refused with `BrokerFull`.
    pub async fn create_queue(&self, name: &str) -> Result<Arc<Queue>> {
        let _guard = self.create_lock.lock().await;

        if let Some(queue) = self.storage.get_queue(name).await? {
            return Ok(queue);
        }

        if self.is_full().await? {
            warn!(queue = %name, max_queues = self.max_queues, "Broker full, queue not created");
            return Err(DomainError::BrokerFull.into());
        }

        let queue = self.storage.create_queue(name).await?;
        info!(queue = %name, max_messages = queue.max_messages(), "Queue created");
        Ok(queue)
    }

    pub async fn count_queues(&self) -> Result<usize> {
        self.storage.count_queues().await
    }

    pub async fn queue_names(&self) -> Result<Vec<String>> {
        self.storage.queue_names().await
    }

    async fn is_full(&self) -> Result<bool> {
        if self.max_queues == 0 {
            return Ok(false);
        }

        let count = self.storage.count_queues().await?;
        Ok(count >= self.max_queues)
    }
}
