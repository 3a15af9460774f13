// In-memory BrokerStorage Implementation

use crate::map_poison;
use async_trait::async_trait;
use relay_core::domain::Queue;
use relay_core::error::Result;
use relay_core::port::{BrokerStorage, QueueStorage};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Builds the `Queue` registered under a new name
pub type QueueFactory = Box<dyn Fn(&str) -> Queue + Send + Sync>;

pub struct InMemoryBrokerStorage {
    queues: Mutex<HashMap<String, Arc<Queue>>>,
    queue_factory: QueueFactory,
}

impl InMemoryBrokerStorage {
    /// `queues_hint` pre-sizes the registry (0 is fine)
    pub fn new(queues_hint: usize, queue_factory: QueueFactory) -> Self {
        Self {
            queues: Mutex::new(HashMap::with_capacity(queues_hint)),
            queue_factory,
        }
    }

    /// Every queue gets `max_messages` as its bound and shares `storage`
    pub fn with_queue_storage(
        queues_hint: usize,
        max_messages: usize,
        storage: Arc<dyn QueueStorage>,
    ) -> Self {
        Self::new(
            queues_hint,
            Box::new(move |name: &str| Queue::new(name, max_messages, storage.clone())),
        )
    }
}

#[async_trait]
impl BrokerStorage for InMemoryBrokerStorage {
    async fn create_queue(&self, name: &str) -> Result<Arc<Queue>> {
        let mut queues = self.queues.lock().map_err(map_poison)?;

        if let Some(queue) = queues.get(name) {
            return Ok(queue.clone());
        }

        let queue = Arc::new((self.queue_factory)(name));
        queues.insert(name.to_string(), queue.clone());
        debug!(queue = %name, total = queues.len(), "Queue registered");
        Ok(queue)
    }

    async fn get_queue(&self, name: &str) -> Result<Option<Arc<Queue>>> {
        let queues = self.queues.lock().map_err(map_poison)?;
        Ok(queues.get(name).cloned())
    }

    async fn count_queues(&self) -> Result<usize> {
        let queues = self.queues.lock().map_err(map_poison)?;
        Ok(queues.len())
    }

    async fn queue_names(&self) -> Result<Vec<String>> {
        let queues = self.queues.lock().map_err(map_poison)?;
        Ok(queues.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryQueueStorage;

    fn storage(max_messages: usize) -> InMemoryBrokerStorage {
        InMemoryBrokerStorage::with_queue_storage(
            0,
            max_messages,
            Arc::new(InMemoryQueueStorage::default()),
        )
    }

    #[tokio::test]
    async fn test_create_returns_existing_instance() {
        let storage = storage(3);

        let a = storage.create_queue("a").await.unwrap();
        let again = storage.create_queue("a").await.unwrap();

        assert!(Arc::ptr_eq(&a, &again));
        assert_eq!(a.max_messages(), 3);
        assert_eq!(storage.count_queues().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_and_names() {
        let storage = storage(0);
        assert!(storage.get_queue("a").await.unwrap().is_none());

        storage.create_queue("a").await.unwrap();
        storage.create_queue("b").await.unwrap();

        assert_eq!(storage.get_queue("a").await.unwrap().unwrap().name(), "a");
        let mut names = storage.queue_names().await.unwrap();
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_queues_share_storage_but_not_contents() {
        let storage = storage(0);
        let a = storage.create_queue("a").await.unwrap();
        let b = storage.create_queue("b").await.unwrap();

        a.put_message("x".into()).await.unwrap();

        assert_eq!(a.message_count().await.unwrap(), 1);
        assert_eq!(b.message_count().await.unwrap(), 0);
    }
}
