// Broker Storage Port (Interface)

use crate::domain::Queue;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Registry of queues by name
///
/// The queue-count bound lives in [`crate::domain::Broker`], not here.
#[async_trait]
pub trait BrokerStorage: Send + Sync {
    /// Register a queue under `name`, or return the one already registered
    async fn create_queue(&self, name: &str) -> Result<Arc<Queue>>;

    /// Find queue by name
    async fn get_queue(&self, name: &str) -> Result<Option<Arc<Queue>>>;

    /// Number of registered queues
    async fn count_queues(&self) -> Result<usize>;

    /// Names of all registered queues
    async fn queue_names(&self) -> Result<Vec<String>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

#[cfg(any(test, feature = "test-util"))]
pub mod mocks {
    use super::*;
    use crate::error::AppError;
    #[cfg(test)]
    use {crate::port::QueueStorage, std::collections::HashMap, std::sync::Mutex};

    /// HashMap registry creating queues over a shared storage
    ///
    /// Unit tests in this crate only; everything downstream uses
    /// `relay_infra_memory::InMemoryBrokerStorage`.
    #[cfg(test)]
    pub struct MapBrokerStorage {
        queues: Mutex<HashMap<String, Arc<Queue>>>,
        storage: Arc<dyn QueueStorage>,
        max_messages: usize,
    }

    #[cfg(test)]
    impl MapBrokerStorage {
        pub fn new(storage: Arc<dyn QueueStorage>, max_messages: usize) -> Self {
            Self {
                queues: Mutex::new(HashMap::new()),
                storage,
                max_messages,
            }
        }
    }

    #[cfg(test)]
    #[async_trait]
    impl BrokerStorage for MapBrokerStorage {
        async fn create_queue(&self, name: &str) -> Result<Arc<Queue>> {
            let mut queues = self.queues.lock().unwrap();
            let queue = queues.entry(name.to_string()).or_insert_with(|| {
                Arc::new(Queue::new(name, self.max_messages, self.storage.clone()))
            });
            Ok(queue.clone())
        }

        async fn get_queue(&self, name: &str) -> Result<Option<Arc<Queue>>> {
            Ok(self.queues.lock().unwrap().get(name).cloned())
        }

        async fn count_queues(&self) -> Result<usize> {
            Ok(self.queues.lock().unwrap().len())
        }

        async fn queue_names(&self) -> Result<Vec<String>> {
            Ok(self.queues.lock().unwrap().keys().cloned().collect())
        }
    }

    /// Registry whose every call fails
    pub struct FailingBrokerStorage;

    #[async_trait]
    impl BrokerStorage for FailingBrokerStorage {
        async fn create_queue(&self, _name: &str) -> Result<Arc<Queue>> {
            Err(AppError::Storage("registry unavailable".to_string()))
        }

        async fn get_queue(&self, _name: &str) -> Result<Option<Arc<Queue>>> {
            Err(AppError::Storage("registry unavailable".to_string()))
        }

        async fn count_queues(&self) -> Result<usize> {
            Err(AppError::Storage("registry unavailable".to_string()))
        }

        async fn queue_names(&self) -> Result<Vec<String>> {
            Err(AppError::Storage("registry unavailable".to_string()))
        }
    }
}
