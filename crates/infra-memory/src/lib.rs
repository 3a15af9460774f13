// Relay Infrastructure - In-Memory Adapters
// Implements: QueueStorage, BrokerStorage

mod broker_storage;
mod queue_storage;

pub use broker_storage::{InMemoryBrokerStorage, QueueFactory};
pub use queue_storage::InMemoryQueueStorage;

use relay_core::application::{BrokerConfig, BrokerService};
use relay_core::error::AppError;
use std::sync::{Arc, PoisonError};

/// Wire a [`BrokerService`] over fresh in-memory storage
pub fn in_memory_service(config: &BrokerConfig) -> BrokerService {
    let queue_storage = Arc::new(InMemoryQueueStorage::new(config.max_queues));
    let broker_storage = Arc::new(InMemoryBrokerStorage::with_queue_storage(
        config.max_queues,
        config.max_messages,
        queue_storage,
    ));
    BrokerService::new(config, broker_storage)
}

// A poisoned lock means a panic mid-mutation; surface it as a storage failure
fn map_poison<T>(err: PoisonError<T>) -> AppError {
    AppError::Storage(format!("storage lock poisoned: {}", err))
}
