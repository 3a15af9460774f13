// Port Layer - Interfaces for storage backends

pub mod broker_storage;
pub mod queue_storage;

// Re-exports
pub use broker_storage::BrokerStorage;
pub use queue_storage::QueueStorage;
