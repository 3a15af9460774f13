// Domain Layer - Pure business logic and entities

pub mod broker;
pub mod error;
pub mod message;
pub mod queue;
pub mod waiter;

// Re-exports
pub use broker::Broker;
pub use error::DomainError;
pub use message::Message;
pub use queue::{Queue, QueueName};
pub use waiter::{Delivery, Registration, WaiterRegistry};
