// Application Layer - Use Cases

mod cancel;
pub mod config;
pub mod constants;
pub mod get;
pub mod put;
pub mod service;

// Re-exports
pub use cancel::{cancel_channel, CancelHandle, CancelOnDrop, CancelToken};
pub use config::BrokerConfig;
pub use get::MessageGetter;
pub use put::{MessagePutter, PutOutcome};
pub use service::{BrokerService, BrokerStats, QueueStats};
