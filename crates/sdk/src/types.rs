//! SDK Response Types
//!
//! Mirrors the JSON-RPC results from the api-rpc crate.

use serde::Deserialize;

/// Result of `queue.put.v1`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PutResponse {
    pub queue: String,
    /// True when a blocked consumer received the message directly
    pub delivered: bool,
}

/// Result of `queue.get.v1`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GetResponse {
    pub queue: String,
    pub message: String,
}

/// Result of `admin.stats.v1`
#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    pub queue_count: usize,
    pub max_queues: usize,
    pub uptime_seconds: u64,
    pub queues: Vec<QueueStats>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueStats {
    pub name: String,
    pub stored_messages: usize,
    pub waiting_consumers: usize,
    pub max_messages: usize,
}
