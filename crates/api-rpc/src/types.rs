//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use relay_core::application::{BrokerStats, QueueStats};
use serde::{Deserialize, Serialize};

/// queue.put.v1 - Put a message onto a queue
#[derive(Debug, Deserialize)]
pub struct PutRequest {
    pub queue: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    pub queue: String,
    /// True when the message went straight to a waiting consumer
    pub delivered: bool,
}

/// queue.get.v1 - Take the next message, waiting up to `timeout_secs`
#[derive(Debug, Deserialize)]
pub struct GetRequest {
    pub queue: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub queue: String,
    pub message: String,
}

/// admin.stats.v1 - Get broker statistics
#[derive(Debug, Default, Deserialize)]
pub struct StatsRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub queue_count: usize,
    pub max_queues: usize,
    pub uptime_seconds: u64,
    pub queues: Vec<QueueStatsEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueStatsEntry {
    pub name: String,
    pub stored_messages: usize,
    pub waiting_consumers: usize,
    pub max_messages: usize,
}

impl From<QueueStats> for QueueStatsEntry {
    fn from(stats: QueueStats) -> Self {
        Self {
            name: stats.name,
            stored_messages: stats.stored_messages,
            waiting_consumers: stats.waiting_consumers,
            max_messages: stats.max_messages,
        }
    }
}

impl StatsResponse {
    pub fn new(stats: BrokerStats, uptime_seconds: u64) -> Self {
        Self {
            queue_count: stats.queue_count,
            max_queues: stats.max_queues,
            uptime_seconds,
            queues: stats.queues.into_iter().map(Into::into).collect(),
        }
    }
}
