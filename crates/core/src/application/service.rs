// Broker Service - entry point handed to transports

use super::{BrokerConfig, CancelToken, MessageGetter, MessagePutter, PutOutcome};
use crate::domain::{Broker, Message, WaiterRegistry};
use crate::error::Result;
use crate::port::BrokerStorage;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Per-queue snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub name: String,
    pub stored_messages: usize,
    pub waiting_consumers: usize,
    pub max_messages: usize,
}

/// Broker-wide snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokerStats {
    pub queue_count: usize,
    pub max_queues: usize,
    pub queues: Vec<QueueStats>,
}

/// Put/get facade sharing one broker and one waiter registry
pub struct BrokerService {
    broker: Arc<Broker>,
    waiters: Arc<WaiterRegistry>,
    putter: MessagePutter,
    getter: MessageGetter,
}

impl BrokerService {
    /// `broker_storage` must create queues bounded by `config.max_messages`
    pub fn new(config: &BrokerConfig, broker_storage: Arc<dyn BrokerStorage>) -> Self {
        let broker = Arc::new(Broker::new(config.max_queues, broker_storage));
        let waiters = Arc::new(WaiterRegistry::new());

        Self {
            putter: MessagePutter::new(broker.clone(), waiters.clone()),
            getter: MessageGetter::new(
                broker.clone(),
                waiters.clone(),
                config.default_wait_timeout,
            ),
            broker,
            waiters,
        }
    }

    pub async fn put(&self, queue_name: &str, message: Message) -> Result<PutOutcome> {
        self.putter.put(queue_name, message).await
    }

    pub async fn get(
        &self,
        queue_name: &str,
        wait_timeout: Option<Duration>,
        cancel: &CancelToken,
    ) -> Result<Message> {
        self.getter.get(queue_name, wait_timeout, cancel).await
    }

    pub async fn stats(&self) -> Result<BrokerStats> {
        let mut names = self.broker.queue_names().await?;
        names.sort();

        let mut queues = Vec::with_capacity(names.len());
        for name in names {
            let queue = self.broker.get_queue(&name).await?;
            queues.push(QueueStats {
                stored_messages: queue.message_count().await?,
                waiting_consumers: self.waiters.waiting(&name),
                max_messages: queue.max_messages(),
                name,
            });
        }

        Ok(BrokerStats {
            queue_count: queues.len(),
            max_queues: self.broker.max_queues(),
            queues,
        })
    }
}
