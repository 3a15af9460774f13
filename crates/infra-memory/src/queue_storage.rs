// In-memory QueueStorage Implementation

use crate::map_poison;
use async_trait::async_trait;
use relay_core::domain::Message;
use relay_core::error::Result;
use relay_core::port::QueueStorage;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// One FIFO list per queue name behind a single lock
pub struct InMemoryQueueStorage {
    lists: Mutex<HashMap<String, VecDeque<Message>>>,
}

impl InMemoryQueueStorage {
    /// `queues_hint` pre-sizes the name map (0 is fine)
    pub fn new(queues_hint: usize) -> Self {
        Self {
            lists: Mutex::new(HashMap::with_capacity(queues_hint)),
        }
    }
}

impl Default for InMemoryQueueStorage {
    fn default() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl QueueStorage for InMemoryQueueStorage {
    async fn put_message_to_end(&self, queue: &str, message: Message) -> Result<()> {
        let mut lists = self.lists.lock().map_err(map_poison)?;
        lists.entry(queue.to_string()).or_default().push_back(message);
        Ok(())
    }

    async fn get_first_message(&self, queue: &str) -> Result<Option<Message>> {
        let mut lists = self.lists.lock().map_err(map_poison)?;
        Ok(lists.get_mut(queue).and_then(VecDeque::pop_front))
    }

    async fn count_messages(&self, queue: &str) -> Result<usize> {
        let lists = self.lists.lock().map_err(map_poison)?;
        Ok(lists.get(queue).map_or(0, VecDeque::len))
    }
}
