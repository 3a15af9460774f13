// Queue Storage Port (Interface)

use crate::domain::Message;
use crate::error::Result;
use async_trait::async_trait;

/// Per-queue-name FIFO message lists
///
/// Capacity is not enforced here; [`crate::domain::Queue`] owns the bound and
/// serializes its check-then-append.
#[async_trait]
pub trait QueueStorage: Send + Sync {
    /// Append a message to the tail of `queue`
    async fn put_message_to_end(&self, queue: &str, message: Message) -> Result<()>;

    /// Pop the head of `queue`, `None` when empty or unknown
    async fn get_first_message(&self, queue: &str) -> Result<Option<Message>>;

    /// Number of stored messages in `queue`
    async fn count_messages(&self, queue: &str) -> Result<usize>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

#[cfg(any(test, feature = "test-util"))]
pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Plain map-backed storage that counts appends
    #[derive(Default)]
    pub struct RecordingQueueStorage {
        lists: Mutex<HashMap<String, VecDeque<Message>>>,
        appends: AtomicUsize,
    }

    impl RecordingQueueStorage {
        pub fn new() -> Self {
            Self::default()
        }

        /// Total number of successful `put_message_to_end` calls
        pub fn appends(&self) -> usize {
            self.appends.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QueueStorage for RecordingQueueStorage {
        async fn put_message_to_end(&self, queue: &str, message: Message) -> Result<()> {
            self.lists
                .lock()
                .unwrap()
                .entry(queue.to_string())
                .or_default()
                .push_back(message);
            self.appends.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn get_first_message(&self, queue: &str) -> Result<Option<Message>> {
            Ok(self
                .lists
                .lock()
                .unwrap()
                .get_mut(queue)
                .and_then(VecDeque::pop_front))
        }

        async fn count_messages(&self, queue: &str) -> Result<usize> {
            Ok(self
                .lists
                .lock()
                .unwrap()
                .get(queue)
                .map_or(0, VecDeque::len))
        }
    }

    /// Storage whose every call fails
    pub struct FailingQueueStorage;

    #[async_trait]
    impl QueueStorage for FailingQueueStorage {
        async fn put_message_to_end(&self, _queue: &str, _message: Message) -> Result<()> {
            Err(AppError::Storage("append rejected".to_string()))
        }

        async fn get_first_message(&self, _queue: &str) -> Result<Option<Message>> {
            Err(AppError::Storage("read rejected".to_string()))
        }

        async fn count_messages(&self, _queue: &str) -> Result<usize> {
            Err(AppError::Storage("count rejected".to_string()))
        }
    }
}
