// Waiter Registry - direct producer -> consumer handoff
//
// Every blocked get owns one entry in its queue's FIFO list. An entry leaves
// the list exactly once: popped by `notify` (delivery) or withdrawn by its
// own consumer (timeout, cancellation, or the future being dropped). Both
// paths run under the same lock, and delivery writes into the slot while
// still holding it, so a consumer that fails to withdraw knows the message
// is already sitting in its slot.

use crate::application::CancelToken;
use crate::domain::{DomainError, Message};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};

struct Waiter {
    id: u64,
    slot: oneshot::Sender<Message>,
}

#[derive(Default)]
struct Waiters {
    next_id: u64,
    per_queue: HashMap<String, VecDeque<Waiter>>,
}

impl Waiters {
    fn register(&mut self, queue_name: &str, slot: oneshot::Sender<Message>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.per_queue
            .entry(queue_name.to_string())
            .or_default()
            .push_back(Waiter { id, slot });
        id
    }

    /// Returns false if the entry is gone (already popped by a producer)
    fn withdraw(&mut self, queue_name: &str, id: u64) -> bool {
        let Some(list) = self.per_queue.get_mut(queue_name) else {
            return false;
        };
        let Some(pos) = list.iter().position(|w| w.id == id) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.per_queue.remove(queue_name);
        }
        true
    }

    /// Hand `message` to the oldest live waiter, or give it back
    fn deliver(&mut self, queue_name: &str, mut message: Message) -> Result<(), Message> {
        let Some(list) = self.per_queue.get_mut(queue_name) else {
            return Err(message);
        };

        let outcome = loop {
            let Some(waiter) = list.pop_front() else {
                break Err(message);
            };
            // A closed slot means the consumer vanished without withdrawing; skip it
            match waiter.slot.send(message) {
                Ok(()) => break Ok(()),
                Err(returned) => message = returned,
            }
        };

        if list.is_empty() {
            self.per_queue.remove(queue_name);
        }
        outcome
    }

    fn count(&self, queue_name: &str) -> usize {
        self.per_queue.get(queue_name).map_or(0, VecDeque::len)
    }
}

/// Per-queue FIFO lists of blocked consumers
#[derive(Default)]
pub struct WaiterRegistry {
    waiters: Mutex<Waiters>,
}

/// Result of [`WaiterRegistry::notify`]
#[derive(Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to a blocked consumer
    Delivered,
    /// Nobody was waiting; the message is given back untouched
    NoWaiter(Message),
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered)
    }
}

enum Outcome {
    Delivered(Option<Message>),
    TimedOut,
    Cancelled,
}

impl WaiterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Waiters> {
        // Waiters stays consistent across a panic: every mutation is a single push/pop
        self.waiters.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Join the back of `queue_name`'s waiter list.
    ///
    /// The entry is live from this point on: a [`notify`](Self::notify) may
    /// deliver into it before [`Registration::wait`] is even polled. Dropping
    /// the registration withdraws it.
    pub fn register<'a>(&'a self, queue_name: &'a str) -> Registration<'a> {
        let (tx, rx) = oneshot::channel();
        let id = self.lock().register(queue_name, tx);
        Registration {
            registry: self,
            queue_name,
            id,
            slot: rx,
            settled: false,
        }
    }

    /// Register and block until a producer hands over a message, `timeout`
    /// elapses, or `cancel` fires. See [`Registration::wait`].
    pub async fn wait_for_message(
        &self,
        queue_name: &str,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<Message, DomainError> {
        self.register(queue_name).wait(timeout, cancel).await
    }

    /// Deliver `message` to the oldest waiter on `queue_name`.
    ///
    /// With nobody waiting this has no side effect and the message comes back.
    pub fn notify(&self, queue_name: &str, message: Message) -> Delivery {
        match self.lock().deliver(queue_name, message) {
            Ok(()) => Delivery::Delivered,
            Err(message) => Delivery::NoWaiter(message),
        }
    }

    /// Number of consumers currently blocked on `queue_name`
    pub fn waiting(&self, queue_name: &str) -> usize {
        self.lock().count(queue_name)
    }
}

/// One live entry in the registry, owned by the waiting consumer
pub struct Registration<'a> {
    registry: &'a WaiterRegistry,
    queue_name: &'a str,
    id: u64,
    slot: oneshot::Receiver<Message>,
    settled: bool,
}

impl Registration<'_> {
    /// Block until a producer hands over a message, `timeout` elapses, or
    /// `cancel` fires.
    ///
    /// Timeout and cancellation both yield [`DomainError::WaitTimeout`]. If the
    /// entry was already selected by a producer when the wait gave up, the
    /// delivered message is returned instead.
    pub async fn wait(
        mut self,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<Message, DomainError> {
        let mut cancel = cancel.clone();

        debug!(queue = %self.queue_name, waiter = self.id, ?timeout, "Waiting for message");

        let outcome = tokio::select! {
            biased;
            delivered = &mut self.slot => Outcome::Delivered(delivered.ok()),
            _ = tokio::time::sleep(timeout) => Outcome::TimedOut,
            _ = cancel.cancelled() => Outcome::Cancelled,
        };

        match outcome {
            Outcome::Delivered(Some(message)) => {
                self.settled = true;
                debug!(queue = %self.queue_name, waiter = self.id, "Message handed off");
                Ok(message)
            }
            Outcome::Delivered(None) => {
                self.withdraw();
                Err(DomainError::WaitTimeout)
            }
            Outcome::TimedOut => self.give_up("timed out"),
            Outcome::Cancelled => self.give_up("cancelled"),
        }
    }

    /// Leave the list. Returns the message if a producer popped us first.
    fn withdraw(&mut self) -> Option<Message> {
        self.settled = true;
        if self.registry.lock().withdraw(self.queue_name, self.id) {
            return None;
        }
        self.slot.try_recv().ok()
    }

    fn give_up(&mut self, cause: &'static str) -> Result<Message, DomainError> {
        if let Some(message) = self.withdraw() {
            debug!(queue = %self.queue_name, waiter = self.id, "Handoff won the race against wait expiry");
            return Ok(message);
        }
        debug!(queue = %self.queue_name, waiter = self.id, cause, "Wait ended without message");
        Err(DomainError::WaitTimeout)
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        // Dropped before the wait settled
        let mut waiters = self.registry.lock();
        if waiters.withdraw(self.queue_name, self.id) {
            return;
        }
        if let Ok(message) = self.slot.try_recv() {
            if waiters.deliver(self.queue_name, message).is_err() {
                warn!(
                    queue = %self.queue_name,
                    waiter = self.id,
                    "Abandoned waiter held a delivered message and no other waiter could take it"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cancel_channel;
    use tokio_test::{assert_pending, assert_ready, task};

    const LONG: Duration = Duration::from_secs(3600);

    #[test]
    fn test_notify_without_waiters_is_a_no_op() {
        let registry = WaiterRegistry::new();

        assert_eq!(
            registry.notify("orders", Message::new("x")),
            Delivery::NoWaiter(Message::new("x"))
        );
        assert_eq!(registry.waiting("orders"), 0);
    }

    #[tokio::test]
    async fn test_waiters_served_in_registration_order() {
        let registry = WaiterRegistry::new();
        let cancel = CancelToken::never();

        let mut first = task::spawn(registry.wait_for_message("q", LONG, &cancel));
        let mut second = task::spawn(registry.wait_for_message("q", LONG, &cancel));
        let mut third = task::spawn(registry.wait_for_message("q", LONG, &cancel));
        assert_pending!(first.poll());
        assert_pending!(second.poll());
        assert_pending!(third.poll());
        assert_eq!(registry.waiting("q"), 3);

        assert!(registry.notify("q", Message::new("m1")).is_delivered());
        assert!(registry.notify("q", Message::new("m2")).is_delivered());

        assert!(first.is_woken());
        let got = assert_ready!(first.poll()).unwrap();
        assert_eq!(got.content(), "m1");
        let got = assert_ready!(second.poll()).unwrap();
        assert_eq!(got.content(), "m2");

        // Third consumer stays blocked
        assert_pending!(third.poll());
        assert_eq!(registry.waiting("q"), 1);
    }

    #[tokio::test]
    async fn test_waiters_on_other_queues_are_untouched() {
        let registry = WaiterRegistry::new();
        let cancel = CancelToken::never();

        let mut other = task::spawn(registry.wait_for_message("other", LONG, &cancel));
        assert_pending!(other.poll());

        assert!(!registry.notify("q", Message::new("m")).is_delivered());
        assert_pending!(other.poll());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_removes_registration() {
        let registry = WaiterRegistry::new();

        let res = registry
            .wait_for_message("q", Duration::from_millis(50), &CancelToken::never())
            .await;

        assert_eq!(res, Err(DomainError::WaitTimeout));
        assert_eq!(registry.waiting("q"), 0);
        assert!(!registry.notify("q", Message::new("late")).is_delivered());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_returns_before_timeout() {
        let registry = std::sync::Arc::new(WaiterRegistry::new());
        let (handle, token) = cancel_channel();

        let waiter = {
            let registry = registry.clone();
            tokio::spawn(async move {
                let started = tokio::time::Instant::now();
                let res = registry.wait_for_message("q", LONG, &token).await;
                (res, started.elapsed())
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.cancel();

        let (res, elapsed) = waiter.await.unwrap();
        assert_eq!(res, Err(DomainError::WaitTimeout));
        assert!(elapsed < LONG);
        assert_eq!(registry.waiting("q"), 0);
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_returns_immediately() {
        let registry = WaiterRegistry::new();
        let (handle, token) = cancel_channel();
        handle.cancel();

        let res = registry.wait_for_message("q", LONG, &token).await;

        assert_eq!(res, Err(DomainError::WaitTimeout));
        assert_eq!(registry.waiting("q"), 0);
    }

    #[tokio::test]
    async fn test_dropped_wait_deregisters() {
        let registry = WaiterRegistry::new();
        let cancel = CancelToken::never();

        let mut fut = task::spawn(registry.wait_for_message("q", LONG, &cancel));
        assert_pending!(fut.poll());
        assert_eq!(registry.waiting("q"), 1);

        drop(fut);

        assert_eq!(registry.waiting("q"), 0);
        assert!(!registry.notify("q", Message::new("m")).is_delivered());
    }

    #[tokio::test]
    async fn test_message_in_abandoned_slot_moves_to_next_waiter() {
        let registry = WaiterRegistry::new();
        let cancel = CancelToken::never();

        let mut first = task::spawn(registry.wait_for_message("q", LONG, &cancel));
        let mut second = task::spawn(registry.wait_for_message("q", LONG, &cancel));
        assert_pending!(first.poll());
        assert_pending!(second.poll());

        // Delivered to `first`, which is dropped before it ever reads the slot
        assert!(registry.notify("q", Message::new("m")).is_delivered());
        drop(first);

        let got = assert_ready!(second.poll()).unwrap();
        assert_eq!(got.content(), "m");
        assert_eq!(registry.waiting("q"), 0);
    }
}
