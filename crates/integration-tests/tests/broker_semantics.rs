//! Broker behaviour across core and the in-memory adapters

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use relay_core::application::{cancel_channel, BrokerConfig, BrokerService, CancelToken, PutOutcome};
use relay_core::domain::{DomainError, Message};
use relay_core::port::queue_storage::mocks::RecordingQueueStorage;
use relay_infra_memory::{in_memory_service, InMemoryBrokerStorage};
use tokio_test::{assert_pending, assert_ready, task};

fn service(max_queues: usize, max_messages: usize) -> BrokerService {
    in_memory_service(&BrokerConfig {
        max_queues,
        max_messages,
        ..Default::default()
    })
}

async fn waiting(service: &BrokerService, queue: &str) -> usize {
    service
        .stats()
        .await
        .unwrap()
        .queues
        .into_iter()
        .find(|q| q.name == queue)
        .map_or(0, |q| q.waiting_consumers)
}

/// Make `queue` exist and leave it empty
async fn empty_queue(service: &BrokerService, queue: &str) {
    service.put(queue, Message::new("seed")).await.unwrap();
    service
        .get(queue, Some(Duration::ZERO), &CancelToken::never())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bounded_broker_scenario() {
    let storage = Arc::new(RecordingQueueStorage::new());
    let config = BrokerConfig {
        max_queues: 1,
        max_messages: 10,
        ..Default::default()
    };
    let service = BrokerService::new(
        &config,
        Arc::new(InMemoryBrokerStorage::with_queue_storage(
            config.max_queues,
            config.max_messages,
            storage.clone(),
        )),
    );
    let never = CancelToken::never();

    assert_eq!(
        service.put("A", Message::new("x")).await.unwrap(),
        PutOutcome::Stored
    );

    let err = service.put("B", Message::new("y")).await.unwrap_err();
    assert!(err.is(&DomainError::BrokerFull));

    let got = service.get("A", None, &never).await.unwrap();
    assert_eq!(got.content(), "x");

    let mut blocked = task::spawn(service.get("A", None, &never));
    assert_pending!(blocked.poll());

    let appends_before = storage.appends();
    assert_eq!(
        service.put("A", Message::new("z")).await.unwrap(),
        PutOutcome::Delivered
    );

    assert!(blocked.is_woken());
    let got = assert_ready!(blocked.poll()).unwrap();
    assert_eq!(got.content(), "z");
    assert_eq!(storage.appends(), appends_before);
}

#[tokio::test]
async fn test_stored_messages_come_out_in_order() {
    let service = service(0, 0);
    let never = CancelToken::never();

    for i in 0..50 {
        service.put("fifo", Message::new(format!("m{}", i))).await.unwrap();
    }
    for i in 0..50 {
        let got = service.get("fifo", None, &never).await.unwrap();
        assert_eq!(got.content(), format!("m{}", i));
    }
}

#[tokio::test]
async fn test_waiters_are_served_in_arrival_order() {
    let service = service(0, 0);
    empty_queue(&service, "q").await;
    let never = CancelToken::never();

    let mut first = task::spawn(service.get("q", None, &never));
    let mut second = task::spawn(service.get("q", None, &never));
    assert_pending!(first.poll());
    assert_pending!(second.poll());

    service.put("q", Message::new("1")).await.unwrap();
    service.put("q", Message::new("2")).await.unwrap();

    assert_eq!(assert_ready!(first.poll()).unwrap().content(), "1");
    assert_eq!(assert_ready!(second.poll()).unwrap().content(), "2");
}

#[tokio::test]
async fn test_get_on_unknown_queue_fails_fast() {
    let service = service(0, 0);

    let err = service
        .get("nowhere", None, &CancelToken::never())
        .await
        .unwrap_err();
    assert!(err.is(&DomainError::QueueNotFound("nowhere".to_string())));
    assert_eq!(service.stats().await.unwrap().queue_count, 0);
}

#[tokio::test]
async fn test_full_queue_still_hands_off_to_waiter() {
    let service = service(0, 1);
    empty_queue(&service, "q").await;
    let never = CancelToken::never();

    let mut blocked = task::spawn(service.get("q", None, &never));
    assert_pending!(blocked.poll());

    assert_eq!(
        service.put("q", Message::new("direct")).await.unwrap(),
        PutOutcome::Delivered
    );
    assert_eq!(
        service.put("q", Message::new("stored")).await.unwrap(),
        PutOutcome::Stored
    );
    let err = service.put("q", Message::new("over")).await.unwrap_err();
    assert!(err.is(&DomainError::QueueFull("q".to_string())));

    assert_eq!(assert_ready!(blocked.poll()).unwrap().content(), "direct");
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_waiter_does_not_swallow_later_message() {
    let service = service(0, 0);
    empty_queue(&service, "q").await;

    let err = service
        .get("q", Some(Duration::from_secs(2)), &CancelToken::never())
        .await
        .unwrap_err();
    assert!(err.is(&DomainError::WaitTimeout));
    assert_eq!(waiting(&service, "q").await, 0);

    assert_eq!(
        service.put("q", Message::new("later")).await.unwrap(),
        PutOutcome::Stored
    );
    let got = service
        .get("q", Some(Duration::ZERO), &CancelToken::never())
        .await
        .unwrap();
    assert_eq!(got.content(), "later");
}

#[tokio::test]
async fn test_cancelled_waiter_is_withdrawn() {
    let service = service(0, 0);
    empty_queue(&service, "q").await;
    let (handle, token) = cancel_channel();

    let mut blocked = task::spawn(service.get("q", None, &token));
    assert_pending!(blocked.poll());
    assert_eq!(waiting(&service, "q").await, 1);

    handle.cancel();
    let err = assert_ready!(blocked.poll()).unwrap_err();
    assert!(err.is(&DomainError::WaitTimeout));
    drop(blocked);
    assert_eq!(waiting(&service, "q").await, 0);

    assert_eq!(
        service.put("q", Message::new("kept")).await.unwrap(),
        PutOutcome::Stored
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_producers_and_consumers_deliver_each_message_once() {
    const PRODUCERS: usize = 8;
    const PER_PRODUCER: usize = 50;

    let service = Arc::new(service(0, 0));
    empty_queue(&service, "work").await;

    let consumers = (0..PRODUCERS * PER_PRODUCER).map(|_| {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .get("work", Some(Duration::from_secs(30)), &CancelToken::never())
                .await
                .map(Message::into_content)
        })
    });
    let consumers: Vec<_> = consumers.collect();

    let producers = (0..PRODUCERS).map(|p| {
        let service = service.clone();
        tokio::spawn(async move {
            for i in 0..PER_PRODUCER {
                service
                    .put("work", Message::new(format!("{}-{}", p, i)))
                    .await
                    .unwrap();
            }
        })
    });
    for producer in join_all(producers).await {
        producer.unwrap();
    }

    let received: Vec<String> = join_all(consumers)
        .await
        .into_iter()
        .map(|r| r.unwrap().unwrap())
        .collect();

    let unique: HashSet<&String> = received.iter().collect();
    assert_eq!(received.len(), PRODUCERS * PER_PRODUCER);
    assert_eq!(unique.len(), received.len());

    let stats = service.stats().await.unwrap();
    assert_eq!(stats.queues[0].stored_messages, 0);
    assert_eq!(stats.queues[0].waiting_consumers, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creation_respects_queue_bound() {
    let service = Arc::new(service(3, 0));

    let puts = (0..32).map(|i| {
        let service = service.clone();
        tokio::spawn(async move { service.put(&format!("q{}", i), Message::new("x")).await })
    });
    let results: Vec<_> = join_all(puts).await.into_iter().map(|r| r.unwrap()).collect();

    let created = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(created, 3);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.is(&DomainError::BrokerFull)));
    assert_eq!(service.stats().await.unwrap().queue_count, 3);
}
