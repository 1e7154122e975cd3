//! Ordering, stability and capacity behaviour of the queue

use crate::queue::{ExpiringQueue, Notification, QueueError, Urgency};
use std::time::{Duration, SystemTime};

fn valid(urgency: Urgency, payload: u64) -> Notification<u64> {
    Notification::new(
        urgency,
        SystemTime::now() + Duration::from_secs(3600),
        payload,
    )
}

fn expired(urgency: Urgency, payload: u64) -> Notification<u64> {
    Notification::new(urgency, SystemTime::now() - Duration::from_secs(3600), payload)
}

#[test]
fn test_pop_returns_descending_urgency() {
    let queue = ExpiringQueue::new(3);

    queue.push(valid(Urgency::Low, 1)).unwrap();
    queue.push(valid(Urgency::High, 2)).unwrap();
    queue.push(valid(Urgency::Medium, 3)).unwrap();

    let first = queue.pop().unwrap().unwrap();
    let second = queue.pop().unwrap().unwrap();
    let third = queue.pop().unwrap().unwrap();

    assert_eq!(first.urgency(), Urgency::High);
    assert_eq!(second.urgency(), Urgency::Medium);
    assert_eq!(third.urgency(), Urgency::Low);
    assert!(queue.pop().unwrap().is_none());
}

#[test]
fn test_equal_urgency_pops_in_push_order() {
    let queue = ExpiringQueue::new(5);

    for payload in [10, 20, 30] {
        queue.push(valid(Urgency::Medium, payload)).unwrap();
    }

    let order: Vec<u64> = std::iter::from_fn(|| queue.pop().unwrap())
        .map(Notification::into_payload)
        .collect();

    assert_eq!(order, vec![10, 20, 30], "stable selection must keep push order");
}

#[test]
fn test_mixed_urgencies_stay_stable_within_level() {
    let queue = ExpiringQueue::new(6);

    queue.push(valid(Urgency::Low, 1)).unwrap();
    queue.push(valid(Urgency::High, 2)).unwrap();
    queue.push(valid(Urgency::Low, 3)).unwrap();
    queue.push(valid(Urgency::High, 4)).unwrap();
    queue.push(valid(Urgency::Medium, 5)).unwrap();

    let order: Vec<u64> = std::iter::from_fn(|| queue.pop().unwrap())
        .map(Notification::into_payload)
        .collect();

    assert_eq!(order, vec![2, 4, 5, 1, 3]);
}

#[test]
fn test_push_beyond_capacity_is_rejected() {
    let queue = ExpiringQueue::new(3);

    for payload in 0..3 {
        queue.push(valid(Urgency::Low, payload)).unwrap();
    }

    // All occupants are still valid, so eviction reclaims nothing
    match queue.push(valid(Urgency::High, 99)) {
        Err(QueueError::AtCapacity { capacity }) => assert_eq!(capacity, 3),
        other => panic!("Expected AtCapacity error, got {:?}", other),
    }

    // The rejection must not alter the existing entries
    let remaining: Vec<u64> = std::iter::from_fn(|| queue.pop().unwrap())
        .map(Notification::into_payload)
        .collect();
    assert_eq!(remaining, vec![0, 1, 2]);
}

#[test]
fn test_pop_on_empty_queue_is_idempotent() {
    let queue: ExpiringQueue<u64> = ExpiringQueue::new(4);

    for _ in 0..3 {
        assert!(queue.pop().unwrap().is_none());
        assert_eq!(queue.size().unwrap(), 0);
    }
}

#[test]
fn test_pop_on_only_expired_queue_returns_none_and_drains() {
    let queue = ExpiringQueue::new(4);

    queue.push(expired(Urgency::High, 1)).unwrap();
    queue.push(expired(Urgency::Low, 2)).unwrap();
    assert_eq!(queue.size().unwrap(), 2);

    // The attempt finds no valid item but must physically drain the stale ones
    assert!(queue.pop().unwrap().is_none());
    assert_eq!(queue.size().unwrap(), 0);

    assert!(queue.pop().unwrap().is_none());
    assert_eq!(queue.size().unwrap(), 0);
}

#[test]
fn test_pop_skips_expired_entry_with_higher_urgency() {
    let queue = ExpiringQueue::new(3);

    queue.push(expired(Urgency::High, 1)).unwrap();
    queue.push(valid(Urgency::Medium, 2)).unwrap();

    let popped = queue.pop().unwrap().unwrap();
    assert_eq!(popped.into_payload(), 2);
    // The expired HIGH entry was drained during the same attempt
    assert_eq!(queue.size().unwrap(), 0);
}
