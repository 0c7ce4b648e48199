//! Integration tests for the scheduler primitives.
//!
//! Uses `start_paused` runtimes so Tokio auto-advances the clock while
//! the test awaits, making every timing assertion deterministic.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;

use molerush_timer::{TaskSet, once, repeating};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tick {
    Countdown,
    Spawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Key {
    Countdown,
    Spawn,
}

// =========================================================================
// once
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_once_fires_after_delay() {
    let (tx, mut rx) = mpsc::channel(8);
    once(tx, Duration::from_secs(3), Tick::Spawn);

    let before = time::Instant::now();
    let msg = rx.recv().await;
    assert_eq!(msg, Some(Tick::Spawn));
    assert!(before.elapsed() >= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_once_with_dropped_receiver_exits_cleanly() {
    let (tx, rx) = mpsc::channel::<Tick>(8);
    let handle = once(tx, Duration::from_millis(10), Tick::Spawn);
    drop(rx);

    // The task must finish (not hang) even though delivery fails.
    handle.await.unwrap();
}

// =========================================================================
// repeating
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_repeating_fires_every_period() {
    let (tx, mut rx) = mpsc::channel(8);
    repeating(tx, Duration::from_secs(1), || Tick::Countdown);

    let start = time::Instant::now();
    for i in 1..=5u64 {
        assert_eq!(rx.recv().await, Some(Tick::Countdown));
        assert!(start.elapsed() >= Duration::from_secs(i));
    }
}

#[tokio::test(start_paused = true)]
async fn test_repeating_does_not_fire_immediately() {
    let (tx, mut rx) = mpsc::channel(8);
    repeating(tx, Duration::from_secs(1), || Tick::Countdown);

    // Nothing should be buffered before the first period elapses.
    time::advance(Duration::from_millis(500)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_repeating_stops_when_receiver_dropped() {
    let (tx, rx) = mpsc::channel::<Tick>(1);
    let handle = repeating(tx, Duration::from_millis(10), || Tick::Countdown);
    drop(rx);
    handle.await.unwrap();
}

// =========================================================================
// TaskSet
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_cancel_all_prevents_pending_fires() {
    let (tx, mut rx) = mpsc::channel(8);
    let mut tasks = TaskSet::new();
    tasks.insert(Key::Spawn, once(tx.clone(), Duration::from_secs(2), Tick::Spawn));
    tasks.insert(
        Key::Countdown,
        repeating(tx, Duration::from_secs(1), || Tick::Countdown),
    );
    assert_eq!(tasks.len(), 2);

    tasks.cancel_all();
    assert!(tasks.is_empty());

    // Well past both deadlines: nothing may arrive.
    time::advance(Duration::from_secs(10)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_insert_replaces_and_aborts_previous_task() {
    let (tx, mut rx) = mpsc::channel(8);
    let mut tasks = TaskSet::new();

    // The first spawn timer is superseded before it fires, mirroring a
    // room rescheduling its spawn delay.
    tasks.insert(Key::Spawn, once(tx.clone(), Duration::from_secs(1), Tick::Spawn));
    tasks.insert(Key::Spawn, once(tx, Duration::from_secs(5), Tick::Spawn));
    assert_eq!(tasks.len(), 1);

    let start = time::Instant::now();
    assert_eq!(rx.recv().await, Some(Tick::Spawn));
    assert!(start.elapsed() >= Duration::from_secs(5));
    // Only the replacement fired.
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_single_key_leaves_others_running() {
    let (tx, mut rx) = mpsc::channel(8);
    let mut tasks = TaskSet::new();
    tasks.insert(Key::Spawn, once(tx.clone(), Duration::from_secs(1), Tick::Spawn));
    tasks.insert(
        Key::Countdown,
        once(tx, Duration::from_secs(1), Tick::Countdown),
    );

    tasks.cancel(&Key::Spawn);

    assert_eq!(rx.recv().await, Some(Tick::Countdown));
    time::advance(Duration::from_secs(5)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_drop_aborts_everything() {
    let (tx, mut rx) = mpsc::channel(8);
    {
        let mut tasks = TaskSet::new();
        tasks.insert(Key::Spawn, once(tx, Duration::from_secs(1), Tick::Spawn));
    }
    time::advance(Duration::from_secs(5)).await;
    assert!(rx.try_recv().is_err());
}
