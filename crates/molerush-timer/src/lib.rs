//! Scheduler primitives for room actors.
//!
//! A room owns a set of named scheduled activities: the 1 Hz countdown,
//! the difficulty ramp, tutorial one-shots, the self-perpetuating spawn
//! timer, per-mole expiries, and the bot tick. Rather than letting each
//! of those mutate room state directly, every timer here delivers a
//! message back into the room's command channel. The actor stays the
//! only writer, and every timer event is re-validated on arrival —
//! cancellation is best-effort, so a message may land after the state
//! it referred to is gone.
//!
//! [`TaskSet`] tracks the spawned timer tasks under caller-defined keys
//! and aborts them as a unit on teardown, so an ended room leaves no
//! long-lived pending timers behind.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Delivers `msg` into `tx` once, after `delay`.
///
/// The task exits silently if the receiver is gone by the time the
/// delay elapses.
pub fn once<M: Send + 'static>(
    tx: mpsc::Sender<M>,
    delay: Duration,
    msg: M,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        time::sleep(delay).await;
        let _ = tx.send(msg).await;
    })
}

/// Delivers `make()` into `tx` every `period`, first firing one period
/// from now.
///
/// Takes a factory rather than a value because command messages often
/// carry non-`Clone` payloads. The task exits when the receiver is
/// dropped — a closed channel is the only stop condition besides an
/// explicit abort via [`TaskSet`].
pub fn repeating<M, F>(
    tx: mpsc::Sender<M>,
    period: Duration,
    make: F,
) -> JoinHandle<()>
where
    M: Send + 'static,
    F: Fn() -> M + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        loop {
            interval.tick().await;
            if tx.send(make()).await.is_err() {
                break;
            }
        }
    })
}

/// A set of named timer tasks, cancelled as a unit.
///
/// Keys are caller-defined; inserting under an existing key aborts the
/// task it replaces. Dropping the set aborts everything still pending.
pub struct TaskSet<K: Eq + Hash> {
    tasks: HashMap<K, JoinHandle<()>>,
}

impl<K: Eq + Hash> TaskSet<K> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    /// Tracks `handle` under `key`, aborting any task previously held
    /// under the same key.
    pub fn insert(&mut self, key: K, handle: JoinHandle<()>) {
        if let Some(old) = self.tasks.insert(key, handle) {
            old.abort();
        }
    }

    /// Aborts and forgets the task under `key`, if any.
    pub fn cancel(&mut self, key: &K) {
        if let Some(handle) = self.tasks.remove(key) {
            handle.abort();
        }
    }

    /// Aborts every tracked task.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }

    /// Number of tracked tasks (including already-finished ones that
    /// were never removed).
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the set tracks no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<K: Eq + Hash> Default for TaskSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> Drop for TaskSet<K> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
