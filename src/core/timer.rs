//! Virtual-time timer queue.
//!
//! The engine never sleeps or spawns threads. Delayed work (a mismatched
//! pair flipping back, the clock's periodic tick) is registered here and
//! fires when the host moves time forward. Everything runs on the caller's
//! thread, in the order the timers fall due.
//!
//! ```
//! use memory_match::core::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! let tick = timers.schedule_every(10, "tick");
//! timers.schedule_once(25, "revert");
//!
//! let mut fired = Vec::new();
//! while let Some((_, event)) = timers.pop_due(30) {
//!     fired.push(event);
//! }
//! timers.advance_to(30);
//!
//! assert_eq!(fired, vec!["tick", "tick", "revert", "tick"]);
//! assert!(timers.cancel(tick));
//! assert!(timers.is_empty());
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Handle to a scheduled timer, used for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Scheduled<E> {
    due_ms: u64,
    /// `Some` for periodic timers.
    interval_ms: Option<u64>,
    event: E,
}

/// Single-threaded scheduler over a virtual millisecond clock.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimerQueue<E> {
    now_ms: u64,
    next_id: u64,
    entries: FxHashMap<TimerId, Scheduled<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            entries: FxHashMap::default(),
        }
    }
}

impl<E: Clone> TimerQueue<E> {
    /// Create an empty queue at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of live timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether a timer is still live.
    #[must_use]
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Fire `event` once, `delay_ms` from now.
    pub fn schedule_once(&mut self, delay_ms: u64, event: E) -> TimerId {
        self.insert(delay_ms, None, event)
    }

    /// Fire `event` every `interval_ms`, first at `now + interval_ms`.
    ///
    /// Panics if `interval_ms` is zero, since the timer would never let
    /// time advance.
    pub fn schedule_every(&mut self, interval_ms: u64, event: E) -> TimerId {
        assert!(interval_ms > 0, "Periodic timer interval must be positive");
        self.insert(interval_ms, Some(interval_ms), event)
    }

    fn insert(&mut self, delay_ms: u64, interval_ms: Option<u64>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            Scheduled {
                due_ms: self.now_ms.saturating_add(delay_ms),
                interval_ms,
                event,
            },
        );
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Drop every timer without firing it.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// True if every periodic timer has a positive interval.
    ///
    /// Always holds for queues built through `schedule_every`; decoded
    /// queues are checked with it before use.
    #[must_use]
    pub fn intervals_valid(&self) -> bool {
        self.entries.values().all(|s| s.interval_ms != Some(0))
    }

    /// Due time of the earliest timer.
    #[must_use]
    pub fn next_due_ms(&self) -> Option<u64> {
        self.entries.values().map(|s| s.due_ms).min()
    }

    /// Pop the earliest timer due at or before `until_ms`.
    ///
    /// Ties fire in scheduling order. Virtual time moves to the timer's due
    /// time. Periodic timers are re-armed under the same id.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, E)> {
        let (id, due_ms) = self
            .entries
            .iter()
            .filter(|(_, s)| s.due_ms <= until_ms)
            .map(|(id, s)| (*id, s.due_ms))
            .min_by_key(|&(id, due_ms)| (due_ms, id))?;

        self.now_ms = self.now_ms.max(due_ms);

        let interval_ms = self.entries.get(&id)?.interval_ms;
        match interval_ms {
            Some(interval) => {
                let entry = self.entries.get_mut(&id)?;
                entry.due_ms = due_ms.saturating_add(interval);
                Some((id, entry.event.clone()))
            }
            None => self.entries.remove(&id).map(|s| (id, s.event)),
        }
    }

    /// Move virtual time to `ms` without firing anything.
    ///
    /// Call after draining `pop_due(ms)`. Time never moves backwards.
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }
}
