//! Elapsed-time bookkeeping.
//!
//! `Elapsed` is a `(minutes, seconds, hundredths)` triple. Field order is
//! significant: the derived `Ord` compares lexicographically, which is how
//! best times are ranked. It serializes as the ordered triple
//! `[minutes, seconds, hundredths]`; triples with seconds over 59 or
//! hundredths over 99 are rejected when read back.
//!
//! `Clock` owns the periodic tick subscription on the session's timer
//! queue. Starting subscribes, stopping cancels; nothing keeps ticking
//! behind a dropped flag.

use serde::{Deserialize, Serialize};

use super::timer::{TimerId, TimerQueue};

/// Elapsed play time at hundredth-of-a-second resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "(u32, u8, u8)", into = "(u32, u8, u8)")]
pub struct Elapsed {
    pub minutes: u32,
    pub seconds: u8,
    pub hundredths: u8,
}

impl Elapsed {
    /// Zero elapsed time.
    pub const ZERO: Elapsed = Elapsed {
        minutes: 0,
        seconds: 0,
        hundredths: 0,
    };

    /// Build from components. Callers keep seconds under 60 and hundredths
    /// under 100.
    #[must_use]
    pub const fn new(minutes: u32, seconds: u8, hundredths: u8) -> Self {
        Self {
            minutes,
            seconds,
            hundredths,
        }
    }

    /// Advance by one hundredth, carrying into seconds and minutes.
    ///
    /// Minutes saturate instead of wrapping.
    pub fn tick(&mut self) {
        self.hundredths += 1;
        if self.hundredths > 99 {
            self.hundredths = 0;
            self.seconds += 1;
        }
        if self.seconds > 59 {
            self.seconds = 0;
            self.minutes = self.minutes.saturating_add(1);
        }
    }

    /// True if this time should replace `best` as the record.
    ///
    /// A missing record is always beaten; otherwise the new time must be
    /// strictly smaller.
    #[must_use]
    pub fn beats(self, best: Option<Elapsed>) -> bool {
        best.map_or(true, |best| self < best)
    }

    /// True while this time is still on pace for a record (ties count).
    ///
    /// Advisory only, used to color the running clock.
    #[must_use]
    pub fn within(self, best: Option<Elapsed>) -> bool {
        best.map_or(true, |best| self <= best)
    }

    /// Total hundredths, for hosts that want a single number.
    #[must_use]
    pub fn as_hundredths(self) -> u64 {
        (u64::from(self.minutes) * 60 + u64::from(self.seconds)) * 100 + u64::from(self.hundredths)
    }
}

/// A time triple with seconds or hundredths out of range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid elapsed time [{0}, {1}, {2}]")]
pub struct InvalidElapsed(pub u32, pub u8, pub u8);

impl TryFrom<(u32, u8, u8)> for Elapsed {
    type Error = InvalidElapsed;

    fn try_from((minutes, seconds, hundredths): (u32, u8, u8)) -> Result<Self, Self::Error> {
        if seconds > 59 || hundredths > 99 {
            return Err(InvalidElapsed(minutes, seconds, hundredths));
        }
        Ok(Self::new(minutes, seconds, hundredths))
    }
}

impl From<Elapsed> for (u32, u8, u8) {
    fn from(elapsed: Elapsed) -> Self {
        (elapsed.minutes, elapsed.seconds, elapsed.hundredths)
    }
}

/// `ss:hh`, or `mm:ss:hh` once a minute has passed.
impl std::fmt::Display for Elapsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.minutes > 0 {
            write!(f, "{:02}:{:02}:{:02}", self.minutes, self.seconds, self.hundredths)
        } else {
            write!(f, "{:02}:{:02}", self.seconds, self.hundredths)
        }
    }
}

/// Running game clock.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Clock {
    elapsed: Elapsed,
    subscription: Option<TimerId>,
}

impl Clock {
    /// A stopped clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current elapsed time.
    #[must_use]
    pub fn elapsed(&self) -> Elapsed {
        self.elapsed
    }

    /// True while a tick subscription is live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.subscription.is_some()
    }

    /// The live tick subscription, if any.
    #[must_use]
    pub fn subscription(&self) -> Option<TimerId> {
        self.subscription
    }

    /// Subscribe to periodic ticks. Does nothing if already running.
    pub fn start<E: Clone>(&mut self, timers: &mut TimerQueue<E>, interval_ms: u64, tick: E) {
        if self.subscription.is_none() {
            self.subscription = Some(timers.schedule_every(interval_ms, tick));
        }
    }

    /// Cancel the tick subscription. Elapsed time is kept.
    pub fn stop<E: Clone>(&mut self, timers: &mut TimerQueue<E>) {
        if let Some(id) = self.subscription.take() {
            timers.cancel(id);
        }
    }

    /// Cancel the subscription and zero the elapsed time.
    pub fn reset<E: Clone>(&mut self, timers: &mut TimerQueue<E>) {
        self.stop(timers);
        self.elapsed = Elapsed::ZERO;
    }

    /// Handle one delivered tick.
    ///
    /// Ticks from a cancelled subscription are ignored. Returns the new
    /// elapsed time when the tick counted.
    pub fn on_tick(&mut self, id: TimerId) -> Option<Elapsed> {
        if self.subscription != Some(id) {
            return None;
        }
        self.elapsed.tick();
        Some(self.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_cascade() {
        let mut elapsed = Elapsed::new(0, 59, 99);
        elapsed.tick();
        assert_eq!(elapsed, Elapsed::new(1, 0, 0));

        let mut elapsed = Elapsed::new(0, 3, 99);
        elapsed.tick();
        assert_eq!(elapsed, Elapsed::new(0, 4, 0));
    }

    #[test]
    fn test_hundred_ticks_make_a_second() {
        let mut elapsed = Elapsed::ZERO;
        for _ in 0..100 {
            elapsed.tick();
        }
        assert_eq!(elapsed, Elapsed::new(0, 1, 0));
        assert_eq!(elapsed.as_hundredths(), 100);
    }

    #[test]
    fn test_lexicographic_order() {
        assert!(Elapsed::new(0, 5, 30) < Elapsed::new(0, 10, 0));
        assert!(Elapsed::new(1, 0, 0) > Elapsed::new(0, 59, 99));
        assert!(Elapsed::new(0, 5, 31) > Elapsed::new(0, 5, 30));
    }

    #[test]
    fn test_beats_and_within() {
        let best = Some(Elapsed::new(0, 10, 0));

        assert!(Elapsed::new(0, 5, 30).beats(best));
        assert!(!Elapsed::new(0, 10, 0).beats(best));
        assert!(Elapsed::new(0, 10, 0).within(best));
        assert!(!Elapsed::new(0, 10, 1).within(best));

        assert!(Elapsed::new(59, 59, 99).beats(None));
        assert!(Elapsed::new(59, 59, 99).within(None));
    }

    #[test]
    fn test_display() {
        assert_eq!(Elapsed::new(0, 5, 3).to_string(), "05:03");
        assert_eq!(Elapsed::new(2, 0, 45).to_string(), "02:00:45");
        assert_eq!(Elapsed::new(12, 34, 56).to_string(), "12:34:56");
    }

    #[test]
    fn test_serializes_as_triple() {
        let json = serde_json::to_string(&Elapsed::new(0, 5, 30)).unwrap();
        assert_eq!(json, "[0,5,30]");

        let parsed: Elapsed = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(parsed, Elapsed::new(1, 2, 3));
    }

    #[test]
    fn test_out_of_range_triples_rejected() {
        assert!(serde_json::from_str::<Elapsed>("[0,5,255]").is_err());
        assert!(serde_json::from_str::<Elapsed>("[0,60,0]").is_err());
        assert_eq!(
            Elapsed::try_from((0u32, 59u8, 100u8)),
            Err(InvalidElapsed(0, 59, 100))
        );
        assert_eq!(Elapsed::try_from((7u32, 59u8, 99u8)), Ok(Elapsed::new(7, 59, 99)));

        let bytes = bincode::serialize(&(0u32, 0u8, 255u8)).unwrap();
        assert!(bincode::deserialize::<Elapsed>(&bytes).is_err());
    }

    #[test]
    fn test_clock_subscription_lifecycle() {
        let mut timers: TimerQueue<()> = TimerQueue::new();
        let mut clock = Clock::new();

        clock.start(&mut timers, 10, ());
        let id = clock.subscription().unwrap();
        assert!(clock.is_running());

        // Starting twice keeps one subscription
        clock.start(&mut timers, 10, ());
        assert_eq!(timers.len(), 1);

        assert_eq!(clock.on_tick(id), Some(Elapsed::new(0, 0, 1)));

        clock.stop(&mut timers);
        assert!(!clock.is_running());
        assert!(timers.is_empty());
        assert_eq!(clock.on_tick(id), None);
        assert_eq!(clock.elapsed(), Elapsed::new(0, 0, 1));

        clock.reset(&mut timers);
        assert_eq!(clock.elapsed(), Elapsed::ZERO);
    }
}
