//! Game session: the flip/match state machine.
//!
//! ## States
//!
//! - `Idle`: no game running; every input is ignored
//! - `Playing`: accepting flips, with a `Locked` sub-state while a
//!   mismatched pair waits to flip back
//!
//! ## Timers
//!
//! The session owns its timer queue. The clock's periodic tick and the
//! pending mismatch revert are both entries in it, fired by `advance`.
//! Ending, abandoning or restarting a game cancels them explicitly.
//!
//! The session never touches the record store. `MemoryGame` reads records
//! when a game starts and settles them when `finish` reports a result.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::events::{CardView, GameEvent};
use super::flips::FlipStack;
use crate::cards::{CardFace, CardRef};
use crate::core::{Clock, Difficulty, Elapsed, GameError, TimerId, TimerQueue};
use crate::deck::Board;
use crate::records::BestRecord;

/// Top-level state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Playing,
}

/// Input state while playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayState {
    AwaitingInput,
    /// A mismatch revert is pending; flips are rejected.
    Locked,
    /// The host paused the game; flips are rejected and the clock is stopped.
    Paused,
}

/// Work scheduled on the session's timer queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Clock tick.
    Tick,
    /// Turn a mismatched pair back face-down.
    Revert { pending: CardRef, flipped: CardRef },
}

/// Result of a finished session, before records are settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinalScore {
    pub difficulty: Difficulty,
    pub moves: u32,
    pub elapsed: Elapsed,
}

/// Timings captured when a game starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Timing {
    revert_delay_ms: u64,
    tick_interval_ms: u64,
}

/// State of one game and the timers serving it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    difficulty: Difficulty,
    phase: Phase,
    board: Board,
    flips: FlipStack,
    moves: u32,
    clock: Clock,
    locked: bool,
    paused: bool,
    /// Records loaded at start, for live pace indication.
    best: BestRecord,
    timing: Timing,
    timers: TimerQueue<TimerEvent>,
    revert_timer: Option<TimerId>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// An idle session with an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            difficulty: Difficulty::default(),
            phase: Phase::Idle,
            board: Board::default(),
            flips: FlipStack::new(),
            moves: 0,
            clock: Clock::new(),
            locked: false,
            paused: false,
            best: BestRecord::default(),
            timing: Timing {
                revert_delay_ms: crate::core::DEFAULT_REVERT_DELAY_MS,
                tick_interval_ms: crate::core::DEFAULT_TICK_INTERVAL_MS,
            },
            timers: TimerQueue::new(),
            revert_timer: None,
        }
    }

    // === Queries ===

    /// Difficulty of the current (or last) game.
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a game is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// True while a mismatch revert is pending.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Input state, or `None` when idle.
    #[must_use]
    pub fn play_state(&self) -> Option<PlayState> {
        match (self.phase, self.paused, self.locked) {
            (Phase::Idle, _, _) => None,
            (Phase::Playing, true, _) => Some(PlayState::Paused),
            (Phase::Playing, false, true) => Some(PlayState::Locked),
            (Phase::Playing, false, false) => Some(PlayState::AwaitingInput),
        }
    }

    /// Current board. Stays visible after a game ends.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Move counter.
    #[must_use]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Clock reading. Zero after a game ends.
    #[must_use]
    pub fn elapsed(&self) -> Elapsed {
        self.clock.elapsed()
    }

    /// Pending face-up cards, oldest first.
    #[must_use]
    pub fn pending(&self) -> &[CardRef] {
        self.flips.as_slice()
    }

    /// Records loaded when the game started.
    #[must_use]
    pub fn best(&self) -> BestRecord {
        self.best
    }

    /// Virtual time of the session's timer queue.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Number of live timers (tick subscription plus pending revert).
    #[must_use]
    pub fn live_timers(&self) -> usize {
        self.timers.len()
    }

    /// True once every card on a dealt board is matched.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.board.is_cleared()
    }

    // === Transitions ===

    /// Check a decoded session before it is driven.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.timing.tick_interval_ms == 0 {
            return Err(GameError::InvalidConfig("tick_interval_ms must be positive"));
        }
        if !self.timers.intervals_valid() {
            return Err(GameError::InvalidConfig("periodic timer interval must be positive"));
        }
        if !self.board.is_empty() && !self.board.validate() {
            return Err(GameError::InvalidConfig("board does not hold exact pairs"));
        }
        Ok(())
    }

    /// Begin a game on `board`. Ignored unless idle.
    ///
    /// The move counter restarts at zero; its first increment is spent on
    /// setup, so the host sees `MovesChanged { moves: 0 }`. The timings come
    /// from a validated `GameConfig`.
    pub(crate) fn begin(
        &mut self,
        difficulty: Difficulty,
        board: Board,
        best: BestRecord,
        revert_delay_ms: u64,
        tick_interval_ms: u64,
    ) -> Vec<GameEvent> {
        if self.phase != Phase::Idle {
            trace!("Ignoring start while a game is running");
            return Vec::new();
        }

        self.cancel_revert();
        self.clock.reset(&mut self.timers);

        self.difficulty = difficulty;
        self.phase = Phase::Playing;
        self.board = board;
        self.flips.clear();
        self.moves = 0;
        self.locked = false;
        self.paused = false;
        self.best = best;
        self.timing = Timing {
            revert_delay_ms,
            tick_interval_ms,
        };
        self.clock.start(&mut self.timers, tick_interval_ms, TimerEvent::Tick);

        debug!("Started {} game with {} cards", difficulty, self.board.len());

        let cards = self
            .board
            .iter()
            .map(|c| CardView {
                card: c.card_ref,
                face: c.face(),
            })
            .collect();

        vec![
            GameEvent::BestRecordShown {
                difficulty,
                record: best,
            },
            GameEvent::BoardDealt { difficulty, cards },
            GameEvent::MovesChanged {
                moves: self.moves,
                new_record: self.best.moves_within(self.moves),
            },
            GameEvent::TimeChanged {
                elapsed: Elapsed::ZERO,
                new_record: true,
            },
        ]
    }

    /// Flip a card. Returns no events if the flip is not allowed.
    ///
    /// Allowed only while playing, unlocked and unpaused, for a card on the
    /// board that is neither the pending card nor already matched.
    pub fn flip(&mut self, card: CardRef) -> Vec<GameEvent> {
        if self.phase != Phase::Playing || self.locked || self.paused {
            trace!("Ignoring flip of {} in {:?}", card, self.play_state());
            return Vec::new();
        }
        if self.flips.top() == Some(card) {
            trace!("Ignoring second flip of pending {}", card);
            return Vec::new();
        }
        let Some(target) = self.board.get_mut(card) else {
            trace!("Ignoring flip of {} outside the board", card);
            return Vec::new();
        };
        if target.matched || target.face_up {
            trace!("Ignoring flip of revealed {}", card);
            return Vec::new();
        }

        target.face_up = true;
        let identity = target.identity;

        self.moves = self.moves.saturating_add(1);
        let mut events = vec![
            GameEvent::MovesChanged {
                moves: self.moves,
                new_record: self.best.moves_within(self.moves),
            },
            GameEvent::CardTurned {
                card,
                face: CardFace::Up(identity),
            },
        ];

        let Some(pending) = self.flips.top() else {
            self.flips.push(card);
            return events;
        };

        let is_match = self.board.get(pending).is_some_and(|p| p.identity == identity);
        if is_match {
            for matched in [pending, card] {
                if let Some(c) = self.board.get_mut(matched) {
                    c.matched = true;
                }
            }
            self.flips.clear();
            debug!("Matched {} and {} ({})", pending, card, identity);
            events.push(GameEvent::PairMatched {
                first: pending,
                second: card,
            });
        } else {
            self.locked = true;
            self.revert_timer = Some(self.timers.schedule_once(
                self.timing.revert_delay_ms,
                TimerEvent::Revert {
                    pending,
                    flipped: card,
                },
            ));
            debug!("Missed {} and {}, reverting in {}ms", pending, card, self.timing.revert_delay_ms);
            events.push(GameEvent::PairMissed {
                first: pending,
                second: card,
            });
        }

        events
    }

    /// Move virtual time forward, firing due ticks and reverts in order.
    pub fn advance(&mut self, ms: u64) -> Vec<GameEvent> {
        let target = self.timers.now_ms().saturating_add(ms);
        let mut events = Vec::new();

        while let Some((id, event)) = self.timers.pop_due(target) {
            match event {
                TimerEvent::Tick => {
                    if let Some(elapsed) = self.clock.on_tick(id) {
                        events.push(GameEvent::TimeChanged {
                            elapsed,
                            new_record: elapsed.within(self.best.best_time),
                        });
                    }
                }
                TimerEvent::Revert { pending, flipped } => {
                    if self.revert_timer == Some(id) {
                        events.extend(self.revert(pending, flipped));
                    }
                }
            }
        }

        self.timers.advance_to(target);
        events
    }

    fn revert(&mut self, pending: CardRef, flipped: CardRef) -> Vec<GameEvent> {
        self.revert_timer = None;

        let mut events = Vec::with_capacity(2);
        for card in [pending, flipped] {
            if let Some(c) = self.board.get_mut(card) {
                if !c.matched {
                    c.face_up = false;
                    events.push(GameEvent::CardTurned {
                        card,
                        face: CardFace::Down,
                    });
                }
            }
        }

        self.flips.pop();
        self.locked = false;
        events
    }

    fn cancel_revert(&mut self) {
        if let Some(id) = self.revert_timer.take() {
            self.timers.cancel(id);
        }
        self.locked = false;
    }

    /// Stop the clock and reject flips. Ignored unless playing and unpaused.
    pub fn pause(&mut self) -> Vec<GameEvent> {
        if self.phase != Phase::Playing || self.paused {
            return Vec::new();
        }
        self.paused = true;
        self.clock.stop(&mut self.timers);
        vec![GameEvent::Paused]
    }

    /// Restart the clock after `pause`.
    pub fn resume(&mut self) -> Vec<GameEvent> {
        if self.phase != Phase::Playing || !self.paused {
            return Vec::new();
        }
        self.paused = false;
        self.clock
            .start(&mut self.timers, self.timing.tick_interval_ms, TimerEvent::Tick);
        vec![GameEvent::Resumed]
    }

    /// End the running game and report its result.
    ///
    /// Cancels the clock and any pending revert, zeroes the clock and clears
    /// the pending cards. Returns `None` when idle, so a second call cannot
    /// settle records twice.
    pub fn finish(&mut self) -> Option<FinalScore> {
        if self.phase != Phase::Playing {
            return None;
        }

        let score = FinalScore {
            difficulty: self.difficulty,
            moves: self.moves,
            elapsed: self.clock.elapsed(),
        };

        self.teardown();
        Some(score)
    }

    /// Drop the running game without a result. Returns false when idle.
    pub fn abandon(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        self.teardown();
        true
    }

    fn teardown(&mut self) {
        self.phase = Phase::Idle;
        self.paused = false;
        self.cancel_revert();
        self.clock.reset(&mut self.timers);
        self.flips.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, ShuffleMode};

    fn started(difficulty: Difficulty, seed: u64) -> GameSession {
        let mut rng = GameRng::new(seed);
        let board = Board::deal(difficulty, &mut rng, ShuffleMode::FisherYates);
        let mut session = GameSession::new();
        session.begin(difficulty, board, BestRecord::default(), 1000, 10);
        session
    }

    /// A pair of cards sharing an identity, and one card that differs.
    fn pair_and_other(session: &GameSession) -> (CardRef, CardRef, CardRef) {
        let first = CardRef::new(0);
        let partner = session.board().partner_of(first).unwrap();
        let other = session
            .board()
            .iter()
            .map(|c| c.card_ref)
            .find(|&c| c != first && c != partner)
            .unwrap();
        (first, partner, other)
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = GameSession::new();

        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.play_state(), None);
        assert!(session.board().is_empty());
        assert_eq!(session.live_timers(), 0);
    }

    #[test]
    fn test_begin_emits_setup_events() {
        let mut rng = GameRng::new(1);
        let board = Board::deal(Difficulty::Easy, &mut rng, ShuffleMode::FisherYates);
        let mut session = GameSession::new();

        let events = session.begin(Difficulty::Easy, board, BestRecord::default(), 1000, 10);

        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], GameEvent::BestRecordShown { .. }));
        match &events[1] {
            GameEvent::BoardDealt { cards, .. } => {
                assert_eq!(cards.len(), 10);
                assert!(cards.iter().all(|c| c.face == CardFace::Down));
            }
            other => panic!("expected BoardDealt, got {:?}", other),
        }
        assert_eq!(events[2], GameEvent::MovesChanged { moves: 0, new_record: true });
        assert_eq!(session.play_state(), Some(PlayState::AwaitingInput));
        assert_eq!(session.live_timers(), 1);
    }

    #[test]
    fn test_begin_ignored_while_playing() {
        let mut session = started(Difficulty::Easy, 1);
        let before = session.board().clone();

        let events = session.begin(Difficulty::Hard, Board::default(), BestRecord::default(), 1000, 10);

        assert!(events.is_empty());
        assert_eq!(session.difficulty(), Difficulty::Easy);
        assert_eq!(session.board(), &before);
    }

    #[test]
    fn test_flip_while_idle_is_noop() {
        let mut session = GameSession::new();
        assert!(session.flip(CardRef::new(0)).is_empty());
        assert_eq!(session.moves(), 0);
    }

    #[test]
    fn test_first_flip_pends() {
        let mut session = started(Difficulty::Easy, 2);

        let events = session.flip(CardRef::new(3));

        assert_eq!(session.moves(), 1);
        assert_eq!(session.pending(), &[CardRef::new(3)]);
        assert!(session.board().get(CardRef::new(3)).unwrap().face_up);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_reflip_pending_card_is_noop() {
        let mut session = started(Difficulty::Easy, 2);
        session.flip(CardRef::new(3));

        assert!(session.flip(CardRef::new(3)).is_empty());
        assert_eq!(session.moves(), 1);
    }

    #[test]
    fn test_out_of_range_flip_is_noop() {
        let mut session = started(Difficulty::Easy, 2);
        assert!(session.flip(CardRef::new(10)).is_empty());
        assert_eq!(session.moves(), 0);
    }

    #[test]
    fn test_match_stays_face_up() {
        let mut session = started(Difficulty::Medium, 3);
        let (first, partner, _) = pair_and_other(&session);

        session.flip(first);
        let events = session.flip(partner);

        assert_eq!(
            events.last(),
            Some(&GameEvent::PairMatched {
                first,
                second: partner
            })
        );
        assert!(session.pending().is_empty());
        assert_eq!(session.moves(), 2);
        for card in [first, partner] {
            let c = session.board().get(card).unwrap();
            assert!(c.face_up && c.matched);
        }

        // Matched cards ignore input
        assert!(session.flip(first).is_empty());
        assert_eq!(session.moves(), 2);
    }

    #[test]
    fn test_mismatch_locks_then_reverts() {
        let mut session = started(Difficulty::Medium, 4);
        let (first, _, other) = pair_and_other(&session);

        session.flip(first);
        let events = session.flip(other);

        assert!(matches!(events.last(), Some(GameEvent::PairMissed { .. })));
        assert_eq!(session.play_state(), Some(PlayState::Locked));

        // Locked: third flip rejected
        let (_, partner, _) = pair_and_other(&session);
        assert!(session.flip(partner).is_empty());

        // Not yet
        session.advance(999);
        assert!(session.is_locked());

        let events = session.advance(1);
        let turned: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::CardTurned { face: CardFace::Down, .. }))
            .collect();
        assert_eq!(turned.len(), 2);
        assert!(!session.is_locked());
        assert!(session.pending().is_empty());
        assert!(!session.board().get(first).unwrap().face_up);
        assert!(!session.board().get(other).unwrap().face_up);
    }

    #[test]
    fn test_clock_runs_while_locked() {
        let mut session = started(Difficulty::Easy, 5);
        let (first, _, other) = pair_and_other(&session);

        session.flip(first);
        session.flip(other);
        session.advance(500);

        assert!(session.is_locked());
        assert_eq!(session.elapsed(), Elapsed::new(0, 0, 50));
    }

    #[test]
    fn test_pause_stops_clock_and_input() {
        let mut session = started(Difficulty::Easy, 6);
        session.advance(100);

        assert_eq!(session.pause(), vec![GameEvent::Paused]);
        assert!(session.pause().is_empty());
        session.advance(1000);
        assert_eq!(session.elapsed(), Elapsed::new(0, 0, 10));
        assert!(session.flip(CardRef::new(0)).is_empty());

        assert_eq!(session.resume(), vec![GameEvent::Resumed]);
        session.advance(100);
        assert_eq!(session.elapsed(), Elapsed::new(0, 0, 20));
    }

    #[test]
    fn test_finish_once() {
        let mut session = started(Difficulty::Easy, 7);
        session.flip(CardRef::new(0));
        session.advance(250);

        let score = session.finish().unwrap();
        assert_eq!(score.moves, 1);
        assert_eq!(score.elapsed, Elapsed::new(0, 0, 25));

        assert!(!session.is_active());
        assert_eq!(session.elapsed(), Elapsed::ZERO);
        assert!(session.pending().is_empty());
        assert_eq!(session.live_timers(), 0);
        assert_eq!(session.finish(), None);
    }

    #[test]
    fn test_abandon_cancels_pending_revert() {
        let mut session = started(Difficulty::Easy, 8);
        let (first, _, other) = pair_and_other(&session);
        session.flip(first);
        session.flip(other);

        assert!(session.abandon());
        assert_eq!(session.live_timers(), 0);

        let events = session.advance(5000);
        assert!(events.is_empty());
        // The mismatched cards were left as they were
        assert!(session.board().get(other).unwrap().face_up);
        assert!(!session.abandon());
    }

    #[test]
    fn test_revert_fires_while_paused() {
        let mut session = started(Difficulty::Easy, 9);
        let (first, _, other) = pair_and_other(&session);
        session.flip(first);
        session.flip(other);

        session.pause();
        let events = session.advance(1000);

        assert_eq!(events.len(), 2);
        assert!(!session.is_locked());
        assert!(session.is_paused());
        assert!(session.pending().is_empty());
        assert!(!session.board().get(first).unwrap().face_up);
        assert!(!session.board().get(other).unwrap().face_up);
        assert_eq!(session.elapsed(), Elapsed::ZERO);
    }

    #[test]
    fn test_validate_rejects_zero_tick_interval() {
        let mut session = started(Difficulty::Easy, 10);
        assert!(session.validate().is_ok());

        session.timing.tick_interval_ms = 0;
        let err = session.validate().unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_rejects_unpaired_board() {
        let mut session = started(Difficulty::Easy, 11);
        let mut cards = session.board().cards().to_vec();
        cards[1].identity = cards[0].identity;
        cards[1].copy = cards[0].copy;
        session.board = Board::from_cards(cards);

        assert!(session.validate().is_err());
        assert!(GameSession::new().validate().is_ok());
    }
}
