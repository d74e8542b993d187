//! The game engine: session plus dealing and record keeping.
//!
//! `MemoryGame` is what a host holds. It deals boards from its RNG, drives
//! the `GameSession` state machine, and settles best records against its
//! `RecordStore` when a game ends.
//!
//! # Example
//!
//! ```
//! use memory_match::{Difficulty, GameConfig, MemoryGame, MemoryStore};
//!
//! let config = GameConfig::new().with_seed(7);
//! let mut game = MemoryGame::new(config, MemoryStore::new()).unwrap();
//!
//! let events = game.start_game(Difficulty::Easy);
//! assert!(!events.is_empty());
//! assert!(game.is_active());
//! ```

use tracing::{debug, info, trace};

use super::events::{GameEvent, GameOutcome};
use super::session::{FinalScore, GameSession};
use crate::cards::CardRef;
use crate::core::{Difficulty, GameConfig, GameError, GameRng};
use crate::deck::Board;
use crate::records::{BestRecord, RecordStore};

/// A memory-matching game bound to a record store.
#[derive(Debug)]
pub struct MemoryGame<S: RecordStore> {
    pub(crate) config: GameConfig,
    pub(crate) rng: GameRng,
    pub(crate) session: GameSession,
    store: S,
}

impl<S: RecordStore> MemoryGame<S> {
    /// Create an idle game.
    ///
    /// Uses the configured seed, or OS entropy when none is set. Fails if
    /// the configuration does not validate.
    pub fn new(config: GameConfig, store: S) -> Result<Self, GameError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        debug!("Created game with seed {}", rng.seed());
        Ok(Self::from_parts(config, rng, GameSession::new(), store))
    }

    pub(crate) fn from_parts(config: GameConfig, rng: GameRng, session: GameSession, store: S) -> Self {
        Self {
            config,
            rng,
            session,
            store,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The state machine, for read-only inspection.
    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consume the game, returning its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Seed of the dealing RNG.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// True while a game is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.session.board()
    }

    /// Stored records for a difficulty, without starting a game.
    #[must_use]
    pub fn best_record(&self, difficulty: Difficulty) -> BestRecord {
        self.store.best_record(difficulty)
    }

    // === Operations ===

    /// Deal a board and start playing. Ignored while a game is running.
    pub fn start_game(&mut self, difficulty: Difficulty) -> Vec<GameEvent> {
        if self.session.is_active() {
            trace!("Ignoring start of {} game while playing", difficulty);
            return Vec::new();
        }

        let board = Board::deal(difficulty, &mut self.rng, self.config.shuffle);
        let best = self.store.best_record(difficulty);
        self.session.begin(
            difficulty,
            board,
            best,
            self.config.revert_delay_ms,
            self.config.tick_interval_ms,
        )
    }

    /// Start a game for a difficulty given by name.
    ///
    /// Fails with `InvalidDifficulty` before touching any state.
    pub fn start_game_named(&mut self, difficulty: &str) -> Result<Vec<GameEvent>, GameError> {
        let difficulty: Difficulty = difficulty.parse()?;
        Ok(self.start_game(difficulty))
    }

    /// Flip a card. Ends the game when the last pair is matched.
    pub fn handle_flip(&mut self, card: CardRef) -> Vec<GameEvent> {
        let mut events = self.session.flip(card);
        if self.session.is_active() && self.session.is_cleared() {
            events.extend(self.end_game());
        }
        events
    }

    /// Move virtual time forward by `ms`, firing due ticks and reverts.
    pub fn advance(&mut self, ms: u64) -> Vec<GameEvent> {
        self.session.advance(ms)
    }

    /// End the running game. Ignored when idle.
    ///
    /// Only a cleared board settles records: a stored value is replaced when
    /// the new one is strictly better (or nothing is stored yet), with times
    /// compared lexicographically on `(minutes, seconds, hundredths)`. A game
    /// ended early reports its result with both record flags false and
    /// leaves the store untouched.
    pub fn end_game(&mut self) -> Vec<GameEvent> {
        let cleared = self.session.is_cleared();
        let Some(score) = self.session.finish() else {
            trace!("Ignoring end while idle");
            return Vec::new();
        };

        let outcome = if cleared {
            self.settle(score)
        } else {
            debug!("Ended {} game before clearing the board", score.difficulty);
            self.unranked(score)
        };
        info!(
            "Finished {} game in {} moves, {} (new score: {}, new time: {})",
            outcome.difficulty, outcome.moves, outcome.elapsed, outcome.new_best_score, outcome.new_best_time
        );

        let record = self.store.best_record(outcome.difficulty);
        vec![
            GameEvent::GameFinished(outcome),
            GameEvent::BestRecordShown {
                difficulty: outcome.difficulty,
                record,
            },
        ]
    }

    fn settle(&mut self, score: FinalScore) -> GameOutcome {
        let FinalScore {
            difficulty,
            moves,
            elapsed,
        } = score;
        let previous = self.store.best_record(difficulty);

        let new_best_time = elapsed.beats(previous.best_time);
        if new_best_time {
            info!("New best {} time: {}", difficulty, elapsed);
            self.store.set_best_time(difficulty, elapsed);
        }

        let new_best_score = previous.best_score.map_or(true, |best| moves < best);
        if new_best_score {
            info!("New best {} score: {}", difficulty, moves);
            self.store.set_best_score(difficulty, moves);
        }

        GameOutcome {
            difficulty,
            moves,
            elapsed,
            new_best_score,
            new_best_time,
            previous,
        }
    }

    fn unranked(&self, score: FinalScore) -> GameOutcome {
        GameOutcome {
            difficulty: score.difficulty,
            moves: score.moves,
            elapsed: score.elapsed,
            new_best_score: false,
            new_best_time: false,
            previous: self.store.best_record(score.difficulty),
        }
    }

    /// Drop the running game without touching records.
    pub fn abandon_game(&mut self) -> Vec<GameEvent> {
        let difficulty = self.session.difficulty();
        if !self.session.abandon() {
            trace!("Ignoring abandon while idle");
            return Vec::new();
        }
        debug!("Abandoned {} game", difficulty);
        vec![GameEvent::GameAbandoned { difficulty }]
    }

    /// Stop the clock and ignore flips until `resume`.
    pub fn pause(&mut self) -> Vec<GameEvent> {
        self.session.pause()
    }

    pub fn resume(&mut self) -> Vec<GameEvent> {
        self.session.resume()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Elapsed;
    use crate::records::MemoryStore;

    fn game(seed: u64) -> MemoryGame<MemoryStore> {
        MemoryGame::new(GameConfig::new().with_seed(seed), MemoryStore::new()).unwrap()
    }

    /// Flip every pair in board order, never missing.
    fn clear_board<S: RecordStore>(game: &mut MemoryGame<S>) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let refs: Vec<CardRef> = game.board().iter().map(|c| c.card_ref).collect();
        for card in refs {
            if game.board().get(card).is_some_and(|c| c.matched) {
                continue;
            }
            let partner = game.board().partner_of(card).unwrap();
            events.extend(game.handle_flip(card));
            events.extend(game.handle_flip(partner));
        }
        events
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = GameConfig::new().with_tick_interval_ms(0);
        let err = MemoryGame::new(config, MemoryStore::new()).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
    }

    #[test]
    fn test_start_named_rejects_unknown() {
        let mut game = game(1);

        let err = game.start_game_named("extreme").unwrap_err();
        assert!(matches!(err, GameError::InvalidDifficulty(_)));
        assert!(!game.is_active());

        game.start_game_named(" Hard ").unwrap();
        assert_eq!(game.board().len(), 40);
    }

    #[test]
    fn test_start_ignored_while_playing() {
        let mut game = game(1);
        game.start_game(Difficulty::Easy);
        assert!(game.start_game(Difficulty::Hard).is_empty());
        assert_eq!(game.board().len(), 10);
    }

    #[test]
    fn test_clearing_board_ends_game() {
        let mut game = game(2);
        game.start_game(Difficulty::Easy);
        game.advance(1230);

        let events = clear_board(&mut game);

        let outcome = events
            .iter()
            .find_map(|e| match e {
                GameEvent::GameFinished(outcome) => Some(*outcome),
                _ => None,
            })
            .unwrap();
        assert_eq!(outcome.moves, 10);
        assert_eq!(outcome.elapsed, Elapsed::new(0, 1, 23));
        assert!(outcome.new_best_score && outcome.new_best_time);
        assert!(!game.is_active());

        let record = game.best_record(Difficulty::Easy);
        assert_eq!(record.best_score, Some(10));
        assert_eq!(record.best_time, Some(Elapsed::new(0, 1, 23)));
    }

    fn score(moves: u32, elapsed: Elapsed) -> FinalScore {
        FinalScore {
            difficulty: Difficulty::Easy,
            moves,
            elapsed,
        }
    }

    #[test]
    fn test_end_game_idempotent() {
        let mut game = game(3);
        game.start_game(Difficulty::Easy);
        clear_board(&mut game);

        let record = game.best_record(Difficulty::Easy);
        assert_eq!(record.best_score, Some(10));
        assert!(game.end_game().is_empty());
        assert_eq!(game.best_record(Difficulty::Easy), record);
    }

    #[test]
    fn test_early_end_leaves_store_empty() {
        let mut game = game(4);
        game.start_game(Difficulty::Hard);
        game.handle_flip(CardRef::new(0));
        game.advance(500);

        let events = game.end_game();

        match &events[0] {
            GameEvent::GameFinished(outcome) => {
                assert_eq!(outcome.moves, 1);
                assert_eq!(outcome.elapsed, Elapsed::new(0, 0, 50));
                assert!(!outcome.is_new_record());
            }
            other => panic!("expected GameFinished, got {:?}", other),
        }
        assert!(!game.is_active());
        assert!(game.store().is_empty());
        assert_eq!(game.best_record(Difficulty::Hard), BestRecord::default());
    }

    #[test]
    fn test_early_end_does_not_block_later_records() {
        let mut game = game(5);
        game.start_game(Difficulty::Easy);
        game.end_game();

        game.start_game(Difficulty::Easy);
        game.advance(3000);
        clear_board(&mut game);

        let record = game.best_record(Difficulty::Easy);
        assert_eq!(record.best_score, Some(10));
        assert_eq!(record.best_time, Some(Elapsed::new(0, 3, 0)));
    }

    #[test]
    fn test_settle_first_score() {
        let mut game = game(6);

        let outcome = game.settle(score(8, Elapsed::new(0, 20, 0)));

        assert!(outcome.new_best_score);
        assert_eq!(outcome.previous, BestRecord::default());
        assert_eq!(game.store().best_score(Difficulty::Easy), Some(8));
        assert_eq!(game.store().get("easyScore"), Some("8"));
    }

    #[test]
    fn test_settle_faster_time() {
        let mut store = MemoryStore::new();
        store.set_best_time(Difficulty::Easy, Elapsed::new(0, 10, 0));
        let mut game = MemoryGame::new(GameConfig::new().with_seed(7), store).unwrap();

        let outcome = game.settle(score(12, Elapsed::new(0, 5, 30)));

        assert!(outcome.new_best_time);
        assert_eq!(game.store().best_time(Difficulty::Easy), Some(Elapsed::new(0, 5, 30)));
        assert_eq!(game.store().get("easyTime"), Some("[0,5,30]"));
    }

    #[test]
    fn test_settle_slower_results_keep_records() {
        let mut store = MemoryStore::new();
        store.set_best_score(Difficulty::Easy, 10);
        store.set_best_time(Difficulty::Easy, Elapsed::new(0, 10, 0));
        let mut game = MemoryGame::new(GameConfig::new().with_seed(8), store).unwrap();

        let outcome = game.settle(score(14, Elapsed::new(0, 10, 1)));

        assert!(!outcome.is_new_record());
        assert_eq!(game.store().best_score(Difficulty::Easy), Some(10));
        assert_eq!(game.store().best_time(Difficulty::Easy), Some(Elapsed::new(0, 10, 0)));
    }

    #[test]
    fn test_ties_do_not_replace_records() {
        let mut store = MemoryStore::new();
        store.set_best_score(Difficulty::Easy, 10);
        store.set_best_time(Difficulty::Easy, Elapsed::ZERO);
        let mut game = MemoryGame::new(GameConfig::new().with_seed(4), store).unwrap();

        game.start_game(Difficulty::Easy);
        let events = clear_board(&mut game);

        let finished = events.iter().find_map(|e| match e {
            GameEvent::GameFinished(outcome) => Some(*outcome),
            _ => None,
        });
        let outcome = finished.unwrap();
        assert!(!outcome.is_new_record());
        assert_eq!(outcome.previous.best_score, Some(10));
    }

    #[test]
    fn test_abandon_keeps_records() {
        let mut game = game(5);
        game.start_game(Difficulty::Easy);
        game.handle_flip(CardRef::new(0));

        assert_eq!(
            game.abandon_game(),
            vec![GameEvent::GameAbandoned {
                difficulty: Difficulty::Easy
            }]
        );
        assert!(game.abandon_game().is_empty());
        assert_eq!(game.best_record(Difficulty::Easy), BestRecord::default());
        assert!(game.store().is_empty());
    }

    #[test]
    fn test_store_by_mut_ref() {
        let mut store = MemoryStore::new();
        {
            let mut game = MemoryGame::new(GameConfig::new().with_seed(6), &mut store).unwrap();
            game.start_game(Difficulty::Easy);
            clear_board(&mut game);
        }
        assert_eq!(store.best_score(Difficulty::Easy), Some(10));
    }
}
