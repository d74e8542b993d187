//! Game flow.
//!
//! - `session`: the flip/match state machine and its timers
//! - `engine`: `MemoryGame`, which deals boards and keeps records
//! - `events`: what the host renders
//! - `snapshot`: binary save and restore

mod engine;
mod events;
mod flips;
mod session;
mod snapshot;

pub use engine::MemoryGame;
pub use events::{CardView, GameEvent, GameOutcome};
pub use flips::FlipStack;
pub use session::{FinalScore, GameSession, Phase, PlayState, TimerEvent};
pub use snapshot::GameSnapshot;
