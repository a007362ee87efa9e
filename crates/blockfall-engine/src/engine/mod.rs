//! Game logic on top of the core board and piece types.
//!
//! - [`GameField`] - Piece controller (board, falling piece, piece generator)
//! - [`GameSession`] - Whole game with score, pause and game-over state
//! - [`GameStats`] - Score and line-clear statistics
//! - [`PieceGenerator`] - Uniform piece selection from a single seeded RNG
//! - [`SessionSnapshot`] - Per-frame read-only view for front-ends
//!
//! # Game Flow
//!
//! 1. Start a [`GameSession`] with a [`PieceSeed`]
//! 2. Feed it [`Command`]s from the player and call [`GameSession::tick`]
//!    at a fixed interval for gravity
//! 3. When a downward move is blocked the piece locks, completed rows are
//!    cleared, the score is updated and the next piece spawns
//! 4. The game ends when a piece locks on the top row or the next piece
//!    cannot spawn
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Command, GameSession, PieceSeed, SessionEvent};
//!
//! let mut session = GameSession::new(PieceSeed::from(7));
//!
//! session.apply(Command::Rotate);
//! session.apply(Command::MoveRight);
//!
//! loop {
//!     match session.apply(Command::SoftDrop) {
//!         Some(SessionEvent::PieceLocked { cleared_lines }) => {
//!             println!("locked, {cleared_lines} rows cleared");
//!         }
//!         Some(SessionEvent::GameOver { summary, .. }) => {
//!             println!("game over with score {}", summary.score);
//!             break;
//!         }
//!         _ => {}
//!     }
//! }
//! ```

pub use self::{
    game_field::*, game_session::*, game_stats::*, piece_generator::*, session_snapshot::*,
};

mod game_field;
mod game_session;
mod game_stats;
mod piece_generator;
mod session_snapshot;
