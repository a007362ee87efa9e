pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting falling piece")]
pub struct PieceCollisionError;

/// Reasons a piece lock ends the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CompletePieceDropError {
    #[display("piece locked with a cell on the top row or above it")]
    LockedTooHigh,
    #[display("new piece collides at its spawn position")]
    NewPieceCollision,
}
