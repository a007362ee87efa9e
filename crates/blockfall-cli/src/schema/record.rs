use blockfall_engine::{Board, GameStats, Piece, PieceSeed};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recorded play session with metadata for replaying the piece sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedSession {
    /// Timestamp when recording was created (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    /// Random seed used for piece generation
    pub seed: PieceSeed,
    /// Final game statistics at the time of recording
    pub final_stats: GameStats,
    /// Most recent piece locks, oldest first
    pub turns: Vec<TurnRecord>,
}

/// The board just before a piece locked, and the piece as it locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Number of pieces locked before this one
    pub turn: usize,
    pub before_placement: Board,
    /// Anchor and rotated shape of the locked piece
    pub placement: Piece,
}
