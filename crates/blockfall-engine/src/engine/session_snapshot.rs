use serde::{Deserialize, Serialize};

use crate::core::{BOARD_HEIGHT, BOARD_WIDTH, CellPos, PieceColor, PieceKind};

/// Read-only view of a session for one rendered frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Board occupancy, indexed as `[row][column]`.
    pub grid: [[bool; BOARD_WIDTH]; BOARD_HEIGHT],
    /// Absolute cells of the falling piece. Some may lie above row 0.
    pub active_cells: [CellPos; 4],
    pub active_kind: PieceKind,
    pub active_color: PieceColor,
    pub score: usize,
    pub lines: usize,
    pub paused: bool,
    pub game_over: bool,
}

impl SessionSnapshot {
    /// Checks if the falling piece covers the given cell.
    #[must_use]
    pub fn is_active_cell(&self, cell: CellPos) -> bool {
        self.active_cells.contains(&cell)
    }
}
