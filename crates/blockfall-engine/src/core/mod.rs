pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Number of columns on the board.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows on the board.
pub const BOARD_HEIGHT: usize = 20;

/// A cell coordinate as `(column, row)`.
///
/// Row 0 is the top of the board and rows grow downward. Coordinates are
/// signed because a rotated piece can reach above row 0 or left of column 0
/// before the board rejects it.
pub type CellPos = (i32, i32);
