use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::{BOARD_HEIGHT, BOARD_WIDTH, CellPos, piece::Piece};

// Bit N of a row corresponds to column N.
const FULL_ROW_MASK: u16 = (1 << BOARD_WIDTH) - 1;

/// Single row of the board stored as a bitmask.
///
/// # Bit Layout (LSB to MSB)
///
/// - Bits 0-9: columns 0 to 9
/// - Bits 10-15: unused, always zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardRow {
    bits: u16,
}

impl BoardRow {
    pub const EMPTY: Self = Self { bits: 0 };
    pub const FULL: Self = Self {
        bits: FULL_ROW_MASK,
    };

    /// Checks if every cell of the row is occupied.
    #[inline]
    #[must_use]
    pub fn is_complete(self) -> bool {
        (self.bits & FULL_ROW_MASK) == FULL_ROW_MASK
    }

    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Checks if the cell at column `x` is occupied.
    ///
    /// Columns outside the board are reported as empty.
    #[inline]
    #[must_use]
    pub fn is_cell_occupied(self, x: usize) -> bool {
        if x >= BOARD_WIDTH {
            return false;
        }
        let bit = 1 << x;
        (self.bits & bit) != 0
    }

    #[inline]
    fn occupy_cell(&mut self, x: usize) {
        let bit = 1 << x;
        self.bits |= bit;
    }

    /// Iterates over the cells of the row from column 0, returning their occupied status.
    #[inline]
    pub fn iter_cells(self) -> impl Iterator<Item = bool> {
        (0..BOARD_WIDTH).map(move |x| self.is_cell_occupied(x))
    }
}

/// Result of committing cells to the board.
///
/// `TooHigh` means at least one committed cell sits on row 0 or above it,
/// which ends the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum LockHeight {
    InBounds,
    TooHigh,
}

/// The 10×20 occupancy grid.
///
/// Each row is a [`BoardRow`] bitmask. Row 0 is the top row.
///
/// Collision testing ([`is_blocked`](Self::is_blocked)) rejects cells left
/// of column 0, right of the last column, below the last row, and on occupied
/// cells. Cells above row 0 are *not* rejected: a piece may poke out of the
/// top of the board while it falls. Overflowing the top is caught separately
/// when the piece is committed (see [`commit`](Self::commit)).
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind};
///
/// let mut board = Board::INITIAL;
/// let piece = Piece::new(PieceKind::Line).translated(0, 19);
///
/// assert!(!board.is_colliding(&piece));
/// assert!(board.commit_piece(&piece).is_in_bounds());
/// assert!(board.is_occupied((4, 19)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "000,000,...,3ff" (comma-separated hex values, top row first)
        let mut hex_string = String::with_capacity(BOARD_HEIGHT * 4);
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                hex_string.push(',');
            }
            write!(&mut hex_string, "{:03x}", row.bits).map_err(serde::ser::Error::custom)?;
        }
        serializer.serialize_str(&hex_string)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != BOARD_HEIGHT {
            return Err(serde::de::Error::custom(format!(
                "expected {} comma-separated hex values, got {}",
                BOARD_HEIGHT,
                parts.len()
            )));
        }

        let mut rows = [BoardRow::EMPTY; BOARD_HEIGHT];
        for (i, hex_str) in parts.iter().enumerate() {
            let bits = u16::from_str_radix(hex_str, 16).map_err(|e| {
                serde::de::Error::custom(format!("invalid hex at row {i}: {hex_str} ({e})"))
            })?;
            if bits & !FULL_ROW_MASK != 0 {
                return Err(serde::de::Error::custom(format!(
                    "row {i} has bits outside the board: {hex_str}"
                )));
            }
            rows[i] = BoardRow { bits };
        }

        Ok(Board { rows })
    }
}

impl Board {
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const INITIAL: Self = Self {
        rows: [BoardRow::EMPTY; BOARD_HEIGHT],
    };

    fn column_index(x: i32) -> Option<usize> {
        usize::try_from(x).ok().filter(|&x| x < BOARD_WIDTH)
    }

    fn row_index(y: i32) -> Option<usize> {
        usize::try_from(y).ok().filter(|&y| y < BOARD_HEIGHT)
    }

    /// Returns the row at index `y` (0 is the top row).
    #[must_use]
    pub fn row(&self, y: usize) -> BoardRow {
        self.rows[y]
    }

    /// Returns an iterator over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = BoardRow> + '_ {
        self.rows.iter().copied()
    }

    /// Checks if the cell is inside the grid and occupied.
    #[must_use]
    pub fn is_occupied(&self, (x, y): CellPos) -> bool {
        match (Self::column_index(x), Self::row_index(y)) {
            (Some(x), Some(y)) => self.rows[y].is_cell_occupied(x),
            _ => false,
        }
    }

    fn is_cell_blocked(&self, (x, y): CellPos) -> bool {
        let Some(x) = Self::column_index(x) else {
            return true;
        };
        // The top edge is open: rows above the board read as empty.
        let Ok(y) = usize::try_from(y) else {
            return false;
        };
        y >= BOARD_HEIGHT || self.rows[y].is_cell_occupied(x)
    }

    /// Checks if any of the given absolute cells is blocked.
    ///
    /// A cell is blocked when it is left or right of the grid, below the last
    /// row, or on an occupied cell. Cells above row 0 are never blocked.
    #[must_use]
    pub fn is_blocked(&self, cells: &[CellPos]) -> bool {
        cells.iter().any(|&cell| self.is_cell_blocked(cell))
    }

    /// Checks if the piece's cells are blocked at its current anchor.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        self.is_blocked(&piece.cells())
    }

    /// Marks the given cells as occupied.
    ///
    /// The caller must have checked the cells with [`is_blocked`](Self::is_blocked).
    /// Cells above the grid cannot be stored and are dropped.
    ///
    /// Returns [`LockHeight::TooHigh`] if any cell is on row 0 or above it.
    pub fn commit(&mut self, cells: &[CellPos]) -> LockHeight {
        let mut height = LockHeight::InBounds;
        for &(x, y) in cells {
            if y <= 0 {
                height = LockHeight::TooHigh;
            }
            if let (Some(x), Some(y)) = (Self::column_index(x), Self::row_index(y)) {
                self.rows[y].occupy_cell(x);
            }
        }
        height
    }

    /// Locks a piece onto the board by marking its cells as occupied.
    pub fn commit_piece(&mut self, piece: &Piece) -> LockHeight {
        self.commit(&piece.cells())
    }

    /// Clears completed rows and returns the number of rows cleared.
    ///
    /// Rows are scanned from top to bottom. Each completed row triggers its
    /// own shift: every row above it moves down by one and row 0 becomes empty.
    pub fn clear_completed_rows(&mut self) -> usize {
        let mut count = 0;
        for y in 0..BOARD_HEIGHT {
            if !self.rows[y].is_complete() {
                continue;
            }
            self.rows.copy_within(0..y, 1);
            self.rows[0] = BoardRow::EMPTY;
            count += 1;
        }
        count
    }

    /// Returns the occupancy of every cell, indexed as `[row][column]`.
    #[must_use]
    pub fn occupancy(&self) -> [[bool; BOARD_WIDTH]; BOARD_HEIGHT] {
        let mut grid = [[false; BOARD_WIDTH]; BOARD_HEIGHT];
        for (grid_row, row) in grid.iter_mut().zip(self.rows) {
            for (cell, occupied) in grid_row.iter_mut().zip(row.iter_cells()) {
                *cell = occupied;
            }
        }
        grid
    }

    /// Creates a `Board` from ASCII art representation for testing.
    ///
    /// '#' represents an occupied cell, '.' represents an empty cell.
    /// Each row must be 10 cells wide. Up to 20 rows may be given; they are
    /// aligned to the bottom of the board, so the last line is row 19.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::INITIAL;
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= BOARD_HEIGHT,
            "At most {BOARD_HEIGHT} rows are allowed, got {}",
            lines.len()
        );

        let top = BOARD_HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                chars.len(),
                BOARD_WIDTH,
                "Each row must have exactly {} cells, got {} at row {}",
                BOARD_WIDTH,
                chars.len(),
                i
            );

            for (x, &ch) in chars.iter().enumerate() {
                if ch == '#' {
                    board.rows[top + i].occupy_cell(x);
                }
            }
        }
        board
    }
}
