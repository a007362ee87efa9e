use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{BOARD_WIDTH, CellPos};

/// Offsets of the 4 cells of a piece, relative to its anchor.
pub type PieceShape = [CellPos; 4];

/// Rotates a shape 90° clockwise about its local origin.
///
/// Each offset `(x, y)` becomes `(-y, x)`. The same rule is applied to every
/// piece kind, so a shape does not stay inside its original bounding box.
///
/// # Example
///
/// ```
/// use blockfall_engine::rotate_cw;
///
/// let line = [(0, 0), (1, 0), (2, 0), (3, 0)];
/// assert_eq!(rotate_cw(line), [(0, 0), (0, 1), (0, 2), (0, 3)]);
/// ```
#[must_use]
pub const fn rotate_cw(shape: PieceShape) -> PieceShape {
    let mut rotated = shape;
    let mut i = 0;
    while i < shape.len() {
        let (x, y) = shape[i];
        rotated[i] = (-y, x);
        i += 1;
    }
    rotated
}

/// The falling piece: a template kind, an anchor on the board, and the
/// current offsets of its 4 cells after any rotations.
///
/// Pieces are immutable values. Translation and rotation return new `Piece`
/// instances; the caller decides whether to keep them after checking the board.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind};
///
/// let piece = Piece::new(PieceKind::T);
/// assert_eq!(piece.anchor(), (4, 0));
///
/// let moved = piece.translated(1, 2);
/// assert_eq!(moved.anchor(), (5, 2));
///
/// let rotated = moved.rotated_cw();
/// assert_eq!(rotated.anchor(), moved.anchor());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    kind: PieceKind,
    anchor: CellPos,
    shape: PieceShape,
}

impl Piece {
    /// Anchor of a freshly spawned piece: column `width / 2 - 1`, row 0.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const SPAWN_ANCHOR: CellPos = ((BOARD_WIDTH / 2 - 1) as i32, 0);

    /// Creates a piece of the given kind at the spawn anchor with its template shape.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            anchor: Self::SPAWN_ANCHOR,
            shape: kind.shape(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn anchor(&self) -> CellPos {
        self.anchor
    }

    #[must_use]
    pub fn shape(&self) -> PieceShape {
        self.shape
    }

    #[must_use]
    pub fn color(&self) -> PieceColor {
        self.kind.color()
    }

    /// Returns the absolute board cells covered by the piece.
    #[must_use]
    pub fn cells(&self) -> [CellPos; 4] {
        let (ax, ay) = self.anchor;
        self.shape.map(|(dx, dy)| (ax + dx, ay + dy))
    }

    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        let (x, y) = self.anchor;
        Self {
            anchor: (x + dx, y + dy),
            ..*self
        }
    }

    #[must_use]
    pub fn rotated_cw(&self) -> Self {
        Self {
            shape: rotate_cw(self.shape),
            ..*self
        }
    }
}

/// Display color of a piece kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PieceColor {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    /// 2×2 square.
    Square = 0,
    /// Straight line of four.
    Line = 1,
    L = 2,
    ReverseL = 3,
    T = 4,
    Z = 5,
    ReverseZ = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

const PIECE_SHAPES: [PieceShape; PieceKind::LEN] = [
    // Square
    [(0, 0), (1, 0), (0, 1), (1, 1)],
    // Line
    [(0, 0), (1, 0), (2, 0), (3, 0)],
    // L
    [(0, 0), (0, 1), (0, 2), (1, 2)],
    // Reverse L
    [(1, 0), (1, 1), (1, 2), (0, 2)],
    // T
    [(0, 0), (0, 1), (0, 2), (1, 1)],
    // Z
    [(0, 0), (1, 0), (1, 1), (2, 1)],
    // Reverse Z
    [(0, 1), (1, 1), (1, 0), (2, 0)],
];

const PIECE_COLORS: [PieceColor; PieceKind::LEN] = [
    PieceColor::new(255, 255, 0),
    PieceColor::new(0, 255, 255),
    PieceColor::new(255, 165, 0),
    PieceColor::new(0, 0, 255),
    PieceColor::new(128, 0, 128),
    PieceColor::new(255, 0, 0),
    PieceColor::new(0, 128, 0),
];

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Every piece kind, in catalogue order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::Square,
        PieceKind::Line,
        PieceKind::L,
        PieceKind::ReverseL,
        PieceKind::T,
        PieceKind::Z,
        PieceKind::ReverseZ,
    ];

    /// Returns the template offsets of this kind, before any rotation.
    #[must_use]
    pub const fn shape(self) -> PieceShape {
        PIECE_SHAPES[self as usize]
    }

    #[must_use]
    pub const fn color(self) -> PieceColor {
        PIECE_COLORS[self as usize]
    }
}
