use crate::{
    CompletePieceDropError, PieceCollisionError,
    core::{Board, Piece},
};

use super::piece_generator::{PieceGenerator, PieceSeed};

/// Result of [`GameField::move_piece`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveOutcome {
    /// The piece moved to the new anchor.
    Moved,
    /// The move was rejected and nothing changed.
    Blocked,
    /// A downward move was rejected, so the piece locked in place.
    ///
    /// `result` is an error when the lock ends the game.
    Locked {
        cleared_lines: usize,
        result: Result<(), CompletePieceDropError>,
    },
}

/// The piece controller: the board, the falling piece and the generator
/// that picks the next one.
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    falling_piece: Piece,
    generator: PieceGenerator,
}

impl GameField {
    /// Creates a field with an empty board.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::from_parts(Board::INITIAL, PieceGenerator::with_seed(seed))
    }

    /// Creates a field on an existing board.
    ///
    /// The first piece is spawned without checking the board, so a board
    /// that covers the spawn area yields a colliding falling piece.
    #[must_use]
    pub fn with_board(board: Board, seed: PieceSeed) -> Self {
        Self::from_parts(board, PieceGenerator::with_seed(seed))
    }

    fn from_parts(board: Board, mut generator: PieceGenerator) -> Self {
        let falling_piece = Piece::new(generator.next_kind());
        Self {
            board,
            falling_piece,
            generator,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.falling_piece
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.generator.seed()
    }

    /// Replaces the falling piece if it fits on the board.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.is_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    /// Translates the falling piece by `(dx, dy)` if the target cells are free.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> Result<(), PieceCollisionError> {
        self.set_falling_piece(self.falling_piece.translated(dx, dy))
    }

    /// Rotates the falling piece clockwise around its anchor if the rotated
    /// cells are free. No kicks are attempted.
    pub fn try_rotate(&mut self) -> Result<(), PieceCollisionError> {
        self.set_falling_piece(self.falling_piece.rotated_cw())
    }

    /// Moves the falling piece, locking it when a downward move is blocked.
    ///
    /// A blocked move with `dy <= 0` changes nothing.
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> MoveOutcome {
        if self.try_move(dx, dy).is_ok() {
            return MoveOutcome::Moved;
        }
        if dy <= 0 {
            return MoveOutcome::Blocked;
        }
        let (cleared_lines, result) = self.complete_piece_drop();
        MoveOutcome::Locked {
            cleared_lines,
            result,
        }
    }

    /// Replaces the falling piece with a fresh one from the generator.
    ///
    /// The new piece is kept even when it collides; the error tells the
    /// caller that the game cannot continue.
    pub fn spawn(&mut self) -> Result<(), PieceCollisionError> {
        self.falling_piece = Piece::new(self.generator.next_kind());
        if self.board.is_colliding(&self.falling_piece) {
            return Err(PieceCollisionError);
        }
        Ok(())
    }

    /// Locks the falling piece, clears completed rows and spawns the next piece.
    ///
    /// Returns the number of cleared rows together with the top-out check.
    /// A lock on row 0 or above wins over a collision of the new piece.
    pub fn complete_piece_drop(&mut self) -> (usize, Result<(), CompletePieceDropError>) {
        let height = self.board.commit_piece(&self.falling_piece);
        let cleared_lines = self.board.clear_completed_rows();
        let spawned = self.spawn();

        if height.is_too_high() {
            return (cleared_lines, Err(CompletePieceDropError::LockedTooHigh));
        }
        if spawned.is_err() {
            return (
                cleared_lines,
                Err(CompletePieceDropError::NewPieceCollision),
            );
        }
        (cleared_lines, Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use crate::PieceKind;

    use super::*;

    fn field_with(board: &str, piece: Piece) -> GameField {
        let mut field = GameField::with_board(Board::from_ascii(board), PieceSeed::from(0));
        field.set_falling_piece(piece).unwrap();
        field
    }

    #[test]
    fn test_new_field_spawns_at_start() {
        let field = GameField::with_seed(PieceSeed::from(3));
        assert_eq!(field.board(), &Board::INITIAL);
        assert_eq!(field.falling_piece().anchor(), Piece::SPAWN_ANCHOR);
        assert_eq!(
            field.falling_piece().shape(),
            field.falling_piece().kind().shape()
        );
        assert_eq!(field.seed(), PieceSeed::from(3));
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let mut a = GameField::with_seed(PieceSeed::from(9));
        let mut b = GameField::with_seed(PieceSeed::from(9));
        for _ in 0..10 {
            assert_eq!(a.falling_piece(), b.falling_piece());
            a.spawn().unwrap();
            b.spawn().unwrap();
        }
    }

    #[test]
    fn test_move_translates_piece() {
        let mut field = field_with("", Piece::new(PieceKind::T));

        assert_eq!(field.move_piece(-1, 0), MoveOutcome::Moved);
        assert_eq!(field.move_piece(0, 1), MoveOutcome::Moved);
        assert_eq!(field.falling_piece().anchor(), (3, 1));
    }

    #[test]
    fn test_blocked_horizontal_move_is_noop() {
        let piece = Piece::new(PieceKind::Line).translated(-4, 3);
        let mut field = field_with("", piece);

        assert_eq!(field.move_piece(-1, 0), MoveOutcome::Blocked);
        assert_eq!(field.falling_piece(), piece);
        assert_eq!(field.board(), &Board::INITIAL);

        let piece = Piece::new(PieceKind::Line).translated(2, 3);
        field.set_falling_piece(piece).unwrap();
        assert_eq!(field.move_piece(1, 0), MoveOutcome::Blocked);
        assert_eq!(field.falling_piece(), piece);
    }

    #[test]
    fn test_move_down_locks_on_occupied_cell() {
        let board = "
            ####......
        ";
        let piece = Piece::new(PieceKind::Square).translated(0, 17);
        let mut field = field_with(board, piece);

        assert!(field.try_move(-4, 0).is_ok());
        assert_eq!(field.falling_piece().anchor(), (0, 17));
        assert_eq!(field.move_piece(0, 1), MoveOutcome::Locked {
            cleared_lines: 0,
            result: Ok(())
        });
        assert!(field.board().is_occupied((0, 17)));
        assert!(field.board().is_occupied((1, 18)));
    }

    #[test]
    fn test_upward_move_is_allowed_above_top() {
        let mut field = field_with("", Piece::new(PieceKind::Square));

        assert_eq!(field.move_piece(0, -1), MoveOutcome::Moved);
        assert_eq!(field.falling_piece().anchor(), (4, -1));
    }

    #[test]
    fn test_blocked_upward_move_is_noop() {
        let board = "
            ....#.....
            ..........
        ";
        let piece = Piece::new(PieceKind::Line).translated(0, 19);
        let mut field = field_with(board, piece);

        assert_eq!(field.move_piece(0, -1), MoveOutcome::Blocked);
        assert_eq!(field.falling_piece(), piece);
        assert_eq!(field.falling_piece().anchor(), (4, 19));
        assert_eq!(field.board(), &Board::from_ascii(board));
    }

    #[test]
    fn test_rotate_keeps_anchor() {
        let piece = Piece::new(PieceKind::Line).translated(0, 5);
        let mut field = field_with("", piece);

        field.try_rotate().unwrap();
        assert_eq!(field.falling_piece().anchor(), piece.anchor());
        assert_eq!(field.falling_piece().cells(), [
            (4, 5),
            (4, 6),
            (4, 7),
            (4, 8)
        ]);
    }

    #[test]
    fn test_rotate_rejected_without_kick() {
        // A vertical line against the left wall rotates into negative columns.
        let piece = Piece::new(PieceKind::Line)
            .rotated_cw()
            .translated(-4, 5);
        let mut field = field_with("", piece);
        assert_eq!(piece.cells(), [(0, 5), (0, 6), (0, 7), (0, 8)]);

        assert!(field.try_rotate().is_err());
        assert_eq!(field.falling_piece(), piece);
    }

    #[test]
    fn test_rotate_blocked_by_occupied_cell() {
        let board = "
            ....#.....
        ";
        let mut field = field_with(board, Piece::new(PieceKind::Line).translated(0, 15));
        assert!(field.try_rotate().is_ok());

        let piece = Piece::new(PieceKind::Line).translated(0, 16);
        let mut field = field_with(board, piece);
        assert!(field.try_rotate().is_err());
        assert_eq!(field.falling_piece(), piece);
    }

    #[test]
    fn test_lock_on_floor_spawns_next_piece() {
        let piece = Piece::new(PieceKind::Line).translated(0, 19);
        let mut field = field_with("", piece);

        let outcome = field.move_piece(0, 1);
        assert_eq!(outcome, MoveOutcome::Locked {
            cleared_lines: 0,
            result: Ok(())
        });
        for x in 4..8 {
            assert!(field.board().is_occupied((x, 19)));
        }
        assert_eq!(field.falling_piece().anchor(), Piece::SPAWN_ANCHOR);
    }

    #[test]
    fn test_lock_clears_completed_row() {
        let board = "
            ####.#####
        ";
        let piece = Piece::new(PieceKind::Line).rotated_cw().translated(0, 16);
        assert_eq!(piece.cells(), [(4, 16), (4, 17), (4, 18), (4, 19)]);
        let mut field = field_with(board, piece);

        let outcome = field.move_piece(0, 1);
        assert_eq!(outcome, MoveOutcome::Locked {
            cleared_lines: 1,
            result: Ok(())
        });
        let expected = Board::from_ascii(
            "
            ....#.....
            ....#.....
            ....#.....
        ",
        );
        assert_eq!(field.board(), &expected);
    }

    #[test]
    fn test_lock_too_high() {
        let mut board = Board::INITIAL;
        let column: Vec<_> = (1..20).map(|y| (4, y)).collect();
        assert!(board.commit(&column).is_in_bounds());

        // The square covers rows -1 and 0 and rests on the column.
        let piece = Piece::new(PieceKind::Square).translated(0, -1);
        let mut field = GameField::with_board(board, PieceSeed::from(0));
        field.set_falling_piece(piece).unwrap();

        let outcome = field.move_piece(0, 1);
        assert_eq!(outcome, MoveOutcome::Locked {
            cleared_lines: 0,
            result: Err(CompletePieceDropError::LockedTooHigh)
        });
        assert!(field.board().is_occupied((5, 0)));
    }

    fn spawn_blocked_board() -> Board {
        let mut board = Board::INITIAL;
        assert!(board.commit(&[(4, 0), (5, 0)]).is_too_high());
        board
    }

    #[test]
    fn test_new_piece_collision() {
        let mut field = GameField::with_board(spawn_blocked_board(), PieceSeed::from(5));
        field
            .set_falling_piece(Piece::new(PieceKind::Line).translated(-4, 19))
            .unwrap();

        let (cleared_lines, result) = field.complete_piece_drop();
        assert_eq!(cleared_lines, 0);
        assert_eq!(result, Err(CompletePieceDropError::NewPieceCollision));
    }

    #[test]
    fn test_spawn_reports_collision() {
        let mut field = GameField::with_board(spawn_blocked_board(), PieceSeed::from(11));
        for _ in 0..PieceKind::LEN * 3 {
            assert!(field.spawn().is_err());
            assert_eq!(field.falling_piece().anchor(), Piece::SPAWN_ANCHOR);
        }
    }
}
