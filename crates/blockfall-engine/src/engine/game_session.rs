use crate::{
    CompletePieceDropError,
    core::{Board, Piece},
};

use super::{
    GameStats, SessionSnapshot,
    game_field::{GameField, MoveOutcome},
    piece_generator::PieceSeed,
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// Discrete input commands accepted by a [`GameSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    TogglePause,
    Quit,
}

/// Final score and displayed line count of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub score: usize,
    pub lines: usize,
}

/// Notable things that happened while applying a command or a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionEvent {
    /// The pause flag flipped. Front-ends mirror it onto audio muting.
    PauseToggled { paused: bool },
    /// The falling piece locked and the game goes on.
    PieceLocked { cleared_lines: usize },
    /// The falling piece locked and ended the game.
    GameOver {
        cause: CompletePieceDropError,
        summary: GameSummary,
    },
    /// The player asked to end the session.
    QuitRequested,
}

/// A whole game: the piece controller, the score and the pause/game-over state.
///
/// Rejected moves and rotations are silently ignored. Once the game is over,
/// every command except [`Command::Quit`] is ignored and ticks do nothing.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Command, GameSession, PieceSeed};
///
/// let mut session = GameSession::new(PieceSeed::from(1));
/// session.apply(Command::MoveLeft);
/// session.apply(Command::Rotate);
///
/// while !session.session_state().is_game_over() {
///     session.tick();
/// }
///
/// let summary = session.summary();
/// assert_eq!(summary.lines, summary.score / 5);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    field: GameField,
    stats: GameStats,
    session_state: SessionState,
}

impl GameSession {
    #[must_use]
    pub fn new(seed: PieceSeed) -> Self {
        Self::with_field(GameField::with_seed(seed))
    }

    /// Starts a session from a prepared field.
    #[must_use]
    pub fn with_field(field: GameField) -> Self {
        Self {
            field,
            stats: GameStats::new(),
            session_state: SessionState::Playing,
        }
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        &self.session_state
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.field.board()
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.field.falling_piece()
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.field.seed()
    }

    #[must_use]
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.stats.score(),
            lines: self.stats.lines(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let piece = self.field.falling_piece();
        SessionSnapshot {
            grid: self.field.board().occupancy(),
            active_cells: piece.cells(),
            active_kind: piece.kind(),
            active_color: piece.color(),
            score: self.stats.score(),
            lines: self.stats.lines(),
            paused: self.session_state.is_paused(),
            game_over: self.session_state.is_game_over(),
        }
    }

    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    /// Applies one input command.
    ///
    /// Movement is applied while paused as well; only gravity stops.
    pub fn apply(&mut self, command: Command) -> Option<SessionEvent> {
        match command {
            Command::Quit => Some(SessionEvent::QuitRequested),
            _ if self.session_state.is_game_over() => None,
            Command::MoveLeft => self.move_piece(-1, 0),
            Command::MoveRight => self.move_piece(1, 0),
            Command::SoftDrop => self.move_piece(0, 1),
            Command::Rotate => {
                self.field.try_rotate().ok();
                None
            }
            Command::TogglePause => {
                self.toggle_pause();
                Some(SessionEvent::PauseToggled {
                    paused: self.session_state.is_paused(),
                })
            }
        }
    }

    /// Applies one gravity step unless the session is paused or over.
    pub fn tick(&mut self) -> Option<SessionEvent> {
        if !self.session_state.is_playing() {
            return None;
        }
        self.move_piece(0, 1)
    }

    fn move_piece(&mut self, dx: i32, dy: i32) -> Option<SessionEvent> {
        let MoveOutcome::Locked {
            cleared_lines,
            result,
        } = self.field.move_piece(dx, dy)
        else {
            return None;
        };

        self.stats.complete_piece_drop(cleared_lines);
        if let Err(cause) = result {
            self.session_state = SessionState::GameOver;
            return Some(SessionEvent::GameOver {
                cause,
                summary: self.summary(),
            });
        }
        Some(SessionEvent::PieceLocked { cleared_lines })
    }
}
