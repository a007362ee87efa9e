use std::{
    collections::VecDeque,
    fs::{self, File},
    io::{BufWriter, Write as _},
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::Context;
use blockfall_engine::{Command, GameSession, GameStats, PieceSeed, SessionEvent};
use chrono::Utc;

use crate::schema::record::{RecordedSession, TurnRecord};

/// A wrapper around [`GameSession`] that records every piece lock.
///
/// Before each operation that may lock the falling piece, the current board
/// and falling piece are captured. If the number of completed pieces changes
/// during the operation, the capture is kept in the history.
#[derive(Debug)]
pub struct RecordingSession {
    session: GameSession,
    history: SessionHistory,
}

/// Read-only access to the underlying `GameSession`.
///
/// `DerefMut` is not implemented: mutations must go through
/// `RecordingSession` so that locks are recorded.
impl Deref for RecordingSession {
    type Target = GameSession;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl RecordingSession {
    pub fn new(seed: PieceSeed, history_size: usize) -> Self {
        Self {
            session: GameSession::new(seed),
            history: SessionHistory::new(seed, history_size),
        }
    }

    /// Consumes the session and returns the history with the final statistics.
    pub fn into_history(mut self) -> SessionHistory {
        self.history.final_stats = self.session.stats().clone();
        self.history
    }

    fn capture_snapshot(&self) -> TurnRecord {
        TurnRecord {
            turn: self.session.stats().completed_pieces(),
            before_placement: self.session.board().clone(),
            placement: self.session.falling_piece(),
        }
    }

    fn record_if_completed(&mut self, snapshot: TurnRecord) {
        if self.session.stats().completed_pieces() != snapshot.turn {
            self.history.record(snapshot);
        }
    }

    pub fn apply(&mut self, command: Command) -> Option<SessionEvent> {
        let snapshot = self.capture_snapshot();
        let event = self.session.apply(command);
        self.record_if_completed(snapshot);
        event
    }

    pub fn tick(&mut self) -> Option<SessionEvent> {
        let snapshot = self.capture_snapshot();
        let event = self.session.tick();
        self.record_if_completed(snapshot);
        event
    }
}

/// Recorded history of a game session.
///
/// Holds the seed, the final statistics and a ring buffer of recent locks.
/// Created by [`RecordingSession::into_history`].
#[derive(Debug)]
pub struct SessionHistory {
    seed: PieceSeed,
    final_stats: GameStats,
    buffer: RingBuffer<TurnRecord>,
}

impl SessionHistory {
    fn new(seed: PieceSeed, capacity: usize) -> Self {
        Self {
            seed,
            final_stats: GameStats::new(),
            buffer: RingBuffer::with_capacity(capacity),
        }
    }

    fn record(&mut self, snapshot: TurnRecord) {
        self.buffer.push(snapshot);
    }

    fn to_recorded_session(&self) -> RecordedSession {
        RecordedSession {
            recorded_at: Utc::now(),
            seed: self.seed,
            final_stats: self.final_stats.clone(),
            turns: self.buffer.to_vec(),
        }
    }

    /// Saves the recorded session as `manual_{YYYYMMDD_HHMMSS}.json` and
    /// returns the path of the written file.
    ///
    /// `record_dir` is created if it doesn't exist.
    pub fn save(&self, record_dir: &Path) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(record_dir)
            .with_context(|| format!("Failed to create directory {}", record_dir.display()))?;

        let data = self.to_recorded_session();
        let filename = format!("manual_{}.json", data.recorded_at.format("%Y%m%d_%H%M%S"));
        let filepath = record_dir.join(filename);

        let file = File::create(&filepath)
            .with_context(|| format!("Failed to create file: {}", filepath.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &data)
            .with_context(|| format!("Failed to write JSON to {}", filepath.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush output to {}", filepath.display()))?;

        Ok(filepath)
    }
}

/// A fixed-capacity ring buffer that overwrites oldest entries when full.
#[derive(Debug)]
struct RingBuffer<T> {
    capacity: usize,
    buf: VecDeque<T>,
}

impl<T> RingBuffer<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            buf: VecDeque::with_capacity(capacity),
        }
    }

    fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.buf.len() >= self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(item);
    }

    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.buf.iter().cloned().collect()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Board, Piece};

    use super::*;

    fn play_until_game_over(session: &mut RecordingSession) {
        while !session.session_state().is_game_over() {
            session.tick();
        }
    }

    #[test]
    fn test_ring_buffer_overwrites_oldest_when_full() {
        let mut buf: RingBuffer<i32> = RingBuffer::with_capacity(3);

        for i in 1..=3 {
            buf.push(i);
        }
        assert_eq!(buf.to_vec(), vec![1, 2, 3]);

        buf.push(4);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.to_vec(), vec![2, 3, 4]);

        for i in 5..=10 {
            buf.push(i);
        }
        assert_eq!(buf.to_vec(), vec![8, 9, 10]);
    }

    #[test]
    fn test_ring_buffer_capacity_zero() {
        let mut buf: RingBuffer<i32> = RingBuffer::with_capacity(0);
        buf.push(1);
        buf.push(2);

        assert_eq!(buf.len(), 0);
        assert_eq!(buf.to_vec(), Vec::<i32>::new());
    }

    #[test]
    fn test_records_every_lock() {
        let mut session = RecordingSession::new(PieceSeed::from(17), 1000);
        let first_piece = session.falling_piece();

        let mut event = None;
        while event.is_none() {
            event = session.apply(Command::SoftDrop);
        }
        assert!(matches!(event, Some(SessionEvent::PieceLocked { .. })));
        play_until_game_over(&mut session);

        let completed = session.stats().completed_pieces();
        let history = session.into_history();
        let turns = history.buffer.to_vec();
        assert_eq!(turns.len(), completed);
        assert_eq!(history.final_stats.completed_pieces(), completed);

        assert_eq!(turns[0].turn, 0);
        assert_eq!(turns[0].before_placement, Board::INITIAL);
        assert_eq!(turns[0].placement.kind(), first_piece.kind());
        assert_eq!(
            turns[0].placement,
            Piece::new(first_piece.kind()).translated(0, turns[0].placement.anchor().1)
        );
        for (i, turn) in turns.iter().enumerate() {
            assert_eq!(turn.turn, i);
        }
    }

    #[test]
    fn test_history_keeps_latest_turns() {
        let mut session = RecordingSession::new(PieceSeed::from(17), 2);
        play_until_game_over(&mut session);

        let completed = session.stats().completed_pieces();
        assert!(completed > 2);
        let turns = session.into_history().buffer.to_vec();
        assert_eq!(
            turns.iter().map(|turn| turn.turn).collect::<Vec<_>>(),
            vec![completed - 2, completed - 1]
        );
    }

    #[test]
    fn test_rejected_commands_are_not_recorded() {
        let mut session = RecordingSession::new(PieceSeed::from(4), 10);
        for _ in 0..20 {
            session.apply(Command::MoveLeft);
            session.apply(Command::Rotate);
        }
        session.apply(Command::TogglePause);
        session.tick();

        assert_eq!(session.into_history().buffer.len(), 0);
    }

    #[test]
    fn test_save_writes_json() {
        let mut session = RecordingSession::new(PieceSeed::from(5), 100);
        play_until_game_over(&mut session);
        let history = session.into_history();

        let dir = std::env::temp_dir().join(format!("blockfall-record-{}", std::process::id()));
        let path = history.save(&dir).unwrap();

        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(file_name.starts_with("manual_"));
        assert!(file_name.ends_with(".json"));

        let content = fs::read_to_string(&path).unwrap();
        let recorded: RecordedSession = serde_json::from_str(&content).unwrap();
        assert_eq!(recorded.seed, PieceSeed::from(5));
        assert_eq!(recorded.final_stats, history.final_stats);
        assert_eq!(recorded.turns, history.buffer.to_vec());

        fs::remove_dir_all(&dir).unwrap();
    }
}
