use serde::{Deserialize, Serialize};

/// Points awarded per lock for each row of a simultaneous clear, squared.
const POINTS_PER_SQUARED_ROW: usize = 5;

/// Score and line-clear statistics for one session.
///
/// A lock that clears `n` rows at once awards `n² × 5` points as a single
/// lump. The displayed line count is derived from the score as `score / 5`,
/// so it drifts from the real number of cleared rows once multi-row clears
/// happen. The real count is kept in [`total_cleared_lines`](Self::total_cleared_lines).
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(2);
///
/// assert_eq!(stats.score(), 20);
/// assert_eq!(stats.lines(), 4);
/// assert_eq!(stats.total_cleared_lines(), 2);
/// assert_eq!(stats.line_cleared_counter()[2], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the displayed line count, `score / 5`.
    #[must_use]
    pub const fn lines(&self) -> usize {
        self.score / POINTS_PER_SQUARED_ROW
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns the number of rows actually removed from the board.
    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by the number of rows they cleared.
    ///
    /// Index 0 counts locks that cleared nothing. Locks clearing more than 4
    /// rows are not counted here.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece lock that cleared `cleared_lines` rows.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        if cleared_lines < self.line_cleared_counter.len() {
            self.line_cleared_counter[cleared_lines] += 1;
        }
        self.score += cleared_lines * cleared_lines * POINTS_PER_SQUARED_ROW;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_are_zero() {
        let stats = GameStats::new();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.lines(), 0);
        assert_eq!(stats.completed_pieces(), 0);
        assert_eq!(stats.total_cleared_lines(), 0);
        assert_eq!(stats.line_cleared_counter(), &[0; 5]);
    }

    #[test]
    fn test_score_is_squared_per_lock() {
        for (cleared, expected) in [(0, 0), (1, 5), (2, 20), (3, 45), (4, 80)] {
            let mut stats = GameStats::new();
            stats.complete_piece_drop(cleared);
            assert_eq!(stats.score(), expected, "{cleared} rows");
        }
    }

    #[test]
    fn test_lines_follow_score_not_cleared_rows() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(1);
        assert_eq!(stats.lines(), 1);

        stats.complete_piece_drop(2);
        assert_eq!(stats.score(), 25);
        assert_eq!(stats.lines(), 5);
        assert_eq!(stats.total_cleared_lines(), 3);
    }

    #[test]
    fn test_counters_accumulate() {
        let mut stats = GameStats::new();
        for cleared in [0, 0, 1, 4, 1, 3] {
            stats.complete_piece_drop(cleared);
        }

        assert_eq!(stats.completed_pieces(), 6);
        assert_eq!(stats.total_cleared_lines(), 9);
        assert_eq!(stats.line_cleared_counter(), &[2, 2, 0, 1, 1]);
        assert_eq!(stats.score(), 5 + 80 + 5 + 45);
    }

    #[test]
    fn test_stats_serialization() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(2);

        let serialized = serde_json::to_string(&stats).unwrap();
        let deserialized: GameStats = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, stats);
    }
}
