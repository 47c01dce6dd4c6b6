//! Alignment configuration.

use crate::error::{AlignError, Result};
use crate::packed::Dir;
use crate::scores::ScoreMatrix;

/// Which dynamic-programming variant to run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Needleman-Wunsch over the full matrix.
    #[default]
    Global,
    /// Smith-Waterman over the full matrix.
    Local,
    /// Linear-space global alignment by divide and conquer.
    Hirschberg,
    /// Smith-Waterman keeping only score rows; the start is recovered by a reverse extension.
    MemoryLocal
}

/// Priority among the three moves when several produce the cell score.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TieBreak([Dir; 3]);

impl TieBreak {
    pub const DIAGONAL_UP_LEFT: TieBreak = TieBreak([Dir::Diagonal, Dir::Up, Dir::Left]);
    pub const DIAGONAL_LEFT_UP: TieBreak = TieBreak([Dir::Diagonal, Dir::Left, Dir::Up]);

    /// Highest priority first; must name `Diagonal`, `Up` and `Left` once each.
    pub fn new(order: [Dir; 3]) -> Result<Self> {
        let t = TieBreak(order);
        t.validate()?;
        Ok(t)
    }

    #[inline]
    pub fn order(&self) -> [Dir; 3] {
        self.0
    }

    fn validate(&self) -> Result<()> {
        let seen = self.0.iter().fold(0u8, |m, &d| m | (1 << d.bits()));
        if seen == 0b1110 {
            Ok(())
        } else {
            Err(AlignError::InvalidTieBreak)
        }
    }
}

impl Default for TieBreak {
    fn default() -> Self {
        Self::DIAGONAL_UP_LEFT
    }
}

/// Everything an alignment call needs besides the two sequences.
///
/// A gap of length `k` scores `gap_open + (k - 1) * gap_extend`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlignmentSettings {
    pub gap_open: i16,
    pub gap_extend: i16,
    pub matrix: ScoreMatrix,
    pub algorithm: Algorithm,
    pub tie_break: TieBreak,
    /// Local variants report no alignment below this score.
    pub min_score: i32,
    /// Record the best cell of every reference row and query column.
    pub track_positions: bool
}

impl Default for AlignmentSettings {
    fn default() -> Self {
        Self {
            gap_open: -10,
            gap_extend: -1,
            matrix: ScoreMatrix::default(),
            algorithm: Algorithm::Global,
            tie_break: TieBreak::default(),
            min_score: 0,
            track_positions: false
        }
    }
}

impl AlignmentSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gap(mut self, open: i16, extend: i16) -> Self {
        self.gap_open = open;
        self.gap_extend = extend;
        self
    }

    pub fn with_matrix(mut self, matrix: ScoreMatrix) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_min_score(mut self, min_score: i32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_position_tracking(mut self, track: bool) -> Self {
        self.track_positions = track;
        self
    }

    /// Checks `gap_open <= gap_extend <= 0` and the tie-break order.
    ///
    /// The vectorised left-gap scan relies on an opened gap never beating an
    /// extended one, which is what the first inequality guarantees.
    pub fn validate(&self) -> Result<()> {
        if !(self.gap_open <= self.gap_extend && self.gap_extend <= 0) {
            return Err(AlignError::InvalidGap { open: self.gap_open, extend: self.gap_extend });
        }
        self.tie_break.validate()
    }

    /// Score of a single gap of length `len`.
    pub fn gap_cost(&self, len: usize) -> i64 {
        if len == 0 {
            0
        } else {
            self.gap_open as i64 + (len as i64 - 1) * self.gap_extend as i64
        }
    }

    /// Largest magnitude a single step can add to a score.
    pub(crate) fn max_step(&self) -> i32 {
        self.matrix.max_abs().max((self.gap_open as i32).abs()).max((self.gap_extend as i32).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = AlignmentSettings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.algorithm, Algorithm::Global);
        assert_eq!(s.gap_cost(0), 0);
        assert_eq!(s.gap_cost(1), -10);
        assert_eq!(s.gap_cost(4), -13);
        assert_eq!(s.max_step(), 10);
    }

    #[test]
    fn test_gap_validation() {
        let s = AlignmentSettings::new().with_gap(-1, -4);
        assert_eq!(s.validate(), Err(AlignError::InvalidGap { open: -1, extend: -4 }));
        let s = AlignmentSettings::new().with_gap(-3, 2);
        assert!(s.validate().is_err());
        let s = AlignmentSettings::new().with_gap(-3, -3);
        assert!(s.validate().is_ok());
        let s = AlignmentSettings::new().with_gap(0, 0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_tie_break() {
        assert!(TieBreak::new([Dir::Left, Dir::Up, Dir::Diagonal]).is_ok());
        assert_eq!(TieBreak::new([Dir::Left, Dir::Left, Dir::Diagonal]), Err(AlignError::InvalidTieBreak));
        assert_eq!(TieBreak::new([Dir::Stop, Dir::Up, Dir::Diagonal]), Err(AlignError::InvalidTieBreak));
        assert_eq!(TieBreak::default().order(), [Dir::Diagonal, Dir::Up, Dir::Left]);
    }
}
