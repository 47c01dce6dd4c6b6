//! Output of one alignment call.

use std::fmt;

use crate::cigar::{replay, traceback, Cigar};
use crate::error::{AlignError, Result};
use crate::kernel::Cell;
use crate::packed::{DirMatrix, DirView};
use crate::scores::{rank_scores, AlignmentScore};
use crate::settings::{Algorithm, AlignmentSettings};

/// What the direction matrix of a result holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    /// One code per DP cell, row-major over `ref_len x qry_len`.
    Full { ref_len: usize, qry_len: usize },
    /// The optimal path only, one code per move from start to end.
    Path { moves: usize },
    /// No directions were kept.
    ScoreOnly
}

/// Start of the local alignment ending at a cell, for an already checked backend.
pub(crate) type StartFn = unsafe fn(&[u8], &[u8], &AlignmentSettings, Cell) -> Result<(usize, usize)>;

/// Inputs kept by a local alignment with position tracking, so that candidates
/// can be closed after the call.
pub(crate) struct Closer {
    pub reference: Vec<u8>,
    pub query: Vec<u8>,
    pub settings: AlignmentSettings,
    pub start: StartFn
}

impl fmt::Debug for Closer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closer")
            .field("ref_len", &self.reference.len())
            .field("qry_len", &self.query.len())
            .finish_non_exhaustive()
    }
}

/// Direction codes, best score and optional per-position candidates of one alignment.
///
/// A zeroed result (the `Default`) holds nothing and is not aligned.
#[derive(Debug)]
pub struct AlignmentResult {
    pub(crate) matrix: DirMatrix,
    pub(crate) layout: Layout,
    pub(crate) algorithm: Algorithm,
    pub(crate) best: AlignmentScore,
    pub(crate) aligned: bool,
    pub(crate) min_score: i32,
    pub(crate) ref_best: Vec<AlignmentScore>,
    pub(crate) qry_best: Vec<AlignmentScore>,
    pub(crate) closer: Option<Closer>
}

impl Default for AlignmentResult {
    fn default() -> Self {
        Self {
            matrix: DirMatrix::default(),
            layout: Layout::ScoreOnly,
            algorithm: Algorithm::Global,
            best: AlignmentScore::default(),
            aligned: false,
            min_score: 0,
            ref_best: Vec::new(),
            qry_best: Vec::new(),
            closer: None
        }
    }
}

impl AlignmentResult {
    /// Best alignment; zeroed when [`is_aligned`](Self::is_aligned) is false.
    pub fn best(&self) -> AlignmentScore {
        self.best
    }

    pub fn is_aligned(&self) -> bool {
        self.aligned
    }

    /// Best alignment, or [`AlignError::NoAlignment`] when nothing cleared the minimum score.
    pub fn into_best(self) -> Result<AlignmentScore> {
        if self.aligned {
            Ok(self.best)
        } else {
            Err(AlignError::NoAlignment { min_score: self.min_score })
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Read-only view of the direction codes, cursor at element 0.
    pub fn matrix(&self) -> DirView<'_> {
        let mut v = self.matrix.view();
        // element 0 is always addressable, even on a blank matrix
        let _ = v.seek_from_start(0);
        v
    }

    /// Best cell ending in each reference row, when position tracking was on.
    ///
    /// Start coordinates equal the end coordinates; [`top_candidates`](Self::top_candidates)
    /// closes the candidates it returns.
    pub fn ref_scores(&self) -> &[AlignmentScore] {
        &self.ref_best
    }

    /// Best cell ending in each query column, when position tracking was on.
    pub fn qry_scores(&self) -> &[AlignmentScore] {
        &self.qry_best
    }

    /// Path of the best alignment, `None` without an alignment or without directions.
    pub fn cigar(&self) -> Result<Option<Cigar>> {
        if !self.aligned {
            return Ok(None);
        }
        match self.layout {
            Layout::Full { qry_len, .. } => {
                let global = matches!(self.algorithm, Algorithm::Global);
                let end = (self.best.ref_end, self.best.qry_end);
                Ok(Some(traceback(&self.matrix, qry_len, end, global)?.0))
            },
            Layout::Path { moves } => Ok(Some(replay(&self.matrix, moves)?)),
            Layout::ScoreOnly => Ok(None)
        }
    }

    /// Up to `k` candidates from the per-reference-position scores, best first.
    ///
    /// Candidates below the minimum score, or not positive, are dropped, as are
    /// candidates whose reference window overlaps a better one. Each candidate
    /// is closed by extending backwards from its end until its score is reached.
    pub fn top_candidates(&self, k: usize) -> Result<Vec<AlignmentScore>> {
        let mut ranked: Vec<&AlignmentScore> = self.ref_best.iter().filter(|a| a.score > 0 && a.score >= self.min_score).collect();
        rank_scores(&mut ranked);

        let mut res: Vec<AlignmentScore> = Vec::new();
        for cand in ranked {
            if res.len() == k {
                break;
            }
            let mut cand = *cand;
            if let Some(c) = &self.closer {
                let end = Cell { score: cand.score, ref_pos: cand.ref_end, qry_pos: cand.qry_end };
                // the backend was checked when this result was built
                let (rs, qs) = unsafe { (c.start)(&c.reference, &c.query, &c.settings, end)? };
                cand.ref_start = rs;
                cand.qry_start = qs;
            }
            if res.iter().all(|r| !r.overlaps_ref(&cand)) {
                res.push(cand);
            }
        }
        Ok(res)
    }

    /// Releases the matrix and both score arrays and zeroes the result. Calling
    /// it again is a no-op.
    pub fn free(&mut self) {
        self.matrix.free();
        self.ref_best = Vec::new();
        self.qry_best = Vec::new();
        self.closer = None;
        self.layout = Layout::ScoreOnly;
        self.best = AlignmentScore::default();
        self.aligned = false;
    }
}
