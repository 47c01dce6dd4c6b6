//! Linear-space global alignment.
//!
//! Divide and conquer in the Myers-Miller form for affine gaps: the middle
//! reference row splits the problem, a forward pass over the top half and a
//! reverse pass over the bottom half give the scores of every way to cross it,
//! and a vertical gap is allowed to run through the split. Only `O(len_qry)`
//! score rows are alive at a time; the path is materialised move by move.

use crate::align::sweep_lanes;
use crate::cigar::replay;
use crate::error::{try_with_capacity, Result};
use crate::kernel::{Mode, Sweep};
use crate::packed::{Dir, DirMatrix};
use crate::result::{AlignmentResult, Layout};
use crate::scores::AlignmentScore;
use crate::settings::AlignmentSettings;
use crate::simd::VectorOps;

/// Whether a vertical gap touching the edge of a sub-problem continues one
/// from the neighbouring sub-problem.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum GapEdge {
    Fresh,
    Continue
}

struct Solver<'a> {
    settings: &'a AlignmentSettings,
    wide: bool,
    /// `open - extend`, paid once per gap on top of `extend` per position.
    surcharge: i64,
    extend: i64,
    path: Vec<Dir>
}

impl GapEdge {
    fn surcharge(self, g: i64) -> i64 {
        match self {
            GapEdge::Fresh => g,
            GapEdge::Continue => 0
        }
    }
}

impl<'a> Solver<'a> {
    fn push_n(&mut self, dir: Dir, n: usize) {
        self.path.extend(std::iter::repeat(dir).take(n));
    }

    /// Last `H` and `E` rows of `a` x `b`, the first vertical gap paying the
    /// `top` surcharge.
    unsafe fn rows<S: VectorOps>(&self, a: &[u8], b: &[u8], top: GapEdge) -> Result<(Vec<i32>, Vec<i32>)> {
        let job = Sweep {
            reference: a,
            query: b,
            settings: self.settings,
            mode: Mode::Global { top_open: (top.surcharge(self.surcharge) + self.extend) as i32 },
            track_best: false,
            track_positions: false,
            keep_last_row: true
        };
        let out = sweep_lanes::<S>(&job, None, self.wide)?;
        Ok((out.last_h, out.last_e))
    }

    /// Appends an optimal path of `a` (reference) against `b` (query).
    unsafe fn solve<S: VectorOps>(&mut self, a: &[u8], b: &[u8], tb: GapEdge, te: GapEdge) -> Result<()> {
        let (m, n) = (a.len(), b.len());
        log::trace!("hirschberg {} x {} ({:?}, {:?})", m, n, tb, te);

        if n == 0 {
            self.push_n(Dir::Up, m);
            return Ok(());
        }
        if m == 0 {
            self.push_n(Dir::Left, n);
            return Ok(());
        }
        if m == 1 {
            self.single_row(a[0], b, tb, te);
            return Ok(());
        }

        let mid = m / 2;
        let (cc, dd) = self.rows::<S>(&a[..mid], b, tb)?;
        let rev_a: Vec<u8> = a[mid..].iter().rev().copied().collect();
        let rev_b: Vec<u8> = b.iter().rev().copied().collect();
        let (rr, ss) = self.rows::<S>(&rev_a, &rev_b, te)?;

        // lowest column wins, crossing without a gap wins ties
        let mut best = i64::MIN;
        let mut split = (0, false);
        for k in 0..=n {
            let through = cc[k] as i64 + rr[n - k] as i64;
            if through > best {
                best = through;
                split = (k, false);
            }
            let gapped = dd[k] as i64 + ss[n - k] as i64 - self.surcharge;
            if gapped > best {
                best = gapped;
                split = (k, true);
            }
        }

        let (k, gapped) = split;
        if gapped {
            self.solve::<S>(&a[..mid - 1], &b[..k], tb, GapEdge::Continue)?;
            self.push_n(Dir::Up, 2);
            self.solve::<S>(&a[mid + 1..], &b[k..], GapEdge::Continue, te)
        } else {
            self.solve::<S>(&a[..mid], &b[..k], tb, GapEdge::Fresh)?;
            self.solve::<S>(&a[mid..], &b[k..], GapEdge::Fresh, te)
        }
    }

    /// One reference symbol against a non-empty query: either it is matched with
    /// one query symbol, or it is a vertical gap merged with whichever edge
    /// continues one.
    fn single_row(&mut self, r: u8, b: &[u8], tb: GapEdge, te: GapEdge) {
        let n = b.len();
        let s = self.settings;
        let deleted = tb.surcharge(self.surcharge).max(te.surcharge(self.surcharge)) + self.extend + s.gap_cost(n);

        let mut matched: Option<(i64, usize)> = None;
        for (j, &q) in b.iter().enumerate() {
            let score = s.gap_cost(j) + s.matrix.get(q, r) as i64 + s.gap_cost(n - 1 - j);
            if matched.map_or(true, |(best, _)| score > best) {
                matched = Some((score, j));
            }
        }

        match matched {
            Some((score, j)) if score >= deleted => {
                self.push_n(Dir::Left, j);
                self.path.push(Dir::Diagonal);
                self.push_n(Dir::Left, n - 1 - j);
            },
            _ if tb.surcharge(self.surcharge) >= te.surcharge(self.surcharge) => {
                self.path.push(Dir::Up);
                self.push_n(Dir::Left, n);
            },
            _ => {
                self.push_n(Dir::Left, n);
                self.path.push(Dir::Up);
            }
        }
    }
}

/// Moves of an optimal global path of `reference` against `query`, first move first.
pub(crate) unsafe fn path<S: VectorOps>(reference: &[u8], query: &[u8], settings: &AlignmentSettings, wide: bool) -> Result<Vec<Dir>> {
    let mut solver = Solver {
        settings,
        wide,
        surcharge: settings.gap_open as i64 - settings.gap_extend as i64,
        extend: settings.gap_extend as i64,
        path: try_with_capacity("alignment path", reference.len() + query.len())?
    };
    solver.solve::<S>(reference, query, GapEdge::Fresh, GapEdge::Fresh)?;
    Ok(solver.path)
}

/// Global alignment keeping only the optimal path.
pub(crate) unsafe fn align<S: VectorOps>(reference: &[u8], query: &[u8], settings: &AlignmentSettings, wide: bool) -> Result<AlignmentResult> {
    let (m, n) = (reference.len(), query.len());
    let path = path::<S>(reference, query, settings, wide)?;

    let moves = path.len();
    let matrix = DirMatrix::from_dirs(&path)?;
    let score = replay(&matrix, moves)?.score(query, reference, settings);
    log::debug!("hirschberg path of {} moves scores {}", moves, score);

    Ok(AlignmentResult {
        matrix,
        layout: Layout::Path { moves },
        algorithm: settings.algorithm,
        best: AlignmentScore { ref_start: 0, ref_end: m - 1, qry_start: 0, qry_end: n - 1, score: score as i32 },
        aligned: true,
        min_score: settings.min_score,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::tests::reference_dp;
    use crate::scores::{to_lookup, ScoreMatrix};
    use crate::settings::Algorithm;
    use crate::simd::Engine;

    fn check(r: &[u8], q: &[u8], s: &AlignmentSettings) {
        let (r, q) = (to_lookup(r).unwrap(), to_lookup(q).unwrap());
        let expected = *reference_dp(&r, &q, s, Mode::Global { top_open: s.gap_open as i32 }).h.last().unwrap();
        let res = unsafe { align::<Engine>(&r, &q, s, false).unwrap() };
        assert_eq!(res.best().score as i64, expected);
        let cigar = res.cigar().unwrap().unwrap();
        assert_eq!((cigar.ref_len(), cigar.qry_len()), (r.len(), q.len()));
    }

    fn settings() -> AlignmentSettings {
        AlignmentSettings::new()
            .with_matrix(ScoreMatrix::uniform(2, -1))
            .with_gap(-5, -2)
            .with_algorithm(Algorithm::Hirschberg)
    }

    #[test]
    fn test_small_cases() {
        let s = settings();
        check(b"A", b"A", &s);
        check(b"A", b"CCCC", &s);
        check(b"ACGT", b"A", &s);
        check(b"ACGT", b"ACGT", &s);
        check(b"AC", b"GT", &s);
        check(b"TTACGTTT", b"ACGT", &s);
    }

    #[test]
    fn test_gap_through_split() {
        // the best alignment deletes the whole middle of the reference in one gap
        let s = settings().with_gap(-8, -1);
        check(b"ACGTAAAAAAAAAAAAGGCA", b"ACGTGGCA", &s);
        check(b"CCCCCCCCCCCCCCCCACGT", b"ACGT", &s);
        check(b"ACGTCCCCCCCCCCCCCCCC", b"ACGT", &s);
    }

    #[test]
    fn test_gap_path_is_one_run() {
        let s = settings().with_gap(-8, -1);
        let (r, q) = (to_lookup(b"ACGTAAAAAAAAAAAAGGCA").unwrap(), to_lookup(b"ACGTGGCA").unwrap());
        let res = unsafe { align::<Engine>(&r, &q, &s, false).unwrap() };
        assert_eq!(res.cigar().unwrap().unwrap().to_string(), "4M12D4M");
        assert_eq!(res.best().score, 16 - 8 - 11);
    }
}
