//! Vectorised Gotoh recurrence, one reference row at a time.
//!
//! Rows follow the reference and columns follow the query. A row is processed in
//! chunks of `S::LANES` query columns:
//!
//! * `E` (a gap in the query, move `Up`) only depends on the previous row, so
//!   all lanes are independent.
//! * `F` (a gap in the reference, move `Left`) runs along the row. It is
//!   resolved with a log-step prefix max over the chunk plus a carry from the
//!   previous chunk, which is exact because opening a gap never scores better
//!   than extending one (`open <= extend`).
//!
//! Scores are exact. A direction code only says which move produced the cell
//! score, with ties resolved by the configured priority; it does not record
//! whether a gap was opened or extended there, so walking the codes under
//! affine gaps can leave the optimal path.

use std::mem::size_of;

use crate::error::{try_filled, try_with_capacity, Result};
use crate::packed::{Dir, DirMatrix};
use crate::scores::{ScoreMatrix, ALPHABET_SIZE};
use crate::settings::AlignmentSettings;
use crate::simd::{to_lanes, Lane, SimdOps, MAX_LANES};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Gapped boundaries and no clamping. A vertical gap along the left boundary
    /// scores `top_open` for its first step and `extend` for every further one.
    Global { top_open: i32 },
    /// Zero boundaries; cells clamp at zero and are marked `Stop`.
    Local
}

/// One DP cell: score and 0-based coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub score: i32,
    pub ref_pos: usize,
    pub qry_pos: usize
}

pub(crate) struct Sweep<'a> {
    pub reference: &'a [u8],
    pub query: &'a [u8],
    pub settings: &'a AlignmentSettings,
    pub mode: Mode,
    /// Track the maximum cell, first in row-major order.
    pub track_best: bool,
    /// Track the best cell of every row and of every column.
    pub track_positions: bool,
    /// Return the `H` and `E` scores of the last row.
    pub keep_last_row: bool
}

#[derive(Debug, Default)]
pub(crate) struct SweepOutput {
    pub best: Option<Cell>,
    /// Score of the bottom-right cell.
    pub corner: i32,
    /// `H` of the last row; index 0 is the boundary column, index `k` query column `k - 1`.
    pub last_h: Vec<i32>,
    /// `E` of the last row, indexed like `last_h`.
    pub last_e: Vec<i32>,
    pub ref_best: Vec<Cell>,
    pub qry_best: Vec<Cell>
}

/// Saturating conversion of a wide intermediate into a lane.
#[inline]
pub(crate) fn lane_of<T: Lane>(v: i64) -> T {
    T::from_i32(v.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}

/// Substitution scores of every query position against each reference symbol
/// that occurs, padded to whole vectors.
struct Profile<T> {
    rows: Vec<T>,
    slot: [usize; ALPHABET_SIZE],
    width: usize
}

impl<T: Lane> Profile<T> {
    fn build(reference: &[u8], query: &[u8], matrix: &ScoreMatrix, width: usize) -> Result<Self> {
        let mut present = [false; ALPHABET_SIZE];
        for &r in reference {
            present[r as usize] = true;
        }
        let count = present.iter().filter(|&&p| p).count();
        let mut rows = try_filled("query profile", count * width, T::ZERO)?;
        let mut slot = [usize::MAX; ALPHABET_SIZE];
        let mut k = 0;
        for r in 0..ALPHABET_SIZE {
            if !present[r] {
                continue;
            }
            let row = &mut rows[k * width..(k + 1) * width];
            for (s, &q) in row.iter_mut().zip(query) {
                *s = T::from_i32(matrix.get(q, r as u8) as i32);
            }
            slot[r] = k;
            k += 1;
        }
        Ok(Self { rows, slot, width })
    }

    #[inline]
    fn row(&self, r: u8) -> &[T] {
        let k = self.slot[r as usize];
        &self.rows[k * self.width..(k + 1) * self.width]
    }
}

#[inline(always)]
unsafe fn first_lane<T: Lane, S: SimdOps<T>>(mask: S::V) -> usize {
    S::fix_mask_count(S::movemask(mask)).trailing_zeros() as usize
}

/// Runs the recurrence over the whole `reference` x `query` matrix, writing one
/// direction code per cell (row-major) into `matrix` when given.
///
/// Sequences are lookup indices below [`ALPHABET_SIZE`] and the query is not
/// empty. Lane type `T` must hold every reachable score.
pub(crate) unsafe fn sweep<T: Lane, S: SimdOps<T>>(job: &Sweep<'_>, mut matrix: Option<&mut DirMatrix>) -> Result<SweepOutput> {
    let (m, n) = (job.reference.len(), job.query.len());
    debug_assert!(n > 0);
    let lanes = S::LANES;
    let sz = size_of::<T>();
    let chunks = (n + lanes - 1) / lanes;
    let width = chunks * lanes;
    log::trace!("sweep {}x{} in {} chunks of {} lanes", m, n, chunks, lanes);

    let profile = Profile::<T>::build(job.reference, job.query, &job.settings.matrix, width)?;
    let open = job.settings.gap_open as i64;
    let ext = job.settings.gap_extend as i64;
    let local = job.mode == Mode::Local;

    let mut h_row = try_filled("score row", width, T::ZERO)?;
    let mut e_row = try_filled("gap row", width, T::MIN)?;
    if !local {
        for (j, h) in h_row.iter_mut().enumerate().take(n) {
            *h = lane_of(open + j as i64 * ext);
        }
    }

    let v_open = S::set1(lane_of(open));
    let v_ext = S::set1(lane_of(ext));
    let v_zero = S::zero();
    let v_neg = S::set1(T::MIN);
    let ones = S::cmpeq(v_zero, v_zero);
    let lane0 = S::andnot(S::sl_bytes(ones, sz), ones);

    // (shift in bytes, MIN in the vacated lanes, gap cost of the shift)
    let mut steps = Vec::new();
    let mut s = 1;
    while s < lanes {
        steps.push((s * sz, S::andnot(S::sl_bytes(ones, s * sz), v_neg), S::set1(lane_of(s as i64 * ext))));
        s *= 2;
    }

    let mut tail = [T::ZERO; MAX_LANES];
    for t in tail.iter_mut().take(n - (chunks - 1) * lanes) {
        *t = T::ONES;
    }
    let tail_valid = S::loadu(tail.as_ptr());

    let [p0, p1, p2] = job.settings.tie_break.order();
    let code = |d: Dir| S::set1(T::from_i32(d.bits() as i32));
    let (c0, c1, c2) = (code(p0), code(p1), code(p2));

    let mut best: Option<Cell> = None;
    let mut best_t = T::MIN;

    let mut ref_best = Vec::new();
    let mut col_best = Vec::new();
    let mut col_row = Vec::new();
    if job.track_positions {
        ref_best = try_with_capacity("reference positions", m)?;
        col_best = try_filled("query positions", width, T::MIN)?;
        col_row = try_filled("query positions", n, 0usize)?;
    }

    let mut codes = [T::ZERO; MAX_LANES];
    let mut h_left = T::ZERO;

    for i in 0..m {
        let prof = profile.row(job.reference[i]);
        let mut diag_carry = h_left;
        h_left = match job.mode {
            Mode::Local => T::ZERO,
            Mode::Global { top_open } => lane_of(top_open as i64 + i as i64 * ext)
        };
        let mut f_carry = h_left.add_sat(lane_of(open));
        let mut row_best: Option<(T, usize)> = None;

        for c in 0..chunks {
            let j0 = c * lanes;
            let hp = S::loadu(h_row.as_ptr().add(j0));
            let ep = S::loadu(e_row.as_ptr().add(j0));
            let next_diag = h_row[j0 + lanes - 1];

            let diag = S::or(S::sl_bytes(hp, sz), S::and(lane0, S::set1(diag_carry)));
            let d = S::adds(diag, S::loadu(prof.as_ptr().add(j0)));
            let e = S::max(S::adds(hp, v_open), S::adds(ep, v_ext));
            let mut de = S::max(d, e);
            if local {
                de = S::max(de, v_zero);
            }

            let a = S::adds(de, v_open);
            let mut f = S::or(S::sl_bytes(a, sz), S::and(lane0, S::set1(f_carry)));
            for &(bytes, fill, cost) in &steps {
                f = S::max(f, S::adds(S::or(S::sl_bytes(f, bytes), fill), cost));
            }
            let h = S::max(de, f);

            f_carry = to_lanes::<T, S>(S::max(a, S::adds(f, v_ext)))[lanes - 1];
            diag_carry = next_diag;
            S::storeu(h_row.as_mut_ptr().add(j0), h);
            S::storeu(e_row.as_mut_ptr().add(j0), e);

            if let Some(mat) = matrix.as_deref_mut() {
                let cand = |dir: Dir| match dir {
                    Dir::Up => e,
                    Dir::Left => f,
                    _ => d
                };
                let mut dirs = c2;
                dirs = S::blend(S::cmpeq(h, cand(p1)), c1, dirs);
                dirs = S::blend(S::cmpeq(h, cand(p0)), c0, dirs);
                if local {
                    dirs = S::blend(S::cmpgt(h, v_zero), dirs, v_zero);
                }
                S::storeu(codes.as_mut_ptr(), dirs);
                for &k in &codes[..(n - j0).min(lanes)] {
                    mat.push(Dir::from_bits(k.to_i32() as u8))?;
                }
            }

            if !(job.track_best || job.track_positions) {
                continue;
            }
            let hv = if c + 1 == chunks { S::blend(tail_valid, h, v_neg) } else { h };

            if job.track_best && S::movemask(S::cmpgt(hv, S::set1(best_t))) != 0 {
                best_t = S::hmax(hv);
                let lane = first_lane::<T, S>(S::cmpeq(hv, S::set1(best_t)));
                best = Some(Cell { score: best_t.to_i32(), ref_pos: i, qry_pos: j0 + lane });
            }

            if job.track_positions {
                let mx = S::hmax(hv);
                if row_best.map_or(true, |(s, _)| mx > s) {
                    row_best = Some((mx, j0 + first_lane::<T, S>(S::cmpeq(hv, S::set1(mx)))));
                }
                let cb = S::loadu(col_best.as_ptr().add(j0));
                let mut raised = S::fix_mask_count(S::movemask(S::cmpgt(hv, cb)));
                if raised != 0 {
                    S::storeu(col_best.as_mut_ptr().add(j0), S::max(cb, hv));
                    while raised != 0 {
                        col_row[j0 + raised.trailing_zeros() as usize] = i;
                        raised &= raised - 1;
                    }
                }
            }
        }

        if let Some((s, j)) = row_best {
            ref_best.push(Cell { score: s.to_i32(), ref_pos: i, qry_pos: j });
        }
    }

    let mut out = SweepOutput {
        best,
        corner: h_row[n - 1].to_i32(),
        ref_best,
        ..Default::default()
    };

    if job.track_positions {
        out.qry_best = (0..n).map(|j| Cell { score: col_best[j].to_i32(), ref_pos: col_row[j], qry_pos: j }).collect();
    }

    if job.keep_last_row {
        let mut last_h = try_with_capacity("last row", n + 1)?;
        let mut last_e = try_with_capacity("last row", n + 1)?;
        // the boundary column of a processed row is one vertical gap
        let boundary = if m == 0 { 0 } else { h_left.to_i32() };
        last_h.push(boundary);
        last_e.push(if m == 0 { i32::MIN } else { boundary });
        last_h.extend(h_row[..n].iter().map(|v| v.to_i32()));
        last_e.extend(e_row[..n].iter().map(|v| v.to_i32()));
        out.last_h = last_h;
        out.last_e = last_e;
    }

    Ok(out)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::scores::to_lookup;
    use crate::simd::scalar::Scalar;
    use crate::simd::Engine;

    const NEG: i64 = i64::MIN / 4;

    /// Plain scalar Gotoh with the same boundary, clamping and tie-break rules.
    pub struct Reference {
        pub h: Vec<i64>,
        pub dirs: Vec<Dir>,
        pub last_e: Vec<i64>
    }

    pub fn reference_dp(r: &[u8], q: &[u8], settings: &AlignmentSettings, mode: Mode) -> Reference {
        let (m, n) = (r.len(), q.len());
        let (open, ext) = (settings.gap_open as i64, settings.gap_extend as i64);
        let local = mode == Mode::Local;
        let mut h_prev: Vec<i64> = (0..n).map(|j| if local { 0 } else { open + j as i64 * ext }).collect();
        let mut e_prev = vec![NEG; n];
        let mut h_left_prev = 0i64;
        let mut h = Vec::new();
        let mut dirs = Vec::new();

        for i in 0..m {
            let h_left = match mode {
                Mode::Local => 0,
                Mode::Global { top_open } => top_open as i64 + i as i64 * ext
            };
            let mut h_cur = vec![0i64; n];
            let mut e_cur = vec![0i64; n];
            let mut f = NEG;
            for j in 0..n {
                let diag = if j == 0 { h_left_prev } else { h_prev[j - 1] } + settings.matrix.get(q[j], r[i]) as i64;
                let e = (h_prev[j] + open).max(e_prev[j] + ext);
                let left = if j == 0 { h_left } else { h_cur[j - 1] };
                f = (left + open).max(f + ext);
                let mut best = diag.max(e).max(f);
                if local {
                    best = best.max(0);
                }
                let mut dir = Dir::Stop;
                if !(local && best <= 0) {
                    for p in settings.tie_break.order() {
                        let cand = match p {
                            Dir::Up => e,
                            Dir::Left => f,
                            _ => diag
                        };
                        if cand == best {
                            dir = p;
                            break;
                        }
                    }
                }
                h_cur[j] = best;
                e_cur[j] = e;
                h.push(best);
                dirs.push(dir);
            }
            h_prev = h_cur;
            e_prev = e_cur;
            h_left_prev = h_left;
        }
        Reference { h, dirs, last_e: e_prev }
    }

    fn run<T: Lane, S: SimdOps<T>>(r: &[u8], q: &[u8], settings: &AlignmentSettings, mode: Mode) -> (SweepOutput, Vec<Dir>) {
        let job = Sweep {
            reference: r,
            query: q,
            settings,
            mode,
            track_best: true,
            track_positions: true,
            keep_last_row: true
        };
        let mut mat = DirMatrix::new(r.len() * q.len()).unwrap();
        let out = unsafe { sweep::<T, S>(&job, Some(&mut mat)).unwrap() };
        let mut v = mat.view();
        let dirs = (0..r.len() * q.len())
            .map(|k| {
                v.seek_from_start(k).unwrap();
                v.get()
            })
            .collect();
        (out, dirs)
    }

    fn check<T: Lane, S: SimdOps<T>>(r: &[u8], q: &[u8], settings: &AlignmentSettings, mode: Mode) {
        let (r, q) = (to_lookup(r).unwrap(), to_lookup(q).unwrap());
        let expected = reference_dp(&r, &q, settings, mode);
        let (out, dirs) = run::<T, S>(&r, &q, settings, mode);
        assert_eq!(dirs, expected.dirs);

        let n = q.len();
        assert_eq!(out.corner as i64, *expected.h.last().unwrap());
        let last_row = &expected.h[expected.h.len() - n..];
        assert_eq!(out.last_h[1..].iter().map(|&v| v as i64).collect::<Vec<_>>(), last_row);
        for (k, &e) in expected.last_e.iter().enumerate() {
            if e > NEG / 2 {
                assert_eq!(out.last_e[k + 1] as i64, e);
            }
        }

        let max = *expected.h.iter().max().unwrap();
        let first = expected.h.iter().position(|&v| v == max).unwrap();
        let best = out.best.unwrap();
        assert_eq!(best.score as i64, max);
        assert_eq!(best.ref_pos * n + best.qry_pos, first);

        for cell in &out.ref_best {
            let row = &expected.h[cell.ref_pos * n..(cell.ref_pos + 1) * n];
            let mx = *row.iter().max().unwrap();
            assert_eq!(cell.score as i64, mx);
            assert_eq!(cell.qry_pos, row.iter().position(|&v| v == mx).unwrap());
        }
        for cell in &out.qry_best {
            let col: Vec<i64> = (0..r.len()).map(|i| expected.h[i * n + cell.qry_pos]).collect();
            let mx = *col.iter().max().unwrap();
            assert_eq!(cell.score as i64, mx);
            assert_eq!(cell.ref_pos, col.iter().position(|&v| v == mx).unwrap());
        }
    }

    fn settings() -> AlignmentSettings {
        AlignmentSettings::new().with_matrix(crate::scores::ScoreMatrix::nucleotide(2, -1, -1)).with_gap(-5, -2)
    }

    const PAIRS: [(&[u8], &[u8]); 6] = [
        (b"ACGT", b"ACGT"),
        (b"TTACGTTT", b"ACGT"),
        (b"ACGTACGTAAACCCGGGTTTACGATCGATCGATCGTAGCTAGCTAGCTAGCTGATCGATCGTAGCTA", b"ACGTTTACGATCGGGGGGGATCGTAGCTAGCTGGATCGTAGCTAA"),
        (b"A", b"ACGTACGTACGTACGTACGTACGTACGTACGTACGTACG"),
        (b"GGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGG", b"G"),
        (b"AAAAAAAAAATTTTTTTTTTAAAAAAAAAA", b"AAAAAAAAAAAAAAAAAAAA")
    ];

    #[test]
    fn test_global_matches_reference() {
        let s = settings();
        for (r, q) in PAIRS {
            check::<i16, Scalar>(r, q, &s, Mode::Global { top_open: -5 });
            check::<i32, Scalar>(r, q, &s, Mode::Global { top_open: -5 });
            check::<i16, Engine>(r, q, &s, Mode::Global { top_open: -5 });
            check::<i32, Engine>(r, q, &s, Mode::Global { top_open: -5 });
        }
    }

    #[test]
    fn test_local_matches_reference() {
        let s = settings();
        for (r, q) in PAIRS {
            check::<i16, Scalar>(r, q, &s, Mode::Local);
            check::<i16, Engine>(r, q, &s, Mode::Local);
            check::<i32, Engine>(r, q, &s, Mode::Local);
        }
    }

    #[test]
    fn test_continued_top_gap() {
        let s = settings();
        check::<i32, Engine>(b"ACGTTGCA", b"TGCA", &s, Mode::Global { top_open: -2 });
    }

    #[test]
    fn test_other_tie_breaks() {
        use crate::settings::TieBreak;
        for order in [[Dir::Left, Dir::Up, Dir::Diagonal], [Dir::Up, Dir::Left, Dir::Diagonal]] {
            let s = settings().with_gap(-2, -2).with_tie_break(TieBreak::new(order).unwrap());
            for (r, q) in PAIRS {
                check::<i16, Engine>(r, q, &s, Mode::Global { top_open: -2 });
                check::<i16, Engine>(r, q, &s, Mode::Local);
            }
        }
    }

    #[test]
    fn test_local_clamps_at_zero() {
        let s = settings();
        let (r, q) = (to_lookup(b"CCCCAGCCCC").unwrap(), to_lookup(b"TTAGTT").unwrap());
        let expected = reference_dp(&r, &q, &s, Mode::Local);
        assert!(expected.h.iter().all(|&v| v >= 0));
        let (_, dirs) = run::<i16, Engine>(&r, &q, &s, Mode::Local);
        for (k, &d) in dirs.iter().enumerate() {
            assert_eq!(d == Dir::Stop, expected.h[k] == 0, "cell {}", k);
        }
    }
}
