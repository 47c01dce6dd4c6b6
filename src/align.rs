//! Alignment entry points: validation, lane-width choice and the four variants.

use crate::cigar::traceback;
use crate::error::{try_with_capacity, AlignError, Result};
use crate::hirschberg;
use crate::kernel::{sweep, Cell, Mode, Sweep, SweepOutput};
use crate::packed::{Dir, DirMatrix};
use crate::result::{AlignmentResult, Closer, Layout};
use crate::scores::{check_index, to_lookup, AlignmentScore};
use crate::settings::{Algorithm, AlignmentSettings};
use crate::simd::{Engine, VectorOps};

/// Aligns two sequences in lookup-index form with the compiled backend.
pub fn align(reference: &[u8], query: &[u8], settings: &AlignmentSettings) -> Result<AlignmentResult> {
    align_with::<Engine>(reference, query, settings)
}

/// Like [`align`], converting raw symbols (`A..Z`, `a..z`) first.
pub fn align_symbols(reference: &[u8], query: &[u8], settings: &AlignmentSettings) -> Result<AlignmentResult> {
    let r = to_lookup(reference)?;
    let q = to_lookup(query)?;
    align(&r, &q, settings)
}

/// Aligns with an explicit backend.
///
/// Fails with [`AlignError::Unsupported`] when the running CPU lacks the
/// backend's instructions.
pub fn align_with<S: VectorOps>(reference: &[u8], query: &[u8], settings: &AlignmentSettings) -> Result<AlignmentResult> {
    if !S::available() {
        return Err(AlignError::Unsupported { backend: S::NAME });
    }
    settings.validate()?;
    for &c in reference.iter().chain(query) {
        check_index(c)?;
    }
    if reference.is_empty() || query.is_empty() {
        return Err(AlignError::EmptySequence);
    }
    let bound = score_bound(reference.len(), query.len(), settings);
    if bound >= (i32::MAX / 2) as u128 {
        return Err(AlignError::ScoreRange { bound });
    }

    let wide = needs_wide_lanes(reference.len(), query.len(), settings);
    log::debug!(
        "{:?} alignment of {} x {} on {} with {}-bit lanes",
        settings.algorithm,
        reference.len(),
        query.len(),
        S::NAME,
        if wide || settings.algorithm == Algorithm::MemoryLocal { 32 } else { 16 }
    );

    // the backend is available, checked above
    unsafe {
        match settings.algorithm {
            Algorithm::Global => full_matrix::<S>(reference, query, settings, false, wide),
            Algorithm::Local => full_matrix::<S>(reference, query, settings, true, wide),
            Algorithm::Hirschberg => hirschberg::align::<S>(reference, query, settings, wide),
            Algorithm::MemoryLocal => memory_local::<S>(reference, query, settings)
        }
    }
}

/// Largest magnitude any cell score can reach.
fn score_bound(ref_len: usize, qry_len: usize, settings: &AlignmentSettings) -> u128 {
    (ref_len as u128 + qry_len as u128) * settings.max_step() as u128
}

/// Whether a score could leave the comfortable range of 16-bit lanes.
fn needs_wide_lanes(ref_len: usize, qry_len: usize, settings: &AlignmentSettings) -> bool {
    let bound = score_bound(ref_len, qry_len, settings);
    let wide = bound >= (i16::MAX / 2) as u128;
    if wide && settings.algorithm != Algorithm::MemoryLocal {
        log::warn!("score bound {} does not fit 16-bit lanes, using 32-bit lanes", bound);
    }
    wide
}

pub(crate) unsafe fn sweep_lanes<S: VectorOps>(job: &Sweep<'_>, matrix: Option<&mut DirMatrix>, wide: bool) -> Result<SweepOutput> {
    if wide {
        sweep::<i32, S>(job, matrix)
    } else {
        sweep::<i16, S>(job, matrix)
    }
}

/// Open candidates: start coordinates equal the end.
fn candidates(cells: &[Cell]) -> Result<Vec<AlignmentScore>> {
    let mut res = try_with_capacity("position scores", cells.len())?;
    res.extend(cells.iter().map(|c| AlignmentScore {
        ref_start: c.ref_pos,
        ref_end: c.ref_pos,
        qry_start: c.qry_pos,
        qry_end: c.qry_pos,
        score: c.score
    }));
    Ok(res)
}

/// Keeps the inputs of a tracked local alignment for [`AlignmentResult::top_candidates`].
fn closer<S: VectorOps>(reference: &[u8], query: &[u8], settings: &AlignmentSettings) -> Result<Option<Closer>> {
    if !settings.track_positions {
        return Ok(None);
    }
    let mut r = try_with_capacity("reference copy", reference.len())?;
    r.extend_from_slice(reference);
    let mut q = try_with_capacity("query copy", query.len())?;
    q.extend_from_slice(query);
    Ok(Some(Closer { reference: r, query: q, settings: settings.clone(), start: anchored_start::<S> }))
}

/// Overwrites the codes along `path`, whose moves start just before `origin`
/// (reference row, query column), so that a traceback from its last cell
/// follows it. The cell the path enters from becomes `Stop` when it lies in
/// the matrix.
fn stamp_path(matrix: &mut DirMatrix, qry_len: usize, origin: (usize, usize), path: &[Dir]) -> Result<()> {
    let mut cur = matrix.view_mut();
    let (mut i, mut j) = (-1isize, -1isize);
    let mut entry = None;
    for &dir in path {
        match dir {
            Dir::Diagonal => {
                i += 1;
                j += 1;
            },
            Dir::Up => i += 1,
            Dir::Left => j += 1,
            Dir::Stop => continue
        }
        if i < 0 || j < 0 {
            continue;
        }
        let (r, c) = (origin.0 + i as usize, origin.1 + j as usize);
        if entry.is_none() {
            entry = Some((r, c, dir));
        }
        cur.seek_from_start(r * qry_len + c)?;
        cur.set(dir);
    }

    if let Some((r, c, dir)) = entry {
        let before = match dir {
            Dir::Diagonal => r.checked_sub(1).zip(c.checked_sub(1)),
            Dir::Up => r.checked_sub(1).map(|r| (r, c)),
            _ => c.checked_sub(1).map(|c| (r, c))
        };
        if let Some((r, c)) = before {
            cur.seek_from_start(r * qry_len + c)?;
            cur.set(Dir::Stop);
        }
    }
    Ok(())
}

fn clears(best: Option<Cell>, settings: &AlignmentSettings) -> Option<Cell> {
    match best {
        Some(b) if b.score > 0 && b.score >= settings.min_score => Some(b),
        _ => {
            log::debug!("no local alignment reached a score of {}", settings.min_score.max(1));
            None
        }
    }
}

/// Needleman-Wunsch or Smith-Waterman keeping every direction code.
///
/// Codes say which move produced each cell score, which cannot tell a gap
/// extension from a fresh one; the optimal path is solved exactly in linear
/// space and stamped over the codes it crosses.
unsafe fn full_matrix<S: VectorOps>(
    reference: &[u8],
    query: &[u8],
    settings: &AlignmentSettings,
    local: bool,
    wide: bool
) -> Result<AlignmentResult> {
    let (m, n) = (reference.len(), query.len());
    let cells = m.checked_mul(n).ok_or(AlignError::Alloc { what: "direction matrix", count: usize::MAX })?;
    let mut matrix = DirMatrix::new(cells)?;

    let job = Sweep {
        reference,
        query,
        settings,
        mode: if local { Mode::Local } else { Mode::Global { top_open: settings.gap_open as i32 } },
        track_best: local,
        track_positions: local && settings.track_positions,
        keep_last_row: false
    };
    let out = sweep_lanes::<S>(&job, Some(&mut matrix), wide)?;

    let mut res = AlignmentResult {
        matrix,
        layout: Layout::Full { ref_len: m, qry_len: n },
        algorithm: settings.algorithm,
        min_score: settings.min_score,
        ..Default::default()
    };

    if !local {
        let path = hirschberg::path::<S>(reference, query, settings, wide)?;
        stamp_path(&mut res.matrix, n, (0, 0), &path)?;
        res.best = AlignmentScore { ref_start: 0, ref_end: m - 1, qry_start: 0, qry_end: n - 1, score: out.corner };
        res.aligned = true;
        return Ok(res);
    }

    res.ref_best = candidates(&out.ref_best)?;
    res.qry_best = candidates(&out.qry_best)?;
    res.closer = closer::<S>(reference, query, settings)?;
    if let Some(b) = clears(out.best, settings) {
        let (rs, qs) = anchored_start::<S>(reference, query, settings, b)?;
        let path = hirschberg::path::<S>(&reference[rs..=b.ref_pos], &query[qs..=b.qry_pos], settings, wide)?;
        stamp_path(&mut res.matrix, n, (rs, qs), &path)?;
        let (_, (rs, qs)) = traceback(&res.matrix, n, (b.ref_pos, b.qry_pos), false)?;
        res.best = AlignmentScore { ref_start: rs, ref_end: b.ref_pos, qry_start: qs, qry_end: b.qry_pos, score: b.score };
        res.aligned = true;
    }
    Ok(res)
}

/// Smith-Waterman on score rows only, 32-bit lanes.
unsafe fn memory_local<S: VectorOps>(reference: &[u8], query: &[u8], settings: &AlignmentSettings) -> Result<AlignmentResult> {
    let job = Sweep {
        reference,
        query,
        settings,
        mode: Mode::Local,
        track_best: true,
        track_positions: settings.track_positions,
        keep_last_row: false
    };
    let out = sweep::<i32, S>(&job, None)?;

    let mut res = AlignmentResult {
        layout: Layout::ScoreOnly,
        algorithm: settings.algorithm,
        min_score: settings.min_score,
        ref_best: candidates(&out.ref_best)?,
        qry_best: candidates(&out.qry_best)?,
        closer: closer::<S>(reference, query, settings)?,
        ..Default::default()
    };

    if let Some(b) = clears(out.best, settings) {
        let (rs, qs) = anchored_start::<S>(reference, query, settings, b)?;
        res.best = AlignmentScore { ref_start: rs, ref_end: b.ref_pos, qry_start: qs, qry_end: b.qry_pos, score: b.score };
        res.aligned = true;
    }
    Ok(res)
}

/// Start of a local alignment ending at `end`: the first cell reaching the same
/// score when extending backwards from `end` over the reversed prefixes.
unsafe fn anchored_start<S: VectorOps>(reference: &[u8], query: &[u8], settings: &AlignmentSettings, end: Cell) -> Result<(usize, usize)> {
    let rev_ref: Vec<u8> = reference[..=end.ref_pos].iter().rev().copied().collect();
    let rev_qry: Vec<u8> = query[..=end.qry_pos].iter().rev().copied().collect();
    let job = Sweep {
        reference: &rev_ref,
        query: &rev_qry,
        settings,
        mode: Mode::Global { top_open: settings.gap_open as i32 },
        track_best: true,
        track_positions: false,
        keep_last_row: false
    };
    let out = sweep::<i32, S>(&job, None)?;

    match out.best {
        Some(c) if c.score == end.score => Ok((end.ref_pos - c.ref_pos, end.qry_pos - c.qry_pos)),
        other => {
            log::warn!("reverse extension reached {:?} instead of score {}", other.map(|c| c.score), end.score);
            Ok((end.ref_pos, end.qry_pos))
        }
    }
}
