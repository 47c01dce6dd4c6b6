//! Symbol lookup indices, substitution scores and per-candidate score records.

use std::borrow::Borrow;

use crate::error::{try_with_capacity, AlignError, Result};

/// Number of lookup indices: 0 is the null marker, 1..=26 are the letters.
pub const ALPHABET_SIZE: usize = 27;
pub const NULL_INDEX: u8 = 0;

/// Lookup index of a symbol: `A..Z` and `a..z` map to 1..=26.
#[inline]
pub fn lookup_index(c: u8) -> Option<u8> {
    match c {
        b'A'..=b'Z' => Some(c - b'A' + 1),
        b'a'..=b'z' => Some(c - b'a' + 1),
        _ => None
    }
}

/// Converts raw symbols into lookup-index form.
pub fn to_lookup(seq: &[u8]) -> Result<Vec<u8>> {
    let mut res = try_with_capacity("lookup sequence", seq.len())?;
    for (pos, &byte) in seq.iter().enumerate() {
        res.push(lookup_index(byte).ok_or(AlignError::InvalidSymbol { pos, byte })?);
    }
    Ok(res)
}

/// Upper-case symbol of a lookup index, `b'*'` for the null marker.
pub fn from_lookup(index: u8) -> Result<u8> {
    match index {
        NULL_INDEX => Ok(b'*'),
        1..=26 => Ok(b'A' + index - 1),
        _ => Err(AlignError::InvalidIndex { index })
    }
}

/// IUPAC nucleotide code as a set of A=1, C=2, G=4, T=8.
fn base_set(index: u8) -> u8 {
    match index.checked_add(b'A' - 1).unwrap_or(0) {
        b'A' => 0b0001,
        b'C' => 0b0010,
        b'G' => 0b0100,
        b'T' | b'U' => 0b1000,
        b'R' => 0b0101,
        b'Y' => 0b1010,
        b'S' => 0b0110,
        b'W' => 0b1001,
        b'K' => 0b1100,
        b'M' => 0b0011,
        b'B' => 0b1110,
        b'D' => 0b1101,
        b'H' => 0b1011,
        b'V' => 0b0111,
        b'N' | b'X' => 0b1111,
        _ => 0
    }
}

/// Substitution scores keyed by `(query index, reference index)`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreMatrix {
    scores: [[i8; ALPHABET_SIZE]; ALPHABET_SIZE]
}

impl ScoreMatrix {
    pub fn from_fn(f: impl Fn(u8, u8) -> i8) -> Self {
        let mut scores = [[0i8; ALPHABET_SIZE]; ALPHABET_SIZE];
        for (q, row) in scores.iter_mut().enumerate() {
            for (r, s) in row.iter_mut().enumerate() {
                *s = f(q as u8, r as u8);
            }
        }
        Self { scores }
    }

    /// Same letter scores `match_score`, anything else `mismatch`.
    pub fn uniform(match_score: i8, mismatch: i8) -> Self {
        Self::from_fn(|q, r| if q == r && q != NULL_INDEX { match_score } else { mismatch })
    }

    /// IUPAC-aware nucleotide scores.
    ///
    /// Two concrete bases score `match_score` or `mismatch`. Ambiguity codes whose
    /// base sets overlap score `ambiguous`, disjoint sets and letters that are not
    /// nucleotide codes score `mismatch`.
    pub fn nucleotide(match_score: i8, mismatch: i8, ambiguous: i8) -> Self {
        Self::from_fn(|q, r| {
            let (a, b) = (base_set(q), base_set(r));
            if a & b == 0 {
                mismatch
            } else if a.count_ones() == 1 && b.count_ones() == 1 {
                match_score
            } else {
                ambiguous
            }
        })
    }

    /// Score of aligning query symbol `q` against reference symbol `r`.
    ///
    /// Both indices must be below [`ALPHABET_SIZE`]; the driver checks sequences
    /// before any lookup.
    #[inline]
    pub fn get(&self, q: u8, r: u8) -> i8 {
        self.scores[q as usize][r as usize]
    }

    pub fn try_get(&self, q: u8, r: u8) -> Result<i8> {
        check_index(q)?;
        check_index(r)?;
        Ok(self.get(q, r))
    }

    pub fn set(&mut self, q: u8, r: u8, score: i8) -> Result<()> {
        check_index(q)?;
        check_index(r)?;
        self.scores[q as usize][r as usize] = score;
        Ok(())
    }

    /// Largest absolute entry.
    pub fn max_abs(&self) -> i32 {
        self.scores.iter().flatten().map(|&s| (s as i32).abs()).max().unwrap_or(0)
    }
}

impl Default for ScoreMatrix {
    fn default() -> Self {
        Self::nucleotide(5, -4, -2)
    }
}

#[inline]
pub(crate) fn check_index(index: u8) -> Result<()> {
    if (index as usize) < ALPHABET_SIZE {
        Ok(())
    } else {
        Err(AlignError::InvalidIndex { index })
    }
}

/// Coordinates and score of one candidate alignment, 0-based and inclusive.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AlignmentScore {
    pub ref_start: usize,
    pub ref_end: usize,
    pub qry_start: usize,
    pub qry_end: usize,
    pub score: i32
}

impl AlignmentScore {
    pub fn ref_len(&self) -> usize {
        self.ref_end + 1 - self.ref_start
    }

    pub fn qry_len(&self) -> usize {
        self.qry_end + 1 - self.qry_start
    }

    pub fn overlaps_ref(&self, other: &AlignmentScore) -> bool {
        self.ref_start <= other.ref_end && other.ref_start <= self.ref_end
    }
}

/// Sorts by score, descending, with a shell sort over the increments
/// 1, 4, 13, 40, ... Equal scores may be reordered.
///
/// Works on owned records or on references to records held elsewhere; sort a
/// sub-range by passing a sub-slice.
pub fn rank_scores<S: Borrow<AlignmentScore>>(scores: &mut [S]) {
    let n = scores.len();
    let mut gap = 1;
    while gap * 3 + 1 <= n / 3 {
        gap = gap * 3 + 1;
    }

    loop {
        for i in gap..n {
            let mut j = i;
            while j >= gap && scores[j - gap].borrow().score < scores[j].borrow().score {
                scores.swap(j - gap, j);
                j -= gap;
            }
        }
        if gap == 1 {
            break;
        }
        gap = (gap - 1) / 3;
    }
}
