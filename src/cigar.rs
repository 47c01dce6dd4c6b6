//! Run-length alignment paths and the traceback walk that produces them.

use std::fmt;

use crate::error::Result;
use crate::packed::{Dir, DirMatrix};
use crate::settings::AlignmentSettings;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Operation {
    /// Match or mismatch, consumes both sequences.
    M,
    /// Query symbol against a gap in the reference.
    I,
    /// Reference symbol against a gap in the query.
    D
}

impl Operation {
    /// Operation of a traceback move; `Stop` has none.
    pub fn from_dir(dir: Dir) -> Option<Self> {
        match dir {
            Dir::Diagonal => Some(Operation::M),
            Dir::Left => Some(Operation::I),
            Dir::Up => Some(Operation::D),
            Dir::Stop => None
        }
    }

    pub fn to_dir(self) -> Dir {
        match self {
            Operation::M => Dir::Diagonal,
            Operation::I => Dir::Left,
            Operation::D => Dir::Up
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct OpLen {
    pub op: Operation,
    pub len: usize
}

/// Alignment path as runs of operations.
///
/// Runs are added from the end of the alignment towards its start, the order a
/// traceback visits them, and read back start to end.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Cigar {
    s: Vec<OpLen>
}

impl Cigar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends one operation, extending the first run when it matches.
    pub fn add(&mut self, op: Operation) {
        match self.s.last_mut() {
            Some(last) if last.op == op => last.len += 1,
            _ => self.s.push(OpLen { op, len: 1 })
        }
    }

    /// Number of runs.
    pub fn len(&self) -> usize {
        self.s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.s.is_empty()
    }

    /// Run `i`, counting from the start of the alignment.
    pub fn get(&self, i: usize) -> Option<OpLen> {
        let k = self.s.len().checked_sub(i)?.checked_sub(1)?;
        self.s.get(k).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = OpLen> + '_ {
        self.s.iter().rev().copied()
    }

    /// Reference symbols consumed.
    pub fn ref_len(&self) -> usize {
        self.iter().filter(|o| o.op != Operation::I).map(|o| o.len).sum()
    }

    /// Query symbols consumed.
    pub fn qry_len(&self) -> usize {
        self.iter().filter(|o| o.op != Operation::D).map(|o| o.len).sum()
    }

    /// Gapped query and reference strings; both slices start where the alignment starts.
    pub fn format(&self, q: &[u8], r: &[u8]) -> (String, String) {
        let mut a = String::with_capacity(self.qry_len() + self.ref_len());
        let mut b = String::with_capacity(a.capacity());
        let mut i = 0;
        let mut j = 0;

        for op_len in self.iter() {
            for _k in 0..op_len.len {
                match op_len.op {
                    Operation::M => {
                        a.push(q[i] as char);
                        b.push(r[j] as char);
                        i += 1;
                        j += 1;
                    },
                    Operation::I => {
                        a.push(q[i] as char);
                        b.push('-');
                        i += 1;
                    },
                    Operation::D => {
                        a.push('-');
                        b.push(r[j] as char);
                        j += 1;
                    }
                }
            }
        }

        (a, b)
    }

    /// Rescores the path; `q` and `r` are lookup indices starting where the alignment starts.
    ///
    /// Every run of `I` or `D` is scored as one gap.
    pub fn score(&self, q: &[u8], r: &[u8], settings: &AlignmentSettings) -> i64 {
        let mut i = 0;
        let mut j = 0;
        let mut res = 0i64;

        for op_len in self.iter() {
            match op_len.op {
                Operation::M => {
                    for _k in 0..op_len.len {
                        res += settings.matrix.get(q[i], r[j]) as i64;
                        i += 1;
                        j += 1;
                    }
                },
                Operation::I => {
                    res += settings.gap_cost(op_len.len);
                    i += op_len.len;
                },
                Operation::D => {
                    res += settings.gap_cost(op_len.len);
                    j += op_len.len;
                }
            }
        }

        res
    }
}

impl fmt::Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op_len in self.iter() {
            let c = match op_len.op {
                Operation::M => 'M',
                Operation::I => 'I',
                Operation::D => 'D'
            };
            write!(f, "{}{}", op_len.len, c)?;
        }
        Ok(())
    }
}

/// Walks a row-major direction matrix with `qry_len` columns back from `end`
/// (reference row, query column).
///
/// A local walk ends on `Stop` or at the matrix edge. A global walk ends at the
/// origin, emitting the gaps along the edge it reaches first. Returns the path
/// and the first cell on it.
pub(crate) fn traceback(matrix: &DirMatrix, qry_len: usize, end: (usize, usize), global: bool) -> Result<(Cigar, (usize, usize))> {
    let mut cur = matrix.view();
    cur.seek_from_start(end.0 * qry_len + end.1)?;

    let mut cigar = Cigar::new();
    let (mut i, mut j) = (end.0 as isize, end.1 as isize);
    let mut start = end;

    while i >= 0 && j >= 0 {
        let dir = cur.get();
        let Some(op) = Operation::from_dir(dir) else { break };
        cigar.add(op);
        start = (i as usize, j as usize);
        match dir {
            Dir::Diagonal => {
                i -= 1;
                j -= 1;
                if i >= 0 && j >= 0 {
                    cur.retreat_by(qry_len + 1)?;
                }
            },
            Dir::Up => {
                i -= 1;
                if i >= 0 {
                    cur.retreat_by(qry_len)?;
                }
            },
            _ => {
                j -= 1;
                if j >= 0 {
                    cur.retreat_one()?;
                }
            }
        }
    }

    if global {
        for _ in 0..i + 1 {
            cigar.add(Operation::D);
        }
        for _ in 0..j + 1 {
            cigar.add(Operation::I);
        }
        start = (0, 0);
    }

    Ok((cigar, start))
}

/// Replays a path stored as a code sequence, first move at element 0.
pub(crate) fn replay(path: &DirMatrix, moves: usize) -> Result<Cigar> {
    let mut cur = path.view();
    let mut cigar = Cigar::new();
    if moves == 0 {
        return Ok(cigar);
    }
    cur.seek_from_start(moves - 1)?;
    for k in (0..moves).rev() {
        if let Some(op) = Operation::from_dir(cur.get()) {
            cigar.add(op);
        }
        if k > 0 {
            cur.retreat_one()?;
        }
    }
    Ok(cigar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::{to_lookup, ScoreMatrix};

    fn cigar_of(ops: &[Operation]) -> Cigar {
        let mut c = Cigar::new();
        for &op in ops.iter().rev() {
            c.add(op);
        }
        c
    }

    #[test]
    fn test_runs() {
        use Operation::*;
        let c = cigar_of(&[M, M, I, D, D, M]);
        assert_eq!(c.to_string(), "2M1I2D1M");
        assert_eq!(c.len(), 4);
        assert_eq!(c.get(0), Some(OpLen { op: M, len: 2 }));
        assert_eq!(c.get(3), Some(OpLen { op: M, len: 1 }));
        assert_eq!(c.get(4), None);
        assert_eq!(c.get(usize::MAX), None);
        assert_eq!(c.ref_len(), 5);
        assert_eq!(c.qry_len(), 4);
        assert!(Cigar::new().is_empty());
    }

    #[test]
    fn test_format() {
        use Operation::*;
        let c = cigar_of(&[M, I, M, D, M]);
        let (a, b) = c.format(b"AXCG", b"ACTG");
        assert_eq!(a, "AXC-G");
        assert_eq!(b, "A-CTG");
    }

    #[test]
    fn test_score() {
        use Operation::*;
        let s = AlignmentSettings::new().with_matrix(ScoreMatrix::uniform(2, -1)).with_gap(-5, -2);
        let q = to_lookup(b"ACCCGT").unwrap();
        let r = to_lookup(b"ACGT").unwrap();
        // one gap of two, not two gaps of one
        let c = cigar_of(&[M, I, I, M, M, M]);
        assert_eq!(c.score(&q, &r, &s), 8 - 7);
        let c = cigar_of(&[M, I, M, I, M, M]);
        assert_eq!(c.score(&q, &r, &s), 8 - 10);
    }

    #[test]
    fn test_traceback_global_edges() {
        let dirs = [Dir::Diagonal, Dir::Left, Dir::Left, Dir::Up, Dir::Up, Dir::Diagonal];
        let m = DirMatrix::from_dirs(&dirs).unwrap();
        let (c, start) = traceback(&m, 3, (1, 2), true).unwrap();
        assert_eq!(c.to_string(), "1M1I1M");
        assert_eq!(start, (0, 0));
        let (c, _) = traceback(&m, 3, (1, 0), true).unwrap();
        assert_eq!(c.to_string(), "1M1D");

        // leaving through the top edge emits the remaining query as one gap
        let m = DirMatrix::from_dirs(&[Dir::Up, Dir::Up, Dir::Up]).unwrap();
        let (c, start) = traceback(&m, 3, (0, 2), true).unwrap();
        assert_eq!(c.to_string(), "2I1D");
        assert_eq!(start, (0, 0));
    }

    #[test]
    fn test_traceback_local_stop() {
        let dirs = [Dir::Stop, Dir::Stop, Dir::Stop, Dir::Stop, Dir::Diagonal, Dir::Stop, Dir::Stop, Dir::Up, Dir::Diagonal];
        let m = DirMatrix::from_dirs(&dirs).unwrap();
        let (c, start) = traceback(&m, 3, (2, 2), false).unwrap();
        assert_eq!(c.to_string(), "2M");
        assert_eq!(start, (1, 1));
    }

    #[test]
    fn test_replay() {
        let path = DirMatrix::from_dirs(&[Dir::Diagonal, Dir::Up, Dir::Up, Dir::Left, Dir::Diagonal]).unwrap();
        assert_eq!(replay(&path, 5).unwrap().to_string(), "1M2D1I1M");
        assert!(replay(&DirMatrix::default(), 0).unwrap().is_empty());
    }
}
