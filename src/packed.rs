//! Direction matrix packed four 2-bit codes to a byte.
//!
//! Code `k` of a limb lives in bits `2k..2k + 2`, so element `n` of the matrix is
//! code `n % 4` of limb `n / 4`. A [`Cursor`] addresses one element and every
//! move is bounds-checked against the allocated limbs.

use crate::error::{try_filled, AlignError, Result};

/// Traceback direction of one matrix cell.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    /// Start of a local alignment.
    Stop = 0b00,
    /// Gap in the reference: the query advanced alone.
    Left = 0b01,
    /// Gap in the query: the reference advanced alone.
    Up = 0b10,
    Diagonal = 0b11
}

impl Dir {
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Dir::Stop,
            0b01 => Dir::Left,
            0b10 => Dir::Up,
            _ => Dir::Diagonal
        }
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

pub const CODES_PER_LIMB: usize = 4;

/// Position inside a packed matrix: a limb index and the code slot inside that limb.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    limb: usize,
    sub: u8
}

impl Cursor {
    #[inline]
    pub const fn at(index: usize) -> Self {
        Self { limb: index / CODES_PER_LIMB, sub: (index % CODES_PER_LIMB) as u8 }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.limb * CODES_PER_LIMB + self.sub as usize
    }

    #[inline]
    pub const fn limb(self) -> usize {
        self.limb
    }

    #[inline]
    pub const fn sub(self) -> u8 {
        self.sub
    }
}

/// Packed 2-bit codes plus a cursor.
///
/// The storage decides ownership: [`DirMatrix`] owns its limbs, while [`DirView`]
/// and [`DirViewMut`] borrow them and carry an independent cursor. Dropping a view
/// never touches the buffer.
#[derive(Clone, Debug)]
pub struct Packed<S> {
    limbs: S,
    cursor: Cursor
}

pub type DirMatrix = Packed<Vec<u8>>;
pub type DirView<'a> = Packed<&'a [u8]>;
pub type DirViewMut<'a> = Packed<&'a mut [u8]>;

impl<S: AsRef<[u8]>> Packed<S> {
    #[inline]
    pub fn limbs(&self) -> &[u8] {
        self.limbs.as_ref()
    }

    /// Number of addressable codes, always a multiple of four.
    #[inline]
    pub fn len(&self) -> usize {
        self.limbs.as_ref().len() * CODES_PER_LIMB
    }

    /// A blank matrix is a zero-length placeholder: it reads as `Stop` and ignores writes.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.limbs.as_ref().is_empty()
    }

    #[inline]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.cursor.index()
    }

    #[inline]
    pub fn get(&self) -> Dir {
        self.limbs
            .as_ref()
            .get(self.cursor.limb)
            .map_or(Dir::Stop, |&l| Dir::from_bits(l >> (2 * self.cursor.sub)))
    }

    /// Borrowing view that starts at the same position as this cursor.
    pub fn view(&self) -> DirView<'_> {
        Packed { limbs: self.limbs.as_ref(), cursor: self.cursor }
    }

    fn out_of_bounds(&self, delta: i128) -> AlignError {
        AlignError::OutOfBounds { pos: self.cursor.index(), delta, len: self.len() }
    }

    fn jump(&mut self, target: Option<usize>, delta: i128) -> Result<()> {
        match target {
            Some(t) if t < self.len().max(1) => {
                self.cursor = Cursor::at(t);
                Ok(())
            },
            _ => Err(self.out_of_bounds(delta))
        }
    }

    /// Moves one code forward, carrying into the next limb after slot 3.
    #[inline]
    pub fn advance_one(&mut self) -> Result<()> {
        let sub = self.cursor.sub + 1;
        let next = Cursor { limb: self.cursor.limb + (sub >> 2) as usize, sub: sub & 0b11 };
        if next.index() >= self.len() {
            return Err(self.out_of_bounds(1));
        }
        self.cursor = next;
        Ok(())
    }

    /// Moves one code back, borrowing from the previous limb before slot 0.
    #[inline]
    pub fn retreat_one(&mut self) -> Result<()> {
        if self.cursor.index() == 0 {
            return Err(self.out_of_bounds(-1));
        }
        // slot 0 wraps to 255, whose top bit is the borrow
        let sub = self.cursor.sub.wrapping_sub(1);
        self.cursor = Cursor { limb: self.cursor.limb - (sub >> 7) as usize, sub: sub & 0b11 };
        Ok(())
    }

    pub fn advance_by(&mut self, n: usize) -> Result<()> {
        let target = self.cursor.index().checked_add(n);
        self.jump(target, n as i128)
    }

    pub fn retreat_by(&mut self, n: usize) -> Result<()> {
        let target = self.cursor.index().checked_sub(n);
        self.jump(target, -(n as i128))
    }

    pub fn seek_from_start(&mut self, n: usize) -> Result<()> {
        let delta = n as i128 - self.cursor.index() as i128;
        self.jump(Some(n), delta)
    }

    /// Jumps to slot 0 of the next limb.
    pub fn next_limb(&mut self) -> Result<()> {
        let limb = self.cursor.limb + 1;
        if limb >= self.limbs.as_ref().len() {
            return Err(self.out_of_bounds((CODES_PER_LIMB - self.cursor.sub as usize) as i128));
        }
        self.cursor = Cursor { limb, sub: 0 };
        Ok(())
    }

    /// Jumps to slot 0 of the previous limb.
    pub fn previous_limb(&mut self) -> Result<()> {
        if self.cursor.limb == 0 {
            return Err(self.out_of_bounds(-(self.cursor.sub as i128 + CODES_PER_LIMB as i128)));
        }
        self.cursor = Cursor { limb: self.cursor.limb - 1, sub: 0 };
        Ok(())
    }
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> Packed<S> {
    /// Overwrites the code under the cursor, leaving the other three codes of the limb intact.
    #[inline]
    pub fn set(&mut self, dir: Dir) {
        let Cursor { limb, sub } = self.cursor;
        if let Some(l) = self.limbs.as_mut().get_mut(limb) {
            let shift = 2 * sub;
            *l = (*l & !(0b11 << shift)) | (dir.bits() << shift);
        }
    }

    /// Writes the code under the cursor and moves one code forward.
    #[inline]
    pub fn push(&mut self, dir: Dir) -> Result<()> {
        self.set(dir);
        self.advance_one()
    }

    pub fn view_mut(&mut self) -> DirViewMut<'_> {
        Packed { limbs: self.limbs.as_mut(), cursor: self.cursor }
    }
}

impl DirMatrix {
    /// Allocates room for `num_cells` codes, all `Stop`, with the cursor at element 0.
    ///
    /// One limb beyond `ceil(num_cells / 4)` is kept so that a cursor may step past
    /// the last written cell. A `blank` matrix allocates nothing.
    pub fn allocate(num_cells: usize, blank: bool) -> Result<Self> {
        if blank {
            return Ok(Self::default());
        }
        let limbs = num_cells / CODES_PER_LIMB + usize::from(num_cells % CODES_PER_LIMB != 0) + 1;
        log::trace!("allocating {} limbs for {} direction codes", limbs, num_cells);
        Ok(Packed { limbs: try_filled("direction matrix", limbs, 0u8)?, cursor: Cursor::default() })
    }

    #[inline]
    pub fn new(num_cells: usize) -> Result<Self> {
        Self::allocate(num_cells, false)
    }

    /// Packs a code sequence, first code at element 0.
    pub fn from_dirs(dirs: &[Dir]) -> Result<Self> {
        let mut m = Self::new(dirs.len())?;
        for &d in dirs {
            m.push(d)?;
        }
        m.cursor = Cursor::default();
        Ok(m)
    }

    /// Releases the buffer. Calling it again is a no-op.
    pub fn free(&mut self) {
        self.limbs = Vec::new();
        self.cursor = Cursor::default();
    }
}

impl Default for DirMatrix {
    fn default() -> Self {
        Packed { limbs: Vec::new(), cursor: Cursor::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dir_strategy() -> impl Strategy<Value = Dir> {
        (0u8..4).prop_map(Dir::from_bits)
    }

    #[test]
    fn test_layout() {
        let mut m = DirMatrix::new(6).unwrap();
        assert_eq!(m.limbs().len(), 3);
        assert_eq!(m.len(), 12);

        for d in [Dir::Diagonal, Dir::Up, Dir::Left, Dir::Stop, Dir::Up] {
            m.push(d).unwrap();
        }
        assert_eq!(m.limbs()[0], 0b00_01_10_11);
        assert_eq!(m.limbs()[1], 0b10);
        assert_eq!(m.cursor(), Cursor::at(5));
        assert_eq!((m.cursor().limb(), m.cursor().sub()), (1, 1));
    }

    #[test]
    fn test_set_keeps_neighbours() {
        let mut m = DirMatrix::from_dirs(&[Dir::Diagonal; 8]).unwrap();
        m.seek_from_start(6).unwrap();
        m.set(Dir::Left);
        assert_eq!(m.limbs()[1], 0b11_01_11_11);
        m.retreat_one().unwrap();
        assert_eq!(m.get(), Dir::Diagonal);
    }

    #[test]
    fn test_carry_and_borrow() {
        let mut m = DirMatrix::new(8).unwrap();
        m.seek_from_start(3).unwrap();
        m.advance_one().unwrap();
        assert_eq!((m.cursor().limb(), m.cursor().sub()), (1, 0));
        m.retreat_one().unwrap();
        assert_eq!((m.cursor().limb(), m.cursor().sub()), (0, 3));
    }

    #[test]
    fn test_limb_jumps() {
        let mut m = DirMatrix::new(8).unwrap();
        m.seek_from_start(2).unwrap();
        m.next_limb().unwrap();
        assert_eq!(m.index(), 4);
        m.advance_one().unwrap();
        m.previous_limb().unwrap();
        assert_eq!(m.index(), 0);
        assert!(matches!(m.previous_limb(), Err(AlignError::OutOfBounds { .. })));
        m.seek_from_start(8).unwrap();
        assert!(m.next_limb().is_err());
    }

    #[test]
    fn test_bounds() {
        let mut m = DirMatrix::new(4).unwrap();
        assert_eq!(m.len(), 8);
        assert_eq!(m.retreat_one(), Err(AlignError::OutOfBounds { pos: 0, delta: -1, len: 8 }));
        assert!(m.advance_by(7).is_ok());
        assert!(m.advance_one().is_err());
        assert_eq!(m.index(), 7);
        assert!(m.seek_from_start(8).is_err());
        assert!(m.retreat_by(8).is_err());
        assert!(m.retreat_by(7).is_ok());
    }

    #[test]
    fn test_blank_and_free() {
        let mut m = DirMatrix::allocate(100, true).unwrap();
        assert!(m.is_blank());
        assert_eq!(m.get(), Dir::Stop);
        m.set(Dir::Up);
        assert_eq!(m.get(), Dir::Stop);
        assert!(m.advance_one().is_err());
        assert!(m.seek_from_start(0).is_ok());

        let mut m = DirMatrix::from_dirs(&[Dir::Up, Dir::Left]).unwrap();
        m.free();
        assert!(m.is_blank());
        m.free();
        assert!(m.is_blank());
        assert_eq!(m.index(), 0);
    }

    #[test]
    fn test_views_share_buffer() {
        let mut m = DirMatrix::new(10).unwrap();
        m.seek_from_start(5).unwrap();
        {
            let mut w = m.view_mut();
            assert_eq!(w.index(), 5);
            w.push(Dir::Up).unwrap();
            w.set(Dir::Left);
        }
        assert_eq!(m.index(), 5);
        let mut v = m.view();
        assert_eq!(v.get(), Dir::Up);
        v.advance_one().unwrap();
        assert_eq!(v.get(), Dir::Left);
        assert_eq!(m.get(), Dir::Up);
    }

    proptest! {
        #[test]
        fn prop_round_trip(dirs in prop::collection::vec(dir_strategy(), 0..200)) {
            let m = DirMatrix::from_dirs(&dirs).unwrap();
            let mut v = m.view();
            for (i, &d) in dirs.iter().enumerate() {
                v.seek_from_start(i).unwrap();
                prop_assert_eq!(v.get(), d);
            }
            // same codes read backwards
            if !dirs.is_empty() {
                v.seek_from_start(dirs.len() - 1).unwrap();
                for &d in dirs.iter().rev() {
                    prop_assert_eq!(v.get(), d);
                    let _ = v.retreat_one();
                }
            }
        }

        #[test]
        fn prop_set_keeps_others(dirs in prop::collection::vec(dir_strategy(), 1..200), at in 0usize..200, new in dir_strategy()) {
            let at = at % dirs.len();
            let mut m = DirMatrix::from_dirs(&dirs).unwrap();
            m.seek_from_start(at).unwrap();
            m.set(new);
            prop_assert_eq!(m.get(), new);

            let mut v = m.view();
            for (i, &d) in dirs.iter().enumerate() {
                v.seek_from_start(i).unwrap();
                prop_assert_eq!(v.get(), if i == at { new } else { d });
            }
        }

        #[test]
        fn prop_cursor_symmetry(cells in 1usize..300, start in 0usize..300, n in 0usize..300) {
            let mut m = DirMatrix::new(cells).unwrap();
            let start = start % m.len();
            m.seek_from_start(start).unwrap();
            if m.advance_by(n).is_ok() {
                prop_assert_eq!(m.index(), start + n);
                m.retreat_by(n).unwrap();
                prop_assert_eq!(m.index(), start);
            } else {
                prop_assert!(start + n >= m.len());
                prop_assert_eq!(m.index(), start);
            }

            let mut stepped = m.view();
            let mut ok = true;
            for _ in 0..n {
                ok &= stepped.advance_one().is_ok();
            }
            if ok {
                prop_assert_eq!(stepped.index(), start + n);
                for _ in 0..n {
                    stepped.retreat_one().unwrap();
                }
                prop_assert_eq!(stepped.cursor(), m.cursor());
            }
        }
    }
}
