//! Portable vector primitives over 8, 16 and 32-bit signed lanes.
//!
//! [`SimdOps<T>`] is implemented once per backend and lane type; [`VectorOps`]
//! bundles the three lane widths of a backend together with the widening and
//! narrowing conversions between them. [`Engine`] is the backend chosen at
//! compile time from the enabled target features and cargo features.
//!
//! All operations are `unsafe` because the hardware backends require CPU support
//! for their instruction set, and loads/stores dereference raw pointers.
//!
//! Lane 0 is the lowest memory address. "Left" byte shifts move lanes towards
//! higher indices and shift in zeros, like `_mm_slli_si128`.
//!
//! Comparisons produce masks whose lanes are all ones or all zeros. `movemask`
//! returns the raw per-backend bit pattern; call `fix_mask_count` to get exactly
//! one bit per lane.

use std::fmt::Debug;
use std::mem::size_of;
use std::ops::{BitAnd, BitOr, BitXor, Not};

pub mod scalar;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod sse2;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod avx2;

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "simd_avx512"))]
pub mod avx512;

#[cfg(target_arch = "aarch64")]
pub mod neon;

/// Widest register handled by any backend, in bytes.
pub const MAX_VECTOR_BYTES: usize = 64;

/// Most lanes any backend can have (64 lanes of 8 bits).
pub const MAX_LANES: usize = MAX_VECTOR_BYTES;

/// Scalar lane types with wrapping and saturating helpers used by the scalar
/// backend and by emulated instructions.
pub trait Lane:
    Copy
    + Default
    + Debug
    + Ord
    + Send
    + Sync
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + 'static
{
    const BITS: u32;
    const MIN: Self;
    const MAX: Self;
    const ZERO: Self;
    /// All bits set, the "true" lane of a mask.
    const ONES: Self;

    /// Converts with saturation to `MIN..=MAX`.
    fn from_i32(v: i32) -> Self;
    fn to_i32(self) -> i32;
    fn add_wrap(self, o: Self) -> Self;
    fn sub_wrap(self, o: Self) -> Self;
    fn add_sat(self, o: Self) -> Self;
    fn sub_sat(self, o: Self) -> Self;
    fn shr_arith(self, n: u32) -> Self;
    fn shl_wrap(self, n: u32) -> Self;
    /// Bit pattern reinterpreted as unsigned.
    fn as_unsigned(self) -> u32;
}

macro_rules! impl_lane {
    ($t:ty, $u:ty) => {
        impl Lane for $t {
            const BITS: u32 = <$t>::BITS;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
            const ZERO: Self = 0;
            const ONES: Self = -1;

            #[inline]
            fn from_i32(v: i32) -> Self { v.clamp(<$t>::MIN as i32, <$t>::MAX as i32) as $t }
            #[inline]
            fn to_i32(self) -> i32 { self as i32 }
            #[inline]
            fn add_wrap(self, o: Self) -> Self { self.wrapping_add(o) }
            #[inline]
            fn sub_wrap(self, o: Self) -> Self { self.wrapping_sub(o) }
            #[inline]
            fn add_sat(self, o: Self) -> Self { self.saturating_add(o) }
            #[inline]
            fn sub_sat(self, o: Self) -> Self { self.saturating_sub(o) }
            #[inline]
            fn shr_arith(self, n: u32) -> Self { self >> n.min(<$t>::BITS - 1) }
            #[inline]
            fn shl_wrap(self, n: u32) -> Self { if n >= <$t>::BITS { 0 } else { self << n } }
            #[inline]
            fn as_unsigned(self) -> u32 { self as $u as u32 }
        }
    };
}

impl_lane!(i8, u8);
impl_lane!(i16, u16);
impl_lane!(i32, u32);

/// Vector primitives for one lane type.
pub trait SimdOps<T: Lane> {
    const LANES: usize;
    /// Raw `movemask` bits produced per lane.
    const MASK_STRIDE: u32;
    type V: Copy;

    /// `ptr` must be aligned to the register width.
    unsafe fn load(ptr: *const T) -> Self::V;
    unsafe fn loadu(ptr: *const T) -> Self::V;
    /// `ptr` must be aligned to the register width.
    unsafe fn store(ptr: *mut T, a: Self::V);
    unsafe fn storeu(ptr: *mut T, a: Self::V);

    unsafe fn zero() -> Self::V;
    unsafe fn set1(x: T) -> Self::V;

    unsafe fn cmpeq(a: Self::V, b: Self::V) -> Self::V;
    unsafe fn cmpgt(a: Self::V, b: Self::V) -> Self::V;
    #[inline]
    unsafe fn cmplt(a: Self::V, b: Self::V) -> Self::V {
        <Self as SimdOps<T>>::cmpgt(b, a)
    }

    unsafe fn and(a: Self::V, b: Self::V) -> Self::V;
    /// `!a & b`
    unsafe fn andnot(a: Self::V, b: Self::V) -> Self::V;
    unsafe fn or(a: Self::V, b: Self::V) -> Self::V;
    unsafe fn xor(a: Self::V, b: Self::V) -> Self::V;

    /// Arithmetic right shift of every lane, `n < T::BITS`.
    unsafe fn srai(a: Self::V, n: u32) -> Self::V;
    /// Left shift of every lane, `n < T::BITS`.
    unsafe fn slli(a: Self::V, n: u32) -> Self::V;

    /// Whole-register shift by `n` bytes towards higher lanes.
    unsafe fn sl_bytes(a: Self::V, n: usize) -> Self::V;
    /// Whole-register shift by `n` bytes towards lane 0.
    unsafe fn sr_bytes(a: Self::V, n: usize) -> Self::V;

    unsafe fn add(a: Self::V, b: Self::V) -> Self::V;
    unsafe fn sub(a: Self::V, b: Self::V) -> Self::V;
    unsafe fn adds(a: Self::V, b: Self::V) -> Self::V;
    unsafe fn subs(a: Self::V, b: Self::V) -> Self::V;

    unsafe fn min(a: Self::V, b: Self::V) -> Self::V;
    unsafe fn max(a: Self::V, b: Self::V) -> Self::V;
    /// Min and max of the lanes read as unsigned integers.
    unsafe fn min_unsigned(a: Self::V, b: Self::V) -> Self::V;
    unsafe fn max_unsigned(a: Self::V, b: Self::V) -> Self::V;

    /// Sign bits of the lanes, `MASK_STRIDE` raw bits per lane.
    unsafe fn movemask(a: Self::V) -> u64;

    /// Normalizes a raw `movemask` result to one bit per lane.
    #[inline]
    fn fix_mask_count(raw: u64) -> u64 {
        compress_mask(raw, <Self as SimdOps<T>>::MASK_STRIDE)
    }

    /// Lanes of `a` where `mask` is set, lanes of `b` elsewhere.
    #[inline]
    unsafe fn blend(mask: Self::V, a: Self::V, b: Self::V) -> Self::V {
        <Self as SimdOps<T>>::or(
            <Self as SimdOps<T>>::and(mask, a),
            <Self as SimdOps<T>>::andnot(mask, b)
        )
    }

    /// Horizontal maximum.
    #[inline]
    unsafe fn hmax(a: Self::V) -> T {
        let buf = to_lanes::<T, Self>(a);
        buf[..<Self as SimdOps<T>>::LANES].iter().copied().fold(T::MIN, Ord::max)
    }
}

/// All three lane widths of one backend plus conversions between them.
pub trait VectorOps: SimdOps<i8> + SimdOps<i16> + SimdOps<i32> + Sized {
    const NAME: &'static str;

    /// Whether the running CPU can execute this backend.
    fn available() -> bool;

    /// Sign-extends the low half of the 8-bit lanes.
    unsafe fn widen_i8_i16(a: <Self as SimdOps<i8>>::V) -> <Self as SimdOps<i16>>::V;
    /// Sign-extends the low half of the 16-bit lanes.
    unsafe fn widen_i16_i32(a: <Self as SimdOps<i16>>::V) -> <Self as SimdOps<i32>>::V;
    /// Saturating narrow; `a` fills the low lanes and `b` the high lanes.
    unsafe fn narrow_i16_i8(a: <Self as SimdOps<i16>>::V, b: <Self as SimdOps<i16>>::V) -> <Self as SimdOps<i8>>::V;
    unsafe fn narrow_i32_i16(a: <Self as SimdOps<i32>>::V, b: <Self as SimdOps<i32>>::V) -> <Self as SimdOps<i16>>::V;
}

/// Keeps the highest raw bit of every `stride`-bit group, which is the bit taken
/// from the most significant byte of the lane.
#[inline]
pub fn compress_mask(raw: u64, stride: u32) -> u64 {
    if stride <= 1 {
        return raw;
    }
    let mut out = 0u64;
    let mut lane = 0;
    let mut shift = 0;
    while shift + stride <= 64 {
        out |= ((raw >> (shift + stride - 1)) & 1) << lane;
        lane += 1;
        shift += stride;
    }
    out
}

/// Stores a register into a lane buffer; only the first `S::LANES` entries are meaningful.
#[inline]
pub unsafe fn to_lanes<T: Lane, S: SimdOps<T> + ?Sized>(a: S::V) -> [T; MAX_LANES] {
    let mut buf = [T::ZERO; MAX_LANES];
    S::storeu(buf.as_mut_ptr(), a);
    buf
}

/// Fallback byte shift through memory for counts without a dedicated instruction.
pub(crate) unsafe fn shift_bytes_via_memory<T: Lane, S: SimdOps<T> + ?Sized>(a: S::V, n: usize, left: bool) -> S::V {
    let width = size_of::<S::V>();
    let mut src = [0u8; MAX_VECTOR_BYTES];
    let mut dst = [0u8; MAX_VECTOR_BYTES];
    S::storeu(src.as_mut_ptr() as *mut T, a);
    if n < width {
        if left {
            dst[n..width].copy_from_slice(&src[..width - n]);
        } else {
            dst[..width - n].copy_from_slice(&src[n..width]);
        }
    }
    S::loadu(dst.as_ptr() as *const T)
}

/// Signed max built from a compare, for lane types without a native instruction.
#[inline(always)]
pub(crate) unsafe fn max_via_cmp<T: Lane, S: SimdOps<T>>(a: S::V, b: S::V) -> S::V {
    S::xor(b, S::and(S::xor(a, b), S::cmpgt(a, b)))
}

#[inline(always)]
pub(crate) unsafe fn min_via_cmp<T: Lane, S: SimdOps<T>>(a: S::V, b: S::V) -> S::V {
    S::xor(b, S::and(S::xor(a, b), S::cmpgt(b, a)))
}

/// Saturating 32-bit add: on signed overflow the result is pinned to the limit
/// matching the sign of `a`.
#[inline(always)]
pub(crate) unsafe fn adds_i32_via_wrap<S: SimdOps<i32>>(a: S::V, b: S::V) -> S::V {
    let sum = S::add(a, b);
    // overflow iff a and b agree in sign and the sum does not
    let overflow = S::srai(S::andnot(S::xor(a, b), S::xor(a, sum)), 31);
    let limit = S::xor(S::srai(a, 31), S::set1(i32::MAX));
    S::blend(overflow, limit, sum)
}

#[inline(always)]
pub(crate) unsafe fn subs_i32_via_wrap<S: SimdOps<i32>>(a: S::V, b: S::V) -> S::V {
    let diff = S::sub(a, b);
    // overflow iff a and b differ in sign and the difference does not match a
    let overflow = S::srai(S::and(S::xor(a, b), S::xor(a, diff)), 31);
    let limit = S::xor(S::srai(a, 31), S::set1(i32::MAX));
    S::blend(overflow, limit, diff)
}

/// Unsigned 32-bit `a > b` from signed compares: compare the halved values, and
/// when the halves tie let the dropped low bits decide.
#[inline(always)]
pub(crate) unsafe fn cmpgt_u32_via_halving<S: SimdOps<i32>>(a: S::V, b: S::V) -> S::V {
    let low31 = S::set1(i32::MAX);
    let ha = S::and(S::srai(a, 1), low31);
    let hb = S::and(S::srai(b, 1), low31);
    let low_gt = S::sub(S::zero(), S::and(S::andnot(b, a), S::set1(1)));
    S::or(S::cmpgt(ha, hb), S::and(S::cmpeq(ha, hb), low_gt))
}

#[inline(always)]
pub(crate) unsafe fn max_u32_via_halving<S: SimdOps<i32>>(a: S::V, b: S::V) -> S::V {
    S::blend(cmpgt_u32_via_halving::<S>(a, b), a, b)
}

#[inline(always)]
pub(crate) unsafe fn min_u32_via_halving<S: SimdOps<i32>>(a: S::V, b: S::V) -> S::V {
    S::blend(cmpgt_u32_via_halving::<S>(a, b), b, a)
}

#[cfg(feature = "no_simd")]
pub type Engine = scalar::Scalar;

#[cfg(all(
    not(feature = "no_simd"),
    any(target_arch = "x86", target_arch = "x86_64"),
    feature = "simd_avx512",
    target_feature = "avx512bw"
))]
pub type Engine = avx512::Avx512;

#[cfg(all(
    not(feature = "no_simd"),
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "avx2",
    not(all(feature = "simd_avx512", target_feature = "avx512bw"))
))]
pub type Engine = avx2::Avx2;

#[cfg(all(
    not(feature = "no_simd"),
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2",
    not(target_feature = "avx2")
))]
pub type Engine = sse2::Sse2;

#[cfg(all(
    not(feature = "no_simd"),
    any(target_arch = "x86", target_arch = "x86_64"),
    not(target_feature = "sse2")
))]
pub type Engine = scalar::Scalar;

#[cfg(all(not(feature = "no_simd"), target_arch = "aarch64", target_feature = "neon", feature = "simd_neon64"))]
pub type Engine = neon::Neon64;

#[cfg(all(not(feature = "no_simd"), target_arch = "aarch64", target_feature = "neon", not(feature = "simd_neon64")))]
pub type Engine = neon::Neon128;

#[cfg(all(not(feature = "no_simd"), target_arch = "aarch64", not(target_feature = "neon")))]
pub type Engine = scalar::Scalar;

#[cfg(all(not(feature = "no_simd"), not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64"))))]
pub type Engine = scalar::Scalar;

/// Name of the compile-time selected backend.
pub const BACKEND_NAME: &str = <Engine as VectorOps>::NAME;

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Values that exercise saturation, sign handling and low-bit ties.
    pub fn edge_values<T: Lane>() -> Vec<T> {
        let mut v = vec![T::MIN, T::MAX, T::ZERO, T::ONES, T::from_i32(1), T::from_i32(2), T::from_i32(-2)];
        v.push(T::MIN.add_wrap(T::from_i32(1)));
        v.push(T::MAX.sub_wrap(T::from_i32(1)));
        v.push(T::from_i32(100));
        v.push(T::from_i32(101));
        v.push(T::from_i32(-100));
        v.push(T::from_i32(-101));
        v
    }

    unsafe fn vec_of<T: Lane, S: SimdOps<T>>(vals: &[T]) -> S::V {
        let mut buf = [T::ZERO; MAX_LANES];
        for (i, b) in buf.iter_mut().take(S::LANES).enumerate() {
            *b = vals[i % vals.len()];
        }
        S::loadu(buf.as_ptr())
    }

    fn mask_lane<T: Lane>(b: bool) -> T {
        if b { T::ONES } else { T::ZERO }
    }

    fn check_lanes<T: Lane, S: SimdOps<T>>(op: &str, got: S::V, a: &[T], b: &[T], f: impl Fn(T, T) -> T) {
        let got = unsafe { to_lanes::<T, S>(got) };
        for i in 0..S::LANES {
            let (x, y) = (a[i % a.len()], b[i % b.len()]);
            assert_eq!(got[i], f(x, y), "{} lane {} of {:?} and {:?}", op, i, x, y);
        }
    }

    /// Checks every primitive of backend `S` against lane-wise scalar arithmetic.
    pub unsafe fn check_ops<T: Lane, S: SimdOps<T>>(a: &[T], b: &[T]) {
        let (va, vb) = (vec_of::<T, S>(a), vec_of::<T, S>(b));

        check_lanes::<T, S>("add", S::add(va, vb), a, b, |x, y| x.add_wrap(y));
        check_lanes::<T, S>("sub", S::sub(va, vb), a, b, |x, y| x.sub_wrap(y));
        check_lanes::<T, S>("adds", S::adds(va, vb), a, b, |x, y| x.add_sat(y));
        check_lanes::<T, S>("subs", S::subs(va, vb), a, b, |x, y| x.sub_sat(y));
        check_lanes::<T, S>("min", S::min(va, vb), a, b, |x, y| x.min(y));
        check_lanes::<T, S>("max", S::max(va, vb), a, b, |x, y| x.max(y));
        check_lanes::<T, S>("min_unsigned", S::min_unsigned(va, vb), a, b, |x, y| {
            if x.as_unsigned() < y.as_unsigned() { x } else { y }
        });
        check_lanes::<T, S>("max_unsigned", S::max_unsigned(va, vb), a, b, |x, y| {
            if x.as_unsigned() > y.as_unsigned() { x } else { y }
        });
        check_lanes::<T, S>("cmpeq", S::cmpeq(va, vb), a, b, |x, y| mask_lane(x == y));
        check_lanes::<T, S>("cmpgt", S::cmpgt(va, vb), a, b, |x, y| mask_lane(x > y));
        check_lanes::<T, S>("cmplt", S::cmplt(va, vb), a, b, |x, y| mask_lane(x < y));
        check_lanes::<T, S>("and", S::and(va, vb), a, b, |x, y| x & y);
        check_lanes::<T, S>("andnot", S::andnot(va, vb), a, b, |x, y| !x & y);
        check_lanes::<T, S>("or", S::or(va, vb), a, b, |x, y| x | y);
        check_lanes::<T, S>("xor", S::xor(va, vb), a, b, |x, y| x ^ y);
        check_lanes::<T, S>("blend", S::blend(S::cmpgt(va, vb), vb, va), a, b, |x, y| if x > y { y } else { x });

        for n in [0, 1, 3, T::BITS - 1] {
            check_lanes::<T, S>("srai", S::srai(va, n), a, b, |x, _| x.shr_arith(n));
            check_lanes::<T, S>("slli", S::slli(va, n), a, b, |x, _| x.shl_wrap(n));
        }

        let raw = S::movemask(va);
        let fixed = S::fix_mask_count(raw);
        for i in 0..S::LANES {
            assert_eq!((fixed >> i) & 1 == 1, a[i % a.len()] < T::ZERO, "movemask lane {}", i);
        }
        if S::LANES < 64 {
            assert_eq!(fixed >> S::LANES, 0);
        }

        let expected_max = (0..S::LANES).map(|i| a[i % a.len()]).max().unwrap();
        assert_eq!(S::hmax(va), expected_max);
    }

    /// Checks both byte shifts for every count up to the register width.
    pub unsafe fn check_byte_shifts<T: Lane, S: SimdOps<T>>(a: &[T]) {
        let width = size_of::<S::V>();
        let va = vec_of::<T, S>(a);
        let mut src = [0u8; MAX_VECTOR_BYTES];
        S::storeu(src.as_mut_ptr() as *mut T, va);

        for n in 0..=width {
            let mut left = [0u8; MAX_VECTOR_BYTES];
            let mut right = [0u8; MAX_VECTOR_BYTES];
            S::storeu(left.as_mut_ptr() as *mut T, S::sl_bytes(va, n));
            S::storeu(right.as_mut_ptr() as *mut T, S::sr_bytes(va, n));
            for i in 0..width {
                let l = if i >= n { src[i - n] } else { 0 };
                let r = if i + n < width { src[i + n] } else { 0 };
                assert_eq!(left[i], l, "sl_bytes by {} at byte {}", n, i);
                assert_eq!(right[i], r, "sr_bytes by {} at byte {}", n, i);
            }
        }
    }

    pub unsafe fn check_conversions<S: VectorOps>(a8: &[i8], a16: &[i16], b16: &[i16], a32: &[i32], b32: &[i32]) {
        let w = to_lanes::<i16, S>(S::widen_i8_i16(vec_of::<i8, S>(a8)));
        for i in 0..<S as SimdOps<i16>>::LANES {
            assert_eq!(w[i], a8[i % a8.len()] as i16, "widen_i8_i16 lane {}", i);
        }
        let w = to_lanes::<i32, S>(S::widen_i16_i32(vec_of::<i16, S>(a16)));
        for i in 0..<S as SimdOps<i32>>::LANES {
            assert_eq!(w[i], a16[i % a16.len()] as i32, "widen_i16_i32 lane {}", i);
        }

        let half = <S as SimdOps<i16>>::LANES;
        let n = to_lanes::<i8, S>(S::narrow_i16_i8(vec_of::<i16, S>(a16), vec_of::<i16, S>(b16)));
        for i in 0..<S as SimdOps<i8>>::LANES {
            let src = if i < half { a16[i % a16.len()] } else { b16[(i - half) % b16.len()] };
            assert_eq!(n[i], i8::from_i32(src as i32), "narrow_i16_i8 lane {}", i);
        }
        let half = <S as SimdOps<i32>>::LANES;
        let n = to_lanes::<i16, S>(S::narrow_i32_i16(vec_of::<i32, S>(a32), vec_of::<i32, S>(b32)));
        for i in 0..<S as SimdOps<i16>>::LANES {
            let src = if i < half { a32[i % a32.len()] } else { b32[(i - half) % b32.len()] };
            assert_eq!(n[i], i16::from_i32(src), "narrow_i32_i16 lane {}", i);
        }
    }

    fn pairs<T: Lane>() -> (Vec<T>, Vec<T>) {
        let vals = edge_values::<T>();
        let mut a = Vec::new();
        let mut b = Vec::new();
        for &x in &vals {
            for &y in &vals {
                a.push(x);
                b.push(y);
            }
            // differ only in the lowest bit
            a.push(x);
            b.push(x ^ T::from_i32(1));
        }
        (a, b)
    }

    /// Runs the full primitive suite over every edge-value pair, a register at a time.
    pub unsafe fn check_backend<S: VectorOps>() {
        fn chunks<T: Lane>(a: &[T], b: &[T], lanes: usize) -> Vec<(Vec<T>, Vec<T>)> {
            a.chunks(lanes).zip(b.chunks(lanes)).map(|(x, y)| (x.to_vec(), y.to_vec())).collect()
        }

        let (a, b) = pairs::<i8>();
        for (x, y) in chunks(&a, &b, <S as SimdOps<i8>>::LANES) {
            check_ops::<i8, S>(&x, &y);
        }
        let (a, b) = pairs::<i16>();
        for (x, y) in chunks(&a, &b, <S as SimdOps<i16>>::LANES) {
            check_ops::<i16, S>(&x, &y);
        }
        let (a, b) = pairs::<i32>();
        for (x, y) in chunks(&a, &b, <S as SimdOps<i32>>::LANES) {
            check_ops::<i32, S>(&x, &y);
        }

        let bytes: Vec<i8> = (1..=64).collect();
        check_byte_shifts::<i8, S>(&bytes);
        check_byte_shifts::<i16, S>(&(1..=32).collect::<Vec<i16>>());
        check_byte_shifts::<i32, S>(&(1..=16).collect::<Vec<i32>>());

        check_conversions::<S>(
            &edge_values::<i8>(),
            &edge_values::<i16>(),
            &[300, -300, 127, -128, 5],
            &edge_values::<i32>(),
            &[70000, -70000, 32767, -32768, 9]
        );
    }

    #[test]
    fn test_compress_mask() {
        assert_eq!(compress_mask(0b1011, 1), 0b1011);
        assert_eq!(compress_mask(0b1100_0011, 2), 0b1001);
        assert_eq!(compress_mask(0xF0F0, 4), 0b1010);
        assert_eq!(compress_mask(0xFF00_0000_0000_00FF, 8), 0b1000_0001);
        assert_eq!(compress_mask(u64::MAX, 32), 0b11);
        assert_eq!(compress_mask(0b01_10, 2), 0b01);
    }

    #[test]
    fn test_engine_matches_scalar_arithmetic() {
        unsafe { check_backend::<Engine>() };
        assert!(!BACKEND_NAME.is_empty());
        assert!(<Engine as VectorOps>::available());
    }

    proptest! {
        #[test]
        fn prop_engine_i16(a in prop::collection::vec(any::<i16>(), 64), b in prop::collection::vec(any::<i16>(), 64)) {
            unsafe { check_ops::<i16, Engine>(&a, &b) };
        }

        #[test]
        fn prop_engine_i32(a in prop::collection::vec(any::<i32>(), 16), b in prop::collection::vec(any::<i32>(), 16)) {
            unsafe { check_ops::<i32, Engine>(&a, &b) };
        }

        #[test]
        fn prop_engine_i8(a in prop::collection::vec(any::<i8>(), 64), b in prop::collection::vec(any::<i8>(), 64)) {
            unsafe { check_ops::<i8, Engine>(&a, &b) };
        }
    }
}
