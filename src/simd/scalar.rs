//! Portable fallback operating on 128-bit worth of lanes held in plain arrays.

use std::ptr;

use super::{shift_bytes_via_memory, Lane, SimdOps, VectorOps};

#[derive(Copy, Clone, Debug, Default)]
pub struct Scalar;

#[inline(always)]
fn map2<T: Copy, const N: usize>(a: [T; N], b: [T; N], f: impl Fn(T, T) -> T) -> [T; N] {
    let mut out = a;
    for i in 0..N {
        out[i] = f(a[i], b[i]);
    }
    out
}

#[inline(always)]
fn mask<T: Lane>(b: bool) -> T {
    if b { T::ONES } else { T::ZERO }
}

macro_rules! impl_scalar {
    ($t:ty, $lanes:literal) => {
        impl SimdOps<$t> for Scalar {
            const LANES: usize = $lanes;
            const MASK_STRIDE: u32 = 1;
            type V = [$t; $lanes];

            #[inline] unsafe fn load(ptr: *const $t) -> Self::V { ptr::read(ptr as *const Self::V) }
            #[inline] unsafe fn loadu(ptr: *const $t) -> Self::V { ptr::read_unaligned(ptr as *const Self::V) }
            #[inline] unsafe fn store(ptr: *mut $t, a: Self::V) { ptr::write(ptr as *mut Self::V, a) }
            #[inline] unsafe fn storeu(ptr: *mut $t, a: Self::V) { ptr::write_unaligned(ptr as *mut Self::V, a) }

            #[inline] unsafe fn zero() -> Self::V { [0; $lanes] }
            #[inline] unsafe fn set1(x: $t) -> Self::V { [x; $lanes] }

            #[inline] unsafe fn cmpeq(a: Self::V, b: Self::V) -> Self::V { map2(a, b, |x, y| mask(x == y)) }
            #[inline] unsafe fn cmpgt(a: Self::V, b: Self::V) -> Self::V { map2(a, b, |x, y| mask(x > y)) }
            #[inline] unsafe fn cmplt(a: Self::V, b: Self::V) -> Self::V { map2(a, b, |x, y| mask(x < y)) }

            #[inline] unsafe fn and(a: Self::V, b: Self::V) -> Self::V { map2(a, b, |x, y| x & y) }
            #[inline] unsafe fn andnot(a: Self::V, b: Self::V) -> Self::V { map2(a, b, |x, y| !x & y) }
            #[inline] unsafe fn or(a: Self::V, b: Self::V) -> Self::V { map2(a, b, |x, y| x | y) }
            #[inline] unsafe fn xor(a: Self::V, b: Self::V) -> Self::V { map2(a, b, |x, y| x ^ y) }

            #[inline] unsafe fn srai(a: Self::V, n: u32) -> Self::V { a.map(|x| x.shr_arith(n)) }
            #[inline] unsafe fn slli(a: Self::V, n: u32) -> Self::V { a.map(|x| x.shl_wrap(n)) }

            #[inline]
            unsafe fn sl_bytes(a: Self::V, n: usize) -> Self::V {
                shift_bytes_via_memory::<$t, Self>(a, n, true)
            }

            #[inline]
            unsafe fn sr_bytes(a: Self::V, n: usize) -> Self::V {
                shift_bytes_via_memory::<$t, Self>(a, n, false)
            }

            #[inline] unsafe fn add(a: Self::V, b: Self::V) -> Self::V { map2(a, b, <$t as Lane>::add_wrap) }
            #[inline] unsafe fn sub(a: Self::V, b: Self::V) -> Self::V { map2(a, b, <$t as Lane>::sub_wrap) }
            #[inline] unsafe fn adds(a: Self::V, b: Self::V) -> Self::V { map2(a, b, <$t as Lane>::add_sat) }
            #[inline] unsafe fn subs(a: Self::V, b: Self::V) -> Self::V { map2(a, b, <$t as Lane>::sub_sat) }

            #[inline] unsafe fn min(a: Self::V, b: Self::V) -> Self::V { map2(a, b, Ord::min) }
            #[inline] unsafe fn max(a: Self::V, b: Self::V) -> Self::V { map2(a, b, Ord::max) }

            #[inline]
            unsafe fn min_unsigned(a: Self::V, b: Self::V) -> Self::V {
                map2(a, b, |x, y| if x.as_unsigned() <= y.as_unsigned() { x } else { y })
            }

            #[inline]
            unsafe fn max_unsigned(a: Self::V, b: Self::V) -> Self::V {
                map2(a, b, |x, y| if x.as_unsigned() >= y.as_unsigned() { x } else { y })
            }

            #[inline]
            unsafe fn movemask(a: Self::V) -> u64 {
                a.iter().enumerate().fold(0, |m, (i, &x)| m | (u64::from(x < 0) << i))
            }

            #[inline]
            unsafe fn hmax(a: Self::V) -> $t {
                a.iter().copied().fold(<$t>::MIN, Ord::max)
            }
        }
    };
}

impl_scalar!(i8, 16);
impl_scalar!(i16, 8);
impl_scalar!(i32, 4);

impl VectorOps for Scalar {
    const NAME: &'static str = "scalar";

    fn available() -> bool {
        true
    }

    #[inline]
    unsafe fn widen_i8_i16(a: [i8; 16]) -> [i16; 8] {
        let mut out = [0i16; 8];
        for (o, &x) in out.iter_mut().zip(a.iter()) {
            *o = x as i16;
        }
        out
    }

    #[inline]
    unsafe fn widen_i16_i32(a: [i16; 8]) -> [i32; 4] {
        let mut out = [0i32; 4];
        for (o, &x) in out.iter_mut().zip(a.iter()) {
            *o = x as i32;
        }
        out
    }

    #[inline]
    unsafe fn narrow_i16_i8(a: [i16; 8], b: [i16; 8]) -> [i8; 16] {
        let mut out = [0i8; 16];
        for (o, &x) in out.iter_mut().zip(a.iter().chain(b.iter())) {
            *o = i8::from_i32(x as i32);
        }
        out
    }

    #[inline]
    unsafe fn narrow_i32_i16(a: [i32; 4], b: [i32; 4]) -> [i16; 8] {
        let mut out = [0i16; 8];
        for (o, &x) in out.iter_mut().zip(a.iter().chain(b.iter())) {
            *o = i16::from_i32(x);
        }
        out
    }
}
