//! 128-bit backend for x86 baseline SSE2.
//!
//! SSE2 lacks signed 8-bit min/max, unsigned 16 and 32-bit min/max, 32-bit
//! saturating arithmetic and 8-bit shifts, so those are emulated.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::*;

#[derive(Copy, Clone, Debug, Default)]
pub struct Sse2;

macro_rules! sse2 {
    ($(fn $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)? $body:block)*) => {
        $(
            #[target_feature(enable = "sse2")]
            #[inline]
            unsafe fn $name($($arg: $ty),*) $(-> $ret)? $body
        )*
    };
}

macro_rules! sse2_shared {
    ($t:ty) => {
        type V = __m128i;

        sse2! {
            fn load(ptr: *const $t) -> __m128i { _mm_load_si128(ptr as *const __m128i) }
            fn loadu(ptr: *const $t) -> __m128i { _mm_loadu_si128(ptr as *const __m128i) }
            fn store(ptr: *mut $t, a: __m128i) { _mm_store_si128(ptr as *mut __m128i, a) }
            fn storeu(ptr: *mut $t, a: __m128i) { _mm_storeu_si128(ptr as *mut __m128i, a) }
            fn zero() -> __m128i { _mm_setzero_si128() }
            fn and(a: __m128i, b: __m128i) -> __m128i { _mm_and_si128(a, b) }
            fn andnot(a: __m128i, b: __m128i) -> __m128i { _mm_andnot_si128(a, b) }
            fn or(a: __m128i, b: __m128i) -> __m128i { _mm_or_si128(a, b) }
            fn xor(a: __m128i, b: __m128i) -> __m128i { _mm_xor_si128(a, b) }
            fn movemask(a: __m128i) -> u64 { _mm_movemask_epi8(a) as u32 as u64 }

            fn sl_bytes(a: __m128i, n: usize) -> __m128i {
                match n {
                    0 => a,
                    1 => _mm_slli_si128::<1>(a),
                    2 => _mm_slli_si128::<2>(a),
                    4 => _mm_slli_si128::<4>(a),
                    8 => _mm_slli_si128::<8>(a),
                    n if n >= 16 => _mm_setzero_si128(),
                    n => shift_bytes_via_memory::<$t, Self>(a, n, true)
                }
            }

            fn sr_bytes(a: __m128i, n: usize) -> __m128i {
                match n {
                    0 => a,
                    1 => _mm_srli_si128::<1>(a),
                    2 => _mm_srli_si128::<2>(a),
                    4 => _mm_srli_si128::<4>(a),
                    8 => _mm_srli_si128::<8>(a),
                    n if n >= 16 => _mm_setzero_si128(),
                    n => shift_bytes_via_memory::<$t, Self>(a, n, false)
                }
            }
        }
    };
}

impl SimdOps<i8> for Sse2 {
    const LANES: usize = 16;
    const MASK_STRIDE: u32 = 1;

    sse2_shared!(i8);

    sse2! {
        fn set1(x: i8) -> __m128i { _mm_set1_epi8(x) }
        fn cmpeq(a: __m128i, b: __m128i) -> __m128i { _mm_cmpeq_epi8(a, b) }
        fn cmpgt(a: __m128i, b: __m128i) -> __m128i { _mm_cmpgt_epi8(a, b) }
        fn cmplt(a: __m128i, b: __m128i) -> __m128i { _mm_cmplt_epi8(a, b) }
        fn add(a: __m128i, b: __m128i) -> __m128i { _mm_add_epi8(a, b) }
        fn sub(a: __m128i, b: __m128i) -> __m128i { _mm_sub_epi8(a, b) }
        fn adds(a: __m128i, b: __m128i) -> __m128i { _mm_adds_epi8(a, b) }
        fn subs(a: __m128i, b: __m128i) -> __m128i { _mm_subs_epi8(a, b) }
        fn min(a: __m128i, b: __m128i) -> __m128i { min_via_cmp::<i8, Self>(a, b) }
        fn max(a: __m128i, b: __m128i) -> __m128i { max_via_cmp::<i8, Self>(a, b) }
        fn min_unsigned(a: __m128i, b: __m128i) -> __m128i { _mm_min_epu8(a, b) }
        fn max_unsigned(a: __m128i, b: __m128i) -> __m128i { _mm_max_epu8(a, b) }

        // shift both bytes of every 16-bit pair, then keep the bits that belong to each byte
        fn srai(a: __m128i, n: u32) -> __m128i {
            let count = _mm_cvtsi32_si128(n as i32);
            let hi = _mm_and_si128(_mm_sra_epi16(a, count), _mm_set1_epi16(0xFF00u16 as i16));
            let lo = _mm_srli_epi16::<8>(_mm_sra_epi16(_mm_slli_epi16::<8>(a), count));
            _mm_or_si128(hi, lo)
        }

        fn slli(a: __m128i, n: u32) -> __m128i {
            let keep = 0xFFu8.checked_shl(n).unwrap_or(0) as i8;
            _mm_and_si128(_mm_sll_epi16(a, _mm_cvtsi32_si128(n as i32)), _mm_set1_epi8(keep))
        }
    }
}

impl SimdOps<i16> for Sse2 {
    const LANES: usize = 8;
    const MASK_STRIDE: u32 = 2;

    sse2_shared!(i16);

    sse2! {
        fn set1(x: i16) -> __m128i { _mm_set1_epi16(x) }
        fn cmpeq(a: __m128i, b: __m128i) -> __m128i { _mm_cmpeq_epi16(a, b) }
        fn cmpgt(a: __m128i, b: __m128i) -> __m128i { _mm_cmpgt_epi16(a, b) }
        fn cmplt(a: __m128i, b: __m128i) -> __m128i { _mm_cmplt_epi16(a, b) }
        fn srai(a: __m128i, n: u32) -> __m128i { _mm_sra_epi16(a, _mm_cvtsi32_si128(n as i32)) }
        fn slli(a: __m128i, n: u32) -> __m128i { _mm_sll_epi16(a, _mm_cvtsi32_si128(n as i32)) }
        fn add(a: __m128i, b: __m128i) -> __m128i { _mm_add_epi16(a, b) }
        fn sub(a: __m128i, b: __m128i) -> __m128i { _mm_sub_epi16(a, b) }
        fn adds(a: __m128i, b: __m128i) -> __m128i { _mm_adds_epi16(a, b) }
        fn subs(a: __m128i, b: __m128i) -> __m128i { _mm_subs_epi16(a, b) }
        fn min(a: __m128i, b: __m128i) -> __m128i { _mm_min_epi16(a, b) }
        fn max(a: __m128i, b: __m128i) -> __m128i { _mm_max_epi16(a, b) }
        fn min_unsigned(a: __m128i, b: __m128i) -> __m128i { _mm_subs_epu16(a, _mm_subs_epu16(a, b)) }
        fn max_unsigned(a: __m128i, b: __m128i) -> __m128i { _mm_adds_epu16(_mm_subs_epu16(a, b), b) }
    }
}

impl SimdOps<i32> for Sse2 {
    const LANES: usize = 4;
    const MASK_STRIDE: u32 = 4;

    sse2_shared!(i32);

    sse2! {
        fn set1(x: i32) -> __m128i { _mm_set1_epi32(x) }
        fn cmpeq(a: __m128i, b: __m128i) -> __m128i { _mm_cmpeq_epi32(a, b) }
        fn cmpgt(a: __m128i, b: __m128i) -> __m128i { _mm_cmpgt_epi32(a, b) }
        fn cmplt(a: __m128i, b: __m128i) -> __m128i { _mm_cmplt_epi32(a, b) }
        fn srai(a: __m128i, n: u32) -> __m128i { _mm_sra_epi32(a, _mm_cvtsi32_si128(n as i32)) }
        fn slli(a: __m128i, n: u32) -> __m128i { _mm_sll_epi32(a, _mm_cvtsi32_si128(n as i32)) }
        fn add(a: __m128i, b: __m128i) -> __m128i { _mm_add_epi32(a, b) }
        fn sub(a: __m128i, b: __m128i) -> __m128i { _mm_sub_epi32(a, b) }
        fn adds(a: __m128i, b: __m128i) -> __m128i { adds_i32_via_wrap::<Self>(a, b) }
        fn subs(a: __m128i, b: __m128i) -> __m128i { subs_i32_via_wrap::<Self>(a, b) }
        fn min(a: __m128i, b: __m128i) -> __m128i { min_via_cmp::<i32, Self>(a, b) }
        fn max(a: __m128i, b: __m128i) -> __m128i { max_via_cmp::<i32, Self>(a, b) }
        fn min_unsigned(a: __m128i, b: __m128i) -> __m128i { min_u32_via_halving::<Self>(a, b) }
        fn max_unsigned(a: __m128i, b: __m128i) -> __m128i { max_u32_via_halving::<Self>(a, b) }
    }
}

impl VectorOps for Sse2 {
    const NAME: &'static str = "sse2";

    fn available() -> bool {
        is_x86_feature_detected!("sse2")
    }

    sse2! {
        fn widen_i8_i16(a: __m128i) -> __m128i { _mm_srai_epi16::<8>(_mm_unpacklo_epi8(a, a)) }
        fn widen_i16_i32(a: __m128i) -> __m128i { _mm_srai_epi32::<16>(_mm_unpacklo_epi16(a, a)) }
        fn narrow_i16_i8(a: __m128i, b: __m128i) -> __m128i { _mm_packs_epi16(a, b) }
        fn narrow_i32_i16(a: __m128i, b: __m128i) -> __m128i { _mm_packs_epi32(a, b) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sse2_backend() {
        if !Sse2::available() {
            return;
        }
        unsafe { crate::simd::tests::check_backend::<Sse2>() };
    }

    #[test]
    fn test_unsigned_32_low_bit_ties() {
        if !Sse2::available() {
            return;
        }
        let a = [-1i32, 6, 7, i32::MIN];
        let b = [-2i32, 7, 6, i32::MAX];
        unsafe {
            let (va, vb) = (<Sse2 as SimdOps<i32>>::loadu(a.as_ptr()), <Sse2 as SimdOps<i32>>::loadu(b.as_ptr()));
            let max = to_lanes::<i32, Sse2>(<Sse2 as SimdOps<i32>>::max_unsigned(va, vb));
            let min = to_lanes::<i32, Sse2>(<Sse2 as SimdOps<i32>>::min_unsigned(va, vb));
            assert_eq!(&max[..4], &[-1, 7, 7, i32::MIN]);
            assert_eq!(&min[..4], &[-2, 6, 6, i32::MAX]);
        }
    }
}
