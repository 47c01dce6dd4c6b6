//! 256-bit AVX2 backend.
//!
//! Byte shifts have to cross the two 128-bit halves, which `alignr` alone does
//! not do, so the half that feeds the other is first moved into place with
//! `permute2x128`.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::*;

#[derive(Copy, Clone, Debug, Default)]
pub struct Avx2;

macro_rules! avx2 {
    ($(fn $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)? $body:block)*) => {
        $(
            #[target_feature(enable = "avx2")]
            #[inline]
            unsafe fn $name($($arg: $ty),*) $(-> $ret)? $body
        )*
    };
}

macro_rules! avx2_shared {
    ($t:ty) => {
        type V = __m256i;

        avx2! {
            fn load(ptr: *const $t) -> __m256i { _mm256_load_si256(ptr as *const __m256i) }
            fn loadu(ptr: *const $t) -> __m256i { _mm256_loadu_si256(ptr as *const __m256i) }
            fn store(ptr: *mut $t, a: __m256i) { _mm256_store_si256(ptr as *mut __m256i, a) }
            fn storeu(ptr: *mut $t, a: __m256i) { _mm256_storeu_si256(ptr as *mut __m256i, a) }
            fn zero() -> __m256i { _mm256_setzero_si256() }
            fn and(a: __m256i, b: __m256i) -> __m256i { _mm256_and_si256(a, b) }
            fn andnot(a: __m256i, b: __m256i) -> __m256i { _mm256_andnot_si256(a, b) }
            fn or(a: __m256i, b: __m256i) -> __m256i { _mm256_or_si256(a, b) }
            fn xor(a: __m256i, b: __m256i) -> __m256i { _mm256_xor_si256(a, b) }
            fn movemask(a: __m256i) -> u64 { _mm256_movemask_epi8(a) as u32 as u64 }

            fn sl_bytes(a: __m256i, n: usize) -> __m256i {
                // low half of a moved up, zeros below
                let t = _mm256_permute2x128_si256::<0x08>(a, a);
                match n {
                    0 => a,
                    1 => _mm256_alignr_epi8::<15>(a, t),
                    2 => _mm256_alignr_epi8::<14>(a, t),
                    4 => _mm256_alignr_epi8::<12>(a, t),
                    8 => _mm256_alignr_epi8::<8>(a, t),
                    16 => t,
                    n if n >= 32 => _mm256_setzero_si256(),
                    n => shift_bytes_via_memory::<$t, Self>(a, n, true)
                }
            }

            fn sr_bytes(a: __m256i, n: usize) -> __m256i {
                // high half of a moved down, zeros above
                let t = _mm256_permute2x128_si256::<0x81>(a, a);
                match n {
                    0 => a,
                    1 => _mm256_alignr_epi8::<1>(t, a),
                    2 => _mm256_alignr_epi8::<2>(t, a),
                    4 => _mm256_alignr_epi8::<4>(t, a),
                    8 => _mm256_alignr_epi8::<8>(t, a),
                    16 => t,
                    n if n >= 32 => _mm256_setzero_si256(),
                    n => shift_bytes_via_memory::<$t, Self>(a, n, false)
                }
            }
        }
    };
}

impl SimdOps<i8> for Avx2 {
    const LANES: usize = 32;
    const MASK_STRIDE: u32 = 1;

    avx2_shared!(i8);

    avx2! {
        fn set1(x: i8) -> __m256i { _mm256_set1_epi8(x) }
        fn cmpeq(a: __m256i, b: __m256i) -> __m256i { _mm256_cmpeq_epi8(a, b) }
        fn cmpgt(a: __m256i, b: __m256i) -> __m256i { _mm256_cmpgt_epi8(a, b) }
        fn add(a: __m256i, b: __m256i) -> __m256i { _mm256_add_epi8(a, b) }
        fn sub(a: __m256i, b: __m256i) -> __m256i { _mm256_sub_epi8(a, b) }
        fn adds(a: __m256i, b: __m256i) -> __m256i { _mm256_adds_epi8(a, b) }
        fn subs(a: __m256i, b: __m256i) -> __m256i { _mm256_subs_epi8(a, b) }
        fn min(a: __m256i, b: __m256i) -> __m256i { _mm256_min_epi8(a, b) }
        fn max(a: __m256i, b: __m256i) -> __m256i { _mm256_max_epi8(a, b) }
        fn min_unsigned(a: __m256i, b: __m256i) -> __m256i { _mm256_min_epu8(a, b) }
        fn max_unsigned(a: __m256i, b: __m256i) -> __m256i { _mm256_max_epu8(a, b) }

        fn srai(a: __m256i, n: u32) -> __m256i {
            let count = _mm_cvtsi32_si128(n as i32);
            let hi = _mm256_and_si256(_mm256_sra_epi16(a, count), _mm256_set1_epi16(0xFF00u16 as i16));
            let lo = _mm256_srli_epi16::<8>(_mm256_sra_epi16(_mm256_slli_epi16::<8>(a), count));
            _mm256_or_si256(hi, lo)
        }

        fn slli(a: __m256i, n: u32) -> __m256i {
            let keep = 0xFFu8.checked_shl(n).unwrap_or(0) as i8;
            _mm256_and_si256(_mm256_sll_epi16(a, _mm_cvtsi32_si128(n as i32)), _mm256_set1_epi8(keep))
        }
    }
}

impl SimdOps<i16> for Avx2 {
    const LANES: usize = 16;
    const MASK_STRIDE: u32 = 2;

    avx2_shared!(i16);

    avx2! {
        fn set1(x: i16) -> __m256i { _mm256_set1_epi16(x) }
        fn cmpeq(a: __m256i, b: __m256i) -> __m256i { _mm256_cmpeq_epi16(a, b) }
        fn cmpgt(a: __m256i, b: __m256i) -> __m256i { _mm256_cmpgt_epi16(a, b) }
        fn srai(a: __m256i, n: u32) -> __m256i { _mm256_sra_epi16(a, _mm_cvtsi32_si128(n as i32)) }
        fn slli(a: __m256i, n: u32) -> __m256i { _mm256_sll_epi16(a, _mm_cvtsi32_si128(n as i32)) }
        fn add(a: __m256i, b: __m256i) -> __m256i { _mm256_add_epi16(a, b) }
        fn sub(a: __m256i, b: __m256i) -> __m256i { _mm256_sub_epi16(a, b) }
        fn adds(a: __m256i, b: __m256i) -> __m256i { _mm256_adds_epi16(a, b) }
        fn subs(a: __m256i, b: __m256i) -> __m256i { _mm256_subs_epi16(a, b) }
        fn min(a: __m256i, b: __m256i) -> __m256i { _mm256_min_epi16(a, b) }
        fn max(a: __m256i, b: __m256i) -> __m256i { _mm256_max_epi16(a, b) }
        fn min_unsigned(a: __m256i, b: __m256i) -> __m256i { _mm256_min_epu16(a, b) }
        fn max_unsigned(a: __m256i, b: __m256i) -> __m256i { _mm256_max_epu16(a, b) }
    }
}

impl SimdOps<i32> for Avx2 {
    const LANES: usize = 8;
    const MASK_STRIDE: u32 = 4;

    avx2_shared!(i32);

    avx2! {
        fn set1(x: i32) -> __m256i { _mm256_set1_epi32(x) }
        fn cmpeq(a: __m256i, b: __m256i) -> __m256i { _mm256_cmpeq_epi32(a, b) }
        fn cmpgt(a: __m256i, b: __m256i) -> __m256i { _mm256_cmpgt_epi32(a, b) }
        fn srai(a: __m256i, n: u32) -> __m256i { _mm256_sra_epi32(a, _mm_cvtsi32_si128(n as i32)) }
        fn slli(a: __m256i, n: u32) -> __m256i { _mm256_sll_epi32(a, _mm_cvtsi32_si128(n as i32)) }
        fn add(a: __m256i, b: __m256i) -> __m256i { _mm256_add_epi32(a, b) }
        fn sub(a: __m256i, b: __m256i) -> __m256i { _mm256_sub_epi32(a, b) }
        fn adds(a: __m256i, b: __m256i) -> __m256i { adds_i32_via_wrap::<Self>(a, b) }
        fn subs(a: __m256i, b: __m256i) -> __m256i { subs_i32_via_wrap::<Self>(a, b) }
        fn min(a: __m256i, b: __m256i) -> __m256i { _mm256_min_epi32(a, b) }
        fn max(a: __m256i, b: __m256i) -> __m256i { _mm256_max_epi32(a, b) }
        fn min_unsigned(a: __m256i, b: __m256i) -> __m256i { _mm256_min_epu32(a, b) }
        fn max_unsigned(a: __m256i, b: __m256i) -> __m256i { _mm256_max_epu32(a, b) }
    }
}

impl VectorOps for Avx2 {
    const NAME: &'static str = "avx2";

    fn available() -> bool {
        is_x86_feature_detected!("avx2")
    }

    avx2! {
        fn widen_i8_i16(a: __m256i) -> __m256i { _mm256_cvtepi8_epi16(_mm256_castsi256_si128(a)) }
        fn widen_i16_i32(a: __m256i) -> __m256i { _mm256_cvtepi16_epi32(_mm256_castsi256_si128(a)) }

        // packs interleaves the halves of a and b; put a's quarters first
        fn narrow_i16_i8(a: __m256i, b: __m256i) -> __m256i {
            _mm256_permute4x64_epi64::<0xD8>(_mm256_packs_epi16(a, b))
        }

        fn narrow_i32_i16(a: __m256i, b: __m256i) -> __m256i {
            _mm256_permute4x64_epi64::<0xD8>(_mm256_packs_epi32(a, b))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avx2_backend() {
        if !Avx2::available() {
            return;
        }
        unsafe { crate::simd::tests::check_backend::<Avx2>() };
    }

    #[test]
    fn test_shift_crosses_halves() {
        if !Avx2::available() {
            return;
        }
        let a: Vec<i16> = (1..=16).collect();
        unsafe {
            let v = <Avx2 as SimdOps<i16>>::loadu(a.as_ptr());
            let l = to_lanes::<i16, Avx2>(<Avx2 as SimdOps<i16>>::sl_bytes(v, 2));
            assert_eq!(l[8], 8);
            assert_eq!(l[0], 0);
            let r = to_lanes::<i16, Avx2>(<Avx2 as SimdOps<i16>>::sr_bytes(v, 2));
            assert_eq!(r[7], 9);
            assert_eq!(r[15], 0);
        }
    }
}
