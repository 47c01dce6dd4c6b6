//! 512-bit AVX-512BW backend, enabled by the `simd_avx512` feature.
//!
//! Comparisons yield k-masks, which are expanded back into all-ones lanes so the
//! backend follows the same mask convention as the others. `movemask` reports
//! one raw bit per lane.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::*;

#[derive(Copy, Clone, Debug, Default)]
pub struct Avx512;

macro_rules! avx512 {
    ($(fn $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)? $body:block)*) => {
        $(
            #[target_feature(enable = "avx512f,avx512bw")]
            #[inline]
            unsafe fn $name($($arg: $ty),*) $(-> $ret)? $body
        )*
    };
}

macro_rules! avx512_shared {
    ($t:ty) => {
        type V = __m512i;

        avx512! {
            fn load(ptr: *const $t) -> __m512i { _mm512_load_si512(ptr as *const _) }
            fn loadu(ptr: *const $t) -> __m512i { _mm512_loadu_si512(ptr as *const _) }
            fn store(ptr: *mut $t, a: __m512i) { _mm512_store_si512(ptr as *mut _, a) }
            fn storeu(ptr: *mut $t, a: __m512i) { _mm512_storeu_si512(ptr as *mut _, a) }
            fn zero() -> __m512i { _mm512_setzero_si512() }
            fn and(a: __m512i, b: __m512i) -> __m512i { _mm512_and_si512(a, b) }
            fn andnot(a: __m512i, b: __m512i) -> __m512i { _mm512_andnot_si512(a, b) }
            fn or(a: __m512i, b: __m512i) -> __m512i { _mm512_or_si512(a, b) }
            fn xor(a: __m512i, b: __m512i) -> __m512i { _mm512_xor_si512(a, b) }

            fn sl_bytes(a: __m512i, n: usize) -> __m512i {
                let z = _mm512_setzero_si512();
                match n {
                    0 => a,
                    1 => _mm512_alignr_epi8::<15>(a, _mm512_alignr_epi32::<12>(a, z)),
                    2 => _mm512_alignr_epi8::<14>(a, _mm512_alignr_epi32::<12>(a, z)),
                    4 => _mm512_alignr_epi32::<15>(a, z),
                    8 => _mm512_alignr_epi32::<14>(a, z),
                    16 => _mm512_alignr_epi32::<12>(a, z),
                    32 => _mm512_alignr_epi32::<8>(a, z),
                    n if n >= 64 => z,
                    n => shift_bytes_via_memory::<$t, Self>(a, n, true)
                }
            }

            fn sr_bytes(a: __m512i, n: usize) -> __m512i {
                let z = _mm512_setzero_si512();
                match n {
                    0 => a,
                    1 => _mm512_alignr_epi8::<1>(_mm512_alignr_epi32::<4>(z, a), a),
                    2 => _mm512_alignr_epi8::<2>(_mm512_alignr_epi32::<4>(z, a), a),
                    4 => _mm512_alignr_epi32::<1>(z, a),
                    8 => _mm512_alignr_epi32::<2>(z, a),
                    16 => _mm512_alignr_epi32::<4>(z, a),
                    32 => _mm512_alignr_epi32::<8>(z, a),
                    n if n >= 64 => z,
                    n => shift_bytes_via_memory::<$t, Self>(a, n, false)
                }
            }
        }
    };
}

impl SimdOps<i8> for Avx512 {
    const LANES: usize = 64;
    const MASK_STRIDE: u32 = 1;

    avx512_shared!(i8);

    avx512! {
        fn set1(x: i8) -> __m512i { _mm512_set1_epi8(x) }
        fn cmpeq(a: __m512i, b: __m512i) -> __m512i { _mm512_maskz_set1_epi8(_mm512_cmpeq_epi8_mask(a, b), -1) }
        fn cmpgt(a: __m512i, b: __m512i) -> __m512i { _mm512_maskz_set1_epi8(_mm512_cmpgt_epi8_mask(a, b), -1) }
        fn cmplt(a: __m512i, b: __m512i) -> __m512i { _mm512_maskz_set1_epi8(_mm512_cmplt_epi8_mask(a, b), -1) }
        fn add(a: __m512i, b: __m512i) -> __m512i { _mm512_add_epi8(a, b) }
        fn sub(a: __m512i, b: __m512i) -> __m512i { _mm512_sub_epi8(a, b) }
        fn adds(a: __m512i, b: __m512i) -> __m512i { _mm512_adds_epi8(a, b) }
        fn subs(a: __m512i, b: __m512i) -> __m512i { _mm512_subs_epi8(a, b) }
        fn min(a: __m512i, b: __m512i) -> __m512i { _mm512_min_epi8(a, b) }
        fn max(a: __m512i, b: __m512i) -> __m512i { _mm512_max_epi8(a, b) }
        fn min_unsigned(a: __m512i, b: __m512i) -> __m512i { _mm512_min_epu8(a, b) }
        fn max_unsigned(a: __m512i, b: __m512i) -> __m512i { _mm512_max_epu8(a, b) }
        fn movemask(a: __m512i) -> u64 { _mm512_movepi8_mask(a) }

        fn srai(a: __m512i, n: u32) -> __m512i {
            let count = _mm_cvtsi32_si128(n as i32);
            let hi = _mm512_and_si512(_mm512_sra_epi16(a, count), _mm512_set1_epi16(0xFF00u16 as i16));
            let lo = _mm512_srli_epi16::<8>(_mm512_sra_epi16(_mm512_slli_epi16::<8>(a), count));
            _mm512_or_si512(hi, lo)
        }

        fn slli(a: __m512i, n: u32) -> __m512i {
            let keep = 0xFFu8.checked_shl(n).unwrap_or(0) as i8;
            _mm512_and_si512(_mm512_sll_epi16(a, _mm_cvtsi32_si128(n as i32)), _mm512_set1_epi8(keep))
        }
    }
}

impl SimdOps<i16> for Avx512 {
    const LANES: usize = 32;
    const MASK_STRIDE: u32 = 1;

    avx512_shared!(i16);

    avx512! {
        fn set1(x: i16) -> __m512i { _mm512_set1_epi16(x) }
        fn cmpeq(a: __m512i, b: __m512i) -> __m512i { _mm512_maskz_set1_epi16(_mm512_cmpeq_epi16_mask(a, b), -1) }
        fn cmpgt(a: __m512i, b: __m512i) -> __m512i { _mm512_maskz_set1_epi16(_mm512_cmpgt_epi16_mask(a, b), -1) }
        fn cmplt(a: __m512i, b: __m512i) -> __m512i { _mm512_maskz_set1_epi16(_mm512_cmplt_epi16_mask(a, b), -1) }
        fn srai(a: __m512i, n: u32) -> __m512i { _mm512_sra_epi16(a, _mm_cvtsi32_si128(n as i32)) }
        fn slli(a: __m512i, n: u32) -> __m512i { _mm512_sll_epi16(a, _mm_cvtsi32_si128(n as i32)) }
        fn add(a: __m512i, b: __m512i) -> __m512i { _mm512_add_epi16(a, b) }
        fn sub(a: __m512i, b: __m512i) -> __m512i { _mm512_sub_epi16(a, b) }
        fn adds(a: __m512i, b: __m512i) -> __m512i { _mm512_adds_epi16(a, b) }
        fn subs(a: __m512i, b: __m512i) -> __m512i { _mm512_subs_epi16(a, b) }
        fn min(a: __m512i, b: __m512i) -> __m512i { _mm512_min_epi16(a, b) }
        fn max(a: __m512i, b: __m512i) -> __m512i { _mm512_max_epi16(a, b) }
        fn min_unsigned(a: __m512i, b: __m512i) -> __m512i { _mm512_min_epu16(a, b) }
        fn max_unsigned(a: __m512i, b: __m512i) -> __m512i { _mm512_max_epu16(a, b) }
        fn movemask(a: __m512i) -> u64 { _mm512_movepi16_mask(a) as u64 }
    }
}

impl SimdOps<i32> for Avx512 {
    const LANES: usize = 16;
    const MASK_STRIDE: u32 = 1;

    avx512_shared!(i32);

    avx512! {
        fn set1(x: i32) -> __m512i { _mm512_set1_epi32(x) }
        fn cmpeq(a: __m512i, b: __m512i) -> __m512i { _mm512_maskz_set1_epi32(_mm512_cmpeq_epi32_mask(a, b), -1) }
        fn cmpgt(a: __m512i, b: __m512i) -> __m512i { _mm512_maskz_set1_epi32(_mm512_cmpgt_epi32_mask(a, b), -1) }
        fn cmplt(a: __m512i, b: __m512i) -> __m512i { _mm512_maskz_set1_epi32(_mm512_cmplt_epi32_mask(a, b), -1) }
        fn srai(a: __m512i, n: u32) -> __m512i { _mm512_sra_epi32(a, _mm_cvtsi32_si128(n as i32)) }
        fn slli(a: __m512i, n: u32) -> __m512i { _mm512_sll_epi32(a, _mm_cvtsi32_si128(n as i32)) }
        fn add(a: __m512i, b: __m512i) -> __m512i { _mm512_add_epi32(a, b) }
        fn sub(a: __m512i, b: __m512i) -> __m512i { _mm512_sub_epi32(a, b) }
        fn adds(a: __m512i, b: __m512i) -> __m512i { adds_i32_via_wrap::<Self>(a, b) }
        fn subs(a: __m512i, b: __m512i) -> __m512i { subs_i32_via_wrap::<Self>(a, b) }
        fn min(a: __m512i, b: __m512i) -> __m512i { _mm512_min_epi32(a, b) }
        fn max(a: __m512i, b: __m512i) -> __m512i { _mm512_max_epi32(a, b) }
        fn min_unsigned(a: __m512i, b: __m512i) -> __m512i { _mm512_min_epu32(a, b) }
        fn max_unsigned(a: __m512i, b: __m512i) -> __m512i { _mm512_max_epu32(a, b) }
        // sign bits without AVX-512DQ
        fn movemask(a: __m512i) -> u64 { _mm512_cmplt_epi32_mask(a, _mm512_setzero_si512()) as u64 }
    }
}

impl VectorOps for Avx512 {
    const NAME: &'static str = "avx512";

    fn available() -> bool {
        is_x86_feature_detected!("avx512f") && is_x86_feature_detected!("avx512bw")
    }

    avx512! {
        fn widen_i8_i16(a: __m512i) -> __m512i { _mm512_cvtepi8_epi16(_mm512_castsi512_si256(a)) }
        fn widen_i16_i32(a: __m512i) -> __m512i { _mm512_cvtepi16_epi32(_mm512_castsi512_si256(a)) }

        fn narrow_i16_i8(a: __m512i, b: __m512i) -> __m512i {
            _mm512_inserti64x4::<1>(_mm512_castsi256_si512(_mm512_cvtsepi16_epi8(a)), _mm512_cvtsepi16_epi8(b))
        }

        fn narrow_i32_i16(a: __m512i, b: __m512i) -> __m512i {
            _mm512_inserti64x4::<1>(_mm512_castsi256_si512(_mm512_cvtsepi32_epi16(a)), _mm512_cvtsepi32_epi16(b))
        }
    }
}
