//! AArch64 NEON backends: [`Neon128`] over q registers and [`Neon64`] over d registers.
//!
//! NEON has no movemask. The 128-bit backend narrows a sign mask with a 4-bit
//! shift so that every byte contributes one nibble to a `u64`; the 64-bit
//! backend simply reinterprets the whole mask register, eight bits per byte.

use std::arch::aarch64::*;

use super::*;

#[derive(Copy, Clone, Debug, Default)]
pub struct Neon128;

#[derive(Copy, Clone, Debug, Default)]
pub struct Neon64;

macro_rules! neon {
    ($(fn $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)? $body:block)*) => {
        $(
            #[target_feature(enable = "neon")]
            #[inline]
            unsafe fn $name($($arg: $ty),*) $(-> $ret)? $body
        )*
    };
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn nibble_mask(m: uint16x8_t) -> u64 {
    vget_lane_u64::<0>(vreinterpret_u64_u8(vshrn_n_u16::<4>(m)))
}

/// Byte shifts of a q register, given as `vextq_s8` on its byte view.
macro_rules! q_byte_shifts {
    ($t:ty, $v:ty, $to8:expr, $from8:expr) => {
        neon! {
            fn sl_bytes(a: $v, n: usize) -> $v {
                let z = vdupq_n_s8(0);
                let b = $to8(a);
                match n {
                    0 => a,
                    1 => $from8(vextq_s8::<15>(z, b)),
                    2 => $from8(vextq_s8::<14>(z, b)),
                    4 => $from8(vextq_s8::<12>(z, b)),
                    8 => $from8(vextq_s8::<8>(z, b)),
                    n if n >= 16 => $from8(z),
                    n => shift_bytes_via_memory::<$t, Self>(a, n, true)
                }
            }

            fn sr_bytes(a: $v, n: usize) -> $v {
                let z = vdupq_n_s8(0);
                let b = $to8(a);
                match n {
                    0 => a,
                    1 => $from8(vextq_s8::<1>(b, z)),
                    2 => $from8(vextq_s8::<2>(b, z)),
                    4 => $from8(vextq_s8::<4>(b, z)),
                    8 => $from8(vextq_s8::<8>(b, z)),
                    n if n >= 16 => $from8(z),
                    n => shift_bytes_via_memory::<$t, Self>(a, n, false)
                }
            }
        }
    };
}

/// Byte shifts of a d register, given as `vext_s8` on its byte view.
macro_rules! d_byte_shifts {
    ($t:ty, $v:ty, $to8:expr, $from8:expr) => {
        neon! {
            fn sl_bytes(a: $v, n: usize) -> $v {
                let z = vdup_n_s8(0);
                let b = $to8(a);
                match n {
                    0 => a,
                    1 => $from8(vext_s8::<7>(z, b)),
                    2 => $from8(vext_s8::<6>(z, b)),
                    4 => $from8(vext_s8::<4>(z, b)),
                    n if n >= 8 => $from8(z),
                    n => shift_bytes_via_memory::<$t, Self>(a, n, true)
                }
            }

            fn sr_bytes(a: $v, n: usize) -> $v {
                let z = vdup_n_s8(0);
                let b = $to8(a);
                match n {
                    0 => a,
                    1 => $from8(vext_s8::<1>(b, z)),
                    2 => $from8(vext_s8::<2>(b, z)),
                    4 => $from8(vext_s8::<4>(b, z)),
                    n if n >= 8 => $from8(z),
                    n => shift_bytes_via_memory::<$t, Self>(a, n, false)
                }
            }
        }
    };
}

#[inline(always)]
fn same_q(a: int8x16_t) -> int8x16_t {
    a
}

#[inline(always)]
fn same_d(a: int8x8_t) -> int8x8_t {
    a
}

impl SimdOps<i8> for Neon128 {
    const LANES: usize = 16;
    const MASK_STRIDE: u32 = 4;
    type V = int8x16_t;

    q_byte_shifts!(i8, int8x16_t, same_q, same_q);

    neon! {
        fn load(ptr: *const i8) -> int8x16_t { vld1q_s8(ptr) }
        fn loadu(ptr: *const i8) -> int8x16_t { vld1q_s8(ptr) }
        fn store(ptr: *mut i8, a: int8x16_t) { vst1q_s8(ptr, a) }
        fn storeu(ptr: *mut i8, a: int8x16_t) { vst1q_s8(ptr, a) }
        fn zero() -> int8x16_t { vdupq_n_s8(0) }
        fn set1(x: i8) -> int8x16_t { vdupq_n_s8(x) }
        fn cmpeq(a: int8x16_t, b: int8x16_t) -> int8x16_t { vreinterpretq_s8_u8(vceqq_s8(a, b)) }
        fn cmpgt(a: int8x16_t, b: int8x16_t) -> int8x16_t { vreinterpretq_s8_u8(vcgtq_s8(a, b)) }
        fn cmplt(a: int8x16_t, b: int8x16_t) -> int8x16_t { vreinterpretq_s8_u8(vcltq_s8(a, b)) }
        fn and(a: int8x16_t, b: int8x16_t) -> int8x16_t { vandq_s8(a, b) }
        fn andnot(a: int8x16_t, b: int8x16_t) -> int8x16_t { vbicq_s8(b, a) }
        fn or(a: int8x16_t, b: int8x16_t) -> int8x16_t { vorrq_s8(a, b) }
        fn xor(a: int8x16_t, b: int8x16_t) -> int8x16_t { veorq_s8(a, b) }
        fn srai(a: int8x16_t, n: u32) -> int8x16_t { vshlq_s8(a, vdupq_n_s8(-(n as i8))) }
        fn slli(a: int8x16_t, n: u32) -> int8x16_t { vshlq_s8(a, vdupq_n_s8(n as i8)) }
        fn add(a: int8x16_t, b: int8x16_t) -> int8x16_t { vaddq_s8(a, b) }
        fn sub(a: int8x16_t, b: int8x16_t) -> int8x16_t { vsubq_s8(a, b) }
        fn adds(a: int8x16_t, b: int8x16_t) -> int8x16_t { vqaddq_s8(a, b) }
        fn subs(a: int8x16_t, b: int8x16_t) -> int8x16_t { vqsubq_s8(a, b) }
        fn min(a: int8x16_t, b: int8x16_t) -> int8x16_t { vminq_s8(a, b) }
        fn max(a: int8x16_t, b: int8x16_t) -> int8x16_t { vmaxq_s8(a, b) }
        fn min_unsigned(a: int8x16_t, b: int8x16_t) -> int8x16_t {
            vreinterpretq_s8_u8(vminq_u8(vreinterpretq_u8_s8(a), vreinterpretq_u8_s8(b)))
        }
        fn max_unsigned(a: int8x16_t, b: int8x16_t) -> int8x16_t {
            vreinterpretq_s8_u8(vmaxq_u8(vreinterpretq_u8_s8(a), vreinterpretq_u8_s8(b)))
        }
        fn movemask(a: int8x16_t) -> u64 { nibble_mask(vreinterpretq_u16_u8(vcltzq_s8(a))) }
        fn hmax(a: int8x16_t) -> i8 { vmaxvq_s8(a) }
    }
}

impl SimdOps<i16> for Neon128 {
    const LANES: usize = 8;
    const MASK_STRIDE: u32 = 8;
    type V = int16x8_t;

    q_byte_shifts!(i16, int16x8_t, vreinterpretq_s8_s16, vreinterpretq_s16_s8);

    neon! {
        fn load(ptr: *const i16) -> int16x8_t { vld1q_s16(ptr) }
        fn loadu(ptr: *const i16) -> int16x8_t { vld1q_s16(ptr) }
        fn store(ptr: *mut i16, a: int16x8_t) { vst1q_s16(ptr, a) }
        fn storeu(ptr: *mut i16, a: int16x8_t) { vst1q_s16(ptr, a) }
        fn zero() -> int16x8_t { vdupq_n_s16(0) }
        fn set1(x: i16) -> int16x8_t { vdupq_n_s16(x) }
        fn cmpeq(a: int16x8_t, b: int16x8_t) -> int16x8_t { vreinterpretq_s16_u16(vceqq_s16(a, b)) }
        fn cmpgt(a: int16x8_t, b: int16x8_t) -> int16x8_t { vreinterpretq_s16_u16(vcgtq_s16(a, b)) }
        fn cmplt(a: int16x8_t, b: int16x8_t) -> int16x8_t { vreinterpretq_s16_u16(vcltq_s16(a, b)) }
        fn and(a: int16x8_t, b: int16x8_t) -> int16x8_t { vandq_s16(a, b) }
        fn andnot(a: int16x8_t, b: int16x8_t) -> int16x8_t { vbicq_s16(b, a) }
        fn or(a: int16x8_t, b: int16x8_t) -> int16x8_t { vorrq_s16(a, b) }
        fn xor(a: int16x8_t, b: int16x8_t) -> int16x8_t { veorq_s16(a, b) }
        fn srai(a: int16x8_t, n: u32) -> int16x8_t { vshlq_s16(a, vdupq_n_s16(-(n as i16))) }
        fn slli(a: int16x8_t, n: u32) -> int16x8_t { vshlq_s16(a, vdupq_n_s16(n as i16)) }
        fn add(a: int16x8_t, b: int16x8_t) -> int16x8_t { vaddq_s16(a, b) }
        fn sub(a: int16x8_t, b: int16x8_t) -> int16x8_t { vsubq_s16(a, b) }
        fn adds(a: int16x8_t, b: int16x8_t) -> int16x8_t { vqaddq_s16(a, b) }
        fn subs(a: int16x8_t, b: int16x8_t) -> int16x8_t { vqsubq_s16(a, b) }
        fn min(a: int16x8_t, b: int16x8_t) -> int16x8_t { vminq_s16(a, b) }
        fn max(a: int16x8_t, b: int16x8_t) -> int16x8_t { vmaxq_s16(a, b) }
        fn min_unsigned(a: int16x8_t, b: int16x8_t) -> int16x8_t {
            vreinterpretq_s16_u16(vminq_u16(vreinterpretq_u16_s16(a), vreinterpretq_u16_s16(b)))
        }
        fn max_unsigned(a: int16x8_t, b: int16x8_t) -> int16x8_t {
            vreinterpretq_s16_u16(vmaxq_u16(vreinterpretq_u16_s16(a), vreinterpretq_u16_s16(b)))
        }
        fn movemask(a: int16x8_t) -> u64 { nibble_mask(vcltzq_s16(a)) }
        fn hmax(a: int16x8_t) -> i16 { vmaxvq_s16(a) }
    }
}

impl SimdOps<i32> for Neon128 {
    const LANES: usize = 4;
    const MASK_STRIDE: u32 = 16;
    type V = int32x4_t;

    q_byte_shifts!(i32, int32x4_t, vreinterpretq_s8_s32, vreinterpretq_s32_s8);

    neon! {
        fn load(ptr: *const i32) -> int32x4_t { vld1q_s32(ptr) }
        fn loadu(ptr: *const i32) -> int32x4_t { vld1q_s32(ptr) }
        fn store(ptr: *mut i32, a: int32x4_t) { vst1q_s32(ptr, a) }
        fn storeu(ptr: *mut i32, a: int32x4_t) { vst1q_s32(ptr, a) }
        fn zero() -> int32x4_t { vdupq_n_s32(0) }
        fn set1(x: i32) -> int32x4_t { vdupq_n_s32(x) }
        fn cmpeq(a: int32x4_t, b: int32x4_t) -> int32x4_t { vreinterpretq_s32_u32(vceqq_s32(a, b)) }
        fn cmpgt(a: int32x4_t, b: int32x4_t) -> int32x4_t { vreinterpretq_s32_u32(vcgtq_s32(a, b)) }
        fn cmplt(a: int32x4_t, b: int32x4_t) -> int32x4_t { vreinterpretq_s32_u32(vcltq_s32(a, b)) }
        fn and(a: int32x4_t, b: int32x4_t) -> int32x4_t { vandq_s32(a, b) }
        fn andnot(a: int32x4_t, b: int32x4_t) -> int32x4_t { vbicq_s32(b, a) }
        fn or(a: int32x4_t, b: int32x4_t) -> int32x4_t { vorrq_s32(a, b) }
        fn xor(a: int32x4_t, b: int32x4_t) -> int32x4_t { veorq_s32(a, b) }
        fn srai(a: int32x4_t, n: u32) -> int32x4_t { vshlq_s32(a, vdupq_n_s32(-(n as i32))) }
        fn slli(a: int32x4_t, n: u32) -> int32x4_t { vshlq_s32(a, vdupq_n_s32(n as i32)) }
        fn add(a: int32x4_t, b: int32x4_t) -> int32x4_t { vaddq_s32(a, b) }
        fn sub(a: int32x4_t, b: int32x4_t) -> int32x4_t { vsubq_s32(a, b) }
        fn adds(a: int32x4_t, b: int32x4_t) -> int32x4_t { vqaddq_s32(a, b) }
        fn subs(a: int32x4_t, b: int32x4_t) -> int32x4_t { vqsubq_s32(a, b) }
        fn min(a: int32x4_t, b: int32x4_t) -> int32x4_t { vminq_s32(a, b) }
        fn max(a: int32x4_t, b: int32x4_t) -> int32x4_t { vmaxq_s32(a, b) }
        fn min_unsigned(a: int32x4_t, b: int32x4_t) -> int32x4_t {
            vreinterpretq_s32_u32(vminq_u32(vreinterpretq_u32_s32(a), vreinterpretq_u32_s32(b)))
        }
        fn max_unsigned(a: int32x4_t, b: int32x4_t) -> int32x4_t {
            vreinterpretq_s32_u32(vmaxq_u32(vreinterpretq_u32_s32(a), vreinterpretq_u32_s32(b)))
        }
        fn movemask(a: int32x4_t) -> u64 { nibble_mask(vreinterpretq_u16_u32(vcltzq_s32(a))) }
        fn hmax(a: int32x4_t) -> i32 { vmaxvq_s32(a) }
    }
}

impl VectorOps for Neon128 {
    const NAME: &'static str = "neon128";

    fn available() -> bool {
        std::arch::is_aarch64_feature_detected!("neon")
    }

    neon! {
        fn widen_i8_i16(a: int8x16_t) -> int16x8_t { vmovl_s8(vget_low_s8(a)) }
        fn widen_i16_i32(a: int16x8_t) -> int32x4_t { vmovl_s16(vget_low_s16(a)) }
        fn narrow_i16_i8(a: int16x8_t, b: int16x8_t) -> int8x16_t { vcombine_s8(vqmovn_s16(a), vqmovn_s16(b)) }
        fn narrow_i32_i16(a: int32x4_t, b: int32x4_t) -> int16x8_t { vcombine_s16(vqmovn_s32(a), vqmovn_s32(b)) }
    }
}

impl SimdOps<i8> for Neon64 {
    const LANES: usize = 8;
    const MASK_STRIDE: u32 = 8;
    type V = int8x8_t;

    d_byte_shifts!(i8, int8x8_t, same_d, same_d);

    neon! {
        fn load(ptr: *const i8) -> int8x8_t { vld1_s8(ptr) }
        fn loadu(ptr: *const i8) -> int8x8_t { vld1_s8(ptr) }
        fn store(ptr: *mut i8, a: int8x8_t) { vst1_s8(ptr, a) }
        fn storeu(ptr: *mut i8, a: int8x8_t) { vst1_s8(ptr, a) }
        fn zero() -> int8x8_t { vdup_n_s8(0) }
        fn set1(x: i8) -> int8x8_t { vdup_n_s8(x) }
        fn cmpeq(a: int8x8_t, b: int8x8_t) -> int8x8_t { vreinterpret_s8_u8(vceq_s8(a, b)) }
        fn cmpgt(a: int8x8_t, b: int8x8_t) -> int8x8_t { vreinterpret_s8_u8(vcgt_s8(a, b)) }
        fn cmplt(a: int8x8_t, b: int8x8_t) -> int8x8_t { vreinterpret_s8_u8(vclt_s8(a, b)) }
        fn and(a: int8x8_t, b: int8x8_t) -> int8x8_t { vand_s8(a, b) }
        fn andnot(a: int8x8_t, b: int8x8_t) -> int8x8_t { vbic_s8(b, a) }
        fn or(a: int8x8_t, b: int8x8_t) -> int8x8_t { vorr_s8(a, b) }
        fn xor(a: int8x8_t, b: int8x8_t) -> int8x8_t { veor_s8(a, b) }
        fn srai(a: int8x8_t, n: u32) -> int8x8_t { vshl_s8(a, vdup_n_s8(-(n as i8))) }
        fn slli(a: int8x8_t, n: u32) -> int8x8_t { vshl_s8(a, vdup_n_s8(n as i8)) }
        fn add(a: int8x8_t, b: int8x8_t) -> int8x8_t { vadd_s8(a, b) }
        fn sub(a: int8x8_t, b: int8x8_t) -> int8x8_t { vsub_s8(a, b) }
        fn adds(a: int8x8_t, b: int8x8_t) -> int8x8_t { vqadd_s8(a, b) }
        fn subs(a: int8x8_t, b: int8x8_t) -> int8x8_t { vqsub_s8(a, b) }
        fn min(a: int8x8_t, b: int8x8_t) -> int8x8_t { vmin_s8(a, b) }
        fn max(a: int8x8_t, b: int8x8_t) -> int8x8_t { vmax_s8(a, b) }
        fn min_unsigned(a: int8x8_t, b: int8x8_t) -> int8x8_t {
            vreinterpret_s8_u8(vmin_u8(vreinterpret_u8_s8(a), vreinterpret_u8_s8(b)))
        }
        fn max_unsigned(a: int8x8_t, b: int8x8_t) -> int8x8_t {
            vreinterpret_s8_u8(vmax_u8(vreinterpret_u8_s8(a), vreinterpret_u8_s8(b)))
        }
        fn movemask(a: int8x8_t) -> u64 { vget_lane_u64::<0>(vreinterpret_u64_u8(vcltz_s8(a))) }
        fn hmax(a: int8x8_t) -> i8 { vmaxv_s8(a) }
    }
}

impl SimdOps<i16> for Neon64 {
    const LANES: usize = 4;
    const MASK_STRIDE: u32 = 16;
    type V = int16x4_t;

    d_byte_shifts!(i16, int16x4_t, vreinterpret_s8_s16, vreinterpret_s16_s8);

    neon! {
        fn load(ptr: *const i16) -> int16x4_t { vld1_s16(ptr) }
        fn loadu(ptr: *const i16) -> int16x4_t { vld1_s16(ptr) }
        fn store(ptr: *mut i16, a: int16x4_t) { vst1_s16(ptr, a) }
        fn storeu(ptr: *mut i16, a: int16x4_t) { vst1_s16(ptr, a) }
        fn zero() -> int16x4_t { vdup_n_s16(0) }
        fn set1(x: i16) -> int16x4_t { vdup_n_s16(x) }
        fn cmpeq(a: int16x4_t, b: int16x4_t) -> int16x4_t { vreinterpret_s16_u16(vceq_s16(a, b)) }
        fn cmpgt(a: int16x4_t, b: int16x4_t) -> int16x4_t { vreinterpret_s16_u16(vcgt_s16(a, b)) }
        fn cmplt(a: int16x4_t, b: int16x4_t) -> int16x4_t { vreinterpret_s16_u16(vclt_s16(a, b)) }
        fn and(a: int16x4_t, b: int16x4_t) -> int16x4_t { vand_s16(a, b) }
        fn andnot(a: int16x4_t, b: int16x4_t) -> int16x4_t { vbic_s16(b, a) }
        fn or(a: int16x4_t, b: int16x4_t) -> int16x4_t { vorr_s16(a, b) }
        fn xor(a: int16x4_t, b: int16x4_t) -> int16x4_t { veor_s16(a, b) }
        fn srai(a: int16x4_t, n: u32) -> int16x4_t { vshl_s16(a, vdup_n_s16(-(n as i16))) }
        fn slli(a: int16x4_t, n: u32) -> int16x4_t { vshl_s16(a, vdup_n_s16(n as i16)) }
        fn add(a: int16x4_t, b: int16x4_t) -> int16x4_t { vadd_s16(a, b) }
        fn sub(a: int16x4_t, b: int16x4_t) -> int16x4_t { vsub_s16(a, b) }
        fn adds(a: int16x4_t, b: int16x4_t) -> int16x4_t { vqadd_s16(a, b) }
        fn subs(a: int16x4_t, b: int16x4_t) -> int16x4_t { vqsub_s16(a, b) }
        fn min(a: int16x4_t, b: int16x4_t) -> int16x4_t { vmin_s16(a, b) }
        fn max(a: int16x4_t, b: int16x4_t) -> int16x4_t { vmax_s16(a, b) }
        fn min_unsigned(a: int16x4_t, b: int16x4_t) -> int16x4_t {
            vreinterpret_s16_u16(vmin_u16(vreinterpret_u16_s16(a), vreinterpret_u16_s16(b)))
        }
        fn max_unsigned(a: int16x4_t, b: int16x4_t) -> int16x4_t {
            vreinterpret_s16_u16(vmax_u16(vreinterpret_u16_s16(a), vreinterpret_u16_s16(b)))
        }
        fn movemask(a: int16x4_t) -> u64 { vget_lane_u64::<0>(vreinterpret_u64_u16(vcltz_s16(a))) }
        fn hmax(a: int16x4_t) -> i16 { vmaxv_s16(a) }
    }
}

impl SimdOps<i32> for Neon64 {
    const LANES: usize = 2;
    const MASK_STRIDE: u32 = 32;
    type V = int32x2_t;

    d_byte_shifts!(i32, int32x2_t, vreinterpret_s8_s32, vreinterpret_s32_s8);

    neon! {
        fn load(ptr: *const i32) -> int32x2_t { vld1_s32(ptr) }
        fn loadu(ptr: *const i32) -> int32x2_t { vld1_s32(ptr) }
        fn store(ptr: *mut i32, a: int32x2_t) { vst1_s32(ptr, a) }
        fn storeu(ptr: *mut i32, a: int32x2_t) { vst1_s32(ptr, a) }
        fn zero() -> int32x2_t { vdup_n_s32(0) }
        fn set1(x: i32) -> int32x2_t { vdup_n_s32(x) }
        fn cmpeq(a: int32x2_t, b: int32x2_t) -> int32x2_t { vreinterpret_s32_u32(vceq_s32(a, b)) }
        fn cmpgt(a: int32x2_t, b: int32x2_t) -> int32x2_t { vreinterpret_s32_u32(vcgt_s32(a, b)) }
        fn cmplt(a: int32x2_t, b: int32x2_t) -> int32x2_t { vreinterpret_s32_u32(vclt_s32(a, b)) }
        fn and(a: int32x2_t, b: int32x2_t) -> int32x2_t { vand_s32(a, b) }
        fn andnot(a: int32x2_t, b: int32x2_t) -> int32x2_t { vbic_s32(b, a) }
        fn or(a: int32x2_t, b: int32x2_t) -> int32x2_t { vorr_s32(a, b) }
        fn xor(a: int32x2_t, b: int32x2_t) -> int32x2_t { veor_s32(a, b) }
        fn srai(a: int32x2_t, n: u32) -> int32x2_t { vshl_s32(a, vdup_n_s32(-(n as i32))) }
        fn slli(a: int32x2_t, n: u32) -> int32x2_t { vshl_s32(a, vdup_n_s32(n as i32)) }
        fn add(a: int32x2_t, b: int32x2_t) -> int32x2_t { vadd_s32(a, b) }
        fn sub(a: int32x2_t, b: int32x2_t) -> int32x2_t { vsub_s32(a, b) }
        fn adds(a: int32x2_t, b: int32x2_t) -> int32x2_t { vqadd_s32(a, b) }
        fn subs(a: int32x2_t, b: int32x2_t) -> int32x2_t { vqsub_s32(a, b) }
        fn min(a: int32x2_t, b: int32x2_t) -> int32x2_t { vmin_s32(a, b) }
        fn max(a: int32x2_t, b: int32x2_t) -> int32x2_t { vmax_s32(a, b) }
        fn min_unsigned(a: int32x2_t, b: int32x2_t) -> int32x2_t {
            vreinterpret_s32_u32(vmin_u32(vreinterpret_u32_s32(a), vreinterpret_u32_s32(b)))
        }
        fn max_unsigned(a: int32x2_t, b: int32x2_t) -> int32x2_t {
            vreinterpret_s32_u32(vmax_u32(vreinterpret_u32_s32(a), vreinterpret_u32_s32(b)))
        }
        fn movemask(a: int32x2_t) -> u64 { vget_lane_u64::<0>(vreinterpret_u64_u32(vcltz_s32(a))) }
        fn hmax(a: int32x2_t) -> i32 { vmaxv_s32(a) }
    }
}

impl VectorOps for Neon64 {
    const NAME: &'static str = "neon64";

    fn available() -> bool {
        std::arch::is_aarch64_feature_detected!("neon")
    }

    neon! {
        fn widen_i8_i16(a: int8x8_t) -> int16x4_t { vget_low_s16(vmovl_s8(a)) }
        fn widen_i16_i32(a: int16x4_t) -> int32x2_t { vget_low_s32(vmovl_s16(a)) }
        fn narrow_i16_i8(a: int16x4_t, b: int16x4_t) -> int8x8_t { vqmovn_s16(vcombine_s16(a, b)) }
        fn narrow_i32_i16(a: int32x2_t, b: int32x2_t) -> int16x4_t { vqmovn_s32(vcombine_s32(a, b)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neon128_backend() {
        if !Neon128::available() {
            return;
        }
        unsafe { crate::simd::tests::check_backend::<Neon128>() };
    }

    #[test]
    fn test_neon64_backend() {
        if !Neon64::available() {
            return;
        }
        unsafe { crate::simd::tests::check_backend::<Neon64>() };
    }

    #[test]
    fn test_nibble_mask_layout() {
        let a: [i16; 8] = [-1, 0, 0, -5, 0, 0, 0, i16::MIN];
        unsafe {
            let v = <Neon128 as SimdOps<i16>>::loadu(a.as_ptr());
            let raw = <Neon128 as SimdOps<i16>>::movemask(v);
            assert_eq!(raw, 0xFF00_0000_FF00_00FF);
            assert_eq!(<Neon128 as SimdOps<i16>>::fix_mask_count(raw), 0b1000_1001);
        }
    }
}
