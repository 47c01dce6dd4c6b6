//! Error type shared by every stage of an alignment.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AlignError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignError {
    /// A buffer (matrix limbs, score arrays, profiles, row buffers) could not be allocated.
    #[error("failed to allocate {count} elements for {what}")]
    Alloc { what: &'static str, count: usize },

    #[error("byte {byte:#04x} at position {pos} is not a sequence symbol")]
    InvalidSymbol { pos: usize, byte: u8 },

    #[error("lookup index {index} is outside 0..=26")]
    InvalidIndex { index: u8 },

    #[error("gap penalties must satisfy open <= extend <= 0 (open {open}, extend {extend})")]
    InvalidGap { open: i16, extend: i16 },

    #[error("tie-break order must name diagonal, up and left exactly once")]
    InvalidTieBreak,

    #[error("cannot align an empty sequence")]
    EmptySequence,

    /// Scores of this size could saturate 32-bit lanes.
    #[error("score bound {bound} does not fit 32-bit lanes")]
    ScoreRange { bound: u128 },

    /// A checked cursor move would leave the addressable range of a packed matrix.
    #[error("moving the cursor by {delta} from element {pos} leaves 0..{len}")]
    OutOfBounds { pos: usize, delta: i128, len: usize },

    #[error("the {backend} backend is not supported by this CPU")]
    Unsupported { backend: &'static str },

    /// Only produced by accessors that insist on an alignment; the result itself
    /// carries the "no alignment" marker.
    #[error("no alignment reached the minimum score of {min_score}")]
    NoAlignment { min_score: i32 },
}

/// Allocates a vector of `count` copies of `value`, reporting failure instead of aborting.
pub(crate) fn try_filled<T: Clone>(what: &'static str, count: usize, value: T) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(count).map_err(|_| AlignError::Alloc { what, count })?;
    v.resize(count, value);
    Ok(v)
}

/// Allocates an empty vector able to hold `count` elements without reallocating.
pub(crate) fn try_with_capacity<T>(what: &'static str, count: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(count).map_err(|_| AlignError::Alloc { what, count })?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_filled() {
        let v = try_filled("limbs", 5, 7u8).unwrap();
        assert_eq!(v, vec![7u8; 5]);

        let err = try_filled("limbs", usize::MAX, 0u64).unwrap_err();
        assert_eq!(err, AlignError::Alloc { what: "limbs", count: usize::MAX });
    }

    #[test]
    fn test_messages() {
        let e = AlignError::InvalidGap { open: -1, extend: -4 };
        assert_eq!(e.to_string(), "gap penalties must satisfy open <= extend <= 0 (open -1, extend -4)");
        let e = AlignError::InvalidSymbol { pos: 3, byte: b'-' };
        assert_eq!(e.to_string(), "byte 0x2d at position 3 is not a sequence symbol");
        let e = AlignError::ScoreRange { bound: 1 << 31 };
        assert_eq!(e.to_string(), "score bound 2147483648 does not fit 32-bit lanes");
    }
}
