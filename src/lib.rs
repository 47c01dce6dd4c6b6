//! SIMD-accelerated pairwise sequence alignment with affine gap penalties.
//!
//! Needleman-Wunsch, Smith-Waterman, linear-space Hirschberg and a memory-reduced
//! Smith-Waterman share one vectorised recurrence written against [`simd::VectorOps`].
//! The backend is picked at compile time (see [`simd::Engine`]); every cell's
//! traceback direction is stored as a 2-bit code in a [`packed::DirMatrix`].
//!
//! ```
//! use stripe_aligner::{align_symbols, AlignmentSettings, Algorithm, ScoreMatrix};
//!
//! let settings = AlignmentSettings::new()
//!     .with_matrix(ScoreMatrix::uniform(2, -1))
//!     .with_gap(-5, -2)
//!     .with_algorithm(Algorithm::Local);
//! let res = align_symbols(b"TTACGTTT", b"ACGT", &settings).unwrap();
//! assert_eq!(res.best().score, 8);
//! assert_eq!((res.best().ref_start, res.best().ref_end), (2, 5));
//! ```

pub mod error;
pub mod packed;
pub mod simd;
pub mod scores;
pub mod settings;
pub mod result;
pub mod cigar;

mod kernel;
mod align;
mod hirschberg;

#[cfg(feature = "simulate")]
pub mod simulate;

pub use align::{align, align_symbols, align_with};
pub use cigar::{Cigar, OpLen, Operation};
pub use error::{AlignError, Result};
pub use packed::{Dir, DirMatrix, DirView, DirViewMut};
pub use result::{AlignmentResult, Layout};
pub use scores::{rank_scores, to_lookup, AlignmentScore, ScoreMatrix};
pub use settings::{Algorithm, AlignmentSettings, TieBreak};
