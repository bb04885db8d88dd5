//! # halfbit Core
//!
//! Distance kernels over half-precision and bit-packed vectors, with
//! runtime selection between portable and vectorized implementations.
//!
//! ## Features
//!
//! - **Half codec**: bit-exact 16-bit float decoding, rounding encoder
//! - **Half kernels**: squared L2, inner product, cosine, L1 (F16C, 8 lanes)
//! - **Bit kernels**: Hamming and Jaccard (AVX-512 VPOPCNTDQ, 64-byte blocks)
//! - **One-time dispatch**: capabilities probed once, kernels bound once
//! - **Vector operations**: normalization, arithmetic, slicing, quantization
//!
//! ## Quick Start
//!
//! ```rust
//! use halfbit_core::{bitvec, halfvec, DistanceKernels};
//!
//! fn main() -> halfbit_core::Result<()> {
//!     let kernels = DistanceKernels::new();
//!     kernels.initialize();
//!
//!     let a = halfvec::encode_slice(&[0.5, 1.0, -2.0])?;
//!     let b = halfvec::encode_slice(&[1.5, 0.0, 2.0])?;
//!     let distance = halfvec::l2_distance(&kernels, &a, &b)?;
//!     assert!((distance - 18f64.sqrt()).abs() < 1e-6);
//!
//!     let x = bitvec::BitVector::new(&[0b1010_0000], 3)?;
//!     let y = bitvec::BitVector::new(&[0b1000_0000], 3)?;
//!     assert_eq!(bitvec::hamming_distance(&kernels, &x, &y)?, 1.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
// Clippy lints configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(
    test,
    allow(
        clippy::doc_markdown,
        clippy::uninlined_format_args,
        clippy::unreadable_literal
    )
)]

pub mod bitvec;
pub mod codec;
pub mod config;
pub mod error;
pub mod global;
pub mod halfvec;
pub mod kernels;

pub use codec::{decode_half, encode_half, Half, HALF_MAX};
pub use config::{DispatchMode, KernelConfig};
pub use error::{Error, ErrorKind, Result};
pub use kernels::{
    BitStrategy, CapabilitySet, DistanceKernels, HalfStrategy, KernelStrategies, MAX_DIM,
};
