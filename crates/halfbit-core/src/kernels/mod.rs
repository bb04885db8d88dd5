//! Distance kernels over half-precision and bit-packed vectors.
//!
//! # Module Structure
//!
//! - `capability`: one-time processor feature probe
//! - `scalar`: portable kernels, also used for vectorized tails
//! - `lanes`: shared 8-lane widen/accumulate/reduce helper (x86_64 only)
//! - `x86_f16c`: F16C + FMA half kernels (x86_64 only)
//! - `x86_avx512`: AVX-512 VPOPCNTDQ bit kernels (x86_64 only)
//! - `dispatch`: the [`DistanceKernels`] registry
//!
//! Vectorized and portable half kernels agree within floating-point
//! rounding, not bit-exactly: lanes are summed in a different order.
//! Bit kernels agree exactly.

// =============================================================================
// Unsafe Invariants Reference
// =============================================================================
// SAFETY: Shared invariants for unsafe code in this module tree.
// - Condition 1: Vectorized kernels are installed in a table only when
//   `capability::detect` reported their features.
// - Condition 2: Both operands are cut to the same length before a kernel
//   runs; pointer offsets stay below that length minus one lane width.
// - Condition 3: All loads use unaligned `*_loadu_*` intrinsics.

pub mod capability;
mod dispatch;
mod scalar;

#[cfg(target_arch = "x86_64")]
mod lanes;
#[cfg(target_arch = "x86_64")]
mod x86_avx512;
#[cfg(target_arch = "x86_64")]
mod x86_f16c;

pub use capability::{detect, CapabilitySet};
pub use dispatch::{BitStrategy, DistanceKernels, HalfStrategy, KernelStrategies};

/// Largest dimension accepted by the half-precision kernels.
pub const MAX_DIM: usize = 16_000;

#[cfg(test)]
mod scalar_tests;
