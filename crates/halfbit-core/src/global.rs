//! Process-wide registry and free-function entry points.
//!
//! Hosts that own a single kernel table for the life of the process call
//! [`initialize_distance_kernels`] once at load time and use the functions
//! below afterwards. Nothing initializes lazily: a call made too early
//! returns [`Error::Uninitialized`](crate::Error::Uninitialized).

use crate::codec::Half;
use crate::config::KernelConfig;
use crate::error::Result;
use crate::kernels::{DistanceKernels, KernelStrategies};

static KERNELS: DistanceKernels = DistanceKernels::new();

/// The process-wide registry.
#[must_use]
pub fn kernels() -> &'static DistanceKernels {
    &KERNELS
}

/// Binds the process-wide kernels from detected capabilities. Idempotent.
pub fn initialize_distance_kernels() {
    KERNELS.initialize();
}

/// Binds the process-wide kernels according to `config`. Idempotent.
pub fn initialize_distance_kernels_with(config: &KernelConfig) {
    KERNELS.initialize_with(config);
}

/// Returns `true` once the process-wide kernels are bound.
#[must_use]
pub fn kernels_initialized() -> bool {
    KERNELS.is_initialized()
}

/// Strategies bound in the process-wide registry.
pub fn kernel_strategies() -> Result<KernelStrategies> {
    KERNELS.strategies()
}

/// See [`DistanceKernels::squared_euclidean_distance`].
pub fn squared_euclidean_distance(dim: usize, a: &[Half], b: &[Half]) -> Result<f32> {
    KERNELS.squared_euclidean_distance(dim, a, b)
}

/// See [`DistanceKernels::inner_product`].
pub fn inner_product(dim: usize, a: &[Half], b: &[Half]) -> Result<f32> {
    KERNELS.inner_product(dim, a, b)
}

/// See [`DistanceKernels::cosine_similarity`].
pub fn cosine_similarity(dim: usize, a: &[Half], b: &[Half]) -> Result<f64> {
    KERNELS.cosine_similarity(dim, a, b)
}

/// See [`DistanceKernels::l1_distance`].
pub fn l1_distance(dim: usize, a: &[Half], b: &[Half]) -> Result<f32> {
    KERNELS.l1_distance(dim, a, b)
}

/// See [`DistanceKernels::hamming_distance`].
pub fn hamming_distance(bytes: usize, a: &[u8], b: &[u8], seed: u64) -> Result<u64> {
    KERNELS.hamming_distance(bytes, a, b, seed)
}

/// See [`DistanceKernels::jaccard_distance`].
pub fn jaccard_distance(
    bytes: usize,
    a: &[u8],
    b: &[u8],
    seed_and: u64,
    seed_aa: u64,
    seed_bb: u64,
) -> Result<f64> {
    KERNELS.jaccard_distance(bytes, a, b, seed_and, seed_aa, seed_bb)
}
