//! Kernel registry: strategy selection at initialization and validated dispatch.
//!
//! A [`DistanceKernels`] value owns one table of kernel function pointers,
//! bound exactly once from the detected [`CapabilitySet`]. Every entry point
//! validates its arguments before reading any data and routes through the
//! table without re-checking processor features.

use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

use super::capability::CapabilitySet;
use super::scalar::{self, CosineParts};
use super::MAX_DIM;
use crate::codec::Half;
use crate::config::KernelConfig;
use crate::error::{Error, Result};

type HalfKernel = unsafe fn(&[Half], &[Half]) -> f32;
type CosineKernel = unsafe fn(&[Half], &[Half]) -> CosineParts;
type HammingKernel = unsafe fn(&[u8], &[u8], u64) -> u64;
type JaccardKernel = unsafe fn(&[u8], &[u8], u64) -> f64;

// =============================================================================
// Strategies
// =============================================================================

/// Implementation bound for the half-precision kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HalfStrategy {
    /// Scalar decode-and-accumulate loop.
    Portable,
    /// 8-lane F16C conversion with FMA accumulation.
    F16c,
}

/// Implementation bound for the bit kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BitStrategy {
    /// 64-bit word popcount loop.
    Portable,
    /// 64-byte AVX-512 blocks with vector popcount.
    Avx512,
}

/// Strategies bound by a registry, one per kernel family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct KernelStrategies {
    /// Squared L2, inner product, cosine and L1.
    pub half: HalfStrategy,
    /// Hamming and Jaccard.
    pub bit: BitStrategy,
}

impl fmt::Display for HalfStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Portable => "portable",
            Self::F16c => "f16c",
        })
    }
}

impl fmt::Display for BitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Portable => "portable",
            Self::Avx512 => "avx512",
        })
    }
}

// =============================================================================
// Kernel table
// =============================================================================

/// One function pointer per kernel. Immutable once bound.
///
/// Vectorized entries are only installed when the matching capability was
/// detected, which is what makes the `unsafe` calls in [`DistanceKernels`]
/// sound.
#[derive(Clone, Copy)]
struct KernelTable {
    squared_l2: HalfKernel,
    inner_product: HalfKernel,
    cosine: CosineKernel,
    l1: HalfKernel,
    hamming: HammingKernel,
    jaccard: JaccardKernel,
    capabilities: CapabilitySet,
    strategies: KernelStrategies,
}

impl KernelTable {
    fn bind(capabilities: CapabilitySet) -> Self {
        #[allow(unused_mut)]
        let mut table = Self {
            squared_l2: scalar::squared_l2,
            inner_product: scalar::inner_product,
            cosine: scalar::cosine_parts,
            l1: scalar::l1,
            hamming: scalar::hamming,
            jaccard: scalar::jaccard,
            capabilities,
            strategies: KernelStrategies {
                half: HalfStrategy::Portable,
                bit: BitStrategy::Portable,
            },
        };

        #[cfg(target_arch = "x86_64")]
        {
            use super::{x86_avx512, x86_f16c};

            if capabilities.f16c {
                table.squared_l2 = x86_f16c::squared_l2;
                table.inner_product = x86_f16c::inner_product;
                table.cosine = x86_f16c::cosine_parts;
                table.l1 = x86_f16c::l1;
                table.strategies.half = HalfStrategy::F16c;
            }
            if capabilities.avx512_popcnt {
                table.hamming = x86_avx512::hamming;
                table.jaccard = x86_avx512::jaccard;
                table.strategies.bit = BitStrategy::Avx512;
            }
        }

        table
    }
}

// =============================================================================
// Validation
// =============================================================================

fn check_dimension(dim: usize, a: &[Half], b: &[Half]) -> Result<()> {
    if dim == 0 || dim > MAX_DIM {
        return Err(Error::InvalidArgument(format!(
            "dimension {dim} is outside 1..={MAX_DIM}"
        )));
    }
    let shortest = a.len().min(b.len());
    if shortest < dim {
        return Err(Error::InvalidArgument(format!(
            "buffer holds {shortest} values but dimension is {dim}"
        )));
    }
    Ok(())
}

fn check_bytes(bytes: usize, a: &[u8], b: &[u8]) -> Result<()> {
    let shortest = a.len().min(b.len());
    if shortest < bytes {
        return Err(Error::InvalidArgument(format!(
            "buffer holds {shortest} bytes but {bytes} were requested"
        )));
    }
    Ok(())
}

// =============================================================================
// Registry
// =============================================================================

/// Distance kernel registry.
///
/// Kernels are unavailable until [`initialize`](Self::initialize) has run
/// once; afterwards the bound table is read without locking from any
/// number of threads. `new` is `const`, so a registry can live in a
/// `static`.
///
/// # Example
///
/// ```
/// use halfbit_core::{encode_half, DistanceKernels};
///
/// let kernels = DistanceKernels::new();
/// kernels.initialize();
///
/// let a: Vec<_> = [1.0, 0.0, 0.0].into_iter().map(encode_half).collect();
/// let b: Vec<_> = [0.0, 1.0, 0.0].into_iter().map(encode_half).collect();
/// assert_eq!(kernels.squared_euclidean_distance(3, &a, &b).unwrap(), 2.0);
/// ```
pub struct DistanceKernels {
    table: OnceLock<KernelTable>,
}

impl DistanceKernels {
    /// Creates an uninitialized registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table: OnceLock::new(),
        }
    }

    /// Binds the kernels from the detected processor capabilities.
    ///
    /// Idempotent: once a table is bound, further calls return immediately.
    /// Concurrent first calls bind exactly one table and every caller
    /// observes it fully populated.
    pub fn initialize(&self) {
        self.initialize_with(&KernelConfig::default());
    }

    /// Binds the kernels according to `config`.
    ///
    /// The first successful call wins; a later call with a different
    /// configuration leaves the bound table unchanged.
    pub fn initialize_with(&self, config: &KernelConfig) {
        let mut bound_now = false;
        let table = self.table.get_or_init(|| {
            bound_now = true;
            KernelTable::bind(config.capabilities())
        });

        if bound_now {
            tracing::info!(
                dispatch = ?config.dispatch,
                f16c = table.capabilities.f16c,
                avx512_popcnt = table.capabilities.avx512_popcnt,
                half = %table.strategies.half,
                bit = %table.strategies.bit,
                "Distance kernels initialized"
            );
        } else {
            tracing::trace!("Distance kernels already initialized");
        }
    }

    /// Returns `true` once a kernel table has been bound.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.table.get().is_some()
    }

    /// Strategies bound at initialization.
    pub fn strategies(&self) -> Result<KernelStrategies> {
        Ok(self.table()?.strategies)
    }

    /// Capabilities the table was bound against.
    ///
    /// Empty under [`DispatchMode::Portable`](crate::DispatchMode::Portable)
    /// even when the processor supports more.
    pub fn capabilities(&self) -> Result<CapabilitySet> {
        Ok(self.table()?.capabilities)
    }

    fn table(&self) -> Result<&KernelTable> {
        self.table.get().ok_or(Error::Uninitialized)
    }

    // -------------------------------------------------------------------------
    // Half-precision kernels
    // -------------------------------------------------------------------------

    /// Σ (a_i − b_i)² over the first `dim` elements.
    ///
    /// # Errors
    ///
    /// [`Error::Uninitialized`] before initialization;
    /// [`Error::InvalidArgument`] when `dim` is outside `1..=MAX_DIM` or a
    /// buffer holds fewer than `dim` values.
    pub fn squared_euclidean_distance(&self, dim: usize, a: &[Half], b: &[Half]) -> Result<f32> {
        let table = self.table()?;
        check_dimension(dim, a, b)?;
        // SAFETY: the table only holds kernels whose features were detected,
        // and both slices are cut to `dim`.
        Ok(unsafe { (table.squared_l2)(&a[..dim], &b[..dim]) })
    }

    /// Σ a_i · b_i over the first `dim` elements. Never negated.
    ///
    /// # Errors
    ///
    /// Same as [`squared_euclidean_distance`](Self::squared_euclidean_distance).
    pub fn inner_product(&self, dim: usize, a: &[Half], b: &[Half]) -> Result<f32> {
        let table = self.table()?;
        check_dimension(dim, a, b)?;
        // SAFETY: see `squared_euclidean_distance`.
        Ok(unsafe { (table.inner_product)(&a[..dim], &b[..dim]) })
    }

    /// Cosine similarity over the first `dim` elements, finished in `f64`.
    ///
    /// # Errors
    ///
    /// As [`squared_euclidean_distance`](Self::squared_euclidean_distance),
    /// plus [`Error::DegenerateInput`] when either squared norm is zero.
    pub fn cosine_similarity(&self, dim: usize, a: &[Half], b: &[Half]) -> Result<f64> {
        let table = self.table()?;
        check_dimension(dim, a, b)?;
        // SAFETY: see `squared_euclidean_distance`.
        let parts = unsafe { (table.cosine)(&a[..dim], &b[..dim]) };
        parts.similarity()
    }

    /// Σ |a_i − b_i| over the first `dim` elements.
    ///
    /// # Errors
    ///
    /// Same as [`squared_euclidean_distance`](Self::squared_euclidean_distance).
    pub fn l1_distance(&self, dim: usize, a: &[Half], b: &[Half]) -> Result<f32> {
        let table = self.table()?;
        check_dimension(dim, a, b)?;
        // SAFETY: see `squared_euclidean_distance`.
        Ok(unsafe { (table.l1)(&a[..dim], &b[..dim]) })
    }

    // -------------------------------------------------------------------------
    // Bit kernels
    // -------------------------------------------------------------------------

    /// `seed` plus the number of differing bits in the first `bytes` bytes.
    ///
    /// The seed lets a caller accumulate across calls.
    ///
    /// # Errors
    ///
    /// [`Error::Uninitialized`] before initialization;
    /// [`Error::InvalidArgument`] when a buffer is shorter than `bytes`.
    pub fn hamming_distance(&self, bytes: usize, a: &[u8], b: &[u8], seed: u64) -> Result<u64> {
        let table = self.table()?;
        check_bytes(bytes, a, b)?;
        // SAFETY: see `squared_euclidean_distance`.
        Ok(unsafe { (table.hamming)(&a[..bytes], &b[..bytes], seed) })
    }

    /// `1 − |a ∧ b| / |a ∨ b|` over the first `bytes` bytes.
    ///
    /// The intersection count starts at `seed_and`; the union count starts
    /// at zero. `seed_aa` and `seed_bb` are accepted for interface
    /// compatibility and currently unused. Returns `0.0` when no bit is
    /// set in either buffer.
    ///
    /// # Errors
    ///
    /// Same as [`hamming_distance`](Self::hamming_distance).
    pub fn jaccard_distance(
        &self,
        bytes: usize,
        a: &[u8],
        b: &[u8],
        seed_and: u64,
        _seed_aa: u64,
        _seed_bb: u64,
    ) -> Result<f64> {
        let table = self.table()?;
        check_bytes(bytes, a, b)?;
        // SAFETY: see `squared_euclidean_distance`.
        Ok(unsafe { (table.jaccard)(&a[..bytes], &b[..bytes], seed_and) })
    }
}

impl Default for DistanceKernels {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DistanceKernels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("DistanceKernels");
        match self.table.get() {
            Some(table) => s
                .field("capabilities", &table.capabilities)
                .field("strategies", &table.strategies),
            None => s.field("initialized", &false),
        };
        s.finish()
    }
}
