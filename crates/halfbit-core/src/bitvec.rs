//! Borrowed bit-vector view and its distances.
//!
//! Bits are packed most-significant first: bit `i` lives in byte `i / 8`
//! at mask `0x80 >> (i % 8)`. Unused bits of the last byte are expected to
//! be zero.

use crate::error::{Error, Result};
use crate::kernels::DistanceKernels;

/// A packed bit vector of `dim` bits borrowed from a byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitVector<'a> {
    bits: &'a [u8],
    dim: usize,
}

impl<'a> BitVector<'a> {
    /// Wraps `bits` as a vector of `dim` bits.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] unless `bits.len() == dim.div_ceil(8)`.
    pub fn new(bits: &'a [u8], dim: usize) -> Result<Self> {
        let expected = dim.div_ceil(8);
        if bits.len() != expected {
            return Err(Error::InvalidArgument(format!(
                "{dim} bits need {expected} bytes, got {}",
                bits.len()
            )));
        }
        Ok(Self { bits, dim })
    }

    /// Number of bits.
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// The packed bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bits
    }

    /// Returns bit `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.dim {
            return None;
        }
        Some(self.bits[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> u64 {
        self.bits.iter().map(|b| u64::from(b.count_ones())).sum()
    }
}

/// Packs booleans into bytes, most-significant bit first.
#[must_use]
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut out = vec![0u8; bits.len().div_ceil(8)];
    for (i, _) in bits.iter().enumerate().filter(|&(_, &set)| set) {
        out[i / 8] |= 0x80 >> (i % 8);
    }
    out
}

fn same_dimension(a: &BitVector<'_>, b: &BitVector<'_>) -> Result<()> {
    if a.dim == b.dim {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            left: a.dim,
            right: b.dim,
        })
    }
}

/// Number of differing bits.
#[allow(clippy::cast_precision_loss)] // bit counts stay far below 2^53
pub fn hamming_distance(
    kernels: &DistanceKernels,
    a: &BitVector<'_>,
    b: &BitVector<'_>,
) -> Result<f64> {
    same_dimension(a, b)?;
    let count = kernels.hamming_distance(a.bits.len(), a.bits, b.bits, 0)?;
    Ok(count as f64)
}

/// `1 - |a ∧ b| / |a ∨ b|`, with two empty sets at distance `0.0`.
pub fn jaccard_distance(
    kernels: &DistanceKernels,
    a: &BitVector<'_>,
    b: &BitVector<'_>,
) -> Result<f64> {
    same_dimension(a, b)?;
    kernels.jaccard_distance(a.bits.len(), a.bits, b.bits, 0, 0, 0)
}
