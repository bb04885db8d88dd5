//! Portable kernel implementations.
//!
//! These run on every target and are the reference the vectorized kernels
//! are checked against. Half kernels accumulate in `f32` in index order;
//! bit kernels popcount 64-bit words and finish byte by byte.

use crate::codec::{decode_half, Half};
use crate::error::{Error, Result};

// =============================================================================
// Half-precision kernels
// =============================================================================

/// Sum of squared differences.
#[inline]
pub(crate) fn squared_l2(a: &[Half], b: &[Half]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = decode_half(x) - decode_half(y);
            d * d
        })
        .sum()
}

/// Sum of products.
#[inline]
pub(crate) fn inner_product(a: &[Half], b: &[Half]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| decode_half(x) * decode_half(y))
        .sum()
}

/// Sum of absolute differences.
#[inline]
pub(crate) fn l1(a: &[Half], b: &[Half]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| (decode_half(x) - decode_half(y)).abs())
        .sum()
}

/// Dot product and both squared norms in one pass.
#[inline]
pub(crate) fn cosine_parts(a: &[Half], b: &[Half]) -> CosineParts {
    let mut parts = CosineParts::default();
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (decode_half(x), decode_half(y));
        parts.dot += x * y;
        parts.norm_a += x * x;
        parts.norm_b += y * y;
    }
    parts
}

/// Partial sums behind a cosine similarity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct CosineParts {
    pub(crate) dot: f32,
    /// Squared norm of the left operand.
    pub(crate) norm_a: f32,
    /// Squared norm of the right operand.
    pub(crate) norm_b: f32,
}

impl CosineParts {
    #[inline]
    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            dot: self.dot + other.dot,
            norm_a: self.norm_a + other.norm_a,
            norm_b: self.norm_b + other.norm_b,
        }
    }

    /// Finishes the ratio in `f64`. A zero squared norm has no defined cosine.
    pub(crate) fn similarity(self) -> Result<f64> {
        if self.norm_a == 0.0 || self.norm_b == 0.0 {
            return Err(Error::DegenerateInput(
                "cosine similarity of a zero-norm vector is undefined".to_string(),
            ));
        }
        let denominator = f64::from(self.norm_a).sqrt() * f64::from(self.norm_b).sqrt();
        Ok(f64::from(self.dot) / denominator)
    }
}

// =============================================================================
// Bit kernels
// =============================================================================

#[inline]
fn load_word(chunk: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(chunk);
    u64::from_ne_bytes(word)
}

/// Population count of `a XOR b`, added to `seed`.
#[inline]
pub(crate) fn hamming(a: &[u8], b: &[u8], seed: u64) -> u64 {
    let words_a = a.chunks_exact(8);
    let words_b = b.chunks_exact(8);
    let tail = words_a
        .remainder()
        .iter()
        .zip(words_b.remainder())
        .map(|(&x, &y)| u64::from((x ^ y).count_ones()));

    words_a
        .zip(words_b)
        .map(|(x, y)| u64::from((load_word(x) ^ load_word(y)).count_ones()))
        .chain(tail)
        .fold(seed, u64::wrapping_add)
}

/// Adds `popcount(a AND b)` and `popcount(a OR b)` onto running counts.
///
/// The vectorized kernel hands its block totals in here to finish the tail.
#[inline]
pub(crate) fn jaccard_accumulate(
    a: &[u8],
    b: &[u8],
    mut and_count: u64,
    mut or_count: u64,
) -> (u64, u64) {
    let words_a = a.chunks_exact(8);
    let words_b = b.chunks_exact(8);
    let (tail_a, tail_b) = (words_a.remainder(), words_b.remainder());

    for (x, y) in words_a.zip(words_b) {
        let (x, y) = (load_word(x), load_word(y));
        and_count = and_count.wrapping_add(u64::from((x & y).count_ones()));
        or_count = or_count.wrapping_add(u64::from((x | y).count_ones()));
    }
    for (&x, &y) in tail_a.iter().zip(tail_b) {
        and_count = and_count.wrapping_add(u64::from((x & y).count_ones()));
        or_count = or_count.wrapping_add(u64::from((x | y).count_ones()));
    }
    (and_count, or_count)
}

/// `1 - and/or`, or `0.0` when no bit is set in either operand.
#[inline]
#[allow(clippy::cast_precision_loss)] // counts stay far below 2^53
pub(crate) fn jaccard_finish(and_count: u64, or_count: u64) -> f64 {
    if or_count == 0 {
        return 0.0;
    }
    1.0 - and_count as f64 / or_count as f64
}

/// Jaccard distance with the intersection count seeded by `seed_and`.
#[inline]
pub(crate) fn jaccard(a: &[u8], b: &[u8], seed_and: u64) -> f64 {
    let (and_count, or_count) = jaccard_accumulate(a, b, seed_and, 0);
    jaccard_finish(and_count, or_count)
}
