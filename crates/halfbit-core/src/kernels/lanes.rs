//! Eight-lane half-precision reduction shared by the F16C kernels.
//!
//! Each kernel supplies only its per-lane step; loading, widening, looping
//! and the horizontal reduction live here. The caller finishes the
//! `len % 8` remainder with the portable kernel.

#![allow(clippy::wildcard_imports)]

use std::arch::x86_64::*;

use crate::codec::Half;

/// Half values widened per step.
pub(crate) const LANES: usize = 8;

/// Horizontal sum of eight `f32` lanes.
#[target_feature(enable = "avx")]
#[inline]
pub(crate) unsafe fn hsum256_ps(v: __m256) -> f32 {
    let hi = _mm256_extractf128_ps(v, 1);
    let lo = _mm256_castps256_ps128(v);
    let sum128 = _mm_add_ps(lo, hi);
    let shuf = _mm_movehdup_ps(sum128);
    let sums = _mm_add_ps(sum128, shuf);
    let shuf2 = _mm_movehl_ps(sums, sums);
    _mm_cvtss_f32(_mm_add_ss(sums, shuf2))
}

/// Loads eight consecutive halves and widens them to `f32`.
///
/// # Safety
///
/// `ptr` must be valid for reading eight `Half` values; F16C must be available.
#[target_feature(enable = "avx", enable = "f16c")]
#[inline]
unsafe fn load_widen(ptr: *const Half) -> __m256 {
    _mm256_cvtph_ps(_mm_loadu_si128(ptr.cast()))
}

/// Folds `a` and `b` eight lanes at a time into `N` vector accumulators.
///
/// `step` receives the accumulators and the widened lanes of both operands.
/// Returns each accumulator reduced to a scalar, plus the number of
/// elements consumed (the largest multiple of [`LANES`] not above `a.len()`).
///
/// # Safety
///
/// AVX, F16C and FMA must be available. `b` must be at least as long as `a`.
#[target_feature(enable = "avx", enable = "f16c", enable = "fma")]
#[inline]
pub(crate) unsafe fn reduce_lanes<const N: usize, F>(
    a: &[Half],
    b: &[Half],
    mut step: F,
) -> ([f32; N], usize)
where
    F: FnMut(&mut [__m256; N], __m256, __m256),
{
    debug_assert!(b.len() >= a.len());

    let full = a.len() / LANES * LANES;
    let mut acc = [_mm256_setzero_ps(); N];
    let mut offset = 0;
    while offset < full {
        let va = load_widen(a.as_ptr().add(offset));
        let vb = load_widen(b.as_ptr().add(offset));
        step(&mut acc, va, vb);
        offset += LANES;
    }

    let mut sums = [0.0f32; N];
    for (sum, lane) in sums.iter_mut().zip(acc) {
        *sum = hsum256_ps(lane);
    }
    (sums, full)
}
