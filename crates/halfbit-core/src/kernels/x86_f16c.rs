//! F16C half-precision kernels for x86_64.
//!
//! Eight halves are widened per step with `vcvtph2ps`, accumulated with
//! FMA and reduced once at the end. The remainder below eight elements goes
//! through the portable kernel, so results agree with it up to reduction
//! order.
//!
//! All functions require runtime AVX + F16C + FMA detection before calling.
//! The registry only binds them when [`CapabilitySet::f16c`] is set.
//!
//! [`CapabilitySet::f16c`]: super::CapabilitySet::f16c

#![allow(clippy::wildcard_imports)]

use std::arch::x86_64::*;

use super::lanes::reduce_lanes;
use super::scalar::{self, CosineParts};
use crate::codec::Half;

/// F16C squared Euclidean distance.
///
/// # Safety
///
/// AVX, F16C and FMA must be available; `a.len() == b.len()`.
#[target_feature(enable = "avx", enable = "f16c", enable = "fma")]
pub(crate) unsafe fn squared_l2(a: &[Half], b: &[Half]) -> f32 {
    let ([sum], done) = reduce_lanes(a, b, |acc: &mut [__m256; 1], va, vb| {
        let diff = _mm256_sub_ps(va, vb);
        acc[0] = _mm256_fmadd_ps(diff, diff, acc[0]);
    });
    sum + scalar::squared_l2(&a[done..], &b[done..])
}

/// F16C inner product.
///
/// # Safety
///
/// AVX, F16C and FMA must be available; `a.len() == b.len()`.
#[target_feature(enable = "avx", enable = "f16c", enable = "fma")]
pub(crate) unsafe fn inner_product(a: &[Half], b: &[Half]) -> f32 {
    let ([sum], done) = reduce_lanes(a, b, |acc: &mut [__m256; 1], va, vb| {
        acc[0] = _mm256_fmadd_ps(va, vb, acc[0]);
    });
    sum + scalar::inner_product(&a[done..], &b[done..])
}

/// F16C L1 distance.
///
/// # Safety
///
/// AVX, F16C and FMA must be available; `a.len() == b.len()`.
#[target_feature(enable = "avx", enable = "f16c", enable = "fma")]
pub(crate) unsafe fn l1(a: &[Half], b: &[Half]) -> f32 {
    let sign = _mm256_set1_ps(-0.0);
    let ([sum], done) = reduce_lanes(a, b, |acc: &mut [__m256; 1], va, vb| {
        let diff = _mm256_andnot_ps(sign, _mm256_sub_ps(va, vb));
        acc[0] = _mm256_add_ps(acc[0], diff);
    });
    sum + scalar::l1(&a[done..], &b[done..])
}

/// F16C dot product and squared norms.
///
/// # Safety
///
/// AVX, F16C and FMA must be available; `a.len() == b.len()`.
#[target_feature(enable = "avx", enable = "f16c", enable = "fma")]
pub(crate) unsafe fn cosine_parts(a: &[Half], b: &[Half]) -> CosineParts {
    let ([dot, norm_a, norm_b], done) =
        reduce_lanes(a, b, |acc: &mut [__m256; 3], va, vb| {
            acc[0] = _mm256_fmadd_ps(va, vb, acc[0]);
            acc[1] = _mm256_fmadd_ps(va, va, acc[1]);
            acc[2] = _mm256_fmadd_ps(vb, vb, acc[2]);
        });
    CosineParts {
        dot,
        norm_a,
        norm_b,
    }
    .merge(scalar::cosine_parts(&a[done..], &b[done..]))
}
