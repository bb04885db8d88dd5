//! AVX-512 bit kernels for x86_64.
//!
//! 64-byte blocks are combined with 512-bit XOR/AND/OR and counted with
//! `vpopcntq`. Bytes past the last full block are finished by the portable
//! kernel, which receives the block totals as its starting counts.
//!
//! All functions require runtime AVX-512F + VPOPCNTDQ detection before
//! calling.

// SAFETY: `_mm512_reduce_add_epi64` sums per-lane popcounts of at most 64
// each, so the result is non-negative and the i64 -> u64 casts are lossless.
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::wildcard_imports)]

use std::arch::x86_64::*;

use super::scalar;

/// Bytes per 512-bit block.
const BLOCK: usize = 64;

/// AVX-512 Hamming distance seeded with `seed`.
///
/// # Safety
///
/// AVX-512F and AVX-512 VPOPCNTDQ must be available; `a.len() == b.len()`.
#[target_feature(enable = "avx512f", enable = "avx512vpopcntdq")]
pub(crate) unsafe fn hamming(a: &[u8], b: &[u8], seed: u64) -> u64 {
    let blocks = a.len() / BLOCK * BLOCK;
    let mut acc = _mm512_setzero_si512();
    let mut offset = 0;
    while offset < blocks {
        let va = _mm512_loadu_si512(a.as_ptr().add(offset).cast());
        let vb = _mm512_loadu_si512(b.as_ptr().add(offset).cast());
        acc = _mm512_add_epi64(acc, _mm512_popcnt_epi64(_mm512_xor_si512(va, vb)));
        offset += BLOCK;
    }
    let block_count = _mm512_reduce_add_epi64(acc) as u64;
    scalar::hamming(&a[blocks..], &b[blocks..], seed.wrapping_add(block_count))
}

/// AVX-512 Jaccard distance with the intersection seeded by `seed_and`.
///
/// # Safety
///
/// AVX-512F and AVX-512 VPOPCNTDQ must be available; `a.len() == b.len()`.
#[target_feature(enable = "avx512f", enable = "avx512vpopcntdq")]
pub(crate) unsafe fn jaccard(a: &[u8], b: &[u8], seed_and: u64) -> f64 {
    let blocks = a.len() / BLOCK * BLOCK;
    let mut and_acc = _mm512_setzero_si512();
    let mut or_acc = _mm512_setzero_si512();
    let mut offset = 0;
    while offset < blocks {
        let va = _mm512_loadu_si512(a.as_ptr().add(offset).cast());
        let vb = _mm512_loadu_si512(b.as_ptr().add(offset).cast());
        and_acc = _mm512_add_epi64(and_acc, _mm512_popcnt_epi64(_mm512_and_si512(va, vb)));
        or_acc = _mm512_add_epi64(or_acc, _mm512_popcnt_epi64(_mm512_or_si512(va, vb)));
        offset += BLOCK;
    }

    // Both running totals continue into the tail.
    let and_count = seed_and.wrapping_add(_mm512_reduce_add_epi64(and_acc) as u64);
    let or_count = _mm512_reduce_add_epi64(or_acc) as u64;
    let (and_count, or_count) =
        scalar::jaccard_accumulate(&a[blocks..], &b[blocks..], and_count, or_count);
    scalar::jaccard_finish(and_count, or_count)
}
