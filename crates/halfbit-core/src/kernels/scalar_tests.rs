//! Tests for the portable kernels.

#![allow(clippy::float_cmp, clippy::cast_precision_loss)]

use super::scalar::{
    cosine_parts, hamming, inner_product, jaccard, jaccard_accumulate, jaccard_finish, l1,
    squared_l2, CosineParts,
};
use crate::codec::{encode_half, Half};
use crate::error::ErrorKind;

fn halves(values: &[f32]) -> Vec<Half> {
    values.iter().copied().map(encode_half).collect()
}

// ============================================================================
// Half kernels
// ============================================================================

#[test]
fn test_orthogonal_unit_vectors() {
    let a = halves(&[1.0, 0.0, 0.0]);
    let b = halves(&[0.0, 1.0, 0.0]);
    assert_eq!(squared_l2(&a, &b), 2.0);
    assert_eq!(inner_product(&a, &b), 0.0);
    assert_eq!(l1(&a, &b), 2.0);
}

#[test]
fn test_known_values() {
    let a = halves(&[1.0, 2.0, 3.0, -4.0]);
    let b = halves(&[0.5, 2.0, -1.0, 4.0]);
    // 0.25 + 0 + 16 + 64
    assert_eq!(squared_l2(&a, &b), 80.25);
    // 0.5 + 4 - 3 - 16
    assert_eq!(inner_product(&a, &b), -14.5);
    // 0.5 + 0 + 4 + 8
    assert_eq!(l1(&a, &b), 12.5);
}

#[test]
fn test_empty_slices_sum_to_zero() {
    assert_eq!(squared_l2(&[], &[]), 0.0);
    assert_eq!(inner_product(&[], &[]), 0.0);
    assert_eq!(l1(&[], &[]), 0.0);
    assert_eq!(cosine_parts(&[], &[]), CosineParts::default());
}

#[test]
fn test_cosine_parts_and_similarity() {
    let a = halves(&[3.0, 4.0]);
    let b = halves(&[4.0, 3.0]);
    let parts = cosine_parts(&a, &b);
    assert_eq!(parts.dot, 24.0);
    assert_eq!(parts.norm_a, 25.0);
    assert_eq!(parts.norm_b, 25.0);
    assert!((parts.similarity().unwrap() - 0.96).abs() < 1e-12);
}

#[test]
fn test_cosine_similarity_of_parallel_vectors_is_one() {
    let a = halves(&[1.0, 2.0, 3.0]);
    let b = halves(&[2.0, 4.0, 6.0]);
    let sim = cosine_parts(&a, &b).similarity().unwrap();
    assert!((sim - 1.0).abs() < 1e-6, "got {sim}");
}

#[test]
fn test_cosine_zero_norm_is_degenerate() {
    let zero = halves(&[0.0, 0.0, 0.0]);
    let a = halves(&[1.0, 2.0, 3.0]);
    for (x, y) in [(&zero, &a), (&a, &zero), (&zero, &zero)] {
        let err = cosine_parts(x, y).similarity().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateInput);
    }
}

#[test]
fn test_cosine_parts_merge_adds_fields() {
    let left = CosineParts {
        dot: 1.0,
        norm_a: 2.0,
        norm_b: 3.0,
    };
    let right = CosineParts {
        dot: 10.0,
        norm_a: 20.0,
        norm_b: 30.0,
    };
    let merged = left.merge(right);
    assert_eq!(merged.dot, 11.0);
    assert_eq!(merged.norm_a, 22.0);
    assert_eq!(merged.norm_b, 33.0);
}

#[test]
fn test_subnormal_inputs_contribute() {
    let tiny = Half::MIN_POSITIVE_SUBNORMAL;
    let a = [tiny, tiny];
    let b = [Half::ZERO, Half::ZERO];
    assert_eq!(l1(&a, &b), 2.0 * 2f32.powi(-24));
}

// ============================================================================
// Hamming
// ============================================================================

#[test]
fn test_hamming_identical_returns_seed() {
    let a = [0xa5u8, 0x5a, 0xff];
    assert_eq!(hamming(&a, &a, 0), 0);
    assert_eq!(hamming(&a, &a, 42), 42);
}

#[test]
fn test_hamming_disjoint_bytes() {
    assert_eq!(hamming(&[0xff, 0x00], &[0x00, 0xff], 0), 16);
}

#[test]
fn test_hamming_words_and_tail() {
    // 8-byte word plus a 3-byte tail
    let a = [0xffu8; 11];
    let mut b = [0xffu8; 11];
    b[0] = 0x00; // 8 bits in the word part
    b[10] = 0x0f; // 4 bits in the tail
    assert_eq!(hamming(&a, &b, 0), 12);
    assert_eq!(hamming(&a, &b, 100), 112);
}

#[test]
fn test_hamming_seed_wraps() {
    assert_eq!(hamming(&[0x01], &[0x00], u64::MAX), 0);
}

#[test]
fn test_hamming_empty_returns_seed() {
    assert_eq!(hamming(&[], &[], 7), 7);
}

// ============================================================================
// Jaccard
// ============================================================================

#[test]
fn test_jaccard_identical_is_zero() {
    let a = [0x12u8, 0x34, 0x56];
    assert_eq!(jaccard(&a, &a, 0), 0.0);
}

#[test]
fn test_jaccard_disjoint_is_one() {
    assert_eq!(jaccard_accumulate(&[0xff, 0x00], &[0x00, 0xff], 0, 0), (0, 16));
    assert_eq!(jaccard(&[0xff, 0x00], &[0x00, 0xff], 0), 1.0);
}

#[test]
fn test_jaccard_all_zero_is_zero_not_nan() {
    let zeros = [0u8; 4];
    let d = jaccard(&zeros, &zeros, 0);
    assert!(!d.is_nan());
    assert_eq!(d, 0.0);
    assert_eq!(jaccard(&[], &[], 0), 0.0);
}

#[test]
fn test_jaccard_half_overlap() {
    // a = 1111_0000, b = 1100_1100: and = 2, or = 6
    let d = jaccard(&[0xf0], &[0xcc], 0);
    assert!((d - (1.0 - 2.0 / 6.0)).abs() < 1e-12);
}

#[test]
fn test_jaccard_seed_feeds_intersection_only() {
    let (and_count, or_count) = jaccard_accumulate(&[0x0f], &[0x0f], 3, 0);
    assert_eq!((and_count, or_count), (7, 4));
}

#[test]
fn test_jaccard_accumulate_continues_running_counts() {
    let a = [0xffu8; 13];
    let b = [0x0fu8; 13];
    let (and_all, or_all) = jaccard_accumulate(&a, &b, 0, 0);
    let (and_head, or_head) = jaccard_accumulate(&a[..8], &b[..8], 0, 0);
    let resumed = jaccard_accumulate(&a[8..], &b[8..], and_head, or_head);
    assert_eq!(resumed, (and_all, or_all));
    assert_eq!((and_all, or_all), (52, 104));
}

#[test]
fn test_jaccard_finish() {
    assert_eq!(jaccard_finish(0, 0), 0.0);
    assert_eq!(jaccard_finish(5, 0), 0.0);
    assert_eq!(jaccard_finish(0, 16), 1.0);
    assert_eq!(jaccard_finish(8, 16), 0.5);
}
