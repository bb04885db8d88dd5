//! Property-based tests for the distance kernels.
//!
//! Every property runs against both a portable registry and an auto
//! registry, and the two are compared against each other over dimensions
//! that straddle the lane and block widths.

#![allow(
    clippy::float_cmp,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

use proptest::{
    collection::vec,
    prelude::{any, prop_assert, prop_assert_eq, prop_assume, prop_oneof, Just, Strategy},
    proptest,
    test_runner::{Config as ProptestConfig, FileFailurePersistence},
};
use halfbit_core::{decode_half, encode_half, DistanceKernels, Half, KernelConfig};

const KERNEL_PROP_CASES: u32 = 256;
const KERNEL_PROP_MAX_SHRINK_ITERS: u32 = 2048;

// Vectorized and portable sums differ only in order
const AGREEMENT_TOLERANCE: f64 = 1.0e-4;
const COSINE_BOUND_EPSILON: f64 = 1.0e-5;

fn registries() -> [DistanceKernels; 2] {
    let auto = DistanceKernels::new();
    auto.initialize();
    let portable = DistanceKernels::new();
    portable.initialize_with(&KernelConfig::portable());
    [auto, portable]
}

fn dimension_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![
        Just(1_usize),
        Just(3_usize),
        Just(7_usize),
        Just(8_usize),
        Just(9_usize),
        Just(11_usize),
        Just(16_usize),
        Just(17_usize),
        Just(63_usize),
        Just(64_usize),
        Just(65_usize),
        1_usize..=1100,
    ]
}

fn half_pair_strategy() -> impl Strategy<Value = (Vec<Half>, Vec<Half>)> {
    dimension_strategy().prop_flat_map(|dim| {
        let a = vec(-100.0_f32..100.0_f32, dim);
        let b = vec(-100.0_f32..100.0_f32, dim);
        (a, b).prop_map(|(a, b)| {
            (
                a.into_iter().map(encode_half).collect::<Vec<Half>>(),
                b.into_iter().map(encode_half).collect::<Vec<Half>>(),
            )
        })
    })
}

fn byte_len_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![
        Just(0_usize),
        Just(1_usize),
        Just(7_usize),
        Just(8_usize),
        Just(9_usize),
        Just(63_usize),
        Just(64_usize),
        Just(65_usize),
        Just(128_usize),
        Just(141_usize),
        0_usize..=600,
    ]
}

fn byte_pair_strategy() -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
    byte_len_strategy().prop_flat_map(|len| (vec(any::<u8>(), len), vec(any::<u8>(), len)))
}

fn byte_triple_strategy() -> impl Strategy<Value = (Vec<u8>, Vec<u8>, Vec<u8>)> {
    byte_len_strategy()
        .prop_flat_map(|len| (vec(any::<u8>(), len), vec(any::<u8>(), len), vec(any::<u8>(), len)))
}

fn kernel_proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: KERNEL_PROP_CASES,
        max_shrink_iters: KERNEL_PROP_MAX_SHRINK_ITERS,
        failure_persistence: Some(Box::new(FileFailurePersistence::WithSource(
            "kernel-property-regressions",
        ))),
        ..ProptestConfig::default()
    }
}

/// Sum of absolute products, the natural error scale of a dot product.
fn magnitude(a: &[Half], b: &[Half]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| f64::from(decode_half(x) * decode_half(y)).abs())
        .sum::<f64>()
        .max(1.0)
}

proptest! {
    #![proptest_config(kernel_proptest_config())]

    #[test]
    fn test_half_kernels_agree_between_strategies((a, b) in half_pair_strategy()) {
        let [auto, portable] = registries();
        let dim = a.len();
        let scale = magnitude(&a, &b);

        let pairs = [
            ("squared_l2", auto.squared_euclidean_distance(dim, &a, &b).unwrap(), portable.squared_euclidean_distance(dim, &a, &b).unwrap()),
            ("inner_product", auto.inner_product(dim, &a, &b).unwrap(), portable.inner_product(dim, &a, &b).unwrap()),
            ("l1", auto.l1_distance(dim, &a, &b).unwrap(), portable.l1_distance(dim, &a, &b).unwrap()),
        ];
        for (metric, vectorized, reference) in pairs {
            let delta = (f64::from(vectorized) - f64::from(reference)).abs();
            let allowed = AGREEMENT_TOLERANCE * scale.max(f64::from(reference).abs());
            prop_assert!(
                delta <= allowed,
                "{} mismatch dim={} vectorized={} portable={} allowed={}",
                metric, dim, vectorized, reference, allowed
            );
        }

        if let (Ok(vectorized), Ok(reference)) =
            (auto.cosine_similarity(dim, &a, &b), portable.cosine_similarity(dim, &a, &b))
        {
            prop_assert!(
                (vectorized - reference).abs() <= AGREEMENT_TOLERANCE,
                "cosine mismatch dim={} vectorized={} portable={}",
                dim, vectorized, reference
            );
        }
    }

    #[test]
    fn test_half_kernels_are_symmetric((a, b) in half_pair_strategy()) {
        let dim = a.len();
        for kernels in registries() {
            prop_assert_eq!(
                kernels.squared_euclidean_distance(dim, &a, &b).unwrap(),
                kernels.squared_euclidean_distance(dim, &b, &a).unwrap()
            );
            prop_assert_eq!(
                kernels.inner_product(dim, &a, &b).unwrap(),
                kernels.inner_product(dim, &b, &a).unwrap()
            );
            prop_assert_eq!(
                kernels.l1_distance(dim, &a, &b).unwrap(),
                kernels.l1_distance(dim, &b, &a).unwrap()
            );
        }
    }

    #[test]
    fn test_half_kernels_identity_and_bounds((a, b) in half_pair_strategy()) {
        let dim = a.len();
        for kernels in registries() {
            prop_assert_eq!(kernels.squared_euclidean_distance(dim, &a, &a).unwrap(), 0.0);
            prop_assert_eq!(kernels.l1_distance(dim, &a, &a).unwrap(), 0.0);
            prop_assert!(kernels.squared_euclidean_distance(dim, &a, &b).unwrap() >= 0.0);
            prop_assert!(kernels.l1_distance(dim, &a, &b).unwrap() >= 0.0);

            if let Ok(similarity) = kernels.cosine_similarity(dim, &a, &b) {
                prop_assert!(
                    similarity.abs() <= 1.0 + COSINE_BOUND_EPSILON,
                    "cosine out of range: {}", similarity
                );
            }
        }
    }

    #[test]
    fn test_bit_kernels_agree_between_strategies((a, b) in byte_pair_strategy(), seed in 0_u64..1_000_000) {
        let [auto, portable] = registries();
        let bytes = a.len();
        prop_assert_eq!(
            auto.hamming_distance(bytes, &a, &b, seed).unwrap(),
            portable.hamming_distance(bytes, &a, &b, seed).unwrap()
        );
        prop_assert_eq!(
            auto.jaccard_distance(bytes, &a, &b, 0, 0, 0).unwrap(),
            portable.jaccard_distance(bytes, &a, &b, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_bit_kernel_properties((a, b) in byte_pair_strategy(), seed in 0_u64..1_000_000) {
        let bytes = a.len();
        for kernels in registries() {
            prop_assert_eq!(kernels.hamming_distance(bytes, &a, &a, seed).unwrap(), seed);
            prop_assert_eq!(
                kernels.hamming_distance(bytes, &a, &b, 0).unwrap(),
                kernels.hamming_distance(bytes, &b, &a, 0).unwrap()
            );

            let jaccard = kernels.jaccard_distance(bytes, &a, &b, 0, 0, 0).unwrap();
            prop_assert!((0.0..=1.0).contains(&jaccard), "jaccard out of range: {}", jaccard);
            prop_assert_eq!(kernels.jaccard_distance(bytes, &a, &a, 0, 0, 0).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_hamming_triangle_inequality((a, b, c) in byte_triple_strategy()) {
        let [kernels, _] = registries();
        let bytes = a.len();
        let ab = kernels.hamming_distance(bytes, &a, &b, 0).unwrap();
        let bc = kernels.hamming_distance(bytes, &b, &c, 0).unwrap();
        let ac = kernels.hamming_distance(bytes, &a, &c, 0).unwrap();
        prop_assert!(ac <= ab + bc, "d(a,c)={} > d(a,b)+d(b,c)={}", ac, ab + bc);
    }

    #[test]
    fn test_codec_round_trip_within_one_ulp(value in -65504.0_f32..65504.0_f32) {
        // The encoder flushes magnitudes below the smallest normal to zero
        prop_assume!(value.abs() >= 2_f32.powi(-14));
        let back = decode_half(encode_half(value));
        let ulp = 2_f32.powi(value.abs().log2().floor() as i32 - 10);
        prop_assert!(
            (back - value).abs() <= ulp,
            "round trip of {} gave {} (ulp {})", value, back, ulp
        );
    }
}
