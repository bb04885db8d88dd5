//! Fuzz target for the half codec and the distance kernels.
//!
//! Raw half bit patterns reach every kernel unfiltered, so NaN, infinity
//! and subnormal lanes are all exercised. Bit kernels must agree exactly
//! between the portable and dispatched registries.
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_kernels
//! ```

#![no_main]

use arbitrary::Arbitrary;
use halfbit_core::{decode_half, encode_half, DistanceKernels, Half, KernelConfig, MAX_DIM};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct KernelInput {
    half_a: Vec<u16>,
    half_b: Vec<u16>,
    bits_a: Vec<u8>,
    bits_b: Vec<u8>,
    seed: u64,
    value: f32,
}

fuzz_target!(|input: KernelInput| {
    let portable = DistanceKernels::new();
    portable.initialize_with(&KernelConfig::portable());
    let auto = DistanceKernels::new();
    auto.initialize();

    // Codec: never panics, and normal halves survive decode/encode
    let _ = encode_half(input.value);
    for &bits in &input.half_a {
        let h = Half::from_bits(bits);
        if h.is_finite() && !h.is_subnormal() {
            assert_eq!(encode_half(decode_half(h)).to_bits(), bits);
        }
    }

    let dim = input.half_a.len().min(input.half_b.len()).min(MAX_DIM);
    let a: Vec<Half> = input.half_a.iter().take(dim).map(|&b| Half::from_bits(b)).collect();
    let b: Vec<Half> = input.half_b.iter().take(dim).map(|&b| Half::from_bits(b)).collect();
    for kernels in [&portable, &auto] {
        let _ = kernels.squared_euclidean_distance(dim, &a, &b);
        let _ = kernels.inner_product(dim, &a, &b);
        let _ = kernels.cosine_similarity(dim, &a, &b);
        let _ = kernels.l1_distance(dim, &a, &b);
    }

    let bytes = input.bits_a.len().min(input.bits_b.len());
    let (x, y) = (&input.bits_a[..bytes], &input.bits_b[..bytes]);
    assert_eq!(
        portable.hamming_distance(bytes, x, y, input.seed),
        auto.hamming_distance(bytes, x, y, input.seed)
    );
    assert_eq!(
        portable.jaccard_distance(bytes, x, y, 0, 0, 0),
        auto.jaccard_distance(bytes, x, y, 0, 0, 0)
    );
});
