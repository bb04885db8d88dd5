//! Portable vs. dispatched kernel comparison on deterministic data.

#![allow(clippy::cast_precision_loss)]

use halfbit_core::{encode_half, DistanceKernels, Half, KernelConfig, KernelStrategies};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Allowed relative difference for the half kernels.
pub const HALF_TOLERANCE: f64 = 1e-4;

/// Inputs of a self-check run.
#[derive(Debug, Clone, Copy)]
pub struct SelfCheckOptions {
    pub dim: usize,
    pub bytes: usize,
    pub seed: u64,
}

/// One kernel evaluated by both registries.
#[derive(Debug, Clone, Serialize)]
pub struct KernelComparison {
    pub kernel: &'static str,
    pub portable: f64,
    pub dispatched: f64,
    pub relative_difference: f64,
    pub tolerance: f64,
    pub passed: bool,
}

impl KernelComparison {
    fn new(kernel: &'static str, portable: f64, dispatched: f64, tolerance: f64) -> Self {
        let relative_difference = (dispatched - portable).abs() / portable.abs().max(1.0);
        Self {
            kernel,
            portable,
            dispatched,
            relative_difference,
            tolerance,
            passed: relative_difference <= tolerance,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelfCheckReport {
    pub dim: usize,
    pub bytes: usize,
    pub seed: u64,
    pub strategies: KernelStrategies,
    pub comparisons: Vec<KernelComparison>,
}

impl SelfCheckReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.comparisons.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &KernelComparison> {
        self.comparisons.iter().filter(|c| !c.passed)
    }
}

fn random_halves(rng: &mut StdRng, dim: usize) -> Vec<Half> {
    (0..dim)
        .map(|_| encode_half(rng.gen_range(-1.0f32..1.0)))
        .collect()
}

fn random_bytes(rng: &mut StdRng, bytes: usize) -> Vec<u8> {
    (0..bytes).map(|_| rng.gen()).collect()
}

/// Runs every kernel through a portable registry and one bound under `config`.
pub fn run(options: SelfCheckOptions, config: &KernelConfig) -> halfbit_core::Result<SelfCheckReport> {
    let portable = DistanceKernels::new();
    portable.initialize_with(&KernelConfig::portable());
    let dispatched = DistanceKernels::new();
    dispatched.initialize_with(config);

    let mut rng = StdRng::seed_from_u64(options.seed);
    let a = random_halves(&mut rng, options.dim);
    let b = random_halves(&mut rng, options.dim);
    let x = random_bytes(&mut rng, options.bytes);
    let y = random_bytes(&mut rng, options.bytes);
    let dim = options.dim;
    let bytes = options.bytes;

    let comparisons = vec![
        KernelComparison::new(
            "squared_euclidean_distance",
            f64::from(portable.squared_euclidean_distance(dim, &a, &b)?),
            f64::from(dispatched.squared_euclidean_distance(dim, &a, &b)?),
            HALF_TOLERANCE,
        ),
        KernelComparison::new(
            "inner_product",
            f64::from(portable.inner_product(dim, &a, &b)?),
            f64::from(dispatched.inner_product(dim, &a, &b)?),
            HALF_TOLERANCE,
        ),
        KernelComparison::new(
            "cosine_similarity",
            portable.cosine_similarity(dim, &a, &b)?,
            dispatched.cosine_similarity(dim, &a, &b)?,
            HALF_TOLERANCE,
        ),
        KernelComparison::new(
            "l1_distance",
            f64::from(portable.l1_distance(dim, &a, &b)?),
            f64::from(dispatched.l1_distance(dim, &a, &b)?),
            HALF_TOLERANCE,
        ),
        KernelComparison::new(
            "hamming_distance",
            portable.hamming_distance(bytes, &x, &y, 0)? as f64,
            dispatched.hamming_distance(bytes, &x, &y, 0)? as f64,
            0.0,
        ),
        KernelComparison::new(
            "jaccard_distance",
            portable.jaccard_distance(bytes, &x, &y, 0, 0, 0)?,
            dispatched.jaccard_distance(bytes, &x, &y, 0, 0, 0)?,
            0.0,
        ),
    ];

    Ok(SelfCheckReport {
        dim,
        bytes,
        seed: options.seed,
        strategies: dispatched.strategies()?,
        comparisons,
    })
}
