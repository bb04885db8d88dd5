//! Runtime processor capability detection.

use serde::Serialize;
use std::sync::OnceLock;

/// Optional instruction groups the vectorized kernels rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct CapabilitySet {
    /// AVX + F16C + FMA: 8-lane half to float conversion.
    pub f16c: bool,
    /// AVX-512F + AVX-512 VPOPCNTDQ: 512-bit bitwise ops with vector popcount.
    pub avx512_popcnt: bool,
}

impl CapabilitySet {
    /// The empty set. Binding against it always selects portable kernels.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            f16c: false,
            avx512_popcnt: false,
        }
    }

    /// Returns `true` if no optional capability is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.f16c && !self.avx512_popcnt
    }
}

/// Cached capability set, probed once per process.
static CAPABILITIES: OnceLock<CapabilitySet> = OnceLock::new();

fn probe() -> CapabilitySet {
    #[cfg(target_arch = "x86_64")]
    let caps = CapabilitySet {
        f16c: is_x86_feature_detected!("avx")
            && is_x86_feature_detected!("f16c")
            && is_x86_feature_detected!("fma"),
        avx512_popcnt: is_x86_feature_detected!("avx512f")
            && is_x86_feature_detected!("avx512vpopcntdq"),
    };

    #[cfg(not(target_arch = "x86_64"))]
    let caps = CapabilitySet::none();

    tracing::debug!(
        f16c = caps.f16c,
        avx512_popcnt = caps.avx512_popcnt,
        "Probed processor capabilities"
    );
    caps
}

/// Returns the processor capabilities, probing them on first use.
///
/// The processor is queried at most once per process; later calls return
/// the cached set.
#[inline]
#[must_use]
pub fn detect() -> CapabilitySet {
    *CAPABILITIES.get_or_init(probe)
}
