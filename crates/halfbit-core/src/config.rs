//! Kernel dispatch configuration.
//!
//! Sources are layered with `figment`, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. `halfbit.toml` in the working directory, if present
//! 3. `HALFBIT_*` environment variables (e.g. `HALFBIT_DISPATCH=portable`)
//!
//! ```toml
//! # halfbit.toml
//! dispatch = "portable"
//! ```

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::kernels::{capability, CapabilitySet};

/// Configuration file read by [`KernelConfig::load`].
pub const CONFIG_FILE: &str = "halfbit.toml";

/// Prefix of the environment variables read by [`KernelConfig::load`].
pub const ENV_PREFIX: &str = "HALFBIT_";

/// How kernel implementations are chosen at initialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Bind vectorized kernels wherever the processor supports them.
    #[default]
    Auto,
    /// Bind portable kernels regardless of processor capabilities.
    Portable,
}

/// Settings consumed by [`DistanceKernels::initialize_with`].
///
/// [`DistanceKernels::initialize_with`]: crate::DistanceKernels::initialize_with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Kernel selection strategy.
    pub dispatch: DispatchMode,
}

impl KernelConfig {
    /// Configuration that always binds portable kernels.
    #[must_use]
    pub const fn portable() -> Self {
        Self {
            dispatch: DispatchMode::Portable,
        }
    }

    /// Returns the default provider chain (defaults, file, environment).
    #[must_use]
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Loads the configuration from the default provider chain.
    pub fn load() -> Result<Self> {
        Self::from_figment(&Self::figment())
    }

    /// Extracts the configuration from a caller-assembled figment.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }

    /// Capabilities the registry may bind against under this configuration.
    pub(crate) fn capabilities(&self) -> CapabilitySet {
        match self.dispatch {
            DispatchMode::Auto => capability::detect(),
            DispatchMode::Portable => CapabilitySet::none(),
        }
    }
}
