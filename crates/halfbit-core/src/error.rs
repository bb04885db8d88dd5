//! Error types for halfbit-core.
//!
//! Every fallible operation validates its inputs before touching the data,
//! so an `Err` never comes with a partial result.

use thiserror::Error;

/// Errors raised by the codec, the kernel registry and the vector operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid buffer, dimension or range argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A value cannot be represented as a half-precision float.
    #[error("Numeric value out of range: {0}")]
    NumericRange(String),

    /// Input for which the requested metric is undefined (e.g. zero-norm cosine).
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// A kernel was invoked before the registry was initialized.
    #[error("Distance kernels not initialized, call initialize() first")]
    Uninitialized,

    /// Two vectors passed to a vector-level operation differ in dimension.
    #[error("Dimension mismatch: {left} vs {right}")]
    DimensionMismatch {
        /// Dimension of the left operand.
        left: usize,
        /// Dimension of the right operand.
        right: usize,
    },

    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of [`Error`], convenient for mapping onto host error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::InvalidArgument`].
    InvalidArgument,
    /// See [`Error::NumericRange`].
    NumericRange,
    /// See [`Error::DegenerateInput`].
    DegenerateInput,
    /// See [`Error::Uninitialized`].
    Uninitialized,
    /// See [`Error::DimensionMismatch`].
    DimensionMismatch,
    /// See [`Error::Config`].
    Config,
}

impl Error {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NumericRange(_) => ErrorKind::NumericRange,
            Self::DegenerateInput(_) => ErrorKind::DegenerateInput,
            Self::Uninitialized => ErrorKind::Uninitialized,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for halfbit operations.
pub type Result<T> = std::result::Result<T, Error>;
