//! Error types for probabilistic input models and test functions.

use thiserror::Error;

/// Errors raised by marginals, probabilistic inputs, and test functions.
///
/// Every public operation validates its arguments before touching any
/// state, so an `Err` always leaves the receiver unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Distribution or function parameters violate their constraints.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The distribution name is not one of the supported kinds.
    #[error("unsupported distribution '{0}'")]
    UnsupportedDistribution(String),

    /// A probability argument lies outside `[0, 1]`.
    #[error("probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),

    /// Interval bounds are not strictly increasing.
    #[error("invalid bounds: lower {lower} must be smaller than upper {upper}")]
    InvalidBounds { lower: f64, upper: f64 },

    /// A sample value lies outside its admissible interval.
    #[error("value {value} at row {row}, column {column} is outside [{lower}, {upper}]")]
    OutOfDomain {
        row: usize,
        column: usize,
        value: f64,
        lower: f64,
        upper: f64,
    },

    /// Matrix width does not match the expected number of dimensions.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Coarse classification of [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidParameter,
    Domain,
    DimensionMismatch,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidParameter(_) | Error::UnsupportedDistribution(_) => {
                ErrorKind::InvalidParameter
            }
            Error::ProbabilityOutOfRange(_)
            | Error::InvalidBounds { .. }
            | Error::OutOfDomain { .. } => ErrorKind::Domain,
            Error::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
