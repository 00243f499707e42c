//! Error types for the estimation engine.

use thiserror::Error;

/// Errors surfaced by the geostatistics engine.
///
/// `Configuration` and `EmptyResult` are recoverable for most callers
/// (fall back to a default, skip a bin); `SingularSystem` and
/// `DimensionMismatch` are fatal for the current request.
#[derive(Error, Debug)]
pub enum Error {
    /// A model or search parameter is missing or violates an invariant.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// No data pairs qualify for the requested operation.
    #[error("empty result: {0}")]
    EmptyResult(String),

    /// The kriging linear system is singular or numerically unstable.
    #[error("singular kriging system of size {size}: {reason}")]
    SingularSystem { size: usize, reason: String },

    /// Parallel arrays disagree in length.
    #[error("dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
