//! Variogram machinery: experimental (sample) curves and theoretical
//! (model) covariance functions.
//!
//! The two halves are deliberately independent configuration records:
//! [`experimental::ExperimentalParams`] describes search geometry over the
//! data, [`theoretical::TheoreticalVariogram`] describes the fitted
//! covariance shape consumed by kriging.

pub mod experimental;
pub mod theoretical;

pub use experimental::{ExperimentalParams, ExperimentalVariogram};
pub use theoretical::{ModelKind, TheoreticalVariogram};
