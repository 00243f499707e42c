//! Kriging estimators.
//!
//! Both estimators consume an observed [`SpatialPoints`] set, a fitted
//! [`TheoreticalVariogram`] and a target point set, and return the
//! per-target estimate and estimation variance. Each call assembles and
//! solves its own dense covariance system; nothing is cached or mutated
//! between calls.
//!
//! [`SpatialPoints`]: crate::spatial::SpatialPoints
//! [`TheoreticalVariogram`]: crate::variography::theoretical::TheoreticalVariogram

pub mod ordinary;
pub mod simple;

pub use ordinary::OrdinaryKriging;
pub use simple::SimpleKriging;

use mathru::statistics::distrib::{Continuous, Normal};

use crate::error::{Error, Result};

/// Per-target kriging output.
#[derive(Debug, Clone, PartialEq)]
pub struct KrigingEstimate {
    pub estimate: Vec<f64>,
    pub variance: Vec<f64>,
}

impl KrigingEstimate {
    /// Gaussian percentile of the kriged field, see [`percentile`].
    pub fn percentile(&self, p: f64) -> Result<Vec<f64>> {
        percentile(&self.estimate, &self.variance, p)
    }
}

/// Gaussian percentile of a kriged field:
/// `estimate + quantile(p) * sqrt(variance)` per target.
///
/// `p = 0.5` reproduces the estimate exactly. `p` must lie strictly
/// inside (0, 1).
pub fn percentile(estimate: &[f64], variance: &[f64], p: f64) -> Result<Vec<f64>> {
    if estimate.len() != variance.len() {
        return Err(Error::DimensionMismatch {
            what: "variance values",
            expected: estimate.len(),
            found: variance.len(),
        });
    }
    let z = standard_normal_quantile(p)?;
    Ok(estimate
        .iter()
        .zip(variance.iter())
        .map(|(&e, &v)| e + z * v.sqrt())
        .collect())
}

/// Standard-normal quantile, defined for p strictly inside (0, 1).
pub(crate) fn standard_normal_quantile(p: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(Error::Configuration(format!(
            "percentile must lie strictly inside (0, 1), got {p}"
        )));
    }
    let standard: Normal<f64> = Normal::new(0.0, 1.0);
    Ok(standard.quantile(p))
}
