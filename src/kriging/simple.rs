//! Simple kriging: estimation about a known mean.

use nalgebra::{Cholesky, DMatrix};
use tracing::debug;

use crate::error::{Error, Result};
use crate::kriging::KrigingEstimate;
use crate::spatial::SpatialPoints;
use crate::variography::theoretical::TheoreticalVariogram;

/// Simple kriging estimator.
///
/// Weights solve `C lambda = c` where `C` is the observed-observed
/// covariance matrix (`sill - gamma(distance)`, diagonal `sill`) and `c`
/// the observed-target cross covariance. A valid model makes `C`
/// symmetric positive definite, so the system is factored by Cholesky;
/// factorization failure (coincident observations, degenerate model) is
/// surfaced as [`Error::SingularSystem`].
#[derive(Debug, Clone)]
pub struct SimpleKriging {
    observed: SpatialPoints,
    model: TheoreticalVariogram,
    mean: f64,
}

impl SimpleKriging {
    /// A `None` mean defaults to the observed sample mean.
    pub fn new(
        observed: SpatialPoints,
        model: TheoreticalVariogram,
        mean: Option<f64>,
    ) -> Self {
        let mean = mean.unwrap_or_else(|| observed.mean());
        Self {
            observed,
            model,
            mean,
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Kriging weights per target, shape (n_observed, n_targets).
    pub fn weights(&self, targets: &SpatialPoints) -> Result<DMatrix<f64>> {
        self.solve(targets).map(|(weights, _)| weights)
    }

    /// Estimate and estimation variance at every target point.
    pub fn estimate(&self, targets: &SpatialPoints) -> Result<KrigingEstimate> {
        let (weights, cross_cov) = self.solve(targets)?;

        let n = self.observed.len();
        let values = self.observed.values();
        let sill = self.model.sill();

        let mut estimate = Vec::with_capacity(targets.len());
        let mut variance = Vec::with_capacity(targets.len());
        for k in 0..targets.len() {
            let mut est = self.mean;
            let mut var = sill;
            for i in 0..n {
                est += weights[(i, k)] * (values[i] - self.mean);
                var -= weights[(i, k)] * cross_cov[(i, k)];
            }
            estimate.push(est);
            // exact arithmetic keeps this non-negative; clamp float error
            variance.push(var.max(0.0));
        }

        Ok(KrigingEstimate { estimate, variance })
    }

    /// Solves for the weight matrix; also returns the cross-covariance
    /// right-hand side needed by the variance.
    fn solve(&self, targets: &SpatialPoints) -> Result<(DMatrix<f64>, DMatrix<f64>)> {
        let n = self.observed.len();
        let m = targets.len();
        if n == 0 {
            return Err(Error::EmptyResult("no observed samples to krige from".into()));
        }

        let obs_dist = self.observed.distance_matrix();
        let cov = DMatrix::from_fn(n, n, |i, j| self.model.covariance(obs_dist[[i, j]]));

        let cross_dist = self.observed.distance_matrix_to(targets)?;
        let cross_cov =
            DMatrix::from_fn(n, m, |i, k| self.model.covariance(cross_dist[[i, k]]));

        debug!(n, m, "solving simple kriging system");
        let factor = Cholesky::new(cov).ok_or_else(|| Error::SingularSystem {
            size: n,
            reason: "observed covariance matrix is not positive definite".into(),
        })?;

        let weights = factor.solve(&cross_cov);
        Ok((weights, cross_cov))
    }
}
