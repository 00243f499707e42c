//! Ordinary kriging: estimation with an unknown, locally estimated mean.
//!
//! The covariance system is augmented with a Lagrange multiplier row and
//! column enforcing the unbiasedness constraint `sum(lambda) = 1`:
//!
//! ```text
//! [ C   1 ] [ lambda ]   [ c ]
//! [ 1^T 0 ] [ beta   ] = [ 1 ]
//! ```
//!
//! The augmented matrix is symmetric but indefinite, so the solve goes
//! through LU rather than Cholesky.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::error::{Error, Result};
use crate::kriging::KrigingEstimate;
use crate::spatial::SpatialPoints;
use crate::variography::theoretical::TheoreticalVariogram;

/// Ordinary kriging estimator.
#[derive(Debug, Clone)]
pub struct OrdinaryKriging {
    observed: SpatialPoints,
    model: TheoreticalVariogram,
}

impl OrdinaryKriging {
    pub fn new(observed: SpatialPoints, model: TheoreticalVariogram) -> Self {
        Self { observed, model }
    }

    /// Kriging weights (n_observed, n_targets) and the Lagrange
    /// multiplier per target. Every weight column sums to one.
    pub fn weights(&self, targets: &SpatialPoints) -> Result<(DMatrix<f64>, DVector<f64>)> {
        self.solve(targets)
            .map(|(weights, multiplier, _)| (weights, multiplier))
    }

    /// Estimate and estimation variance at every target point.
    pub fn estimate(&self, targets: &SpatialPoints) -> Result<KrigingEstimate> {
        let (weights, multiplier, cross_cov) = self.solve(targets)?;

        let n = self.observed.len();
        let values = self.observed.values();
        let sill = self.model.sill();

        let mut estimate = Vec::with_capacity(targets.len());
        let mut variance = Vec::with_capacity(targets.len());
        for k in 0..targets.len() {
            let mut est = 0.0;
            let mut var = sill - multiplier[k];
            for i in 0..n {
                est += weights[(i, k)] * values[i];
                var -= weights[(i, k)] * cross_cov[(i, k)];
            }
            estimate.push(est);
            variance.push(var.max(0.0));
        }

        Ok(KrigingEstimate { estimate, variance })
    }

    /// Solves the augmented system once for all targets; returns weights,
    /// Lagrange multipliers and the cross-covariance right-hand side.
    #[allow(clippy::type_complexity)]
    fn solve(
        &self,
        targets: &SpatialPoints,
    ) -> Result<(DMatrix<f64>, DVector<f64>, DMatrix<f64>)> {
        let n = self.observed.len();
        let m = targets.len();
        if n == 0 {
            return Err(Error::EmptyResult("no observed samples to krige from".into()));
        }

        let obs_dist = self.observed.distance_matrix();
        let augmented = DMatrix::from_fn(n + 1, n + 1, |i, j| {
            if i == n && j == n {
                0.0
            } else if i == n || j == n {
                1.0
            } else {
                self.model.covariance(obs_dist[[i, j]])
            }
        });

        let cross_dist = self.observed.distance_matrix_to(targets)?;
        let rhs = DMatrix::from_fn(n + 1, m, |i, k| {
            if i == n {
                1.0
            } else {
                self.model.covariance(cross_dist[[i, k]])
            }
        });

        debug!(n, m, "solving ordinary kriging system");
        let solution = augmented
            .lu()
            .solve(&rhs)
            .ok_or_else(|| Error::SingularSystem {
                size: n + 1,
                reason: "augmented covariance matrix is singular".into(),
            })?;

        let weights = solution.rows(0, n).into_owned();
        let multiplier = solution.row(n).transpose();
        let cross_cov = rhs.rows(0, n).into_owned();

        Ok((weights, multiplier, cross_cov))
    }
}
