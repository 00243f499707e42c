//! Experimental variogram computation under anisotropic search
//! constraints.
//!
//! Pairs are binned by separation distance around regularly spaced lag
//! centers; an optional directional search cone (azimuth, angular
//! tolerance, bandwidth cap) restricts which pairs qualify. Bins with no
//! qualifying pairs report NaN rather than failing, so gapped curves
//! survive to the fitting stage.
//!
//! Directional calculations are carried in the map plane only: azimuth is
//! zero towards +x and grows counterclockwise, range (-pi, pi].

use ndarray::Array2;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::spatial::SpatialPoints;

/// Search geometry for experimental variogram computation.
///
/// Defaults are omnidirectional: azimuth 0, angular tolerance pi,
/// unbounded bandwidth, lag tolerance of half the lag spacing.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentalParams {
    lag_distance: f64,
    lag_tolerance: f64,
    outbound: f64,
    azimuth: f64,
    azimuth_tolerance: f64,
    bandwidth: f64,
}

impl ExperimentalParams {
    pub fn new(lag_distance: f64, outbound: f64) -> Result<Self> {
        if !lag_distance.is_finite() || lag_distance <= 0.0 {
            return Err(Error::Configuration(format!(
                "lag distance must be finite and positive, got {lag_distance}"
            )));
        }
        if !outbound.is_finite() {
            return Err(Error::Configuration(format!(
                "outbound must be finite, got {outbound}"
            )));
        }
        Ok(Self {
            lag_distance,
            lag_tolerance: lag_distance / 2.0,
            outbound,
            azimuth: 0.0,
            azimuth_tolerance: std::f64::consts::PI,
            bandwidth: f64::INFINITY,
        })
    }

    pub fn with_lag_tolerance(mut self, lag_tolerance: f64) -> Result<Self> {
        if !lag_tolerance.is_finite() || lag_tolerance <= 0.0 {
            return Err(Error::Configuration(format!(
                "lag tolerance must be finite and positive, got {lag_tolerance}"
            )));
        }
        self.lag_tolerance = lag_tolerance;
        Ok(self)
    }

    /// Search direction in radians, zero towards +x, counterclockwise.
    pub fn with_azimuth(mut self, azimuth: f64) -> Self {
        self.azimuth = azimuth;
        self
    }

    pub fn with_azimuth_tolerance(mut self, azimuth_tolerance: f64) -> Result<Self> {
        if !(azimuth_tolerance > 0.0 && azimuth_tolerance <= std::f64::consts::PI) {
            return Err(Error::Configuration(format!(
                "azimuth tolerance must lie in (0, pi], got {azimuth_tolerance}"
            )));
        }
        self.azimuth_tolerance = azimuth_tolerance;
        Ok(self)
    }

    /// Perpendicular cap on the search cone width.
    pub fn with_bandwidth(mut self, bandwidth: f64) -> Result<Self> {
        if bandwidth.is_nan() || bandwidth <= 0.0 {
            return Err(Error::Configuration(format!(
                "bandwidth must be positive, got {bandwidth}"
            )));
        }
        self.bandwidth = bandwidth;
        Ok(self)
    }

    pub fn lag_distance(&self) -> f64 {
        self.lag_distance
    }

    pub fn lag_tolerance(&self) -> f64 {
        self.lag_tolerance
    }

    pub fn outbound(&self) -> f64 {
        self.outbound
    }

    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    pub fn azimuth_tolerance(&self) -> f64 {
        self.azimuth_tolerance
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}

/// Binned experimental semivariance curve.
///
/// `semivariance[i]` is NaN where `counts[i]` is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentalVariogram {
    pub lags: Vec<f64>,
    pub semivariance: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Ordered lag-bin centers: `lag_distance, 2*lag_distance, ...` up to the
/// last center within half a lag spacing of `outbound`.
///
/// Empty when `outbound < lag_distance`.
pub fn bins(params: &ExperimentalParams) -> Vec<f64> {
    if params.outbound < params.lag_distance {
        return Vec::new();
    }
    let stop = params.outbound + params.lag_distance / 2.0;
    let mut centers = Vec::new();
    let mut i = 1usize;
    loop {
        let h = i as f64 * params.lag_distance;
        if h >= stop {
            break;
        }
        centers.push(h);
        i += 1;
    }
    centers
}

/// Pair qualification under the directional search cone.
///
/// A pair qualifies when its angular deviation from the search azimuth is
/// within tolerance and the perpendicular offset `sin(deviation) *
/// distance` stays within half the bandwidth. One-dimensional data has no
/// azimuth; every pair qualifies.
pub fn directional_mask(
    points: &SpatialPoints,
    params: &ExperimentalParams,
) -> Result<Array2<bool>> {
    let n = points.len();
    if points.y().is_none() {
        return Ok(Array2::from_elem((n, n), true));
    }

    let azimuth = points.azimuth_matrix()?;
    let dist = points.distance_matrix();

    Ok(Array2::from_shape_fn((n, n), |(i, j)| {
        let deviation = (azimuth[[i, j]] - params.azimuth).abs();
        deviation <= params.azimuth_tolerance
            && deviation.sin() * dist[[i, j]] <= params.bandwidth / 2.0
    }))
}

/// Experimental semivariance per lag bin.
///
/// For each bin center h the qualifying pairs satisfy
/// `|distance - h| <= lag_tolerance`, pass the directional mask, and have
/// nonzero separation. The bin value is `sum((v_i - v_j)^2) / (2 * count)`
/// over the full ordered-pair matrices, NaN when no pair qualifies.
pub fn experimental(
    points: &SpatialPoints,
    params: &ExperimentalParams,
) -> Result<ExperimentalVariogram> {
    let lags = bins(params);
    let dist = points.distance_matrix();
    let mask = directional_mask(points, params)?;
    let delta = points.delta_matrix();

    let accumulated: Vec<(f64, usize)> = lags
        .par_iter()
        .map(|&h| {
            let mut sum = 0.0;
            let mut count = 0usize;
            for ((&d, &admissible), &dv) in dist.iter().zip(mask.iter()).zip(delta.iter()) {
                if admissible && d > 0.0 && (d - h).abs() <= params.lag_tolerance {
                    sum += dv * dv;
                    count += 1;
                }
            }
            (sum, count)
        })
        .collect();

    let mut semivariance = Vec::with_capacity(lags.len());
    let mut counts = Vec::with_capacity(lags.len());
    for (sum, count) in accumulated {
        if count == 0 {
            semivariance.push(f64::NAN);
        } else {
            semivariance.push(sum / (2.0 * count as f64));
        }
        counts.push(count);
    }

    Ok(ExperimentalVariogram {
        lags,
        semivariance,
        counts,
    })
}

/// Minimum nonzero pair separation.
///
/// Errors with `EmptyResult` when every pairwise distance is zero (single
/// point, or coincident duplicates only).
pub fn isolag(points: &SpatialPoints) -> Result<f64> {
    let dist = points.distance_matrix();
    dist.iter()
        .copied()
        .filter(|&d| d > 0.0)
        .fold(None, |best: Option<f64>, d| {
            Some(best.map_or(d, |b| b.min(d)))
        })
        .ok_or_else(|| Error::EmptyResult("no nonzero pair separation".into()))
}

/// Minimum nonzero pair separation inside the directional search cone.
pub fn anisolag(points: &SpatialPoints, params: &ExperimentalParams) -> Result<f64> {
    let dist = points.distance_matrix();
    let mask = directional_mask(points, params)?;
    dist.iter()
        .zip(mask.iter())
        .filter(|&(&d, &admissible)| admissible && d > 0.0)
        .map(|(&d, _)| d)
        .fold(None, |best: Option<f64>, d| {
            Some(best.map_or(d, |b| b.min(d)))
        })
        .ok_or_else(|| {
            Error::EmptyResult("no nonzero pair separation inside the search cone".into())
        })
}

/// Data-driven default for the maximum lag: the axis extents projected on
/// the search azimuth.
pub fn outbound_for(points: &SpatialPoints, params: &ExperimentalParams) -> Result<f64> {
    if points.is_empty() {
        return Err(Error::EmptyResult("no points to bound".into()));
    }

    let extent = |axis: &[f64]| -> f64 {
        let mut max = 0.0f64;
        for (i, &a) in axis.iter().enumerate() {
            for &b in &axis[i + 1..] {
                max = max.max((a - b).abs());
            }
        }
        max
    };

    let xmax = extent(points.x());
    let ymax = points.y().map_or(0.0, extent);

    let cos = params.azimuth.cos().abs();
    let sin = params.azimuth.sin().abs();

    let xbound = if cos == 0.0 { f64::INFINITY } else { xmax / cos };
    let ybound = if sin == 0.0 { f64::INFINITY } else { ymax / sin };

    Ok(xbound.min(ybound))
}

/// Effective angular tolerance of the search cone at lag `h`.
///
/// Narrows below the nominal tolerance once the bandwidth cap binds:
/// `asin(min(sin(azimuth_tolerance), bandwidth / h))`.
pub fn azimuth_tolerance_at(params: &ExperimentalParams, h: f64) -> f64 {
    let by_angle = params.azimuth_tolerance.sin();
    let by_band = params.bandwidth / h;
    by_angle.min(by_band).asin()
}

/// Effective cone width at lag `h`: `min(bandwidth, h * sin(azimuth_tolerance))`.
pub fn bandwidth_at(params: &ExperimentalParams, h: f64) -> f64 {
    params.bandwidth.min(h * params.azimuth_tolerance.sin())
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    use super::*;

    fn line_points() -> SpatialPoints {
        SpatialPoints::new_1d(vec![1.0, 2.0, 4.0], vec![0.0, 1.0, 2.0]).unwrap()
    }

    #[test]
    fn bin_centers_step_by_lag_distance() {
        let params = ExperimentalParams::new(1.0, 4.0).unwrap();
        assert_eq!(bins(&params), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn bin_count_matches_closed_form() {
        for (lag, outbound) in [(1.0, 4.0), (2.0, 11.0), (0.5, 3.0), (3.0, 3.0)] {
            let params = ExperimentalParams::new(lag, outbound).unwrap();
            let expected = ((outbound - lag) / lag).floor() as usize + 1;
            assert_eq!(bins(&params).len(), expected, "lag {lag} outbound {outbound}");
        }
    }

    #[test]
    fn bins_empty_when_outbound_below_lag_distance() {
        let params = ExperimentalParams::new(2.0, 1.5).unwrap();
        assert!(bins(&params).is_empty());
    }

    #[test]
    fn experimental_on_a_line() {
        let params = ExperimentalParams::new(1.0, 2.0).unwrap();
        let curve = experimental(&line_points(), &params).unwrap();

        assert_eq!(curve.lags, vec![1.0, 2.0]);
        // lag 1: ordered pairs (0,1),(1,0),(1,2),(2,1): (1^2)*2 + (2^2)*2 = 10
        assert_relative_eq!(curve.semivariance[0], 10.0 / 8.0);
        assert_eq!(curve.counts[0], 4);
        // lag 2: ordered pairs (0,2),(2,0): (3^2)*2 = 18
        assert_relative_eq!(curve.semivariance[1], 18.0 / 4.0);
        assert_eq!(curve.counts[1], 2);
    }

    #[test]
    fn empty_bins_report_nan_not_error() {
        let points = SpatialPoints::new_1d(vec![1.0, 5.0], vec![0.0, 10.0]).unwrap();
        let params = ExperimentalParams::new(1.0, 3.0).unwrap();
        let curve = experimental(&points, &params).unwrap();

        assert_eq!(curve.counts, vec![0, 0, 0]);
        assert!(curve.semivariance.iter().all(|g| g.is_nan()));
    }

    #[test]
    fn omnidirectional_mask_accepts_everything() {
        let points = SpatialPoints::new_2d(
            vec![1.0, 2.0, 3.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        )
        .unwrap();
        let params = ExperimentalParams::new(1.0, 2.0).unwrap();
        let mask = directional_mask(&points, &params).unwrap();
        assert!(mask.iter().all(|&m| m));
    }

    #[test]
    fn narrow_cone_selects_aligned_pairs() {
        // one pair along +x, one along +y
        let points = SpatialPoints::new_2d(
            vec![0.0, 1.0, 2.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        )
        .unwrap();
        let params = ExperimentalParams::new(1.0, 2.0)
            .unwrap()
            .with_azimuth(0.0)
            .with_azimuth_tolerance(PI / 8.0)
            .unwrap();
        let mask = directional_mask(&points, &params).unwrap();

        // x-aligned pair qualifies, y-aligned pair does not
        assert!(mask[[1, 0]]);
        assert!(!mask[[2, 0]]);
    }

    #[test]
    fn bandwidth_cap_excludes_wide_offsets() {
        // both pairs deviate 45 degrees; the farther one breaks the cap
        let points = SpatialPoints::new_2d(
            vec![0.0, 1.0, 2.0],
            vec![0.0, 1.0, 4.0],
            vec![0.0, 1.0, 4.0],
        )
        .unwrap();
        let params = ExperimentalParams::new(1.0, 10.0)
            .unwrap()
            .with_azimuth(0.0)
            .with_bandwidth(2.5)
            .unwrap();
        let mask = directional_mask(&points, &params).unwrap();

        // perpendicular offset of (1,1) is 1.0 <= 1.25, of (4,4) is 4.0
        assert!(mask[[1, 0]]);
        assert!(!mask[[2, 0]]);
    }

    #[test]
    fn isolag_skips_zero_distances() {
        let points = SpatialPoints::new_1d(vec![1.0, 2.0, 3.0], vec![0.0, 0.0, 5.0]).unwrap();
        assert_relative_eq!(isolag(&points).unwrap(), 5.0);
    }

    #[test]
    fn isolag_on_coincident_points_is_empty_result() {
        let points = SpatialPoints::new_1d(vec![1.0, 2.0], vec![3.0, 3.0]).unwrap();
        assert!(matches!(isolag(&points), Err(Error::EmptyResult(_))));
    }

    #[test]
    fn anisolag_respects_the_cone() {
        // nearest pair sits on the y axis, outside a tight +x cone
        let points = SpatialPoints::new_2d(
            vec![0.0, 1.0, 2.0],
            vec![0.0, 0.0, 3.0],
            vec![0.0, 1.0, 0.0],
        )
        .unwrap();
        let params = ExperimentalParams::new(1.0, 5.0)
            .unwrap()
            .with_azimuth(0.0)
            .with_azimuth_tolerance(PI / 8.0)
            .unwrap();

        assert_relative_eq!(isolag(&points).unwrap(), 1.0);
        assert_relative_eq!(anisolag(&points, &params).unwrap(), 3.0);
    }

    #[test]
    fn cone_geometry_narrows_with_lag() {
        let params = ExperimentalParams::new(1.0, 10.0)
            .unwrap()
            .with_azimuth_tolerance(PI / 2.0)
            .unwrap()
            .with_bandwidth(2.0)
            .unwrap();

        // close in, the angular tolerance dominates
        assert_relative_eq!(azimuth_tolerance_at(&params, 1.0), PI / 2.0);
        assert_relative_eq!(bandwidth_at(&params, 1.0), 1.0);

        // far out, the bandwidth cap dominates
        assert_relative_eq!(azimuth_tolerance_at(&params, 10.0), 0.2f64.asin());
        assert_relative_eq!(bandwidth_at(&params, 10.0), 2.0);
    }

    #[test]
    fn outbound_follows_the_azimuth() {
        let points = SpatialPoints::new_2d(
            vec![0.0, 0.0],
            vec![0.0, 8.0],
            vec![0.0, 4.0],
        )
        .unwrap();

        let along_x = ExperimentalParams::new(1.0, 1.0).unwrap();
        assert_relative_eq!(outbound_for(&points, &along_x).unwrap(), 8.0);

        let along_y = ExperimentalParams::new(1.0, 1.0)
            .unwrap()
            .with_azimuth(PI / 2.0);
        assert_relative_eq!(outbound_for(&points, &along_y).unwrap(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn invalid_parameters_rejected() {
        assert!(ExperimentalParams::new(0.0, 5.0).is_err());
        assert!(ExperimentalParams::new(-1.0, 5.0).is_err());
        assert!(ExperimentalParams::new(1.0, 5.0)
            .unwrap()
            .with_azimuth_tolerance(0.0)
            .is_err());
        assert!(ExperimentalParams::new(1.0, 5.0)
            .unwrap()
            .with_azimuth_tolerance(4.0)
            .is_err());
        assert!(ExperimentalParams::new(1.0, 5.0)
            .unwrap()
            .with_bandwidth(-2.0)
            .is_err());
    }
}
