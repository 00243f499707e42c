//! Heterogeneity coefficients for layered permeability data.
//!
//! Dykstra-Parson and Lorenz coefficients summarize how unevenly flow
//! capacity is distributed across reservoir layers: both are zero for a
//! homogeneous stack and approach one for a hypothetical infinitely
//! heterogeneous one. The two are not equal in general.
//!
//! These operate on plain layer series, not spatial fields, and are
//! independent of the variogram/kriging pipeline.

use std::cmp::Ordering;

use itertools::izip;
use mathru::statistics::distrib::{Continuous, Normal};

use crate::error::{Error, Result};

/// Layered permeability series with optional porosity and thickness.
///
/// Layers are taken equiprobable when thickness is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Heterogeneity {
    permeability: Vec<f64>,
    porosity: Option<Vec<f64>>,
    thickness: Option<Vec<f64>>,
}

/// Dykstra-Parson regression detail: log10 permeability against normal
/// quantiles of the cumulative flow-capacity probability.
#[derive(Debug, Clone, PartialEq)]
pub struct DykstraParsonFit {
    /// Normal quantiles per layer, ascending permeability order.
    pub quantiles: Vec<f64>,
    /// Log10 permeability per layer, same order.
    pub log_permeability: Vec<f64>,
    pub slope: f64,
    pub intercept: f64,
    pub coefficient: f64,
}

/// Lorenz flow-capacity vs storage-capacity curve with its coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct LorenzCurve {
    /// Cumulative flow fraction, leading zero included.
    pub flow_fraction: Vec<f64>,
    /// Cumulative storage fraction, leading zero included.
    pub storage_fraction: Vec<f64>,
    pub coefficient: f64,
}

impl Heterogeneity {
    /// Permeability must be non-empty and strictly positive (the
    /// Dykstra-Parson regression runs on log10 permeability).
    pub fn new(permeability: Vec<f64>) -> Result<Self> {
        if permeability.is_empty() {
            return Err(Error::EmptyResult("no layers supplied".into()));
        }
        if permeability.iter().any(|&k| !(k > 0.0) || !k.is_finite()) {
            return Err(Error::Configuration(
                "permeability values must be finite and strictly positive".into(),
            ));
        }
        Ok(Self {
            permeability,
            porosity: None,
            thickness: None,
        })
    }

    pub fn with_porosity(mut self, porosity: Vec<f64>) -> Result<Self> {
        if porosity.len() != self.permeability.len() {
            return Err(Error::DimensionMismatch {
                what: "porosity values",
                expected: self.permeability.len(),
                found: porosity.len(),
            });
        }
        self.porosity = Some(porosity);
        Ok(self)
    }

    pub fn with_thickness(mut self, thickness: Vec<f64>) -> Result<Self> {
        if thickness.len() != self.permeability.len() {
            return Err(Error::DimensionMismatch {
                what: "thickness values",
                expected: self.permeability.len(),
                found: thickness.len(),
            });
        }
        if thickness.iter().any(|&t| !(t > 0.0) || !t.is_finite()) {
            return Err(Error::Configuration(
                "thickness values must be finite and strictly positive".into(),
            ));
        }
        self.thickness = Some(thickness);
        Ok(self)
    }

    pub fn mean(&self) -> f64 {
        self.permeability.iter().sum::<f64>() / self.permeability.len() as f64
    }

    /// Population variance of the permeability series.
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.permeability
            .iter()
            .map(|&k| (k - mean) * (k - mean))
            .sum::<f64>()
            / self.permeability.len() as f64
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Coefficient of variation: standard deviation over mean.
    pub fn variation_coefficient(&self) -> f64 {
        self.std_dev() / self.mean()
    }

    /// Dykstra-Parson coefficient `(k50 - k15.9) / k50`.
    pub fn dykstra_parson(&self) -> Result<f64> {
        self.dykstra_parson_fit().map(|fit| fit.coefficient)
    }

    /// Full Dykstra-Parson regression.
    ///
    /// Layers sort by ascending permeability; each carries the midpoint
    /// cumulative thickness probability, transformed through the normal
    /// quantile. `log10(k)` regresses linearly on the quantiles and the
    /// coefficient comes from the fitted k50 and k15.9.
    pub fn dykstra_parson_fit(&self) -> Result<DykstraParsonFit> {
        let order = self.ascending_permeability();
        let thickness = self.resolved_thickness();
        let total: f64 = order.iter().map(|&i| thickness[i]).sum();

        let standard: Normal<f64> = Normal::new(0.0, 1.0);

        let mut quantiles = Vec::with_capacity(order.len());
        let mut log_permeability = Vec::with_capacity(order.len());
        let mut cumulative = 0.0;
        for &i in &order {
            let p = thickness[i] / total;
            cumulative += p;
            // midpoint-of-bin convention keeps probabilities inside (0, 1)
            quantiles.push(standard.quantile(cumulative - p / 2.0));
            log_permeability.push(self.permeability[i].log10());
        }

        let (slope, intercept) = linear_fit(&quantiles, &log_permeability);

        let k50 = 10f64.powf(slope * standard.quantile(0.5) + intercept);
        let k15_9 = 10f64.powf(slope * standard.quantile(0.159) + intercept);
        let coefficient = (k50 - k15_9) / k50;

        Ok(DykstraParsonFit {
            quantiles,
            log_permeability,
            slope,
            intercept,
            coefficient,
        })
    }

    /// Lorenz coefficient `(area - 0.5) / 0.5`.
    pub fn lorenz(&self) -> Result<f64> {
        self.lorenz_curve().map(|curve| curve.coefficient)
    }

    /// Full Lorenz curve.
    ///
    /// Layers sort by descending permeability; cumulative flow capacity
    /// (`k * h`) is plotted against cumulative storage capacity
    /// (`phi * h`), both normalized and prefixed with zero, and the
    /// coefficient measures the trapezoidal area above the equality line.
    pub fn lorenz_curve(&self) -> Result<LorenzCurve> {
        let porosity = self.porosity.as_ref().ok_or_else(|| {
            Error::Configuration("Lorenz coefficient requires porosity".into())
        })?;

        let mut order = self.ascending_permeability();
        order.reverse();
        let thickness = self.resolved_thickness();

        let mut flow = Vec::with_capacity(order.len());
        let mut storage = Vec::with_capacity(order.len());
        for &i in &order {
            flow.push(self.permeability[i] * thickness[i]);
            storage.push(porosity[i] * thickness[i]);
        }

        let flow_total: f64 = flow.iter().sum();
        let storage_total: f64 = storage.iter().sum();
        if storage_total <= 0.0 {
            return Err(Error::Configuration(
                "total storage capacity must be positive".into(),
            ));
        }

        let mut flow_fraction = Vec::with_capacity(order.len() + 1);
        let mut storage_fraction = Vec::with_capacity(order.len() + 1);
        flow_fraction.push(0.0);
        storage_fraction.push(0.0);
        let mut flow_cum = 0.0;
        let mut storage_cum = 0.0;
        for (f, s) in flow.iter().zip(storage.iter()) {
            flow_cum += f;
            storage_cum += s;
            flow_fraction.push(flow_cum / flow_total);
            storage_fraction.push(storage_cum / storage_total);
        }

        let mut area = 0.0;
        for (s0, s1, f0, f1) in izip!(
            &storage_fraction,
            &storage_fraction[1..],
            &flow_fraction,
            &flow_fraction[1..]
        ) {
            area += (s1 - s0) * (f0 + f1) / 2.0;
        }

        Ok(LorenzCurve {
            flow_fraction,
            storage_fraction,
            coefficient: (area - 0.5) / 0.5,
        })
    }

    fn ascending_permeability(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.permeability.len()).collect();
        order.sort_by(|&a, &b| {
            self.permeability[a]
                .partial_cmp(&self.permeability[b])
                .unwrap_or(Ordering::Equal)
        });
        order
    }

    fn resolved_thickness(&self) -> Vec<f64> {
        self.thickness
            .clone()
            .unwrap_or_else(|| vec![1.0; self.permeability.len()])
    }
}

/// Ordinary least squares y = slope * x + intercept; a degenerate x
/// spread yields slope zero.
fn linear_fit(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        sxx += (xi - x_mean) * (xi - x_mean);
        sxy += (xi - x_mean) * (yi - y_mean);
    }

    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    (slope, y_mean - slope * x_mean)
}
