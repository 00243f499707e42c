//! Theoretical variogram models.
//!
//! A closed family of covariance-model shapes evaluated in closed form.
//! Parameters are validated at construction so evaluation is infallible.
//!
//! Convention: the semivariance at exactly zero lag is zero for every
//! model, including those with a positive nugget. The nugget appears for
//! any positive lag; callers that need the discontinuity at the origin
//! must special-case `lag == 0` themselves.

use crate::error::{Error, Result};

/// Covariance-model families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Spherical,
    Exponential,
    Gaussian,
    Power,
    Cubic,
    Cauchy,
    HoleEffect,
    DeWijs,
}

impl ModelKind {
    /// Bounded models require a range parameter.
    pub fn needs_range(self) -> bool {
        !matches!(self, ModelKind::Power | ModelKind::DeWijs)
    }

    /// Only the power model takes an exponent.
    pub fn needs_power(self) -> bool {
        matches!(self, ModelKind::Power)
    }
}

/// A fitted theoretical variogram.
///
/// `sill` is the large-lag plateau, `range` the distance at which bounded
/// models reach it, `nugget` the short-scale discontinuity. Covariance is
/// `sill - gamma(h)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TheoreticalVariogram {
    kind: ModelKind,
    sill: f64,
    nugget: f64,
    // NaN when the kind does not use them; validation guarantees they are
    // set for kinds that do.
    range: f64,
    power: f64,
}

impl TheoreticalVariogram {
    pub fn new(
        kind: ModelKind,
        sill: f64,
        range: Option<f64>,
        power: Option<f64>,
        nugget: f64,
    ) -> Result<Self> {
        if !sill.is_finite() || sill < 0.0 {
            return Err(Error::Configuration(format!(
                "sill must be finite and non-negative, got {sill}"
            )));
        }
        if !nugget.is_finite() || nugget < 0.0 || nugget > sill {
            return Err(Error::Configuration(format!(
                "nugget must satisfy 0 <= nugget <= sill, got {nugget} with sill {sill}"
            )));
        }
        let range = match (kind.needs_range(), range) {
            (true, Some(a)) if a > 0.0 && a.is_finite() => a,
            (true, Some(a)) => {
                return Err(Error::Configuration(format!(
                    "range must be finite and positive, got {a}"
                )))
            }
            (true, None) => {
                return Err(Error::Configuration(format!(
                    "{kind:?} model requires a range"
                )))
            }
            (false, _) => f64::NAN,
        };
        let power = match (kind.needs_power(), power) {
            (true, Some(p)) if p.is_finite() => p,
            (true, Some(p)) => {
                return Err(Error::Configuration(format!(
                    "power must be finite, got {p}"
                )))
            }
            (true, None) => {
                return Err(Error::Configuration(
                    "power model requires an exponent".into(),
                ))
            }
            (false, _) => f64::NAN,
        };
        Ok(Self {
            kind,
            sill,
            nugget,
            range,
            power,
        })
    }

    pub fn spherical(sill: f64, range: f64, nugget: f64) -> Result<Self> {
        Self::new(ModelKind::Spherical, sill, Some(range), None, nugget)
    }

    pub fn exponential(sill: f64, range: f64, nugget: f64) -> Result<Self> {
        Self::new(ModelKind::Exponential, sill, Some(range), None, nugget)
    }

    pub fn gaussian(sill: f64, range: f64, nugget: f64) -> Result<Self> {
        Self::new(ModelKind::Gaussian, sill, Some(range), None, nugget)
    }

    pub fn cubic(sill: f64, range: f64, nugget: f64) -> Result<Self> {
        Self::new(ModelKind::Cubic, sill, Some(range), None, nugget)
    }

    pub fn cauchy(sill: f64, range: f64, nugget: f64) -> Result<Self> {
        Self::new(ModelKind::Cauchy, sill, Some(range), None, nugget)
    }

    pub fn hole_effect(sill: f64, range: f64, nugget: f64) -> Result<Self> {
        Self::new(ModelKind::HoleEffect, sill, Some(range), None, nugget)
    }

    pub fn power(sill: f64, power: f64, nugget: f64) -> Result<Self> {
        Self::new(ModelKind::Power, sill, None, Some(power), nugget)
    }

    pub fn de_wijs(sill: f64, nugget: f64) -> Result<Self> {
        Self::new(ModelKind::DeWijs, sill, None, None, nugget)
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn sill(&self) -> f64 {
        self.sill
    }

    pub fn nugget(&self) -> f64 {
        self.nugget
    }

    /// Semivariance at lag `h`.
    pub fn gamma(&self, h: f64) -> f64 {
        if h == 0.0 {
            return 0.0;
        }
        let s = self.sill;
        let n = self.nugget;
        match self.kind {
            ModelKind::Spherical => {
                let r = h / self.range;
                if r >= 1.0 {
                    s
                } else {
                    n + (s - n) * (1.5 * r - 0.5 * r.powi(3))
                }
            }
            ModelKind::Exponential => {
                let r = h / self.range;
                n + (s - n) * (1.0 - (-3.0 * r).exp())
            }
            ModelKind::Gaussian => {
                let r = h / self.range;
                n + (s - n) * (1.0 - (-3.0 * r * r).exp())
            }
            ModelKind::Power => n + (s - n) * h.powf(self.power),
            ModelKind::Cubic => {
                let r = h / self.range;
                if r >= 1.0 {
                    s
                } else {
                    n + (s - n)
                        * (7.0 * r.powi(2) - 8.75 * r.powi(3) + 3.5 * r.powi(5)
                            - 0.75 * r.powi(7))
                }
            }
            ModelKind::Cauchy => {
                let r = h / self.range;
                n + (s - n) * (1.0 - 1.0 / (1.0 + r * r))
            }
            ModelKind::HoleEffect => {
                let r = h / self.range;
                n + (s - n) * (1.0 - r.sin() / r)
            }
            ModelKind::DeWijs => n + (s - n) * h.ln(),
        }
    }

    /// Covariance at lag `h`: `sill - gamma(h)`.
    pub fn covariance(&self, h: f64) -> f64 {
        self.sill - self.gamma(h)
    }

    /// Semivariance over a lag curve (NaN lags stay NaN).
    pub fn gamma_curve(&self, lags: &[f64]) -> Vec<f64> {
        lags.iter().map(|&h| self.gamma(h)).collect()
    }

    /// Covariance over a lag curve.
    pub fn covariance_curve(&self, lags: &[f64]) -> Vec<f64> {
        lags.iter().map(|&h| self.covariance(h)).collect()
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn spherical_hand_value() {
        let model = TheoreticalVariogram::spherical(1.0, 4.0, 0.0).unwrap();
        // r = 0.5: 1.5*0.5 - 0.5*0.125 = 0.6875
        assert_relative_eq!(model.gamma(2.0), 0.6875);
    }

    #[test]
    fn bounded_models_saturate_at_sill() {
        let spherical = TheoreticalVariogram::spherical(2.5, 10.0, 0.5).unwrap();
        let cubic = TheoreticalVariogram::cubic(2.5, 10.0, 0.5).unwrap();

        for model in [spherical, cubic] {
            assert_relative_eq!(model.gamma(10.0), 2.5);
            assert_relative_eq!(model.gamma(25.0), 2.5);
            assert_relative_eq!(model.gamma(1000.0), 2.5);
        }
    }

    #[test]
    fn zero_lag_is_zero_even_with_nugget() {
        let model = TheoreticalVariogram::exponential(2.0, 5.0, 0.4).unwrap();
        assert_eq!(model.gamma(0.0), 0.0);
        assert_eq!(model.covariance(0.0), 2.0);
        // the nugget shows up immediately off the origin
        assert!(model.gamma(1e-9) >= 0.4);
    }

    #[test]
    fn gamma_vanishes_near_origin_without_nugget() {
        for model in [
            TheoreticalVariogram::spherical(1.0, 10.0, 0.0).unwrap(),
            TheoreticalVariogram::exponential(1.0, 10.0, 0.0).unwrap(),
            TheoreticalVariogram::gaussian(1.0, 10.0, 0.0).unwrap(),
            TheoreticalVariogram::cubic(1.0, 10.0, 0.0).unwrap(),
            TheoreticalVariogram::cauchy(1.0, 10.0, 0.0).unwrap(),
            TheoreticalVariogram::hole_effect(1.0, 10.0, 0.0).unwrap(),
        ] {
            assert!(model.gamma(1e-8) < 1e-6, "{:?}", model.kind());
        }
    }

    #[test]
    fn power_model() {
        let model = TheoreticalVariogram::power(1.0, 2.0, 0.0).unwrap();
        assert_relative_eq!(model.gamma(3.0), 9.0);
        // unbounded: keeps growing past any sill
        assert!(model.gamma(100.0) > model.sill());
    }

    #[test]
    fn de_wijs_is_logarithmic() {
        let model = TheoreticalVariogram::de_wijs(1.0, 0.0).unwrap();
        assert_relative_eq!(model.gamma(std::f64::consts::E), 1.0);
    }

    #[test]
    fn missing_range_is_a_configuration_error() {
        let result =
            TheoreticalVariogram::new(ModelKind::Spherical, 1.0, None, None, 0.0);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn missing_power_is_a_configuration_error() {
        let result = TheoreticalVariogram::new(ModelKind::Power, 1.0, None, None, 0.0);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn nugget_above_sill_rejected() {
        let result = TheoreticalVariogram::spherical(1.0, 10.0, 1.5);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn curve_over_bin_centers() {
        use crate::variography::experimental::{bins, ExperimentalParams};

        let params = ExperimentalParams::new(2.0, 4.0).unwrap();
        let model = TheoreticalVariogram::spherical(1.0, 4.0, 0.0).unwrap();
        let curve = model.gamma_curve(&bins(&params));

        assert_eq!(curve.len(), 2);
        assert_relative_eq!(curve[0], 0.6875);
        assert_relative_eq!(curve[1], 1.0);
    }

    #[test]
    fn covariance_complements_gamma() {
        let model = TheoreticalVariogram::gaussian(3.0, 8.0, 0.2).unwrap();
        for h in [0.5, 1.0, 4.0, 8.0, 20.0] {
            assert_relative_eq!(model.covariance(h), 3.0 - model.gamma(h));
        }
    }
}
