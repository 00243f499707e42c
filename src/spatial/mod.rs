//! Spatial sample container and pairwise geometry.
//!
//! [`SpatialPoints`] holds scalar sample values measured at irregular 1-,
//! 2- or 3-dimensional locations (well picks, core plugs, map points) and
//! derives the pairwise matrices the variography and kriging machinery
//! consume. The container is immutable; matrices are computed on demand
//! and never cached.

use ndarray::Array2;

use crate::error::{Error, Result};

/// Scalar sample values with 1–3 spatial coordinate axes of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialPoints {
    values: Vec<f64>,
    x: Vec<f64>,
    y: Option<Vec<f64>>,
    z: Option<Vec<f64>>,
}

impl SpatialPoints {
    /// Samples along a single axis (e.g. depth along a wellbore).
    pub fn new_1d(values: Vec<f64>, x: Vec<f64>) -> Result<Self> {
        Self::build(values, x, None, None)
    }

    /// Samples on a map plane.
    pub fn new_2d(values: Vec<f64>, x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        Self::build(values, x, Some(y), None)
    }

    /// Samples in a volume.
    pub fn new_3d(values: Vec<f64>, x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Result<Self> {
        Self::build(values, x, Some(y), Some(z))
    }

    /// Assembles a point set from optional axes; used internally where the
    /// dimensionality is only known at run time (e.g. growing conditioning
    /// sets during sequential simulation).
    pub(crate) fn from_parts(
        values: Vec<f64>,
        x: Vec<f64>,
        y: Option<Vec<f64>>,
        z: Option<Vec<f64>>,
    ) -> Result<Self> {
        Self::build(values, x, y, z)
    }

    fn build(
        values: Vec<f64>,
        x: Vec<f64>,
        y: Option<Vec<f64>>,
        z: Option<Vec<f64>>,
    ) -> Result<Self> {
        let n = values.len();
        if x.len() != n {
            return Err(Error::DimensionMismatch {
                what: "x coordinates",
                expected: n,
                found: x.len(),
            });
        }
        if let Some(ref y) = y {
            if y.len() != n {
                return Err(Error::DimensionMismatch {
                    what: "y coordinates",
                    expected: n,
                    found: y.len(),
                });
            }
        }
        if let Some(ref z) = z {
            if z.len() != n {
                return Err(Error::DimensionMismatch {
                    what: "z coordinates",
                    expected: n,
                    found: z.len(),
                });
            }
        }
        Ok(Self { values, x, y, z })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of coordinate axes carried (1, 2 or 3).
    pub fn dims(&self) -> usize {
        1 + usize::from(self.y.is_some()) + usize::from(self.z.is_some())
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> Option<&[f64]> {
        self.y.as_deref()
    }

    pub fn z(&self) -> Option<&[f64]> {
        self.z.as_deref()
    }

    /// Arithmetic mean of the sample values.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return f64::NAN;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Pairwise value differences `v[i] - v[j]`, shape (n, n).
    pub fn delta_matrix(&self) -> Array2<f64> {
        let n = self.len();
        Array2::from_shape_fn((n, n), |(i, j)| self.values[i] - self.values[j])
    }

    /// Cross value differences `v_self[i] - v_other[j]`, shape (n_self, n_other).
    pub fn delta_matrix_to(&self, other: &SpatialPoints) -> Array2<f64> {
        Array2::from_shape_fn((self.len(), other.len()), |(i, j)| {
            self.values[i] - other.values[j]
        })
    }

    /// Pairwise Euclidean distances over the axes present, shape (n, n).
    ///
    /// Symmetric with a zero diagonal. Coincident points yield zero
    /// off-diagonal entries; consumers needing the minimum nonzero lag
    /// must exclude them (see [`crate::variography::experimental::isolag`]).
    pub fn distance_matrix(&self) -> Array2<f64> {
        let n = self.len();
        Array2::from_shape_fn((n, n), |(i, j)| self.point_distance(i, self, j))
    }

    /// Cross distances to `other`, shape (n_self, n_other).
    ///
    /// `other` must carry the same coordinate axes as `self`.
    pub fn distance_matrix_to(&self, other: &SpatialPoints) -> Result<Array2<f64>> {
        if self.dims() != other.dims() {
            return Err(Error::DimensionMismatch {
                what: "coordinate axes",
                expected: self.dims(),
                found: other.dims(),
            });
        }
        Ok(Array2::from_shape_fn(
            (self.len(), other.len()),
            |(i, j)| self.point_distance(i, other, j),
        ))
    }

    /// Pairwise azimuths `atan2(dy, dx)` in (-pi, pi], shape (n, n).
    ///
    /// Requires a y axis; the z axis, when present, is ignored. The
    /// matrix is antisymmetric up to 2*pi.
    pub fn azimuth_matrix(&self) -> Result<Array2<f64>> {
        self.azimuth_matrix_to(self)
    }

    /// Cross azimuths from `other` towards `self`, shape (n_self, n_other).
    pub fn azimuth_matrix_to(&self, other: &SpatialPoints) -> Result<Array2<f64>> {
        let (sy, oy) = match (&self.y, &other.y) {
            (Some(sy), Some(oy)) => (sy, oy),
            _ => {
                return Err(Error::Configuration(
                    "azimuth requires a y axis on both point sets".into(),
                ))
            }
        };
        Ok(Array2::from_shape_fn(
            (self.len(), other.len()),
            |(i, j)| {
                let dx = self.x[i] - other.x[j];
                let dy = sy[i] - oy[j];
                dy.atan2(dx)
            },
        ))
    }

    fn point_distance(&self, i: usize, other: &SpatialPoints, j: usize) -> f64 {
        let dx = self.x[i] - other.x[j];
        let dy = match (&self.y, &other.y) {
            (Some(sy), Some(oy)) => sy[i] - oy[j],
            _ => 0.0,
        };
        let dz = match (&self.z, &other.z) {
            (Some(sz), Some(oz)) => sz[i] - oz[j],
            _ => 0.0,
        };
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}
