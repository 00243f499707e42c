//! Cell declustering for preferentially clustered sampling.
//!
//! Wells cluster where reservoirs are good; a naive sample mean is then
//! biased towards the clustered values. Cell declustering overlays a
//! regular grid, splits each occupied cell's share of the total weight
//! evenly among its points, and averages with those weights.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::spatial::SpatialPoints;

/// Cell-declustering grid: a cell size per axis and an origin offset.
///
/// Missing y/z axes on the data are treated as a single flat cell along
/// that direction, so the same grid works for 1-D, 2-D and 3-D samples.
#[derive(Debug, Clone, PartialEq)]
pub struct CellDecluster {
    cell_size: [f64; 3],
    origin: [f64; 3],
}

impl CellDecluster {
    pub fn new(cell_size: [f64; 3]) -> Result<Self> {
        if cell_size.iter().any(|&s| !(s > 0.0) || !s.is_finite()) {
            return Err(Error::Configuration(format!(
                "cell sizes must be finite and positive, got {cell_size:?}"
            )));
        }
        Ok(Self {
            cell_size,
            origin: [0.0; 3],
        })
    }

    /// Shifts the grid origin; useful for averaging out origin sensitivity.
    pub fn with_origin(mut self, origin: [f64; 3]) -> Self {
        self.origin = origin;
        self
    }

    /// Declustering weight per point.
    ///
    /// Each occupied cell receives `n / occupied_cells` total weight,
    /// split evenly among its points; weights sum to `n`.
    pub fn weights(&self, points: &SpatialPoints) -> Result<Vec<f64>> {
        if points.is_empty() {
            return Err(Error::EmptyResult("no points to decluster".into()));
        }

        let cells: Vec<[i64; 3]> = (0..points.len())
            .map(|i| self.cell_index(points, i))
            .collect();

        let mut occupancy: HashMap<[i64; 3], usize> = HashMap::new();
        for cell in &cells {
            *occupancy.entry(*cell).or_insert(0) += 1;
        }

        let constant = points.len() as f64 / occupancy.len() as f64;
        Ok(cells
            .iter()
            .map(|cell| constant / occupancy[cell] as f64)
            .collect())
    }

    /// Weight-normalized mean of the sample values.
    pub fn declustered_mean(&self, points: &SpatialPoints) -> Result<f64> {
        let weights = self.weights(points)?;
        let weighted: f64 = weights
            .iter()
            .zip(points.values().iter())
            .map(|(w, v)| w * v)
            .sum();
        Ok(weighted / weights.iter().sum::<f64>())
    }

    fn cell_index(&self, points: &SpatialPoints, i: usize) -> [i64; 3] {
        let axis = |coord: Option<f64>, size: f64, origin: f64| -> i64 {
            match coord {
                Some(c) => ((c - origin) / size).floor() as i64,
                None => 0,
            }
        };
        [
            axis(Some(points.x()[i]), self.cell_size[0], self.origin[0]),
            axis(points.y().map(|y| y[i]), self.cell_size[1], self.origin[1]),
            axis(points.z().map(|z| z[i]), self.cell_size[2], self.origin[2]),
        ]
    }
}
