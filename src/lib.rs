//! Geostatistical estimation for spatially sampled reservoir properties.
//!
//! Takes scalar samples (permeability, porosity, TOC, ...) measured at
//! irregular well and core locations through the classical estimation
//! pipeline:
//!
//! 1. [`spatial::SpatialPoints`] wraps the samples and derives pairwise
//!    distance/azimuth geometry.
//! 2. [`variography`] computes experimental semivariance curves under
//!    anisotropic search constraints and evaluates theoretical covariance
//!    models.
//! 3. [`kriging`] solves simple and ordinary kriging systems for
//!    estimates and estimation variances at unsampled locations.
//! 4. [`simulation`] draws stochastic realizations from the kriged field.
//!
//! [`heterogeneity`] and [`declustering`] are independent of that
//! pipeline: heterogeneity coefficients summarize layered permeability
//! series, cell declustering corrects means for clustered sampling.
//!
//! All computation is synchronous and pure over immutable inputs; dense
//! pairwise matrices make O(N^2) memory the practical bound (roughly
//! N <= 5,000 points before callers should tile).

pub mod declustering;
pub mod error;
pub mod heterogeneity;
pub mod kriging;
pub mod simulation;
pub mod spatial;
pub mod variography;

pub use error::{Error, Result};

pub mod prelude {

    pub mod re_exports {
        pub use nalgebra;
        pub use ndarray;
        pub use rand;
    }

    pub use crate::declustering::CellDecluster;
    pub use crate::error::{Error, Result};
    pub use crate::heterogeneity::Heterogeneity;
    pub use crate::kriging::{percentile, KrigingEstimate, OrdinaryKriging, SimpleKriging};
    pub use crate::simulation::{gaussian as gaussian_draw, sequential as sequential_simulation};
    pub use crate::spatial::SpatialPoints;
    pub use crate::variography::experimental::{
        anisolag, bins, experimental, isolag, ExperimentalParams, ExperimentalVariogram,
    };
    pub use crate::variography::theoretical::{ModelKind, TheoreticalVariogram};
}
