//! Arc bias calibration
use std::collections::HashMap;

use crate::arc::ArcId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod batch;
mod estimator;
mod index;
mod linalg;
mod polynomial;
mod preprocessing;

pub use estimator::BiasEstimator;
pub use index::GlobalArcIndex;
pub use polynomial::polynomial_terms;
pub use preprocessing::{preprocess, CalibrationSample, ModipProvider};

/// Estimated bias [TECu] of each calibrated arc
pub type BiasMap = HashMap<ArcId, f64>;

/// How each batch is turned into equations
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BatchAggregation {
    /// One equation per arc and batch, from its first sample within the batch
    #[default]
    FirstPerArc,
    /// Every sample of the batch is one equation
    AllEpochs,
}
