//! Calibration options
use crate::{
    calibration::BatchAggregation,
    prelude::{Duration, Error},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn default_min_arc_length() -> usize {
    30
}

fn default_threshold_std() -> f64 {
    5.0
}

fn default_threshold_abs() -> f64 {
    5.0
}

fn default_max_gap() -> Duration {
    Duration::from_seconds(30.0)
}

fn default_threshold_jump() -> f64 {
    10.0
}

fn default_max_polynomial_degree() -> usize {
    3
}

fn default_batch_size_epochs() -> usize {
    30
}

/// [Config] gathers the tuning parameters of every processing step.
/// Use [Config::default] then customize with the `with_` methods.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Minimal number of code observations for an arc to be calibrated
    #[cfg_attr(feature = "serde", serde(default = "default_min_arc_length"))]
    pub min_arc_length: usize,
    /// MW deviation from its running mean, in running standard deviations,
    /// above which a cycle slip is suspected
    #[cfg_attr(feature = "serde", serde(default = "default_threshold_std"))]
    pub threshold_std: f64,
    /// MW absolute step [m] above which a cycle slip is suspected
    #[cfg_attr(feature = "serde", serde(default = "default_threshold_abs"))]
    pub threshold_abs: f64,
    /// Maximal data gap before we declare a loss of lock
    #[cfg_attr(feature = "serde", serde(default = "default_max_gap"))]
    pub max_gap: Duration,
    /// Residual jump [TECu] that the levelling removes,
    /// even when no cycle slip was detected
    #[cfg_attr(feature = "serde", serde(default = "default_threshold_jump"))]
    pub threshold_jump: f64,
    /// Ionospheric polynomial degree
    #[cfg_attr(feature = "serde", serde(default = "default_max_polynomial_degree"))]
    pub max_polynomial_degree: usize,
    /// Number of epochs per least squares batch
    #[cfg_attr(feature = "serde", serde(default = "default_batch_size_epochs"))]
    pub batch_size_epochs: usize,
    /// Batch aggregation strategy
    #[cfg_attr(feature = "serde", serde(default))]
    pub aggregation: BatchAggregation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_arc_length: default_min_arc_length(),
            threshold_std: default_threshold_std(),
            threshold_abs: default_threshold_abs(),
            max_gap: default_max_gap(),
            threshold_jump: default_threshold_jump(),
            max_polynomial_degree: default_max_polynomial_degree(),
            batch_size_epochs: default_batch_size_epochs(),
            aggregation: BatchAggregation::default(),
        }
    }
}

impl Config {
    /// Copies and updates minimal arc length
    pub fn with_min_arc_length(&self, min_arc_length: usize) -> Self {
        let mut s = *self;
        s.min_arc_length = min_arc_length;
        s
    }
    /// Copies and updates both cycle slip thresholds
    pub fn with_cycle_slip_thresholds(&self, threshold_std: f64, threshold_abs: f64) -> Self {
        let mut s = *self;
        s.threshold_std = threshold_std;
        s.threshold_abs = threshold_abs;
        s
    }
    /// Copies and updates maximal data gap
    pub fn with_max_gap(&self, max_gap: Duration) -> Self {
        let mut s = *self;
        s.max_gap = max_gap;
        s
    }
    /// Copies and updates residual jump threshold
    pub fn with_threshold_jump(&self, threshold_jump: f64) -> Self {
        let mut s = *self;
        s.threshold_jump = threshold_jump;
        s
    }
    /// Copies and updates polynomial degree
    pub fn with_max_polynomial_degree(&self, degree: usize) -> Self {
        let mut s = *self;
        s.max_polynomial_degree = degree;
        s
    }
    /// Copies and updates batch size
    pub fn with_batch_size_epochs(&self, batch_size_epochs: usize) -> Self {
        let mut s = *self;
        s.batch_size_epochs = batch_size_epochs;
        s
    }
    /// Copies and updates [BatchAggregation] strategy
    pub fn with_aggregation(&self, aggregation: BatchAggregation) -> Self {
        let mut s = *self;
        s.aggregation = aggregation;
        s
    }
    /// Number of polynomial terms this setup solves for
    pub fn polynomial_terms(&self) -> usize {
        self.max_polynomial_degree + 2
    }
    /// Verifies all options lie within their domain
    pub fn validate(&self) -> Result<(), Error> {
        if self.min_arc_length == 0 {
            return Err(Error::InvalidConfig("min_arc_length must be positive".into()));
        }
        if self.batch_size_epochs == 0 {
            return Err(Error::InvalidConfig(
                "batch_size_epochs must be positive".into(),
            ));
        }
        for (name, value) in [
            ("threshold_std", self.threshold_std),
            ("threshold_abs", self.threshold_abs),
            ("threshold_jump", self.threshold_jump),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be a positive number (got {})",
                    name, value
                )));
            }
        }
        if self.max_gap <= Duration::ZERO {
            return Err(Error::InvalidConfig("max_gap must be positive".into()));
        }
        Ok(())
    }
}
