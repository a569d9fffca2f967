use itertools::Itertools;
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

use crate::{
    arc::ArcId,
    calibration::{
        batch::{batches, PartialSystem},
        linalg::{last_nonzero_row, least_squares, tolerance, triangular_factor},
        BatchAggregation, BiasMap, CalibrationSample, GlobalArcIndex,
    },
    cfg::Config,
    prelude::{Epoch, Error},
};

/// [BiasEstimator] solves for one bias per valid arc, jointly with
/// a polynomial model of the vertical TEC around the receiver.
///
/// Epochs are split into non overlapping batches. Each batch is compressed
/// to the triangular factor of its design matrix, from which the polynomial
/// terms are eliminated. The remaining bias equations of all batches are
/// stacked into one global system, factorized again and solved in the
/// least squares sense.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasEstimator {
    max_degree: usize,
    batch_size: usize,
    aggregation: BatchAggregation,
}

impl Default for BiasEstimator {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl BiasEstimator {
    /// Builds a new [BiasEstimator] from [Config]
    pub fn new(cfg: &Config) -> Self {
        Self {
            max_degree: cfg.max_polynomial_degree,
            batch_size: cfg.batch_size_epochs,
            aggregation: cfg.aggregation,
        }
    }
    /// Estimates arc biases, batches being formed over the epochs of the samples.
    /// Rejected batches are reported and skipped. Fails only when
    /// the recombined system cannot be solved.
    pub fn estimate(&self, samples: &[CalibrationSample]) -> Result<BiasMap, Error> {
        self.estimate_over(std::iter::empty::<Epoch>(), samples)
    }
    /// Estimates arc biases, batches being formed over `epochs`
    /// (usually every epoch of the observation table) and the epochs of the samples.
    /// Epochs without samples still count towards the batch boundaries.
    pub fn estimate_over<I: IntoIterator<Item = Epoch>>(
        &self,
        epochs: I,
        samples: &[CalibrationSample],
    ) -> Result<BiasMap, Error> {
        let mut index = GlobalArcIndex::default();
        let mut systems = Vec::<PartialSystem>::new();

        for batch in batches(epochs, samples, self.batch_size) {
            match batch.compress(self.max_degree, self.aggregation) {
                Ok(system) => {
                    debug!(
                        "batch #{} ({}) - {} arcs, {} equations",
                        batch.index,
                        batch.start,
                        system.arcs.len(),
                        system.nrows()
                    );
                    for arc in system.arcs.iter() {
                        index.insert(arc);
                    }
                    systems.push(system);
                },
                Err(e) => {
                    warn!("batch #{} ({}) rejected: {}", batch.index, batch.start, e);
                },
            }
        }

        if systems.is_empty() {
            return Err(Error::EmptySystem);
        }

        let n_arcs = index.len();
        let nrows = systems.iter().map(|s| s.nrows()).sum::<usize>();
        let mut global = DMatrix::<f64>::zeros(nrows, n_arcs + 1);

        let mut row = 0;
        for system in systems.iter() {
            for (j, arc) in system.arcs.iter().enumerate() {
                let column = index.get(arc).ok_or(Error::EmptySystem)?;
                for i in 0..system.nrows() {
                    global[(row + i, column)] = system.coefficients[(i, j)];
                }
            }
            for i in 0..system.nrows() {
                global[(row + i, n_arcs)] = system.observations[i];
            }
            row += system.nrows();
        }

        debug!("global system: {} equations, {} arcs", nrows, n_arcs);

        let r = triangular_factor(global);
        let tol = tolerance(&r);

        let last = last_nonzero_row(&r, n_arcs, tol).ok_or(Error::EmptySystem)?;

        // trailing rows without coefficients are residuals
        let mut rows = last + 1;
        while rows > 0 && (0..n_arcs).all(|j| r[(rows - 1, j)].abs() <= tol) {
            rows -= 1;
        }

        if rows <= 1 {
            return Err(Error::Underdetermined(rows));
        }

        let cols = rows.min(n_arcs);
        let block = r.view((0, 0), (rows, cols)).into_owned();
        let b = DVector::from_iterator(rows, (0..rows).map(|i| r[(i, n_arcs)]));

        let x = least_squares(block, &b, tol)?;

        let biases = index
            .iter()
            .take(cols)
            .zip(x.iter())
            .map(|(arc, bias)| (arc.clone(), *bias))
            .collect::<BiasMap>();

        let uncalibrated = uncalibrated_arcs(&index, cols);
        if !uncalibrated.is_empty() {
            warn!(
                "{} arcs could not be calibrated: {}",
                uncalibrated.len(),
                uncalibrated.iter().join(", ")
            );
        }

        Ok(biases)
    }
}

/// Arcs beyond the solvable block, which receive no bias
fn uncalibrated_arcs(index: &GlobalArcIndex, solved: usize) -> Vec<ArcId> {
    index.iter().skip(solved).cloned().collect()
}
