use std::collections::BTreeMap;

use itertools::Itertools;
use nalgebra::{DMatrix, DVector};
use thiserror::Error;

use crate::{
    arc::ArcId,
    calibration::{
        linalg::{last_nonzero_row, tolerance, triangular_factor},
        polynomial::polynomial_terms,
        BatchAggregation, CalibrationSample,
    },
    prelude::Epoch,
};

/// Reasons for rejecting one [Batch]
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub(crate) enum BatchError {
    #[error("no usable sample")]
    Empty,
    #[error("{0} equations cannot constrain {1} polynomial terms")]
    TooFewArcs(usize, usize),
    #[error("non finite coefficients")]
    NonFinite,
    #[error("no solvable rows")]
    NoSolvableRows,
    #[error("null bias coefficients")]
    Degenerate,
}

/// [Batch] of consecutive epochs
#[derive(Debug, Clone)]
pub(crate) struct Batch<'a> {
    /// Batch number
    pub index: usize,
    /// First [Epoch] of this batch
    pub start: Epoch,
    /// Samples, chronologically sorted
    pub samples: Vec<&'a CalibrationSample>,
}

/// [PartialSystem] is the compressed bias system of one [Batch]:
/// each row relates the batch arcs to the observation, once
/// the polynomial terms were eliminated.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PartialSystem {
    /// Arcs, in column order
    pub arcs: Vec<ArcId>,
    /// Bias coefficients
    pub coefficients: DMatrix<f64>,
    /// Observation column
    pub observations: DVector<f64>,
}

impl PartialSystem {
    /// Number of equations
    pub fn nrows(&self) -> usize {
        self.coefficients.nrows()
    }
}

/// Splits `epochs` and the epochs of the samples into non overlapping batches
/// of `size` unique epochs, in chronological order.
/// Batches without any sample are not returned, but still consume their index.
pub(crate) fn batches<I: IntoIterator<Item = Epoch>>(
    epochs: I,
    samples: &[CalibrationSample],
    size: usize,
) -> Vec<Batch<'_>> {
    let mut content = BTreeMap::<Epoch, Vec<&CalibrationSample>>::new();
    for epoch in epochs {
        content.entry(epoch).or_default();
    }
    for sample in samples.iter() {
        content.entry(sample.epoch).or_default().push(sample);
    }

    let chunks = content.into_iter().chunks(size.max(1));

    let batches = chunks
        .into_iter()
        .enumerate()
        .filter_map(|(index, chunk)| {
            let mut samples = Vec::new();
            let mut start = None;
            for (epoch, mut content) in chunk {
                if start.is_none() {
                    start = Some(epoch);
                }
                content.sort_by(|a, b| a.arc.cmp(&b.arc));
                samples.extend(content);
            }
            if samples.is_empty() {
                return None;
            }
            let start = start?;
            Some(Batch {
                index,
                start,
                samples,
            })
        })
        .collect();

    batches
}

impl<'a> Batch<'a> {
    /// Selects the samples that enter the design matrix
    fn equations(&self, aggregation: BatchAggregation) -> Vec<&'a CalibrationSample> {
        let finite = self.samples.iter().filter(|s| s.is_finite()).copied();
        match aggregation {
            BatchAggregation::AllEpochs => finite.collect(),
            BatchAggregation::FirstPerArc => finite.unique_by(|s| s.arc.clone()).collect(),
        }
    }
    /// Builds the batch design matrix
    /// `[polynomial terms | arc mapping (one-hot) | observation]`,
    /// factorizes it and returns the compressed bias system.
    pub fn compress(
        &self,
        max_degree: usize,
        aggregation: BatchAggregation,
    ) -> Result<PartialSystem, BatchError> {
        let equations = self.equations(aggregation);
        if equations.is_empty() {
            return Err(BatchError::Empty);
        }

        let arcs = equations
            .iter()
            .map(|s| s.arc.clone())
            .unique()
            .collect::<Vec<_>>();

        let n_poly = max_degree + 2;
        let n_arcs = arcs.len();
        let ncols = n_poly + n_arcs + 1;
        let nrows = equations.len();

        if nrows <= n_poly {
            return Err(BatchError::TooFewArcs(nrows, n_poly));
        }

        let mut design = DMatrix::<f64>::zeros(nrows, ncols);

        for (i, sample) in equations.iter().enumerate() {
            let terms = polynomial_terms(sample.delta_modip, sample.delta_lon, max_degree);
            for (j, term) in terms.iter().enumerate() {
                design[(i, j)] = *term;
            }
            if let Some(column) = arcs.iter().position(|arc| *arc == sample.arc) {
                design[(i, n_poly + column)] = sample.mapping;
            }
            design[(i, ncols - 1)] = sample.gflc_vert;
        }

        let r = triangular_factor(design);

        if r.iter().any(|value| !value.is_finite()) {
            return Err(BatchError::NonFinite);
        }

        // the residual row carries no bias information
        let upper = r.nrows().min(ncols - 1);
        if upper <= n_poly {
            return Err(BatchError::NoSolvableRows);
        }

        let tol = tolerance(&r);
        let obs_column = r
            .view((n_poly, ncols - 1), (upper - n_poly, 1))
            .into_owned();
        let last = last_nonzero_row(&obs_column, 0, tol).ok_or(BatchError::NoSolvableRows)?;
        let rows = last + 1;

        let coefficients = r.view((n_poly, n_poly), (rows, n_arcs)).into_owned();

        if coefficients.iter().all(|value| value.abs() <= tol) {
            return Err(BatchError::Degenerate);
        }

        let observations = DVector::from_iterator(rows, obs_column.iter().take(rows).copied());

        Ok(PartialSystem {
            arcs,
            coefficients,
            observations,
        })
    }
}
