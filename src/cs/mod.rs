//! Cycle slip and loss of lock detection
use std::collections::BTreeMap;

use log::{debug, trace};

use crate::{
    cfg::Config,
    context::Context,
    observation::Observation,
    prelude::{Duration, Epoch, Error, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [DetectionResult] is emitted once per [Observation]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectionResult {
    /// Satellite vehicle
    pub sv: SV,
    /// Sampling [Epoch]
    pub epoch: Epoch,
    /// Tracking was interrupted (missing MW or data gap)
    pub is_loss_of_lock: bool,
    /// Cycle slip flag. Undefined on loss of lock.
    pub is_cycle_slip: Option<bool>,
}

impl DetectionResult {
    fn loss_of_lock(sv: SV, epoch: Epoch) -> Self {
        Self {
            sv,
            epoch,
            is_loss_of_lock: true,
            is_cycle_slip: None,
        }
    }
    fn tracking(sv: SV, epoch: Epoch, cycle_slip: bool) -> Self {
        Self {
            sv,
            epoch,
            is_loss_of_lock: false,
            is_cycle_slip: Some(cycle_slip),
        }
    }
}

/// MW running statistics of one satellite
#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    /// Number of accumulated samples
    k: usize,
    /// Running mean
    mean: Option<f64>,
    /// Running variance
    variance: Option<f64>,
    /// Latest accepted sample
    prev: Option<f64>,
    /// Latest valid [Epoch]
    last_valid: Option<Epoch>,
}

impl Accumulator {
    /// Drops the statistics, keeps the time reference
    fn reset(&mut self) {
        self.k = 0;
        self.mean = None;
        self.variance = None;
        self.prev = None;
    }
    /// Initializes the statistics on this sample
    fn initialize(&mut self, mw: f64, sigma0: f64) {
        self.k = 1;
        self.mean = Some(mw);
        self.variance = Some(sigma0.powi(2));
        self.prev = Some(mw);
    }
    /// Consumes one sample, returns (loss of lock, cycle slip) flags
    fn step(
        &mut self,
        epoch: Epoch,
        mw: Option<f64>,
        sigma0: f64,
        max_gap: Duration,
        threshold_std: f64,
        threshold_abs: f64,
    ) -> (bool, Option<bool>) {
        let mw = match mw {
            Some(mw) if mw.is_finite() => mw,
            _ => {
                self.reset();
                return (true, None);
            },
        };

        if let Some(last) = self.last_valid {
            if epoch - last > max_gap {
                self.reset();
                self.last_valid = Some(epoch);
                return (true, None);
            }
        }

        self.last_valid = Some(epoch);

        let (k, mean, variance, prev) = match (self.mean, self.variance, self.prev) {
            (Some(mean), Some(variance), Some(prev)) if self.k > 0 => {
                (self.k as f64, mean, variance, prev)
            },
            _ => {
                self.initialize(mw, sigma0);
                return (false, Some(false));
            },
        };

        let deviation = (mw - mean).abs();
        let delta = (mw - prev).abs();

        if deviation > threshold_std * variance.sqrt() && delta > threshold_abs {
            self.reset();
            return (false, Some(true));
        }

        let mean_k = (k * mean + mw) / (k + 1.0);
        self.variance = Some((k * variance + (mw - mean).powi(2)) / (k + 1.0));
        self.mean = Some(mean_k);
        self.prev = Some(mw);
        self.k += 1;
        (false, Some(false))
    }
}

/// [CycleSlipDetector] monitors the Melbourne-Wübbena combination
/// of each satellite and flags loss of lock and cycle slips.
///
/// Each satellite is processed independently, in chronological order:
/// - a missing MW value, or a data gap larger than `max_gap`, is a loss of lock
///   and resets the running statistics
/// - the first sample afterwards initializes the running mean, and
///   the running variance to the squared half widelane wavelength
/// - a sample that deviates from the running mean by more than `threshold_std`
///   standard deviations, while differing from the latest accepted sample by more than
///   `threshold_abs`, is a cycle slip. The statistics are reset but the arc continues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleSlipDetector {
    threshold_std: f64,
    threshold_abs: f64,
    max_gap: Duration,
}

impl Default for CycleSlipDetector {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl CycleSlipDetector {
    /// Builds a new [CycleSlipDetector] from [Config]
    pub fn new(cfg: &Config) -> Self {
        Self {
            threshold_std: cfg.threshold_std,
            threshold_abs: cfg.threshold_abs,
            max_gap: cfg.max_gap,
        }
    }
    /// Runs the detection on a single satellite time series.
    /// `samples` must be chronologically sorted,
    /// `sigma0` is the initial MW noise level [m].
    pub fn detect_sv<I: IntoIterator<Item = (Epoch, Option<f64>)>>(
        &self,
        sv: SV,
        sigma0: f64,
        samples: I,
    ) -> Vec<DetectionResult> {
        let mut acc = Accumulator::default();
        samples
            .into_iter()
            .map(|(epoch, mw)| {
                let (lol, cs) = acc.step(
                    epoch,
                    mw,
                    sigma0,
                    self.max_gap,
                    self.threshold_std,
                    self.threshold_abs,
                );
                if lol {
                    trace!("{}({}) - loss of lock", epoch, sv);
                    DetectionResult::loss_of_lock(sv, epoch)
                } else {
                    if cs == Some(true) {
                        trace!("{}({}) - cycle slip", epoch, sv);
                    }
                    DetectionResult::tracking(sv, epoch, cs == Some(true))
                }
            })
            .collect()
    }
    /// Runs the detection over a whole observation table.
    /// Returns one [DetectionResult] per [Observation], in input order.
    /// Fails when the frequencies of one satellite cannot be resolved.
    pub fn detect(
        &self,
        observations: &[Observation],
        ctx: &Context,
    ) -> Result<Vec<DetectionResult>, Error> {
        let mut per_sv = BTreeMap::<SV, Vec<usize>>::new();
        for (index, obs) in observations.iter().enumerate() {
            per_sv.entry(obs.sv).or_default().push(index);
        }

        let mut results = observations
            .iter()
            .map(|obs| DetectionResult::tracking(obs.sv, obs.epoch, false))
            .collect::<Vec<_>>();

        for (sv, mut indexes) in per_sv {
            let sigma0 = ctx.widelane_sigma(sv)?;
            indexes.sort_by_key(|i| observations[*i].epoch);

            let sv_results = self.detect_sv(
                sv,
                sigma0,
                indexes
                    .iter()
                    .map(|i| (observations[*i].epoch, observations[*i].mw)),
            );

            let (mut lol, mut cs) = (0, 0);
            for (index, result) in indexes.iter().zip(sv_results) {
                if result.is_loss_of_lock {
                    lol += 1;
                }
                if result.is_cycle_slip == Some(true) {
                    cs += 1;
                }
                results[*index] = result;
            }
            debug!("{} - {} loss of lock, {} cycle slips", sv, lol, cs);
        }

        Ok(results)
    }
}
