//! Complete TEC calibration pipeline
use std::collections::HashMap;

use log::{debug, warn};

use crate::{
    arc::ArcSegmenter,
    calibration::{preprocess, BiasEstimator, ModipProvider},
    cfg::Config,
    context::Context,
    cs::CycleSlipDetector,
    levelling::{JumpLeveler, PhaseCodeLeveler},
    observation::{Observation, TecRecord},
    prelude::{Constellation, Error},
    tec::TecProducer,
};

/// [Calibrator] runs the complete processing chain, from the linear
/// combinations to the calibrated slant and vertical TEC.
pub struct Calibrator<M: ModipProvider> {
    ctx: Context,
    cfg: Config,
    modip: M,
}

impl<M: ModipProvider> Calibrator<M> {
    /// Builds a new [Calibrator]. `modip` is the MoDip service that
    /// the calibration relies on. Fails on invalid [Config].
    pub fn new(ctx: Context, cfg: Config, modip: M) -> Result<Self, Error> {
        cfg.validate()?;
        Ok(Self { ctx, cfg, modip })
    }
    /// Returns [Context] reference
    pub fn context(&self) -> &Context {
        &self.ctx
    }
    /// Returns [Config] reference
    pub fn config(&self) -> &Config {
        &self.cfg
    }
    /// Detects cycle slips and loss of lock, identifies the arcs,
    /// removes the jumps and levels the phase to the code.
    /// Observations of inactive systems are dropped.
    pub fn extract_arcs(&self, observations: &[Observation]) -> Result<Vec<TecRecord>, Error> {
        let mut dropped = HashMap::<Constellation, usize>::new();
        let observations = observations
            .iter()
            .filter(|obs| {
                let active = self.ctx.is_active(obs.sv);
                if !active {
                    *dropped.entry(obs.sv.constellation).or_default() += 1;
                }
                active
            })
            .copied()
            .collect::<Vec<_>>();

        for (constellation, count) in dropped.iter() {
            warn!("{} inactive {} observations dropped", count, constellation);
        }

        let detector = CycleSlipDetector::new(&self.cfg);
        let detections = detector.detect(&observations, &self.ctx)?;

        let mut records = observations
            .into_iter()
            .zip(detections)
            .map(|(obs, detection)| {
                let mut rec = TecRecord::new(obs);
                rec.is_loss_of_lock = detection.is_loss_of_lock;
                rec.is_cycle_slip = detection.is_cycle_slip;
                rec
            })
            .collect::<Vec<_>>();

        let arcs = ArcSegmenter::new(&self.cfg, &self.ctx).segment(&mut records);
        debug!(
            "{} arcs identified, {} valid",
            arcs.len(),
            arcs.iter().filter(|arc| arc.valid).count()
        );

        JumpLeveler::new(&self.cfg).level(&mut records);
        PhaseCodeLeveler::default().level(&mut records);
        Ok(records)
    }
    /// Estimates the arc biases and resolves slant and vertical TEC.
    /// When no arc is valid, bias and TEC remain empty and this is not an error.
    pub fn calculate_tec(&self, mut records: Vec<TecRecord>) -> Result<Vec<TecRecord>, Error> {
        let producer = TecProducer::new(&self.ctx);

        if records.iter().all(|rec| rec.id_arc_valid.is_none()) {
            producer.nullify(&mut records);
            return Ok(records);
        }

        let samples = preprocess(&records, &self.ctx, &self.modip);
        let epochs = records.iter().map(|rec| rec.epoch());
        let biases = BiasEstimator::new(&self.cfg).estimate_over(epochs, &samples)?;

        producer.produce(&mut records, &biases);
        Ok(records)
    }
    /// Runs [Self::extract_arcs] then [Self::calculate_tec]
    pub fn process(&self, observations: &[Observation]) -> Result<Vec<TecRecord>, Error> {
        let records = self.extract_arcs(observations)?;
        self.calculate_tec(records)
    }
}
