//! Input observations and output records
use std::collections::BTreeMap;

use crate::{
    arc::ArcId,
    combination::{DualFrequencySample, LinearCombination},
    prelude::{Epoch, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [Observation] is one (SV, Epoch) input row: the linear combinations
/// plus the pierce point geometry, resolved by upstream collaborators.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    /// Satellite vehicle
    pub sv: SV,
    /// Sampling [Epoch]
    pub epoch: Epoch,
    /// Melbourne-Wübbena combination [m]
    pub mw: Option<f64>,
    /// Geometry Free phase combination [TECu]
    pub gflc_phase: Option<f64>,
    /// Geometry Free code combination [TECu]
    pub gflc_code: Option<f64>,
    /// Ionosphere Free phase combination [m]
    pub iflc_phase: Option<f64>,
    /// Ionosphere Free code combination [m]
    pub iflc_code: Option<f64>,
    /// Elevation angle [ddeg]
    pub elevation: Option<f64>,
    /// Pierce point longitude [ddeg]
    pub lon_ipp: Option<f64>,
    /// Pierce point latitude [ddeg]
    pub lat_ipp: Option<f64>,
}

impl Observation {
    /// Builds an empty [Observation]
    pub fn new(sv: SV, epoch: Epoch) -> Self {
        Self {
            sv,
            epoch,
            mw: None,
            gflc_phase: None,
            gflc_code: None,
            iflc_phase: None,
            iflc_code: None,
            elevation: None,
            lon_ipp: None,
            lat_ipp: None,
        }
    }
    /// Builds an [Observation] from raw dual frequency measurements,
    /// sampled on (f1, f2) [Hz]. All combinations are left empty
    /// when the measurement is missing.
    pub fn from_dual_frequency(
        sv: SV,
        epoch: Epoch,
        sample: Option<DualFrequencySample>,
        frequencies: (f64, f64),
    ) -> Self {
        let mut s = Self::new(sv, epoch);
        if let Some(sample) = sample {
            let (f1, f2) = frequencies;
            s.mw = Some(sample.melbourne_wubbena(f1, f2));
            s.gflc_phase = Some(sample.gf_phase(f1, f2));
            s.gflc_code = Some(sample.gf_code(f1, f2));
            s.iflc_phase = Some(sample.if_phase(f1, f2));
            s.iflc_code = Some(sample.if_code(f1, f2));
        }
        s
    }
    /// Copies and defines MW combination
    pub fn with_mw(&self, mw: f64) -> Self {
        let mut s = *self;
        s.mw = Some(mw);
        s
    }
    /// Copies and defines both Geometry Free combinations
    pub fn with_geometry_free(&self, phase: f64, code: f64) -> Self {
        let mut s = *self;
        s.gflc_phase = Some(phase);
        s.gflc_code = Some(code);
        s
    }
    /// Copies and defines both Ionosphere Free combinations
    pub fn with_ionosphere_free(&self, phase: f64, code: f64) -> Self {
        let mut s = *self;
        s.iflc_phase = Some(phase);
        s.iflc_code = Some(code);
        s
    }
    /// Copies and defines elevation angle [ddeg]
    pub fn with_elevation(&self, elevation: f64) -> Self {
        let mut s = *self;
        s.elevation = Some(elevation);
        s
    }
    /// Copies and defines pierce point coordinates [ddeg]
    pub fn with_ipp(&self, lon: f64, lat: f64) -> Self {
        let mut s = *self;
        s.lon_ipp = Some(lon);
        s.lat_ipp = Some(lat);
        s
    }
    /// Returns desired [LinearCombination] value, if it exists
    pub fn combination(&self, lc: LinearCombination) -> Option<f64> {
        match lc {
            LinearCombination::MelbourneWubbena => self.mw,
            LinearCombination::GfPhase => self.gflc_phase,
            LinearCombination::GfCode => self.gflc_code,
            LinearCombination::IfPhase => self.iflc_phase,
            LinearCombination::IfCode => self.iflc_code,
        }
    }
}

/// [TecRecord] is one output row: the input [Observation]
/// augmented by every processing step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TecRecord {
    /// Input [Observation]
    pub observation: Observation,
    /// True when tracking was interrupted at this [Epoch]
    pub is_loss_of_lock: bool,
    /// Cycle slip flag, undefined on loss of lock
    pub is_cycle_slip: Option<bool>,
    /// Arc this row belongs to
    pub id_arc: Option<ArcId>,
    /// Arc this row belongs to, only when the arc may be calibrated
    pub id_arc_valid: Option<ArcId>,
    /// Jump free combinations (`<lc>_fix`)
    pub fixed: BTreeMap<LinearCombination, f64>,
    /// Geometry Free phase, levelled to the code [TECu]
    pub gflc_levelled: Option<f64>,
    /// Arc bias [TECu]
    pub bias: Option<f64>,
    /// Slant TEC [TECu]
    pub stec: Option<f64>,
    /// Vertical TEC [TECu]
    pub vtec: Option<f64>,
}

impl TecRecord {
    /// Builds a new [TecRecord], nothing being resolved yet
    pub fn new(observation: Observation) -> Self {
        Self {
            observation,
            is_loss_of_lock: false,
            is_cycle_slip: None,
            id_arc: None,
            id_arc_valid: None,
            fixed: BTreeMap::new(),
            gflc_levelled: None,
            bias: None,
            stec: None,
            vtec: None,
        }
    }
    /// [SV] shortcut
    pub fn sv(&self) -> SV {
        self.observation.sv
    }
    /// [Epoch] shortcut
    pub fn epoch(&self) -> Epoch {
        self.observation.epoch
    }
    /// Returns jump free value of this [LinearCombination], if it exists
    pub fn fixed(&self, lc: LinearCombination) -> Option<f64> {
        self.fixed.get(&lc).copied()
    }
}
