//! GNSS signal combinations
use strum_macros::{Display, EnumIter, EnumString};

use crate::constants::{IONO_REFRACTION, SPEED_OF_LIGHT_M_S, TECU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Linear combinations we level and calibrate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LinearCombination {
    /// Geometry Free phase combination [TECu]
    #[strum(serialize = "gflc_phase")]
    GfPhase,
    /// Geometry Free code combination [TECu]
    #[strum(serialize = "gflc_code")]
    GfCode,
    /// Melbourne-Wübbena combination [m]
    #[strum(serialize = "mw")]
    MelbourneWubbena,
    /// Ionosphere Free phase combination [m]
    #[strum(serialize = "iflc_phase")]
    IfPhase,
    /// Ionosphere Free code combination [m]
    #[strum(serialize = "iflc_code")]
    IfCode,
}

/// One dual frequency sampling of phase (cycles)
/// and code (meters) observations
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DualFrequencySample {
    /// Phase on first frequency [cycles]
    pub phase1: f64,
    /// Phase on second frequency [cycles]
    pub phase2: f64,
    /// Code on first frequency [m]
    pub code1: f64,
    /// Code on second frequency [m]
    pub code2: f64,
}

/// Meters to TECu conversion factor, for given frequencies (Hz)
fn tecu_per_meter(f1: f64, f2: f64) -> f64 {
    let (f1_2, f2_2) = (f1.powi(2), f2.powi(2));
    f1_2 * f2_2 / (f1_2 - f2_2) / IONO_REFRACTION / TECU
}

impl DualFrequencySample {
    /// Builds a new [DualFrequencySample]
    pub fn new(phase: (f64, f64), code: (f64, f64)) -> Self {
        Self {
            phase1: phase.0,
            phase2: phase.1,
            code1: code.0,
            code2: code.1,
        }
    }
    /// Phase ranges in meters
    fn phase_ranges(&self, f1: f64, f2: f64) -> (f64, f64) {
        (
            self.phase1 * SPEED_OF_LIGHT_M_S / f1,
            self.phase2 * SPEED_OF_LIGHT_M_S / f2,
        )
    }
    /// Geometry Free phase combination, in TECu
    pub fn gf_phase(&self, f1: f64, f2: f64) -> f64 {
        let (l1, l2) = self.phase_ranges(f1, f2);
        tecu_per_meter(f1, f2) * (l1 - l2)
    }
    /// Geometry Free code combination, in TECu
    pub fn gf_code(&self, f1: f64, f2: f64) -> f64 {
        tecu_per_meter(f1, f2) * (self.code2 - self.code1)
    }
    /// Melbourne-Wübbena combination, in meters:
    /// widelane phase minus narrowlane code
    pub fn melbourne_wubbena(&self, f1: f64, f2: f64) -> f64 {
        let (l1, l2) = self.phase_ranges(f1, f2);
        let widelane = (f1 * l1 - f2 * l2) / (f1 - f2);
        let narrowlane = (f1 * self.code1 + f2 * self.code2) / (f1 + f2);
        widelane - narrowlane
    }
    /// Ionosphere Free phase combination, in meters
    pub fn if_phase(&self, f1: f64, f2: f64) -> f64 {
        let (l1, l2) = self.phase_ranges(f1, f2);
        let (f1_2, f2_2) = (f1.powi(2), f2.powi(2));
        (f1_2 * l1 - f2_2 * l2) / (f1_2 - f2_2)
    }
    /// Ionosphere Free code combination, in meters
    pub fn if_code(&self, f1: f64, f2: f64) -> f64 {
        let (f1_2, f2_2) = (f1.powi(2), f2.powi(2));
        (f1_2 * self.code1 - f2_2 * self.code2) / (f1_2 - f2_2)
    }
    /// Evaluates desired [LinearCombination]
    pub fn combine(&self, lc: LinearCombination, f1: f64, f2: f64) -> f64 {
        match lc {
            LinearCombination::GfPhase => self.gf_phase(f1, f2),
            LinearCombination::GfCode => self.gf_code(f1, f2),
            LinearCombination::MelbourneWubbena => self.melbourne_wubbena(f1, f2),
            LinearCombination::IfPhase => self.if_phase(f1, f2),
            LinearCombination::IfCode => self.if_code(f1, f2),
        }
    }
}
