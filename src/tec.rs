//! Slant and vertical TEC
use log::warn;

use crate::{
    calibration::BiasMap, constants::EARTH_RADIUS_KM, context::Context, observation::TecRecord,
};

/// Thin shell slant to vertical mapping, for this elevation angle [ddeg]
/// and shell height [m]: `cos(asin(Re / (Re + h) cos(elevation)))`.
/// Equals 1.0 at zenith and decreases towards the horizon.
pub fn mapping_function(elevation_deg: f64, h_ipp_m: f64) -> f64 {
    let ratio = EARTH_RADIUS_KM / (EARTH_RADIUS_KM + h_ipp_m / 1000.0);
    (ratio * elevation_deg.to_radians().cos()).asin().cos()
}

/// [TecProducer] applies the arc biases and projects the slant TEC to the vertical
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TecProducer {
    h_ipp: f64,
}

impl TecProducer {
    /// Builds a new [TecProducer]
    pub fn new(ctx: &Context) -> Self {
        Self { h_ipp: ctx.h_ipp }
    }
    /// Resolves `bias`, `stec` and `vtec` of each record.
    /// Records whose arc was not calibrated remain empty.
    pub fn produce(&self, records: &mut [TecRecord], biases: &BiasMap) {
        for rec in records.iter_mut() {
            rec.bias = rec
                .id_arc_valid
                .as_ref()
                .and_then(|arc| biases.get(arc).copied());

            rec.stec = match (rec.gflc_levelled, rec.bias) {
                (Some(levelled), Some(bias)) => Some(levelled - bias),
                _ => None,
            };

            rec.vtec = match (rec.stec, rec.observation.elevation) {
                (Some(stec), Some(elevation)) => {
                    Some(stec * mapping_function(elevation, self.h_ipp))
                },
                _ => None,
            };
        }
    }
    /// Empties `bias`, `stec` and `vtec` of each record, when calibration
    /// is not feasible.
    pub fn nullify(&self, records: &mut [TecRecord]) {
        warn!("no valid arc: calibration cannot be performed");
        for rec in records.iter_mut() {
            rec.bias = None;
            rec.stec = None;
            rec.vtec = None;
        }
    }
}
