use std::collections::BTreeSet;

use itertools::Itertools;
use log::{debug, warn};

use crate::{
    arc::ArcId,
    context::Context,
    observation::TecRecord,
    prelude::Epoch,
    tec::mapping_function,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [ModipProvider] resolves the Modified Dip latitude at any location
pub trait ModipProvider {
    /// Returns MoDip [rad] for this year, at this geodetic location [ddeg]
    fn modip(&self, year: i32, lon_deg: f64, lat_deg: f64) -> f64;
}

impl<F: Fn(i32, f64, f64) -> f64> ModipProvider for F {
    fn modip(&self, year: i32, lon_deg: f64, lat_deg: f64) -> f64 {
        self(year, lon_deg, lat_deg)
    }
}

/// [CalibrationSample] is one vertical equation of the bias estimation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationSample {
    /// Sampling [Epoch]
    pub epoch: Epoch,
    /// Valid arc
    pub arc: ArcId,
    /// Pierce point MoDip minus receiver MoDip
    pub delta_modip: f64,
    /// Pierce point longitude minus receiver longitude [ddeg]
    pub delta_lon: f64,
    /// Slant to vertical mapping
    pub mapping: f64,
    /// Levelled Geometry Free phase, projected to the vertical [TECu]
    pub gflc_vert: f64,
}

impl CalibrationSample {
    /// True when this sample may enter the design matrix
    pub fn is_finite(&self) -> bool {
        self.delta_modip.is_finite()
            && self.delta_lon.is_finite()
            && self.mapping.is_finite()
            && self.gflc_vert.is_finite()
    }
}

/// Builds one [CalibrationSample] per record of a valid arc, with
/// levelled phase, elevation and pierce point. The MoDip year is that of the
/// first [Epoch].
pub fn preprocess<M: ModipProvider>(
    records: &[TecRecord],
    ctx: &Context,
    modip: &M,
) -> Vec<CalibrationSample> {
    let year = match records.iter().map(|rec| rec.epoch()).min() {
        Some(t) => t.to_gregorian_utc().0,
        None => return Vec::new(),
    };

    let (lat_rec, lon_rec, _) = ctx.receiver_geodetic();
    let modip_rec = modip.modip(year, lon_rec, lat_rec);

    let samples = records
        .iter()
        .filter_map(|rec| {
            let arc = rec.id_arc_valid.as_ref()?;
            let obs = &rec.observation;
            let (levelled, elevation, lon_ipp, lat_ipp) =
                (rec.gflc_levelled?, obs.elevation?, obs.lon_ipp?, obs.lat_ipp?);
            let mapping = mapping_function(elevation, ctx.h_ipp);
            Some(CalibrationSample {
                epoch: obs.epoch,
                arc: arc.clone(),
                delta_modip: modip.modip(year, lon_ipp, lat_ipp) - modip_rec,
                delta_lon: lon_ipp - lon_rec,
                mapping,
                gflc_vert: levelled * mapping,
            })
        })
        .collect::<Vec<_>>();

    let incomplete = incomplete_arcs(records);
    if !incomplete.is_empty() {
        warn!(
            "valid arcs missing levelled phase, elevation or pierce point: {}",
            incomplete.iter().join(", ")
        );
    }

    debug!("{} calibration samples", samples.len());
    samples
}

/// Valid arcs with at least one record that cannot be turned into a [CalibrationSample]
pub(crate) fn incomplete_arcs(records: &[TecRecord]) -> BTreeSet<ArcId> {
    records
        .iter()
        .filter_map(|rec| {
            let arc = rec.id_arc_valid.as_ref()?;
            let obs = &rec.observation;
            let complete = rec.gflc_levelled.is_some()
                && obs.elevation.is_some()
                && obs.lon_ipp.is_some()
                && obs.lat_ipp.is_some();
            if complete {
                None
            } else {
                Some(arc.clone())
            }
        })
        .collect()
}
