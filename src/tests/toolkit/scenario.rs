use std::collections::HashMap;
use std::f64::consts::PI;

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{epoch, gaussian, gps};

use crate::{
    calibration::polynomial_terms,
    prelude::{ArcId, CalibrationSample, Observation, SV},
    tec::mapping_function,
};

/// Number of epochs of the synthetic scenario
pub const NUM_EPOCHS: usize = 1200;

/// Shell height of the synthetic scenario [m]
pub const H_IPP: f64 = 350_000.0;

/// Polynomial degree of the synthetic ionosphere
pub const MAX_DEGREE: usize = 3;

/// Cycle slip magnitude, on the Geometry Free phase [TECu]
pub const PHASE_SLIP: f64 = 25.0;

/// Cycle slip magnitude, on the MW combination [m]
pub const MW_SLIP: f64 = 8.0;

/// One synthetic satellite pass
#[derive(Debug, Clone)]
pub struct SyntheticArc {
    /// Satellite vehicle
    pub sv: SV,
    /// Arc sequence number, for this vehicle
    pub sequence: usize,
    /// First epoch index
    pub first: usize,
    /// Last epoch index (excluded)
    pub last: usize,
    /// Azimuth at rise [rad]
    pub azimuth: f64,
    /// Code bias [TECu]
    pub bias: f64,
    /// Phase ambiguity [TECu]
    pub ambiguity: f64,
    /// MW level [m]
    pub mw: f64,
    /// Epoch index of a cycle slip
    pub slip: Option<usize>,
}

impl SyntheticArc {
    /// Identifier of this arc
    pub fn id(&self) -> ArcId {
        ArcId::new(None, self.sv, epoch(self.first), self.sequence)
    }
    /// Returns (elevation [ddeg], Δlon [ddeg], Δmodip) at this epoch index
    pub fn geometry(&self, t: usize) -> (f64, f64, f64) {
        let frac = (t - self.first) as f64 / (self.last - self.first) as f64;
        let elevation = 15.0 + 70.0 * (PI * frac).sin();
        let azimuth = self.azimuth + frac;
        let obliquity = 1.0 - elevation / 90.0;
        (
            elevation,
            12.0 * azimuth.cos() * obliquity,
            0.35 * azimuth.sin() * obliquity,
        )
    }
    /// True if the cycle slip already happened at this epoch index
    fn slipped(&self, t: usize) -> bool {
        self.slip.map(|slip| t >= slip).unwrap_or(false)
    }
}

/// Synthetic receiver: 12 GPS passes spread over ten hours, plus
/// G13 which is tracked twice. G03 and G08 suffer one cycle slip.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub arcs: Vec<SyntheticArc>,
}

impl Scenario {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut arcs = Vec::new();

        let mut passes = (0..12)
            .map(|s| {
                let first = (s * 70) % 400;
                let slip = if s == 2 || s == 7 {
                    Some(first + 300)
                } else {
                    None
                };
                (gps(s as u8 + 1), 1, first, first + 700, 2.0 * PI * s as f64 / 12.0, slip)
            })
            .collect::<Vec<_>>();

        passes.push((gps(13), 1, 100, 400, 1.0, None));
        passes.push((gps(13), 2, 500, 1100, 2.5, None));

        for (sv, sequence, first, last, azimuth, slip) in passes {
            arcs.push(SyntheticArc {
                sv,
                sequence,
                first,
                last,
                azimuth,
                slip,
                bias: rng.gen_range(-30.0..30.0),
                ambiguity: rng.gen_range(-200.0..200.0),
                mw: 2.0 + 0.5 * sv.prn as f64,
            });
        }

        Self { arcs }
    }
    /// Vertical TEC model coefficients at this epoch index
    fn coefficients(t: usize) -> [f64; MAX_DEGREE + 2] {
        [
            20.0 + 5.0 * (2.0 * PI * t as f64 / NUM_EPOCHS as f64).sin(),
            0.3,
            8.0,
            -4.0,
            1.0,
        ]
    }
    /// True vertical TEC seen by this arc, at this epoch index
    pub fn vtec(&self, arc: &SyntheticArc, t: usize) -> f64 {
        let (_, delta_lon, delta_modip) = arc.geometry(t);
        polynomial_terms(delta_modip, delta_lon, MAX_DEGREE)
            .iter()
            .zip(Self::coefficients(t).iter())
            .map(|(term, c)| term * c)
            .sum()
    }
    /// True biases
    pub fn biases(&self) -> HashMap<ArcId, f64> {
        self.arcs.iter().map(|arc| (arc.id(), arc.bias)).collect()
    }
    /// Vertical equations, as calibration preprocessing would produce them
    pub fn calibration_samples(&self, noise: f64, seed: u64) -> Vec<CalibrationSample> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut samples = Vec::new();
        for arc in self.arcs.iter() {
            let id = arc.id();
            for t in arc.first..arc.last {
                let (elevation, delta_lon, delta_modip) = arc.geometry(t);
                let mapping = mapping_function(elevation, H_IPP);
                samples.push(CalibrationSample {
                    epoch: epoch(t),
                    arc: id.clone(),
                    delta_modip,
                    delta_lon,
                    mapping,
                    gflc_vert: self.vtec(arc, t) + arc.bias * mapping + gaussian(&mut rng, noise),
                });
            }
        }
        samples
    }
    /// Observation table. The receiver is located at (0°, 0°) and
    /// the MoDip is `0.01 * latitude`, so the pierce point latitude is `100 Δmodip`.
    pub fn observations(&self, code_noise: f64, seed: u64) -> Vec<Observation> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut observations = Vec::new();
        for arc in self.arcs.iter() {
            for t in arc.first..arc.last {
                let (elevation, delta_lon, delta_modip) = arc.geometry(t);
                let stec = self.vtec(arc, t) / mapping_function(elevation, H_IPP);

                let (phase_slip, mw_slip) = if arc.slipped(t) {
                    (PHASE_SLIP, MW_SLIP)
                } else {
                    (0.0, 0.0)
                };

                observations.push(
                    Observation::new(arc.sv, epoch(t))
                        .with_mw(arc.mw + mw_slip)
                        .with_geometry_free(
                            stec + arc.ambiguity + phase_slip,
                            stec + arc.bias + gaussian(&mut rng, code_noise),
                        )
                        .with_elevation(elevation)
                        .with_ipp(delta_lon, 100.0 * delta_modip),
                );
            }
        }
        // receivers sample all vehicles at once
        observations.sort_by_key(|obs| (obs.epoch, obs.sv));
        observations
    }
    /// Returns true vertical TEC of this (SV, epoch index)
    pub fn true_vtec(&self, sv: SV, t: usize) -> Option<f64> {
        self.arcs
            .iter()
            .find(|arc| arc.sv == sv && t >= arc.first && t < arc.last)
            .map(|arc| self.vtec(arc, t))
    }
}
