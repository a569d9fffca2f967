//! Test toolkit
mod scenario;

pub use scenario::{Scenario, SyntheticArc};

use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::prelude::{Constellation, Duration, Epoch, Observation, SV};

/// Sampling period of every synthetic time series
pub const SAMPLING_PERIOD_S: f64 = 30.0;

/// GPS vehicle
pub fn gps(prn: u8) -> SV {
    SV::new(Constellation::GPS, prn)
}

/// Reference [Epoch] of every synthetic time series
pub fn t0() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(2024, 1, 1)
}

/// [Epoch] of this sampling index
pub fn epoch(index: usize) -> Epoch {
    t0() + Duration::from_seconds(index as f64 * SAMPLING_PERIOD_S)
}

/// Builds MW only observations, sampled at these offsets [s]
pub fn mw_observations(sv: SV, values: &[Option<f64>], offsets_s: &[f64]) -> Vec<Observation> {
    values
        .iter()
        .zip(offsets_s.iter())
        .map(|(mw, offset)| {
            let obs = Observation::new(sv, t0() + Duration::from_seconds(*offset));
            match mw {
                Some(mw) => obs.with_mw(*mw),
                None => obs,
            }
        })
        .collect()
}

/// Zero mean gaussian noise
pub fn gaussian(rng: &mut StdRng, sigma: f64) -> f64 {
    let normal = Normal::new(0.0, sigma).unwrap();
    normal.sample(rng)
}

/// Panics if `value` is not within `tolerance` of `expected`
pub fn assert_close(value: f64, expected: f64, tolerance: f64, what: &str) {
    let err = (value - expected).abs();
    if err > tolerance {
        panic!(
            "{}: {} != {} (error={}, tolerance={})",
            what, value, expected, err, tolerance
        );
    }
}
