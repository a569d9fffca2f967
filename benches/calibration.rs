//! Benchmarking of cycle slip detection & bias estimation,
//! on a synthetic receiver tracking 10 vehicles for 6 hours
extern crate criterion;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gnss_tec::prelude::*;

const NUM_VEHICLES: u8 = 10;
const NUM_EPOCHS: usize = 720;

fn t0() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(2024, 1, 1)
}

fn epoch(index: usize) -> Epoch {
    t0() + Duration::from_seconds(index as f64 * 30.0)
}

fn observations() -> Vec<Observation> {
    let mut observations = Vec::new();
    for t in 0..NUM_EPOCHS {
        for prn in 1..=NUM_VEHICLES {
            let sv = SV::new(Constellation::GPS, prn);
            let phase = (t as f64 * 0.01 + prn as f64).sin();
            observations.push(
                Observation::new(sv, epoch(t))
                    .with_mw(2.0 + 0.1 * phase)
                    .with_geometry_free(40.0 + phase, 45.0 + phase),
            );
        }
    }
    observations
}

fn samples() -> Vec<CalibrationSample> {
    let mut samples = Vec::new();
    for prn in 1..=NUM_VEHICLES {
        let sv = SV::new(Constellation::GPS, prn);
        let arc = ArcId::new(None, sv, t0(), 1);
        let azimuth = prn as f64 * 0.6;
        for t in 0..NUM_EPOCHS {
            let frac = t as f64 / NUM_EPOCHS as f64;
            let elevation = 15.0 + 70.0 * (std::f64::consts::PI * frac).sin();
            let obliquity = 1.0 - elevation / 90.0;
            let mapping = mapping_function(elevation, 350_000.0);
            samples.push(CalibrationSample {
                epoch: epoch(t),
                arc: arc.clone(),
                delta_modip: 0.3 * (azimuth + frac).sin() * obliquity,
                delta_lon: 10.0 * (azimuth + frac).cos() * obliquity,
                mapping,
                gflc_vert: 20.0 + 10.0 * frac + prn as f64 * mapping,
            });
        }
    }
    samples
}

fn benchmark(c: &mut Criterion) {
    let ctx = Context::new((4_027_893.0, 307_045.0, 4_919_475.0), &[Constellation::GPS]).unwrap();

    let mut cs_grp = c.benchmark_group("cycle-slips");
    let observations = observations();
    let detector = CycleSlipDetector::default();

    cs_grp.bench_function("mw-detection", |b| {
        b.iter(|| {
            black_box(detector.detect(&observations, &ctx).unwrap());
        })
    });

    cs_grp.finish();

    let mut calibration_grp = c.benchmark_group("calibration");
    let samples = samples();

    for (name, aggregation) in [
        ("first-per-arc", BatchAggregation::FirstPerArc),
        ("all-epochs", BatchAggregation::AllEpochs),
    ] {
        let cfg = Config::default().with_aggregation(aggregation);
        let estimator = BiasEstimator::new(&cfg);
        calibration_grp.bench_function(name, |b| {
            b.iter(|| {
                black_box(estimator.estimate(&samples).unwrap());
            })
        });
    }

    calibration_grp.finish();
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
