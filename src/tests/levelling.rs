// Jump removal and phase to code levelling
#[cfg(test)]
mod levelling {
    use crate::{
        prelude::*,
        tests::toolkit::{assert_close, epoch, gaussian, gps},
    };
    use rand::{rngs::StdRng, SeedableRng};

    /// Smooth ionospheric trend plus noise, one injected step
    fn stepped_series(len: usize, step_at: usize, step: f64) -> Vec<Option<f64>> {
        let mut rng = StdRng::seed_from_u64(42);
        (0..len)
            .map(|i| {
                let trend = 30.0 + 5.0 * (i as f64 / 50.0).sin();
                let offset = if i >= step_at { step } else { 0.0 };
                Some(trend + offset + gaussian(&mut rng, 0.05))
            })
            .collect()
    }

    #[test]
    fn flagged_step_removal() {
        let (len, step_at, step) = (120, 57, 123.456);
        let values = stepped_series(len, step_at, step);
        let mut cycle_slips = vec![Some(false); len];
        cycle_slips[step_at] = Some(true);

        let leveler = JumpLeveler::default();
        let levelled = leveler.level_series(&values, &cycle_slips);

        let levelled = levelled.into_iter().flatten().collect::<Vec<_>>();
        assert_eq!(levelled.len(), len);

        // the step is gone: the levelled variation is null at the slip
        let delta = levelled[step_at] - levelled[step_at - 1];
        assert!(
            delta.abs() < 1.0E-9 * step,
            "residual variation {} at slip",
            delta
        );

        // before the slip, nothing changed
        for i in 0..step_at {
            assert_eq!(Some(levelled[i]), values[i]);
        }
        // after, the signal is offset but trend and noise are preserved
        let offset = values[step_at].unwrap_or_default() - levelled[step_at];
        for i in step_at..len {
            assert_close(
                values[i].unwrap_or_default() - levelled[i],
                offset,
                1.0E-9,
                "post slip offset",
            );
        }
    }

    #[test]
    fn unflagged_large_jump() {
        let values = stepped_series(100, 30, -15.0);
        let cycle_slips = vec![Some(false); 100];
        let levelled = JumpLeveler::default().level_series(&values, &cycle_slips);
        let jumps = levelled
            .windows(2)
            .filter_map(|w| match (w[0], w[1]) {
                (Some(a), Some(b)) => Some((b - a).abs()),
                _ => None,
            })
            .fold(0.0_f64, f64::max);
        assert!(jumps < 1.0, "remaining jump {}", jumps);

        // below threshold, nothing to do
        let values = stepped_series(100, 30, 5.0);
        assert_eq!(
            JumpLeveler::default().level_series(&values, &cycle_slips),
            values
        );
    }

    #[test]
    fn idempotence() {
        let len = 200;
        let values = stepped_series(len, 120, 48.0);
        let mut cycle_slips = vec![Some(false); len];
        cycle_slips[120] = Some(true);

        let leveler = JumpLeveler::default();
        let once = leveler.level_series(&values, &cycle_slips);

        // no new slip
        let no_slips = vec![Some(false); len];
        let twice = leveler.level_series(&once, &no_slips);

        for (a, b) in once.iter().zip(twice.iter()) {
            assert_close(
                a.unwrap_or_default(),
                b.unwrap_or_default(),
                1.0E-12,
                "levelling is not idempotent",
            );
        }
    }

    fn arc_records(sv: SV, len: usize, valid: bool) -> Vec<TecRecord> {
        let id = ArcId::new(None, sv, epoch(0), 1);
        (0..len)
            .map(|i| {
                let step = if i >= 10 { 40.0 } else { 0.0 };
                let phase = 100.0 + i as f64 + step;
                let code = 20.0 + i as f64 + if i % 2 == 0 { 0.5 } else { -0.5 };
                let obs = Observation::new(sv, epoch(i))
                    .with_mw(1.0)
                    .with_geometry_free(phase, code);
                let mut rec = TecRecord::new(obs);
                rec.is_cycle_slip = Some(i == 10);
                rec.id_arc = Some(id.clone());
                if valid {
                    rec.id_arc_valid = Some(id.clone());
                }
                rec
            })
            .collect()
    }

    #[test]
    fn record_levelling() {
        let mut records = arc_records(gps(1), 20, true);
        records.extend(arc_records(gps(2), 20, false));

        JumpLeveler::default().level(&mut records);
        PhaseCodeLeveler::default().level(&mut records);

        for (i, rec) in records.iter().take(20).enumerate() {
            assert_eq!(
                rec.fixed(LinearCombination::GfPhase),
                Some(100.0 + i as f64 - if i >= 10 { 1.0 } else { 0.0 }),
                "phase_fix @{}",
                i
            );
            let levelled = rec.gflc_levelled.unwrap_or_default();
            let code = rec.fixed(LinearCombination::GfCode).unwrap_or_default();
            assert!(
                (levelled - code).abs() < 1.5,
                "levelled phase too far from code @{}",
                i
            );
        }

        let levelled = records
            .iter()
            .take(20)
            .filter_map(|rec| {
                let phase = rec.gflc_levelled?;
                let code = rec.fixed(LinearCombination::GfCode)?;
                Some(phase - code)
            })
            .collect::<Vec<_>>();

        let mean = levelled.iter().sum::<f64>() / levelled.len() as f64;
        assert_close(mean, 0.0, 1.0E-9, "levelled phase is not anchored to the code");

        // invalid arc: raw copy, no levelling
        for rec in records.iter().skip(20) {
            assert_eq!(
                rec.fixed(LinearCombination::GfPhase),
                rec.observation.gflc_phase
            );
            assert_eq!(rec.fixed(LinearCombination::MelbourneWubbena), Some(1.0));
            assert!(rec.gflc_levelled.is_none());
        }
    }
}
