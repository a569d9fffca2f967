use log::warn;

use crate::{arc::valid_arc_members, combination::LinearCombination, observation::TecRecord};

/// [PhaseCodeLeveler] anchors the jump free Geometry Free phase to
/// the jump free Geometry Free code, by removing the mean phase/code
/// difference of each valid arc.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PhaseCodeLeveler {}

impl PhaseCodeLeveler {
    /// Levels one arc. Returns the levelled phase, which is missing
    /// wherever the phase is missing, or when no phase/code pair exists.
    pub fn level_series(&self, phase: &[Option<f64>], code: &[Option<f64>]) -> Vec<Option<f64>> {
        let (sum, count) = phase
            .iter()
            .zip(code.iter())
            .filter_map(|(phase, code)| match (phase, code) {
                (Some(phase), Some(code)) => Some(phase - code),
                _ => None,
            })
            .fold((0.0_f64, 0_usize), |(sum, count), diff| (sum + diff, count + 1));

        if count == 0 {
            return vec![None; phase.len()];
        }

        let mean = sum / count as f64;
        phase.iter().map(|phase| phase.map(|p| p - mean)).collect()
    }
    /// Fills `gflc_levelled` for each record of a valid arc,
    /// jump free columns being already resolved.
    /// Records are left untouched when either jump free column is missing.
    pub fn level(&self, records: &mut [TecRecord]) {
        let available = |lc: LinearCombination| records.iter().any(|rec| rec.fixed(lc).is_some());

        if !available(LinearCombination::GfPhase) || !available(LinearCombination::GfCode) {
            warn!("missing jump free geometry free phase and code: cannot level phase to code");
            return;
        }

        for rec in records.iter_mut() {
            rec.gflc_levelled = None;
        }

        for (_, indexes) in valid_arc_members(records) {
            let phase = indexes
                .iter()
                .map(|i| records[*i].fixed(LinearCombination::GfPhase))
                .collect::<Vec<_>>();

            let code = indexes
                .iter()
                .map(|i| records[*i].fixed(LinearCombination::GfCode))
                .collect::<Vec<_>>();

            for (index, levelled) in indexes.iter().zip(self.level_series(&phase, &code)) {
                records[*index].gflc_levelled = levelled;
            }
        }
    }
}
