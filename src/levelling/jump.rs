use log::{trace, warn};
use strum::IntoEnumIterator;

use crate::{
    arc::valid_arc_members, cfg::Config, combination::LinearCombination, observation::TecRecord,
};

/// [JumpLeveler] removes the step discontinuities of each combination,
/// within each valid arc. A step is either the epoch to epoch variation
/// at a flagged cycle slip, or any variation larger than `threshold_jump`
/// that was not flagged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpLeveler {
    threshold_jump: f64,
}

impl Default for JumpLeveler {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl JumpLeveler {
    /// Builds a new [JumpLeveler] from [Config]
    pub fn new(cfg: &Config) -> Self {
        Self {
            threshold_jump: cfg.threshold_jump,
        }
    }
    /// Levels one arc. `values` and `cycle_slips` are chronologically sorted
    /// and have the same length. Missing values remain missing and
    /// contribute no jump.
    pub fn level_series(
        &self,
        values: &[Option<f64>],
        cycle_slips: &[Option<bool>],
    ) -> Vec<Option<f64>> {
        let mut offset = 0.0_f64;
        let mut prev = Option::<f64>::None;

        values
            .iter()
            .zip(cycle_slips.iter())
            .enumerate()
            .map(|(i, (value, cycle_slip))| {
                let delta = match (value, prev) {
                    (Some(value), Some(prev)) => Some(value - prev),
                    _ => None,
                };

                if let Some(delta) = delta {
                    match cycle_slip {
                        Some(true) => offset += delta,
                        Some(false) if delta.abs() > self.threshold_jump => {
                            trace!("residual jump {} at index {}", delta, i);
                            offset += delta;
                        },
                        _ => {},
                    }
                }

                prev = *value;
                value.map(|value| value - offset)
            })
            .collect()
    }
    /// Fills the fixed columns of each record, for every combination
    /// that was observed. Records outside valid arcs are copied as is.
    pub fn level(&self, records: &mut [TecRecord]) {
        let combinations = LinearCombination::iter()
            .filter(|lc| {
                records
                    .iter()
                    .any(|rec| rec.observation.combination(*lc).is_some())
            })
            .collect::<Vec<_>>();

        if combinations.is_empty() {
            warn!("no linear combination to level");
            return;
        }

        for rec in records.iter_mut() {
            for lc in combinations.iter() {
                if let Some(value) = rec.observation.combination(*lc) {
                    rec.fixed.insert(*lc, value);
                }
            }
        }

        for (id, indexes) in valid_arc_members(records) {
            let cycle_slips = indexes
                .iter()
                .map(|i| records[*i].is_cycle_slip)
                .collect::<Vec<_>>();

            for lc in combinations.iter() {
                let values = indexes
                    .iter()
                    .map(|i| records[*i].observation.combination(*lc))
                    .collect::<Vec<_>>();

                let levelled = self.level_series(&values, &cycle_slips);

                for (index, value) in indexes.iter().zip(levelled) {
                    match value {
                        Some(value) => {
                            records[*index].fixed.insert(*lc, value);
                        },
                        None => {
                            records[*index].fixed.remove(lc);
                        },
                    }
                }
            }
            trace!("{} - levelled", id);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn missing_values() {
        let leveler = JumpLeveler::default();
        let values = [Some(1.0), None, Some(31.0), Some(32.0)];
        let cs = [Some(false), None, Some(false), Some(false)];
        // the gap hides the variation
        assert_eq!(
            leveler.level_series(&values, &cs),
            vec![Some(1.0), None, Some(31.0), Some(32.0)]
        );
    }
    #[test]
    fn residual_jump() {
        let leveler = JumpLeveler::default();
        let values = [Some(1.0), Some(2.0), Some(22.0), Some(23.0), Some(24.0)];
        let cs = [Some(false); 5];
        assert_eq!(
            leveler.level_series(&values, &cs),
            vec![Some(1.0), Some(2.0), Some(2.0), Some(3.0), Some(4.0)]
        );
    }
    #[test]
    fn flagged_small_jump() {
        let leveler = JumpLeveler::default();
        let values = [Some(1.0), Some(4.0), Some(5.0)];
        let cs = [Some(false), Some(true), Some(false)];
        assert_eq!(
            leveler.level_series(&values, &cs),
            vec![Some(1.0), Some(1.0), Some(2.0)]
        );
    }
}
