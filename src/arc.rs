//! Tracking arcs
use std::collections::BTreeMap;

use log::debug;

use crate::{
    cfg::Config,
    context::Context,
    observation::TecRecord,
    prelude::{Epoch, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [ArcId] uniquely identifies one arc, formatted as
/// `[receiver_]sv_YYYYMMDD_NNN`, for example `grot_g01_20240101_002`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArcId(String);

impl std::fmt::Display for ArcId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ArcId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl ArcId {
    /// Builds a new [ArcId] for this vehicle, arc start [Epoch]
    /// and arc sequence number (starting at 1)
    pub fn new(receiver: Option<&str>, sv: SV, start: Epoch, sequence: usize) -> Self {
        let (y, m, d, _, _, _, _) = start.to_gregorian_utc();
        let sv = sv.to_string().to_lowercase();
        match receiver {
            Some(receiver) => Self(format!(
                "{}_{}_{:04}{:02}{:02}_{:03}",
                receiver, sv, y, m, d, sequence
            )),
            None => Self(format!("{}_{:04}{:02}{:02}_{:03}", sv, y, m, d, sequence)),
        }
    }
    /// Returns identifier as readable string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An [Arc] is a continuous tracking period of one satellite
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Arc {
    /// Identifier
    pub id: ArcId,
    /// Satellite vehicle
    pub sv: SV,
    /// Sequence number, for this vehicle
    pub sequence: usize,
    /// Member epochs, chronologically sorted
    pub epochs: Vec<Epoch>,
    /// Number of code observations
    pub code_observations: usize,
    /// True when this arc is long enough to be calibrated
    pub valid: bool,
}

impl Arc {
    /// Returns first [Epoch] of this arc
    pub fn start(&self) -> Option<Epoch> {
        self.epochs.first().copied()
    }
    /// Returns last [Epoch] of this arc
    pub fn end(&self) -> Option<Epoch> {
        self.epochs.last().copied()
    }
    /// Number of member epochs
    pub fn len(&self) -> usize {
        self.epochs.len()
    }
    /// True if this arc has no member
    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }
    /// Returns [ArcId] only if this arc may be calibrated
    pub fn valid_id(&self) -> Option<&ArcId> {
        if self.valid {
            Some(&self.id)
        } else {
            None
        }
    }
}

/// Groups record indexes per satellite, chronologically sorted
pub(crate) fn sv_members(records: &[TecRecord]) -> BTreeMap<SV, Vec<usize>> {
    let mut ret = BTreeMap::<SV, Vec<usize>>::new();
    for (index, record) in records.iter().enumerate() {
        ret.entry(record.sv()).or_default().push(index);
    }
    for indexes in ret.values_mut() {
        indexes.sort_by_key(|i| records[*i].epoch());
    }
    ret
}

/// Groups record indexes per valid arc, chronologically sorted
pub(crate) fn valid_arc_members(records: &[TecRecord]) -> BTreeMap<ArcId, Vec<usize>> {
    let mut ret = BTreeMap::<ArcId, Vec<usize>>::new();
    for (index, record) in records.iter().enumerate() {
        if let Some(id) = &record.id_arc_valid {
            ret.entry(id.clone()).or_default().push(index);
        }
    }
    for indexes in ret.values_mut() {
        indexes.sort_by_key(|i| records[*i].epoch());
    }
    ret
}

/// [ArcSegmenter] converts loss of lock events into [Arc]s
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSegmenter {
    min_arc_length: usize,
    receiver: Option<String>,
}

impl ArcSegmenter {
    /// Builds a new [ArcSegmenter]
    pub fn new(cfg: &Config, ctx: &Context) -> Self {
        Self {
            min_arc_length: cfg.min_arc_length,
            receiver: ctx.receiver_name.clone(),
        }
    }
    /// Assigns `id_arc` and `id_arc_valid` to each record,
    /// loss of lock flags being already resolved.
    /// The arc sequence of each satellite is the cumulated number of loss of lock,
    /// up to and including the current epoch, plus one.
    /// Returns all identified [Arc]s, sorted by vehicle then sequence.
    pub fn segment(&self, records: &mut [TecRecord]) -> Vec<Arc> {
        let mut arcs = Vec::<Arc>::new();

        for (sv, indexes) in sv_members(records) {
            // sequence number -> members
            let mut sequences = BTreeMap::<usize, Vec<usize>>::new();
            let mut sequence = 1;
            for index in indexes {
                if records[index].is_loss_of_lock {
                    sequence += 1;
                }
                sequences.entry(sequence).or_default().push(index);
            }

            let (mut total, mut valid_arcs) = (0, 0);

            for (sequence, members) in sequences {
                let epochs = members
                    .iter()
                    .map(|i| records[*i].epoch())
                    .collect::<Vec<_>>();

                let start = match epochs.first() {
                    Some(start) => *start,
                    None => continue,
                };

                let code_observations = members
                    .iter()
                    .filter(|i| records[**i].observation.gflc_code.is_some())
                    .count();

                let valid = code_observations >= self.min_arc_length;
                let id = ArcId::new(self.receiver.as_deref(), sv, start, sequence);

                for index in members.iter() {
                    records[*index].id_arc = Some(id.clone());
                    records[*index].id_arc_valid = if valid { Some(id.clone()) } else { None };
                }

                total += 1;
                if valid {
                    valid_arcs += 1;
                }

                arcs.push(Arc {
                    id,
                    sv,
                    sequence,
                    epochs,
                    code_observations,
                    valid,
                });
            }

            debug!("{} - {} arcs ({} valid)", sv, total, valid_arcs);
        }

        arcs
    }
}
