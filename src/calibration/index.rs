use std::collections::HashMap;

use crate::arc::ArcId;

/// [GlobalArcIndex] assigns a global column to each arc, in first-seen order.
/// Indexes are never reassigned.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GlobalArcIndex {
    arcs: Vec<ArcId>,
    lookup: HashMap<ArcId, usize>,
}

impl GlobalArcIndex {
    /// Returns column index of this arc, which is allocated on first encounter
    pub fn insert(&mut self, arc: &ArcId) -> usize {
        if let Some(index) = self.lookup.get(arc) {
            return *index;
        }
        let index = self.arcs.len();
        self.arcs.push(arc.clone());
        self.lookup.insert(arc.clone(), index);
        index
    }
    /// Returns column index of this arc, if it was encountered
    pub fn get(&self, arc: &ArcId) -> Option<usize> {
        self.lookup.get(arc).copied()
    }
    /// Returns arc at this column
    pub fn arc(&self, index: usize) -> Option<&ArcId> {
        self.arcs.get(index)
    }
    /// Number of indexed arcs
    pub fn len(&self) -> usize {
        self.arcs.len()
    }
    /// True if no arc was indexed
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }
    /// Iterates arcs in column order
    pub fn iter(&self) -> impl Iterator<Item = &ArcId> + '_ {
        self.arcs.iter()
    }
}
