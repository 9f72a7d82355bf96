//! Lane and cell selection state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::path::TreePath;

/// One selected cycle of one signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellSelection {
    pub path: TreePath,
    pub cycle: usize,
    pub signal_name: String,
}

impl CellSelection {
    pub fn new(path: TreePath, cycle: usize, signal_name: impl Into<String>) -> Self {
        Self {
            path,
            cycle,
            signal_name: signal_name.into(),
        }
    }
}

/// Set of selected signal lanes, ordered by tree position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneSelection {
    lanes: BTreeSet<TreePath>,
}

impl LaneSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, lane: TreePath) {
        self.lanes.insert(lane);
    }

    pub fn deselect(&mut self, lane: &TreePath) {
        self.lanes.remove(lane);
    }

    /// Flip membership; returns whether the lane is selected afterwards.
    pub fn toggle(&mut self, lane: TreePath) -> bool {
        if self.lanes.remove(&lane) {
            false
        } else {
            self.lanes.insert(lane);
            true
        }
    }

    pub fn clear(&mut self) {
        self.lanes.clear();
    }

    /// Replace the whole selection.
    pub fn set(&mut self, lanes: impl IntoIterator<Item = TreePath>) {
        self.lanes = lanes.into_iter().collect();
    }

    pub fn contains(&self, lane: &TreePath) -> bool {
        self.lanes.contains(lane)
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreePath> {
        self.lanes.iter()
    }
}

impl FromIterator<TreePath> for LaneSelection {
    fn from_iter<I: IntoIterator<Item = TreePath>>(iter: I) -> Self {
        Self {
            lanes: iter.into_iter().collect(),
        }
    }
}
