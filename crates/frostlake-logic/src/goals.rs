//! Research goals for a session.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::item::InstrumentKind;

/// Outstanding goals and the results of finished ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goals {
    outstanding: BTreeSet<InstrumentKind>,
    finished: BTreeMap<InstrumentKind, String>,
}

impl Goals {
    pub fn new(kinds: impl IntoIterator<Item = InstrumentKind>) -> Self {
        Self {
            outstanding: kinds.into_iter().collect(),
            finished: BTreeMap::new(),
        }
    }

    pub fn outstanding(&self) -> impl Iterator<Item = InstrumentKind> + '_ {
        self.outstanding.iter().copied()
    }

    /// Finished goals with their result lines.
    pub fn finished(&self) -> impl Iterator<Item = (InstrumentKind, &str)> + '_ {
        self.finished.iter().map(|(k, m)| (*k, m.as_str()))
    }

    pub fn is_outstanding(&self, kind: InstrumentKind) -> bool {
        self.outstanding.contains(&kind)
    }

    pub fn is_complete(&self) -> bool {
        self.outstanding.is_empty()
    }

    pub fn total(&self) -> usize {
        self.outstanding.len() + self.finished.len()
    }

    /// Move `kind` to finished. Returns false if it was not outstanding.
    pub fn finish(&mut self, kind: InstrumentKind, message: String) -> bool {
        if !self.outstanding.remove(&kind) {
            return false;
        }
        self.finished.insert(kind, message);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finishing_moves_goal_once() {
        let mut goals = Goals::new([InstrumentKind::Camera, InstrumentKind::Chisel]);
        assert_eq!(goals.total(), 2);
        assert!(goals.finish(InstrumentKind::Chisel, "Glacial Sampling: 3 gr".into()));
        assert!(!goals.finish(InstrumentKind::Chisel, "again".into()));
        assert!(!goals.finish(InstrumentKind::WindSpeedMeter, "unused".into()));

        assert!(!goals.is_complete());
        assert_eq!(
            goals.finished().collect::<Vec<_>>(),
            vec![(InstrumentKind::Chisel, "Glacial Sampling: 3 gr")]
        );
        assert!(goals.finish(InstrumentKind::Camera, "Camera Placement: ok".into()));
        assert!(goals.is_complete());
        assert_eq!(goals.total(), 2);
    }
}
