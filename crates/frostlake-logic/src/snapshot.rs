//! Serializable read-only view of a session, for renderers and tooling.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::grid::{CliffSide, Position};
use crate::item::Item;
use crate::researcher::ResearcherId;
use crate::session::{Phase, Session};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub position: Position,
    pub item: Option<Item>,
    /// Equipment code when the item is ground equipment.
    pub equipment_code: Option<String>,
    pub occupant: Option<ResearcherId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearcherSnapshot {
    pub id: ResearcherId,
    pub alive: bool,
    pub position: Option<Position>,
    pub bag: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedGoal {
    pub goal: String,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub current: ResearcherId,
    pub columns: usize,
    pub rows: usize,
    pub cliff_side: Option<CliffSide>,
    pub cells: Vec<CellSnapshot>,
    pub researchers: Vec<ResearcherSnapshot>,
    pub outstanding_goals: Vec<String>,
    pub finished_goals: Vec<FinishedGoal>,
    /// Pooled equipment by short code.
    pub pool: BTreeMap<String, usize>,
}

impl SessionSnapshot {
    pub fn capture<R: Rng>(session: &Session<R>) -> Self {
        let grid = session.grid();
        let store = session.store();

        let cells = grid
            .cells()
            .map(|c| CellSnapshot {
                position: c.position(),
                item: c.item(),
                equipment_code: match c.item() {
                    Some(Item::Equipment(id)) => store.kind(id).map(|k| k.code().to_string()),
                    _ => None,
                },
                occupant: c.occupant(),
            })
            .collect();

        let researchers = session
            .researchers()
            .iter()
            .map(|r| ResearcherSnapshot {
                id: r.id(),
                alive: r.is_alive(),
                position: grid.find_occupant(r.id()),
                bag: r.bag().iter().map(|e| e.kind.code().to_string()).collect(),
            })
            .collect();

        let goals = session.goals();
        Self {
            phase: session.phase(),
            current: session.current_researcher().id(),
            columns: grid.columns(),
            rows: grid.rows(),
            cliff_side: grid.cliff_side(),
            cells,
            researchers,
            outstanding_goals: goals
                .outstanding()
                .map(|k| k.goal_text().to_string())
                .collect(),
            finished_goals: goals
                .finished()
                .map(|(k, m)| FinishedGoal {
                    goal: k.goal_text().to_string(),
                    result: m.to_string(),
                })
                .collect(),
            pool: store
                .pool_counts()
                .into_iter()
                .map(|(k, n)| (k.code().to_string(), n))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LakeConfig;

    #[test]
    fn snapshot_serializes_to_json() {
        let session = Session::with_seed(LakeConfig::default(), 11).unwrap();
        let snap = session.snapshot();
        assert_eq!(snap.cells.len(), 130);
        assert_eq!(snap.pool.get("cm"), Some(&2));
        assert_eq!(snap.researchers[0].position, Some(Position::new(1, 6)));

        let json = serde_json::to_string(&snap).unwrap();
        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
