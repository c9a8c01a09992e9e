//! Mission entity - an ordered, positioned sub-task with geolocation, a
//! riddle, an answer word, prerequisite missions and its own block list.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::{Block, LocalId, MissionId};

/// A mission in the scenario's ordered list.
///
/// `position` values across a scenario's missions are unique and contiguous
/// starting at 1; `reorder` in the edit buffer re-derives them from list
/// order. `prerequisites` holds store-assigned mission ids only — a mission
/// the store has never seen cannot be required by anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub local_id: LocalId,
    pub remote_id: Option<MissionId>,
    pub position: u32,
    pub title: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub riddle_text: String,
    pub answer_word: String,
    pub prerequisites: BTreeSet<MissionId>,
    pub blocks: Vec<Block>,
}

impl Mission {
    /// Fresh mission as created by an editor action.
    pub fn new(local_id: LocalId, position: u32) -> Self {
        Self {
            local_id,
            remote_id: None,
            position,
            title: String::new(),
            latitude: None,
            longitude: None,
            riddle_text: String::new(),
            answer_word: String::new(),
            prerequisites: BTreeSet::new(),
            blocks: Vec::new(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.remote_id.is_some()
    }
}

/// Validate a proposed prerequisite set for one mission against the current
/// mission list: the set must not contain the mission's own id and must not
/// close a cycle through the other missions' prerequisite sets.
///
/// Missions without a remote id cannot participate: nothing can reference
/// them yet.
pub fn validate_prerequisites(
    missions: &[Mission],
    target: LocalId,
    proposed: &BTreeSet<MissionId>,
) -> Result<(), DomainError> {
    let Some(target_mission) = missions.iter().find(|m| m.local_id == target) else {
        return Err(DomainError::not_found("Mission", target.to_string()));
    };

    let Some(target_id) = target_mission.remote_id else {
        // Unreferenced by construction, so any set is acyclic. Still reject a
        // set naming missions the scenario does not contain below.
        return check_membership(missions, proposed);
    };

    if proposed.contains(&target_id) {
        return Err(DomainError::constraint("mission cannot require itself"));
    }
    check_membership(missions, proposed)?;

    // Edge map as it would look after the update, then walk from the
    // proposed ids; reaching the target closes a cycle.
    let mut edges: HashMap<MissionId, &BTreeSet<MissionId>> = missions
        .iter()
        .filter_map(|m| m.remote_id.map(|id| (id, &m.prerequisites)))
        .collect();
    edges.insert(target_id, proposed);

    let mut stack: Vec<MissionId> = proposed.iter().copied().collect();
    let mut seen: HashSet<MissionId> = HashSet::new();
    while let Some(id) = stack.pop() {
        if id == target_id {
            return Err(DomainError::constraint(
                "prerequisites would form a cycle",
            ));
        }
        if !seen.insert(id) {
            continue;
        }
        if let Some(next) = edges.get(&id) {
            stack.extend(next.iter().copied());
        }
    }
    Ok(())
}

fn check_membership(
    missions: &[Mission],
    proposed: &BTreeSet<MissionId>,
) -> Result<(), DomainError> {
    let known: HashSet<MissionId> = missions.iter().filter_map(|m| m.remote_id).collect();
    match proposed.iter().find(|id| !known.contains(id)) {
        Some(unknown) => Err(DomainError::not_found("Mission", unknown.to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persisted(raw: i64) -> Mission {
        let mut mission = Mission::new(LocalId::from_remote(raw), 1);
        mission.remote_id = Some(MissionId::new(raw));
        mission
    }

    fn set(ids: &[i64]) -> BTreeSet<MissionId> {
        ids.iter().copied().map(MissionId::new).collect()
    }

    #[test]
    fn accepts_a_simple_chain() {
        let missions = vec![persisted(1), persisted(2), persisted(3)];
        let result = validate_prerequisites(&missions, LocalId::from_remote(3), &set(&[1, 2]));
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_self_reference() {
        let missions = vec![persisted(1), persisted(2)];
        let err = validate_prerequisites(&missions, LocalId::from_remote(2), &set(&[2]))
            .expect_err("self reference must be rejected");
        assert!(matches!(err, DomainError::Constraint(_)));
    }

    #[test]
    fn rejects_a_two_step_cycle() {
        let mut missions = vec![persisted(1), persisted(2)];
        missions[0].prerequisites = set(&[2]);
        // 1 requires 2; making 2 require 1 closes the loop.
        let err = validate_prerequisites(&missions, LocalId::from_remote(2), &set(&[1]))
            .expect_err("cycle must be rejected");
        assert!(matches!(err, DomainError::Constraint(_)));
    }

    #[test]
    fn rejects_unknown_mission_ids() {
        let missions = vec![persisted(1)];
        let err = validate_prerequisites(&missions, LocalId::from_remote(1), &set(&[99]))
            .expect_err("unknown id must be rejected");
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn unpersisted_mission_accepts_existing_ids() {
        let mut missions = vec![persisted(1)];
        missions.push(Mission::new(LocalId::temp(1), 2));
        let result = validate_prerequisites(&missions, LocalId::temp(1), &set(&[1]));
        assert!(result.is_ok());
    }
}
