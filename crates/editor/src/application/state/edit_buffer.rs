//! Edit Buffer - the in-memory working tree.
//!
//! Holds the scenario list, the selected scenario's detail, the parallel
//! mission and commune lists, and the two deletion queues recording
//! persisted entities removed locally but not yet purged remotely. All
//! mutations here are pure (no network); operations that must talk to the
//! store live in the application services.

use std::collections::BTreeSet;

use thiserror::Error;

use trailbldr_domain::{
    normalized_name, validate_prerequisites, Block, BlockId, BlockKind, Commune, CommuneId,
    DomainError, LocalId, Mission, MissionId, ScenarioDetail, ScenarioSummary, MAX_COMMUNES,
};
use trailbldr_shared::normalize;
use trailbldr_shared::responses::{CommuneRecord, ScenarioFullResponse};

/// Which working list a block lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockBucket {
    Intro,
    Outro,
    Mission(LocalId),
}

/// Why a commune selection was refused. Rendered to the user verbatim.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CommuneSelectError {
    #[error("No commune matches that name")]
    NotFound,
    #[error("Commune already selected")]
    AlreadySelected,
    #[error("At most {} communes can be selected", MAX_COMMUNES)]
    LimitReached,
}

/// The in-memory working tree plus its deletion queues.
///
/// `last_error` is the single shared error slot: each failure overwrites
/// the previous one, and the UI surfaces whatever is there as a transient
/// message.
#[derive(Debug, Default)]
pub struct EditBuffer {
    pub scenarios: Vec<ScenarioSummary>,
    pub loading: bool,
    pub selected: Option<ScenarioSummary>,
    pub detail: Option<ScenarioDetail>,
    pub details_loading: bool,
    pub details_error: Option<String>,
    pub missions: Vec<Mission>,
    pub communes: Vec<Commune>,
    pub commune_error: Option<CommuneSelectError>,
    pub last_error: Option<String>,
    pub deleted_mission_ids: Vec<MissionId>,
    pub deleted_block_ids: Vec<BlockId>,
    next_temp: u32,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure into the shared error slot; the next failure
    /// overwrites it.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    /// Allocate a key for a locally-created entity. Strictly negative, so
    /// it can never collide with a store-assigned id.
    pub fn alloc_local_id(&mut self) -> LocalId {
        self.next_temp += 1;
        LocalId::temp(self.next_temp)
    }

    pub fn has_loaded_detail(&self) -> bool {
        self.detail.is_some()
    }

    // === Communes ===

    /// Select a commune by name against the shape catalog. Matching is
    /// case-insensitive and whitespace-insensitive over the catalog's
    /// GeoJSON names. Refusals set `commune_error` and leave the selection
    /// unchanged; success appends and clears the error.
    pub fn add_commune(&mut self, name: &str, catalog: &[CommuneRecord]) {
        if name.trim().is_empty() {
            return;
        }
        let wanted = normalized_name(name);
        let found = catalog
            .iter()
            .find(|shape| {
                shape
                    .geojson_name()
                    .is_some_and(|n| normalized_name(n) == wanted)
            })
            .and_then(normalize::commune_from_record);
        let Some(commune) = found else {
            self.commune_error = Some(CommuneSelectError::NotFound);
            return;
        };
        if self.communes.iter().any(|c| c.id == commune.id) {
            self.commune_error = Some(CommuneSelectError::AlreadySelected);
            return;
        }
        if self.communes.len() >= MAX_COMMUNES {
            self.commune_error = Some(CommuneSelectError::LimitReached);
            return;
        }
        self.communes.push(commune);
        self.commune_error = None;
    }

    /// Unconditional removal by id; always clears the commune error.
    pub fn remove_commune(&mut self, id: CommuneId) {
        self.communes.retain(|c| c.id != id);
        self.commune_error = None;
    }

    pub fn is_commune_selected(&self, id: CommuneId) -> bool {
        self.communes.iter().any(|c| c.id == id)
    }

    /// Display name for a commune id, from the catalog when it knows it.
    pub fn commune_name(id: CommuneId, catalog: &[CommuneRecord]) -> String {
        catalog
            .iter()
            .find(|shape| shape.remote_id() == Some(id.as_i64()))
            .and_then(|shape| shape.geojson_name())
            .map(str::to_string)
            .unwrap_or_else(|| Commune::fallback_name(id))
    }

    /// Replace the selection wholesale, resolving each id against the
    /// catalog and falling back to a placeholder for unknown ids.
    pub fn set_selected_communes(&mut self, ids: &[CommuneId], catalog: &[CommuneRecord]) {
        self.communes = ids
            .iter()
            .map(|id| {
                catalog
                    .iter()
                    .find(|shape| shape.remote_id() == Some(id.as_i64()))
                    .and_then(normalize::commune_from_record)
                    .unwrap_or_else(|| Commune::placeholder(*id))
            })
            .collect();
    }

    // === Missions ===

    pub fn mission(&self, key: LocalId) -> Option<&Mission> {
        self.missions.iter().find(|m| m.local_id == key)
    }

    pub fn mission_mut(&mut self, key: LocalId) -> Option<&mut Mission> {
        self.missions.iter_mut().find(|m| m.local_id == key)
    }

    /// Append a fresh mission at the end of the list.
    pub fn add_mission(&mut self) -> LocalId {
        let local_id = self.alloc_local_id();
        let position = self.missions.len() as u32 + 1;
        self.missions.push(Mission::new(local_id, position));
        local_id
    }

    /// Remove a mission from the working list. If the store already knows
    /// it, its id is queued for the deferred delete sweep; an unpersisted
    /// mission is silently dropped.
    pub fn remove_mission(&mut self, key: LocalId) {
        if let Some(index) = self.missions.iter().position(|m| m.local_id == key) {
            let mission = self.missions.remove(index);
            if let Some(id) = mission.remote_id {
                self.deleted_mission_ids.push(id);
            }
        }
    }

    /// Replace the mission list wholesale and re-derive each position from
    /// its new array index (1-based). Purely local; the order reaches the
    /// store in the orchestrator's order-push phase.
    pub fn reorder_missions(&mut self, new_order: Vec<Mission>) {
        self.missions = new_order;
        for (index, mission) in self.missions.iter_mut().enumerate() {
            mission.position = index as u32 + 1;
        }
    }

    /// Replace a mission's prerequisite set, refusing self-references and
    /// sets that would close a cycle.
    pub fn set_prerequisites(
        &mut self,
        key: LocalId,
        prerequisites: BTreeSet<MissionId>,
    ) -> Result<(), DomainError> {
        validate_prerequisites(&self.missions, key, &prerequisites)?;
        if let Some(mission) = self.mission_mut(key) {
            mission.prerequisites = prerequisites;
        }
        Ok(())
    }

    // === Blocks ===

    pub fn blocks(&self, bucket: BlockBucket) -> Option<&Vec<Block>> {
        match bucket {
            BlockBucket::Intro => self.detail.as_ref().map(|d| &d.intro_blocks),
            BlockBucket::Outro => self.detail.as_ref().map(|d| &d.outro_blocks),
            BlockBucket::Mission(key) => self.mission(key).map(|m| &m.blocks),
        }
    }

    pub fn blocks_mut(&mut self, bucket: BlockBucket) -> Option<&mut Vec<Block>> {
        match bucket {
            BlockBucket::Intro => self.detail.as_mut().map(|d| &mut d.intro_blocks),
            BlockBucket::Outro => self.detail.as_mut().map(|d| &mut d.outro_blocks),
            BlockBucket::Mission(key) => self.mission_mut(key).map(|m| &mut m.blocks),
        }
    }

    /// Append a block that only exists locally (temp id, no remote call).
    pub fn push_new_block(&mut self, bucket: BlockBucket, kind: BlockKind) -> Option<LocalId> {
        let local_id = self.alloc_local_id();
        let list = self.blocks_mut(bucket)?;
        list.push(Block::new(local_id, kind));
        Some(local_id)
    }

    /// Append a block the store just created, merging the returned id into
    /// both identity slots.
    pub fn push_created_block(
        &mut self,
        bucket: BlockBucket,
        kind: BlockKind,
        id: BlockId,
    ) -> Option<LocalId> {
        let list = self.blocks_mut(bucket)?;
        let local_id = LocalId::from_remote(id.as_i64());
        let mut block = Block::new(local_id, kind);
        block.remote_id = Some(id);
        list.push(block);
        Some(local_id)
    }

    /// Remove a block from its bucket. If the store already knows it, its
    /// id is queued for the deferred delete sweep.
    pub fn remove_block(&mut self, bucket: BlockBucket, key: LocalId) {
        let mut tombstone = None;
        if let Some(list) = self.blocks_mut(bucket) {
            if let Some(index) = list.iter().position(|b| b.local_id == key) {
                tombstone = list.remove(index).remote_id;
            }
        }
        if let Some(id) = tombstone {
            self.deleted_block_ids.push(id);
        }
    }

    // === Replacement from server truth ===

    /// Replace detail, missions and communes with the normalized form of a
    /// freshly-loaded full document.
    pub fn apply_full_response(
        &mut self,
        summary: &ScenarioSummary,
        response: &ScenarioFullResponse,
    ) {
        let normalize::NormalizedScenario {
            detail,
            missions,
            communes,
        } = normalize::scenario_from_response(summary, response);
        self.detail = Some(detail);
        self.missions = missions;
        self.communes = communes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailbldr_domain::ScenarioId;

    fn catalog() -> Vec<CommuneRecord> {
        serde_json::from_value(serde_json::json!([
            {"id": 1, "geojson": {"properties": {"name_fr": "Bruxelles"}}},
            {"id": 2, "geojson": {"properties": {"name_fr": "Ixelles"}}},
            {"id": 3, "geojson": {"properties": {"name_fr": "Uccle"}}},
            {"id": 4, "geojson": {"properties": {"name_fr": "Namur"}}},
        ]))
        .expect("catalog deserializes")
    }

    fn buffer_with_detail() -> EditBuffer {
        let mut buffer = EditBuffer::new();
        buffer.detail = Some(ScenarioDetail {
            id: ScenarioId::new(1),
            title: "Test".into(),
            published: false,
            intro_blocks: Vec::new(),
            outro_blocks: Vec::new(),
        });
        buffer
    }

    #[test]
    fn add_commune_matches_despite_case_and_whitespace() {
        let mut buffer = EditBuffer::new();
        buffer.add_commune("bruxelles ", &catalog());
        assert_eq!(buffer.commune_error, None);
        assert_eq!(buffer.communes.len(), 1);
        assert_eq!(buffer.communes[0].id, CommuneId::new(1));
        assert_eq!(buffer.communes[0].name_fr, "Bruxelles");
    }

    #[test]
    fn add_commune_rejects_a_duplicate_and_keeps_the_selection() {
        let mut buffer = EditBuffer::new();
        buffer.add_commune("Bruxelles", &catalog());
        buffer.add_commune("BRUXELLES", &catalog());
        assert_eq!(buffer.commune_error, Some(CommuneSelectError::AlreadySelected));
        assert_eq!(buffer.communes.len(), 1);
    }

    #[test]
    fn add_commune_rejects_an_unknown_name() {
        let mut buffer = EditBuffer::new();
        buffer.add_commune("Atlantis", &catalog());
        assert_eq!(buffer.commune_error, Some(CommuneSelectError::NotFound));
        assert!(buffer.communes.is_empty());
    }

    #[test]
    fn add_commune_enforces_the_selection_limit() {
        let mut buffer = EditBuffer::new();
        buffer.add_commune("Bruxelles", &catalog());
        buffer.add_commune("Ixelles", &catalog());
        buffer.add_commune("Uccle", &catalog());
        buffer.add_commune("Namur", &catalog());
        assert_eq!(buffer.commune_error, Some(CommuneSelectError::LimitReached));
        assert_eq!(buffer.communes.len(), MAX_COMMUNES);
    }

    #[test]
    fn remove_commune_clears_the_error() {
        let mut buffer = EditBuffer::new();
        buffer.add_commune("Bruxelles", &catalog());
        buffer.add_commune("Atlantis", &catalog());
        assert!(buffer.commune_error.is_some());
        buffer.remove_commune(CommuneId::new(1));
        assert!(buffer.communes.is_empty());
        assert_eq!(buffer.commune_error, None);
    }

    #[test]
    fn commune_name_falls_back_for_unknown_ids() {
        assert_eq!(
            EditBuffer::commune_name(CommuneId::new(2), &catalog()),
            "Ixelles"
        );
        assert_eq!(
            EditBuffer::commune_name(CommuneId::new(99), &catalog()),
            "Commune 99"
        );
    }

    #[test]
    fn set_selected_communes_resolves_against_the_catalog() {
        let mut buffer = EditBuffer::new();
        buffer.set_selected_communes(&[CommuneId::new(2), CommuneId::new(99)], &catalog());
        assert_eq!(buffer.communes.len(), 2);
        assert_eq!(buffer.communes[0].name_fr, "Ixelles");
        assert_eq!(buffer.communes[1].name_fr, "Commune 99");
    }

    #[test]
    fn removing_a_persisted_mission_queues_its_id() {
        let mut buffer = EditBuffer::new();
        let mut mission = Mission::new(LocalId::from_remote(7), 1);
        mission.remote_id = Some(MissionId::new(7));
        buffer.missions.push(mission);

        buffer.remove_mission(LocalId::from_remote(7));
        assert!(buffer.missions.is_empty());
        assert_eq!(buffer.deleted_mission_ids, vec![MissionId::new(7)]);
    }

    #[test]
    fn removing_an_unpersisted_mission_is_silently_dropped() {
        let mut buffer = EditBuffer::new();
        let key = buffer.add_mission();
        buffer.remove_mission(key);
        assert!(buffer.missions.is_empty());
        assert!(buffer.deleted_mission_ids.is_empty());
    }

    #[test]
    fn reorder_missions_rederives_one_based_positions() {
        let mut buffer = EditBuffer::new();
        let a = Mission::new(LocalId::from_remote(1), 1);
        let b = Mission::new(LocalId::from_remote(2), 2);
        buffer.missions = vec![a.clone(), b.clone()];

        buffer.reorder_missions(vec![b, a]);
        assert_eq!(buffer.missions[0].local_id, LocalId::from_remote(2));
        assert_eq!(buffer.missions[0].position, 1);
        assert_eq!(buffer.missions[1].position, 2);
    }

    #[test]
    fn removing_a_persisted_block_queues_its_id() {
        let mut buffer = buffer_with_detail();
        let created = buffer
            .push_created_block(BlockBucket::Intro, BlockKind::Text, BlockId::new(42))
            .expect("detail is loaded");
        buffer.remove_block(BlockBucket::Intro, created);
        assert!(buffer.detail.as_ref().expect("detail").intro_blocks.is_empty());
        assert_eq!(buffer.deleted_block_ids, vec![BlockId::new(42)]);
    }

    #[test]
    fn removing_a_local_only_block_leaves_the_queue_empty() {
        let mut buffer = EditBuffer::new();
        let key = buffer.add_mission();
        let block_key = buffer
            .push_new_block(BlockBucket::Mission(key), BlockKind::Image)
            .expect("mission exists");
        buffer.remove_block(BlockBucket::Mission(key), block_key);
        assert!(buffer.deleted_block_ids.is_empty());
    }

    #[test]
    fn temp_ids_are_negative_and_unique() {
        let mut buffer = EditBuffer::new();
        let first = buffer.alloc_local_id();
        let second = buffer.alloc_local_id();
        assert!(first.is_temp());
        assert!(second.is_temp());
        assert_ne!(first, second);
    }

    #[test]
    fn set_prerequisites_rejects_a_self_reference() {
        let mut buffer = EditBuffer::new();
        let mut mission = Mission::new(LocalId::from_remote(5), 1);
        mission.remote_id = Some(MissionId::new(5));
        buffer.missions.push(mission);

        let result = buffer.set_prerequisites(
            LocalId::from_remote(5),
            [MissionId::new(5)].into_iter().collect(),
        );
        assert!(result.is_err());
        assert!(buffer.missions[0].prerequisites.is_empty());
    }

    #[test]
    fn set_prerequisites_stores_a_valid_set() {
        let mut buffer = EditBuffer::new();
        for raw in [1, 2] {
            let mut mission = Mission::new(LocalId::from_remote(raw), raw as u32);
            mission.remote_id = Some(MissionId::new(raw));
            buffer.missions.push(mission);
        }
        buffer
            .set_prerequisites(
                LocalId::from_remote(2),
                [MissionId::new(1)].into_iter().collect(),
            )
            .expect("valid set");
        assert!(buffer.missions[1].prerequisites.contains(&MissionId::new(1)));
    }

    #[test]
    fn apply_full_response_replaces_the_working_tree() {
        let mut buffer = EditBuffer::new();
        buffer.missions.push(Mission::new(LocalId::temp(1), 1));
        let summary = ScenarioSummary {
            id: ScenarioId::new(3),
            title: "Loaded".into(),
            published: false,
        };
        let response: ScenarioFullResponse = serde_json::from_value(serde_json::json!({
            "missions": [{"_id_mission": 11, "title_mission": "Only one"}],
            "communes": [{"id": 1, "name_fr": "Bruxelles"}],
            "introBlocks": [{"_id_block": 21, "type_block": "text"}],
        }))
        .expect("deserializes");

        buffer.apply_full_response(&summary, &response);
        assert_eq!(buffer.missions.len(), 1);
        assert_eq!(buffer.missions[0].remote_id, Some(MissionId::new(11)));
        assert_eq!(buffer.communes.len(), 1);
        assert_eq!(
            buffer.detail.as_ref().expect("detail").intro_blocks[0].remote_id,
            Some(BlockId::new(21))
        );
    }
}
