//! Sync Orchestrator - the full-save protocol.
//!
//! A single entry point drains the edit buffer against the remote store in
//! nine ordered phases. Ordering is load-bearing: block creation needs the
//! mission ids assigned by mission creation, the order pushes need the ids
//! assigned by both create phases, and the terminal reload replaces the
//! buffer with whatever the store now holds.
//!
//! Every phase branches on "remote id present? update : create", so a run
//! interrupted anywhere can simply be re-invoked: already-created entities
//! update, the rest create. Per-item failures are caught, counted and
//! written into the buffer's shared error slot; the run always continues to
//! the end. There is no retry, backoff or cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use trailbldr_domain::{
    Block, BlockId, BlockOwnerKind, LocalId, MissionId, ScenarioId, ScenarioSection,
};
use trailbldr_shared::requests::{
    BlockData, BlockOrderData, CommuneSelectionData, MissionData, PrerequisitesData, ReorderEntry,
};

use crate::application::error::ServiceError;
use crate::application::services::scenario_service::load_and_apply;
use crate::application::state::EditBuffer;
use crate::ports::outbound::ScenarioApiPort;
use crate::session_types::AuthToken;

/// Terminal state of one full save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Done,
    DoneWithErrors { errors: u32 },
}

impl SyncOutcome {
    fn from_count(errors: u32) -> Self {
        if errors == 0 {
            Self::Done
        } else {
            Self::DoneWithErrors { errors }
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Where a block's create call must go once its owner is resolved.
enum ResolvedOwner {
    Scenario(ScenarioId, ScenarioSection),
    Mission(MissionId),
}

/// Bucket the block was found in, as context for owner inference.
enum BucketContext {
    Intro,
    Outro,
    Mission { remote_id: Option<MissionId> },
}

pub struct SyncOrchestrator {
    api: Arc<dyn ScenarioApiPort>,
    running: AtomicBool,
}

/// Clears the run-state token when the run ends, however it ends.
struct RunToken<'a>(&'a AtomicBool);

impl Drop for RunToken<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SyncOrchestrator {
    pub fn new(api: Arc<dyn ScenarioApiPort>) -> Self {
        Self {
            api,
            running: AtomicBool::new(false),
        }
    }

    /// Run the full save. Rejects a second invocation while one is active.
    ///
    /// The deletion flush runs even when no scenario detail is loaded; the
    /// remaining phases need a selected scenario with loaded detail and the
    /// run ends early (cleanly) without them.
    pub async fn save_full(
        &self,
        buffer: &mut EditBuffer,
        token: &AuthToken,
    ) -> Result<SyncOutcome, ServiceError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ServiceError::SyncInProgress);
        }
        let _token = RunToken(&self.running);

        let mut errors = 0u32;
        self.flush_deletions(buffer, token, &mut errors).await;

        let Some(selected) = buffer.selected.clone() else {
            return Ok(SyncOutcome::from_count(errors));
        };
        if buffer.detail.is_none() {
            return Ok(SyncOutcome::from_count(errors));
        }
        let scenario_id = selected.id;
        tracing::debug!(%scenario_id, "starting full save");

        self.create_missions(scenario_id, buffer, token, &mut errors)
            .await;
        self.create_blocks(scenario_id, buffer, token, &mut errors)
            .await;
        self.update_missions(buffer, token, &mut errors).await;
        self.push_prerequisites(buffer, token, &mut errors).await;
        self.push_mission_order(scenario_id, buffer, token, &mut errors)
            .await;
        self.push_communes(scenario_id, buffer, token, &mut errors)
            .await;
        self.update_blocks(buffer, token, &mut errors).await;
        self.push_block_order(scenario_id, buffer, token, &mut errors)
            .await;

        load_and_apply(self.api.as_ref(), buffer, selected, token).await;
        if buffer.details_error.is_some() {
            errors += 1;
        }

        let outcome = SyncOutcome::from_count(errors);
        tracing::debug!(%scenario_id, clean = outcome.is_clean(), "full save finished");
        Ok(outcome)
    }

    /// Phase 1: drain both deletion queues, missions first. Each failed
    /// delete stays queued for the next run.
    async fn flush_deletions(&self, buffer: &mut EditBuffer, token: &AuthToken, errors: &mut u32) {
        let queued_missions = std::mem::take(&mut buffer.deleted_mission_ids);
        for mission_id in queued_missions {
            match self.api.delete_mission(mission_id, token).await {
                Ok(()) => tracing::debug!(%mission_id, "deleted mission"),
                Err(error) => {
                    *errors += 1;
                    tracing::warn!(%error, %mission_id, "deleting mission failed; kept queued");
                    buffer.deleted_mission_ids.push(mission_id);
                    buffer.set_error(format!("Deleting mission {mission_id} failed"));
                }
            }
        }

        let queued_blocks = std::mem::take(&mut buffer.deleted_block_ids);
        for block_id in queued_blocks {
            match self.api.delete_block(block_id, token).await {
                Ok(()) => tracing::debug!(%block_id, "deleted block"),
                Err(error) => {
                    *errors += 1;
                    tracing::warn!(%error, %block_id, "deleting block failed; kept queued");
                    buffer.deleted_block_ids.push(block_id);
                    buffer.set_error(format!("Deleting block {block_id} failed"));
                }
            }
        }
    }

    /// Phase 2: create every mission the store has never seen, one at a
    /// time in list order, writing the returned id into both identity
    /// slots. Sequential on purpose: the block phase addresses missions by
    /// these ids.
    async fn create_missions(
        &self,
        scenario_id: ScenarioId,
        buffer: &mut EditBuffer,
        token: &AuthToken,
        errors: &mut u32,
    ) {
        for index in 0..buffer.missions.len() {
            if buffer.missions[index].remote_id.is_some() {
                continue;
            }
            let data = MissionData::from(&buffer.missions[index]);
            match self.api.create_mission(scenario_id, &data, token).await {
                Ok(mission_id) => {
                    let mission = &mut buffer.missions[index];
                    mission.remote_id = Some(mission_id);
                    mission.local_id = LocalId::from_remote(mission_id.as_i64());
                }
                Err(error) => {
                    *errors += 1;
                    let title = buffer.missions[index].title.clone();
                    tracing::warn!(%error, %title, "creating mission failed");
                    buffer.set_error(format!("Creating mission \"{title}\" failed"));
                }
            }
        }
    }

    /// Phase 3: create every block the store has never seen, resolving its
    /// owner first. A block whose owner cannot be resolved, or whose parent
    /// mission still has no remote id, is skipped with an error and will be
    /// retried by the next full save.
    async fn create_blocks(
        &self,
        scenario_id: ScenarioId,
        buffer: &mut EditBuffer,
        token: &AuthToken,
        errors: &mut u32,
    ) {
        for section in [ScenarioSection::Intro, ScenarioSection::Outro] {
            let count = buffer
                .detail
                .as_ref()
                .map(|d| section_blocks(d, section).len())
                .unwrap_or(0);
            let context = match section {
                ScenarioSection::Intro => BucketContext::Intro,
                ScenarioSection::Outro => BucketContext::Outro,
            };
            for index in 0..count {
                let Some(block) = buffer
                    .detail
                    .as_ref()
                    .map(|d| section_blocks(d, section)[index].clone())
                else {
                    break;
                };
                if block.remote_id.is_some() {
                    continue;
                }
                let created = self
                    .create_one_block(scenario_id, &block, &context, token, buffer, errors)
                    .await;
                if let (Some(block_id), Some(detail)) = (created, buffer.detail.as_mut()) {
                    let slot = &mut section_blocks_mut(detail, section)[index];
                    slot.remote_id = Some(block_id);
                    slot.local_id = LocalId::from_remote(block_id.as_i64());
                }
            }
        }

        for mission_index in 0..buffer.missions.len() {
            for block_index in 0..buffer.missions[mission_index].blocks.len() {
                let block = buffer.missions[mission_index].blocks[block_index].clone();
                if block.remote_id.is_some() {
                    continue;
                }
                let context = BucketContext::Mission {
                    remote_id: buffer.missions[mission_index].remote_id,
                };
                let created = self
                    .create_one_block(scenario_id, &block, &context, token, buffer, errors)
                    .await;
                if let Some(block_id) = created {
                    let slot = &mut buffer.missions[mission_index].blocks[block_index];
                    slot.remote_id = Some(block_id);
                    slot.local_id = LocalId::from_remote(block_id.as_i64());
                }
            }
        }
    }

    /// Resolve one block's owner and issue the matching create call.
    /// Returns the new id on success; on any failure the error slot is set
    /// and `None` comes back.
    async fn create_one_block(
        &self,
        scenario_id: ScenarioId,
        block: &Block,
        context: &BucketContext,
        token: &AuthToken,
        buffer: &mut EditBuffer,
        errors: &mut u32,
    ) -> Option<BlockId> {
        let owner = match resolve_owner(block, context, scenario_id) {
            Ok(owner) => owner,
            Err(reason) => {
                *errors += 1;
                tracing::warn!(block = %block.local_id, reason, "skipping block creation");
                buffer.set_error(reason);
                return None;
            }
        };
        let data = BlockData::from(block);
        let result = match owner {
            ResolvedOwner::Scenario(id, section) => {
                self.api
                    .create_scenario_block(id, section, &data, token)
                    .await
            }
            ResolvedOwner::Mission(id) => self.api.create_mission_block(id, &data, token).await,
        };
        match result {
            Ok(block_id) => Some(block_id),
            Err(error) => {
                *errors += 1;
                tracing::warn!(%error, block = %block.local_id, "creating block failed");
                buffer.set_error("Creating a block failed");
                None
            }
        }
    }

    /// Phase 4: push every persisted mission's mutable fields, whether it
    /// was just created or pre-existing.
    async fn update_missions(&self, buffer: &mut EditBuffer, token: &AuthToken, errors: &mut u32) {
        for index in 0..buffer.missions.len() {
            let Some(mission_id) = buffer.missions[index].remote_id else {
                continue;
            };
            let data = MissionData::from(&buffer.missions[index]);
            if let Err(error) = self.api.update_mission(mission_id, &data, token).await {
                *errors += 1;
                tracing::warn!(%error, %mission_id, "updating mission failed");
                buffer.set_error(format!("Updating mission {mission_id} failed"));
            }
        }
    }

    /// Phase 5: push every persisted mission's prerequisite set as a
    /// numeric id list.
    async fn push_prerequisites(
        &self,
        buffer: &mut EditBuffer,
        token: &AuthToken,
        errors: &mut u32,
    ) {
        for index in 0..buffer.missions.len() {
            let Some(mission_id) = buffer.missions[index].remote_id else {
                continue;
            };
            let data = PrerequisitesData::from(&buffer.missions[index]);
            if let Err(error) = self.api.update_prerequisites(mission_id, &data, token).await {
                *errors += 1;
                tracing::warn!(%error, %mission_id, "updating prerequisites failed");
                buffer.set_error(format!("Updating prerequisites of mission {mission_id} failed"));
            }
        }
    }

    /// Phase 6: push the mission order as one `{id, position}` array
    /// reflecting current list order, 1-based. Missions that still lack a
    /// remote id are filtered out.
    async fn push_mission_order(
        &self,
        scenario_id: ScenarioId,
        buffer: &mut EditBuffer,
        token: &AuthToken,
        errors: &mut u32,
    ) {
        let order: Vec<ReorderEntry> = buffer
            .missions
            .iter()
            .enumerate()
            .filter_map(|(index, mission)| {
                mission.remote_id.map(|id| ReorderEntry {
                    id: id.into(),
                    position: index as u32 + 1,
                })
            })
            .collect();
        if let Err(error) = self.api.reorder_missions(scenario_id, &order, token).await {
            *errors += 1;
            tracing::warn!(%error, %scenario_id, "reordering missions failed");
            buffer.set_error("Reordering missions failed");
        }
    }

    /// Phase 7: replace the remote commune association with the full
    /// current selection.
    async fn push_communes(
        &self,
        scenario_id: ScenarioId,
        buffer: &mut EditBuffer,
        token: &AuthToken,
        errors: &mut u32,
    ) {
        let data = CommuneSelectionData {
            commune_ids: buffer.communes.iter().map(|c| c.id).collect(),
        };
        if let Err(error) = self.api.set_communes(scenario_id, &data, token).await {
            *errors += 1;
            tracing::warn!(%error, %scenario_id, "setting communes failed");
            buffer.set_error("Setting communes failed");
        }
    }

    /// Phase 8: push every persisted block's mutable content fields. Blocks
    /// that still lack a remote id after phase 3 are skipped again.
    async fn update_blocks(&self, buffer: &mut EditBuffer, token: &AuthToken, errors: &mut u32) {
        let mut updates: Vec<(BlockId, BlockData)> = Vec::new();
        if let Some(detail) = buffer.detail.as_ref() {
            for block in detail.intro_blocks.iter().chain(detail.outro_blocks.iter()) {
                if let Some(id) = block.remote_id {
                    updates.push((id, BlockData::from(block)));
                }
            }
        }
        for mission in &buffer.missions {
            for block in &mission.blocks {
                if let Some(id) = block.remote_id {
                    updates.push((id, BlockData::from(block)));
                }
            }
        }
        for (block_id, data) in updates {
            if let Err(error) = self.api.update_block(block_id, &data, token).await {
                *errors += 1;
                tracing::warn!(%error, %block_id, "updating block failed");
                buffer.set_error(format!("Updating block {block_id} failed"));
            }
        }
    }

    /// Phase 9: push block ordering. The intro and outro lists go as plain
    /// id arrays; each mission's list goes as `{id, position}` pairs with
    /// 0-based positions. Blocks without a remote id are filtered out
    /// (defensive skip, not an error) and empty payloads are not sent.
    async fn push_block_order(
        &self,
        scenario_id: ScenarioId,
        buffer: &mut EditBuffer,
        token: &AuthToken,
        errors: &mut u32,
    ) {
        let mut section_orders: Vec<(ScenarioSection, BlockOrderData)> = Vec::new();
        if let Some(detail) = buffer.detail.as_ref() {
            for section in [ScenarioSection::Intro, ScenarioSection::Outro] {
                let blocks = section_blocks(detail, section);
                if blocks.is_empty() {
                    continue;
                }
                let block_ids: Vec<BlockId> =
                    blocks.iter().filter_map(|b| b.remote_id).collect();
                if block_ids.is_empty() {
                    continue;
                }
                section_orders.push((section, BlockOrderData { block_ids }));
            }
        }
        for (section, data) in section_orders {
            if let Err(error) = self
                .api
                .reorder_scenario_blocks(scenario_id, section, &data, token)
                .await
            {
                *errors += 1;
                tracing::warn!(%error, %scenario_id, "reordering scenario blocks failed");
                buffer.set_error("Reordering blocks failed");
            }
        }

        let mission_orders: Vec<(MissionId, Vec<ReorderEntry>)> = buffer
            .missions
            .iter()
            .filter_map(|mission| {
                let mission_id = mission.remote_id?;
                if mission.blocks.is_empty() {
                    return None;
                }
                let entries: Vec<ReorderEntry> = mission
                    .blocks
                    .iter()
                    .enumerate()
                    .filter_map(|(index, block)| {
                        block.remote_id.map(|id| ReorderEntry {
                            id: id.into(),
                            position: index as u32,
                        })
                    })
                    .collect();
                if entries.is_empty() {
                    None
                } else {
                    Some((mission_id, entries))
                }
            })
            .collect();
        for (mission_id, entries) in mission_orders {
            if let Err(error) = self
                .api
                .reorder_mission_blocks(mission_id, &entries, token)
                .await
            {
                *errors += 1;
                tracing::warn!(%error, %mission_id, "reordering mission blocks failed");
                buffer.set_error("Reordering blocks failed");
            }
        }
    }
}

fn section_blocks(
    detail: &trailbldr_domain::ScenarioDetail,
    section: ScenarioSection,
) -> &Vec<Block> {
    match section {
        ScenarioSection::Intro => &detail.intro_blocks,
        ScenarioSection::Outro => &detail.outro_blocks,
    }
}

fn section_blocks_mut(
    detail: &mut trailbldr_domain::ScenarioDetail,
    section: ScenarioSection,
) -> &mut Vec<Block> {
    match section {
        ScenarioSection::Intro => &mut detail.intro_blocks,
        ScenarioSection::Outro => &mut detail.outro_blocks,
    }
}

/// Resolve where a block's create call must go: the explicit owner tag
/// wins; otherwise a mission reference implies a mission owner; otherwise
/// the bucket the block sits in decides.
fn resolve_owner(
    block: &Block,
    context: &BucketContext,
    scenario_id: ScenarioId,
) -> Result<ResolvedOwner, &'static str> {
    let scenario_ref = block.scenario_ref.unwrap_or(scenario_id);
    match block.owner_kind {
        Some(BlockOwnerKind::ScenarioIntro) => Ok(ResolvedOwner::Scenario(
            scenario_ref,
            ScenarioSection::Intro,
        )),
        Some(BlockOwnerKind::ScenarioOutro) => Ok(ResolvedOwner::Scenario(
            scenario_ref,
            ScenarioSection::Outro,
        )),
        Some(BlockOwnerKind::Mission) => match block.mission_ref.or(bucket_mission(context)) {
            Some(mission_id) => Ok(ResolvedOwner::Mission(mission_id)),
            None => Err("Block owner could not be resolved"),
        },
        None => {
            if let Some(mission_id) = block.mission_ref {
                return Ok(ResolvedOwner::Mission(mission_id));
            }
            match context {
                BucketContext::Intro => Ok(ResolvedOwner::Scenario(
                    scenario_ref,
                    ScenarioSection::Intro,
                )),
                BucketContext::Outro => Ok(ResolvedOwner::Scenario(
                    scenario_ref,
                    ScenarioSection::Outro,
                )),
                BucketContext::Mission {
                    remote_id: Some(mission_id),
                } => Ok(ResolvedOwner::Mission(*mission_id)),
                BucketContext::Mission { remote_id: None } => {
                    Err("Parent mission has no remote id yet")
                }
            }
        }
    }
}

fn bucket_mission(context: &BucketContext) -> Option<MissionId> {
    match context {
        BucketContext::Mission { remote_id } => *remote_id,
        _ => None,
    }
}
