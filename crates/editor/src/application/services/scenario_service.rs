//! Scenario Service - list, load, create and quick-save scenarios, plus the
//! block add/remove glue that needs the store.
//!
//! Failures follow the shared-error-slot convention: each failed call is
//! logged, written into the buffer's error slot (overwriting the previous
//! message) and the operation moves on. The slot is the user-facing
//! surface; callers wanting structure watch the tracing output instead.

use std::sync::Arc;

use trailbldr_domain::{BlockKind, ScenarioSection, ScenarioSummary, UserId};
use trailbldr_shared::normalize;
use trailbldr_shared::requests::{BlockData, CreateScenarioData, UpdateScenarioData};

use crate::application::state::{BlockBucket, EditBuffer};
use crate::ports::outbound::ScenarioApiPort;
use crate::session_types::AuthToken;

pub struct ScenarioService {
    api: Arc<dyn ScenarioApiPort>,
}

impl ScenarioService {
    pub fn new(api: Arc<dyn ScenarioApiPort>) -> Self {
        Self { api }
    }

    /// Refresh the scenario list for the logged-in user.
    pub async fn fetch_scenarios(&self, buffer: &mut EditBuffer, token: &AuthToken) {
        buffer.loading = true;
        buffer.last_error = None;
        match self.api.list_scenarios(token).await {
            Ok(records) => {
                buffer.scenarios = records
                    .iter()
                    .filter_map(normalize::summary_from_record)
                    .collect();
            }
            Err(error) => {
                tracing::error!(%error, "loading the scenario list failed");
                buffer.set_error("Could not load your scenarios");
            }
        }
        buffer.loading = false;
    }

    /// Select a scenario and load its full document, replacing the working
    /// tree with the normalized server truth.
    pub async fn select_scenario(
        &self,
        buffer: &mut EditBuffer,
        summary: ScenarioSummary,
        token: &AuthToken,
    ) {
        load_and_apply(self.api.as_ref(), buffer, summary, token).await;
    }

    /// Create a scenario and append it to the list.
    pub async fn create_scenario(
        &self,
        buffer: &mut EditBuffer,
        title: &str,
        user: UserId,
        token: &AuthToken,
    ) {
        let data = CreateScenarioData {
            title_scenario: title.to_string(),
            user_id: user,
        };
        match self.api.create_scenario(&data, token).await {
            Ok(id) => buffer.scenarios.push(ScenarioSummary {
                id,
                title: title.to_string(),
                published: false,
            }),
            Err(error) => {
                tracing::error!(%error, "creating the scenario failed");
                buffer.set_error("Could not create the scenario");
            }
        }
    }

    /// Quick save: push the scenario's own fields (title + publish status)
    /// and reload the document. Mission/block/commune changes are the full
    /// save's job.
    pub async fn save_scenario(&self, buffer: &mut EditBuffer, published: bool, token: &AuthToken) {
        let Some(selected) = buffer.selected.clone() else {
            return;
        };
        let Some(detail) = buffer.detail.as_mut() else {
            return;
        };
        detail.published = published;
        let data = UpdateScenarioData {
            title_scenario: detail.title.clone(),
            status: detail.status().to_string(),
        };
        match self.api.update_scenario(selected.id, &data, token).await {
            Ok(()) => {
                load_and_apply(self.api.as_ref(), buffer, selected, token).await;
            }
            Err(error) => {
                tracing::error!(%error, scenario = %selected.id, "saving the scenario failed");
                buffer.set_error("Could not save the scenario");
            }
        }
    }

    /// Add a block to a bucket.
    ///
    /// A block under a mission the store has never seen is appended locally
    /// with a temp id — it cannot be persisted until its parent mission is,
    /// so the full save picks it up later. Every other bucket creates the
    /// block remotely right away and merges the returned id in.
    pub async fn add_block(
        &self,
        buffer: &mut EditBuffer,
        bucket: BlockBucket,
        kind: BlockKind,
        token: &AuthToken,
    ) {
        match bucket {
            BlockBucket::Mission(key) => {
                let Some(remote_id) = buffer.mission(key).map(|m| m.remote_id) else {
                    return;
                };
                match remote_id {
                    None => {
                        buffer.push_new_block(bucket, kind);
                    }
                    Some(mission_id) => {
                        let data = BlockData::blank(kind);
                        match self.api.create_mission_block(mission_id, &data, token).await {
                            Ok(block_id) => {
                                buffer.push_created_block(bucket, kind, block_id);
                            }
                            Err(error) => {
                                tracing::error!(%error, %mission_id, "creating the block failed");
                                buffer.set_error("Could not create the block");
                            }
                        }
                    }
                }
            }
            BlockBucket::Intro | BlockBucket::Outro => {
                let Some(selected) = buffer.selected.as_ref() else {
                    return;
                };
                let scenario_id = selected.id;
                let section = match bucket {
                    BlockBucket::Intro => ScenarioSection::Intro,
                    _ => ScenarioSection::Outro,
                };
                let data = BlockData::blank(kind);
                match self
                    .api
                    .create_scenario_block(scenario_id, section, &data, token)
                    .await
                {
                    Ok(block_id) => {
                        buffer.push_created_block(bucket, kind, block_id);
                    }
                    Err(error) => {
                        tracing::error!(%error, %scenario_id, "creating the block failed");
                        buffer.set_error("Could not create the block");
                    }
                }
            }
        }
    }
}

/// Load one full document and replace the buffer's working tree with its
/// normalized form. Shared by scenario selection and the orchestrator's
/// terminal reload.
pub(crate) async fn load_and_apply(
    api: &dyn ScenarioApiPort,
    buffer: &mut EditBuffer,
    summary: ScenarioSummary,
    token: &AuthToken,
) {
    buffer.selected = Some(summary.clone());
    buffer.detail = None;
    buffer.details_error = None;
    buffer.details_loading = true;
    match api.load_full(summary.id, token).await {
        Ok(response) => buffer.apply_full_response(&summary, &response),
        Err(error) => {
            tracing::error!(%error, scenario = %summary.id, "loading the scenario detail failed");
            buffer.details_error = Some("Could not load the scenario detail".into());
        }
    }
    buffer.details_loading = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::{always, eq};
    use trailbldr_domain::{BlockId, LocalId, Mission, MissionId, ScenarioId};
    use trailbldr_shared::responses::ScenarioFullResponse;

    use crate::ports::outbound::{ApiError, MockScenarioApiPort};

    fn token() -> AuthToken {
        AuthToken::new("jwt")
    }

    fn summary(raw: i64) -> ScenarioSummary {
        ScenarioSummary {
            id: ScenarioId::new(raw),
            title: "Friche".into(),
            published: false,
        }
    }

    #[tokio::test]
    async fn fetch_scenarios_replaces_the_list() {
        let mut api = MockScenarioApiPort::new();
        api.expect_list_scenarios().times(1).returning(|_| {
            Ok(serde_json::from_value(serde_json::json!([
                {"id": 1, "title_scenario": "A", "status": "published"},
                {"id": 2, "title": "B"},
                {"noise": true},
            ]))
            .expect("records"))
        });
        let service = ScenarioService::new(Arc::new(api));
        let mut buffer = EditBuffer::new();

        service.fetch_scenarios(&mut buffer, &token()).await;
        assert_eq!(buffer.scenarios.len(), 2);
        assert!(buffer.scenarios[0].published);
        assert_eq!(buffer.scenarios[1].title, "B");
        assert!(!buffer.loading);
        assert_eq!(buffer.last_error, None);
    }

    #[tokio::test]
    async fn fetch_scenarios_failure_lands_in_the_error_slot() {
        let mut api = MockScenarioApiPort::new();
        api.expect_list_scenarios().times(1).returning(|_| {
            Err(ApiError::Status {
                status: 500,
                message: "boom".into(),
            })
        });
        let service = ScenarioService::new(Arc::new(api));
        let mut buffer = EditBuffer::new();

        service.fetch_scenarios(&mut buffer, &token()).await;
        assert!(buffer.scenarios.is_empty());
        assert!(buffer.last_error.is_some());
        assert!(!buffer.loading);
    }

    #[tokio::test]
    async fn select_scenario_normalizes_the_document() {
        let mut api = MockScenarioApiPort::new();
        api.expect_load_full()
            .with(eq(ScenarioId::new(3)), always())
            .times(1)
            .returning(|_, _| {
                Ok(serde_json::from_value(serde_json::json!({
                    "missions": [{"_id_mission": 9, "title_mission": "M", "mission_blocks": []}],
                    "intro_blocks": [{"_id_block": 4, "type_block": "text"}],
                }))
                .expect("response"))
            });
        let service = ScenarioService::new(Arc::new(api));
        let mut buffer = EditBuffer::new();

        service.select_scenario(&mut buffer, summary(3), &token()).await;
        assert_eq!(buffer.missions.len(), 1);
        assert_eq!(buffer.missions[0].remote_id, Some(MissionId::new(9)));
        let detail = buffer.detail.as_ref().expect("detail");
        assert_eq!(detail.intro_blocks[0].remote_id, Some(BlockId::new(4)));
        assert!(!buffer.details_loading);
        assert_eq!(buffer.details_error, None);
    }

    #[tokio::test]
    async fn select_scenario_failure_sets_the_detail_error() {
        let mut api = MockScenarioApiPort::new();
        api.expect_load_full()
            .times(1)
            .returning(|_, _| Err(ApiError::Transport("refused".into())));
        let service = ScenarioService::new(Arc::new(api));
        let mut buffer = EditBuffer::new();

        service.select_scenario(&mut buffer, summary(3), &token()).await;
        assert!(buffer.detail.is_none());
        assert!(buffer.details_error.is_some());
    }

    #[tokio::test]
    async fn create_scenario_appends_the_returned_summary() {
        let mut api = MockScenarioApiPort::new();
        api.expect_create_scenario()
            .withf(|data, _| data.title_scenario == "Nouveau" && data.user_id == UserId::new(8))
            .times(1)
            .returning(|_, _| Ok(ScenarioId::new(12)));
        let service = ScenarioService::new(Arc::new(api));
        let mut buffer = EditBuffer::new();

        service
            .create_scenario(&mut buffer, "Nouveau", UserId::new(8), &token())
            .await;
        assert_eq!(buffer.scenarios.len(), 1);
        assert_eq!(buffer.scenarios[0].id, ScenarioId::new(12));
        assert!(!buffer.scenarios[0].published);
    }

    #[tokio::test]
    async fn add_block_under_an_unpersisted_mission_stays_local() {
        let api = MockScenarioApiPort::new(); // no expectations: no call allowed
        let service = ScenarioService::new(Arc::new(api));
        let mut buffer = EditBuffer::new();
        let key = buffer.add_mission();

        service
            .add_block(&mut buffer, BlockBucket::Mission(key), BlockKind::Text, &token())
            .await;

        let mission = buffer.mission(key).expect("mission");
        assert_eq!(mission.blocks.len(), 1);
        assert!(mission.blocks[0].local_id.is_temp());
        assert_eq!(mission.blocks[0].remote_id, None);
    }

    #[tokio::test]
    async fn add_block_under_a_persisted_mission_creates_remotely() {
        let mut api = MockScenarioApiPort::new();
        api.expect_create_mission_block()
            .with(eq(MissionId::new(9)), eq(BlockData::blank(BlockKind::Audio)), always())
            .times(1)
            .returning(|_, _, _| Ok(BlockId::new(77)));
        let service = ScenarioService::new(Arc::new(api));
        let mut buffer = EditBuffer::new();
        let mut mission = Mission::new(LocalId::from_remote(9), 1);
        mission.remote_id = Some(MissionId::new(9));
        buffer.missions.push(mission);

        service
            .add_block(
                &mut buffer,
                BlockBucket::Mission(LocalId::from_remote(9)),
                BlockKind::Audio,
                &token(),
            )
            .await;

        let mission = buffer.mission(LocalId::from_remote(9)).expect("mission");
        assert_eq!(mission.blocks[0].remote_id, Some(BlockId::new(77)));
        assert_eq!(mission.blocks[0].local_id, LocalId::from_remote(77));
    }

    #[tokio::test]
    async fn add_block_in_the_intro_hits_the_scenario_route() {
        let mut api = MockScenarioApiPort::new();
        api.expect_create_scenario_block()
            .with(
                eq(ScenarioId::new(3)),
                eq(ScenarioSection::Intro),
                eq(BlockData::blank(BlockKind::Text)),
                always(),
            )
            .times(1)
            .returning(|_, _, _, _| Ok(BlockId::new(5)));
        let service = ScenarioService::new(Arc::new(api));
        let mut buffer = EditBuffer::new();
        buffer.selected = Some(summary(3));
        buffer.apply_full_response(&summary(3), &ScenarioFullResponse::default());

        service
            .add_block(&mut buffer, BlockBucket::Intro, BlockKind::Text, &token())
            .await;

        let detail = buffer.detail.as_ref().expect("detail");
        assert_eq!(detail.intro_blocks.len(), 1);
        assert_eq!(detail.intro_blocks[0].remote_id, Some(BlockId::new(5)));
    }

    #[tokio::test]
    async fn save_scenario_pushes_fields_then_reloads() {
        let mut api = MockScenarioApiPort::new();
        api.expect_update_scenario()
            .withf(|scenario, data, _| {
                *scenario == ScenarioId::new(3)
                    && data.status == "published"
                    && data.title_scenario == "Friche"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        api.expect_load_full()
            .times(1)
            .returning(|_, _| Ok(ScenarioFullResponse::default()));
        let service = ScenarioService::new(Arc::new(api));
        let mut buffer = EditBuffer::new();
        buffer.selected = Some(summary(3));
        buffer.apply_full_response(&summary(3), &ScenarioFullResponse::default());

        service.save_scenario(&mut buffer, true, &token()).await;
        assert_eq!(buffer.last_error, None);
    }
}
