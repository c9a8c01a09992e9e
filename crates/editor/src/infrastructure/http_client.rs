//! HTTP adapter for the remote scenario store.
//!
//! Implements `ScenarioApiPort` with reqwest: every call joins the
//! configured base path, attaches the bearer token and exchanges JSON
//! bodies. Status and decoding failures map onto `ApiError`; there is no
//! retry or backoff here — recovery is re-running the orchestrator.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use trailbldr_domain::{BlockId, MissionId, ScenarioId, ScenarioSection};
use trailbldr_shared::requests::{
    BlockData, BlockOrderData, CommuneSelectionData, CreateScenarioData, MissionData,
    PrerequisitesData, ReorderEntry, UpdateScenarioData,
};
use trailbldr_shared::responses::{CreatedResponse, ScenarioFullResponse, ScenarioRecord};

use crate::ports::outbound::{ApiError, ScenarioApiPort};
use crate::session_types::AuthToken;

/// Base path used when `TRAILBLDR_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Environment variable overriding the store's base path.
pub const API_URL_ENV: &str = "TRAILBLDR_API_URL";

#[derive(Debug)]
pub struct HttpScenarioApi {
    client: reqwest::Client,
    base: String,
}

impl HttpScenarioApi {
    /// Create an adapter for the given base path (e.g.
    /// `https://store.example/api`). The path is validated up front so a
    /// typo fails at composition time, not on the first call.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Url::parse(base_url).map_err(|e| ApiError::Config(format!("{base_url}: {e}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create an adapter from `TRAILBLDR_API_URL`, falling back to the local
    /// development store.
    pub fn from_env() -> Result<Self, ApiError> {
        let base = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&base)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &AuthToken,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token.as_str())
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: &AuthToken,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(token.as_str())
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_unit<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: &AuthToken,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(token.as_str())
            .json(body)
            .send()
            .await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn put_unit<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: &AuthToken,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.url(path))
            .bearer_auth(token.as_str())
            .json(body)
            .send()
            .await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn delete_unit(&self, path: &str, token: &AuthToken) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(path))
            .bearer_auth(token.as_str())
            .send()
            .await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Shape(e.to_string()))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

#[async_trait]
impl ScenarioApiPort for HttpScenarioApi {
    async fn list_scenarios(&self, token: &AuthToken) -> Result<Vec<ScenarioRecord>, ApiError> {
        self.get_json("/scenarios/mine", token).await
    }

    async fn load_full(
        &self,
        scenario: ScenarioId,
        token: &AuthToken,
    ) -> Result<ScenarioFullResponse, ApiError> {
        self.get_json(&format!("/scenarios/{scenario}/fullVue"), token)
            .await
    }

    async fn create_scenario(
        &self,
        data: &CreateScenarioData,
        token: &AuthToken,
    ) -> Result<ScenarioId, ApiError> {
        let created: CreatedResponse = self.post_json("/scenarios", data, token).await?;
        Ok(ScenarioId::new(created.id))
    }

    async fn update_scenario(
        &self,
        scenario: ScenarioId,
        data: &UpdateScenarioData,
        token: &AuthToken,
    ) -> Result<(), ApiError> {
        self.put_unit(&format!("/scenarios/{scenario}"), data, token)
            .await
    }

    async fn delete_mission(&self, mission: MissionId, token: &AuthToken) -> Result<(), ApiError> {
        self.delete_unit(&format!("/missions/{mission}"), token)
            .await
    }

    async fn create_mission(
        &self,
        scenario: ScenarioId,
        data: &MissionData,
        token: &AuthToken,
    ) -> Result<MissionId, ApiError> {
        let created: CreatedResponse = self
            .post_json(&format!("/scenarios/{scenario}/missions"), data, token)
            .await?;
        Ok(MissionId::new(created.id))
    }

    async fn update_mission(
        &self,
        mission: MissionId,
        data: &MissionData,
        token: &AuthToken,
    ) -> Result<(), ApiError> {
        self.put_unit(&format!("/missions/{mission}"), data, token)
            .await
    }

    async fn update_prerequisites(
        &self,
        mission: MissionId,
        data: &PrerequisitesData,
        token: &AuthToken,
    ) -> Result<(), ApiError> {
        self.put_unit(&format!("/missions/{mission}/prerequisites"), data, token)
            .await
    }

    async fn reorder_missions(
        &self,
        scenario: ScenarioId,
        order: &[ReorderEntry],
        token: &AuthToken,
    ) -> Result<(), ApiError> {
        self.put_unit(
            &format!("/scenarios/{scenario}/missions/reorder"),
            &order,
            token,
        )
        .await
    }

    async fn set_communes(
        &self,
        scenario: ScenarioId,
        data: &CommuneSelectionData,
        token: &AuthToken,
    ) -> Result<(), ApiError> {
        self.post_unit(&format!("/scenarios/{scenario}/communes"), data, token)
            .await
    }

    async fn delete_block(&self, block: BlockId, token: &AuthToken) -> Result<(), ApiError> {
        self.delete_unit(&format!("/blocks/{block}"), token).await
    }

    async fn create_scenario_block(
        &self,
        scenario: ScenarioId,
        section: ScenarioSection,
        data: &BlockData,
        token: &AuthToken,
    ) -> Result<BlockId, ApiError> {
        let created: CreatedResponse = self
            .post_json(
                &format!("/scenarios/{scenario}/{}/blocks", section.as_path_segment()),
                data,
                token,
            )
            .await?;
        Ok(BlockId::new(created.id))
    }

    async fn create_mission_block(
        &self,
        mission: MissionId,
        data: &BlockData,
        token: &AuthToken,
    ) -> Result<BlockId, ApiError> {
        let created: CreatedResponse = self
            .post_json(&format!("/missions/{mission}/blocks"), data, token)
            .await?;
        Ok(BlockId::new(created.id))
    }

    async fn update_block(
        &self,
        block: BlockId,
        data: &BlockData,
        token: &AuthToken,
    ) -> Result<(), ApiError> {
        self.put_unit(&format!("/blocks/{block}"), data, token).await
    }

    async fn reorder_scenario_blocks(
        &self,
        scenario: ScenarioId,
        section: ScenarioSection,
        data: &BlockOrderData,
        token: &AuthToken,
    ) -> Result<(), ApiError> {
        self.put_unit(
            &format!(
                "/scenarios/{scenario}/{}/blocks/reorder",
                section.as_path_segment()
            ),
            data,
            token,
        )
        .await
    }

    async fn reorder_mission_blocks(
        &self,
        mission: MissionId,
        order: &[ReorderEntry],
        token: &AuthToken,
    ) -> Result<(), ApiError> {
        self.put_unit(&format!("/missions/{mission}/blocks/reorder"), &order, token)
            .await
    }
}
