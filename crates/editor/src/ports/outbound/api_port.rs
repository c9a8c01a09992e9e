//! Remote store port - the object-safe boundary to the scenario store.
//!
//! One method per endpoint of the store's fixed contract. Adapters own the
//! base path; the bearer token is passed per call so a single adapter serves
//! whichever session is active. The application layer depends on this trait,
//! never on a concrete HTTP client.

use async_trait::async_trait;
use thiserror::Error;

use trailbldr_domain::{BlockId, MissionId, ScenarioId, ScenarioSection};
use trailbldr_shared::requests::{
    BlockData, BlockOrderData, CommuneSelectionData, CreateScenarioData, MissionData,
    PrerequisitesData, ReorderEntry, UpdateScenarioData,
};
use trailbldr_shared::responses::{ScenarioFullResponse, ScenarioRecord};

use crate::session_types::AuthToken;

/// Errors crossing the remote store boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Adapter misconfiguration (bad base URL)
    #[error("Invalid API configuration: {0}")]
    Config(String),

    /// The request never produced a response
    #[error("Request failed: {0}")]
    Transport(String),

    /// The store answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the contract (including create
    /// responses whose id is not numeric)
    #[error("Unexpected response shape: {0}")]
    Shape(String),
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ScenarioApiPort: Send + Sync {
    async fn list_scenarios(&self, token: &AuthToken) -> Result<Vec<ScenarioRecord>, ApiError>;

    async fn load_full(
        &self,
        scenario: ScenarioId,
        token: &AuthToken,
    ) -> Result<ScenarioFullResponse, ApiError>;

    async fn create_scenario(
        &self,
        data: &CreateScenarioData,
        token: &AuthToken,
    ) -> Result<ScenarioId, ApiError>;

    async fn update_scenario(
        &self,
        scenario: ScenarioId,
        data: &UpdateScenarioData,
        token: &AuthToken,
    ) -> Result<(), ApiError>;

    async fn delete_mission(&self, mission: MissionId, token: &AuthToken) -> Result<(), ApiError>;

    async fn create_mission(
        &self,
        scenario: ScenarioId,
        data: &MissionData,
        token: &AuthToken,
    ) -> Result<MissionId, ApiError>;

    async fn update_mission(
        &self,
        mission: MissionId,
        data: &MissionData,
        token: &AuthToken,
    ) -> Result<(), ApiError>;

    async fn update_prerequisites(
        &self,
        mission: MissionId,
        data: &PrerequisitesData,
        token: &AuthToken,
    ) -> Result<(), ApiError>;

    async fn reorder_missions(
        &self,
        scenario: ScenarioId,
        order: &[ReorderEntry],
        token: &AuthToken,
    ) -> Result<(), ApiError>;

    async fn set_communes(
        &self,
        scenario: ScenarioId,
        data: &CommuneSelectionData,
        token: &AuthToken,
    ) -> Result<(), ApiError>;

    async fn delete_block(&self, block: BlockId, token: &AuthToken) -> Result<(), ApiError>;

    async fn create_scenario_block(
        &self,
        scenario: ScenarioId,
        section: ScenarioSection,
        data: &BlockData,
        token: &AuthToken,
    ) -> Result<BlockId, ApiError>;

    async fn create_mission_block(
        &self,
        mission: MissionId,
        data: &BlockData,
        token: &AuthToken,
    ) -> Result<BlockId, ApiError>;

    async fn update_block(
        &self,
        block: BlockId,
        data: &BlockData,
        token: &AuthToken,
    ) -> Result<(), ApiError>;

    async fn reorder_scenario_blocks(
        &self,
        scenario: ScenarioId,
        section: ScenarioSection,
        data: &BlockOrderData,
        token: &AuthToken,
    ) -> Result<(), ApiError>;

    async fn reorder_mission_blocks(
        &self,
        mission: MissionId,
        order: &[ReorderEntry],
        token: &AuthToken,
    ) -> Result<(), ApiError>;
}
