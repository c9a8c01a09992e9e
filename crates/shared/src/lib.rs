//! TrailBldr wire protocol.
//!
//! Request payloads carry the exact field names the remote store expects;
//! response records declare every known remote spelling explicitly and the
//! normalization layer maps them onto the canonical `trailbldr-domain`
//! model.

pub mod normalize;
pub mod requests;
pub mod responses;

pub use normalize::NormalizedScenario;
pub use requests::{
    BlockData, BlockOrderData, CommuneSelectionData, CreateScenarioData, MissionData,
    PrerequisitesData, ReorderEntry, UpdateScenarioData,
};
pub use responses::{
    BlockRecord, CommuneRecord, CreatedResponse, MissionRecord, PrerequisiteRef,
    ScenarioFullResponse, ScenarioRecord,
};
