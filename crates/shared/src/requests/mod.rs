//! Request payloads, carrying the exact field names the remote store
//! expects.

pub mod block;
pub mod mission;
pub mod scenario;

pub use block::{BlockData, BlockOrderData};
pub use mission::{MissionData, PrerequisitesData, ReorderEntry};
pub use scenario::{CommuneSelectionData, CreateScenarioData, UpdateScenarioData};
