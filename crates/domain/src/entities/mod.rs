pub mod block;
pub mod commune;
pub mod mission;
pub mod scenario;

pub use block::{Block, BlockKind, BlockOwnerKind, ScenarioSection};
pub use commune::{normalized_name, Commune, MAX_COMMUNES};
pub use mission::{validate_prerequisites, Mission};
pub use scenario::{ScenarioDetail, ScenarioSummary, STATUS_DRAFT, STATUS_PUBLISHED};
