pub mod scenario_service;
pub mod session_service;
pub mod sync_service;

pub use scenario_service::ScenarioService;
pub use session_service::SessionService;
pub use sync_service::{SyncOrchestrator, SyncOutcome};
