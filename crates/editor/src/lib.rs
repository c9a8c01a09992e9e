//! TrailBldr editor - the scenario editing client.
//!
//! The crate is laid out hexagonally: `ports` holds the outbound contracts
//! (the remote scenario store, local storage), `infrastructure` their
//! concrete adapters, and `application` the edit buffer plus the services
//! that drive it — most importantly the sync orchestrator, which reconciles
//! the locally-edited working tree with the store in nine ordered phases.

pub mod application;
pub mod infrastructure;
pub mod ports;
pub mod session_types;

pub use application::{
    BlockBucket, CommuneSelectError, EditBuffer, ScenarioService, ServiceError, SessionService,
    SyncOrchestrator, SyncOutcome,
};
pub use session_types::{AuthToken, Session, SessionUser};
