//! Application-level error type.

use thiserror::Error;

use trailbldr_domain::DomainError;

use crate::ports::outbound::ApiError;

/// Errors surfaced by application services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A full save is already running; the orchestrator refuses to
    /// interleave two runs.
    #[error("A full save is already in progress")]
    SyncInProgress,

    /// Operation needs a selected scenario with loaded detail
    #[error("No scenario selected")]
    NoScenarioSelected,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
