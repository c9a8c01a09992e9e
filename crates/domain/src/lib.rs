//! TrailBldr domain model.
//!
//! Canonical in-memory shapes for the scenario editor: typed ids, the
//! scenario/mission/block/commune entities and the invariants they carry.
//! This crate has no I/O; the wire protocol lives in `trailbldr-shared` and
//! everything network-facing in `trailbldr-editor`.

pub mod entities;
pub mod error;
pub mod ids;

pub use entities::{
    normalized_name, validate_prerequisites, Block, BlockKind, BlockOwnerKind, Commune, Mission,
    ScenarioDetail, ScenarioSection, ScenarioSummary, MAX_COMMUNES, STATUS_DRAFT,
    STATUS_PUBLISHED,
};
pub use error::DomainError;
pub use ids::{BlockId, CommuneId, LocalId, MissionId, ScenarioId, UserId};
