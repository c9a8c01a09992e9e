//! Scenario entity - the top-level document being edited.

use serde::{Deserialize, Serialize};

use crate::{Block, ScenarioId};

/// Publish state as the store's `status` field spells it.
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_DRAFT: &str = "draft";

/// List-view summary of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: ScenarioId,
    pub title: String,
    pub published: bool,
}

/// Loaded detail of the selected scenario: its own fields plus the two
/// scenario-level block lists. Missions and communes live in parallel lists
/// on the edit buffer, not nested here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDetail {
    pub id: ScenarioId,
    pub title: String,
    pub published: bool,
    pub intro_blocks: Vec<Block>,
    pub outro_blocks: Vec<Block>,
}

impl ScenarioDetail {
    pub fn status(&self) -> &'static str {
        if self.published {
            STATUS_PUBLISHED
        } else {
            STATUS_DRAFT
        }
    }
}
