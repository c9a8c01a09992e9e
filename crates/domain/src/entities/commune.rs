//! Commune entity - a selectable geographic region associated with a
//! scenario.

use serde::{Deserialize, Serialize};

use crate::CommuneId;

/// Maximum number of communes a scenario may select.
pub const MAX_COMMUNES: usize = 3;

/// A commune with its trilingual names. Missing names normalize to blank
/// strings; the French display name falls back to `"Commune {id}"` when the
/// catalog carries no usable name at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commune {
    pub id: CommuneId,
    pub name_fr: String,
    pub name_nl: String,
    pub name_de: String,
}

impl Commune {
    /// Display name used when a catalog entry has no usable name.
    pub fn fallback_name(id: CommuneId) -> String {
        format!("Commune {id}")
    }

    /// Placeholder for an id the catalog does not know.
    pub fn placeholder(id: CommuneId) -> Self {
        Self {
            id,
            name_fr: Self::fallback_name(id),
            name_nl: String::new(),
            name_de: String::new(),
        }
    }
}

/// Matching key for commune selection: lowercased with all whitespace
/// removed, so `"bruxelles "` and `"Bruxelles"` compare equal.
pub fn normalized_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}
