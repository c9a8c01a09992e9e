//! Block entity - a typed content unit owned by a scenario's intro/outro
//! list or by a mission.

use serde::{Deserialize, Serialize};

use crate::{BlockId, LocalId, MissionId, ScenarioId};

/// Content type of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Image,
    Video,
    Audio,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }

    /// Parse a wire value. Unknown or missing values fall back to `Text` so
    /// normalization stays total.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("image") => Self::Image,
            Some("video") => Self::Video,
            Some("audio") => Self::Audio,
            _ => Self::Text,
        }
    }
}

/// Owner kind reported by the store on a block record.
///
/// This is the explicit tag only; a block without one has its owner inferred
/// from its parent references and the bucket it sits in (see the sync
/// orchestrator's creation phase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockOwnerKind {
    ScenarioIntro,
    ScenarioOutro,
    Mission,
}

impl BlockOwnerKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scenario_intro" => Some(Self::ScenarioIntro),
            "scenario_outro" => Some(Self::ScenarioOutro),
            "mission" => Some(Self::Mission),
            _ => None,
        }
    }
}

/// Scenario-level block list selector (the two buckets owned directly by the
/// scenario rather than by a mission).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioSection {
    Intro,
    Outro,
}

impl ScenarioSection {
    /// Path segment used by the remote store's routes.
    pub fn as_path_segment(&self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Outro => "outro",
        }
    }
}

/// A typed content unit.
///
/// `local_id` is the stable list/UI key; `remote_id` is absent until the
/// store first persists the block, and its absence is what routes the block
/// through the create path rather than the update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub local_id: LocalId,
    pub remote_id: Option<BlockId>,
    pub kind: BlockKind,
    pub position: u32,
    pub content_text: String,
    pub media_url: String,
    pub caption: String,
    /// Explicit owner tag, when the store reported one.
    pub owner_kind: Option<BlockOwnerKind>,
    /// Owning mission, when the store reported one.
    pub mission_ref: Option<MissionId>,
    /// Owning scenario, when the store reported one.
    pub scenario_ref: Option<ScenarioId>,
}

impl Block {
    /// Fresh block as created by an editor action: first position, blank
    /// payload.
    pub fn new(local_id: LocalId, kind: BlockKind) -> Self {
        Self {
            local_id,
            remote_id: None,
            kind,
            position: 1,
            content_text: String::new(),
            media_url: String::new(),
            caption: String::new(),
            owner_kind: None,
            mission_ref: None,
            scenario_ref: None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.remote_id.is_some()
    }

    /// A block is empty iff its type-appropriate payload field is blank:
    /// `content_text` for text blocks, `media_url` for media blocks.
    pub fn is_empty(&self) -> bool {
        match self.kind {
            BlockKind::Text => self.content_text.trim().is_empty(),
            BlockKind::Image | BlockKind::Video | BlockKind::Audio => {
                self.media_url.trim().is_empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_block_emptiness_tracks_content_text() {
        let mut block = Block::new(LocalId::temp(1), BlockKind::Text);
        assert!(block.is_empty());
        block.content_text = "   ".into();
        assert!(block.is_empty());
        block.content_text = "a clue".into();
        assert!(!block.is_empty());
    }

    #[test]
    fn media_block_emptiness_tracks_media_url() {
        let mut block = Block::new(LocalId::temp(1), BlockKind::Video);
        block.content_text = "ignored for media".into();
        assert!(block.is_empty());
        block.media_url = "https://cdn.example/clip.mp4".into();
        assert!(!block.is_empty());
    }

    #[test]
    fn kind_parsing_defaults_to_text() {
        assert_eq!(BlockKind::parse_or_default(Some("audio")), BlockKind::Audio);
        assert_eq!(BlockKind::parse_or_default(Some("bogus")), BlockKind::Text);
        assert_eq!(BlockKind::parse_or_default(None), BlockKind::Text);
    }

    #[test]
    fn kind_serializes_lowercase() {
        let value = serde_json::to_value(BlockKind::Audio).expect("serializes");
        assert_eq!(value, serde_json::json!("audio"));
    }

    #[test]
    fn owner_kind_parses_known_tags_only() {
        assert_eq!(
            BlockOwnerKind::parse("scenario_outro"),
            Some(BlockOwnerKind::ScenarioOutro)
        );
        assert_eq!(BlockOwnerKind::parse("chapter"), None);
    }
}
