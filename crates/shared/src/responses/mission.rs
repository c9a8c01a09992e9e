use serde::Deserialize;

use trailbldr_domain::MissionId;

use super::BlockRecord;

/// A mission as the store sends it. Every known spelling of each field is a
/// declared member; accessor methods encode the precedence between them, so
/// the fallback logic is enumerable rather than scattered.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct MissionRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, rename = "_id_mission")]
    pub id_mission: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_mission: Option<String>,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub position_mission: Option<u32>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub riddle_text: Option<String>,
    #[serde(default)]
    pub answer_word: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<PrerequisiteRef>,
    #[serde(default)]
    pub blocks: Option<Vec<BlockRecord>>,
    #[serde(default)]
    pub mission_blocks: Option<Vec<BlockRecord>>,
}

impl MissionRecord {
    pub fn remote_id(&self) -> Option<i64> {
        self.id_mission.or(self.id)
    }

    pub fn title(&self) -> Option<&str> {
        self.title_mission.as_deref().or(self.title.as_deref())
    }

    pub fn position(&self) -> Option<u32> {
        self.position_mission.or(self.position)
    }

    pub fn blocks(&self) -> &[BlockRecord] {
        self.blocks
            .as_deref()
            .or(self.mission_blocks.as_deref())
            .unwrap_or_default()
    }
}

/// One prerequisite entry. The store has sent bare ids, stringified ids and
/// `{_id_mission_required}` join rows; anything else is dropped during
/// normalization rather than failing the whole document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PrerequisiteRef {
    Id(i64),
    Wrapper {
        #[serde(rename = "_id_mission_required")]
        id_mission_required: i64,
    },
    Other(serde_json::Value),
}

impl PrerequisiteRef {
    pub fn id(&self) -> Option<MissionId> {
        match self {
            Self::Id(raw) => Some(MissionId::new(*raw)),
            Self::Wrapper {
                id_mission_required,
            } => Some(MissionId::new(*id_mission_required)),
            Self::Other(value) => value
                .as_i64()
                .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
                .map(MissionId::new),
        }
    }
}
