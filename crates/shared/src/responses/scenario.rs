use serde::Deserialize;

use super::{BlockRecord, CommuneRecord, MissionRecord};

/// `{id}` envelope returned by every create route. The id must be numeric;
/// a non-numeric id fails deserialization and the creation is treated as
/// failed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

/// A scenario as the store sends it, in either of its known shapes.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct ScenarioRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, rename = "_id_scenario")]
    pub id_scenario: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_scenario: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ScenarioRecord {
    pub fn remote_id(&self) -> Option<i64> {
        self.id.or(self.id_scenario)
    }

    pub fn title(&self) -> Option<&str> {
        self.title_scenario.as_deref().or(self.title.as_deref())
    }
}

/// Payload of `GET /scenarios/{id}/fullVue`. The two scenario-level block
/// lists arrive under either the camel or the snake key depending on the
/// store version; the camel one wins when both are present.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct ScenarioFullResponse {
    #[serde(default)]
    pub scenario: Option<ScenarioRecord>,
    #[serde(default)]
    pub missions: Vec<MissionRecord>,
    #[serde(default)]
    pub communes: Vec<CommuneRecord>,
    #[serde(default, rename = "introBlocks")]
    pub intro_blocks: Option<Vec<BlockRecord>>,
    #[serde(default, rename = "intro_blocks")]
    pub intro_blocks_snake: Option<Vec<BlockRecord>>,
    #[serde(default, rename = "outroBlocks")]
    pub outro_blocks: Option<Vec<BlockRecord>>,
    #[serde(default, rename = "outro_blocks")]
    pub outro_blocks_snake: Option<Vec<BlockRecord>>,
}

impl ScenarioFullResponse {
    pub fn intro_blocks(&self) -> &[BlockRecord] {
        self.intro_blocks
            .as_deref()
            .or(self.intro_blocks_snake.as_deref())
            .unwrap_or_default()
    }

    pub fn outro_blocks(&self) -> &[BlockRecord] {
        self.outro_blocks
            .as_deref()
            .or(self.outro_blocks_snake.as_deref())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_response_rejects_non_numeric_ids() {
        assert!(serde_json::from_value::<CreatedResponse>(serde_json::json!({"id": 12})).is_ok());
        assert!(
            serde_json::from_value::<CreatedResponse>(serde_json::json!({"id": "12"})).is_err()
        );
        assert!(serde_json::from_value::<CreatedResponse>(serde_json::json!({})).is_err());
    }

    #[test]
    fn block_lists_accept_both_key_spellings() {
        let camel: ScenarioFullResponse = serde_json::from_value(serde_json::json!({
            "introBlocks": [{"id": 1}],
            "outroBlocks": [],
        }))
        .expect("deserializes");
        assert_eq!(camel.intro_blocks().len(), 1);

        let snake: ScenarioFullResponse = serde_json::from_value(serde_json::json!({
            "intro_blocks": [{"id": 1}, {"id": 2}],
        }))
        .expect("deserializes");
        assert_eq!(snake.intro_blocks().len(), 2);
        assert!(snake.outro_blocks().is_empty());
    }
}
