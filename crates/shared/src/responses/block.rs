use serde::Deserialize;

/// A block as the store sends it.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct BlockRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, rename = "_id_block")]
    pub id_block: Option<i64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub type_block: Option<String>,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub position_block: Option<u32>,
    #[serde(default)]
    pub content_text: Option<String>,
    #[serde(default)]
    pub url_media: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub owner_type: Option<String>,
    #[serde(default)]
    pub type_owner: Option<String>,
    #[serde(default, rename = "_id_mission")]
    pub id_mission: Option<i64>,
    #[serde(default)]
    pub mission_id: Option<i64>,
    #[serde(default, rename = "_id_scenario")]
    pub id_scenario: Option<i64>,
}

impl BlockRecord {
    pub fn remote_id(&self) -> Option<i64> {
        self.id_block.or(self.id)
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref().or(self.type_block.as_deref())
    }

    pub fn position(&self) -> Option<u32> {
        self.position_block.or(self.position)
    }

    pub fn owner_tag(&self) -> Option<&str> {
        self.owner_type.as_deref().or(self.type_owner.as_deref())
    }

    pub fn mission_ref(&self) -> Option<i64> {
        self.id_mission.or(self.mission_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_id_spellings_resolve() {
        let legacy: BlockRecord =
            serde_json::from_value(serde_json::json!({"_id_block": 8})).expect("deserializes");
        assert_eq!(legacy.remote_id(), Some(8));

        let plain: BlockRecord =
            serde_json::from_value(serde_json::json!({"id": 9})).expect("deserializes");
        assert_eq!(plain.remote_id(), Some(9));
    }

    #[test]
    fn type_spellings_resolve_with_plain_type_first() {
        let record: BlockRecord =
            serde_json::from_value(serde_json::json!({"type": "video", "type_block": "text"}))
                .expect("deserializes");
        assert_eq!(record.kind(), Some("video"));
    }

    #[test]
    fn an_empty_record_is_accepted() {
        let record: BlockRecord = serde_json::from_value(serde_json::json!({})).expect("total");
        assert_eq!(record.remote_id(), None);
        assert_eq!(record.owner_tag(), None);
    }
}
