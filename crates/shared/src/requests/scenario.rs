use serde::{Deserialize, Serialize};

use trailbldr_domain::{CommuneId, UserId};

/// Body of `POST /scenarios`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateScenarioData {
    pub title_scenario: String,
    #[serde(rename = "userId")]
    pub user_id: UserId,
}

/// Body of `PUT /scenarios/{id}` (quick save). Missions, blocks and communes
/// are owned by their dedicated endpoints and are not nested here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateScenarioData {
    pub title_scenario: String,
    pub status: String,
}

/// Body of `POST /scenarios/{id}/communes` — replaces the remote
/// association wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommuneSelectionData {
    pub commune_ids: Vec<CommuneId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_scenario_uses_the_wire_field_names() {
        let data = CreateScenarioData {
            title_scenario: "Friche Joséphine".into(),
            user_id: UserId::new(4),
        };
        let json = serde_json::to_value(&data).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({"title_scenario": "Friche Joséphine", "userId": 4})
        );
    }

    #[test]
    fn commune_selection_serializes_as_plain_ids() {
        let data = CommuneSelectionData {
            commune_ids: vec![CommuneId::new(2), CommuneId::new(9)],
        };
        let json = serde_json::to_value(&data).expect("serializes");
        assert_eq!(json, serde_json::json!({"commune_ids": [2, 9]}));
    }
}
