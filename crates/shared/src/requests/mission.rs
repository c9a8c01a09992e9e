use serde::{Deserialize, Serialize};

use trailbldr_domain::{Mission, MissionId};

/// Body of `POST /scenarios/{id}/missions` and `PUT /missions/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionData {
    pub position_mission: u32,
    pub title_mission: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub riddle_text: String,
    pub answer_word: String,
}

impl From<&Mission> for MissionData {
    fn from(mission: &Mission) -> Self {
        Self {
            position_mission: mission.position,
            title_mission: mission.title.clone(),
            latitude: mission.latitude,
            longitude: mission.longitude,
            riddle_text: mission.riddle_text.clone(),
            answer_word: mission.answer_word.clone(),
        }
    }
}

/// Body of `PUT /missions/{id}/prerequisites`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrerequisitesData {
    pub prerequisites: Vec<MissionId>,
}

impl From<&Mission> for PrerequisitesData {
    fn from(mission: &Mission) -> Self {
        Self {
            prerequisites: mission.prerequisites.iter().copied().collect(),
        }
    }
}

/// One entry of a reorder payload (`[{id, position}]`), shared by the
/// mission reorder and mission-block reorder routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderEntry {
    pub id: i64,
    pub position: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailbldr_domain::LocalId;

    #[test]
    fn mission_data_carries_the_wire_field_names() {
        let mut mission = Mission::new(LocalId::temp(1), 2);
        mission.title = "Le pont rouillé".into();
        mission.latitude = Some(50.47);
        mission.longitude = Some(4.87);
        mission.riddle_text = "Count the arches".into();
        mission.answer_word = "seven".into();

        let json = serde_json::to_value(MissionData::from(&mission)).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({
                "position_mission": 2,
                "title_mission": "Le pont rouillé",
                "latitude": 50.47,
                "longitude": 4.87,
                "riddle_text": "Count the arches",
                "answer_word": "seven",
            })
        );
    }

    #[test]
    fn prerequisites_serialize_as_a_numeric_id_list() {
        let mut mission = Mission::new(LocalId::from_remote(3), 1);
        mission.prerequisites = [MissionId::new(2), MissionId::new(1)].into_iter().collect();
        let json = serde_json::to_value(PrerequisitesData::from(&mission)).expect("serializes");
        assert_eq!(json, serde_json::json!({"prerequisites": [1, 2]}));
    }
}
