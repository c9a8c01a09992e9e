//! Normalization Layer: total, idempotent mapping from wire records to the
//! canonical domain model.
//!
//! Total: a record with every field missing still maps to a usable value
//! (blank strings, empty lists, index-synthesized local ids). Idempotent:
//! a record already using the canonical spellings maps to the same value as
//! its legacy-spelled twin.

use trailbldr_domain::{
    Block, BlockId, BlockKind, BlockOwnerKind, Commune, CommuneId, LocalId, Mission, MissionId,
    ScenarioDetail, ScenarioId, ScenarioSummary, STATUS_PUBLISHED,
};

use crate::responses::{
    BlockRecord, CommuneRecord, MissionRecord, ScenarioFullResponse, ScenarioRecord,
};

/// Canonical form of one `fullVue` document.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedScenario {
    pub detail: ScenarioDetail,
    pub missions: Vec<Mission>,
    pub communes: Vec<Commune>,
}

/// Map a scenario summary record; records without any id are unaddressable
/// and dropped by the caller.
pub fn summary_from_record(record: &ScenarioRecord) -> Option<ScenarioSummary> {
    let id = ScenarioId::new(record.remote_id()?);
    Some(ScenarioSummary {
        id,
        title: record.title().unwrap_or_default().to_string(),
        published: record.status.as_deref() == Some(STATUS_PUBLISHED),
    })
}

/// Map a full document. `fallback` is the summary the document was loaded
/// for; it supplies the scenario fields when the payload carries no
/// scenario record of its own.
pub fn scenario_from_response(
    fallback: &ScenarioSummary,
    response: &ScenarioFullResponse,
) -> NormalizedScenario {
    let (id, title, published) = match response.scenario.as_ref() {
        Some(record) => (
            record.remote_id().map(ScenarioId::new).unwrap_or(fallback.id),
            record
                .title()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.title.clone()),
            match record.status.as_deref() {
                Some(status) => status == STATUS_PUBLISHED,
                None => fallback.published,
            },
        ),
        None => (fallback.id, fallback.title.clone(), fallback.published),
    };

    NormalizedScenario {
        detail: ScenarioDetail {
            id,
            title,
            published,
            intro_blocks: blocks_from_records(response.intro_blocks()),
            outro_blocks: blocks_from_records(response.outro_blocks()),
        },
        missions: response
            .missions
            .iter()
            .enumerate()
            .map(|(index, record)| mission_from_record(record, index))
            .collect(),
        communes: response
            .communes
            .iter()
            .filter_map(commune_from_record)
            .collect(),
    }
}

/// Map one mission record. `index` feeds the synthetic-id fallback so the
/// mission stays addressable for list operations even when the store sent
/// no identifier; a synthetic id never reaches the store because request
/// payloads only accept the typed remote id.
pub fn mission_from_record(record: &MissionRecord, index: usize) -> Mission {
    let remote_id = record.remote_id().map(MissionId::new);
    Mission {
        local_id: remote_id
            .map(|id| LocalId::from_remote(id.as_i64()))
            .unwrap_or_else(|| LocalId::from_index(index)),
        remote_id,
        position: record.position().unwrap_or(index as u32 + 1),
        title: record.title().unwrap_or_default().to_string(),
        latitude: record.latitude,
        longitude: record.longitude,
        riddle_text: record.riddle_text.clone().unwrap_or_default(),
        answer_word: record.answer_word.clone().unwrap_or_default(),
        prerequisites: record.prerequisites.iter().filter_map(|p| p.id()).collect(),
        blocks: blocks_from_records(record.blocks()),
    }
}

/// Map one block record.
pub fn block_from_record(record: &BlockRecord, index: usize) -> Block {
    let remote_id = record.remote_id().map(BlockId::new);
    Block {
        local_id: remote_id
            .map(|id| LocalId::from_remote(id.as_i64()))
            .unwrap_or_else(|| LocalId::from_index(index)),
        remote_id,
        kind: BlockKind::parse_or_default(record.kind()),
        position: record.position().unwrap_or(index as u32 + 1),
        content_text: record.content_text.clone().unwrap_or_default(),
        media_url: record.url_media.clone().unwrap_or_default(),
        caption: record.caption.clone().unwrap_or_default(),
        owner_kind: record.owner_tag().and_then(BlockOwnerKind::parse),
        mission_ref: record.mission_ref().map(MissionId::new),
        scenario_ref: record.id_scenario.map(ScenarioId::new),
    }
}

fn blocks_from_records(records: &[BlockRecord]) -> Vec<Block> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| block_from_record(record, index))
        .collect()
}

/// Map one commune record or catalog shape. Records without any id are not
/// addressable and map to `None`.
pub fn commune_from_record(record: &CommuneRecord) -> Option<Commune> {
    let id = CommuneId::new(record.remote_id()?);
    Some(Commune {
        id,
        name_fr: record
            .geojson_name()
            .or(record.name_fr.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| Commune::fallback_name(id)),
        name_nl: record.name_nl.clone().unwrap_or_default(),
        name_de: record.name_de.clone().unwrap_or_default(),
    })
}
