//! Response records: one declared field per known remote spelling, with
//! accessor methods encoding the precedence between spellings. Every field
//! is optional so decoding is total; normalization supplies the defaults.

pub mod block;
pub mod commune;
pub mod mission;
pub mod scenario;

pub use block::BlockRecord;
pub use commune::{CommuneRecord, GeoJsonRecord, GeoProperties};
pub use mission::{MissionRecord, PrerequisiteRef};
pub use scenario::{CreatedResponse, ScenarioFullResponse, ScenarioRecord};
