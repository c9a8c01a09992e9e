use serde::Deserialize;

/// A commune as the store or the shape catalog sends it. The same record
/// shape serves both: catalog entries are GeoJSON features whose French name
/// lives under `geojson.properties.name_fr`.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct CommuneRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, rename = "_id_commune")]
    pub id_commune: Option<i64>,
    #[serde(default)]
    pub name_fr: Option<String>,
    #[serde(default)]
    pub name_nl: Option<String>,
    #[serde(default)]
    pub name_de: Option<String>,
    #[serde(default)]
    pub geojson: Option<GeoJsonRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct GeoJsonRecord {
    #[serde(default)]
    pub properties: GeoProperties,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct GeoProperties {
    #[serde(default)]
    pub name_fr: Option<String>,
}

impl CommuneRecord {
    pub fn remote_id(&self) -> Option<i64> {
        self.id.or(self.id_commune)
    }

    /// Name under the GeoJSON properties — the only key commune selection
    /// matches against.
    pub fn geojson_name(&self) -> Option<&str> {
        self.geojson
            .as_ref()
            .and_then(|g| g.properties.name_fr.as_deref())
    }
}
