use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Metadata document returned by `GET {api}/apps/{id}`.
///
/// Every field is optional. A field with an unexpected type is treated as absent instead of
/// failing the whole document.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogApp {
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub icon_mobile_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub current_release_version: Option<String>,
}

impl CatalogApp {
    /// The long description, or the one-line summary when there is no description.
    ///
    /// A `null` description counts as no description, the same as a missing key.
    pub fn description_or_summary(&self) -> Option<String> {
        self.description.clone().or_else(|| self.summary.clone())
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => Some(value),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    })
}
