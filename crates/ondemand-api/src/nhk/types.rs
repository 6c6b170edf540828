//! On-demand index and detail response types.
//!
//! Decoding is tolerant: an absent key and a `null` value both become
//! `None`, so the formatter can render either as an empty column.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

// --- Index ---

/// Response from the index URL: `{"data_list": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexResponse {
    /// Program entries, in upstream order.
    #[serde(default)]
    pub data_list: Option<Vec<IndexEntry>>,
}

/// One program/corner listed in the index.
///
/// Identified by `(site_id, corner_id)`, which is not guaranteed unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IndexEntry {
    /// Program site ID (e.g. `"0164"`).
    #[serde(default, deserialize_with = "lenient_string")]
    pub site_id: Option<String>,
    /// Corner ID within the site (e.g. `"01"`).
    #[serde(default, deserialize_with = "lenient_string")]
    pub corner_id: Option<String>,
    /// Start of the listening window.
    #[serde(default, deserialize_with = "lenient_string")]
    pub open_time: Option<String>,
    /// End of the listening window.
    #[serde(default, deserialize_with = "lenient_string")]
    pub close_time: Option<String>,
    /// Broadcast date text.
    #[serde(default, deserialize_with = "lenient_string")]
    pub onair_date: Option<String>,
    /// Program name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub program_name: Option<String>,
    /// Corner name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub corner_name: Option<String>,
    /// URL of this program's detail document.
    #[serde(default, deserialize_with = "lenient_string")]
    pub detail_json: Option<String>,
}

// --- Detail ---

/// Response from a `detail_json` URL: `{"main": {"detail_list": [...]}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailResponse {
    /// Main block.
    #[serde(default)]
    pub main: Option<DetailMain>,
}

/// The `main` block of a detail document.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailMain {
    /// Broadcast instances, in upstream order.
    #[serde(default)]
    pub detail_list: Option<Vec<DetailEntry>>,
}

/// One broadcast instance ("headline") of a program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DetailEntry {
    /// Headline ID.
    #[serde(default, deserialize_with = "lenient_string")]
    pub headline_id: Option<String>,
    /// Headline text.
    #[serde(default, deserialize_with = "lenient_string")]
    pub headline: Option<String>,
    /// Secondary headline text.
    #[serde(default, deserialize_with = "lenient_string")]
    pub headline_sub: Option<String>,
    /// Downloadable episode assets. `None` when the key is absent or
    /// `null`, which the traversal rejects.
    #[serde(default)]
    pub file_list: Option<Vec<FileEntry>>,
}

/// One streamable episode asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileEntry {
    /// File ID.
    #[serde(default, deserialize_with = "lenient_string")]
    pub file_id: Option<String>,
    /// Episode title.
    #[serde(default, deserialize_with = "lenient_string")]
    pub file_title: Option<String>,
    /// Stream URL, typically an HLS manifest.
    #[serde(default, deserialize_with = "lenient_string")]
    pub file_name: Option<String>,
}

/// Accepts any JSON value in a string slot.
///
/// `null` maps to `None`; numbers and booleans keep their JSON text;
/// arrays and objects are kept as compact JSON.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other @ (Value::Array(_) | Value::Object(_))) => Some(other.to_string()),
    })
}
