use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Max characters of raw model text kept as the summary of a fallback payload.
pub const FALLBACK_SUMMARY_CHARS: usize = 200;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlaceQuery {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub highlights: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tips: Vec<String>,
    #[serde(default, alias = "bestTime", skip_serializing_if = "Option::is_none")]
    pub best_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub is_fallback: bool,
}

// Models answer `null` for fields they know nothing about.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl PlaceInfo {
    /// Placeholder used when the model answer could not be parsed. The raw
    /// text is kept as a readable summary, cut on a char boundary.
    pub fn fallback(query_name: &str, raw_text: &str) -> Self {
        let raw = raw_text.trim();
        let mut summary: String = raw.chars().take(FALLBACK_SUMMARY_CHARS).collect();
        if raw.chars().count() > FALLBACK_SUMMARY_CHARS {
            summary.push_str("...");
        }

        Self {
            name: query_name.to_string(),
            summary,
            highlights: Vec::new(),
            tips: Vec::new(),
            best_time: None,
            category: None,
            is_fallback: true,
        }
    }
}
