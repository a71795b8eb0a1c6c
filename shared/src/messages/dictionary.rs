//! Pipeline-stage dictionary payloads

use serde_json::Value;

use crate::types::DictionaryEntry;

/// Path of the pipeline-stage dictionary, relative to the API base URL
pub const PIPELINE_STAGES_PATH: &str = "/api/customers/dictionaries/pipeline-stages";

/// Lenient reader for dictionary responses
///
/// `fullEntries` wins over `entries`/`items`; in the short forms the entry id
/// defaults to its value. Entries without a string `value` are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryResponse {
    pub entries: Vec<DictionaryEntry>,
}

impl DictionaryResponse {
    pub fn from_value(body: &Value) -> Self {
        let entries = if let Some(full) = body.get("fullEntries").and_then(Value::as_array) {
            full.iter().filter_map(|entry| parse_entry(entry, true)).collect()
        } else {
            body.get("entries")
                .or_else(|| body.get("items"))
                .and_then(Value::as_array)
                .map(|short| short.iter().filter_map(|entry| parse_entry(entry, false)).collect())
                .unwrap_or_default()
        };

        Self { entries }
    }
}

fn parse_entry(entry: &Value, keep_id: bool) -> Option<DictionaryEntry> {
    let value = entry.get("value")?.as_str()?.to_string();
    let string_field = |name: &str| entry.get(name).and_then(Value::as_str).map(str::to_string);

    let id = if keep_id {
        string_field("id").unwrap_or_else(|| value.clone())
    } else {
        value.clone()
    };

    Some(DictionaryEntry {
        id,
        value,
        label: string_field("label"),
        color: string_field("color"),
        icon: string_field("icon"),
    })
}
