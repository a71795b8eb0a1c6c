//! Message catalog with fallbacks and placeholder interpolation

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::error::{PipelineError, PipelineResult};

/// Every user-facing message the board emits, with its catalog key and
/// English fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {
    Untitled,
    Unassigned,
    LoadError,
    MoveError,
    MoveSuccess,
    UnassignedDisabled,
    AlreadyPending,
    LimitNotice,
    NoSearchResults,
    NoStages,
    CountLabel,
    TotalValue,
    EmptyLane,
    NoValue,
    NoProbability,
    NoExpectedClose,
}

impl Text {
    pub fn key(&self) -> &'static str {
        match self {
            Text::Untitled => "customers.deals.pipeline.untitled",
            Text::Unassigned => "customers.deals.pipeline.unassigned",
            Text::LoadError => "customers.deals.pipeline.loadError",
            Text::MoveError => "customers.deals.pipeline.moveError",
            Text::MoveSuccess => "customers.deals.pipeline.moveSuccess",
            Text::UnassignedDisabled => "customers.deals.pipeline.unassignedDisabled",
            Text::AlreadyPending => "customers.deals.pipeline.alreadyPending",
            Text::LimitNotice => "customers.deals.pipeline.limitNotice",
            Text::NoSearchResults => "customers.deals.pipeline.noSearchResults",
            Text::NoStages => "customers.deals.pipeline.noStages",
            Text::CountLabel => "customers.deals.pipeline.countLabel",
            Text::TotalValue => "customers.deals.pipeline.totalValue",
            Text::EmptyLane => "customers.deals.pipeline.emptyLane",
            Text::NoValue => "customers.deals.list.noValue",
            Text::NoProbability => "customers.deals.pipeline.noProbability",
            Text::NoExpectedClose => "customers.deals.pipeline.noExpectedClose",
        }
    }

    pub fn fallback(&self) -> &'static str {
        match self {
            Text::Untitled => "Untitled deal",
            Text::Unassigned => "No stage",
            Text::LoadError => "Failed to load deals.",
            Text::MoveError => "Failed to update deal stage.",
            Text::MoveSuccess => "Deal updated.",
            Text::UnassignedDisabled => "Moving to \"No stage\" is not supported.",
            Text::AlreadyPending => "This deal is already being moved.",
            Text::LimitNotice => "Showing the first {count} deals. Refine your filters to see more.",
            Text::NoSearchResults => "No deals found matching \"{query}\".",
            Text::NoStages => "Define pipeline stages to start tracking deals.",
            Text::CountLabel => "Deals: {count}",
            Text::TotalValue => "Total Value",
            Text::EmptyLane => "No deals in this stage yet.",
            Text::NoValue => "No value assigned",
            Text::NoProbability => "N/A",
            Text::NoExpectedClose => "No date",
        }
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}|\{(\w+)\}").expect("placeholder pattern compiles"))
}

/// Key → template catalog; missing keys fall back to the supplied text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translator {
    catalog: HashMap<String, String>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: HashMap<String, String>) -> Self {
        Self { catalog }
    }

    /// Parse a JSON catalog. Nested objects are flattened into dotted keys;
    /// non-string leaves are ignored.
    pub fn from_json_str(raw: &str) -> PipelineResult<Self> {
        let root: Value = serde_json::from_str(raw)?;
        let Value::Object(_) = root else {
            return Err(PipelineError::config("translation catalog must be a JSON object"));
        };

        let mut catalog = HashMap::new();
        flatten_into(&mut catalog, String::new(), &root);
        Ok(Self { catalog })
    }

    pub fn load(path: &Path) -> PipelineResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Look up `key`, fall back to `fallback`, then interpolate `{{token}}`
    /// and `{token}` placeholders. Unknown tokens stay as written.
    pub fn translate(&self, key: &str, fallback: &str, params: &[(&str, String)]) -> String {
        let template = self.catalog.get(key).map(String::as_str).unwrap_or(fallback);
        if params.is_empty() {
            return template.to_string();
        }

        placeholder_pattern()
            .replace_all(template, |caps: &Captures| {
                let name = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()).unwrap_or_default();
                params
                    .iter()
                    .find(|(token, _)| *token == name)
                    .map(|(_, value)| value.clone())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    pub fn text(&self, text: Text) -> String {
        self.translate(text.key(), text.fallback(), &[])
    }

    pub fn format(&self, text: Text, params: &[(&str, String)]) -> String {
        self.translate(text.key(), text.fallback(), params)
    }
}

fn flatten_into(catalog: &mut HashMap<String, String>, prefix: String, value: &Value) {
    match value {
        Value::String(s) => {
            catalog.insert(prefix, s.clone());
        }
        Value::Object(map) => {
            for (name, child) in map {
                let key = if prefix.is_empty() { name.clone() } else { format!("{prefix}.{name}") };
                flatten_into(catalog, key, child);
            }
        }
        _ => {}
    }
}
