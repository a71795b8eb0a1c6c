//! Test fixtures for the pipeline integration tests

use serde_json::{json, Value};
use shared::{DictionaryEntry, ScopeVersion};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const SCOPE: ScopeVersion = ScopeVersion(1);
    pub const OTHER_SCOPE: ScopeVersion = ScopeVersion(2);

    /// Declared stages: lead, qualified (no deals), won
    pub fn dictionary() -> Vec<DictionaryEntry> {
        let mut lead = DictionaryEntry::new("lead").with_label("Lead");
        lead.color = Some("blue".to_string());
        lead.icon = Some("lucide:target".to_string());

        let qualified = DictionaryEntry::new("qualified").with_label(" Qualified ");

        let mut won = DictionaryEntry::new("won").with_label("Won");
        won.color = Some("#16a34a".to_string());
        won.icon = Some("trophy".to_string());

        vec![lead, qualified, won]
    }

    /// Raw deal records as the API returns them
    ///
    /// Two lead deals, one won, one without a stage and one on a stage the
    /// dictionary does not declare.
    pub fn deal_records() -> Vec<Value> {
        vec![
            json!({
                "id": "d1",
                "title": "Acme renewal",
                "pipeline_stage": "lead",
                "value_amount": 1000,
                "value_currency": "usd",
                "probability": 40,
                "created_at": "2025-01-10T09:00:00Z",
                "people": [{ "id": "p1", "label": "Ada Lovelace" }]
            }),
            json!({
                "id": "d2",
                "title": "Globex expansion",
                "pipeline_stage": "lead",
                "value_amount": "2500.50",
                "value_currency": "USD",
                "probability": 80,
                "created_at": "2025-01-12T09:00:00Z",
                "companies": [{ "id": "c1", "label": "Globex" }]
            }),
            json!({
                "id": "d3",
                "title": "Initech pilot",
                "pipeline_stage": "won",
                "value_amount": 700,
                "value_currency": "eur",
                "probability": 100,
                "expected_close_at": "2025-02-01"
            }),
            json!({ "id": "d4", "title": "Umbrella audit", "pipeline_stage": null }),
            json!({ "id": "d5", "title": "Hooli trial", "pipeline_stage": "legacy" }),
        ]
    }

    /// Lane values in display order for the standard data
    pub fn lane_values() -> Vec<Option<String>> {
        vec![
            Some("lead".to_string()),
            Some("qualified".to_string()),
            Some("won".to_string()),
            Some("legacy".to_string()),
            None,
        ]
    }
}
