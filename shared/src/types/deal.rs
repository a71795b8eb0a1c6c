//! Deal records and stage definitions
//!
//! These are the normalized shapes: everything coming off the wire has already
//! been trimmed, coerced and defaulted by the pipeline normalizer.

use serde::{Deserialize, Serialize};

/// Person or company linked to a deal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealAssociation {
    pub id: String,
    pub label: String,
}

impl DealAssociation {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Normalized deal record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub title: String,
    pub status: Option<String>,
    pub pipeline_stage: Option<String>,
    pub value_amount: Option<f64>,
    pub value_currency: Option<String>,
    /// Always within [0, 100]
    pub probability: Option<u8>,
    pub expected_close_at: Option<String>,
    pub expected_close_at_ts: Option<i64>,
    pub created_at: Option<String>,
    pub created_at_ts: Option<i64>,
    pub updated_at: Option<String>,
    pub people: Vec<DealAssociation>,
    pub companies: Vec<DealAssociation>,
}

impl Deal {
    /// Minimal deal with only identity and title set
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: None,
            pipeline_stage: None,
            value_amount: None,
            value_currency: None,
            probability: None,
            expected_close_at: None,
            expected_close_at_ts: None,
            created_at: None,
            created_at_ts: None,
            updated_at: None,
            people: Vec::new(),
            companies: Vec::new(),
        }
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.pipeline_stage = Some(stage.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_probability(mut self, probability: u8) -> Self {
        self.probability = Some(probability.min(100));
        self
    }

    pub fn with_created_at_ts(mut self, ts: i64) -> Self {
        self.created_at_ts = Some(ts);
        self
    }

    pub fn with_expected_close_at_ts(mut self, ts: i64) -> Self {
        self.expected_close_at_ts = Some(ts);
        self
    }

    pub fn with_value(mut self, amount: f64, currency: Option<&str>) -> Self {
        self.value_amount = Some(amount);
        self.value_currency = currency.map(str::to_string);
        self
    }

    pub fn with_person(mut self, id: &str, label: &str) -> Self {
        self.people.push(DealAssociation::new(id, label));
        self
    }

    pub fn with_company(mut self, id: &str, label: &str) -> Self {
        self.companies.push(DealAssociation::new(id, label));
        self
    }
}

/// One fetched page of deals plus the server-side total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealsPage {
    pub deals: Vec<Deal>,
    pub total: u64,
}

impl DealsPage {
    pub fn new(deals: Vec<Deal>) -> Self {
        let total = deals.len() as u64;
        Self { deals, total }
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total = total;
        self
    }

    /// True when the server holds more deals than this page carries
    pub fn is_truncated(&self) -> bool {
        self.total > self.deals.len() as u64
    }
}

/// Pipeline-stage entry as declared in the stage dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub id: String,
    pub value: String,
    pub label: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl DictionaryEntry {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            id: value.clone(),
            value,
            label: None,
            color: None,
            icon: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// One lane of the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDefinition {
    /// Unique per stage occurrence
    pub id: String,
    /// `None` is the "unassigned" pseudo-stage
    pub value: Option<String>,
    pub label: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl StageDefinition {
    pub fn is_unassigned(&self) -> bool {
        self.value.is_none()
    }
}
