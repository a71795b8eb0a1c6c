//! Raw API records to typed deals
//!
//! Field-level parse failures never abort a record: they normalize to `None`.
//! Only items that are not objects, or carry no string id, are dropped.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Value};
use shared::{Deal, DealAssociation, DealsPage};

/// ISO string plus epoch milliseconds; both `None` when the input is not a date
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedTimestamp {
    pub iso: Option<String>,
    pub ts: Option<i64>,
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Finite numbers and trimmed numeric strings; anything else is `None`
pub fn normalize_amount(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Amount coercion, clamped to [0, 100] and rounded half up
pub fn normalize_probability(value: &Value) -> Option<u8> {
    let parsed = normalize_amount(value)?;
    let clamped = parsed.clamp(0.0, 100.0);
    Some(clamped.round() as u8)
}

pub fn normalize_timestamp(value: &Value) -> NormalizedTimestamp {
    let Some(raw) = value.as_str().map(str::trim).filter(|s| !s.is_empty()) else {
        return NormalizedTimestamp::default();
    };

    match parse_instant(raw) {
        Some(instant) => NormalizedTimestamp {
            iso: Some(instant.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ts: Some(instant.timestamp_millis()),
        },
        None => NormalizedTimestamp::default(),
    }
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc));
    }
    if let Ok(with_offset) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(with_offset.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn trimmed_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn normalize_associations(value: Option<&Value>) -> Vec<DealAssociation> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let id = item.get("id")?.as_str()?;
            let label = trimmed_string(item.get("label")).unwrap_or_else(|| id.to_string());
            Some(DealAssociation::new(id, label))
        })
        .collect()
}

fn field<'a>(record: &'a Map<String, Value>, name: &str) -> &'a Value {
    record.get(name).unwrap_or(&Value::Null)
}

/// Normalize one raw item; `untitled` replaces blank titles
pub fn normalize_deal(item: &Value, untitled: &str) -> Option<Deal> {
    let record = item.as_object()?;
    let id = record.get("id")?.as_str().filter(|id| !id.is_empty())?;

    let expected_close = normalize_timestamp(field(record, "expected_close_at"));
    let created = normalize_timestamp(field(record, "created_at"));
    let updated = normalize_timestamp(field(record, "updated_at"));

    Some(Deal {
        id: id.to_string(),
        title: trimmed_string(record.get("title")).unwrap_or_else(|| untitled.to_string()),
        status: trimmed_string(record.get("status")),
        pipeline_stage: trimmed_string(record.get("pipeline_stage")),
        value_amount: normalize_amount(field(record, "value_amount")),
        value_currency: trimmed_string(record.get("value_currency")).map(|c| c.to_uppercase()),
        probability: normalize_probability(field(record, "probability")),
        expected_close_at: expected_close.iso,
        expected_close_at_ts: expected_close.ts,
        created_at: created.iso,
        created_at_ts: created.ts,
        updated_at: updated.iso,
        people: normalize_associations(record.get("people")),
        companies: normalize_associations(record.get("companies")),
    })
}

/// Normalize a whole list response: `{ items: [...], total }`
pub fn normalize_page(payload: &Value, untitled: &str) -> DealsPage {
    let deals: Vec<Deal> = payload
        .get("items")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|item| normalize_deal(item, untitled)).collect())
        .unwrap_or_default();

    let total = payload
        .get("total")
        .and_then(Value::as_f64)
        .filter(|t| t.is_finite() && *t >= 0.0)
        .map(|t| t as u64)
        .unwrap_or(deals.len() as u64);

    DealsPage { deals, total }
}
