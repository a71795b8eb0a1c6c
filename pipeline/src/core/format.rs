//! Display labels for card and lane values

use chrono::DateTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "USD";

/// `"EUR 12,500.00"`; missing amount yields `fallback`. Codes that are not
/// three letters render as USD.
pub fn format_currency(amount: Option<f64>, currency: Option<&str>, fallback: &str) -> String {
    let Some(amount) = amount.filter(|a| a.is_finite()) else {
        return fallback.to_string();
    };
    format!("{} {}", currency_code(currency), group_thousands(amount))
}

/// Upper-cased three-letter code, else USD
pub fn currency_code(currency: Option<&str>) -> String {
    match currency {
        Some(code) if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) => code.to_ascii_uppercase(),
        _ => DEFAULT_CURRENCY.to_string(),
    }
}

fn group_thousands(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{cents}")
}

pub fn format_probability(probability: Option<u8>, fallback: &str) -> String {
    match probability {
        Some(p) => format!("{p}%"),
        None => fallback.to_string(),
    }
}

/// Medium date (`Jan 5, 2025`) from a normalized ISO string
pub fn format_date(iso: Option<&str>, fallback: &str) -> String {
    iso.and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| fallback.to_string())
}

/// Badge tone derived from the free-text deal status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusTone {
    Muted,
    Open,
    Progress,
    Qualified,
    Closed,
}

impl StatusTone {
    pub fn classify(status: Option<&str>) -> Self {
        let Some(status) = status else {
            return StatusTone::Muted;
        };
        let lower = status.to_lowercase();
        if lower.contains("loose") || lower.contains("open") {
            StatusTone::Open
        } else if lower.contains("progress") || lower.contains("negotiation") {
            StatusTone::Progress
        } else if lower.contains("qualified") {
            StatusTone::Qualified
        } else {
            StatusTone::Closed
        }
    }
}
