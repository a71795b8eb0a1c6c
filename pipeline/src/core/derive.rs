//! Filtering, grouping and sorting over borrowed deals
//!
//! Nothing here mutates or clones deals: every function returns references
//! into the page it was given.

use std::cmp::Ordering;
use std::collections::HashMap;

use shared::{Deal, SortOption};

/// Case-insensitive substring match on title, people and companies.
/// A blank query keeps every deal in input order.
pub fn filter_deals_by_search<'a>(deals: &'a [Deal], query: &str) -> Vec<&'a Deal> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return deals.iter().collect();
    }

    deals
        .iter()
        .filter(|deal| {
            deal.title.to_lowercase().contains(&needle)
                || deal.people.iter().any(|p| p.label.to_lowercase().contains(&needle))
                || deal.companies.iter().any(|c| c.label.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Buckets keyed by stage (`None` = unassigned), input order kept per bucket
pub fn group_deals_by_stage<'a>(deals: &[&'a Deal]) -> HashMap<Option<&'a str>, Vec<&'a Deal>> {
    let mut groups: HashMap<Option<&'a str>, Vec<&'a Deal>> = HashMap::new();
    for &deal in deals {
        groups.entry(deal.pipeline_stage.as_deref()).or_default().push(deal);
    }
    groups
}

/// Stable sort returning a new sequence
pub fn sort_deals<'a>(deals: &[&'a Deal], sort_by: SortOption) -> Vec<&'a Deal> {
    let mut sorted = deals.to_vec();
    sorted.sort_by(|a, b| compare_deals(a, b, sort_by));
    sorted
}

pub fn create_deal_map<'a>(deals: &[&'a Deal]) -> HashMap<&'a str, &'a Deal> {
    deals.iter().map(|&deal| (deal.id.as_str(), deal)).collect()
}

fn compare_deals(a: &Deal, b: &Deal, sort_by: SortOption) -> Ordering {
    let primary = match sort_by {
        SortOption::Probability => probability_key(b).cmp(&probability_key(a)),
        SortOption::ExpectedCloseAt => ascending_missing_last(a.expected_close_at_ts, b.expected_close_at_ts),
        SortOption::CreatedAt => Ordering::Equal,
    };

    primary
        .then_with(|| descending_missing_last(a.created_at_ts, b.created_at_ts))
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
}

fn probability_key(deal: &Deal) -> i16 {
    deal.probability.map(i16::from).unwrap_or(-1)
}

fn ascending_missing_last(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn descending_missing_last(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
