//! Stage-lane derivation

use std::collections::HashSet;

use shared::{Deal, DictionaryEntry, StageDefinition};

pub const UNASSIGNED_LANE_ID: &str = "stage:__unassigned";

/// Ordered lanes: dictionary stages, then unknown stages in first-seen order,
/// then the "no stage" lane when any deal lacks a stage.
///
/// Every deal maps to exactly one returned lane by its `pipeline_stage`.
pub fn build_stage_definitions(
    dictionary: &[DictionaryEntry],
    deals: &[&Deal],
    unassigned_label: &str,
) -> Vec<StageDefinition> {
    let mut lanes = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (index, entry) in dictionary.iter().enumerate() {
        if !seen.insert(entry.value.as_str()) {
            continue;
        }
        let label = entry
            .label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .unwrap_or(&entry.value);

        lanes.push(StageDefinition {
            id: format!("stage:{}:{}", entry.value, index),
            value: Some(entry.value.clone()),
            label: label.to_string(),
            color: entry.color.clone(),
            icon: entry.icon.clone(),
        });
    }

    for stage in deals.iter().filter_map(|deal| deal.pipeline_stage.as_deref()) {
        if seen.insert(stage) {
            lanes.push(StageDefinition {
                id: format!("stage:{stage}"),
                value: Some(stage.to_string()),
                label: stage.to_string(),
                color: None,
                icon: None,
            });
        }
    }

    if deals.iter().any(|deal| deal.pipeline_stage.is_none()) {
        lanes.push(StageDefinition {
            id: UNASSIGNED_LANE_ID.to_string(),
            value: None,
            label: unassigned_label.to_string(),
            color: None,
            icon: None,
        });
    }

    lanes
}

pub fn find_lane<'a>(lanes: &'a [StageDefinition], lane_id: &str) -> Option<&'a StageDefinition> {
    lanes.iter().find(|lane| lane.id == lane_id)
}

pub fn find_lane_by_value<'a>(lanes: &'a [StageDefinition], value: &str) -> Option<&'a StageDefinition> {
    lanes.iter().find(|lane| lane.value.as_deref() == Some(value))
}
