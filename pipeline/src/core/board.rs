//! Board interaction state machine
//!
//! `reduce` is pure: it takes the current state and one event and returns the
//! next state plus the effects the caller must run (start a move, show a
//! notice, invalidate the cache). Drops are resolved against the derived board
//! so a deal hidden by the search filter cannot be moved.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use shared::{Notice, SortOption};

use crate::core::stages::find_lane;
use crate::core::translate::{Text, Translator};
use crate::core::view::DerivedBoard;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    pub sort_by: SortOption,
    pub search_query: String,
    pub dragging_id: Option<String>,
    pub active_lane: Option<String>,
    /// Deals with a stage move in flight
    pub pending: BTreeSet<String>,
}

impl BoardState {
    pub fn is_pending(&self, deal_id: &str) -> bool {
        self.pending.contains(deal_id)
    }
}

/// How a stage move ended on the network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum MoveOutcome {
    Committed,
    RolledBack { message: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoardEvent {
    #[serde(rename_all = "camelCase")]
    DragStart { deal_id: String },
    DragEnd,
    #[serde(rename_all = "camelCase")]
    DragOver { lane_id: String },
    /// `deal_id` falls back to the deal currently being dragged
    #[serde(rename_all = "camelCase")]
    DropOnLane {
        lane_id: String,
        #[serde(default)]
        deal_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    SortChange { sort_by: SortOption },
    SearchChange { query: String },
    ClearSearch,
    /// Emitted by the move runner, never accepted from clients
    #[serde(skip_deserializing, rename_all = "camelCase")]
    MoveSettled { deal_id: String, outcome: MoveOutcome },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEffect {
    StartMove { deal_id: String, stage: String },
    Notify(Notice),
    Invalidate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: BoardState,
    pub effects: Vec<BoardEffect>,
}

pub fn reduce(
    mut state: BoardState,
    event: BoardEvent,
    board: &DerivedBoard<'_>,
    translator: &Translator,
) -> Transition {
    let mut effects = Vec::new();

    match event {
        BoardEvent::DragStart { deal_id } => {
            state.dragging_id = Some(deal_id);
        }
        BoardEvent::DragEnd => {
            state.dragging_id = None;
            state.active_lane = None;
        }
        BoardEvent::DragOver { lane_id } => {
            if state.active_lane.as_deref() != Some(lane_id.as_str()) {
                state.active_lane = Some(lane_id);
            }
        }
        BoardEvent::DropOnLane { lane_id, deal_id } => {
            state.active_lane = None;
            let dragged = state.dragging_id.take();
            if let Some(deal_id) = deal_id.or(dragged) {
                if let Some(effect) = plan_drop(&mut state, &lane_id, &deal_id, board, translator) {
                    effects.push(effect);
                }
            }
        }
        BoardEvent::SortChange { sort_by } => {
            state.sort_by = sort_by;
        }
        BoardEvent::SearchChange { query } => {
            state.search_query = query;
        }
        BoardEvent::ClearSearch => {
            state.search_query.clear();
        }
        BoardEvent::MoveSettled { deal_id, outcome } => {
            state.pending.remove(&deal_id);
            let notice = match outcome {
                MoveOutcome::Committed => Notice::success(translator.text(Text::MoveSuccess)),
                MoveOutcome::RolledBack { message } => Notice::error(
                    message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| translator.text(Text::MoveError)),
                ),
            };
            effects.push(BoardEffect::Notify(notice));
            effects.push(BoardEffect::Invalidate);
        }
    }

    Transition { state, effects }
}

fn plan_drop(
    state: &mut BoardState,
    lane_id: &str,
    deal_id: &str,
    board: &DerivedBoard<'_>,
    translator: &Translator,
) -> Option<BoardEffect> {
    let lane = find_lane(&board.lanes, lane_id)?;
    let deal = board.deal_map.get(deal_id)?;

    let Some(stage) = lane.value.as_deref() else {
        return Some(BoardEffect::Notify(Notice::info(translator.text(Text::UnassignedDisabled))));
    };
    if deal.pipeline_stage.as_deref() == Some(stage) {
        return None;
    }
    if state.is_pending(deal_id) {
        return Some(BoardEffect::Notify(Notice::info(translator.text(Text::AlreadyPending))));
    }

    state.pending.insert(deal_id.to_string());
    Some(BoardEffect::StartMove {
        deal_id: deal_id.to_string(),
        stage: stage.to_string(),
    })
}
