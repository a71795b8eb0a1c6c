//! Plain-text board rendering for the terminal

use std::fmt::Write;

use crate::core::{BoardView, CardView, LaneView};

/// Render the whole board, lane after lane
pub fn render_board(view: &BoardView) -> String {
    let mut out = String::new();

    if let Some(error) = &view.load_error {
        let _ = writeln!(out, "❌ {error}");
    }
    if let Some(notice) = &view.limit_notice {
        let _ = writeln!(out, "ℹ️ {notice}");
    }
    if let Some(empty) = &view.empty_state {
        let _ = writeln!(out, "{empty}");
        return out;
    }
    if let Some(no_results) = &view.no_results {
        let _ = writeln!(out, "{no_results}");
    }

    for lane in &view.lanes {
        render_lane(&mut out, lane);
    }
    out
}

fn render_lane(out: &mut String, lane: &LaneView) {
    let icon = lane.icon.map(|icon| format!("{} ", icon.glyph())).unwrap_or_default();
    let color = lane.color.map(|color| format!(" [{}]", color.hex())).unwrap_or_default();

    let _ = writeln!(out);
    let _ = writeln!(out, "{icon}{}{color}", lane.stage.label);
    let _ = writeln!(out, "  {} · {}: {}", lane.count_label, lane.total_heading, lane.total_label);

    if let Some(empty) = &lane.empty_label {
        let _ = writeln!(out, "  {empty}");
    }
    for card in &lane.cards {
        render_card(out, card);
    }
}

fn render_card(out: &mut String, card: &CardView) {
    let marker = if card.is_pending { "…" } else { "-" };
    let _ = writeln!(
        out,
        "  {marker} {} [{}] {} · {} · {}",
        card.deal.title, card.deal.id, card.value_label, card.probability_label, card.expected_close_label
    );

    let people: Vec<&str> = card
        .deal
        .people
        .iter()
        .chain(&card.deal.companies)
        .map(|association| association.label.as_str())
        .collect();
    if !people.is_empty() {
        let _ = writeln!(out, "      {}", people.join(", "));
    }
}
