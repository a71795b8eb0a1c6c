//! Board view model: everything a renderer needs, already derived

use std::collections::HashMap;

use serde::Serialize;
use shared::{Deal, DealsPage, DictionaryEntry, ScopeVersion, SortOption, StageDefinition};

use crate::core::appearance::{StageColor, StageIcon};
use crate::core::board::BoardState;
use crate::core::derive::{create_deal_map, filter_deals_by_search, group_deals_by_stage, sort_deals};
use crate::core::format::{
    currency_code, format_currency, format_date, format_probability, StatusTone, DEFAULT_CURRENCY,
};
use crate::core::stages::build_stage_definitions;
use crate::core::translate::{Text, Translator};

/// Filtered deals, their id lookup, and the lanes derived from them
#[derive(Debug)]
pub struct DerivedBoard<'a> {
    pub filtered: Vec<&'a Deal>,
    pub deal_map: HashMap<&'a str, &'a Deal>,
    pub lanes: Vec<StageDefinition>,
}

impl<'a> DerivedBoard<'a> {
    pub fn derive(
        deals: &'a [Deal],
        dictionary: &[DictionaryEntry],
        search_query: &str,
        translator: &Translator,
    ) -> Self {
        let filtered = filter_deals_by_search(deals, search_query);
        let deal_map = create_deal_map(&filtered);
        let lanes = build_stage_definitions(dictionary, &filtered, &translator.text(Text::Unassigned));

        Self { filtered, deal_map, lanes }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub deal: Deal,
    pub is_dragging: bool,
    pub is_pending: bool,
    pub value_label: String,
    pub probability_label: String,
    pub expected_close_label: String,
    pub status_tone: StatusTone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneView {
    pub stage: StageDefinition,
    pub color: Option<StageColor>,
    pub icon: Option<StageIcon>,
    pub cards: Vec<CardView>,
    pub count: usize,
    pub count_label: String,
    pub total_value: f64,
    pub currency: String,
    pub total_heading: String,
    pub total_label: String,
    pub is_active: bool,
    pub empty_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub scope: ScopeVersion,
    pub sort_by: SortOption,
    pub search_query: String,
    pub lanes: Vec<LaneView>,
    /// Deals in the cached page
    pub loaded: usize,
    /// Server-side total
    pub total: u64,
    /// Deals left after the search filter
    pub matched: usize,
    pub limit_notice: Option<String>,
    pub no_results: Option<String>,
    pub empty_state: Option<String>,
    pub load_error: Option<String>,
}

impl BoardView {
    pub fn with_load_error(mut self, load_error: Option<String>) -> Self {
        self.load_error = load_error;
        self
    }

    pub fn lane_by_value(&self, value: Option<&str>) -> Option<&LaneView> {
        self.lanes.iter().find(|lane| lane.stage.value.as_deref() == value)
    }

    pub fn card(&self, deal_id: &str) -> Option<&CardView> {
        self.lanes.iter().flat_map(|lane| &lane.cards).find(|card| card.deal.id == deal_id)
    }
}

pub fn build_board(
    page: &DealsPage,
    dictionary: &[DictionaryEntry],
    state: &BoardState,
    translator: &Translator,
    scope: ScopeVersion,
) -> BoardView {
    let derived = DerivedBoard::derive(&page.deals, dictionary, &state.search_query, translator);
    let groups = group_deals_by_stage(&derived.filtered);

    let lanes = derived
        .lanes
        .iter()
        .map(|stage| {
            let members = groups.get(&stage.value.as_deref()).map(Vec::as_slice).unwrap_or_default();
            build_lane(stage, &sort_deals(members, state.sort_by), state, translator)
        })
        .collect();

    let loaded = page.deals.len();
    let limit_notice = page
        .is_truncated()
        .then(|| translator.format(Text::LimitNotice, &[("count", loaded.to_string())]));
    let no_results = (!state.search_query.is_empty() && derived.filtered.is_empty())
        .then(|| translator.format(Text::NoSearchResults, &[("query", state.search_query.clone())]));
    let empty_state = derived.lanes.is_empty().then(|| translator.text(Text::NoStages));

    BoardView {
        scope,
        sort_by: state.sort_by,
        search_query: state.search_query.clone(),
        lanes,
        loaded,
        total: page.total,
        matched: derived.filtered.len(),
        limit_notice,
        no_results,
        empty_state,
        load_error: None,
    }
}

fn build_lane(stage: &StageDefinition, deals: &[&Deal], state: &BoardState, translator: &Translator) -> LaneView {
    let total_value: f64 = deals.iter().filter_map(|deal| deal.value_amount).sum();
    let currency = deals
        .iter()
        .find_map(|deal| deal.value_currency.as_deref())
        .map(|code| currency_code(Some(code)))
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let no_value = translator.text(Text::NoValue);
    let no_probability = translator.text(Text::NoProbability);
    let no_date = translator.text(Text::NoExpectedClose);

    let cards = deals
        .iter()
        .map(|deal| CardView {
            deal: (*deal).clone(),
            is_dragging: state.dragging_id.as_deref() == Some(deal.id.as_str()),
            is_pending: state.is_pending(&deal.id),
            value_label: format_currency(deal.value_amount, deal.value_currency.as_deref(), &no_value),
            probability_label: format_probability(deal.probability, &no_probability),
            expected_close_label: format_date(deal.expected_close_at.as_deref(), &no_date),
            status_tone: StatusTone::classify(deal.status.as_deref()),
        })
        .collect();

    LaneView {
        stage: stage.clone(),
        color: stage.color.as_deref().and_then(StageColor::resolve),
        icon: stage.icon.as_deref().and_then(StageIcon::resolve),
        cards,
        count: deals.len(),
        count_label: translator.format(Text::CountLabel, &[("count", deals.len().to_string())]),
        total_value,
        total_heading: translator.text(Text::TotalValue),
        total_label: format_currency(Some(total_value), Some(currency.as_str()), "0.00 USD"),
        is_active: state.active_lane.as_deref() == Some(stage.id.as_str()),
        empty_label: deals.is_empty().then(|| translator.text(Text::EmptyLane)),
        currency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> DealsPage {
        DealsPage::new(vec![
            Deal::new("d1", "Renewal")
                .with_stage("lead")
                .with_probability(40)
                .with_value(1000.0, Some("EUR")),
            Deal::new("d2", "Expansion").with_stage("qualified"),
            Deal::new("d3", "Pilot"),
            Deal::new("d4", "Upsell")
                .with_stage("lead")
                .with_probability(80)
                .with_value(250.5, None)
                .with_status("Open"),
        ])
    }

    fn dictionary() -> Vec<DictionaryEntry> {
        let mut won = DictionaryEntry::new("won").with_label("Won");
        won.color = Some("emerald".into());
        won.icon = Some("trophy".into());
        vec![DictionaryEntry::new("lead").with_label("Lead"), won]
    }

    #[test]
    fn test_lanes_and_cards() {
        let view = build_board(&page(), &dictionary(), &BoardState::default(), &Translator::new(), ScopeVersion(3));

        let labels: Vec<&str> = view.lanes.iter().map(|l| l.stage.label.as_str()).collect();
        assert_eq!(labels, vec!["Lead", "Won", "qualified", "No stage"]);

        let lead = view.lane_by_value(Some("lead")).unwrap();
        let order: Vec<&str> = lead.cards.iter().map(|c| c.deal.id.as_str()).collect();
        assert_eq!(order, vec!["d4", "d1"]);
        assert_eq!(lead.count_label, "Deals: 2");
        assert_eq!(lead.total_value, 1250.5);
        // first sorted deal with a currency is d1
        assert_eq!(lead.currency, "EUR");
        assert_eq!(lead.total_label, "EUR 1,250.50");
        assert_eq!(lead.empty_label, None);

        let card = view.card("d4").unwrap();
        assert_eq!(card.value_label, "USD 250.50");
        assert_eq!(card.probability_label, "80%");
        assert_eq!(card.expected_close_label, "No date");
        assert_eq!(card.status_tone, StatusTone::Open);

        let won = view.lane_by_value(Some("won")).unwrap();
        assert_eq!(won.color, Some(StageColor::Named(crate::core::appearance::PaletteColor::Emerald)));
        assert_eq!(won.icon, Some(StageIcon::Trophy));
        assert_eq!(won.total_label, "USD 0.00");
        assert_eq!(won.empty_label.as_deref(), Some("No deals in this stage yet."));

        assert_eq!(view.card("d3").unwrap().value_label, "No value assigned");
        assert_eq!(view.scope, ScopeVersion(3));
        assert_eq!(view.limit_notice, None);
        assert_eq!(view.empty_state, None);
    }

    #[test]
    fn test_lanes_partition_filtered_deals() {
        let view = build_board(&page(), &dictionary(), &BoardState::default(), &Translator::new(), ScopeVersion(0));

        let mut ids: Vec<&str> = view.lanes.iter().flat_map(|l| &l.cards).map(|c| c.deal.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["d1", "d2", "d3", "d4"]);
    }

    #[test]
    fn test_card_flags_follow_state() {
        let mut state = BoardState {
            dragging_id: Some("d1".into()),
            active_lane: Some("stage:won:1".into()),
            ..Default::default()
        };
        state.pending.insert("d2".into());

        let view = build_board(&page(), &dictionary(), &state, &Translator::new(), ScopeVersion(0));
        assert!(view.card("d1").unwrap().is_dragging);
        assert!(view.card("d2").unwrap().is_pending);
        assert!(view.lane_by_value(Some("won")).unwrap().is_active);
        assert!(!view.lane_by_value(Some("lead")).unwrap().is_active);
    }

    #[test]
    fn test_limit_and_search_notices() {
        let page = page().with_total(250);
        let state = BoardState {
            search_query: "zzz".into(),
            ..Default::default()
        };

        let view = build_board(&page, &dictionary(), &state, &Translator::new(), ScopeVersion(0));
        assert_eq!(
            view.limit_notice.as_deref(),
            Some("Showing the first 4 deals. Refine your filters to see more.")
        );
        assert_eq!(view.no_results.as_deref(), Some("No deals found matching \"zzz\"."));
        assert_eq!(view.matched, 0);
        // dictionary lanes survive an empty search result
        assert_eq!(view.lanes.len(), 2);
    }

    #[test]
    fn test_empty_state_without_stages() {
        let view = build_board(&DealsPage::default(), &[], &BoardState::default(), &Translator::new(), ScopeVersion(0));
        assert!(view.lanes.is_empty());
        assert_eq!(view.empty_state.as_deref(), Some("Define pipeline stages to start tracking deals."));
    }
}
