//! Core board logic
//!
//! This module contains pure business logic with no I/O dependencies.
//! All functions are deterministic and easily testable.

pub mod appearance;
pub mod board;
pub mod derive;
pub mod format;
pub mod normalize;
pub mod stages;
pub mod store;
pub mod translate;
pub mod view;

pub use appearance::{PaletteColor, StageColor, StageIcon};
pub use board::{reduce, BoardEffect, BoardEvent, BoardState, MoveOutcome, Transition};
pub use derive::{create_deal_map, filter_deals_by_search, group_deals_by_stage, sort_deals};
pub use format::{format_currency, format_date, format_probability, StatusTone};
pub use normalize::{normalize_amount, normalize_deal, normalize_page, normalize_probability, normalize_timestamp};
pub use stages::build_stage_definitions;
pub use store::{DealStore, FetchStamp, MoveTicket, Settlement};
pub use translate::{Text, Translator};
pub use view::{build_board, BoardView, CardView, DerivedBoard, LaneView};
