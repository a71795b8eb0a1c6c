//! Shared types for the sales pipeline board
//!
//! Contains the deal records, stage definitions and wire payloads used by both
//! the pipeline engine and the board web server. Component-internal types
//! (board state, view models) live in their respective crates.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use types::*;

// Re-export the wire payloads exchanged with the deals API
pub use messages::{
    // Deals resource
    DealsListQuery, UpdateStageRequest, error_message,

    // Dictionary resource
    DictionaryResponse,
};
