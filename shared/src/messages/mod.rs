//! Wire payloads for the remote customers API
//!
//! - `deals`: listing query, stage update body and error payloads
//! - `dictionary`: pipeline-stage dictionary responses

pub mod deals;
pub mod dictionary;

pub use deals::{DealsListQuery, UpdateStageRequest, error_message, DEALS_PATH, MAX_PAGE_SIZE};
pub use dictionary::{DictionaryResponse, PIPELINE_STAGES_PATH};
