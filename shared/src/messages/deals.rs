//! Deals resource payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Path of the deals collection, relative to the API base URL
pub const DEALS_PATH: &str = "/api/customers/deals";

/// Largest page the board requests
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters of the deals listing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealsListQuery {
    pub page: u32,
    pub page_size: u32,
    pub sort_field: String,
    pub sort_dir: String,
}

impl DealsListQuery {
    /// First page, newest deals first, page size capped at [`MAX_PAGE_SIZE`]
    pub fn first_page(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            sort_field: "createdAt".to_string(),
            sort_dir: "desc".to_string(),
        }
    }
}

impl Default for DealsListQuery {
    fn default() -> Self {
        Self::first_page(MAX_PAGE_SIZE)
    }
}

/// Body of the stage update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStageRequest {
    pub id: String,
    pub pipeline_stage: String,
}

/// Server-provided `error` message of a failed response, if any
pub fn error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
