//! Trait definitions with mockall annotations for testing
//!
//! The board coordinator talks to the outside world only through these
//! traits, so every network path can be replaced by a mock in tests.

use serde_json::Value;
use shared::{DealsListQuery, DictionaryEntry, Notice, UpdateStageRequest};

use crate::error::PipelineResult;

/// Remote deals resource
#[mockall::automock]
#[async_trait::async_trait]
pub trait DealsApi: Send + Sync {
    /// Fetch one page of deals
    ///
    /// # Returns
    /// The raw response body; normalization happens in the core. Non-2xx
    /// responses are `PipelineError::ApiRejected`.
    async fn fetch_page(&self, query: DealsListQuery) -> PipelineResult<Value>;

    /// Persist a deal's new pipeline stage
    async fn update_stage(&self, request: UpdateStageRequest) -> PipelineResult<()>;
}

/// Source of the declared pipeline stages, in display order
#[mockall::automock]
#[async_trait::async_trait]
pub trait StageDictionarySource: Send + Sync {
    async fn fetch_stages(&self) -> PipelineResult<Vec<DictionaryEntry>>;
}

/// Sink for transient user-facing notices
#[mockall::automock]
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
