//! REST API handlers
//!
//! Every board endpoint answers with the current `BoardView`, so a client can
//! re-render from any response.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use pipeline::traits::{DealsApi, StageDictionarySource};
use pipeline::{BoardEvent, BoardView};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::{process_debug, process_warn, Notice, ProcessId, ScopeVersion};

use crate::error::{WebServerError, WebServerResult};
use crate::state::WebServerState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeRequest {
    pub scope_version: u64,
}

/// Health check - /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Current board - GET /api/board
pub async fn get_board<A, D>(State(state): State<WebServerState<A, D>>) -> Json<BoardView>
where
    A: DealsApi + 'static,
    D: StageDictionarySource + 'static,
{
    Json(state.pipeline.view().await)
}

/// Apply one board event - POST /api/board/events
///
/// Stage updates started by a drop run in the background; their outcome
/// arrives as a notice and in the next board read.
pub async fn post_event<A, D>(
    State(state): State<WebServerState<A, D>>,
    payload: Result<Json<BoardEvent>, JsonRejection>,
) -> WebServerResult<Json<BoardView>>
where
    A: DealsApi + 'static,
    D: StageDictionarySource + 'static,
{
    let Json(event) = payload.map_err(|rejection| WebServerError::InvalidRequest {
        details: rejection.body_text(),
    })?;
    process_debug!(ProcessId::current(), "Board event: {:?}", event);

    for pending in state.pipeline.apply(event).await {
        let pipeline = state.pipeline.clone();
        tokio::spawn(async move {
            pipeline.complete_move(pending).await;
        });
    }

    Ok(Json(state.pipeline.view().await))
}

/// Forced refetch - POST /api/board/refresh
pub async fn refresh_board<A, D>(State(state): State<WebServerState<A, D>>) -> Json<BoardView>
where
    A: DealsApi + 'static,
    D: StageDictionarySource + 'static,
{
    if let Err(e) = state.pipeline.refresh().await {
        process_warn!(ProcessId::current(), "⚠️ Refresh failed: {}", e);
    }
    Json(state.pipeline.view().await)
}

/// Scope switch - POST /api/board/scope
pub async fn set_scope<A, D>(
    State(state): State<WebServerState<A, D>>,
    payload: Result<Json<ScopeRequest>, JsonRejection>,
) -> WebServerResult<Json<BoardView>>
where
    A: DealsApi + 'static,
    D: StageDictionarySource + 'static,
{
    let Json(request) = payload.map_err(|rejection| WebServerError::InvalidRequest {
        details: rejection.body_text(),
    })?;

    if let Err(e) = state.pipeline.set_scope(ScopeVersion(request.scope_version)).await {
        process_warn!(ProcessId::current(), "⚠️ Scope {} failed to load: {}", request.scope_version, e);
    }
    Ok(Json(state.pipeline.view().await))
}

/// Drain buffered notices - GET /api/notices
pub async fn drain_notices<A, D>(State(state): State<WebServerState<A, D>>) -> Json<Vec<Notice>>
where
    A: DealsApi + 'static,
    D: StageDictionarySource + 'static,
{
    Json(state.notices.drain())
}
