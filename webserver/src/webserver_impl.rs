//! Main webserver implementation
//!
//! Routes the board API onto a `Pipeline` built with injected services.

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use pipeline::services::BufferedNotifier;
use pipeline::traits::{DealsApi, StageDictionarySource};
use shared::{logging, process_info, ProcessId};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{WebServerError, WebServerResult};
use crate::state::{BoardPipeline, WebServerState};
use crate::web::handlers::api;

/// Board web server with dependency injection
pub struct WebServer<A, D>
where
    A: DealsApi + 'static,
    D: StageDictionarySource + 'static,
{
    state: WebServerState<A, D>,
}

impl<A, D> WebServer<A, D>
where
    A: DealsApi + 'static,
    D: StageDictionarySource + 'static,
{
    /// `notices` must be the notifier the pipeline was built with
    pub fn new(pipeline: BoardPipeline<A, D>, notices: BufferedNotifier) -> Self {
        Self {
            state: WebServerState::new(pipeline, notices),
        }
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            // Board API
            .route("/api/board", get(api::get_board::<A, D>))
            .route("/api/board/events", post(api::post_event::<A, D>))
            .route("/api/board/refresh", post(api::refresh_board::<A, D>))
            .route("/api/board/scope", post(api::set_scope::<A, D>))
            .route("/api/notices", get(api::drain_notices::<A, D>))
            // Health check
            .route("/health", get(api::health))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
            .with_state(self.state.clone())
    }

    /// Serve until Ctrl+C
    pub async fn run(&self, bind_address: SocketAddr) -> WebServerResult<()> {
        let listener = tokio::net::TcpListener::bind(bind_address)
            .await
            .map_err(|e| WebServerError::ServerStartup(format!("Failed to bind to {}: {}", bind_address, e)))?;

        process_info!(ProcessId::current(), "🌐 Board server listening on http://{}", bind_address);

        axum::serve(listener, self.build_router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    pub fn state(&self) -> &WebServerState<A, D> {
        &self.state
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logging::log_shutdown(ProcessId::current(), "Received Ctrl+C signal"),
        Err(err) => logging::log_error(ProcessId::current(), "Signal handling", &err),
    }
}
