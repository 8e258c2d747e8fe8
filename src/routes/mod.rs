//! Router assembly: HTTP endpoints, JSON 404, CORS, panic capture and HTTP tracing.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::error::panic_responder;
use crate::state::AppState;

pub mod http;

/// Request bodies carry the user's code; anything past this is refused.
pub const BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Build the application router with:
/// - API under `/api/...`
/// - JSON 404 listing the available endpoints
/// - 500 with message (and error chain outside production) on handler panics
/// - CORS (allow any origin/method/headers) so the extension can call from the page
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let expose_stack = !state.settings.is_production();

    Router::new()
        .route("/api/health", get(http::http_health))
        .route("/api/get-hint", post(http::http_post_get_hint))
        .route("/api/test-hint", post(http::http_post_test_hint))
        .fallback(http::http_not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CatchPanicLayer::custom(panic_responder(expose_stack)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
