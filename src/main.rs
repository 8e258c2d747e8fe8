//! LeetCode Mentor · hint relay backend
//!
//! - Axum HTTP API consumed by the browser extension
//! - Optional Groq integration (via environment variables)
//! - Static fallback hint table when Groq is unavailable
//!
//! Important env variables:
//!   PORT                  : u16 (default 3000)
//!   APP_ENV / NODE_ENV    : "production" hides error chains in 500 responses
//!   GROQ_API_KEY          : enables Groq integration if present
//!   GROQ_API_URL          : default "https://api.groq.com/openai/v1/chat/completions"
//!   GROQ_MODEL            : default "llama-3.1-8b-instant"
//!   LEETCODE_GRAPHQL_URL  : default "https://leetcode.com/graphql"
//!   HINT_CONFIG_PATH      : path to TOML config (prompts + fallback hints)
//!   LOG_LEVEL             : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT            : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tracing::info;

use leetcode_mentor::config::Settings;
use leetcode_mentor::routes::build_router;
use leetcode_mentor::state::AppState;
use leetcode_mentor::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();
  telemetry::init_tracing();

  let settings = Settings::from_env();
  let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
  let environment = settings.environment.clone().unwrap_or_else(|| "development".into());

  // Shared, read-only application state (settings, fallback table, clients).
  let state = Arc::new(AppState::new(settings)?);
  let app = build_router(state);

  let listener = TcpListener::bind(addr).await?;
  info!(target: "leetcode_mentor", %addr, %environment, "HTTP server listening");
  info!(target: "leetcode_mentor", "Health check: http://localhost:{}/api/health", addr.port());
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "leetcode_mentor", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "leetcode_mentor", error = %e, "Failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
  info!(target: "leetcode_mentor", "Shutdown signal received");
}
