//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs basic request/result info, never user code.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use tracing::{info, instrument};

use crate::error::AppError;
use crate::hints::{HintRequest, DEFAULT_LANGUAGE};
use crate::protocol::*;
use crate::state::AppState;

pub const AVAILABLE_ENDPOINTS: &[&str] = &["/api/health", "/api/get-hint", "/api/test-hint"];

/// Canned hints served by `/api/test-hint`; no upstream calls involved.
pub const TEST_HINTS: [&str; 3] = [
  "Try using a hash map to store values you've seen before.",
  "Consider sorting the array first to make the problem easier.",
  "Think about using two pointers to traverse the data.",
];

/// An empty body reads as `{}`; anything else must be valid JSON for `T`.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, AppError> {
  if body.iter().all(u8::is_ascii_whitespace) {
    return Ok(T::default());
  }
  serde_json::from_slice(body).map_err(|e| AppError::InvalidBody(e.to_string()))
}

/// `hint_level - 1` into the canned list, first entry when out of range.
pub fn test_hint_for(level: Option<i64>) -> &'static str {
  level
    .and_then(|l| l.checked_sub(1))
    .and_then(|idx| usize::try_from(idx).ok())
    .and_then(|idx| TEST_HINTS.get(idx).copied())
    .unwrap_or(TEST_HINTS[0])
}

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut {
    status: "OK",
    timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    environment: state.settings.environment.clone(),
    groq_key: if state.resolver.has_credential() { "Set" } else { "Missing" },
  })
}

#[instrument(level = "info", skip(body), fields(body_len = body.len()))]
pub async fn http_post_test_hint(body: Bytes) -> Result<Json<TestHintOut>, AppError> {
  let input: TestHintIn = parse_body(&body)?;
  info!(target: "hint", problem_slug = ?input.problem_slug, hint_level = ?input.hint_level, has_code = input.user_code.is_some(), "Test hint request");
  Ok(Json(TestHintOut {
    hint: test_hint_for(input.hint_level).to_string(),
    kind: "TEST_HINT",
    problem: input.problem_slug.unwrap_or_else(|| "test-problem".into()),
  }))
}

#[instrument(level = "info", skip(state, body), fields(body_len = body.len()))]
pub async fn http_post_get_hint(
  State(state): State<Arc<AppState>>,
  body: Bytes,
) -> Result<Json<GetHintOut>, AppError> {
  let input: GetHintIn = parse_body(&body)?;
  info!(
    target: "hint",
    problem_slug = ?input.problem_slug,
    hint_level = ?input.hint_level,
    language = ?input.language,
    code_len = ?input.user_code.as_ref().map(|c| c.len()),
    "Hint request received"
  );

  let problem_slug = match input.problem_slug {
    Some(slug) if !slug.trim().is_empty() => slug.trim().to_string(),
    received => return Err(AppError::MissingSlug { received }),
  };

  let req = HintRequest {
    problem_slug,
    user_code: input.user_code.unwrap_or_default(),
    hint_level: input.hint_level.filter(|l| *l >= 1).unwrap_or(1),
    language: input
      .language
      .filter(|l| !l.trim().is_empty())
      .unwrap_or_else(|| DEFAULT_LANGUAGE.into()),
  };

  let resolved = state.resolver.resolve(&req).await;
  info!(target: "hint", problem = %resolved.problem, source = %resolved.source, "HTTP hint served");

  Ok(Json(GetHintOut {
    hint: resolved.hint,
    problem: resolved.problem,
    difficulty: resolved.difficulty.to_string(),
    hint_level: resolved.hint_level,
    source: resolved.source,
  }))
}

pub async fn http_not_found() -> impl IntoResponse {
  (
    StatusCode::NOT_FOUND,
    Json(NotFoundOut { error: "Endpoint not found", available_endpoints: AVAILABLE_ENDPOINTS }),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_hint_indexing() {
    assert_eq!(test_hint_for(Some(1)), TEST_HINTS[0]);
    assert_eq!(test_hint_for(Some(2)), TEST_HINTS[1]);
    assert_eq!(test_hint_for(Some(3)), TEST_HINTS[2]);
    assert_eq!(test_hint_for(Some(4)), TEST_HINTS[0]);
    assert_eq!(test_hint_for(Some(0)), TEST_HINTS[0]);
    assert_eq!(test_hint_for(Some(-3)), TEST_HINTS[0]);
    assert_eq!(test_hint_for(None), TEST_HINTS[0]);
  }

  #[test]
  fn empty_body_parses_as_default() {
    let parsed: GetHintIn = parse_body(&Bytes::from_static(b"  \n")).unwrap();
    assert!(parsed.problem_slug.is_none());
  }

  #[test]
  fn malformed_body_is_rejected() {
    let err = parse_body::<GetHintIn>(&Bytes::from_static(b"{not json")).unwrap_err();
    assert!(matches!(err, AppError::InvalidBody(_)));
  }
}
