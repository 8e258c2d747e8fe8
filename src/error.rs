//! HTTP-boundary errors. Upstream failures never get here; they are degraded
//! inside `hints`. What's left is bad input and genuine internal faults.

use std::any::Any;

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use thiserror::Error;
use tracing::error;

use crate::protocol::ErrorOut;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Problem slug is required")]
  MissingSlug { received: Option<String> },
  #[error("Invalid JSON body: {0}")]
  InvalidBody(String),
  /// `expose_stack` is false in production, where the error chain is withheld.
  #[error("{error}")]
  Internal { error: anyhow::Error, expose_stack: bool },
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    match self {
      AppError::MissingSlug { received } => (
        StatusCode::BAD_REQUEST,
        Json(ErrorOut {
          error: "Problem slug is required".into(),
          received: Some(received.map(serde_json::Value::String).unwrap_or(serde_json::Value::Null)),
          message: None,
          stack: None,
        }),
      )
        .into_response(),
      AppError::InvalidBody(message) => (
        StatusCode::BAD_REQUEST,
        Json(ErrorOut {
          error: "Invalid JSON body".into(),
          received: None,
          message: Some(message),
          stack: None,
        }),
      )
        .into_response(),
      AppError::Internal { error, expose_stack } => {
        error!(target: "leetcode_mentor", error = ?error, "Internal server error");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(ErrorOut {
            error: "Internal server error".into(),
            received: None,
            message: Some(error.to_string()),
            stack: expose_stack.then(|| format!("{:?}", error)),
          }),
        )
          .into_response()
      }
    }
  }
}

/// Build the `CatchPanicLayer` handler: panics become the same 500 body as `AppError::Internal`.
pub fn panic_responder(expose_stack: bool) -> impl Fn(Box<dyn Any + Send + 'static>) -> Response + Clone {
  move |payload: Box<dyn Any + Send + 'static>| {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
      s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
      s.to_string()
    } else {
      "handler panicked".to_string()
    };
    AppError::Internal { error: anyhow::anyhow!(message), expose_stack }.into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::body::to_bytes;

  async fn body_json(res: Response) -> serde_json::Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn missing_slug_echoes_received() {
    let res = AppError::MissingSlug { received: Some(String::new()) }.into_response();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json = body_json(res).await;
    assert_eq!(json["error"], "Problem slug is required");
    assert_eq!(json["received"], "");
  }

  #[tokio::test]
  async fn internal_hides_stack_in_production() {
    let err = anyhow::anyhow!("root cause").context("while resolving");
    let res = AppError::Internal { error: err, expose_stack: false }.into_response();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(res).await;
    assert_eq!(json["message"], "while resolving");
    assert!(json.get("stack").is_none());
  }

  #[tokio::test]
  async fn internal_exposes_chain_outside_production() {
    let err = anyhow::anyhow!("root cause").context("while resolving");
    let json = body_json(AppError::Internal { error: err, expose_stack: true }.into_response()).await;
    assert!(json["stack"].as_str().unwrap().contains("root cause"));
  }

  #[tokio::test]
  async fn panic_payload_becomes_message() {
    let respond = panic_responder(false);
    let json = body_json(respond(Box::new("boom"))).await;
    assert_eq!(json["error"], "Internal server error");
    assert_eq!(json["message"], "boom");
  }
}
