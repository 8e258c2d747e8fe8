//! Public protocol structs for the HTTP endpoints (serde ready).
//! Field names match what the browser extension already sends and reads.

use serde::{Deserialize, Serialize};

use crate::domain::HintSource;

//
// Requests. Every field is optional so an empty body still parses and
// validation can answer with a precise 400.
//

#[derive(Debug, Default, Deserialize)]
pub struct GetHintIn {
  #[serde(default)] pub problem_slug: Option<String>,
  #[serde(default)] pub user_code: Option<String>,
  #[serde(default)] pub hint_level: Option<i64>,
  #[serde(default)] pub language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TestHintIn {
  #[serde(default)] pub problem_slug: Option<String>,
  #[serde(default)] pub user_code: Option<String>,
  #[serde(default)] pub hint_level: Option<i64>,
}

//
// Responses
//

#[derive(Debug, Serialize, Deserialize)]
pub struct GetHintOut {
  pub hint: String,
  pub problem: String,
  pub difficulty: String,
  #[serde(rename = "hintLevel")]
  pub hint_level: i64,
  pub source: HintSource,
}

#[derive(Debug, Serialize)]
pub struct TestHintOut {
  pub hint: String,
  #[serde(rename = "type")]
  pub kind: &'static str,
  pub problem: String,
}

#[derive(Debug, Serialize)]
pub struct HealthOut {
  pub status: &'static str,
  pub timestamp: String,
  pub environment: Option<String>,
  pub groq_key: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NotFoundOut {
  pub error: &'static str,
  pub available_endpoints: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
  pub error: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub received: Option<serde_json::Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub stack: Option<String>,
}
