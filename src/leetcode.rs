//! LeetCode GraphQL metadata fetcher.
//!
//! A single `question(titleSlug:)` query. Any problem along the way is returned
//! as a `FetchFailure`; the caller decides how to degrade.

use reqwest::header::{ACCEPT, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::LeetCodeSettings;
use crate::domain::{Difficulty, ProblemContext};
use crate::text::sanitize_html;

const QUESTION_QUERY: &str = r#"
  query getQuestionDetail($titleSlug: String!) {
    question(titleSlug: $titleSlug) {
      title
      content
      difficulty
      topicTags {
        name
      }
    }
  }
"#;

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Error)]
pub enum FetchFailure {
  #[error("request to LeetCode failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("LeetCode HTTP {0}")]
  Status(u16),
  #[error("GraphQL errors: {}", .0.join("; "))]
  GraphQl(Vec<String>),
  #[error("no question found for slug")]
  NotFound,
}

#[derive(Clone)]
pub struct ProblemFetcher {
  client: reqwest::Client,
  pub graphql_url: String,
}

impl ProblemFetcher {
  pub fn new(settings: &LeetCodeSettings) -> Result<Self, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(settings.timeout).build()?;
    Ok(Self { client, graphql_url: settings.graphql_url.clone() })
  }

  /// Fetch and normalize problem metadata. `language` is carried into the context as-is.
  #[instrument(level = "info", skip(self), fields(%slug))]
  pub async fn fetch(&self, slug: &str, language: &str) -> Result<ProblemContext, FetchFailure> {
    let body = GraphQlRequest {
      query: QUESTION_QUERY,
      variables: json!({ "titleSlug": slug }),
    };

    let res = self.client.post(&self.graphql_url)
      .header(CONTENT_TYPE, "application/json")
      .header(USER_AGENT, BROWSER_UA)
      .header(ACCEPT, "application/json")
      .header(ORIGIN, "https://leetcode.com")
      .header(REFERER, format!("https://leetcode.com/problems/{}/", slug))
      .json(&body).send().await?;

    let status = res.status();
    info!(target: "leetcode_mentor", status = status.as_u16(), "LeetCode API response");
    if !status.is_success() {
      return Err(FetchFailure::Status(status.as_u16()));
    }

    let payload: GraphQlResponse = res.json().await?;
    if let Some(errors) = payload.errors.filter(|e| !e.is_empty()) {
      let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
      warn!(target: "leetcode_mentor", errors = ?messages, "GraphQL errors");
      return Err(FetchFailure::GraphQl(messages));
    }

    let question = payload.data.and_then(|d| d.question).ok_or(FetchFailure::NotFound)?;
    info!(target: "leetcode_mentor", title = %question.title, "Fetched problem");

    Ok(ProblemContext {
      title: question.title,
      description: sanitize_html(question.content.as_deref().unwrap_or_default()),
      difficulty: Difficulty::from_optional(question.difficulty.as_deref()),
      tags: question.topic_tags.into_iter().map(|t| t.name).collect(),
      language: language.to_string(),
    })
  }
}

// --- GraphQL DTOs ---

#[derive(Serialize)]
struct GraphQlRequest {
  query: &'static str,
  variables: serde_json::Value,
}

#[derive(Deserialize)]
struct GraphQlResponse {
  #[serde(default)] data: Option<QuestionData>,
  #[serde(default)] errors: Option<Vec<GraphQlError>>,
}
#[derive(Deserialize)]
struct GraphQlError { #[serde(default)] message: String }
#[derive(Deserialize)]
struct QuestionData { #[serde(default)] question: Option<Question> }
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Question {
  title: String,
  #[serde(default)] content: Option<String>,
  #[serde(default)] difficulty: Option<String>,
  #[serde(default)] topic_tags: Vec<TopicTag>,
}
#[derive(Deserialize)]
struct TopicTag { name: String }
