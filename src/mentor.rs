//! Client session: the popup flow of the browser extension.
//!
//! A `MentorSession` is bound to one problem. It asks a `HintBackend` for the
//! next hint level (at most three per problem), keeps the hints and a cursor in
//! the `HintStore`, and lets the user step through or reset them.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use crate::history::{now_ms, HintHistory, HintStore, StoreError};
use crate::page::{ProblemPage, UNKNOWN_SLUG};
use crate::protocol::GetHintOut;

pub const MAX_HINTS_PER_PROBLEM: usize = 3;
pub const NO_CODE_YET: &str = "// No code yet";
pub const DEFAULT_SERVER: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("Failed to get hint: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("Failed to get hint: server answered {status}: {body}")]
  Status { status: u16, body: String },
  #[error(transparent)]
  Store(#[from] StoreError),
  #[error("Maximum 3 hints per problem")]
  LimitReached,
  #[error("Please navigate to a LeetCode problem page.")]
  NotProblemPage,
}

/// Body of `POST /api/get-hint` as the client sends it.
#[derive(Clone, Debug, Serialize)]
pub struct HintQuery {
  pub problem_slug: String,
  pub user_code: String,
  pub hint_level: i64,
  pub language: String,
}

pub type HintReply = GetHintOut;

#[async_trait]
pub trait HintBackend: Send + Sync {
  async fn request_hint(&self, query: &HintQuery) -> Result<HintReply, ClientError>;
}

#[async_trait]
impl<T: HintBackend> HintBackend for Arc<T> {
  async fn request_hint(&self, query: &HintQuery) -> Result<HintReply, ClientError> {
    (**self).request_hint(query).await
  }
}

/// Talks to the relay server over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
  client: reqwest::Client,
  pub base_url: String,
}

impl HttpBackend {
  pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
    // Server waits up to 10s on LeetCode plus 30s on Groq.
    let client = reqwest::Client::builder().timeout(Duration::from_secs(45)).build()?;
    Ok(Self { client, base_url: base_url.into().trim_end_matches('/').to_string() })
  }
}

#[async_trait]
impl HintBackend for HttpBackend {
  #[instrument(level = "info", skip(self, query), fields(slug = %query.problem_slug, level = query.hint_level))]
  async fn request_hint(&self, query: &HintQuery) -> Result<HintReply, ClientError> {
    let res = self.client.post(format!("{}/api/get-hint", self.base_url))
      .header(CONTENT_TYPE, "application/json")
      .json(query).send().await?;

    let status = res.status();
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      return Err(ClientError::Status { status: status.as_u16(), body });
    }
    Ok(res.json::<HintReply>().await?)
  }
}

pub struct MentorSession<B> {
  store: Arc<HintStore>,
  backend: B,
  slug: String,
  language: String,
  history: HintHistory,
}

impl<B: HintBackend> MentorSession<B> {
  /// Bind to the problem on `page` and load whatever history is stored for it.
  /// Pages that aren't a LeetCode problem are refused before the store is touched.
  pub async fn open(
    store: Arc<HintStore>,
    backend: B,
    page: &dyn ProblemPage,
    language: impl Into<String>,
  ) -> Result<Self, ClientError> {
    let slug = page.extract_context().problem_slug;
    if slug == UNKNOWN_SLUG {
      return Err(ClientError::NotProblemPage);
    }
    let history = store.load(&slug).await?.unwrap_or_default();
    Ok(Self { store, backend, slug, language: language.into(), history })
  }

  pub fn slug(&self) -> &str {
    &self.slug
  }

  pub fn hints(&self) -> &[String] {
    &self.history.hints
  }

  pub fn current_index(&self) -> usize {
    self.history.current_index
  }

  /// Hint under the cursor, if any.
  pub fn current(&self) -> Option<&str> {
    self.history.hints.get(self.history.current_index).map(String::as_str)
  }

  pub fn can_request(&self) -> bool {
    self.history.hints.len() < MAX_HINTS_PER_PROBLEM
  }

  pub fn has_next(&self) -> bool {
    self.history.current_index.saturating_add(1) < self.history.hints.len()
  }

  /// Fetch the next level, append it and move the cursor onto it.
  /// The page is re-read so the request carries the latest code.
  pub async fn get_hint(&mut self, page: &dyn ProblemPage) -> Result<&str, ClientError> {
    if !self.can_request() {
      return Err(ClientError::LimitReached);
    }

    let ctx = page.extract_context();
    let query = HintQuery {
      problem_slug: self.slug.clone(),
      user_code: if ctx.user_code.is_empty() { NO_CODE_YET.to_string() } else { ctx.user_code },
      hint_level: self.history.hints.len() as i64 + 1,
      language: self.language.clone(),
    };
    let reply = self.backend.request_hint(&query).await?;
    info!(target: "leetcode_mentor", slug = %self.slug, level = query.hint_level, source = %reply.source, "Hint received");

    self.history.hints.push(reply.hint);
    self.history.current_index = self.history.hints.len() - 1;
    self.persist().await?;
    Ok(self.history.hints[self.history.current_index].as_str())
  }

  /// Advance the cursor. Returns the newly shown hint, or `None` at the end.
  pub async fn next(&mut self) -> Result<Option<&str>, ClientError> {
    if !self.has_next() {
      return Ok(None);
    }
    self.history.current_index += 1;
    self.persist().await?;
    Ok(self.current())
  }

  pub async fn reset(&mut self) -> Result<(), ClientError> {
    self.history.hints.clear();
    self.history.current_index = 0;
    self.persist().await
  }

  async fn persist(&mut self) -> Result<(), ClientError> {
    self.history.last_updated = now_ms();
    self.store.save(&self.slug, &self.history).await?;
    Ok(())
  }
}
