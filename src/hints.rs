//! Hint orchestration: fetch metadata, generate a hint, decide provenance.
//!
//! Both collaborators return `Result`s; this module owns every degrade decision:
//!   - metadata failure  -> context synthesized from the slug
//!   - generation failure -> fallback table
//! Neither path ever surfaces as an error to the caller.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::config::Prompts;
use crate::domain::{Difficulty, HintSource, ProblemContext};
use crate::fallback::FallbackTable;
use crate::groq::{GroqClient, ModelFailure};
use crate::leetcode::ProblemFetcher;
use crate::text::{clean_description, clean_hint, fill_template, trunc_for_log, truncate_chars, USER_CODE_LIMIT};

pub const NO_CODE_PLACEHOLDER: &str = "// No code written yet";
pub const DEFAULT_LANGUAGE: &str = "python";

/// Validated input to the resolver.
#[derive(Clone, Debug)]
pub struct HintRequest {
  pub problem_slug: String,
  pub user_code: String,
  /// Always >= 1; no upper bound is enforced here.
  pub hint_level: i64,
  pub language: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedHint {
  pub text: String,
  pub source: HintSource,
}

#[derive(Clone, Debug)]
pub struct ResolvedHint {
  pub hint: String,
  pub problem: String,
  pub difficulty: Difficulty,
  pub hint_level: i64,
  pub source: HintSource,
}

#[derive(Clone)]
pub struct HintGenerator {
  groq: Option<GroqClient>,
  prompts: Prompts,
  fallback: Arc<FallbackTable>,
}

impl HintGenerator {
  pub fn new(groq: Option<GroqClient>, prompts: Prompts, fallback: Arc<FallbackTable>) -> Self {
    Self { groq, prompts, fallback }
  }

  pub fn has_credential(&self) -> bool {
    self.groq.is_some()
  }

  pub fn build_user_prompt(&self, ctx: &ProblemContext, user_code: &str, hint_level: i64) -> String {
    let tags = if ctx.tags.is_empty() { "Not specified".to_string() } else { ctx.tags.join(", ") };
    let code = if user_code.is_empty() { NO_CODE_PLACEHOLDER } else { user_code };
    let code = truncate_chars(code, USER_CODE_LIMIT);
    let description = clean_description(&ctx.description);
    let level = hint_level.to_string();

    fill_template(
      &self.prompts.hint_user_template,
      &[
        ("title", ctx.title.as_str()),
        ("difficulty", ctx.difficulty.as_str()),
        ("tags", tags.as_str()),
        ("language", ctx.language.as_str()),
        ("hint_level", level.as_str()),
        ("description", description.as_str()),
        ("user_code", code.as_str()),
      ],
    )
  }

  /// Total over its inputs: every failure path resolves to the fallback table.
  #[instrument(level = "info", skip(self, ctx, user_code), fields(title = %ctx.title, difficulty = %ctx.difficulty, code_len = user_code.len()))]
  pub async fn generate(&self, ctx: &ProblemContext, user_code: &str, hint_level: i64) -> GeneratedHint {
    match self.call_model(ctx, user_code, hint_level).await {
      Ok(text) => {
        debug!(target: "hint", hint = %trunc_for_log(&text, 100), "Model hint generated");
        GeneratedHint { text, source: HintSource::GroqAi }
      }
      Err(ModelFailure::MissingCredential) => {
        info!(target: "hint", "No Groq API key configured, using fallback hints");
        self.fallback_hint(ctx.difficulty, hint_level)
      }
      Err(e) => {
        error!(target: "hint", error = %e, "Groq call failed; using fallback hint");
        if let Some(why) = e.diagnosis() {
          error!(target: "hint", "{}", why);
        }
        self.fallback_hint(ctx.difficulty, hint_level)
      }
    }
  }

  async fn call_model(&self, ctx: &ProblemContext, user_code: &str, hint_level: i64) -> Result<String, ModelFailure> {
    let groq = self.groq.as_ref().ok_or(ModelFailure::MissingCredential)?;
    let user = self.build_user_prompt(ctx, user_code, hint_level);
    let raw = groq.chat_plain(&self.prompts.hint_system, &user).await?;
    let hint = clean_hint(&raw);
    if hint.is_empty() {
      return Err(ModelFailure::EmptyResponse);
    }
    Ok(hint)
  }

  pub fn fallback_hint(&self, difficulty: Difficulty, hint_level: i64) -> GeneratedHint {
    GeneratedHint {
      text: self.fallback.lookup(difficulty, hint_level).to_string(),
      source: HintSource::Fallback,
    }
  }
}

#[derive(Clone)]
pub struct HintResolver {
  fetcher: ProblemFetcher,
  generator: HintGenerator,
}

impl HintResolver {
  pub fn new(fetcher: ProblemFetcher, generator: HintGenerator) -> Self {
    Self { fetcher, generator }
  }

  pub fn has_credential(&self) -> bool {
    self.generator.has_credential()
  }

  /// Metadata first, then the hint. `GROQ_AI` only when both steps succeeded.
  #[instrument(level = "info", skip(self, req), fields(slug = %req.problem_slug, level = req.hint_level, language = %req.language))]
  pub async fn resolve(&self, req: &HintRequest) -> ResolvedHint {
    let (ctx, fetched) = match self.fetcher.fetch(&req.problem_slug, &req.language).await {
      Ok(ctx) => (ctx, true),
      Err(e) => {
        warn!(target: "hint", error = %e, "LeetCode API failed, using fallback problem data");
        (ProblemContext::synthesized(&req.problem_slug, &req.language), false)
      }
    };

    let generated = self.generator.generate(&ctx, &req.user_code, req.hint_level).await;
    let source = if fetched { generated.source } else { HintSource::Fallback };
    info!(target: "hint", problem = %ctx.title, %source, "Hint resolved");

    ResolvedHint {
      hint: generated.text,
      problem: ctx.title,
      difficulty: ctx.difficulty,
      hint_level: req.hint_level,
      source,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{GroqSettings, LeetCodeSettings};
  use serde_json::json;
  use std::time::{Duration, Instant};
  use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

  fn ctx() -> ProblemContext {
    ProblemContext {
      title: "Two Sum".into(),
      description: "Given an array <nums>, return indices!".into(),
      difficulty: Difficulty::Easy,
      tags: vec!["Array".into(), "Hash Table".into()],
      language: "rust".into(),
    }
  }

  fn offline_generator() -> HintGenerator {
    HintGenerator::new(None, Prompts::default(), Arc::new(FallbackTable::default()))
  }

  fn groq_for(server: &MockServer) -> GroqClient {
    GroqClient::from_settings(&GroqSettings {
      api_key: Some("gsk_test".into()),
      api_url: format!("{}/openai/v1/chat/completions", server.uri()),
      ..GroqSettings::default()
    })
    .unwrap()
  }

  async fn mock_model(server: &MockServer, content: &str) {
    Mock::given(matchers::method("POST"))
      .and(matchers::path("/openai/v1/chat/completions"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "content": content } }]
      })))
      .mount(server)
      .await;
  }

  #[test]
  fn user_prompt_embeds_context() {
    let prompt = offline_generator().build_user_prompt(&ctx(), "fn main() {}", 2);
    assert!(prompt.contains("Problem: Two Sum"));
    assert!(prompt.contains("Difficulty: Easy"));
    assert!(prompt.contains("Tags: Array, Hash Table"));
    assert!(prompt.contains("Programming Language: rust"));
    assert!(prompt.contains("Hint Level Needed: 2"));
    assert!(prompt.contains("Given an array nums , return indices!"));
    assert!(prompt.contains("fn main() {}"));
  }

  #[test]
  fn user_prompt_placeholders() {
    let mut c = ctx();
    c.tags.clear();
    let prompt = offline_generator().build_user_prompt(&c, "", 1);
    assert!(prompt.contains("Tags: Not specified"));
    assert!(prompt.contains(NO_CODE_PLACEHOLDER));
  }

  #[test]
  fn user_code_is_truncated() {
    let code = "x".repeat(USER_CODE_LIMIT + 100);
    let prompt = offline_generator().build_user_prompt(&ctx(), &code, 1);
    assert!(prompt.contains(&"x".repeat(USER_CODE_LIMIT)));
    assert!(!prompt.contains(&"x".repeat(USER_CODE_LIMIT + 1)));
  }

  #[tokio::test]
  async fn without_credential_uses_table() {
    let generator = offline_generator();
    assert!(!generator.has_credential());
    let hint = generator.generate(&ctx(), "", 1).await;
    assert_eq!(hint.source, HintSource::Fallback);
    assert_eq!(hint.text, FallbackTable::default().lookup(Difficulty::Easy, 1));
  }

  #[tokio::test]
  async fn model_output_is_cleaned() {
    let server = MockServer::start().await;
    mock_model(&server, "Hint: Use a hash map.").await;

    let generator = HintGenerator::new(Some(groq_for(&server)), Prompts::default(), Arc::new(FallbackTable::default()));
    let hint = generator.generate(&ctx(), "", 1).await;
    assert_eq!(hint, GeneratedHint { text: "Use a hash map.".into(), source: HintSource::GroqAi });
  }

  #[tokio::test]
  async fn rate_limited_model_degrades() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
      .respond_with(ResponseTemplate::new(429))
      .mount(&server)
      .await;

    let generator = HintGenerator::new(Some(groq_for(&server)), Prompts::default(), Arc::new(FallbackTable::default()));
    let hint = generator.generate(&ctx(), "", 7).await;
    assert_eq!(hint.source, HintSource::Fallback);
    assert_eq!(hint.text, FallbackTable::default().lookup(Difficulty::Easy, 3));
  }

  #[tokio::test]
  async fn slow_model_degrades_within_timeout() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(json!({ "choices": [{ "message": { "content": "too late" } }] }))
          .set_delay(Duration::from_secs(3)),
      )
      .mount(&server)
      .await;

    let groq = GroqClient::from_settings(&GroqSettings {
      api_key: Some("gsk_test".into()),
      api_url: server.uri(),
      timeout: Duration::from_millis(300),
      ..GroqSettings::default()
    })
    .unwrap();
    let generator = HintGenerator::new(Some(groq), Prompts::default(), Arc::new(FallbackTable::default()));

    let started = Instant::now();
    let hint = generator.generate(&ctx(), "", 1).await;
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(hint.source, HintSource::Fallback);
    assert_eq!(hint.text, FallbackTable::default().lookup(Difficulty::Easy, 1));
  }

  #[tokio::test]
  async fn blank_model_output_degrades() {
    let server = MockServer::start().await;
    mock_model(&server, "\"\"").await;

    let generator = HintGenerator::new(Some(groq_for(&server)), Prompts::default(), Arc::new(FallbackTable::default()));
    let hint = generator.generate(&ctx(), "", 2).await;
    assert_eq!(hint.source, HintSource::Fallback);
  }

  #[tokio::test]
  async fn resolver_reports_fallback_when_metadata_missing() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
      .and(matchers::path("/graphql"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "question": null } })))
      .mount(&server)
      .await;
    mock_model(&server, "Try two pointers.").await;

    let fetcher = ProblemFetcher::new(&LeetCodeSettings {
      graphql_url: format!("{}/graphql", server.uri()),
      ..LeetCodeSettings::default()
    })
    .unwrap();
    let generator = HintGenerator::new(Some(groq_for(&server)), Prompts::default(), Arc::new(FallbackTable::default()));
    let resolver = HintResolver::new(fetcher, generator);

    let resolved = resolver
      .resolve(&HintRequest {
        problem_slug: "two-sum".into(),
        user_code: String::new(),
        hint_level: 1,
        language: DEFAULT_LANGUAGE.into(),
      })
      .await;

    assert_eq!(resolved.problem, "Two Sum");
    assert_eq!(resolved.difficulty, Difficulty::Medium);
    assert_eq!(resolved.source, HintSource::Fallback);
    // The model still ran against the synthesized context.
    assert_eq!(resolved.hint, "Try two pointers.");
  }

  #[tokio::test]
  async fn resolver_reports_model_when_both_succeed() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
      .and(matchers::path("/graphql"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "data": { "question": { "title": "3Sum", "content": "<p>Find triplets</p>", "difficulty": "Medium", "topicTags": [] } }
      })))
      .mount(&server)
      .await;
    mock_model(&server, "'Sort first, then sweep with two pointers.'").await;

    let fetcher = ProblemFetcher::new(&LeetCodeSettings {
      graphql_url: format!("{}/graphql", server.uri()),
      ..LeetCodeSettings::default()
    })
    .unwrap();
    let generator = HintGenerator::new(Some(groq_for(&server)), Prompts::default(), Arc::new(FallbackTable::default()));
    let resolved = HintResolver::new(fetcher, generator)
      .resolve(&HintRequest {
        problem_slug: "3sum".into(),
        user_code: "def threeSum(self, nums):".into(),
        hint_level: 2,
        language: "python".into(),
      })
      .await;

    assert_eq!(resolved.problem, "3Sum");
    assert_eq!(resolved.source, HintSource::GroqAi);
    assert_eq!(resolved.hint, "Sort first, then sweep with two pointers.");
    assert_eq!(resolved.hint_level, 2);
  }
}
