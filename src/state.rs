//! Application state: settings plus the hint resolver, built once at startup.
//!
//! This module owns:
//!   - the settings read from env / TOML
//!   - the fallback table (built-in + overrides), shared read-only
//!   - the optional Groq client and the LeetCode fetcher, wrapped in a `HintResolver`
//!
//! Nothing in here is mutated after construction; handlers only read it.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::config::{Settings, GROQ_MODELS};
use crate::fallback::FallbackTable;
use crate::groq::{GroqClient, ModelFailure};
use crate::hints::{HintGenerator, HintResolver};
use crate::leetcode::ProblemFetcher;

#[derive(Clone)]
pub struct AppState {
  pub settings: Settings,
  pub resolver: HintResolver,
}

impl AppState {
  /// Build state from settings: fallback table, Groq client (if keyed), fetcher.
  #[instrument(level = "info", skip_all)]
  pub fn new(settings: Settings) -> anyhow::Result<Self> {
    let fallback = Arc::new(FallbackTable::with_overrides(&settings.hints.fallback));

    let groq = match GroqClient::from_settings(&settings.groq) {
      Ok(client) => {
        info!(target: "leetcode_mentor", api_url = %client.api_url, model = %client.model, max_tokens = client.max_tokens, "Groq enabled.");
        if !GROQ_MODELS.contains(&client.model.as_str()) {
          warn!(target: "leetcode_mentor", model = %client.model, known = ?GROQ_MODELS, "Configured model is not one of the known Groq models");
        }
        Some(client)
      }
      Err(ModelFailure::MissingCredential) => {
        info!(target: "leetcode_mentor", "Groq disabled (no GROQ_API_KEY). Using fallback hint table.");
        None
      }
      Err(e) => {
        error!(target: "leetcode_mentor", error = %e, "Failed to build Groq client; using fallback hint table.");
        None
      }
    };

    let fetcher = ProblemFetcher::new(&settings.leetcode)?;
    let generator = HintGenerator::new(groq, settings.hints.prompts.clone(), fallback);

    Ok(Self { resolver: HintResolver::new(fetcher, generator), settings })
  }
}
