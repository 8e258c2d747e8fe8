//! Runtime settings (environment) and the optional TOML file with prompt and
//! fallback-table overrides.
//!
//! See `HintConfig` and `Prompts` for the TOML schema:
//!
//! ```toml
//! [prompts]
//! hint_system = "..."
//! hint_user_template = "Problem: {title} ..."
//!
//! [fallback.easy]
//! 1 = "..."
//! ```

use std::{collections::HashMap, time::Duration};

use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";
/// Models known to work with the default prompt.
pub const GROQ_MODELS: [&str; 3] = [
  "llama-3.1-8b-instant",
  "llama-3.1-70b-versatile",
  "mixtral-8x7b-32768",
];
pub const DEFAULT_LEETCODE_GRAPHQL_URL: &str = "https://leetcode.com/graphql";
/// Value shipped in `.env.example`; treated the same as no key at all.
pub const PLACEHOLDER_GROQ_KEY: &str = "your_groq_api_key_here";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct HintConfig {
  #[serde(default)]
  pub prompts: Prompts,
  /// `difficulty -> level -> hint` overrides for the fallback table.
  #[serde(default)]
  pub fallback: HashMap<String, HashMap<String, String>>,
}

/// Prompts sent to the chat-completion API.
///
/// The user template understands `{title}`, `{difficulty}`, `{tags}`,
/// `{language}`, `{hint_level}`, `{description}` and `{user_code}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub hint_system: String,
  pub hint_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      hint_system: "You are an expert computer science mentor helping students solve LeetCode problems.

CRITICAL RULES:
1. NEVER provide complete solutions or full code
2. Provide ONLY one short hint (1-2 sentences maximum)
3. Focus on guiding thinking, not giving answers
4. Be specific to the problem and user's current code level
5. Do not use markdown formatting
6. Do not prefix with \"Hint:\" or any labels

Hint Levels:
- Level 1: Conceptual approach (what strategy to consider)
- Level 2: More specific guidance (key data structures/algorithms)
- Level 3: Implementation detail (specific considerations)

Respond with ONLY the hint text, nothing else.".into(),
      hint_user_template: "
Problem: {title}
Difficulty: {difficulty}
Tags: {tags}
Programming Language: {language}
Hint Level Needed: {hint_level}

Problem Description:
{description}

Student's Current Code:
{user_code}

Based on the student's current code and this being hint level {hint_level}, provide a brief, helpful hint that guides them toward the solution without giving it away.".into(),
    }
  }
}

/// Chat-completion settings. `api_key` is `None` unless a usable key is configured.
#[derive(Clone, Debug)]
pub struct GroqSettings {
  pub api_key: Option<String>,
  pub api_url: String,
  pub model: String,
  pub max_tokens: u32,
  pub temperature: f32,
  pub top_p: f32,
  pub timeout: Duration,
}

impl Default for GroqSettings {
  fn default() -> Self {
    Self {
      api_key: None,
      api_url: DEFAULT_GROQ_API_URL.into(),
      model: DEFAULT_GROQ_MODEL.into(),
      max_tokens: 100,
      temperature: 0.7,
      top_p: 0.9,
      timeout: Duration::from_secs(30),
    }
  }
}

#[derive(Clone, Debug)]
pub struct LeetCodeSettings {
  pub graphql_url: String,
  pub timeout: Duration,
}

impl Default for LeetCodeSettings {
  fn default() -> Self {
    Self {
      graphql_url: DEFAULT_LEETCODE_GRAPHQL_URL.into(),
      timeout: Duration::from_secs(10),
    }
  }
}

/// Everything the server needs, read once at startup.
#[derive(Clone, Debug, Default)]
pub struct Settings {
  pub port: u16,
  /// Deployment label (`APP_ENV`, falling back to `NODE_ENV`).
  pub environment: Option<String>,
  pub groq: GroqSettings,
  pub leetcode: LeetCodeSettings,
  pub hints: HintConfig,
}

impl Settings {
  pub fn from_env() -> Self {
    let groq_defaults = GroqSettings::default();
    let leetcode_defaults = LeetCodeSettings::default();

    let groq = GroqSettings {
      api_key: usable_api_key(std::env::var("GROQ_API_KEY").ok()),
      api_url: env_or("GROQ_API_URL", groq_defaults.api_url),
      model: env_or("GROQ_MODEL", groq_defaults.model),
      max_tokens: env_parse("GROQ_MAX_TOKENS").unwrap_or(groq_defaults.max_tokens),
      temperature: env_parse("GROQ_TEMPERATURE").unwrap_or(groq_defaults.temperature),
      top_p: groq_defaults.top_p,
      timeout: env_parse("GROQ_TIMEOUT_SECS")
        .map(Duration::from_secs)
        .unwrap_or(groq_defaults.timeout),
    };

    let leetcode = LeetCodeSettings {
      graphql_url: env_or("LEETCODE_GRAPHQL_URL", leetcode_defaults.graphql_url),
      timeout: env_parse("LEETCODE_TIMEOUT_SECS")
        .map(Duration::from_secs)
        .unwrap_or(leetcode_defaults.timeout),
    };

    Self {
      port: env_parse("PORT").unwrap_or(DEFAULT_PORT),
      environment: std::env::var("APP_ENV")
        .or_else(|_| std::env::var("NODE_ENV"))
        .ok(),
      groq,
      leetcode,
      hints: load_hint_config_from_env().unwrap_or_default(),
    }
  }

  pub fn is_production(&self) -> bool {
    matches!(self.environment.as_deref(), Some("production"))
  }
}

/// Empty and placeholder keys count as "no key".
pub fn usable_api_key(raw: Option<String>) -> Option<String> {
  raw
    .map(|k| k.trim().to_string())
    .filter(|k| !k.is_empty() && k != PLACEHOLDER_GROQ_KEY)
}

fn env_or(key: &str, default: String) -> String {
  std::env::var(key)
    .ok()
    .filter(|v| !v.trim().is_empty())
    .unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
  std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

pub fn parse_hint_config(raw: &str) -> Result<HintConfig, toml::de::Error> {
  toml::from_str::<HintConfig>(raw)
}

/// Attempt to load `HintConfig` from HINT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_hint_config_from_env() -> Option<HintConfig> {
  let path = std::env::var("HINT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_hint_config(&s) {
      Ok(cfg) => {
        info!(target: "leetcode_mentor", %path, "Loaded hint config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "leetcode_mentor", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "leetcode_mentor", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
