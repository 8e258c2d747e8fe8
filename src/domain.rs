//! Domain models: difficulty, problem context, hint provenance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Problem difficulty as reported by LeetCode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
  Unknown,
}

impl Difficulty {
  /// Case-insensitive parse; anything unrecognized (including empty) is `Unknown`.
  pub fn from_label(label: &str) -> Self {
    match label.trim().to_ascii_lowercase().as_str() {
      "easy" => Difficulty::Easy,
      "medium" => Difficulty::Medium,
      "hard" => Difficulty::Hard,
      _ => Difficulty::Unknown,
    }
  }

  pub fn from_optional(label: Option<&str>) -> Self {
    label.map(Self::from_label).unwrap_or(Difficulty::Unknown)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Difficulty::Easy => "Easy",
      Difficulty::Medium => "Medium",
      Difficulty::Hard => "Hard",
      Difficulty::Unknown => "Unknown",
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Everything the generator needs to know about a problem. Built once per request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProblemContext {
  pub title: String,
  pub description: String,
  pub difficulty: Difficulty,
  pub tags: Vec<String>,
  pub language: String,
}

impl ProblemContext {
  /// Placeholder context used when the metadata source can't tell us anything.
  pub fn synthesized(slug: &str, language: &str) -> Self {
    Self {
      title: crate::text::title_from_slug(slug),
      description: format!("Solve the problem: {}", slug),
      difficulty: Difficulty::Medium,
      tags: vec!["Array".into(), "Hash Table".into()],
      language: language.to_string(),
    }
  }
}

/// Which path produced the hint handed back to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintSource {
  #[serde(rename = "GROQ_AI")]
  GroqAi,
  #[serde(rename = "FALLBACK")]
  Fallback,
}

impl HintSource {
  pub fn as_str(&self) -> &'static str {
    match self {
      HintSource::GroqAi => "GROQ_AI",
      HintSource::Fallback => "FALLBACK",
    }
  }
}

impl fmt::Display for HintSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
