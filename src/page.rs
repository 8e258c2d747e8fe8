//! Where the client gets its problem context from.
//!
//! In the browser this is DOM scraping; here it is a capability trait so the
//! session logic doesn't care how the page was read.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::Difficulty;

static PROBLEM_URL: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"leetcode\.com/problems/([^/?#]+)").expect("problem url regex"));

pub const UNKNOWN_SLUG: &str = "unknown";
pub const DEFAULT_TITLE: &str = "Current Problem";

/// What the client could read off the problem page. Best effort.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageContext {
  pub problem_slug: String,
  pub problem_title: String,
  pub difficulty: Difficulty,
  pub user_code: String,
}

pub trait ProblemPage {
  fn extract_context(&self) -> PageContext;
}

pub fn is_problem_url(url: &str) -> bool {
  PROBLEM_URL.is_match(url)
}

/// Slug from a problem URL, or `unknown`.
pub fn slug_from_url(url: &str) -> String {
  PROBLEM_URL
    .captures(url)
    .and_then(|c| c.get(1))
    .map(|m| m.as_str().to_string())
    .unwrap_or_else(|| UNKNOWN_SLUG.to_string())
}

/// A page described locally: a URL (or bare slug) plus the code being worked on.
#[derive(Clone, Debug, Default)]
pub struct LocalPage {
  pub location: String,
  pub title: Option<String>,
  pub difficulty: Option<String>,
  pub user_code: String,
}

impl LocalPage {
  pub fn new(location: impl Into<String>, user_code: impl Into<String>) -> Self {
    Self { location: location.into(), user_code: user_code.into(), ..Self::default() }
  }

  fn slug(&self) -> String {
    let location = self.location.trim();
    if location.contains("://") || location.contains("leetcode.com") {
      slug_from_url(location)
    } else if location.is_empty() {
      UNKNOWN_SLUG.to_string()
    } else {
      location.to_string()
    }
  }
}

impl ProblemPage for LocalPage {
  fn extract_context(&self) -> PageContext {
    PageContext {
      problem_slug: self.slug(),
      problem_title: self
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
      difficulty: Difficulty::from_optional(self.difficulty.as_deref()),
      user_code: self.user_code.clone(),
    }
  }
}
