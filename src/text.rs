//! Small text helpers shared by the fetcher, the prompt builder and the hint cleanup.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));
static NON_PROSE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s.,!?\-]").expect("prose regex"));
static LABEL_PREFIX: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)^(hint|suggestion|tip|answer):?\s*").expect("label regex"));

pub const DESCRIPTION_LIMIT: usize = 1000;
pub const HTML_CONTENT_LIMIT: usize = 1500;
pub const USER_CODE_LIMIT: usize = 500;

const QUOTES: &[char] = &['"', '\''];

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Keep at most `max` characters (not bytes).
pub fn truncate_chars(s: &str, max: usize) -> String {
  match s.char_indices().nth(max) {
    Some((idx, _)) => s[..idx].to_string(),
    None => s.to_string(),
  }
}

/// Log-safe truncation for large strings.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    format!("{}… ({} bytes total)", truncate_chars(s, max), s.len())
  }
}

fn collapse_whitespace(s: &str) -> String {
  WHITESPACE_RUN.replace_all(s, " ").into_owned()
}

/// Problem statement as it goes into the prompt: symbols blanked out,
/// whitespace collapsed, capped at `DESCRIPTION_LIMIT` chars.
pub fn clean_description(raw: &str) -> String {
  let blanked = NON_PROSE.replace_all(raw, " ");
  truncate_chars(collapse_whitespace(&blanked).trim(), DESCRIPTION_LIMIT)
}

/// Turn LeetCode's HTML statement into plain text.
pub fn sanitize_html(html: &str) -> String {
  if html.is_empty() {
    return String::new();
  }
  let untagged = HTML_TAG.replace_all(html, " ");
  let decoded = collapse_whitespace(&untagged)
    .replace("&nbsp;", " ")
    .replace("&lt;", "<")
    .replace("&gt;", ">")
    .replace("&amp;", "&")
    .replace("&quot;", "\"");
  truncate_chars(decoded.trim(), HTML_CONTENT_LIMIT)
}

/// `two-sum` -> `Two Sum`.
pub fn title_from_slug(slug: &str) -> String {
  slug
    .split('-')
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

/// Post-process raw model output into a bare hint: drop a leading label,
/// then one leading and one trailing quote character.
pub fn clean_hint(raw: &str) -> String {
  let unlabeled = LABEL_PREFIX.replace(raw.trim(), "");
  let mut hint = unlabeled.trim();
  if let Some(rest) = hint.strip_prefix(QUOTES) {
    hint = rest;
  }
  if let Some(rest) = hint.strip_suffix(QUOTES) {
    hint = rest;
  }
  hint.trim().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_all_keys() {
    let out = fill_template("{a} and {b} and {a}", &[("a", "x"), ("b", "y")]);
    assert_eq!(out, "x and y and x");
  }

  #[test]
  fn truncate_respects_char_boundaries() {
    assert_eq!(truncate_chars("héllo", 2), "hé");
    assert_eq!(truncate_chars("abc", 10), "abc");
    assert_eq!(truncate_chars("", 3), "");
  }

  #[test]
  fn hint_label_is_stripped() {
    assert_eq!(clean_hint("Hint: Use a hash map."), "Use a hash map.");
    assert_eq!(clean_hint("  suggestion Try sorting first."), "Try sorting first.");
    assert_eq!(clean_hint("TIP:   Think in pairs!"), "Think in pairs!");
  }

  #[test]
  fn hint_quotes_are_stripped_once() {
    assert_eq!(clean_hint("\"Try two pointers.\""), "Try two pointers.");
    assert_eq!(clean_hint("'Try two pointers.'"), "Try two pointers.");
    assert_eq!(clean_hint("\"\"double\"\""), "\"double\"");
  }

  #[test]
  fn hint_without_decoration_is_untouched() {
    assert_eq!(clean_hint("Consider a sliding window."), "Consider a sliding window.");
  }

  #[test]
  fn description_is_cleaned_and_capped() {
    let cleaned = clean_description("Given  nums[i] <= 10^4,\n return  (i, j).");
    assert_eq!(cleaned, "Given nums i 10 4, return i, j .");

    let long = "a".repeat(DESCRIPTION_LIMIT + 50);
    assert_eq!(clean_description(&long).chars().count(), DESCRIPTION_LIMIT);
  }

  #[test]
  fn html_is_sanitized() {
    let html = "<p>Given an array&nbsp;of <code>nums</code> &amp; a target &lt;= 10 &quot;x&quot;</p>";
    assert_eq!(
      sanitize_html(html),
      "Given an array of nums & a target <= 10 \"x\""
    );
    assert_eq!(sanitize_html(""), "");

    let long = format!("<p>{}</p>", "b".repeat(HTML_CONTENT_LIMIT * 2));
    assert_eq!(sanitize_html(&long).chars().count(), HTML_CONTENT_LIMIT);
  }

  #[test]
  fn slug_title_casing() {
    assert_eq!(title_from_slug("two-sum"), "Two Sum");
    assert_eq!(title_from_slug("lru-cache"), "Lru Cache");
    assert_eq!(title_from_slug("3sum"), "3sum");
  }

  #[test]
  fn log_truncation_marks_total_size() {
    assert_eq!(trunc_for_log("short", 10), "short");
    assert!(trunc_for_log(&"x".repeat(30), 10).starts_with("xxxxxxxxxx…"));
  }
}
