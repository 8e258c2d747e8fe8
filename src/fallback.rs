//! Static hint table used whenever the model can't be reached.
//!
//! Built once at startup (built-in entries, optionally overridden from TOML)
//! and shared read-only through `AppState`.

use std::collections::HashMap;

use tracing::warn;

use crate::domain::Difficulty;

pub const MAX_HINT_LEVEL: u8 = 3;

/// Returned only if a lookup somehow lands outside the table.
pub const GENERIC_HINT: &str =
  "Think about the problem constraints and what data structures might help.";

const BUILTIN: [(Difficulty, [&str; 3]); 3] = [
  (
    Difficulty::Easy,
    [
      "Try using a dictionary to store numbers you've seen and their indices.",
      "For each number, check if its complement (target - number) exists in your dictionary.",
      "Remember to return the indices immediately when you find a match.",
    ],
  ),
  (
    Difficulty::Medium,
    [
      "Consider using backtracking or DFS to generate all possible combinations.",
      "Think about how to map digits to their corresponding letters and build combinations recursively.",
      "Handle edge cases like empty input and make sure to backtrack properly.",
    ],
  ),
  (
    Difficulty::Hard,
    [
      "Break the problem into smaller subproblems that are easier to solve.",
      "Consider using dynamic programming to store solutions to subproblems.",
      "Think about the base cases and build up the solution incrementally.",
    ],
  ),
];

/// Clamp any requested level into `1..=MAX_HINT_LEVEL`.
pub fn clamp_level(level: i64) -> u8 {
  level.clamp(1, MAX_HINT_LEVEL as i64) as u8
}

#[derive(Clone, Debug)]
pub struct FallbackTable {
  entries: HashMap<(Difficulty, u8), String>,
}

impl Default for FallbackTable {
  fn default() -> Self {
    let mut entries = HashMap::new();
    for (difficulty, hints) in BUILTIN {
      for (idx, hint) in hints.iter().enumerate() {
        entries.insert((difficulty, idx as u8 + 1), hint.to_string());
      }
    }
    Self { entries }
  }
}

impl FallbackTable {
  /// Built-in table with overrides applied on top.
  ///
  /// Overrides are keyed `difficulty -> level -> text` as they appear in TOML
  /// (`[fallback.easy] 1 = "..."`). Unknown difficulties, out-of-range levels
  /// and blank texts are skipped so every cell stays populated.
  pub fn with_overrides(overrides: &HashMap<String, HashMap<String, String>>) -> Self {
    let mut table = Self::default();
    for (diff_label, levels) in overrides {
      let difficulty = Difficulty::from_label(diff_label);
      if difficulty == Difficulty::Unknown {
        warn!(target: "hint", difficulty = %diff_label, "Ignoring fallback override for unknown difficulty");
        continue;
      }
      for (level_label, text) in levels {
        let level = match level_label.trim().parse::<u8>() {
          Ok(l) if (1..=MAX_HINT_LEVEL).contains(&l) => l,
          _ => {
            warn!(target: "hint", difficulty = %diff_label, level = %level_label, "Ignoring fallback override for invalid level");
            continue;
          }
        };
        if text.trim().is_empty() {
          continue;
        }
        table.entries.insert((difficulty, level), text.trim().to_string());
      }
    }
    table
  }

  /// Unrecognized difficulty reads as medium; level is clamped into range.
  pub fn lookup(&self, difficulty: Difficulty, level: i64) -> &str {
    let difficulty = match difficulty {
      Difficulty::Unknown => Difficulty::Medium,
      d => d,
    };
    self
      .entries
      .get(&(difficulty, clamp_level(level)))
      .map(String::as_str)
      .unwrap_or(GENERIC_HINT)
  }
}
