//! Client-side hint history: a small JSON key-value file mirroring the
//! extension's local storage (`hints_<slug>` -> `{hints, currentIndex, lastUpdated}`).
//!
//! Keys that don't start with `hints_` are preserved untouched. Entries whose
//! `lastUpdated` is older than seven days are removed by `sweep`. Long-lived
//! embedders get that at startup and once a day from `spawn_sweeper`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, error, info, instrument, warn};

pub const KEY_PREFIX: &str = "hints_";
pub const RETENTION_MS: i64 = 7 * 24 * 60 * 60 * 1000;
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("hint store I/O error at {path}: {source}")]
  Io { path: PathBuf, source: std::io::Error },
  #[error("hint store at {path} is not valid JSON: {source}")]
  Corrupt { path: PathBuf, source: serde_json::Error },
}

/// Stored hints for one problem, plus the cursor the UI is showing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintHistory {
  #[serde(default)]
  pub hints: Vec<String>,
  #[serde(default)]
  pub current_index: usize,
  #[serde(default)]
  pub last_updated: i64,
}

pub fn storage_key(slug: &str) -> String {
  format!("{}{}", KEY_PREFIX, slug)
}

pub fn now_ms() -> i64 {
  chrono::Utc::now().timestamp_millis()
}

pub struct HintStore {
  path: PathBuf,
  // Serializes read-modify-write cycles within this process.
  lock: Mutex<()>,
}

impl HintStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), lock: Mutex::new(()) }
  }

  /// `<data dir>/leetcode-mentor/hints.json`, or a dotfile in the working directory.
  pub fn default_path() -> PathBuf {
    dirs::data_local_dir()
      .map(|d| d.join("leetcode-mentor").join("hints.json"))
      .unwrap_or_else(|| PathBuf::from(".leetcode-mentor-hints.json"))
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  async fn read_map(&self) -> Result<Map<String, Value>, StoreError> {
    let raw = match tokio::fs::read(&self.path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
      Err(source) => return Err(StoreError::Io { path: self.path.clone(), source }),
    };
    if raw.iter().all(u8::is_ascii_whitespace) {
      return Ok(Map::new());
    }
    serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt { path: self.path.clone(), source })
  }

  async fn write_map(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io { path: self.path.clone(), source };
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    let bytes = serde_json::to_vec_pretty(map)
      .map_err(|source| StoreError::Corrupt { path: self.path.clone(), source })?;
    let tmp = self.path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)
  }

  /// History for `slug`, or `None` if nothing (readable) is stored.
  #[instrument(level = "debug", skip(self))]
  pub async fn load(&self, slug: &str) -> Result<Option<HintHistory>, StoreError> {
    let _guard = self.lock.lock().await;
    let map = self.read_map().await?;
    let Some(value) = map.get(&storage_key(slug)) else {
      return Ok(None);
    };
    match serde_json::from_value::<HintHistory>(value.clone()) {
      Ok(history) => Ok(Some(history)),
      Err(e) => {
        warn!(target: "leetcode_mentor", %slug, error = %e, "Ignoring unreadable hint history entry");
        Ok(None)
      }
    }
  }

  #[instrument(level = "debug", skip(self, history), fields(hints = history.hints.len()))]
  pub async fn save(&self, slug: &str, history: &HintHistory) -> Result<(), StoreError> {
    let _guard = self.lock.lock().await;
    let mut map = self.read_map().await?;
    let value = serde_json::to_value(history)
      .map_err(|source| StoreError::Corrupt { path: self.path.clone(), source })?;
    map.insert(storage_key(slug), value);
    self.write_map(&map).await
  }

  /// Delete the entry for `slug`. Returns whether one was stored.
  #[instrument(level = "debug", skip(self))]
  pub async fn remove(&self, slug: &str) -> Result<bool, StoreError> {
    let _guard = self.lock.lock().await;
    let mut map = self.read_map().await?;
    if map.remove(&storage_key(slug)).is_none() {
      return Ok(false);
    }
    self.write_map(&map).await?;
    Ok(true)
  }

  /// Drop `hints_*` entries last updated before `now - 7 days`. Returns how many were removed.
  #[instrument(level = "info", skip(self))]
  pub async fn sweep(&self, now: i64) -> Result<usize, StoreError> {
    let _guard = self.lock.lock().await;
    let mut map = self.read_map().await?;
    let cutoff = now - RETENTION_MS;

    let stale: Vec<String> = map
      .iter()
      .filter(|(key, value)| {
        key.starts_with(KEY_PREFIX)
          && value.get("lastUpdated").and_then(Value::as_i64).is_some_and(|t| t < cutoff)
      })
      .map(|(key, _)| key.clone())
      .collect();

    if stale.is_empty() {
      return Ok(0);
    }
    for key in &stale {
      debug!(target: "leetcode_mentor", %key, "Removing stale hint history");
      map.remove(key);
    }
    self.write_map(&map).await?;
    Ok(stale.len())
  }
}

/// Run `sweep` now and every `SWEEP_INTERVAL` after that.
///
/// Meant for processes that stay up, such as a desktop helper embedding the
/// store. The `mentor` CLI exits after one command and calls `sweep` once instead.
pub fn spawn_sweeper(store: Arc<HintStore>) -> JoinHandle<()> {
  spawn_sweeper_every(store, SWEEP_INTERVAL)
}

pub fn spawn_sweeper_every(store: Arc<HintStore>, period: Duration) -> JoinHandle<()> {
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(period);
    loop {
      ticker.tick().await;
      match store.sweep(now_ms()).await {
        Ok(0) => {}
        Ok(removed) => info!(target: "leetcode_mentor", removed, "Swept stale hint history"),
        Err(e) => error!(target: "leetcode_mentor", error = %e, "Hint history sweep failed"),
      }
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn store_in(dir: &TempDir) -> HintStore {
    HintStore::new(dir.path().join("nested").join("hints.json"))
  }

  fn history(hints: &[&str], last_updated: i64) -> HintHistory {
    HintHistory {
      hints: hints.iter().map(|s| s.to_string()).collect(),
      current_index: hints.len().saturating_sub(1),
      last_updated,
    }
  }

  #[tokio::test]
  async fn missing_file_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    assert_eq!(store.load("two-sum").await.unwrap(), None);
    assert_eq!(store.sweep(now_ms()).await.unwrap(), 0);
  }

  #[tokio::test]
  async fn save_then_load() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let h = history(&["a", "b"], 42);
    store.save("two-sum", &h).await.unwrap();
    assert_eq!(store.load("two-sum").await.unwrap(), Some(h));
    assert_eq!(store.load("3sum").await.unwrap(), None);
  }

  #[tokio::test]
  async fn stored_shape_uses_camel_case_keys() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save("two-sum", &history(&["a"], 7)).await.unwrap();

    let raw: Value = serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
    let entry = &raw["hints_two-sum"];
    assert_eq!(entry["hints"][0], "a");
    assert_eq!(entry["currentIndex"], 0);
    assert_eq!(entry["lastUpdated"], 7);
  }

  #[tokio::test]
  async fn sweep_removes_only_stale_hint_entries() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let now = 1_000 * RETENTION_MS;

    store.save("old", &history(&["x"], now - RETENTION_MS - 1)).await.unwrap();
    store.save("edge", &history(&["y"], now - RETENTION_MS)).await.unwrap();
    store.save("fresh", &history(&["z"], now - 1)).await.unwrap();

    // Foreign keys survive regardless of age.
    let mut map = store.read_map().await.unwrap();
    map.insert("settings".into(), serde_json::json!({ "lastUpdated": 0 }));
    store.write_map(&map).await.unwrap();

    assert_eq!(store.sweep(now).await.unwrap(), 1);
    assert_eq!(store.load("old").await.unwrap(), None);
    assert!(store.load("edge").await.unwrap().is_some());
    assert!(store.load("fresh").await.unwrap().is_some());
    assert!(store.read_map().await.unwrap().contains_key("settings"));
  }

  #[tokio::test]
  async fn remove_deletes_one_entry() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save("two-sum", &history(&["a"], 1)).await.unwrap();
    store.save("3sum", &history(&["b"], 1)).await.unwrap();

    assert!(store.remove("two-sum").await.unwrap());
    assert!(!store.remove("two-sum").await.unwrap());
    assert_eq!(store.load("two-sum").await.unwrap(), None);
    assert!(store.load("3sum").await.unwrap().is_some());
  }

  #[tokio::test]
  async fn remove_on_missing_file_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    assert!(!store.remove("two-sum").await.unwrap());
    assert!(!store.path().exists());
  }

  #[tokio::test]
  async fn corrupt_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hints.json");
    std::fs::write(&path, "{ nope").unwrap();
    let err = HintStore::new(path).load("two-sum").await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
  }

  #[tokio::test]
  async fn sweeper_runs_immediately() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(store_in(&dir));
    store.save("ancient", &history(&["x"], 0)).await.unwrap();

    let handle = spawn_sweeper_every(store.clone(), Duration::from_secs(3600));
    let mut gone = false;
    for _ in 0..50 {
      if store.load("ancient").await.unwrap().is_none() {
        gone = true;
        break;
      }
      tokio::time::sleep(Duration::from_millis(20)).await;
    }
    handle.abort();
    assert!(gone, "sweeper should remove stale entries on its first tick");
  }
}
