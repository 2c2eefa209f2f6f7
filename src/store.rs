use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::catalog::BenchmarkKey;
use crate::errors::SysmarkError;
use crate::result::{BenchmarkHistory, BenchmarkResult, HistoryEntry};

pub const DEFAULT_RESULTS_FILE: &str = "benchmark_results.json";

/// Where the history file lives. Always injected; the store never resolves
/// paths from process-wide state.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub base_dir: PathBuf,
    pub file_name: String,
}

impl StoreConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            file_name: DEFAULT_RESULTS_FILE.to_string(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    fn path(&self) -> PathBuf {
        self.base_dir.join(&self.file_name)
    }
}

/// Append-only result history, persisted as one JSON document.
///
/// Every mutation is a whole-file load-and-rewrite; the mutex serializes the
/// read-modify-write cycle against concurrent callers in this process. A
/// missing, empty, or unparsable file reads back as an empty history.
pub struct ResultStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ResultStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            path: config.path(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_all(&self) -> BenchmarkHistory {
        let _guard = self.lock.lock();
        self.read_history()
    }

    pub fn append(&self, key: BenchmarkKey, result: BenchmarkResult) -> Result<(), SysmarkError> {
        let _guard = self.lock.lock();
        let mut history = self.read_history();
        history
            .entry(key.as_str().to_string())
            .or_default()
            .push(HistoryEntry::now(result));
        self.write_history(&history)
    }

    /// Last entry per key, for "current standing" views.
    pub fn latest_per_key(&self) -> BTreeMap<String, HistoryEntry> {
        let _guard = self.lock.lock();
        self.read_history()
            .into_iter()
            .filter_map(|(key, mut entries)| entries.pop().map(|entry| (key, entry)))
            .collect()
    }

    /// Removes a key's entire history. A missing key is a no-op.
    pub fn delete(&self, key: BenchmarkKey) -> Result<(), SysmarkError> {
        let _guard = self.lock.lock();
        let mut history = self.read_history();
        if history.remove(key.as_str()).is_none() {
            return Ok(());
        }
        self.write_history(&history)
    }

    fn read_history(&self) -> BenchmarkHistory {
        let Ok(data) = fs::read(&self.path) else {
            return BenchmarkHistory::new();
        };
        if data.is_empty() {
            return BenchmarkHistory::new();
        }
        serde_json::from_slice(&data).unwrap_or_default()
    }

    fn write_history(&self, history: &BenchmarkHistory) -> Result<(), SysmarkError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SysmarkError::store(e.to_string()))?;
        }
        let data = serde_json::to_vec_pretty(history)
            .map_err(|e| SysmarkError::store(e.to_string()))?;
        fs::write(&self.path, data).map_err(|e| SysmarkError::store(e.to_string()))
    }
}
