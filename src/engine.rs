use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use crate::catalog::{BenchmarkKey, Catalog};
use crate::errors::SysmarkError;
use crate::progress::ProgressReporter;
use crate::result::{BenchmarkResult, HistoryEntry};
use crate::store::ResultStore;
use crate::trend::{self, TrendSummary};

/// Facade the UI layer talks to: run benchmarks, read history, delete
/// history. One run may be in flight at a time; a second `run` while busy
/// fails with [`SysmarkError::Busy`] rather than queueing.
pub struct BenchmarkEngine {
    catalog: Catalog,
    store: ResultStore,
    latch: Mutex<()>,
}

impl BenchmarkEngine {
    pub fn new(catalog: Catalog, store: ResultStore) -> Self {
        Self {
            catalog,
            store,
            latch: Mutex::new(()),
        }
    }

    pub fn list_benchmark_keys() -> &'static [BenchmarkKey] {
        &BenchmarkKey::ALL
    }

    /// Run one benchmark to completion on the calling thread, persisting the
    /// result on success. Failures are also surfaced on the progress channel
    /// with an `[ERR]` tag, and nothing is persisted for that attempt.
    pub fn run(
        &self,
        key: BenchmarkKey,
        reporter: &dyn ProgressReporter,
    ) -> Result<BenchmarkResult, SysmarkError> {
        let Some(_guard) = self.latch.try_lock() else {
            return Err(SysmarkError::Busy);
        };
        match self.catalog.run(key, reporter) {
            Ok(result) => {
                self.store.append(key, result.clone())?;
                reporter.report("[INFO] Result saved");
                Ok(result)
            }
            Err(err) => {
                reporter.report(&format!("[ERR] Benchmark failed: {err}"));
                Err(err)
            }
        }
    }

    /// Run on a dedicated background worker thread. Progress crosses to the
    /// foreground through `reporter` in emission order.
    pub fn spawn(
        self: &Arc<Self>,
        key: BenchmarkKey,
        reporter: impl ProgressReporter + 'static,
    ) -> thread::JoinHandle<Result<BenchmarkResult, SysmarkError>> {
        let engine = Arc::clone(self);
        thread::spawn(move || engine.run(key, &reporter))
    }

    pub fn history(&self, key: BenchmarkKey) -> Vec<HistoryEntry> {
        self.store
            .load_all()
            .remove(key.as_str())
            .unwrap_or_default()
    }

    pub fn latest(&self) -> BTreeMap<String, HistoryEntry> {
        self.store.latest_per_key()
    }

    pub fn delete_history(&self, key: BenchmarkKey) -> Result<(), SysmarkError> {
        self.store.delete(key)
    }

    pub fn trend(&self, key: BenchmarkKey) -> TrendSummary {
        trend::analyze(key, &self.history(key))
    }
}
