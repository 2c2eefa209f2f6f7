use std::fs;

use sysmark::{BenchmarkKey, BenchmarkResult, ResultStore, SampleSet, StoreConfig};
use tempfile::tempdir;

fn store_in(dir: &std::path::Path) -> ResultStore {
    ResultStore::new(StoreConfig::new(dir))
}

fn result(metric: f64) -> BenchmarkResult {
    BenchmarkResult::new(metric, "ops/s", SampleSet::new(vec![metric - 1.0, metric + 1.0]))
}

#[test]
fn test_load_all_empty_when_file_missing() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    assert!(store.load_all().is_empty());
}

#[test]
fn test_load_all_empty_on_corrupt_file() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    fs::write(store.path(), b"{not json").unwrap();
    assert!(store.load_all().is_empty());
}

#[test]
fn test_append_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    let appended = result(100.0).with_extra("cores", 8.0);
    store.append(BenchmarkKey::CpuMulti, appended.clone()).unwrap();

    let history = store.load_all();
    let entries = &history["cpu_multi"];
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].result, appended);
    assert!(!entries[0].timestamp.is_empty());
}

#[test]
fn test_append_preserves_chronological_order() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    store.append(BenchmarkKey::CpuSingle, result(1.0)).unwrap();
    store.append(BenchmarkKey::CpuSingle, result(2.0)).unwrap();
    store.append(BenchmarkKey::CpuSingle, result(3.0)).unwrap();

    let history = store.load_all();
    let metrics: Vec<f64> = history["cpu_single"]
        .iter()
        .map(|e| e.result.primary_metric)
        .collect();
    assert_eq!(metrics, vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_delete_removes_only_the_given_key() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    store.append(BenchmarkKey::RamWrite, result(500.0)).unwrap();
    store.append(BenchmarkKey::RamRead, result(600.0)).unwrap();

    store.delete(BenchmarkKey::RamWrite).unwrap();

    let history = store.load_all();
    assert!(!history.contains_key("ram_write"));
    assert_eq!(history["ram_read"].len(), 1);
}

#[test]
fn test_delete_missing_key_is_noop() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    store.delete(BenchmarkKey::DiskRead).unwrap();
    assert!(store.load_all().is_empty());
}

#[test]
fn test_latest_per_key_returns_last_entry() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    store.append(BenchmarkKey::CpuSingle, result(1.0)).unwrap();
    store.append(BenchmarkKey::CpuSingle, result(2.0)).unwrap();
    store.append(BenchmarkKey::DiskWrite, result(9.0)).unwrap();

    let latest = store.latest_per_key();
    assert_eq!(latest.len(), 2);
    assert_eq!(latest["cpu_single"].result.primary_metric, 2.0);
    assert_eq!(latest["disk_write"].result.primary_metric, 9.0);
}

#[test]
fn test_custom_file_name() {
    let dir = tempdir().unwrap();
    let store = ResultStore::new(StoreConfig::new(dir.path()).with_file_name("alt.json"));
    store.append(BenchmarkKey::General, result(42.0)).unwrap();
    assert!(dir.path().join("alt.json").exists());
}
