use sysmark::{BenchmarkKey, Catalog, CatalogConfig, ChannelReporter, NullReporter, SysmarkError};
use tempfile::tempdir;

fn quick_catalog(dir: &std::path::Path) -> Catalog {
    Catalog::new(CatalogConfig::quick(dir))
}

fn assert_mean_invariant(result: &sysmark::BenchmarkResult) {
    let mean = result.raw_samples.mean();
    assert!(
        (result.primary_metric - mean).abs() < 1e-9,
        "primary metric {} is not the mean of samples {}",
        result.primary_metric,
        mean
    );
}

#[test]
fn test_key_as_str_parse_round_trip() {
    for key in BenchmarkKey::ALL {
        assert_eq!(BenchmarkKey::parse(key.as_str()).unwrap(), key);
    }
}

#[test]
fn test_parse_rejects_unknown_key() {
    let err = BenchmarkKey::parse("gpu_compute").unwrap_err();
    assert!(matches!(err, SysmarkError::InvalidKey(_)));
}

#[test]
fn test_key_order_matches_suite_listing() {
    let keys: Vec<&str> = BenchmarkKey::ALL.iter().map(|k| k.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "general",
            "cpu_single",
            "cpu_multi",
            "ram_write",
            "ram_read",
            "disk_write",
            "disk_read",
            "network_latency",
        ]
    );
}

#[test]
fn test_only_latency_is_lower_is_better() {
    for key in BenchmarkKey::ALL {
        assert_eq!(
            key.lower_is_better(),
            key == BenchmarkKey::NetworkLatency,
            "unexpected direction for {key}"
        );
    }
}

#[test]
fn test_ram_write_run_produces_full_sample_set() {
    let dir = tempdir().unwrap();
    let catalog = quick_catalog(dir.path());
    let result = catalog.run(BenchmarkKey::RamWrite, &NullReporter).unwrap();
    assert_eq!(result.raw_samples.len(), catalog.config().samples);
    assert_eq!(result.unit, "MB/s");
    assert!(result.primary_metric > 0.0);
    assert_mean_invariant(&result);
}

#[test]
fn test_cpu_multi_reports_core_count() {
    let dir = tempdir().unwrap();
    let catalog = quick_catalog(dir.path());
    let result = catalog.run(BenchmarkKey::CpuMulti, &NullReporter).unwrap();
    assert_eq!(result.unit, "ops/s");
    assert!(result.extra["cores"] >= 1.0);
    assert_mean_invariant(&result);
}

#[test]
fn test_disk_benchmarks_run_in_scratch_dir() {
    let dir = tempdir().unwrap();
    let catalog = quick_catalog(dir.path());

    let write = catalog.run(BenchmarkKey::DiskWrite, &NullReporter).unwrap();
    assert!(write.primary_metric > 0.0);
    assert_mean_invariant(&write);

    let read = catalog.run(BenchmarkKey::DiskRead, &NullReporter).unwrap();
    assert!(read.primary_metric > 0.0);
    assert_mean_invariant(&read);

    // Both lifecycles remove their scratch file.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_latency_min_max_match_sample_set() {
    let dir = tempdir().unwrap();
    let catalog = quick_catalog(dir.path());
    let result = catalog
        .run(BenchmarkKey::NetworkLatency, &NullReporter)
        .unwrap();
    assert_eq!(result.unit, "us");
    assert_eq!(result.extra["min"], result.raw_samples.min().unwrap());
    assert_eq!(result.extra["max"], result.raw_samples.max().unwrap());
    assert_mean_invariant(&result);
}

#[test]
fn test_progress_lines_bracket_the_run() {
    let dir = tempdir().unwrap();
    let catalog = quick_catalog(dir.path());
    let (reporter, rx) = ChannelReporter::new();
    catalog.run(BenchmarkKey::RamRead, &reporter).unwrap();
    drop(reporter);
    let lines: Vec<String> = rx.iter().collect();
    assert!(lines.first().unwrap().starts_with("[>>] Starting RAM Read"));
    assert!(lines.last().unwrap().starts_with("[OK] RAM Read complete"));
    let samples = lines.iter().filter(|l| l.starts_with("[PROG]")).count();
    assert_eq!(samples, catalog.config().samples);
}

#[test]
fn test_disk_write_failure_surfaces_as_measurement_error() {
    let catalog = Catalog::new(CatalogConfig::quick("/nonexistent/sysmark-scratch"));
    let err = catalog.run(BenchmarkKey::DiskWrite, &NullReporter).unwrap_err();
    assert!(matches!(err, SysmarkError::Measurement(_)));
}
