use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::cpu::{self, CpuMulti, CpuSingle};
use crate::disk::{self, DiskRead, DiskWrite};
use crate::errors::SysmarkError;
use crate::memory::{self, RamRead, RamWrite};
use crate::network::{self, NetworkLatencyProxy};
use crate::primitive::MeasurementPrimitive;
use crate::progress::ProgressReporter;
use crate::result::{BenchmarkResult, SampleSet};
use crate::sampler::{self, SamplerConfig};

/// Fixed benchmark families, in suite listing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BenchmarkKey {
    General,
    CpuSingle,
    CpuMulti,
    RamWrite,
    RamRead,
    DiskWrite,
    DiskRead,
    NetworkLatency,
}

impl BenchmarkKey {
    pub const ALL: [BenchmarkKey; 8] = [
        BenchmarkKey::General,
        BenchmarkKey::CpuSingle,
        BenchmarkKey::CpuMulti,
        BenchmarkKey::RamWrite,
        BenchmarkKey::RamRead,
        BenchmarkKey::DiskWrite,
        BenchmarkKey::DiskRead,
        BenchmarkKey::NetworkLatency,
    ];

    /// Leaf benchmarks blended into the composite score, in run order.
    pub const GENERAL_SUITE: [BenchmarkKey; 6] = [
        BenchmarkKey::CpuSingle,
        BenchmarkKey::CpuMulti,
        BenchmarkKey::RamWrite,
        BenchmarkKey::RamRead,
        BenchmarkKey::DiskWrite,
        BenchmarkKey::DiskRead,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BenchmarkKey::General => "general",
            BenchmarkKey::CpuSingle => "cpu_single",
            BenchmarkKey::CpuMulti => "cpu_multi",
            BenchmarkKey::RamWrite => "ram_write",
            BenchmarkKey::RamRead => "ram_read",
            BenchmarkKey::DiskWrite => "disk_write",
            BenchmarkKey::DiskRead => "disk_read",
            BenchmarkKey::NetworkLatency => "network_latency",
        }
    }

    pub fn parse(value: &str) -> Result<Self, SysmarkError> {
        BenchmarkKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| SysmarkError::invalid_key(value))
    }

    pub fn label(&self) -> &'static str {
        match self {
            BenchmarkKey::General => "General Score",
            BenchmarkKey::CpuSingle => "CPU Single-Core",
            BenchmarkKey::CpuMulti => "CPU Multi-Core",
            BenchmarkKey::RamWrite => "RAM Write",
            BenchmarkKey::RamRead => "RAM Read",
            BenchmarkKey::DiskWrite => "Disk Write",
            BenchmarkKey::DiskRead => "Disk Read",
            BenchmarkKey::NetworkLatency => "Network Latency",
        }
    }

    /// Metric direction. Latency improves downward; everything else upward.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, BenchmarkKey::NetworkLatency)
    }
}

impl fmt::Display for BenchmarkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workload sizing for one catalog. `standard` is the full suite;
/// `quick` shrinks everything for smoke runs and tests.
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub scratch_dir: PathBuf,
    pub samples: usize,
    pub cpu_single_iterations: u64,
    pub cpu_multi_iterations: u64,
    pub ram_buffer_mb: usize,
    pub disk_file_mb: usize,
    pub latency_probes: usize,
    /// Overrides the per-family inter-sample delay when set.
    pub inter_sample_delay: Option<Duration>,
}

impl CatalogConfig {
    pub fn standard(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            samples: sampler::DEFAULT_SAMPLES,
            cpu_single_iterations: cpu::SINGLE_CORE_ITERATIONS,
            cpu_multi_iterations: cpu::MULTI_CORE_ITERATIONS,
            ram_buffer_mb: memory::BUFFER_SIZE_MB,
            disk_file_mb: disk::FILE_SIZE_MB,
            latency_probes: network::PROBES_PER_SAMPLE,
            inter_sample_delay: None,
        }
    }

    pub fn quick(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            samples: 3,
            cpu_single_iterations: 50_000,
            cpu_multi_iterations: 20_000,
            ram_buffer_mb: 16,
            disk_file_mb: 4,
            latency_probes: 3,
            inter_sample_delay: Some(Duration::from_millis(10)),
        }
    }
}

/// Maps each benchmark key to its primitive and sampler settings, and runs
/// the composite suite.
pub struct Catalog {
    config: CatalogConfig,
}

impl Catalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn run(
        &self,
        key: BenchmarkKey,
        reporter: &dyn ProgressReporter,
    ) -> Result<BenchmarkResult, SysmarkError> {
        match key {
            BenchmarkKey::General => self.run_general(reporter),
            leaf => self.run_leaf(leaf, reporter),
        }
    }

    fn run_leaf(
        &self,
        key: BenchmarkKey,
        reporter: &dyn ProgressReporter,
    ) -> Result<BenchmarkResult, SysmarkError> {
        let mut primitive = self
            .primitive_for(key)
            .ok_or_else(|| SysmarkError::invalid_key(key.as_str()))?;
        let sampler_config = self.sampler_for(key);
        reporter.report(&format!(
            "[>>] Starting {} benchmark ({} samples)...",
            key.label(),
            sampler_config.samples
        ));
        let samples = sampler::collect(primitive.as_mut(), &sampler_config, reporter)?;
        let result = self.reduce(key, primitive.as_ref(), samples);
        reporter.report(&format!(
            "[OK] {} complete: {:.2} {}",
            key.label(),
            result.primary_metric,
            result.unit
        ));
        Ok(result)
    }

    fn primitive_for(&self, key: BenchmarkKey) -> Option<Box<dyn MeasurementPrimitive>> {
        let cfg = &self.config;
        match key {
            BenchmarkKey::General => None,
            BenchmarkKey::CpuSingle => {
                Some(Box::new(CpuSingle::with_iterations(cfg.cpu_single_iterations)))
            }
            BenchmarkKey::CpuMulti => {
                Some(Box::new(CpuMulti::with_iterations(cfg.cpu_multi_iterations)))
            }
            BenchmarkKey::RamWrite => Some(Box::new(RamWrite::with_size(cfg.ram_buffer_mb))),
            BenchmarkKey::RamRead => Some(Box::new(RamRead::with_size(cfg.ram_buffer_mb))),
            BenchmarkKey::DiskWrite => Some(Box::new(DiskWrite::with_size(
                &cfg.scratch_dir,
                cfg.disk_file_mb,
            ))),
            BenchmarkKey::DiskRead => Some(Box::new(DiskRead::with_size(
                &cfg.scratch_dir,
                cfg.disk_file_mb,
            ))),
            BenchmarkKey::NetworkLatency => {
                Some(Box::new(NetworkLatencyProxy::with_probes(cfg.latency_probes)))
            }
        }
    }

    fn sampler_for(&self, key: BenchmarkKey) -> SamplerConfig {
        let delay = self.config.inter_sample_delay.unwrap_or(match key {
            BenchmarkKey::RamWrite | BenchmarkKey::RamRead | BenchmarkKey::NetworkLatency => {
                Duration::from_millis(50)
            }
            _ => Duration::from_millis(100),
        });
        SamplerConfig::new(self.config.samples, delay)
    }

    fn reduce(
        &self,
        key: BenchmarkKey,
        primitive: &dyn MeasurementPrimitive,
        samples: SampleSet,
    ) -> BenchmarkResult {
        let mean = samples.mean();
        let mut result = BenchmarkResult::new(mean, primitive.unit(), samples);
        match key {
            BenchmarkKey::CpuMulti => {
                result = result.with_extra("cores", num_cpus::get() as f64);
            }
            BenchmarkKey::NetworkLatency => {
                if let (Some(min), Some(max)) = (result.raw_samples.min(), result.raw_samples.max())
                {
                    result = result.with_extra("min", min).with_extra("max", max);
                }
            }
            _ => {}
        }
        result
    }

    fn run_general(
        &self,
        reporter: &dyn ProgressReporter,
    ) -> Result<BenchmarkResult, SysmarkError> {
        self.run_general_with(reporter, |key, reporter| self.run_leaf(key, reporter))
    }

    /// Composite aggregation over the six leaf benchmarks.
    ///
    /// A failed sub-benchmark is logged, reported, and excluded from the
    /// average; the composite only degrades to a zero score when every leaf
    /// fails. The `ops/s / 100` and `MB/s / 10` rescaling keeps existing
    /// score history comparable; it mixes incompatible units and the
    /// blended 0-100 "score" should not be read as a principled metric.
    fn run_general_with<F>(
        &self,
        reporter: &dyn ProgressReporter,
        mut runner: F,
    ) -> Result<BenchmarkResult, SysmarkError>
    where
        F: FnMut(BenchmarkKey, &dyn ProgressReporter) -> Result<BenchmarkResult, SysmarkError>,
    {
        reporter.report("[>>] Running full benchmark suite...");
        let mut normalized = Vec::new();
        for key in BenchmarkKey::GENERAL_SUITE {
            reporter.report(&format!("[...] Running {}...", key.label()));
            match runner(key, reporter) {
                Ok(result) => normalized.push(normalize(&result)),
                Err(err) => {
                    log::warn!("{} skipped in composite run: {err}", key.as_str());
                    reporter.report(&format!("[ERR] {} failed: {err}", key.label()));
                }
            }
        }
        if normalized.is_empty() {
            reporter.report("[ERR] No benchmark produced a score");
            return Ok(BenchmarkResult::new(0.0, "score", SampleSet::new(Vec::new())));
        }
        let samples = SampleSet::new(normalized);
        let score = samples.mean();
        reporter.report(&format!("[OK] General score: {score:.1}/100"));
        Ok(BenchmarkResult::new(score, "score", samples))
    }
}

fn normalize(result: &BenchmarkResult) -> f64 {
    match result.unit.as_str() {
        "ops/s" => result.primary_metric / 100.0,
        "MB/s" => result.primary_metric / 10.0,
        _ => 50.0,
    }
}
