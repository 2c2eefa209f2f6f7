//! System benchmarking engine: repeated, averaged micro-measurements of
//! CPU, memory, disk, and network-stack latency, with persisted history and
//! run-over-run trend analysis.

pub mod catalog;
pub mod cpu;
pub mod disk;
pub mod engine;
pub mod errors;
pub mod memory;
pub mod network;
pub mod primitive;
pub mod progress;
pub mod result;
pub mod sampler;
pub mod store;
pub mod trend;

pub use crate::catalog::{BenchmarkKey, Catalog, CatalogConfig};
pub use crate::engine::BenchmarkEngine;
pub use crate::errors::SysmarkError;
pub use crate::primitive::MeasurementPrimitive;
pub use crate::progress::{ChannelReporter, NullReporter, ProgressReporter};
pub use crate::result::{BenchmarkHistory, BenchmarkResult, HistoryEntry, SampleSet};
pub use crate::sampler::SamplerConfig;
pub use crate::store::{ResultStore, StoreConfig};
pub use crate::trend::{TrendPoint, TrendSummary};
