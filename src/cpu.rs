use std::hint::black_box;
use std::thread;
use std::time::Instant;

use crate::SysmarkError;
use crate::primitive::MeasurementPrimitive;
use crate::progress::ProgressReporter;

pub const SINGLE_CORE_ITERATIONS: u64 = 2_000_000;
pub const MULTI_CORE_ITERATIONS: u64 = 500_000;

const SCORE_SCALE: f64 = 1_000_000.0;
const LOOP_FACTOR: f64 = 1.234567;
const LOOP_MODULUS: f64 = 1_000_000.0;

/// The fixed floating-point workload both CPU benchmarks time.
fn math_loop(iterations: u64) -> f64 {
    let mut acc = 0.0f64;
    for i in 0..iterations {
        acc += (i as f64).sqrt() * LOOP_FACTOR;
        acc %= LOOP_MODULUS;
    }
    acc
}

/// Single-core CPU benchmark. Pins the worker thread to one logical
/// processor for the duration of the run and restores the original mask in
/// `teardown`, even after a failed sample.
pub struct CpuSingle {
    iterations: u64,
    original_mask: Option<Vec<usize>>,
}

impl CpuSingle {
    pub fn new() -> Self {
        Self::with_iterations(SINGLE_CORE_ITERATIONS)
    }

    pub fn with_iterations(iterations: u64) -> Self {
        Self {
            iterations,
            original_mask: None,
        }
    }
}

impl Default for CpuSingle {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementPrimitive for CpuSingle {
    fn label(&self) -> &'static str {
        "CPU Single-Core"
    }

    fn unit(&self) -> &'static str {
        "ops/s"
    }

    fn setup(&mut self, _reporter: &dyn ProgressReporter) -> Result<(), SysmarkError> {
        let mask = affinity::get_thread_affinity()
            .map_err(|e| SysmarkError::measurement(format!("read cpu affinity: {e}")))?;
        let first = mask
            .first()
            .copied()
            .ok_or_else(|| SysmarkError::measurement("empty cpu affinity mask"))?;
        affinity::set_thread_affinity([first])
            .map_err(|e| SysmarkError::measurement(format!("pin cpu affinity: {e}")))?;
        self.original_mask = Some(mask);
        Ok(())
    }

    fn measure(&mut self, _reporter: &dyn ProgressReporter) -> Result<f64, SysmarkError> {
        let start = Instant::now();
        black_box(math_loop(self.iterations));
        let elapsed = start.elapsed().as_secs_f64();
        Ok(SCORE_SCALE / elapsed)
    }

    fn teardown(&mut self, _reporter: &dyn ProgressReporter) -> Result<(), SysmarkError> {
        if let Some(mask) = self.original_mask.take() {
            // Leaving the thread pinned would outlive the benchmark; the
            // restore itself is best-effort.
            if let Err(e) = affinity::set_thread_affinity(&mask) {
                log::warn!("failed to restore cpu affinity: {e}");
            }
        }
        Ok(())
    }
}

/// Multi-core CPU benchmark: one worker per logical processor, all joined
/// before the sample's clock stops, so elapsed time covers the whole
/// parallel batch.
pub struct CpuMulti {
    iterations_per_worker: u64,
    workers: usize,
}

impl CpuMulti {
    pub fn new() -> Self {
        Self::with_iterations(MULTI_CORE_ITERATIONS)
    }

    pub fn with_iterations(iterations_per_worker: u64) -> Self {
        Self {
            iterations_per_worker,
            workers: num_cpus::get(),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for CpuMulti {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementPrimitive for CpuMulti {
    fn label(&self) -> &'static str {
        "CPU Multi-Core"
    }

    fn unit(&self) -> &'static str {
        "ops/s"
    }

    fn measure(&mut self, _reporter: &dyn ProgressReporter) -> Result<f64, SysmarkError> {
        let iterations = self.iterations_per_worker;
        let start = Instant::now();
        thread::scope(|scope| {
            for _ in 0..self.workers {
                scope.spawn(move || black_box(math_loop(iterations)));
            }
        });
        let elapsed = start.elapsed().as_secs_f64();
        Ok((self.workers as f64 * SCORE_SCALE) / elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullReporter;

    #[test]
    fn test_math_loop_stays_bounded() {
        let value = math_loop(10_000);
        assert!(value.is_finite());
        assert!((0.0..LOOP_MODULUS).contains(&value));
    }

    #[test]
    fn test_multi_core_scores_positive() {
        let mut bench = CpuMulti::with_iterations(10_000);
        let score = bench.measure(&NullReporter).unwrap();
        assert!(score > 0.0);
        assert!(bench.workers() >= 1);
    }
}
