use std::hint::black_box;
use std::time::Instant;

use crate::SysmarkError;
use crate::primitive::MeasurementPrimitive;
use crate::progress::ProgressReporter;

pub const BUFFER_SIZE_MB: usize = 200;

/// Sparse-touch stride: every 1000th byte is written or read, not the full
/// buffer, so the sweep exercises page faults and cache misses rather than
/// memset bandwidth.
const TOUCH_STRIDE: usize = 1000;

const BYTES_PER_MB: usize = 1024 * 1024;

/// RAM write benchmark. The timed region covers both the allocation and the
/// sparse write sweep, so freshly-mapped pages are faulted in under the clock.
pub struct RamWrite {
    size_mb: usize,
}

impl RamWrite {
    pub fn new() -> Self {
        Self::with_size(BUFFER_SIZE_MB)
    }

    pub fn with_size(size_mb: usize) -> Self {
        Self { size_mb }
    }
}

impl Default for RamWrite {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementPrimitive for RamWrite {
    fn label(&self) -> &'static str {
        "RAM Write"
    }

    fn unit(&self) -> &'static str {
        "MB/s"
    }

    fn measure(&mut self, _reporter: &dyn ProgressReporter) -> Result<f64, SysmarkError> {
        let bytes = self.size_mb * BYTES_PER_MB;
        let start = Instant::now();
        let mut data = vec![0u8; bytes];
        let mut i = 0;
        while i < bytes {
            data[i] = (i % 256) as u8;
            i += TOUCH_STRIDE;
        }
        black_box(&data);
        let elapsed = start.elapsed().as_secs_f64();
        Ok(self.size_mb as f64 / elapsed)
    }
}

/// RAM read benchmark. The buffer is allocated and faulted in outside the
/// timed region; only the sparse read sweep is measured.
pub struct RamRead {
    size_mb: usize,
}

impl RamRead {
    pub fn new() -> Self {
        Self::with_size(BUFFER_SIZE_MB)
    }

    pub fn with_size(size_mb: usize) -> Self {
        Self { size_mb }
    }
}

impl Default for RamRead {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementPrimitive for RamRead {
    fn label(&self) -> &'static str {
        "RAM Read"
    }

    fn unit(&self) -> &'static str {
        "MB/s"
    }

    fn measure(&mut self, _reporter: &dyn ProgressReporter) -> Result<f64, SysmarkError> {
        let bytes = self.size_mb * BYTES_PER_MB;
        let mut data = vec![0u8; bytes];
        // Fault the zero-filled pages in before the clock starts.
        let mut i = 0;
        while i < bytes {
            data[i] = 0;
            i += TOUCH_STRIDE;
        }
        black_box(&mut data);
        let start = Instant::now();
        let mut sum = 0u64;
        let mut i = 0;
        while i < bytes {
            sum = sum.wrapping_add(u64::from(data[i]));
            i += TOUCH_STRIDE;
        }
        black_box(sum);
        let elapsed = start.elapsed().as_secs_f64();
        Ok(self.size_mb as f64 / elapsed)
    }
}
