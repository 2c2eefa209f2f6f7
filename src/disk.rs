use std::fs::{self, File};
use std::hint::black_box;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::Rng;

use crate::SysmarkError;
use crate::primitive::MeasurementPrimitive;
use crate::progress::ProgressReporter;

pub const FILE_SIZE_MB: usize = 50;

const CHUNK_SIZE: usize = 1024 * 1024;
const SCRATCH_FILE: &str = "sysmark_disk_test.tmp";

fn random_chunk() -> Vec<u8> {
    let mut chunk = vec![0u8; CHUNK_SIZE];
    rand::thread_rng().fill(&mut chunk[..]);
    chunk
}

fn write_chunks(path: &Path, chunk: &[u8], count: usize) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    for _ in 0..count {
        file.write_all(chunk)?;
    }
    file.sync_all()
}

/// Disk sequential write benchmark. Each sample writes the whole file in
/// 1 MB chunks, forces a hardware flush before the clock stops, then removes
/// the file so the next sample starts cold.
pub struct DiskWrite {
    dir: PathBuf,
    size_mb: usize,
    chunk: Vec<u8>,
}

impl DiskWrite {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_size(dir, FILE_SIZE_MB)
    }

    pub fn with_size(dir: impl Into<PathBuf>, size_mb: usize) -> Self {
        Self {
            dir: dir.into(),
            size_mb,
            chunk: random_chunk(),
        }
    }
}

impl MeasurementPrimitive for DiskWrite {
    fn label(&self) -> &'static str {
        "Disk Write"
    }

    fn unit(&self) -> &'static str {
        "MB/s"
    }

    fn measure(&mut self, _reporter: &dyn ProgressReporter) -> Result<f64, SysmarkError> {
        let path = self.dir.join(SCRATCH_FILE);
        let start = Instant::now();
        let outcome = write_chunks(&path, &self.chunk, self.size_mb);
        let elapsed = start.elapsed();
        let cleanup = fs::remove_file(&path);
        outcome.map_err(|e| SysmarkError::measurement(format!("disk write: {e}")))?;
        if let Err(e) = cleanup {
            log::warn!("failed to remove disk scratch file: {e}");
        }
        Ok(self.size_mb as f64 / elapsed.as_secs_f64())
    }
}

/// Disk sequential read benchmark. The scratch file is created once in
/// `setup` and removed in `teardown`; every sample re-reads it in full.
///
/// Unlike the write test, samples after the first may be served from the OS
/// page cache, so read scores can run warmer than write scores.
pub struct DiskRead {
    dir: PathBuf,
    size_mb: usize,
    path: Option<PathBuf>,
}

impl DiskRead {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_size(dir, FILE_SIZE_MB)
    }

    pub fn with_size(dir: impl Into<PathBuf>, size_mb: usize) -> Self {
        Self {
            dir: dir.into(),
            size_mb,
            path: None,
        }
    }
}

impl MeasurementPrimitive for DiskRead {
    fn label(&self) -> &'static str {
        "Disk Read"
    }

    fn unit(&self) -> &'static str {
        "MB/s"
    }

    fn setup(&mut self, _reporter: &dyn ProgressReporter) -> Result<(), SysmarkError> {
        let path = self.dir.join(SCRATCH_FILE);
        write_chunks(&path, &random_chunk(), self.size_mb)
            .map_err(|e| SysmarkError::measurement(format!("disk read setup: {e}")))?;
        self.path = Some(path);
        Ok(())
    }

    fn measure(&mut self, _reporter: &dyn ProgressReporter) -> Result<f64, SysmarkError> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| SysmarkError::measurement("disk read scratch file missing"))?;
        let mut buf = vec![0u8; CHUNK_SIZE];
        let start = Instant::now();
        let mut file = File::open(path)
            .map_err(|e| SysmarkError::measurement(format!("disk read: {e}")))?;
        let mut total = 0usize;
        loop {
            let n = file
                .read(&mut buf)
                .map_err(|e| SysmarkError::measurement(format!("disk read: {e}")))?;
            if n == 0 {
                break;
            }
            total += n;
        }
        black_box(total);
        let elapsed = start.elapsed().as_secs_f64();
        Ok(self.size_mb as f64 / elapsed)
    }

    fn teardown(&mut self, _reporter: &dyn ProgressReporter) -> Result<(), SysmarkError> {
        if let Some(path) = self.path.take() {
            if let Err(e) = fs::remove_file(&path) {
                log::warn!("failed to remove disk scratch file: {e}");
            }
        }
        Ok(())
    }
}
