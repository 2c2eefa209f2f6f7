use std::thread;
use std::time::{Duration, Instant};

use sysinfo::Networks;

use crate::SysmarkError;
use crate::primitive::MeasurementPrimitive;
use crate::progress::ProgressReporter;

pub const PROBES_PER_SAMPLE: usize = 10;

const PROBE_DELAY: Duration = Duration::from_millis(1);

/// Network latency proxy.
///
/// No real network call is portable or safe here, so each probe times a
/// refresh of the OS network-interface counters instead. This models local
/// IPC-like round-trip latency, not a true network RTT; treat the numbers
/// as a proxy metric only.
///
/// One sample is the mean of [`PROBES_PER_SAMPLE`] probes, in microseconds.
pub struct NetworkLatencyProxy {
    probes: usize,
    networks: Option<Networks>,
}

impl NetworkLatencyProxy {
    pub fn new() -> Self {
        Self::with_probes(PROBES_PER_SAMPLE)
    }

    pub fn with_probes(probes: usize) -> Self {
        Self {
            probes,
            networks: None,
        }
    }
}

impl Default for NetworkLatencyProxy {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementPrimitive for NetworkLatencyProxy {
    fn label(&self) -> &'static str {
        "Network Latency"
    }

    fn unit(&self) -> &'static str {
        "us"
    }

    fn setup(&mut self, _reporter: &dyn ProgressReporter) -> Result<(), SysmarkError> {
        self.networks = Some(Networks::new_with_refreshed_list());
        Ok(())
    }

    fn measure(&mut self, _reporter: &dyn ProgressReporter) -> Result<f64, SysmarkError> {
        let networks = self
            .networks
            .as_mut()
            .ok_or_else(|| SysmarkError::measurement("network stats not initialized"))?;
        let mut total_us = 0.0f64;
        for probe in 0..self.probes {
            let start = Instant::now();
            networks.refresh();
            total_us += start.elapsed().as_nanos() as f64 / 1_000.0;
            if probe + 1 < self.probes {
                thread::sleep(PROBE_DELAY);
            }
        }
        Ok(total_us / self.probes as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullReporter;

    #[test]
    fn test_latency_probe_requires_setup() {
        let mut bench = NetworkLatencyProxy::with_probes(2);
        assert!(bench.measure(&NullReporter).is_err());
    }

    #[test]
    fn test_latency_probe_measures_positive() {
        let mut bench = NetworkLatencyProxy::with_probes(2);
        bench.setup(&NullReporter).unwrap();
        let latency = bench.measure(&NullReporter).unwrap();
        assert!(latency > 0.0);
    }
}
