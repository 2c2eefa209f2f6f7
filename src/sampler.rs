use std::thread;
use std::time::Duration;

use crate::SysmarkError;
use crate::primitive::MeasurementPrimitive;
use crate::progress::ProgressReporter;
use crate::result::SampleSet;

/// Default sample count for every top-level benchmark.
pub const DEFAULT_SAMPLES: usize = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplerConfig {
    pub samples: usize,
    /// Deliberate pause between samples so thermal and scheduler effects
    /// from one sample do not bleed into the next.
    pub inter_sample_delay: Duration,
}

impl SamplerConfig {
    pub fn new(samples: usize, inter_sample_delay: Duration) -> Self {
        Self {
            samples,
            inter_sample_delay,
        }
    }
}

/// Run a primitive `config.samples` times and collect the raw measurements.
///
/// The returned set always has exactly `config.samples` entries. Any sample
/// failure aborts the whole run; there is no partial-result averaging.
/// `teardown` runs on every exit path.
pub fn collect(
    primitive: &mut dyn MeasurementPrimitive,
    config: &SamplerConfig,
    reporter: &dyn ProgressReporter,
) -> Result<SampleSet, SysmarkError> {
    primitive.setup(reporter)?;
    let mut values = Vec::with_capacity(config.samples);
    for sample in 0..config.samples {
        reporter.report(&format!("[PROG] Sample {}/{}...", sample + 1, config.samples));
        match primitive.measure(reporter) {
            Ok(value) => values.push(value),
            Err(err) => {
                finish(primitive, reporter);
                return Err(err);
            }
        }
        if sample + 1 < config.samples {
            thread::sleep(config.inter_sample_delay);
        }
    }
    finish(primitive, reporter);
    Ok(SampleSet::new(values))
}

fn finish(primitive: &mut dyn MeasurementPrimitive, reporter: &dyn ProgressReporter) {
    if let Err(err) = primitive.teardown(reporter) {
        log::warn!("{} teardown failed: {err}", primitive.label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullReporter;

    struct ScriptedPrimitive {
        results: Vec<Result<f64, SysmarkError>>,
        torn_down: bool,
    }

    impl ScriptedPrimitive {
        fn new(results: Vec<Result<f64, SysmarkError>>) -> Self {
            Self {
                results,
                torn_down: false,
            }
        }
    }

    impl MeasurementPrimitive for ScriptedPrimitive {
        fn label(&self) -> &'static str {
            "scripted"
        }

        fn unit(&self) -> &'static str {
            "ops/s"
        }

        fn measure(&mut self, _reporter: &dyn ProgressReporter) -> Result<f64, SysmarkError> {
            self.results.remove(0)
        }

        fn teardown(&mut self, _reporter: &dyn ProgressReporter) -> Result<(), SysmarkError> {
            self.torn_down = true;
            Ok(())
        }
    }

    fn quick_config(samples: usize) -> SamplerConfig {
        SamplerConfig::new(samples, Duration::from_millis(1))
    }

    #[test]
    fn test_collect_returns_exact_sample_count() {
        for n in 1..=4 {
            let mut primitive = ScriptedPrimitive::new((0..n).map(|i| Ok(i as f64)).collect());
            let set = collect(&mut primitive, &quick_config(n), &NullReporter).unwrap();
            assert_eq!(set.len(), n);
            assert!(primitive.torn_down);
        }
    }

    #[test]
    fn test_collect_aborts_on_first_failure() {
        let mut primitive = ScriptedPrimitive::new(vec![
            Ok(1.0),
            Err(SysmarkError::measurement("boom")),
            Ok(3.0),
        ]);
        let err = collect(&mut primitive, &quick_config(3), &NullReporter).unwrap_err();
        assert!(matches!(err, SysmarkError::Measurement(_)));
        assert!(primitive.torn_down);
    }

    #[test]
    fn test_collect_reports_each_sample() {
        let (reporter, rx) = crate::progress::ChannelReporter::new();
        let mut primitive = ScriptedPrimitive::new(vec![Ok(1.0), Ok(2.0)]);
        collect(&mut primitive, &quick_config(2), &reporter).unwrap();
        drop(reporter);
        let lines: Vec<String> = rx.iter().collect();
        assert_eq!(lines, vec!["[PROG] Sample 1/2...", "[PROG] Sample 2/2..."]);
    }
}
