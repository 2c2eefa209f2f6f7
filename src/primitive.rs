use crate::SysmarkError;
use crate::progress::ProgressReporter;

/// A single-shot timing harness for one resource dimension.
///
/// The sampler calls `setup` once, `measure` once per sample, and `teardown`
/// exactly once afterwards, including when a sample failed. Teardown is
/// where persistent side effects are undone (CPU affinity, scratch files).
pub trait MeasurementPrimitive: Send {
    fn label(&self) -> &'static str;

    fn unit(&self) -> &'static str;

    fn setup(&mut self, _reporter: &dyn ProgressReporter) -> Result<(), SysmarkError> {
        Ok(())
    }

    /// Time one fixed unit of synthetic work and return the derived score.
    fn measure(&mut self, reporter: &dyn ProgressReporter) -> Result<f64, SysmarkError>;

    fn teardown(&mut self, _reporter: &dyn ProgressReporter) -> Result<(), SysmarkError> {
        Ok(())
    }
}
