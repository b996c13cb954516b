use std::time::Duration;

use tracing::info;

/// Wall-clock time spent in each stage of one capture cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleTimings {
    /// Trigger plus waiting for the sensor to signal completion
    pub capture: Duration,
    /// Copying the compressed frame into the transfer buffer
    pub transfer: Duration,
    /// Block decode and raster writes
    pub decode: Duration,
}

impl CycleTimings {
    pub fn total(&self) -> Duration {
        self.capture + self.transfer + self.decode
    }

    /// Stage that dominated the cycle, for spotting a slow sensor or decoder.
    pub fn slowest(&self) -> (&'static str, Duration) {
        [
            ("capture", self.capture),
            ("transfer", self.transfer),
            ("decode", self.decode),
        ]
        .into_iter()
        .fold(("capture", Duration::ZERO), |slowest, stage| {
            if stage.1 > slowest.1 { stage } else { slowest }
        })
    }

    pub fn log_summary(&self) {
        let (slowest, _) = self.slowest();
        info!(
            capture_ms = millis(self.capture),
            transfer_ms = millis(self.transfer),
            decode_ms = millis(self.decode),
            total_ms = millis(self.total()),
            slowest,
            "Cycle timings"
        );
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
