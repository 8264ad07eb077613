use serde::Serialize;
use std::sync::Mutex;

/// Counters for one session, safe to share across threads.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub passes: usize,
    pub adjustments: usize,
    pub revisions: usize,
    pub fft_failures: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_pass(&self, adjusted: bool, revisions: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.passes += 1;
            if adjusted {
                metrics.adjustments += 1;
            }
            metrics.revisions += revisions;
        }
    }

    pub fn record_fft_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.fft_failures += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
