use serde::Serialize;
use std::sync::Mutex;

/// Counters for sanitizer activity, shareable across rayon workers.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub frames: usize,
    pub pairs: usize,
    pub rejected: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_frame(&self, pairs: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.frames += 1;
            metrics.pairs += pairs;
        }
    }

    pub fn record_rejected(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rejected += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }

    pub fn snapshot_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or(serde_json::Value::Null)
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
