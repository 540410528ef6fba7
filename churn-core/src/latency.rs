//! Latency Monitor - Request timing
//!
//! Purely observational: records how long each request took and warns when
//! one goes over the threshold. Never touches the result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Requests slower than this are logged at warn level
pub const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_millis(50);

/// Running latency statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencyStats {
    pub requests: u64,
    pub avg_latency_ms: f64,
    pub slow_requests: u64,
}

#[derive(Debug)]
pub struct LatencyMonitor {
    threshold: Duration,
    requests: AtomicU64,
    latency_sum_us: AtomicU64,
    slow_requests: AtomicU64,
}

impl LatencyMonitor {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            requests: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
            slow_requests: AtomicU64::new(0),
        }
    }

    /// Record one request; returns true when it exceeded the threshold
    pub fn record(&self, operation: &str, elapsed: Duration) -> bool {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.latency_sum_us
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);

        if elapsed > self.threshold {
            self.slow_requests.fetch_add(1, Ordering::Relaxed);
            log::warn!(
                "High latency: {:.4}s for {}",
                elapsed.as_secs_f64(),
                operation
            );
            return true;
        }
        false
    }

    pub fn stats(&self) -> LatencyStats {
        let requests = self.requests.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let avg_latency_ms = if requests > 0 {
            (sum as f64 / requests as f64) / 1000.0
        } else {
            0.0
        };

        LatencyStats {
            requests,
            avg_latency_ms,
            slow_requests: self.slow_requests.load(Ordering::Relaxed),
        }
    }
}

impl Default for LatencyMonitor {
    fn default() -> Self {
        Self::new(SLOW_REQUEST_THRESHOLD)
    }
}
