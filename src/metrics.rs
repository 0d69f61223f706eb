// Session metrics module
//
// Lightweight counters for what the application did during its lifetime,
// logged on shutdown.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Application-lifetime counters.
///
/// Atomic operations keep the tracking lock-free; the monitor drain loop
/// and the controller increment these from tokio tasks.
#[derive(Debug)]
pub struct Metrics {
    /// Crack sessions that launched successfully
    pub sessions_started: AtomicUsize,

    /// Crack sessions that ran to completion (including killed ones)
    pub sessions_finished: AtomicUsize,

    /// Launch attempts the OS rejected
    pub launch_failures: AtomicUsize,

    /// Output lines forwarded to the console
    pub lines_forwarded: AtomicU64,

    /// UI updates marshaled to the Slint event loop
    pub ui_updates: AtomicU64,

    /// Total wall time spent in sessions, in milliseconds
    pub total_session_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            sessions_started: AtomicUsize::new(0),
            sessions_finished: AtomicUsize::new(0),
            launch_failures: AtomicUsize::new(0),
            lines_forwarded: AtomicU64::new(0),
            ui_updates: AtomicU64::new(0),
            total_session_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_session_started(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_finished(&self, duration: Duration) {
        self.sessions_finished.fetch_add(1, Ordering::Relaxed);
        self.total_session_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_launch_failure(&self) {
        self.launch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_line_forwarded(&self) {
        self.lines_forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ui_update(&self) {
        self.ui_updates.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total uptime.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average session wall time in milliseconds.
    pub fn avg_session_time_ms(&self) -> f64 {
        let total = self.total_session_time_ms.load(Ordering::Relaxed);
        let count = self.sessions_finished.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Log a metrics summary.
    pub fn log_summary(&self) {
        tracing::info!("=== Session Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Sessions: {} started, {} finished, {} launch failures",
            self.sessions_started.load(Ordering::Relaxed),
            self.sessions_finished.load(Ordering::Relaxed),
            self.launch_failures.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Output lines forwarded: {}",
            self.lines_forwarded.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Session time: {:.2}s total (avg: {:.2}ms), UI updates: {}",
            self.total_session_time_ms.load(Ordering::Relaxed) as f64 / 1000.0,
            self.avg_session_time_ms(),
            self.ui_updates.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.sessions_started.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.launch_failures.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_sessions() {
        let metrics = Metrics::new();

        metrics.record_session_started();
        metrics.record_session_finished(Duration::from_millis(100));
        metrics.record_session_started();
        metrics.record_session_finished(Duration::from_millis(300));
        metrics.record_launch_failure();

        assert_eq!(metrics.sessions_started.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.sessions_finished.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.launch_failures.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.total_session_time_ms.load(Ordering::Relaxed), 400);
        assert_eq!(metrics.avg_session_time_ms(), 200.0);
    }

    #[test]
    fn test_avg_session_time_no_sessions() {
        let metrics = Metrics::new();
        assert_eq!(metrics.avg_session_time_ms(), 0.0);
    }

    #[test]
    fn test_line_and_ui_counters() {
        let metrics = Metrics::new();

        metrics.record_line_forwarded();
        metrics.record_line_forwarded();
        metrics.record_ui_update();

        assert_eq!(metrics.lines_forwarded.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.ui_updates.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_uptime() {
        let metrics = Metrics::new();
        thread::sleep(Duration::from_millis(10));
        assert!(metrics.uptime().as_millis() >= 10);
    }
}
