use chrono::{DateTime, Utc};

/// Wall-clock start mark. `std::time::Instant` is unavailable in the browser.
#[derive(Debug, Clone, Copy)]
pub struct PerfTimer {
    started_at: DateTime<Utc>,
}

impl PerfTimer {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
        }
    }

    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds().max(0)
    }
}

#[inline]
pub fn log_perf(scope: &str, timer: PerfTimer, details: &str) {
    let elapsed_ms = timer.elapsed_ms();
    if details.trim().is_empty() {
        tracing::debug!(target: "seikoyt::perf", "{scope} took {elapsed_ms}ms");
    } else {
        tracing::debug!(target: "seikoyt::perf", "{scope} took {elapsed_ms}ms | {details}");
    }
}
