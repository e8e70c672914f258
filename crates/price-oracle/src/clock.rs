use std::time::{SystemTime, UNIX_EPOCH};

/// Source of "now" for cache freshness checks.
pub trait Clock: Send + Sync {
    /// Milliseconds since the unix epoch.
    fn now_millis(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}
