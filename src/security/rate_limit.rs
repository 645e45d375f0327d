//! Identifier-keyed rate limiting using a sliding window.
//!
//! Each identifier (e.g. `login_<email>`, `signup_<email>`) maps to the
//! ordered timestamps of its accepted calls within the current window.
//! The table is in-memory only and resets on process restart, so it offers
//! no protection against a determined client across restarts.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Thread-safe sliding-window limiter.
#[derive(Debug)]
pub struct RateLimiter {
    /// identifier -> timestamps of accepted calls, oldest first
    entries: DashMap<String, Vec<Instant>>,
    window: Duration,
    max_requests: usize,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            entries: DashMap::new(),
            window,
            max_requests,
        }
    }

    /// Checks whether a call under `identifier` is allowed right now.
    ///
    /// Prunes timestamps older than the window, rejects without recording
    /// when the remaining count has reached the limit, records and accepts
    /// otherwise.
    pub fn check(&self, identifier: &str) -> bool {
        let now = Instant::now();

        let mut entry = self.entries.entry(identifier.to_string()).or_default();
        entry.retain(|t| now.duration_since(*t) < self.window);

        if entry.len() >= self.max_requests {
            return false;
        }

        entry.push(now);
        true
    }

    /// Prunes stale timestamps everywhere and drops empty identifiers to
    /// bound memory.
    pub fn sweep(&self) {
        let now = Instant::now();
        self.entries.retain(|_, timestamps| {
            timestamps.retain(|t| now.duration_since(*t) < self.window);
            !timestamps.is_empty()
        });
    }

    /// Number of tracked identifiers (for monitoring).
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

/// Spawn a background task that periodically sweeps the limiter table.
pub fn spawn_sweep_task(limiter: Arc<RateLimiter>, interval_secs: u64) {
    tokio::spawn(async move {
        let interval = Duration::from_secs(interval_secs);
        loop {
            tokio::time::sleep(interval).await;
            limiter.sweep();
            tracing::debug!(
                "Rate limiter sweep complete, {} identifiers remaining",
                limiter.entry_count()
            );
        }
    });
}
