//! Token bucket rate limiting per client identifier
//!
//! Each identifier gets `limit` tokens per window. The bucket is refilled in
//! one step once the window has elapsed.

use crate::config::LimiterConfig;
use crate::utils::SweepHandle;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Bucket state for one identifier
#[derive(Debug)]
struct Visitor {
    tokens: u32,
    window_start: Instant,
}

/// Per-identifier token bucket limiter.
///
/// The map is only touched to find or create a visitor; the bucket update
/// happens under that visitor's own lock.
pub struct RateLimiter {
    visitors: DashMap<String, Arc<Mutex<Visitor>>>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            visitors: DashMap::new(),
            limit,
            window,
        }
    }

    pub fn from_config(config: &LimiterConfig) -> Self {
        Self::new(config.limit, config.window())
    }

    /// Tokens per window
    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn visitor(&self, client_id: &str) -> Arc<Mutex<Visitor>> {
        if let Some(visitor) = self.visitors.get(client_id) {
            return Arc::clone(visitor.value());
        }

        let limit = self.limit;
        Arc::clone(
            self.visitors
                .entry(client_id.to_string())
                .or_insert_with(|| {
                    Arc::new(Mutex::new(Visitor {
                        tokens: limit,
                        window_start: Instant::now(),
                    }))
                })
                .value(),
        )
    }

    /// Consume one token for `client_id` if any are left
    pub fn allow(&self, client_id: &str) -> bool {
        let visitor = self.visitor(client_id);
        let mut visitor = visitor.lock();

        let now = Instant::now();
        if now.duration_since(visitor.window_start) > self.window {
            visitor.tokens = self.limit;
            visitor.window_start = now;
        }

        if visitor.tokens > 0 {
            visitor.tokens -= 1;
            true
        } else {
            debug!("Rate limit exhausted for {}", client_id);
            false
        }
    }

    /// Time until the current window for `client_id` resets
    pub fn retry_after(&self, client_id: &str) -> Duration {
        let Some(visitor) = self.visitors.get(client_id).map(|v| Arc::clone(v.value())) else {
            return Duration::ZERO;
        };
        let elapsed = visitor.lock().window_start.elapsed();
        self.window.saturating_sub(elapsed)
    }

    /// Number of identifiers currently tracked
    pub fn tracked(&self) -> usize {
        self.visitors.len()
    }

    /// Drop identifiers whose window started more than two windows ago.
    ///
    /// Returns the number of identifiers removed.
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let stale_after = self.window.saturating_mul(2);
        let before = self.visitors.len();

        self.visitors
            .retain(|_, visitor| now.duration_since(visitor.lock().window_start) <= stale_after);

        let removed = before.saturating_sub(self.visitors.len());
        if removed > 0 {
            debug!("Removed {} idle rate limit visitors", removed);
        }
        removed
    }

    /// Run `cleanup` every `interval` until the handle is stopped
    pub fn start_cleanup_task(self: Arc<Self>, interval: Duration) -> SweepHandle {
        SweepHandle::spawn("rate-limiter", interval, move || {
            let limiter = Arc::clone(&self);
            async move {
                limiter.cleanup();
            }
        })
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("limit", &self.limit)
            .field("window", &self.window)
            .field("tracked", &self.visitors.len())
            .finish()
    }
}
