//! Brute force protection for login attempts
//!
//! Consecutive failures per client identifier earn a progressive delay; at the
//! threshold the identifier is blocked for a fixed duration.

use crate::config::BruteForceConfig;
use crate::utils::SweepHandle;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Tracks failed logins per client identifier
pub struct BruteForceProtector {
    /// Map of client identifier -> attempt record
    attempts: DashMap<String, LoginAttempt>,
    /// Consecutive failures before blocking
    max_failures: u32,
    /// How long a blocked identifier stays blocked
    block_duration: Duration,
    /// Delay per failure; index 0 is the first failure, the last entry repeats
    delays: Vec<Duration>,
    /// Total blocks issued, for monitoring
    blocks_issued: AtomicU64,
}

/// Failure state for one identifier
#[derive(Debug, Clone)]
struct LoginAttempt {
    count: u32,
    last_failure: Instant,
    blocked_at: Option<Instant>,
}

impl LoginAttempt {
    fn block_active(&self, now: Instant, block_duration: Duration) -> bool {
        self.blocked_at
            .is_some_and(|at| now.duration_since(at) < block_duration)
    }

    fn block_lapsed(&self, now: Instant, block_duration: Duration) -> bool {
        self.blocked_at
            .is_some_and(|at| now.duration_since(at) >= block_duration)
    }
}

impl Default for BruteForceProtector {
    fn default() -> Self {
        Self::from_config(&BruteForceConfig::default())
    }
}

impl BruteForceProtector {
    pub fn new(max_failures: u32, block_duration: Duration, delays: Vec<Duration>) -> Self {
        Self {
            attempts: DashMap::new(),
            max_failures,
            block_duration,
            delays,
            blocks_issued: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &BruteForceConfig) -> Self {
        Self::new(
            config.max_failures,
            config.block_duration(),
            config.delays(),
        )
    }

    /// Whether `client_id` is currently blocked.
    ///
    /// A lapsed block clears the record, so the identifier starts clean.
    pub fn is_blocked(&self, client_id: &str) -> bool {
        let now = Instant::now();
        match self.attempts.get(client_id) {
            Some(attempt) if attempt.block_active(now, self.block_duration) => return true,
            Some(attempt) if attempt.blocked_at.is_none() => return false,
            Some(_) => {}
            None => return false,
        }

        self.attempts
            .remove_if(client_id, |_, attempt| {
                attempt.block_lapsed(now, self.block_duration)
            });
        debug!("Block for {} lapsed", client_id);
        false
    }

    /// Record a failed login and return how long the caller should stall.
    ///
    /// Reaching the threshold blocks the identifier and returns zero; the
    /// caller rejects outright instead of stalling.
    pub fn record_failure(&self, client_id: &str) -> Duration {
        let now = Instant::now();
        let mut entry = self
            .attempts
            .entry(client_id.to_string())
            .or_insert_with(|| LoginAttempt {
                count: 0,
                last_failure: now,
                blocked_at: None,
            });

        let attempt = entry.value_mut();
        if attempt.block_lapsed(now, self.block_duration) {
            attempt.count = 0;
            attempt.blocked_at = None;
        }

        attempt.count += 1;
        attempt.last_failure = now;

        if attempt.count >= self.max_failures {
            attempt.blocked_at = Some(now);
            self.blocks_issued.fetch_add(1, Ordering::Relaxed);
            warn!(
                "Client {} blocked for {:?} after {} consecutive failed login attempts",
                client_id, self.block_duration, attempt.count
            );
            return Duration::ZERO;
        }

        let index = (attempt.count as usize - 1).min(self.delays.len().saturating_sub(1));
        self.delays.get(index).copied().unwrap_or_default()
    }

    /// Clear every failure recorded for `client_id`
    pub fn record_success(&self, client_id: &str) {
        self.attempts.remove(client_id);
    }

    /// Consecutive failures currently recorded
    pub fn failure_count(&self, client_id: &str) -> u32 {
        self.attempts
            .get(client_id)
            .map(|attempt| attempt.count)
            .unwrap_or(0)
    }

    /// Time left on an active block
    pub fn remaining_block(&self, client_id: &str) -> Option<Duration> {
        let now = Instant::now();
        let attempt = self.attempts.get(client_id)?;
        let blocked_at = attempt.blocked_at?;
        self.block_duration
            .checked_sub(now.duration_since(blocked_at))
            .filter(|remaining| !remaining.is_zero())
    }

    pub fn blocks_issued(&self) -> u64 {
        self.blocks_issued.load(Ordering::Relaxed)
    }

    /// Drop lapsed blocks and identifiers idle for twice the block duration.
    ///
    /// Returns the number of records removed.
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let stale_after = self.block_duration.saturating_mul(2);
        let before = self.attempts.len();

        self.attempts.retain(|_, attempt| {
            if attempt.block_lapsed(now, self.block_duration) {
                return false;
            }
            attempt.block_active(now, self.block_duration)
                || now.duration_since(attempt.last_failure) <= stale_after
        });

        let removed = before.saturating_sub(self.attempts.len());
        if removed > 0 {
            debug!("Removed {} stale login attempt records", removed);
        }
        removed
    }

    /// Run `cleanup` every `interval` until the handle is stopped
    pub fn start_cleanup_task(self: Arc<Self>, interval: Duration) -> SweepHandle {
        SweepHandle::spawn("brute-force", interval, move || {
            let protector = Arc::clone(&self);
            async move {
                protector.cleanup();
            }
        })
    }
}

impl std::fmt::Debug for BruteForceProtector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BruteForceProtector")
            .field("tracked", &self.attempts.len())
            .field("max_failures", &self.max_failures)
            .field("block_duration", &self.block_duration)
            .finish()
    }
}
