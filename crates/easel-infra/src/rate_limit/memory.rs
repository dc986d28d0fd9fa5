//! Per-client GCRA rate limiting on top of `governor`.

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter as GovernorRateLimiter};

use easel_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

type ClientRateLimiter =
    GovernorRateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// In-memory rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    /// Read `RATE_LIMIT_MAX_REQUESTS` and `RATE_LIMIT_WINDOW_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_requests),
            window: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.window),
        }
    }
}

/// Checks between two sweeps of idle client entries.
const PRUNE_EVERY: u64 = 1024;

/// GCRA limiter with one budget per client key, held in process memory.
///
/// Keys whose budget has fully refilled are dropped every
/// [`PRUNE_EVERY`] checks, so the table only holds recently active clients.
pub struct InMemoryRateLimiter {
    limiter: ClientRateLimiter,
    clock: DefaultClock,
    config: RateLimitConfig,
    checks: AtomicU64,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let burst = NonZeroU32::new(config.max_requests).unwrap_or(NonZeroU32::MIN);
        let period = config.window / burst.get();
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            limiter: ClientRateLimiter::keyed(quota),
            clock: DefaultClock::default(),
            config,
            checks: AtomicU64::new(0),
        }
    }

    pub fn from_env() -> Self {
        Self::new(RateLimitConfig::from_env())
    }

    /// Forget clients that are back to a full budget.
    pub fn prune(&self) {
        let before = self.limiter.len();
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        tracing::debug!(before, after = self.limiter.len(), "Pruned rate limit table");
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, client: &str) -> Result<RateLimitResult, RateLimitError> {
        if (self.checks.fetch_add(1, Ordering::Relaxed) + 1) % PRUNE_EVERY == 0 {
            self.prune();
        }

        match self.limiter.check_key(&client.to_string()) {
            Ok(_) => Ok(RateLimitResult {
                allowed: true,
                // governor does not expose the remaining burst; report the ceiling.
                remaining: self.config.max_requests,
                reset_after: self.config.window,
            }),
            Err(not_until) => Ok(RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_after: not_until.wait_time_from(self.clock.now()),
            }),
        }
    }
}
