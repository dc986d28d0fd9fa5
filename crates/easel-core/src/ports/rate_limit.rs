//! Per-client request budget.

use async_trait::async_trait;
use std::time::Duration;

/// Admission control keyed by client address.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Spend one request from `client`'s budget.
    async fn check(&self, client: &str) -> Result<RateLimitResult, RateLimitError>;
}

/// Outcome of spending one request.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Requests left in the current window, when known.
    pub remaining: u32,
    /// How long until the next request would be admitted.
    pub reset_after: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Rate limiter unavailable: {0}")]
    Backend(String),
}
