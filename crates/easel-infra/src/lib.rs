//! # Easel Infrastructure
//!
//! Concrete implementations of the ports defined in `easel-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory storage and disk uploads only
//! - `auth` - JWT + Argon2 authentication
//! - `rate-limit` - Rate limiting via governor

pub mod posts;
pub mod registry;
pub mod uploads;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use posts::InMemoryPostRepository;
pub use registry::InMemoryRegistry;
pub use uploads::DiskFileStore;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
