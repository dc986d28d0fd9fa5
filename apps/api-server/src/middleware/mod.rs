//! Request extractors, error rendering and admission control.

pub mod auth;
pub mod error;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;
