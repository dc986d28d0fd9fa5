//! # Easel Core
//!
//! The domain layer of the Easel commission marketplace.
//! Accounts, posts, upload rules and the registration workflow live here,
//! with storage and crypto reached only through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError, UniqueField};
