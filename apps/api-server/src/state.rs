//! Application state - shared across all handlers.

use std::sync::Arc;

use easel_core::domain::{Author, RegularUser};
use easel_core::ports::{
    FileStore, PasswordService, PostRepository, RegistryRepository, TokenService,
};
use easel_core::services::RegistrationService;
use easel_infra::{
    Argon2PasswordService, DiskFileStore, InMemoryPostRepository, InMemoryRegistry,
    JwtTokenService,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn RegistryRepository<RegularUser>>,
    pub authors: Arc<dyn RegistryRepository<Author>>,
    pub posts: Arc<dyn PostRepository>,
    pub uploads: Arc<dyn FileStore>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub upload_max_bytes: usize,
}

impl AppState {
    /// Build the application state with in-memory storage.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        let uploads = DiskFileStore::open(config.upload_dir.clone()).await?;
        tracing::info!(dir = %uploads.root().display(), "Upload directory ready");

        let state = Self {
            users: Arc::new(InMemoryRegistry::<RegularUser>::new()),
            authors: Arc::new(InMemoryRegistry::<Author>::new()),
            posts: Arc::new(InMemoryPostRepository::seeded()),
            uploads: Arc::new(uploads),
            tokens: Arc::new(JwtTokenService::from_env()),
            passwords: Arc::new(Argon2PasswordService::new()),
            upload_max_bytes: config.upload_max_bytes,
        };

        tracing::info!("Application state initialized (in-memory storage)");
        Ok(state)
    }

    pub fn user_accounts(&self) -> RegistrationService<RegularUser> {
        RegistrationService::new(self.users.clone(), self.passwords.clone())
    }

    pub fn author_accounts(&self) -> RegistrationService<Author> {
        RegistrationService::new(self.authors.clone(), self.passwords.clone())
    }
}
