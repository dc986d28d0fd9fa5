//! Authentication ports.

use crate::domain::Role;

/// Claims carried by an access token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    /// The account's `userId`.
    pub subject: String,
    pub user_name: String,
    pub role: Role,
    pub exp: i64,
}

/// Issues and checks signed access tokens.
pub trait TokenService: Send + Sync {
    /// Generate an access token for an account.
    fn generate_token(&self, user_id: &str, user_name: &str, role: Role)
    -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
