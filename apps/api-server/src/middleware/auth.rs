//! Bearer-token authentication extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use easel_core::domain::Role;
use easel_core::ports::{AuthError, TokenClaims};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated account identity.
///
/// Use this in handlers to require a valid bearer token:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.user_name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub user_name: String,
    pub role: Role,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.subject,
            user_name: claims.user_name,
            role: claims.role,
        }
    }
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AppError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AppError::Internal("Server configuration error".to_string())
    })?;

    let auth_str = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))?;

    Ok(state.tokens.validate_token(token.trim())?.into())
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
