//! Login handlers.

use actix_web::{HttpResponse, web};

use easel_core::domain::{Author, Registrant, RegularUser, Role};
use easel_core::services::RegistrationService;
use easel_shared::ApiResponse;
use easel_shared::dto::{LoginData, LoginRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/users/login
pub async fn login_user(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    login::<RegularUser>(&state, state.user_accounts(), body.into_inner()).await
}

/// POST /api/authors/login
pub async fn login_author(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    login::<Author>(&state, state.author_accounts(), body.into_inner()).await
}

async fn login<T: Registrant>(
    state: &AppState,
    accounts: RegistrationService<T>,
    req: LoginRequest,
) -> AppResult<HttpResponse> {
    let record = match accounts.authenticate(&req.user_id, &req.user_pwd).await {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(collection = T::ROLE.collection(), user_id = %req.user_id, "Login failed");
            return Err(e.into());
        }
    };

    tracing::info!(collection = T::ROLE.collection(), user_id = %record.user_id(), "Logged in");

    let data = issue_session(state, record.user_id(), record.user_name(), T::ROLE)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(data)))
}

/// Sign a fresh token for an account.
pub(crate) fn issue_session(
    state: &AppState,
    user_id: &str,
    user_name: &str,
    role: Role,
) -> AppResult<LoginData> {
    let token = state
        .tokens
        .generate_token(user_id, user_name, role)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(LoginData {
        user_id: user_id.to_string(),
        user_name: user_name.to_string(),
        token,
        is_author: role == Role::Author,
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}
