//! Registration and duplicate-check handlers for users and authors.

use actix_web::{HttpResponse, web};

use easel_core::DomainError;
use easel_core::domain::{Author, NewAccount, Registrant, RegularUser};
use easel_core::services::RegistrationService;
use easel_shared::ApiResponse;
use easel_shared::dto::{
    CheckIdRequest, CheckNameRequest, DuplicateResponse, RegisterAuthorRequest,
    RegisterUserRequest,
};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /users/check-duplicate
pub async fn check_user_id(
    state: web::Data<AppState>,
    body: web::Json<CheckIdRequest>,
) -> AppResult<HttpResponse> {
    id_check(&state.user_accounts(), &body.user_id).await
}

/// POST /users/check-name-duplicate
pub async fn check_user_name(
    state: web::Data<AppState>,
    body: web::Json<CheckNameRequest>,
) -> AppResult<HttpResponse> {
    name_check(&state.user_accounts(), &body.user_name).await
}

/// POST /authors/check-duplicate
pub async fn check_author_id(
    state: web::Data<AppState>,
    body: web::Json<CheckIdRequest>,
) -> AppResult<HttpResponse> {
    id_check(&state.author_accounts(), &body.user_id).await
}

/// POST /authors/check-name-duplicate
pub async fn check_author_name(
    state: web::Data<AppState>,
    body: web::Json<CheckNameRequest>,
) -> AppResult<HttpResponse> {
    name_check(&state.author_accounts(), &body.user_name).await
}

async fn id_check<T: Registrant>(
    accounts: &RegistrationService<T>,
    user_id: &str,
) -> AppResult<HttpResponse> {
    let is_duplicate = accounts.is_id_taken(user_id).await?;
    Ok(HttpResponse::Ok().json(DuplicateResponse { is_duplicate }))
}

async fn name_check<T: Registrant>(
    accounts: &RegistrationService<T>,
    user_name: &str,
) -> AppResult<HttpResponse> {
    let is_duplicate = accounts.is_name_taken(user_name).await?;
    Ok(HttpResponse::Ok().json(DuplicateResponse { is_duplicate }))
}

/// POST /api/users/register
pub async fn register_user(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let form = NewAccount {
        user_name: req.user_name,
        user_id: req.user_id,
        password: req.user_pwd,
        phone_num: req.phone_num,
    };

    let result = state.user_accounts().register(form, RegularUser::new).await;
    registered(result)
}

/// POST /api/author/create
pub async fn create_author(
    state: web::Data<AppState>,
    body: web::Json<RegisterAuthorRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let form = NewAccount {
        user_name: req.author_name,
        user_id: req.author_id,
        password: req.author_pwd,
        phone_num: req.author_phone_num,
    };
    let bio = req.author_bio;

    let result = state
        .author_accounts()
        .register(form, move |account| Author::new(account, bio))
        .await;
    registered(result)
}

fn registered<T: Registrant>(result: Result<T, DomainError>) -> AppResult<HttpResponse> {
    match result {
        Ok(record) => {
            tracing::info!(
                collection = T::ROLE.collection(),
                user_id = %record.user_id(),
                "Account registered"
            );
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success()))
        }
        Err(DomainError::Conflict(reason)) => {
            tracing::warn!(collection = T::ROLE.collection(), %reason, "Registration rejected");
            Err(DomainError::Conflict(reason).into())
        }
        Err(e) => Err(e.into()),
    }
}
