//! Profile edits. Every route requires a bearer token for the account it
//! names and works on the collection the token's role points at.

use actix_web::{HttpResponse, web};

use easel_core::domain::Role;
use easel_shared::ApiResponse;
use easel_shared::dto::{
    ChangePasswordRequest, CheckIdRequest, CheckNameRequest, UpdatePasswordRequest,
    UpdatePhoneRequest,
};

use super::auth::issue_session;
use super::profile::profile_of;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Run `$edit` against the caller's collection and render the updated profile.
macro_rules! edit_account {
    ($state:expr, $identity:expr, |$accounts:ident| $edit:expr) => {
        match $identity.role {
            Role::User => {
                let $accounts = $state.user_accounts();
                profile_of(&$edit.await?)
            }
            Role::Author => {
                let $accounts = $state.author_accounts();
                profile_of(&$edit.await?)
            }
        }
    };
}

fn require_owner(identity: &Identity, user_id: &str) -> AppResult<()> {
    if identity.user_id == user_id {
        Ok(())
    } else {
        tracing::warn!(
            caller = %identity.user_id,
            target = %user_id,
            "Rejected edit of another account"
        );
        Err(AppError::Forbidden(
            "You can only edit your own profile".to_string(),
        ))
    }
}

/// PUT /api/users/profile/{userId}/nickname
pub async fn change_nickname(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<CheckNameRequest>,
) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();
    require_owner(&identity, &user_id)?;

    let profile = edit_account!(state, identity, |accounts| accounts
        .change_name(&user_id, &body.user_name));

    tracing::info!(%user_id, from = %identity.user_name, to = %profile.user_name, "Nickname changed");
    Ok(HttpResponse::Ok().json(ApiResponse::ok(profile)))
}

/// PUT /api/users/profile/{userId}/id
///
/// The old token names an id that no longer exists, so a fresh session
/// is returned.
pub async fn change_user_id(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<CheckIdRequest>,
) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();
    require_owner(&identity, &user_id)?;

    let profile = edit_account!(state, identity, |accounts| accounts
        .change_id(&user_id, &body.user_id));

    tracing::info!(from = %user_id, to = %profile.user_id, "User id changed");
    let session = issue_session(&state, &profile.user_id, &profile.user_name, identity.role)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(session)))
}

/// PUT /api/users/profile/{userId}/phone
pub async fn change_phone(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdatePhoneRequest>,
) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();
    require_owner(&identity, &user_id)?;
    let phone_num = body.into_inner().phone_num;

    let profile = edit_account!(state, identity, |accounts| accounts
        .change_phone(&user_id, phone_num));
    Ok(HttpResponse::Ok().json(ApiResponse::ok(profile)))
}

/// PUT /api/users/profile/{userId}/password
pub async fn change_password(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdatePasswordRequest>,
) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();
    set_password(&state, &identity, &user_id, &body.password).await
}

/// POST /api/user/change-password
pub async fn change_password_by_body(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ChangePasswordRequest>,
) -> AppResult<HttpResponse> {
    set_password(&state, &identity, &body.user_id, &body.new_password).await
}

async fn set_password(
    state: &AppState,
    identity: &Identity,
    user_id: &str,
    password: &str,
) -> AppResult<HttpResponse> {
    require_owner(identity, user_id)?;

    let _ = edit_account!(state, identity, |accounts| accounts
        .change_password(user_id, password));

    tracing::info!(%user_id, "Password changed");
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success()))
}

/// POST /api/user/profile/delete-image
pub async fn delete_profile_image(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CheckIdRequest>,
) -> AppResult<HttpResponse> {
    require_owner(&identity, &body.user_id)?;

    let profile = edit_account!(state, identity, |accounts| accounts
        .clear_profile_image(&body.user_id));
    Ok(HttpResponse::Ok().json(ApiResponse::ok(profile)))
}
