//! Profile lookup handlers.

use actix_web::{HttpResponse, web};

use easel_core::domain::{Registrant, Role};
use easel_shared::dto::{ProfileQuery, ProfileResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Public view of `record`; the password hash never leaves the server.
pub(crate) fn profile_of<T: Registrant>(record: &T) -> ProfileResponse {
    let account = record.account();
    ProfileResponse {
        user_id: account.user_id.clone(),
        user_name: account.user_name.clone(),
        phone_num: account.phone_num.clone(),
        profile_image: account.profile_image.clone(),
        description: account.description.clone(),
        author_bio: record.author_bio().map(str::to_string),
        is_author: T::ROLE == Role::Author,
    }
}

/// GET /api/user/profile/current?userId=
pub async fn profile_by_query(
    state: web::Data<AppState>,
    query: web::Query<ProfileQuery>,
) -> AppResult<HttpResponse> {
    let user_id = query
        .user_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("userId is required".to_string()))?;

    let user = state.user_accounts().profile(user_id).await?;
    Ok(HttpResponse::Ok().json(profile_of(&user)))
}

/// GET /api/users/profile/current
///
/// Resolves the bearer token's owner in the collection its role names.
pub async fn current_profile(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let profile = match identity.role {
        Role::User => profile_of(&state.user_accounts().profile(&identity.user_id).await?),
        Role::Author => profile_of(&state.author_accounts().profile(&identity.user_id).await?),
    };
    Ok(HttpResponse::Ok().json(profile))
}
