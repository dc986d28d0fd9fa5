//! Multipart image uploads.

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures::TryStreamExt;

use easel_core::domain::{IncomingFile, Role};
use easel_core::ports::UploadError;
use easel_shared::dto::{ImageUploadResponse, UploadResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/upload
pub async fn upload_file(state: web::Data<AppState>, payload: Multipart) -> AppResult<HttpResponse> {
    let file = read_file_part(payload, "file", state.upload_max_bytes).await?;
    let stored = state.uploads.store(file).await?;

    Ok(HttpResponse::Ok().json(UploadResponse {
        filename: stored.filename,
    }))
}

/// POST /api/users/profile/upload
///
/// Stores the `image` part and makes it the caller's profile image. The
/// account must exist before anything is written.
pub async fn upload_profile_image(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let exists = match identity.role {
        Role::User => state.users.id_exists(&identity.user_id).await?,
        Role::Author => state.authors.id_exists(&identity.user_id).await?,
    };
    if !exists {
        return Err(AppError::NotFound(format!(
            "{} {} not found",
            identity.role.as_str(),
            identity.user_id
        )));
    }

    let file = read_file_part(payload, "image", state.upload_max_bytes).await?;
    let stored = state.uploads.store(file).await?;
    let image_url = format!("/uploads/{}", stored.filename);

    let updated = match identity.role {
        Role::User => state
            .users
            .set_profile_image(&identity.user_id, image_url.clone())
            .await
            .map(|_| ()),
        Role::Author => state
            .authors
            .set_profile_image(&identity.user_id, image_url.clone())
            .await
            .map(|_| ()),
    };

    // The account can vanish or be renamed between the check and the update.
    if let Err(e) = updated {
        if let Err(cleanup) = state.uploads.remove(&stored.filename).await {
            tracing::warn!(stored = %stored.filename, "Orphaned upload: {}", cleanup);
        }
        return Err(e.into());
    }

    tracing::info!(
        user_id = %identity.user_id,
        user_name = %identity.user_name,
        %image_url,
        "Profile image updated"
    );
    Ok(HttpResponse::Ok().json(ImageUploadResponse { image_url }))
}

/// Pull the part named `field_name` out of the body, draining the rest.
async fn read_file_part(
    mut payload: Multipart,
    field_name: &str,
    max_bytes: usize,
) -> AppResult<IncomingFile> {
    let mut found = None;

    while let Some(mut field) = payload.try_next().await? {
        if found.is_none() && field.name() == Some(field_name) {
            found = Some(collect_field(&mut field, max_bytes).await?);
        } else {
            while field.try_next().await?.is_some() {}
        }
    }

    found.ok_or_else(|| UploadError::Missing.into())
}

async fn collect_field(field: &mut Field, max_bytes: usize) -> AppResult<IncomingFile> {
    let original_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .unwrap_or_default()
        .to_string();
    let content_type = field.content_type().map(|m| m.essence_str().to_string());

    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(UploadError::TooLarge { limit: max_bytes }.into());
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(IncomingFile {
        original_name,
        content_type,
        bytes,
    })
}
