//! Post board handlers.

use actix_web::{HttpResponse, web};

use easel_core::domain::NewPost;
use easel_shared::dto::{CreatePostRequest, PostSearchQuery};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts
///
/// All posts in id order, narrowed by `?query=` when present.
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PostSearchQuery>,
) -> AppResult<HttpResponse> {
    let posts = match query.query.as_deref() {
        Some(q) => state.posts.search(q).await?,
        None => state.posts.list().await?,
    };
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/search
pub async fn search_posts(
    state: web::Data<AppState>,
    query: web::Query<PostSearchQuery>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.search(query.query.as_deref().unwrap_or("")).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn get_post(state: web::Data<AppState>, path: web::Path<u64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {} not found", id)))?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let draft = NewPost {
        title: req.title,
        content: req.content,
    };
    draft.validate()?;

    let post = state.posts.create(draft).await?;
    tracing::info!(post_id = post.id, "Post created");

    Ok(HttpResponse::Created().json(post))
}
