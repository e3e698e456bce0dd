//! Post registry handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use cadence_shared::ApiResponse;
use cadence_shared::dto::{CommentRequest, CreatePostRequest, PostListParams, UpdatePostRequest};

use super::convert;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts?status=&network=&q=&date=
pub async fn list(
    state: web::Data<AppState>,
    params: web::Query<PostListParams>,
) -> AppResult<HttpResponse> {
    let query = convert::query(params.into_inner())?;
    let posts = state.registry.query(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(convert::posts(&posts))))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let draft = convert::new_post(body.into_inner())?;
    let post = state.registry.create(draft).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(convert::post(&post))))
}

/// GET /api/posts/counts
pub async fn counts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let counts = state.registry.status_counts().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(convert::counts(counts))))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.registry.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(convert::post(&post))))
}

/// PATCH /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let patch = convert::patch(body.into_inner())?;
    let post = state.registry.update(path.into_inner(), patch).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(convert::post(&post))))
}

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .registry
        .add_comment(path.into_inner(), body.into_inner().text)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(convert::post(&post))))
}
