//! Approval workflow handlers and publisher callbacks.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use cadence_core::domain::Post;
use cadence_shared::ApiResponse;
use cadence_shared::dto::{
    MarkPublishedRequest, PublishFailedRequest, RejectRequest, ScheduleRequest,
};

use super::convert;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn ok(post: &Post) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(convert::post(post)))
}

/// POST /api/posts/{id}/submit
pub async fn submit(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.registry.submit_for_approval(path.into_inner()).await?;
    Ok(ok(&post))
}

/// POST /api/posts/{id}/approve
pub async fn approve(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.registry.approve(path.into_inner()).await?;
    Ok(ok(&post))
}

/// POST /api/posts/{id}/reject
pub async fn reject(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<RejectRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .registry
        .reject(path.into_inner(), body.into_inner().reason)
        .await?;
    Ok(ok(&post))
}

/// POST /api/posts/{id}/schedule
pub async fn schedule(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ScheduleRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .registry
        .schedule(path.into_inner(), body.into_inner().at)
        .await?;
    Ok(ok(&post))
}

/// POST /api/posts/{id}/publish
pub async fn publish(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.registry.publish(path.into_inner()).await?;
    Ok(ok(&post))
}

/// POST /api/posts/{id}/published - publisher callback
pub async fn mark_published(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<MarkPublishedRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .registry
        .mark_published(path.into_inner(), body.into_inner().published_at)
        .await?;
    Ok(ok(&post))
}

/// POST /api/posts/{id}/publish-failed - publisher callback
pub async fn mark_publish_failed(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<PublishFailedRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .registry
        .mark_publish_failed(path.into_inner(), body.into_inner().reason)
        .await?;
    Ok(ok(&post))
}
