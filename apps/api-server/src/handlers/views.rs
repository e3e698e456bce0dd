//! Derived views: approval queue and calendar.

use actix_web::{HttpResponse, web};

use cadence_core::calendar::YearMonth;
use cadence_shared::ApiResponse;

use super::convert;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/approvals
pub async fn approval_queue(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let queue = state.registry.approval_queue().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(convert::approval_queue(&queue))))
}

/// GET /api/calendar/{year}/{month}
pub async fn calendar(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32)>,
) -> AppResult<HttpResponse> {
    let (year, month) = path.into_inner();
    let grid = state.registry.calendar(YearMonth::new(year, month)?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(convert::calendar(&grid))))
}
