//! # Group Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    error::Result,
    models::{ApiResponse, EmptyResponse, ListQuery},
    services::AppState,
};

/// ساخت گروه جدید
///
/// # Endpoint
/// `POST /api/groups` (بدون body)
pub async fn create_group(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let group = state.group_service.create().await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(group))))
}

/// `GET /api/groups?q=&page=&per_page=`
pub async fn list_groups(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let groups = state.group_service.list(&query).await?;
    Ok(Json(ApiResponse::success(groups)))
}

/// `GET /api/groups/:gid`
pub async fn get_group(
    State(state): State<AppState>,
    Path(gid): Path<String>,
) -> Result<impl IntoResponse> {
    let group = state.group_service.get(&gid).await?;
    Ok(Json(ApiResponse::success(group)))
}

/// حذف گروه؛ صفحه‌ها و گزارش‌هاش هم حذف میشن
///
/// # Endpoint
/// `DELETE /api/groups/:gid`
pub async fn delete_group(
    State(state): State<AppState>,
    Path(gid): Path<String>,
) -> Result<impl IntoResponse> {
    state.group_service.delete(&gid).await?;
    Ok(Json(EmptyResponse::ok(format!("Group '{}' deleted", gid))))
}
