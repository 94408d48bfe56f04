//! # Page Handlers
//!
//! زبان صفحه‌ی جدید و فیلتر لیست از [`ActiveLanguage`] میاد.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    api::extractors::{ActiveLanguage, ValidatedJson},
    error::Result,
    models::{ApiResponse, EmptyResponse, ListQuery, PageRequest},
    services::AppState,
};

/// ساخت صفحه در زبان فعال
///
/// # Endpoint
/// `POST /api/pages?lang=fa`
///
/// # Request Body
/// ```json
/// {
///   "group": "G_8KQ2M1ZD",   // optional
///   "title": "تهران قدیم",
///   "content": "...",
///   "tags": [1, 2]           // optional
/// }
/// ```
pub async fn create_page(
    State(state): State<AppState>,
    ActiveLanguage(language): ActiveLanguage,
    ValidatedJson(request): ValidatedJson<PageRequest>,
) -> Result<impl IntoResponse> {
    let page = state.page_service.create(request, &language).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(page))))
}

/// `GET /api/pages?lang=&is_active=&q=&page=&per_page=`
pub async fn list_pages(
    State(state): State<AppState>,
    ActiveLanguage(language): ActiveLanguage,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let pages = state.page_service.list(&language, &query).await?;
    Ok(Json(ApiResponse::success(pages)))
}

/// `GET /api/pages/:pid`
pub async fn get_page(
    State(state): State<AppState>,
    Path(pid): Path<String>,
) -> Result<impl IntoResponse> {
    let page = state.page_service.get(&pid).await?;
    Ok(Json(ApiResponse::success(page)))
}

/// جایگزینی محتوای صفحه
///
/// # Endpoint
/// `PUT /api/pages/:pid`
pub async fn update_page(
    State(state): State<AppState>,
    Path(pid): Path<String>,
    ValidatedJson(request): ValidatedJson<PageRequest>,
) -> Result<impl IntoResponse> {
    let page = state.page_service.update(&pid, request).await?;
    Ok(Json(ApiResponse::success(page)))
}

/// `DELETE /api/pages/:pid`
pub async fn delete_page(
    State(state): State<AppState>,
    Path(pid): Path<String>,
) -> Result<impl IntoResponse> {
    state.page_service.delete(&pid).await?;
    Ok(Json(EmptyResponse::ok(format!("Page '{}' deleted", pid))))
}
