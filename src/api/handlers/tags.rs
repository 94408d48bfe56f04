//! # Tag Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    api::extractors::{ActiveLanguage, ValidatedJson},
    error::Result,
    models::{ApiResponse, EmptyResponse, ListQuery, TagRequest},
    services::AppState,
};

/// ساخت برچسب در زبان فعال
///
/// # Endpoint
/// `POST /api/tags`
///
/// # Request Body
/// ```json
/// { "name": "تاریخ معاصر", "keyword": "تاریخ-معاصر" }
/// ```
/// `keyword` اختیاریه و اگه نباشه از نام ساخته میشه.
pub async fn create_tag(
    State(state): State<AppState>,
    ActiveLanguage(language): ActiveLanguage,
    ValidatedJson(request): ValidatedJson<TagRequest>,
) -> Result<impl IntoResponse> {
    let tag = state.tag_service.create(request, &language).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(tag))))
}

/// `GET /api/tags?lang=&is_active=&q=`
pub async fn list_tags(
    State(state): State<AppState>,
    ActiveLanguage(language): ActiveLanguage,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let tags = state.tag_service.list(&language, &query).await?;
    Ok(Json(ApiResponse::success(tags)))
}

/// `GET /api/tags/:id`
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let tag = state.tag_service.get(id).await?;
    Ok(Json(ApiResponse::success(tag)))
}

/// `PUT /api/tags/:id`
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<TagRequest>,
) -> Result<impl IntoResponse> {
    let tag = state.tag_service.update(id, request).await?;
    Ok(Json(ApiResponse::success(tag)))
}

/// `DELETE /api/tags/:id`
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.tag_service.delete(id).await?;
    Ok(Json(EmptyResponse::ok(format!("Tag {} deleted", id))))
}
