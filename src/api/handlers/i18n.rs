//! # Language Switch Handler

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::Result,
    i18n::switch_language_path,
    models::{ApiResponse, LanguageSwitchQuery, LanguageSwitchResponse},
    services::AppState,
};

/// مسیر معادل صفحه فعلی در زبان دیگه
///
/// # Endpoint
/// `GET /api/i18n/switch?path=/fa/pages/P_X&language=en`
///
/// # Response
/// ```json
/// { "success": true, "data": { "language": "en", "path": "/en/pages/P_X" } }
/// ```
pub async fn switch_language(
    State(state): State<AppState>,
    Query(query): Query<LanguageSwitchQuery>,
) -> Result<Json<ApiResponse<LanguageSwitchResponse>>> {
    let path = switch_language_path(&query.path, &query.language, &state.languages)?;

    Ok(Json(ApiResponse::success(LanguageSwitchResponse {
        language: query.language,
        path,
    })))
}
