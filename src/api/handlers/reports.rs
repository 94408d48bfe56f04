//! # Report Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{
    api::extractors::{ActiveLanguage, RequestId, ValidatedJson},
    error::Result,
    models::{ApiResponse, DecideReport, EmptyResponse, ListQuery, SubmitReportRequest},
    services::AppState,
};

/// ارسال گزارش برای یک صفحه (عمومی)
///
/// # Endpoint
/// `POST /api/pages/:pid/reports`
///
/// # Request Body
/// ```json
/// { "body": "تاریخ رویداد اشتباهه", "reporter": "reader@example.com" }
/// ```
///
/// # Response
/// `201 Created` با rid گزارش، مثل `R_K3Z9Q2LM_42`
pub async fn submit_report(
    State(state): State<AppState>,
    Path(pid): Path<String>,
    ActiveLanguage(language): ActiveLanguage,
    ValidatedJson(request): ValidatedJson<SubmitReportRequest>,
) -> Result<impl IntoResponse> {
    let report = state.report_service.submit(&pid, request, &language).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(report))))
}

/// `GET /api/reports?lang=&status=&q=&page=&per_page=`
pub async fn list_reports(
    State(state): State<AppState>,
    ActiveLanguage(language): ActiveLanguage,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let reports = state.report_service.list(&language, &query).await?;
    Ok(Json(ApiResponse::success(reports)))
}

/// `GET /api/reports/:rid`
pub async fn get_report(
    State(state): State<AppState>,
    Path(rid): Path<String>,
) -> Result<impl IntoResponse> {
    let report = state.report_service.get(&rid).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// `DELETE /api/reports/:rid`
pub async fn delete_report(
    State(state): State<AppState>,
    Path(rid): Path<String>,
) -> Result<impl IntoResponse> {
    state.report_service.delete(&rid).await?;
    Ok(Json(EmptyResponse::ok(format!("Report '{}' deleted", rid))))
}

/// تصمیم درباره گزارش
///
/// # Endpoint
/// `PATCH /api/reports/:rid`
///
/// # Request Body
/// ```json
/// { "status": "accepted", "description": "اصلاح شد" }
/// ```
///
/// گزارشی که قبلا تصمیم گرفته شده `409 Conflict` میده.
pub async fn decide_report(
    State(state): State<AppState>,
    Path(rid): Path<String>,
    RequestId(request_id): RequestId,
    ValidatedJson(decision): ValidatedJson<DecideReport>,
) -> Result<impl IntoResponse> {
    let outcome = state.report_service.decide(&rid, decision).await?;

    info!(
        request_id = %request_id,
        rid = %rid,
        notified = outcome.notified,
        "Decision request handled"
    );

    let message = if outcome.notified {
        "Reporter notified"
    } else {
        "Reporter not notified"
    };
    Ok(Json(ApiResponse::success(outcome).with_message(message)))
}
