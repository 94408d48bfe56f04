//! # Middleware
//!
//! Middleware‌های سفارشی برای پردازش request/response
//!
//! ## مفاهیم:
//! - **Middleware**: کد که قبل/بعد از handler اجرا میشه
//! - **Next**: ادامه زنجیره middleware
//! - `axum::middleware::from_fn` تابع async رو به Layer تبدیل میکنه

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::IntoResponse,
};
use tracing::{info, warn};

use super::RequestId;

// =====================================
// Request Timing Middleware
// =====================================
/// اندازه‌گیری و لاگ زمان پردازش request
///
/// # استفاده:
/// ```rust,ignore
/// let app = Router::new()
///     .layer(axum::middleware::from_fn(request_timing));
/// ```
pub async fn request_timing(request: Request<Body>, next: Next) -> impl IntoResponse {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get(RequestId::HEADER_NAME)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed();

    if response.status().is_server_error() {
        warn!(
            method = %method,
            uri = %uri,
            request_id = %request_id,
            status = %response.status(),
            duration_ms = %duration.as_millis(),
            "Request failed"
        );
    } else {
        info!(
            method = %method,
            uri = %uri,
            request_id = %request_id,
            status = %response.status(),
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}

// =====================================
// Request ID Middleware
// =====================================
/// اضافه کردن Request ID به request و response
///
/// اگه کلاینت `X-Request-Id` معتبر فرستاده باشه همون استفاده میشه.
pub async fn request_id(mut request: Request<Body>, next: Next) -> impl IntoResponse {
    let header_value = request
        .headers()
        .get(RequestId::HEADER_NAME)
        .filter(|v| v.to_str().is_ok_and(|s| !s.is_empty()))
        .cloned()
        .or_else(|| HeaderValue::from_str(&nanoid::nanoid!(12)).ok());

    let Some(header_value) = header_value else {
        return next.run(request).await;
    };

    request
        .headers_mut()
        .insert(RequestId::HEADER_NAME, header_value.clone());

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(RequestId::HEADER_NAME, header_value);

    response
}
