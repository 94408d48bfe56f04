//! # Custom Extractors
//!
//! Extractor‌های سفارشی برای استخراج داده از request
//!
//! ## مفاهیم Rust + Axum:
//! - **FromRequestParts**: extractor‌هایی که به body نیاز ندارن
//! - **FromRequest**: extractor‌هایی که body رو مصرف میکنن
//! - **Rejection**: نوع خطا برای extractors
//!
//! ## چطور کار میکنه؟
//! وقتی یه extractor به عنوان پارامتر handler تعریف میشه،
//! axum قبل از اجرای handler، extractor رو اجرا میکنه.

use axum::{
    async_trait,
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts},
    http::{header, request::Parts, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{error::AppError, i18n::LanguageCode, services::AppState};

// =====================================
// Active Language Extractor
// =====================================
/// زبان فعال درخواست
///
/// ترتیب: پارامتر `?lang=`، بعد header `Accept-Language`، بعد زبان پیش‌فرض.
/// کد صریح ولی پشتیبانی نشده در `?lang=` خطای `Language` میده؛
/// header فقط یک ترجیحه و اگه جور نشد پیش‌فرض استفاده میشه.
///
/// # استفاده در handler:
/// ```rust,ignore
/// async fn handler(ActiveLanguage(language): ActiveLanguage) -> ... {
///     state.page_service.list(&language, &query).await
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ActiveLanguage(pub LanguageCode);

impl ActiveLanguage {
    /// نام پارامتر query
    pub const QUERY_PARAM: &'static str = "lang";
}

#[async_trait]
impl FromRequestParts<AppState> for ActiveLanguage {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let explicit = parts.uri.query().and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == Self::QUERY_PARAM)
                .map(|(_, value)| value.into_owned())
        });

        if let Some(code) = explicit.filter(|code| !code.trim().is_empty()) {
            return Ok(ActiveLanguage(state.languages.parse(&code)?));
        }

        let accepted = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        let candidates = accepted
            .split(',')
            .filter_map(|item| item.split(';').next())
            .map(str::trim)
            .filter(|tag| !tag.is_empty() && *tag != "*");

        Ok(ActiveLanguage(state.languages.resolve(candidates)))
    }
}

// =====================================
// Request ID Extractor
// =====================================
/// Request ID که middleware روی header گذاشته (یا یکی جدید)
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Header name برای request ID
    pub const HEADER_NAME: &'static str = "x-request-id";
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestId {
    type Rejection = std::convert::Infallible; // هیچوقت fail نمیکنه

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = parts
            .headers
            .get(Self::HEADER_NAME)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
            .unwrap_or_else(|| nanoid::nanoid!(12));

        Ok(RequestId(request_id))
    }
}

// =====================================
// JSON with Validation
// =====================================
/// استخراج JSON با اعتبارسنجی خودکار
///
/// # استفاده:
/// ```rust,ignore
/// async fn handler(ValidatedJson(data): ValidatedJson<PageRequest>) -> ... {
///     // data حتما valid هست
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data): Json<T> = Json::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| AppError::BadRequest(format!("Invalid JSON: {}", e)))?;

        data.validate()?;

        Ok(ValidatedJson(data))
    }
}
