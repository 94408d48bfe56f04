//! # لایه API
//!
//! ## مفاهیم Rust + Axum:
//! - **Router**: تعریف مسیرها
//! - **Extractors**: استخراج داده از request
//! - **State**: اشتراک `AppState` بین handlers
//! - **Middleware**: پردازش قبل/بعد از handler (Tower)
//!
//! ## ساختار URL‌ها:
//! - `GET /health` - Health check
//! - `GET /api/i18n/switch` - مسیر معادل در زبان دیگه
//! - `POST|GET /api/groups`، `GET|DELETE /api/groups/:gid`
//! - `POST|GET /api/pages`، `GET|PUT|DELETE /api/pages/:pid`
//! - `POST /api/pages/:pid/reports` - ثبت گزارش (عمومی)
//! - `GET /api/reports`، `GET|PATCH|DELETE /api/reports/:rid`
//! - `POST|GET /api/tags`، `GET|PUT|DELETE /api/tags/:id`

mod extractors;
mod handlers;
mod middleware;

pub use extractors::*;
pub use handlers::*;
pub use middleware::*;

use std::time::Duration;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::services::AppState;

// =====================================
// Router Builder
// =====================================
/// ساخت Router اصلی برنامه
///
/// ترتیب middleware‌ها: request id اول اجرا میشه تا بقیه لایه‌ها بهش دسترسی داشته باشن.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(request_timing))
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

/// Route‌های API
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/i18n/switch", get(handlers::i18n::switch_language))
        .nest("/groups", group_routes())
        .nest("/pages", page_routes())
        .nest("/reports", report_routes())
        .nest("/tags", tag_routes())
}

fn group_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::groups::create_group).get(handlers::groups::list_groups),
        )
        .route(
            "/:gid",
            get(handlers::groups::get_group).delete(handlers::groups::delete_group),
        )
}

fn page_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::pages::create_page).get(handlers::pages::list_pages),
        )
        .route(
            "/:pid",
            get(handlers::pages::get_page)
                .put(handlers::pages::update_page)
                .delete(handlers::pages::delete_page),
        )
        .route("/:pid/reports", post(handlers::reports::submit_report))
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::reports::list_reports))
        .route(
            "/:rid",
            get(handlers::reports::get_report)
                .patch(handlers::reports::decide_report)
                .delete(handlers::reports::delete_report),
        )
}

fn tag_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::tags::create_tag).get(handlers::tags::list_tags),
        )
        .route(
            "/:id",
            get(handlers::tags::get_tag)
                .put(handlers::tags::update_tag)
                .delete(handlers::tags::delete_tag),
        )
}
