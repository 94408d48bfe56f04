//! # Laum - نقطه ورود برنامه
//!
//! تنظیمات لود میشن، دیتابیس وصل و migrate میشه و سرور HTTP تا
//! دریافت Ctrl+C (یا SIGTERM) اجرا میشه.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use laum::{
    api::create_router,
    config::Config,
    database::Database,
    notify::notifier_from_config,
    services::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // اگه فایل .env نباشه اشکالی نداره
    dotenvy::dotenv().ok();

    let config = Config::load().context("failed to load configuration")?;
    init_tracing(config.environment.is_production());

    info!(environment = ?config.environment, "Starting Laum service");

    let database = Database::connect(&config.database_url)
        .await
        .context("failed to connect to the database")?;
    database.migrate().await.context("failed to run migrations")?;
    info!("Database connected and migrated");

    let notifier = notifier_from_config(&config.mail).context("invalid mail settings")?;

    let addr = config.server_addr();
    let state = AppState::new(database, config, notifier);
    let app = create_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

/// راه‌اندازی tracing
///
/// فیلتر از `RUST_LOG` خونده میشه. در production خروجی JSON ـه.
fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("laum=debug,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
