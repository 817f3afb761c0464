//! Process startup shared by the binaries

use anyhow::Result;
use nowplaying_core::config::CoreConfig;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Load a `.env` file from the working directory, if there is one
pub fn init_env() {
    dotenvy::dotenv().ok();
}

/// Log human-readable lines to stdout and JSON lines to a per-run file
///
/// Files go under `LOG_DIR` (`logs/app` when unset). `RUST_LOG` overrides
/// the default filter. Dropping the returned guard stops the file writer.
pub fn init_tracing(service_name: &str) -> tracing_appender::non_blocking::WorkerGuard {
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs/app".to_string());

    let now = chrono::Local::now().format("%y-%m-%d-%H-%M-%S").to_string();
    let filename = format!("nowplaying-{service_name}.log.{now}.jsonl");

    let file_appender = tracing_appender::rolling::never(&log_dir, filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let default_filter = format!("info,{service_name}=debug,sqlx=warn");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    guard
}

/// Connect the Postgres pool sized from `DATABASE_MAX_CONNECTIONS`
pub async fn init_db(config: &CoreConfig) -> Result<sqlx::PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .idle_timeout(std::time::Duration::from_secs(300))
        .max_lifetime(std::time::Duration::from_secs(1800))
        .connect(&config.database_url)
        .await?;

    tracing::info!(
        "Connected to Postgres with up to {} connections",
        config.db_max_connections
    );

    Ok(pool)
}

/// Resolve once Ctrl+C or SIGTERM is received
pub async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
