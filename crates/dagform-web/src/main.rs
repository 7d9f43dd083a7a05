//! dagform web server
//!
//! Run with: cargo run -p dagform-web --bin dagform

use anyhow::Context;
use dagform_common::Config;
use dagform_web::{router::build_router, state::AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&config))
        .init();

    info!("Starting dagform...");
    info!(
        sink = config.sink.kind.as_str(),
        idle_timeout_secs = config.sessions.idle_timeout_secs,
        max_sessions = config.sessions.max_sessions,
        "configuration loaded"
    );

    let state = AppState::from_config(&config).context("failed to initialise results sink")?;
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// `DAGFORM_LOG` (already folded into `config.log.level`) wins over `RUST_LOG`,
/// which wins over the config file.
fn log_filter(config: &Config) -> EnvFilter {
    if std::env::var_os("DAGFORM_LOG").is_none() {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
    }
    EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("info"))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for Ctrl-C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
