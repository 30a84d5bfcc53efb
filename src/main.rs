//! event-tracking-api server entry point.
//!
//! Loads configuration, connects the selected storage backend and serves
//! the REST API until SIGINT or SIGTERM.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use event_tracking_api::api;
use event_tracking_api::app_state::AppState;
use event_tracking_api::config::{ApiConfig, LogFormat, PersistenceBackend};
use event_tracking_api::persistence::{InMemoryPersistence, PostgresPersistence, Repository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()?;
    init_tracing(config.log_format);

    tracing::info!(
        addr = %config.listen_addr,
        environment = %config.environment,
        backend = ?config.persistence_backend,
        show_error_details = config.show_error_details,
        "starting event-tracking-api"
    );

    match config.persistence_backend {
        PersistenceBackend::Postgres => {
            let store = PostgresPersistence::connect(&config.database)
                .await
                .context("failed to connect to PostgreSQL")?;
            store
                .ensure_schema()
                .await
                .context("failed to create database schema")?;
            let result = serve(&config, store.clone()).await;
            store.close().await;
            result
        }
        PersistenceBackend::Memory => {
            tracing::warn!("using in-memory persistence; data is lost on restart");
            serve(&config, InMemoryPersistence::new()).await
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn serve<R: Repository>(config: &ApiConfig, repo: R) -> anyhow::Result<()> {
    let app = api::build_app(AppState::new(repo, config.show_error_details));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM. A handler that fails to install never
/// fires, leaving the other one in charge.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}
