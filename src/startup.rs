//! Process startup: connect, seed, then serve.
//!
//! Each step returns a `Result` and the next one runs only if it succeeded.
//! The listener is bound after seeding, so a failed connection or seed never
//! opens the port.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::{AppConfig, ConfigError};
use crate::db::{self, SharedStore, StoreError};
use crate::routes;
use crate::services::seed::{self, SeedError, SeedReport};
use crate::AppState;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("error connecting to document store: {0}")]
    Connect(#[source] StoreError),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Open the document store named in the configuration. One attempt.
pub async fn connect(config: &AppConfig) -> Result<SharedStore, StartupError> {
    let store = db::connect(&config.database_url, config.database_max_connections)
        .await
        .map_err(StartupError::Connect)?;
    tracing::info!(backend = store.backend(), "Connected to document store");
    Ok(store)
}

/// Connect and seed; the returned state is ready to serve.
pub async fn prepare(config: AppConfig) -> Result<(AppState, SeedReport), StartupError> {
    let store = connect(&config).await?;
    let report = seed::seed_all(store.as_ref()).await?;
    Ok((AppState { store, config }, report))
}

/// Bind the configured `HOST:PORT`.
pub async fn bind(config: &AppConfig) -> Result<TcpListener, StartupError> {
    let addr = format!("{}:{}", config.host, config.port);
    TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })
}

/// Serve until ctrl-c.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), StartupError> {
    let app = routes::create_router(state);
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Server is running on port {}", addr.port());
    }

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(StartupError::Serve)
}

/// The whole startup pipeline. A failure is logged before it is returned.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    let result = async {
        let (state, _report) = prepare(config).await?;
        let listener = bind(&state.config).await?;
        serve(listener, state).await
    }
    .await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Startup failed; server not listening");
    }
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
