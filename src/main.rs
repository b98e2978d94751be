use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{info, warn};

use doctor_directory::api::create_router_with_timeout;
use doctor_directory::app::AppState;
use doctor_directory::config::AppConfig;
use doctor_directory::infra::observability::{init_metrics_handle, init_tracing};
use doctor_directory::infra::{OpenSearchClient, PostgresClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    init_tracing(config.log_format);

    let metrics = init_metrics_handle();
    if metrics.is_none() {
        warn!("Prometheus recorder unavailable; /metrics will return 404");
    }

    let connect_options = config.database.connect_options()?;
    let postgres = Arc::new(
        PostgresClient::new(connect_options, config.database.pool_config())
            .await
            .context("failed to connect to PostgreSQL")?,
    );
    if config.run_migrations {
        postgres.run_migrations().await?;
    }

    let search = Arc::new(
        OpenSearchClient::new(&config.search.endpoint, config.search.client_config())
            .context("failed to build search client")?,
    );
    info!(
        endpoint = %config.search.endpoint,
        index = search.index_name(),
        "Search client ready"
    );

    let mut app_state = AppState::new(postgres.clone(), search);
    if let Some(handle) = metrics {
        app_state = app_state.with_metrics(handle);
    }

    let router = create_router_with_timeout(Arc::new(app_state), config.server.request_timeout);

    let addr = config.server.bind_address()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "Server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    postgres.close().await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
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
