//! folio-server - HTTP server binary.

use std::net::SocketAddr;

use folio_core::{EventDispatch, FolioConfig};
use folio_server::{create_server, create_state};
use tokio::signal;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Configuration file named by `FOLIO_CONFIG`, else environment variables.
fn load_config() -> Result<FolioConfig, Box<dyn std::error::Error>> {
    match std::env::var("FOLIO_CONFIG") {
        Ok(path) => {
            info!(%path, "Loading configuration file");
            Ok(FolioConfig::from_file(path)?)
        }
        Err(_) => Ok(FolioConfig::from_env()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::from_default_env()
        .add_directive(Level::INFO.into())
        .add_directive("folio_server=debug".parse()?);
    let json_logs = std::env::var("FOLIO_LOG_FORMAT").is_ok_and(|f| f == "json");
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    let config = load_config()?;
    let addr: SocketAddr = config.server.addr().parse()?;

    let state = create_state(config)?;
    let worker = match state.config().events.dispatch {
        EventDispatch::Queued => Some(state.spawn_worker()),
        EventDispatch::Inline => None,
    };
    let app = create_server(state);

    info!("Starting folio-server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received");
        })
        .await?;

    if let Some(worker) = worker {
        worker.abort();
    }
    info!("Server stopped cleanly");
    Ok(())
}
