//! Process startup: bind the listener and serve until a shutdown signal.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::api::{self, AppState};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::gateway::PersistenceGateway;

/// Resolve the configured host and port to a socket address.
///
/// # Errors
///
/// Returns [`Error::ListenAddress`] if the host does not resolve.
pub async fn resolve_listen_address(config: &Config) -> Result<SocketAddr> {
    let address = config.listen_address();
    tokio::net::lookup_host(address.as_str())
        .await
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or(Error::ListenAddress(address))
}

/// Connect the store, build the router and serve HTTP until Ctrl-C or
/// SIGTERM.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn run(config: Config) -> Result<()> {
    let gateway = PersistenceGateway::connect(&config.database);
    let app = api::router(AppState::new(gateway, config.limits), &config.cors);

    let addr = resolve_listen_address(&config).await?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| Error::Bind { addr, source })?;

    info!(address = %addr, "oceandash listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("oceandash stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Unable to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Unable to install SIGTERM handler");
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
