//! Bootstrap utilities for shippy binaries.
//!
//! Shared initialization code: tracing, command-line arguments and the
//! shutdown signal.

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LOG_ENV_VAR;

/// Command-line arguments accepted by the server binary.
#[derive(Debug, Parser)]
#[command(name = "shippy-consignment", about = "Consignment registration gRPC service")]
pub struct ServerArgs {
    /// Path to a YAML configuration file.
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Initialize tracing with the SHIPPY_LOG environment variable.
///
/// Defaults to "info" level if SHIPPY_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Config file path from `--config`, if given.
pub fn parse_config_path() -> Option<String> {
    ServerArgs::parse().config
}

/// Completes on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_args_config_flag() {
        let args = ServerArgs::parse_from(["shippy-consignment", "--config", "/etc/shippy.yaml"]);
        assert_eq!(args.config.as_deref(), Some("/etc/shippy.yaml"));
    }

    #[test]
    fn test_server_args_default() {
        let args = ServerArgs::parse_from(["shippy-consignment"]);
        assert!(args.config.is_none());
    }
}
