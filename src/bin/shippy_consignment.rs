//! shippy-consignment: consignment registration service
//!
//! Serves `consignment.ShippingService` over gRPC, backed by an in-memory
//! repository. Records are lost when the process exits.
//!
//! ## Configuration
//! - `--config <path>` or SHIPPY_CONFIG: YAML configuration file
//! - SHIPPY__TRANSPORT__TYPE: `tcp` (default) or `uds`
//! - SHIPPY__TRANSPORT__TCP__HOST / SHIPPY__TRANSPORT__TCP__PORT: bind address
//!   (default 0.0.0.0:50051)
//! - SHIPPY__TRANSPORT__UDS__BASE_PATH: socket directory for UDS mode
//! - SHIPPY_LOG: tracing filter (default "info")
//!
//! Also registers gRPC health checking and server reflection.

use std::sync::Arc;

use tracing::{error, info};

use shippy_consignment::config::Config;
use shippy_consignment::repository::{ConsignmentRepository, InMemoryRepository};
use shippy_consignment::server::serve;
use shippy_consignment::utils::bootstrap::{init_tracing, parse_config_path, shutdown_signal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = parse_config_path();
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Starting shippy-consignment");

    let repo: Arc<dyn ConsignmentRepository> = Arc::new(InMemoryRepository::new());

    serve(&config, repo, shutdown_signal()).await.map_err(|e| {
        error!("Failed to serve: {}", e);
        e
    })?;

    info!("shippy-consignment stopped");
    Ok(())
}
