//! shippy-cli: consignment command-line client
//!
//! Reads a consignment from a JSON file, registers it with the shipping
//! service, then lists every consignment the service holds.
//!
//! ## Configuration
//! - FILE: consignment JSON file (default `consignment.json`)
//! - `--address` or SHIPPY_ADDRESS: service address, `host:port`, URL or
//!   UDS path (default `http://localhost:50051`)
//! - SHIPPY_LOG: tracing filter (default "info")

use std::path::{Path, PathBuf};
use std::time::Duration;

use backon::Retryable;
use clap::Parser;
use tracing::{error, info, warn};

use shippy_client::proto::Consignment;
use shippy_client::traits::ShippingClient;
use shippy_client::{ClientError, ConsignmentClient};
use shippy_consignment::config::{ADDRESS_ENV_VAR, DEFAULT_ADDRESS};
use shippy_consignment::utils::bootstrap::init_tracing;
use shippy_consignment::utils::retry::connection_backoff;

#[derive(Debug, Parser)]
#[command(name = "shippy-cli", about = "Register a consignment and list all consignments")]
struct CliArgs {
    /// Consignment JSON file.
    #[arg(default_value = "consignment.json")]
    file: PathBuf,

    /// Shipping service address.
    #[arg(short, long, env = ADDRESS_ENV_VAR, default_value = DEFAULT_ADDRESS)]
    address: String,
}

fn parse_file(path: &Path) -> Result<Consignment, Box<dyn std::error::Error>> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let consignment = serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;
    Ok(consignment)
}

/// Register one consignment, then log every consignment the service holds.
async fn register_and_list(
    client: &dyn ShippingClient,
    consignment: Consignment,
) -> Result<(), ClientError> {
    let response = client.create_consignment(consignment).await.map_err(|e| {
        error!(error = %e, "Could not create consignment");
        e
    })?;
    info!(created = response.created, "CreateConsignment");

    let consignments = client.get_consignments().await?;
    info!(count = consignments.len(), "GetConsignments");
    for c in &consignments {
        info!(
            description = %c.description,
            weight = c.weight,
            containers = c.containers.len(),
            vessel_id = %c.vessel_id,
            "Consignment"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = CliArgs::parse();

    let consignment = parse_file(&args.file).map_err(|e| {
        error!("{}", e);
        e
    })?;

    let address = args.address.clone();
    let client = (|| {
        let a = address.clone();
        async move { ConsignmentClient::connect(&a).await }
    })
    .retry(connection_backoff())
    .when(|e: &ClientError| e.is_connection_error())
    .notify(|err: &ClientError, dur: Duration| {
        warn!(address = %args.address, error = %err, delay = ?dur, "Connection failed, retrying");
    })
    .await?;

    register_and_list(&client, consignment).await?;

    Ok(())
}
