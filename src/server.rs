//! gRPC server assembly.
//!
//! Wires a repository into the shipping service and serves it alongside the
//! health and reflection services on the configured transport.

use std::future::Future;
use std::sync::Arc;

use tonic::transport::Server;
use tonic_health::server::health_reporter;
use tracing::info;

use crate::config::{Config, SERVICE_NAME};
use crate::proto::{shipping_service_server::ShippingServiceServer, FILE_DESCRIPTOR_SET};
use crate::repository::ConsignmentRepository;
use crate::services::ConsignmentService;
use crate::transport::{grpc_trace_layer, serve_bound, BoundListener};

/// Serve the shipping service on the configured transport until `signal`
/// completes.
pub async fn serve<F>(
    config: &Config,
    repo: Arc<dyn ConsignmentRepository>,
    signal: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()> + Send,
{
    let listener = BoundListener::bind(&config.transport, SERVICE_NAME).await?;
    serve_with_listener(config, repo, listener, signal).await
}

/// Serve the shipping service on an already bound listener.
///
/// `config.transport` is not consulted; the listener decides where requests
/// arrive.
pub async fn serve_with_listener<F>(
    config: &Config,
    repo: Arc<dyn ConsignmentRepository>,
    listener: BoundListener,
    signal: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()> + Send,
{
    let shipping = ConsignmentService::new(repo);

    let (mut health_reporter, health_service) = health_reporter();
    health_reporter
        .set_service_status("", tonic_health::ServingStatus::Serving)
        .await;
    health_reporter
        .set_serving::<ShippingServiceServer<ConsignmentService>>()
        .await;

    let reflection_service = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .register_encoded_file_descriptor_set(tonic_health::pb::FILE_DESCRIPTOR_SET)
        .build_v1()?;

    let msg_size = config.server.max_message_size;
    info!(max_message_size = msg_size, "Shipping service ready");

    let router = Server::builder()
        .layer(grpc_trace_layer())
        .add_service(health_service)
        .add_service(reflection_service)
        .add_service(
            ShippingServiceServer::new(shipping)
                .max_decoding_message_size(msg_size)
                .max_encoding_message_size(msg_size),
        );

    serve_bound(router, listener, SERVICE_NAME, signal).await
}
