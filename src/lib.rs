//! Shippy consignment service.
//!
//! A gRPC service for registering and listing shipment consignments,
//! backed by a swappable repository (in-memory by default).

pub mod config;
pub mod repository;
pub mod server;
pub mod services;
pub mod transport;
pub mod utils;

/// Protobuf types and gRPC stubs, shared with `shippy-client`.
pub use shippy_client::proto;
