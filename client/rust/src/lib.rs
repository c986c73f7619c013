//! Rust client for the shippy consignment service.
//!
//! This crate owns the `consignment` protobuf contract (messages, server and
//! client stubs, encoded descriptor set) and provides a typed client.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use shippy_client::{proto::Consignment, ConsignmentClient};
//!
//! async fn example() -> shippy_client::Result<()> {
//!     let client = ConsignmentClient::connect("http://localhost:50051").await?;
//!
//!     let response = client
//!         .create_consignment(Consignment {
//!             description: "widgets".to_string(),
//!             ..Default::default()
//!         })
//!         .await?;
//!     assert!(response.created);
//!
//!     let all = client.get_consignments().await?;
//!     println!("{} consignments", all.len());
//!     Ok(())
//! }
//! ```
//!
//! # Mocking for Tests
//!
//! Implement the [`traits::ShippingClient`] trait to create mock clients.

pub mod client;
pub mod error;
pub mod proto;
pub mod traits;

pub use client::ConsignmentClient;
pub use error::{ClientError, Result};
