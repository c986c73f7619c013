//! Client traits for shipping operations.
//!
//! Implement this trait to create mock clients for testing or
//! alternative transport implementations.

use async_trait::async_trait;

use crate::error::Result;
use crate::proto::{Consignment, Response};

/// Trait for shipping service client operations.
#[async_trait]
pub trait ShippingClient: Send + Sync {
    /// Register a consignment.
    async fn create_consignment(&self, consignment: Consignment) -> Result<Response>;

    /// List every consignment registered so far, in registration order.
    async fn get_consignments(&self) -> Result<Vec<Consignment>>;
}
