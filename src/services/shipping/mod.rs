//! Shipping service.
//!
//! Adapts a [`ConsignmentRepository`] to the `consignment.ShippingService`
//! gRPC contract.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::{info, warn};

use crate::proto::{
    shipping_service_server::ShippingService as ShippingServiceTrait, Consignment, GetRequest,
    Response as ConsignmentResponse,
};
use crate::repository::ConsignmentRepository;

/// Shipping service.
///
/// Stateless apart from the repository it delegates to.
pub struct ConsignmentService {
    repo: Arc<dyn ConsignmentRepository>,
}

impl ConsignmentService {
    /// Create a new shipping service backed by the given repository.
    pub fn new(repo: Arc<dyn ConsignmentRepository>) -> Self {
        Self { repo }
    }
}

#[tonic::async_trait]
impl ShippingServiceTrait for ConsignmentService {
    async fn create_consignment(
        &self,
        request: Request<Consignment>,
    ) -> Result<Response<ConsignmentResponse>, Status> {
        let consignment = request.into_inner();

        let created = self.repo.create(consignment).await.map_err(|e| {
            warn!(error = %e, "CreateConsignment rejected");
            Status::from(e)
        })?;

        info!(
            description = %created.description,
            containers = created.containers.len(),
            "CreateConsignment completed"
        );
        Ok(Response::new(ConsignmentResponse {
            created: true,
            consignment: Some(created),
            consignments: vec![],
        }))
    }

    async fn get_consignments(
        &self,
        _request: Request<GetRequest>,
    ) -> Result<Response<ConsignmentResponse>, Status> {
        let consignments = self.repo.get_all().await;

        info!(count = consignments.len(), "GetConsignments completed");
        Ok(Response::new(ConsignmentResponse {
            created: false,
            consignment: None,
            consignments,
        }))
    }
}

#[cfg(test)]
mod tests;
