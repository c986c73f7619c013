//! Default client implementation wrapping the tonic gRPC client.

use crate::error::{ClientError, Result};
use crate::proto::{
    shipping_service_client::ShippingServiceClient as TonicShippingClient, Consignment,
    GetRequest, Response,
};
use crate::traits;
use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint, Uri};
use tracing::debug;

/// Create a gRPC channel from an endpoint string.
///
/// Supports both TCP (host:port or http://host:port) and Unix Domain Sockets.
/// UDS paths are detected by leading '/' or './' and use a custom connector.
async fn create_channel(endpoint: &str) -> Result<Channel> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(ClientError::InvalidArgument(
            "endpoint must not be empty".to_string(),
        ));
    }

    let uds_path = if endpoint.starts_with('/') || endpoint.starts_with("./") {
        Some(endpoint.to_string())
    } else {
        endpoint.strip_prefix("unix://").map(str::to_string)
    };

    if let Some(path) = uds_path {
        debug!(path = %path, transport = "uds", "Connecting to shipping service");
        // The URI doesn't matter for UDS, but tonic requires a valid one
        let channel = Endpoint::try_from("http://[::]:50051")
            .map_err(|e| ClientError::Connection(e.to_string()))?
            .connect_with_connector(tower::service_fn(move |_: Uri| {
                let path = path.clone();
                async move {
                    tokio::net::UnixStream::connect(path)
                        .await
                        .map(hyper_util::rt::TokioIo::new)
                }
            }))
            .await?;
        Ok(channel)
    } else {
        let uri = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("http://{}", endpoint)
        };
        debug!(address = %uri, transport = "tcp", "Connecting to shipping service");
        let channel = Channel::from_shared(uri)
            .map_err(|e| ClientError::Connection(e.to_string()))?
            .connect()
            .await?;
        Ok(channel)
    }
}

/// Shipping service client using tonic gRPC.
#[derive(Clone)]
pub struct ConsignmentClient {
    inner: TonicShippingClient<Channel>,
}

impl ConsignmentClient {
    /// Connect to a shipping service at the given endpoint.
    ///
    /// Supports both TCP (host:port) and Unix Domain Sockets (file paths).
    pub async fn connect(endpoint: &str) -> Result<Self> {
        let channel = create_channel(endpoint).await?;
        Ok(Self::from_channel(channel))
    }

    /// Create a client from an existing channel.
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            inner: TonicShippingClient::new(channel),
        }
    }

    /// Register a consignment.
    pub async fn create_consignment(&self, consignment: Consignment) -> Result<Response> {
        let response = self.inner.clone().create_consignment(consignment).await?;
        Ok(response.into_inner())
    }

    /// List all registered consignments in registration order.
    pub async fn get_consignments(&self) -> Result<Vec<Consignment>> {
        let response = self.inner.clone().get_consignments(GetRequest {}).await?;
        Ok(response.into_inner().consignments)
    }
}

#[async_trait]
impl traits::ShippingClient for ConsignmentClient {
    async fn create_consignment(&self, consignment: Consignment) -> Result<Response> {
        self.create_consignment(consignment).await
    }

    async fn get_consignments(&self) -> Result<Vec<Consignment>> {
        self.get_consignments().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_malformed_endpoint() {
        let result = ConsignmentClient::connect("local host:50051").await;
        match result {
            Err(err) => assert!(err.is_connection_error()),
            Ok(_) => panic!("malformed endpoint should not connect"),
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_empty_endpoint() {
        for endpoint in ["", "   "] {
            match ConsignmentClient::connect(endpoint).await {
                Err(err) => {
                    assert!(err.is_invalid_argument());
                    assert!(!err.is_connection_error());
                }
                Ok(_) => panic!("empty endpoint should not connect"),
            }
        }
    }

    #[tokio::test]
    async fn test_connect_missing_uds_socket_fails() {
        let result = ConsignmentClient::connect("/nonexistent/shippy/consignment.sock").await;
        match result {
            Err(err) => assert!(err.is_connection_error()),
            Ok(_) => panic!("missing socket should not connect"),
        }
    }

    #[test]
    fn test_consignment_from_json() {
        let json = r#"{
            "description": "This is a test consignment",
            "weight": 550,
            "containers": [
                { "customer_id": "cust001", "user_id": "user001", "origin": "Manchester, United Kingdom" }
            ],
            "vessel_id": "vessel001"
        }"#;

        let consignment: Consignment = serde_json::from_str(json).unwrap();
        assert_eq!(consignment.description, "This is a test consignment");
        assert_eq!(consignment.weight, 550);
        assert!(consignment.id.is_empty());
        assert_eq!(consignment.containers.len(), 1);
        assert_eq!(consignment.containers[0].origin, "Manchester, United Kingdom");
        assert!(consignment.containers[0].id.is_empty());
    }
}
