//! In-memory consignment repository.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{ConsignmentRepository, Result};
use crate::proto::Consignment;

/// Repository that keeps consignments in a `Vec` behind a reader/writer lock.
///
/// `create` holds the write lock for a single push; `get_all` holds the read
/// lock while cloning, so readers run in parallel and never observe a
/// half-applied append.
#[derive(Default)]
pub struct InMemoryRepository {
    consignments: RwLock<Vec<Consignment>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of records, kept in the given order.
    pub fn with_consignments(consignments: Vec<Consignment>) -> Self {
        Self {
            consignments: RwLock::new(consignments),
        }
    }

    pub async fn len(&self) -> usize {
        self.consignments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.consignments.read().await.is_empty()
    }
}

#[async_trait]
impl ConsignmentRepository for InMemoryRepository {
    async fn create(&self, consignment: Consignment) -> Result<Consignment> {
        let mut store = self.consignments.write().await;
        store.push(consignment.clone());
        debug!(total = store.len(), "Consignment appended");
        Ok(consignment)
    }

    async fn get_all(&self) -> Vec<Consignment> {
        self.consignments.read().await.clone()
    }
}
