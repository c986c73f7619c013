//! Consignment repositories.
//!
//! The service layer only sees [`ConsignmentRepository`]; the backing store
//! is chosen at startup and injected as `Arc<dyn ConsignmentRepository>`.

use async_trait::async_trait;
use tonic::Status;

use crate::proto::Consignment;

mod memory;

pub use memory::InMemoryRepository;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Errors a repository can report when storing a consignment.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The repository refused the record. Nothing was stored.
    #[error("Consignment rejected: {0}")]
    Rejected(String),
}

impl From<RepositoryError> for Status {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Rejected(_) => Status::invalid_argument(err.to_string()),
        }
    }
}

/// Interface for consignment storage.
///
/// Records are append-only: once stored they are never modified or removed,
/// and listing order is insertion order.
///
/// Implementations:
/// - `InMemoryRepository`: process-local, lost on restart
#[async_trait]
pub trait ConsignmentRepository: Send + Sync {
    /// Append a consignment to the end of the collection.
    ///
    /// Returns the stored record unchanged. No identifier is assigned.
    async fn create(&self, consignment: Consignment) -> Result<Consignment>;

    /// Snapshot of every stored consignment, in insertion order.
    ///
    /// The returned vector is owned by the caller; later appends do not
    /// affect it.
    async fn get_all(&self) -> Vec<Consignment>;
}
