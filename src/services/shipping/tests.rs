use super::*;
use crate::proto::Container;
use crate::repository::{InMemoryRepository, RepositoryError, Result as RepoResult};
use async_trait::async_trait;
use tonic::Code;

/// Repository that refuses every record.
struct RejectingRepository;

#[async_trait]
impl ConsignmentRepository for RejectingRepository {
    async fn create(&self, _consignment: Consignment) -> RepoResult<Consignment> {
        Err(RepositoryError::Rejected("weight exceeds vessel capacity".to_string()))
    }

    async fn get_all(&self) -> Vec<Consignment> {
        vec![]
    }
}

fn create_default_test_service() -> (ConsignmentService, Arc<InMemoryRepository>) {
    let repo = Arc::new(InMemoryRepository::new());
    let service = ConsignmentService::new(repo.clone());
    (service, repo)
}

fn consignment(description: &str) -> Consignment {
    Consignment {
        description: description.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_consignment_returns_created_record() {
    let (service, repo) = create_default_test_service();
    let input = Consignment {
        id: String::new(),
        description: "This is a test consignment".to_string(),
        weight: 550,
        containers: vec![Container {
            id: String::new(),
            customer_id: "cust001".to_string(),
            origin: "Manchester, United Kingdom".to_string(),
            user_id: "user001".to_string(),
        }],
        vessel_id: "vessel001".to_string(),
    };

    let response = service
        .create_consignment(Request::new(input.clone()))
        .await
        .unwrap()
        .into_inner();

    assert!(response.created);
    assert_eq!(response.consignment, Some(input));
    assert!(response.consignments.is_empty());
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_get_consignments_empty() {
    let (service, _) = create_default_test_service();

    let response = service
        .get_consignments(Request::new(GetRequest {}))
        .await
        .unwrap()
        .into_inner();

    assert!(!response.created);
    assert!(response.consignment.is_none());
    assert_eq!(response.consignments.len(), 0);
}

#[tokio::test]
async fn test_get_consignments_in_creation_order() {
    let (service, _) = create_default_test_service();

    service
        .create_consignment(Request::new(consignment("widgets")))
        .await
        .unwrap();
    let first = service
        .get_consignments(Request::new(GetRequest {}))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(first.consignments, vec![consignment("widgets")]);

    service
        .create_consignment(Request::new(consignment("gadgets")))
        .await
        .unwrap();
    let second = service
        .get_consignments(Request::new(GetRequest {}))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(
        second.consignments,
        vec![consignment("widgets"), consignment("gadgets")]
    );
}

#[tokio::test]
async fn test_get_consignments_sees_records_created_directly() {
    let (service, repo) = create_default_test_service();
    repo.create(consignment("seeded")).await.unwrap();

    let response = service
        .get_consignments(Request::new(GetRequest {}))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.consignments, vec![consignment("seeded")]);
}

#[tokio::test]
async fn test_create_consignment_propagates_rejection() {
    let service = ConsignmentService::new(Arc::new(RejectingRepository));

    let status = service
        .create_consignment(Request::new(consignment("too heavy")))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    assert!(status.message().contains("weight exceeds vessel capacity"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_create_consignment_calls() {
    let (service, _) = create_default_test_service();
    let service = Arc::new(service);
    let num_concurrent = 32;

    let calls = (0..num_concurrent).map(|i| {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .create_consignment(Request::new(consignment(&format!("batch-{}", i))))
                .await
        })
    });

    for result in futures::future::join_all(calls).await {
        let response = result.unwrap().unwrap().into_inner();
        assert!(response.created);
    }

    let listing = service
        .get_consignments(Request::new(GetRequest {}))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(listing.consignments.len(), num_concurrent);
}
