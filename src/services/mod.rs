//! gRPC service implementations.

pub mod shipping;

pub use shipping::ConsignmentService;
