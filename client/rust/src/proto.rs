//! Generated protobuf types and gRPC stubs for `consignment.ShippingService`.

tonic::include_proto!("consignment");

/// Encoded `FileDescriptorSet` for the consignment package.
///
/// Registered with gRPC server reflection so tools like `grpcurl` can
/// discover the service without a local copy of the `.proto` file.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("consignment_descriptor");
