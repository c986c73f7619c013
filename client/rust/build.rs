use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use main proto directory (../../proto relative to client/rust)
    // so the server and the client compile the same contract.
    let proto_root = "../../proto";

    println!("cargo:rerun-if-changed={}", proto_root);

    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        // Encoded descriptor set for gRPC server reflection
        .file_descriptor_set_path(out_dir.join("consignment_descriptor.bin"))
        // Enable serde for record types (consignment JSON files)
        .type_attribute(
            ".consignment.Consignment",
            "#[derive(serde::Serialize, serde::Deserialize)] #[serde(default)]",
        )
        .type_attribute(
            ".consignment.Container",
            "#[derive(serde::Serialize, serde::Deserialize)] #[serde(default)]",
        )
        .compile_protos(
            &[format!("{}/consignment/consignment.proto", proto_root)],
            &[proto_root],
        )?;

    Ok(())
}
