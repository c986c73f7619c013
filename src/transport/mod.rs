//! Transport layer for the gRPC server.
//!
//! Supports:
//! - TCP: Standard network transport (default)
//! - UDS: Unix Domain Sockets for local IPC

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::net::{TcpListener, UnixListener};
use tokio_stream::wrappers::{TcpListenerStream, UnixListenerStream};
use tonic::service::Routes;
use tonic::transport::server::Router;
use tower::Layer;
use tower::Service;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Transport type discriminator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    /// TCP transport (network).
    #[default]
    Tcp,
    /// Unix Domain Socket transport (local IPC).
    Uds,
}

/// Transport configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Transport type discriminator.
    #[serde(rename = "type")]
    pub transport_type: TransportType,
    /// TCP-specific configuration.
    pub tcp: TcpConfig,
    /// UDS-specific configuration.
    pub uds: UdsConfig,
}

/// TCP transport configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TcpConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 50051,
        }
    }
}

impl TcpConfig {
    /// Get the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// UDS transport configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UdsConfig {
    /// Base path for socket files.
    pub base_path: PathBuf,
}

impl Default for UdsConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("/tmp/shippy"),
        }
    }
}

impl UdsConfig {
    /// Get the socket path for a service.
    pub fn socket_path(&self, service_name: &str) -> PathBuf {
        self.base_path.join(format!("{}.sock", service_name))
    }
}

/// Socket file owned by a running server.
///
/// The file is removed when the value is dropped, so a stopped server never
/// leaves a dead socket behind for the next start.
pub struct SocketFile {
    path: PathBuf,
}

impl SocketFile {
    /// Take ownership of `path` for a new socket.
    ///
    /// Creates the socket directory and removes whatever an earlier run left
    /// at `path`; binding fails on an existing file otherwise.
    pub fn claim(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => info!(path = %path.display(), "Removed leftover consignment socket"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SocketFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed consignment socket"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Could not remove consignment socket"
            ),
        }
    }
}

/// A listener bound from [`TransportConfig`], not yet serving.
///
/// Binding is separate from serving so callers can learn the bound address
/// (e.g. an ephemeral TCP port) before requests arrive.
pub enum BoundListener {
    Tcp(TcpListener),
    Uds {
        listener: UnixListener,
        socket: SocketFile,
    },
}

impl BoundListener {
    /// Bind according to the configured transport.
    ///
    /// UDS sockets live at `{base_path}/{service_name}.sock`.
    pub async fn bind(config: &TransportConfig, service_name: &str) -> std::io::Result<Self> {
        match config.transport_type {
            TransportType::Tcp => Ok(Self::Tcp(TcpListener::bind(config.tcp.addr()).await?)),
            TransportType::Uds => {
                let socket = SocketFile::claim(config.uds.socket_path(service_name))?;
                let listener = UnixListener::bind(socket.path())?;
                Ok(Self::Uds { listener, socket })
            }
        }
    }

    /// Bound TCP address; `None` for UDS.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        match self {
            Self::Tcp(listener) => listener.local_addr().ok(),
            Self::Uds { .. } => None,
        }
    }
}

/// Serve a gRPC router on an already bound listener until `signal` completes.
///
/// A UDS socket file is removed once the server stops.
pub async fn serve_bound<L, ResBody, F>(
    router: Router<L>,
    listener: BoundListener,
    service_name: &str,
    signal: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    L: Layer<Routes> + Clone,
    L::Service: Service<http::Request<tonic::body::BoxBody>, Response = http::Response<ResBody>>
        + Clone
        + Send
        + 'static,
    <L::Service as Service<http::Request<tonic::body::BoxBody>>>::Future: Send + 'static,
    <L::Service as Service<http::Request<tonic::body::BoxBody>>>::Error:
        Into<Box<dyn std::error::Error + Send + Sync>> + Send,
    ResBody: http_body::Body<Data = bytes::Bytes> + Send + 'static,
    ResBody::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    F: Future<Output = ()> + Send,
{
    match listener {
        BoundListener::Tcp(listener) => {
            let addr = listener.local_addr()?;
            info!(
                service = %service_name,
                address = %addr,
                transport = "tcp",
                "Server listening"
            );
            router
                .serve_with_incoming_shutdown(TcpListenerStream::new(listener), signal)
                .await?;
        }
        BoundListener::Uds { listener, socket } => {
            info!(
                service = %service_name,
                path = %socket.path().display(),
                transport = "uds",
                "Server listening"
            );
            router
                .serve_with_incoming_shutdown(UnixListenerStream::new(listener), signal)
                .await?;
        }
    }

    info!(service = %service_name, "Server stopped");
    Ok(())
}

/// Tower trace layer that extracts `x-correlation-id` from gRPC request headers.
///
/// Creates a tracing span per request with the correlation_id and the gRPC
/// method path, so every event logged while handling the call inherits them.
pub fn grpc_trace_layer() -> TraceLayer<
    tower_http::classify::SharedClassifier<tower_http::classify::GrpcErrorsAsFailures>,
    impl Fn(&http::Request<tonic::body::BoxBody>) -> tracing::Span + Clone,
> {
    TraceLayer::new_for_grpc().make_span_with(|request: &http::Request<tonic::body::BoxBody>| {
        let correlation_id = request
            .headers()
            .get("x-correlation-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        let path = request.uri().path();
        tracing::info_span!("grpc", %correlation_id, %path)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_config_default() {
        let config = TransportConfig::default();
        assert_eq!(config.transport_type, TransportType::Tcp);
        assert_eq!(config.tcp.host, "0.0.0.0");
        assert_eq!(config.tcp.port, 50051);
        assert_eq!(config.uds.base_path, PathBuf::from("/tmp/shippy"));
    }

    #[test]
    fn test_tcp_addr() {
        let tcp = TcpConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        };
        assert_eq!(tcp.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_uds_socket_path() {
        let uds = UdsConfig {
            base_path: PathBuf::from("/tmp/test"),
        };
        assert_eq!(
            uds.socket_path("consignment"),
            PathBuf::from("/tmp/test/consignment.sock")
        );
    }

    #[test]
    fn test_transport_type_from_yaml() {
        let config: TransportConfig = serde_yaml::from_str("type: uds").unwrap();
        assert_eq!(config.transport_type, TransportType::Uds);
        assert_eq!(config.tcp.port, 50051);
    }

    #[test]
    fn test_socket_file_claim_clears_leftover() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("nested").join("consignment.sock");

        std::fs::create_dir_all(socket_path.parent().unwrap()).unwrap();
        std::fs::write(&socket_path, "leftover").unwrap();

        let socket = SocketFile::claim(&socket_path).unwrap();
        assert_eq!(socket.path(), socket_path.as_path());
        assert!(!socket_path.exists());
    }

    #[test]
    fn test_socket_file_claim_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("a").join("b").join("consignment.sock");

        let _socket = SocketFile::claim(&socket_path).unwrap();
        assert!(socket_path.parent().unwrap().is_dir());
    }

    #[test]
    fn test_socket_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("consignment.sock");

        {
            let _socket = SocketFile::claim(&socket_path).unwrap();
            std::fs::write(&socket_path, "bound").unwrap();
        }

        assert!(!socket_path.exists());
    }

    #[tokio::test]
    async fn test_bind_tcp_ephemeral_port() {
        let config = TransportConfig {
            transport_type: TransportType::Tcp,
            tcp: TcpConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            uds: UdsConfig::default(),
        };

        let listener = BoundListener::bind(&config, "consignment").await.unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn test_bind_uds_creates_and_removes_socket() {
        let dir = tempfile::tempdir().unwrap();
        let config = TransportConfig {
            transport_type: TransportType::Uds,
            tcp: TcpConfig::default(),
            uds: UdsConfig {
                base_path: dir.path().to_path_buf(),
            },
        };
        let socket_path = config.uds.socket_path("consignment");

        let listener = BoundListener::bind(&config, "consignment").await.unwrap();
        assert!(listener.local_addr().is_none());
        assert!(socket_path.exists());

        drop(listener);
        assert!(!socket_path.exists());
    }
}
