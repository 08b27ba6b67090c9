// Transport contract and shared HTTP client configuration.
//
// A `TransportFactory` opens sessions against a controller; a `Session`
// executes operation requests and hands back the raw response node. The
// HTTP and in-memory transports both implement this pair, and the core
// client only ever sees the traits.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::Error;
use crate::model::ModelNode;
use crate::operation::OperationRequest;

// ── Contract ────────────────────────────────────────────────────────

/// Everything a transport needs to open a session.
#[derive(Clone, Copy)]
pub struct ConnectParams<'a> {
    pub host: &'a str,
    pub port: u16,
    /// `None` means a local, unauthenticated connection.
    pub username: Option<&'a str>,
    pub password: Option<&'a SecretString>,
}

impl fmt::Debug for ConnectParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.map(|_| "***"))
            .finish()
    }
}

/// Opens sessions against a management controller.
pub trait TransportFactory: Send + Sync {
    fn connect(&self, params: &ConnectParams<'_>) -> Result<Box<dyn Session>, Error>;
}

/// A live connection owned by exactly one client.
pub trait Session: Send {
    /// Submit an operation and return the raw response node. A failed
    /// operation is still `Ok`: the failure lives inside the node.
    fn execute(&mut self, request: &OperationRequest) -> Result<ModelNode, Error>;

    /// Release the connection. Calling it twice is harmless.
    fn disconnect(&mut self);
}

// ── HTTP client configuration ───────────────────────────────────────

/// TLS verification mode for the HTTP transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Plain `http://`. The management interface listens without TLS by default.
    #[default]
    Disabled,
    /// `https://` verified against the system certificate store.
    System,
    /// `https://` verified against a custom CA certificate (PEM).
    CustomCa(PathBuf),
    /// `https://` accepting any certificate (self-signed controllers).
    DangerAcceptInvalid,
}

impl TlsMode {
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Disabled => "http",
            _ => "https",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::Disabled,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a blocking `reqwest` client from this config.
    pub fn build_client(&self) -> Result<reqwest::blocking::Client, Error> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("jbctl/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::Disabled | TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
