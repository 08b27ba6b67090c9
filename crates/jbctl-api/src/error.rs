use thiserror::Error;

/// Top-level error type for the `jbctl-api` crate.
///
/// Covers transport failures, malformed operation requests, and
/// undecodable controller payloads. Outcome classification (success,
/// failed, unknown attribute) is NOT an error at this layer -- a failed
/// operation is a perfectly valid response node. `jbctl-core` decides
/// what a failure means.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The controller rejected the supplied credentials.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL construction error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Unexpected HTTP status with no decodable management response.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The controller refused the connection outright.
    #[error("Connection refused: {reason}")]
    Refused { reason: String },

    /// `execute()` was called on a session that has been disconnected.
    #[error("Session closed")]
    SessionClosed,

    // ── Data ────────────────────────────────────────────────────────
    /// Response body was not a management response, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// An in-memory controller fixture could not be loaded.
    #[error("invalid fixture: {message}")]
    Fixture { message: String },

    // ── Requests ────────────────────────────────────────────────────
    /// The command could not be parsed into an operation request.
    #[error("invalid operation '{command}': {reason}")]
    InvalidOperation { command: String, reason: String },
}

impl Error {
    /// Returns `true` if this is a connectivity problem rather than a
    /// problem with the request or the payload.
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            Self::Refused { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the controller rejected the credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
