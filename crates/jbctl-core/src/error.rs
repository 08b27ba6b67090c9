// ── Core error types ──
//
// `AddressError` covers the address grammar and its invariants.
// `CoreError` is what the client hands back: transport-layer failures are
// wrapped by the phase they happened in (connect, request parsing,
// execution), never reinterpreted.

use jbctl_api::ModelType;
use thiserror::Error;

/// Address grammar and invariant violations. Messages are stable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    // ── Grammar ──────────────────────────────────────────────────────
    #[error("not a valid controller address: unknown protocol \"{protocol}\"")]
    UnknownProtocol { protocol: String },

    #[error("no password specified")]
    NoPassword,

    #[error("empty password")]
    EmptyPassword,

    #[error("missing port information")]
    MissingPort,

    #[error("invalid port value \"{literal}\"")]
    InvalidPort { literal: String },

    #[error("invalid port value \"{literal}\": port must be between 1 and 65535")]
    PortOutOfRange { literal: String },

    // ── Invariants ───────────────────────────────────────────────────
    #[error("empty host")]
    EmptyHost,

    #[error("invalid port value 0")]
    ZeroPort,

    #[error("null password")]
    NullPassword,

    #[error("host literal {literal:?} does not match host \"{host}\"")]
    HostLiteralMismatch {
        host: String,
        literal: Option<String>,
    },

    #[error("port literal {literal:?} does not match port {port}")]
    PortLiteralMismatch { port: u16, literal: Option<String> },
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Address ──────────────────────────────────────────────────────
    #[error(transparent)]
    InvalidAddress(#[from] AddressError),

    // ── Connection ───────────────────────────────────────────────────
    #[error("{address} not connected")]
    NotConnected { address: String },

    #[error("failed to connect to {address}: {source}")]
    ConnectionFailed {
        address: String,
        #[source]
        source: jbctl_api::Error,
    },

    #[error("transport setup failed: {0}")]
    TransportSetup(#[source] jbctl_api::Error),

    #[error("unknown transport \"{name}\" (expected one of: {expected})")]
    UnknownTransport { name: String, expected: String },

    // ── Requests ─────────────────────────────────────────────────────
    #[error(transparent)]
    InvalidRequest(jbctl_api::Error),

    #[error("operation execution failed: {0}")]
    Execution(#[source] jbctl_api::Error),

    // ── Responses ────────────────────────────────────────────────────
    #[error("{message}")]
    MalformedResponse { message: String },

    #[error("unsupported response type {model_type}")]
    UnsupportedType { model_type: ModelType },

    /// The controller reported a failure; `description` is its verbatim text.
    #[error("{description}")]
    OperationFailed { description: String },
}

impl CoreError {
    /// `true` when the controller could not be reached or refused us.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::NotConnected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_messages_are_stable() {
        assert_eq!(AddressError::MissingPort.to_string(), "missing port information");
        assert_eq!(
            AddressError::PortOutOfRange {
                literal: "70000".into()
            }
            .to_string(),
            "invalid port value \"70000\": port must be between 1 and 65535"
        );
        assert_eq!(
            AddressError::UnknownProtocol {
                protocol: "http".into()
            }
            .to_string(),
            "not a valid controller address: unknown protocol \"http\""
        );
    }

    #[test]
    fn invalid_address_is_transparent() {
        let err = CoreError::from(AddressError::EmptyPassword);
        assert_eq!(err.to_string(), "empty password");
    }

    #[test]
    fn not_connected_names_the_address() {
        let err = CoreError::NotConnected {
            address: "localhost:9999".into(),
        };
        assert_eq!(err.to_string(), "localhost:9999 not connected");
        assert!(err.is_connection());
    }
}
