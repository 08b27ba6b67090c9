//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use jbctl_config::ConfigError;
use jbctl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {address}")]
    #[diagnostic(
        code(jbctl::connection_failed),
        help(
            "Check that the controller is running and its management interface is reachable.\n\
             Try: jbctl ping --controller {address}"
        )
    )]
    ConnectionFailed {
        address: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to {address} timed out")]
    #[diagnostic(
        code(jbctl::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { address: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(jbctl::auth_failed),
        help(
            "Verify the management user and password.\n\
             Run: jbctl config set-password --profile <name>"
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for user '{username}' in profile '{profile}'")]
    #[diagnostic(
        code(jbctl::no_credentials),
        help(
            "Set JBCTL_PASSWORD, run `jbctl config set-password --profile {profile}`,\n\
             or embed the password in the address: user:pass@host:port"
        )
    )]
    NoCredentials { profile: String, username: String },

    // ── Controller responses ─────────────────────────────────────────
    #[error("{description}")]
    #[diagnostic(
        code(jbctl::operation_failed),
        help("Check the resource path and attribute name.")
    )]
    OperationFailed { description: String },

    #[error("Attribute has unsupported type {model_type}")]
    #[diagnostic(
        code(jbctl::unsupported_type),
        help("Only STRING, BOOLEAN, INT, LONG and DOUBLE attributes can be read.")
    )]
    UnsupportedType { model_type: String },

    #[error("Controller error: {message}")]
    #[diagnostic(code(jbctl::controller))]
    Controller { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid controller address: {reason}")]
    #[diagnostic(
        code(jbctl::invalid_address),
        help("Expected [jbosscli://][username:password@]host[:port]")
    )]
    InvalidAddress { reason: String },

    #[error("{reason}")]
    #[diagnostic(
        code(jbctl::invalid_request),
        help("Paths look like /subsystem=web; use / for the root resource.")
    )]
    InvalidRequest { reason: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(jbctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(jbctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Config file: {path}"
        )
    )]
    ProfileNotFound {
        name: String,
        available: String,
        path: String,
    },

    #[error(transparent)]
    #[diagnostic(code(jbctl::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {0}")]
    #[diagnostic(code(jbctl::keyring))]
    Keyring(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(jbctl::render))]
    Render(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::OperationFailed { .. } => exit_code::NOT_FOUND,
            Self::InvalidAddress { .. } | Self::InvalidRequest { .. } | Self::Validation { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

/// Classify a transport-level failure that surfaced while talking to `address`.
fn from_api(address: String, err: jbctl_api::Error) -> CliError {
    match err {
        jbctl_api::Error::Authentication { message } => CliError::AuthFailed { message },
        jbctl_api::Error::Transport(ref e) if e.is_timeout() => CliError::Timeout { address },
        other if other.is_connect() => CliError::ConnectionFailed {
            address,
            source: Box::new(other),
        },
        other => CliError::Controller {
            message: other.to_string(),
        },
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAddress(e) => CliError::InvalidAddress {
                reason: e.to_string(),
            },

            CoreError::NotConnected { address } => CliError::ConnectionFailed {
                address,
                source: "no open session".into(),
            },

            CoreError::ConnectionFailed { address, source } => from_api(address, source),

            CoreError::Execution(source) => from_api("(controller)".into(), source),

            CoreError::TransportSetup(source) => CliError::Validation {
                field: "transport".into(),
                reason: source.to_string(),
            },

            CoreError::UnknownTransport { .. } => CliError::Validation {
                field: "transport".into(),
                reason: err.to_string(),
            },

            CoreError::InvalidRequest(source) => CliError::InvalidRequest {
                reason: source.to_string(),
            },

            CoreError::MalformedResponse { message } => CliError::Controller { message },

            CoreError::UnsupportedType { model_type } => CliError::UnsupportedType {
                model_type: model_type.to_string(),
            },

            CoreError::OperationFailed { description } => CliError::OperationFailed { description },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } if field == "controller" => {
                CliError::InvalidAddress { reason }
            }
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile, username } => {
                CliError::NoCredentials { profile, username }
            }
            ConfigError::Keyring(message) => CliError::Keyring(message),
            ConfigError::Serialization(e) => CliError::Render(e.to_string()),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
