//! Controller addresses, attribute decoding, and the synchronous management
//! client built on `jbctl-api`.
//!
//! - **[`ControllerAddress`]**: `[jbosscli://][user:pass@]host[:port]` with
//!   literal round-tripping and credential-insensitive equality.
//! - **[`decode_attribute_response`]**: classifies a raw `read-attribute`
//!   response into a typed [`AttributeValue`], `None`, or a [`CoreError`].
//! - **[`ControllerClient`]**: connect / read / disconnect against an
//!   injected [`TransportFactory`](jbctl_api::TransportFactory).
//! - **[`TransportKind`]**: tag-keyed transport selection for configuration.

pub mod address;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod registry;

// ── Primary re-exports ──────────────────────────────────────────────
pub use address::{AddressParts, ControllerAddress, DEFAULT_HOST, DEFAULT_PORT, PROTOCOL};
pub use client::{ConnectionState, ControllerClient};
pub use config::ClientSettings;
pub use decode::{AttributeValue, decode_attribute_response};
pub use error::{AddressError, CoreError};
pub use registry::TransportKind;
