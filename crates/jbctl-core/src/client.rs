// ── ControllerClient ──
//
// Two states, Disconnected and Connected. Every call runs to completion on
// the caller's thread; nothing is retried, cached, or scheduled.

use std::fmt;
use std::sync::Arc;

use jbctl_api::{ConnectParams, OperationRequest, Session, TransportFactory};
use secrecy::SecretString;
use strum::Display;
use tracing::{debug, info, warn};

use crate::address::ControllerAddress;
use crate::config::ClientSettings;
use crate::decode::{AttributeValue, decode_attribute_response};
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// A client for one management controller.
///
/// Created disconnected. Dropping a connected client releases its session.
pub struct ControllerClient {
    address: ControllerAddress,
    factory: Arc<dyn TransportFactory>,
    session: Option<Box<dyn Session>>,
}

impl ControllerClient {
    pub fn new(address: ControllerAddress, factory: Arc<dyn TransportFactory>) -> Self {
        Self {
            address,
            factory,
            session: None,
        }
    }

    /// Build a client whose transport is resolved from `settings`.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, CoreError> {
        let factory = settings.transport_factory()?;
        debug!(transport = %settings.transport, "resolved transport");
        Ok(Self::new(settings.address.clone(), factory))
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Open a session. Connecting twice is tolerated and only logged.
    pub fn connect(&mut self) -> Result<(), CoreError> {
        if self.session.is_some() {
            warn!(address = %self.address, "already connected");
            return Ok(());
        }

        let params = ConnectParams {
            host: self.address.host(),
            port: self.address.port(),
            username: self.address.username(),
            password: self.address.password(),
        };
        debug!(?params, "connecting");

        let session =
            self.factory
                .connect(&params)
                .map_err(|source| CoreError::ConnectionFailed {
                    address: self.address.to_string(),
                    source,
                })?;

        self.session = Some(session);
        info!(address = %self.address, "connected");
        Ok(())
    }

    /// Release the session, if any. Always ends disconnected.
    pub fn disconnect(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.disconnect();
            debug!(address = %self.address, "disconnected");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn connection_state(&self) -> ConnectionState {
        if self.is_connected() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    // ── Attribute reads ──────────────────────────────────────────────

    /// Read `attribute` of the resource at `path` (e.g. `/subsystem=web`).
    ///
    /// Returns `Ok(None)` when the attribute is undefined or unknown on an
    /// existing resource. A malformed path fails before anything is sent.
    pub fn get_attribute_value(
        &mut self,
        path: &str,
        attribute: &str,
    ) -> Result<Option<AttributeValue>, CoreError> {
        let Some(session) = self.session.as_mut() else {
            return Err(CoreError::NotConnected {
                address: self.address.to_string(),
            });
        };

        let command = format!("{path}:read-attribute(name={attribute})");
        let request = OperationRequest::parse(&command).map_err(CoreError::InvalidRequest)?;
        debug!(%request, "executing");

        let response = session.execute(&request).map_err(CoreError::Execution)?;
        decode_attribute_response(&response)
    }

    // ── Address ──────────────────────────────────────────────────────

    pub fn address(&self) -> &ControllerAddress {
        &self.address
    }

    /// Replace the address. A live session is kept; the new address takes
    /// effect on the next `connect`.
    pub fn set_controller_address(&mut self, address: ControllerAddress) {
        debug!(from = %self.address, to = %address, "controller address changed");
        self.address = address;
    }

    pub fn host(&self) -> &str {
        self.address.host()
    }

    pub fn port(&self) -> u16 {
        self.address.port()
    }

    pub fn username(&self) -> Option<&str> {
        self.address.username()
    }

    pub fn password(&self) -> Option<&SecretString> {
        self.address.password()
    }
}

impl Drop for ControllerClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl fmt::Display for ControllerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

impl fmt::Debug for ControllerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerClient")
            .field("address", &self.address)
            .field("state", &self.connection_state())
            .finish_non_exhaustive()
    }
}
