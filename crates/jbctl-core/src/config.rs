// ── Runtime client configuration ──
//
// Describes how to build a `ControllerClient`: which controller, which
// transport, and how the transport behaves. Built by the CLI from profiles
// and flags; core never reads config files.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use jbctl_api::{InMemoryController, TlsMode, TransportConfig, TransportFactory};

use crate::address::ControllerAddress;
use crate::error::CoreError;
use crate::registry::TransportKind;

#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    pub address: ControllerAddress,
    pub transport: TransportKind,
    pub transport_config: TransportConfig,
    /// JSON fixture served by the in-memory transport.
    pub fixture: Option<PathBuf>,
}

impl ClientSettings {
    pub fn new(address: ControllerAddress) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }

    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.transport_config.timeout = timeout;
        self
    }

    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.transport_config.tls = tls;
        self
    }

    pub fn with_fixture(mut self, fixture: impl Into<PathBuf>) -> Self {
        self.fixture = Some(fixture.into());
        self
    }

    /// Resolve the transport factory. A fixture only applies to the
    /// in-memory transport.
    pub fn transport_factory(&self) -> Result<Arc<dyn TransportFactory>, CoreError> {
        match (self.transport, &self.fixture) {
            (TransportKind::Memory, Some(fixture)) => {
                let controller = InMemoryController::from_fixture_file(fixture)
                    .map_err(CoreError::TransportSetup)?;
                Ok(Arc::new(controller))
            }
            (kind, _) => Ok(kind.factory(&self.transport_config)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let settings = ClientSettings::default();
        assert_eq!(settings.address, ControllerAddress::default());
        assert_eq!(settings.transport, TransportKind::Http);
        assert_eq!(settings.transport_config.tls, TlsMode::Disabled);
        assert!(settings.fixture.is_none());
    }

    #[test]
    fn missing_fixture_is_a_setup_error() {
        let settings = ClientSettings::default()
            .with_transport(TransportKind::Memory)
            .with_fixture("/nonexistent/fixture.json");
        let err = settings.transport_factory().err().unwrap();
        assert!(matches!(err, CoreError::TransportSetup(_)));
    }

    #[test]
    fn fixture_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"/subsystem=web": {{"native": false}}}}"#).unwrap();

        let settings = ClientSettings::default()
            .with_transport(TransportKind::Memory)
            .with_fixture(file.path());
        assert!(settings.transport_factory().is_ok());
    }
}
