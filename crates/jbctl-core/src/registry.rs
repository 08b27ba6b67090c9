// ── Transport registry ──
//
// Configuration names a transport by tag; this maps the tag to a concrete
// factory. Tests bypass it entirely and inject a factory directly.

use std::str::FromStr;
use std::sync::Arc;

use jbctl_api::{HttpTransport, InMemoryController, TransportConfig, TransportFactory};
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum TransportKind {
    /// HTTP/JSON management endpoint.
    #[default]
    Http,
    /// In-process controller with no resources beyond the root.
    Memory,
}

impl TransportKind {
    pub fn factory(self, config: &TransportConfig) -> Arc<dyn TransportFactory> {
        match self {
            Self::Http => Arc::new(HttpTransport::new(config.clone())),
            Self::Memory => Arc::new(InMemoryController::new()),
        }
    }

    /// Comma-separated list of every known tag.
    pub fn names() -> String {
        Self::iter()
            .map(|kind| kind.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for TransportKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::iter()
            .find(|kind| kind.as_ref().eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::UnknownTransport {
                name: name.to_owned(),
                expected: Self::names(),
            })
    }
}
