// ── Controller addresses ──
//
// `[jbosscli://][username:password@]host[:port]`
//
// An address remembers which pieces the caller actually wrote (the
// literals) separately from the effective, possibly defaulted, values.
// `literal()` reproduces only what was written; `Display` shows the
// effective values with the password masked.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::IntErrorKind;
use std::str::FromStr;

use secrecy::SecretString;

use crate::error::AddressError;

pub const PROTOCOL: &str = "jbosscli";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 9999;

const PROTOCOL_SEPARATOR: &str = "://";
const PASSWORD_MASK: &str = "***";

/// The raw pieces of an address, validated by [`ControllerAddress::new`].
#[derive(Debug, Clone)]
pub struct AddressParts {
    pub host: String,
    pub host_literal: Option<String>,
    pub port: u16,
    pub port_literal: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl Default for AddressParts {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            host_literal: None,
            port: DEFAULT_PORT,
            port_literal: None,
            username: None,
            password: None,
        }
    }
}

/// Where a management controller listens, and who we are when we talk to it.
///
/// Equality and hashing consider host, port and username only: two
/// addresses differing only in password are the same address.
#[derive(Debug, Clone)]
pub struct ControllerAddress {
    host: String,
    host_literal: Option<String>,
    port: u16,
    port_literal: Option<String>,
    username: Option<String>,
    password: Option<SecretString>,
}

impl ControllerAddress {
    /// The validating constructor. Every other way of building an address
    /// goes through here.
    pub fn new(parts: AddressParts) -> Result<Self, AddressError> {
        let AddressParts {
            host,
            host_literal,
            port,
            port_literal,
            username,
            password,
        } = parts;

        if host.is_empty() {
            return Err(AddressError::EmptyHost);
        }
        if port == 0 {
            return Err(AddressError::ZeroPort);
        }

        let host_matches = match &host_literal {
            Some(literal) => *literal == host,
            None => host == DEFAULT_HOST,
        };
        if !host_matches {
            return Err(AddressError::HostLiteralMismatch { host, literal: host_literal });
        }

        let port_matches = match &port_literal {
            Some(literal) => literal.parse::<u16>().ok() == Some(port),
            None => port == DEFAULT_PORT,
        };
        if !port_matches {
            return Err(AddressError::PortLiteralMismatch { port, literal: port_literal });
        }

        if username.is_some() && password.is_none() {
            return Err(AddressError::NullPassword);
        }

        Ok(Self {
            host,
            host_literal,
            port,
            port_literal,
            username,
            password,
        })
    }

    /// `host` with the default port.
    pub fn with_host(host: &str) -> Result<Self, AddressError> {
        Self::new(AddressParts {
            host: host.to_owned(),
            host_literal: Some(host.to_owned()),
            ..AddressParts::default()
        })
    }

    pub fn with_host_and_port(host: &str, port: u16) -> Result<Self, AddressError> {
        Self::new(AddressParts {
            host: host.to_owned(),
            host_literal: Some(host.to_owned()),
            port,
            port_literal: Some(port.to_string()),
            ..AddressParts::default()
        })
    }

    /// The same address with credentials attached. An empty password is
    /// accepted here; only the string grammar rejects it.
    pub fn with_credentials(
        self,
        username: &str,
        password: SecretString,
    ) -> Result<Self, AddressError> {
        let mut parts = self.into_parts();
        parts.username = Some(username.to_owned());
        parts.password = Some(password);
        Self::new(parts)
    }

    /// Parse `[jbosscli://][username:password@]host[:port]`.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let mut rest = s;

        if let Some((protocol, after)) = rest.split_once(PROTOCOL_SEPARATOR) {
            if protocol != PROTOCOL {
                return Err(AddressError::UnknownProtocol {
                    protocol: protocol.to_owned(),
                });
            }
            rest = after;
        }

        let mut username = None;
        let mut password = None;
        // The last `@` ends the credentials, so a password may contain `@`.
        if let Some((credentials, after)) = rest.rsplit_once('@') {
            let Some((user, pass)) = credentials.split_once(':') else {
                return Err(AddressError::NoPassword);
            };
            if pass.is_empty() {
                return Err(AddressError::EmptyPassword);
            }
            username = Some(user.to_owned());
            password = Some(SecretString::from(pass));
            rest = after;
        }

        let (host_literal, port_literal) = match rest.rsplit_once(':') {
            None => (rest, None),
            Some((_, "")) => return Err(AddressError::MissingPort),
            Some((host, port)) => (host, Some(port)),
        };

        let port = match port_literal {
            Some(literal) => parse_port(literal)?,
            None => DEFAULT_PORT,
        };
        let (host, host_literal) = if host_literal.is_empty() {
            (DEFAULT_HOST.to_owned(), None)
        } else {
            (host_literal.to_owned(), Some(host_literal.to_owned()))
        };

        Self::new(AddressParts {
            host,
            host_literal,
            port,
            port_literal: port_literal.map(str::to_owned),
            username,
            password,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn protocol(&self) -> &'static str {
        PROTOCOL
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The host exactly as the caller wrote it, `None` if defaulted.
    pub fn host_literal(&self) -> Option<&str> {
        self.host_literal.as_deref()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn port_literal(&self) -> Option<&str> {
        self.port_literal.as_deref()
    }

    /// `None` means a local connection.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }

    /// `[username@]host[:port]` using only caller-supplied pieces. Never
    /// contains the password or the protocol.
    pub fn literal(&self) -> String {
        let mut out = String::new();
        if let Some(username) = &self.username {
            out.push_str(username);
            out.push('@');
        }
        if let Some(host) = &self.host_literal {
            out.push_str(host);
        }
        if let Some(port) = &self.port_literal {
            out.push(':');
            out.push_str(port);
        }
        out
    }

    pub fn into_parts(self) -> AddressParts {
        AddressParts {
            host: self.host,
            host_literal: self.host_literal,
            port: self.port,
            port_literal: self.port_literal,
            username: self.username,
            password: self.password,
        }
    }
}

/// Any integer outside 1..=65535, negative or huge, is out of range.
/// Only non-numeric text is an invalid port.
fn parse_port(literal: &str) -> Result<u16, AddressError> {
    let out_of_range = || AddressError::PortOutOfRange {
        literal: literal.to_owned(),
    };
    match literal.parse::<i64>() {
        Ok(n) => u16::try_from(n)
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(out_of_range),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Err(out_of_range())
        }
        Err(_) => Err(AddressError::InvalidPort {
            literal: literal.to_owned(),
        }),
    }
}

impl Default for ControllerAddress {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            host_literal: None,
            port: DEFAULT_PORT,
            port_literal: None,
            username: None,
            password: None,
        }
    }
}

impl FromStr for ControllerAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for ControllerAddress {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host && self.port == other.port && self.username == other.username
    }
}

impl Eq for ControllerAddress {}

impl Hash for ControllerAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.host.hash(state);
        self.port.hash(state);
        self.username.hash(state);
    }
}

impl fmt::Display for ControllerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(username) = &self.username {
            write!(f, "{username}:{PASSWORD_MASK}@")?;
        }
        write!(f, "{}:{}", self.host, self.port)
    }
}
