//! Configuration for the jbctl CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `jbctl_core::ClientSettings`. The CLI layers its
//! flag overrides on top of a profile before translating it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use jbctl_api::TlsMode;
use jbctl_core::{ClientSettings, ControllerAddress, TransportKind};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "JBCTL_";
pub const PASSWORD_ENV: &str = "JBCTL_PASSWORD";
pub const KEYRING_SERVICE: &str = "jbctl";
pub const DEFAULT_PROFILE: &str = "default";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for user '{username}' in profile '{profile}'")]
    NoCredentials { profile: String, username: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_transport")]
    pub transport: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            transport: default_transport(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "plain".into()
}
fn default_transport() -> String {
    TransportKind::default().to_string()
}
fn default_timeout() -> u64 {
    30
}

/// A named controller profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Controller address, `[jbosscli://][user:pass@]host[:port]`. Empty
    /// means the default controller.
    #[serde(default)]
    pub controller: String,

    /// Management user. Absent means a local connection.
    pub username: Option<String>,

    /// Password (plaintext; prefer keyring or `password_env`).
    pub password: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// Transport tag: "http" or "memory".
    pub transport: Option<String>,

    /// JSON fixture for the memory transport.
    pub fixture: Option<PathBuf>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,

    /// Use HTTPS against the system trust store.
    pub tls: Option<bool>,

    /// Use HTTPS and accept any certificate.
    pub insecure: Option<bool>,

    /// Use HTTPS with a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "novaordis", "jbctl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("jbctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, with `JBCTL_` environment overrides.
///
/// Nested keys use a double underscore: `JBCTL_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if it is missing or unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?
        .set_password(password)
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Resolve the password for a profile's user.
///
/// Order: the profile's `password_env` variable, `JBCTL_PASSWORD`, the
/// system keyring, then plaintext in the profile.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<SecretString>, ConfigError> {
    let Some(username) = profile.username.as_deref() else {
        return Ok(None);
    };

    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(Some(SecretString::from(val)));
        }
    }

    // 2. Global env var
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(Some(SecretString::from(val)));
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(Some(SecretString::from(secret)));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(Some(SecretString::from(pw.clone())));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
        username: username.into(),
    })
}

// ── Translation to ClientSettings ───────────────────────────────────

/// Build `ClientSettings` from a profile, falling back to `defaults` for
/// anything the profile leaves unset.
///
/// Credentials embedded in `controller` win over `username`/`password`.
pub fn profile_to_client_settings(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientSettings, ConfigError> {
    let mut address =
        ControllerAddress::parse(&profile.controller).map_err(|e| ConfigError::Validation {
            field: "controller".into(),
            reason: e.to_string(),
        })?;

    if address.username().is_none() {
        if let (Some(username), Some(password)) = (
            profile.username.as_deref(),
            resolve_password(profile, profile_name)?,
        ) {
            address = address
                .with_credentials(username, password)
                .map_err(|e| ConfigError::Validation {
                    field: "username".into(),
                    reason: e.to_string(),
                })?;
        }
    }

    let transport_name = profile.transport.as_deref().unwrap_or(&defaults.transport);
    let transport: TransportKind =
        transport_name
            .parse()
            .map_err(|e: jbctl_core::CoreError| ConfigError::Validation {
                field: "transport".into(),
                reason: e.to_string(),
            })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else if profile.tls.unwrap_or(false) {
        TlsMode::System
    } else {
        TlsMode::Disabled
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    let mut settings = ClientSettings::new(address)
        .with_transport(transport)
        .with_tls(tls)
        .with_timeout(timeout);
    if let Some(ref fixture) = profile.fixture {
        settings = settings.with_fixture(fixture);
    }
    Ok(settings)
}
