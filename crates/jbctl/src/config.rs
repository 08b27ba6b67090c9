//! CLI-side profile resolution.
//!
//! Loading, credentials, and the translation to `ClientSettings` live in
//! `jbctl-config`. This module layers command-line flags over the active
//! profile before handing it over.

use clap::ValueEnum;
pub use jbctl_config::{Config, DEFAULT_PROFILE, Profile, config_path, load_config, save_config};
use jbctl_core::ClientSettings;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Load config, falling back to defaults when the file is missing or broken.
pub fn load_config_or_default() -> Config {
    jbctl_config::load_config_or_default()
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| DEFAULT_PROFILE.into())
}

/// The active profile with flag overrides applied.
///
/// An explicitly requested profile must exist. The implicit default may be
/// absent, in which case flags alone describe the controller.
pub fn resolve_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);

    let mut profile = match config.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                available: available_profiles(config),
                path: config_path().display().to_string(),
                name,
            });
        }
        None => Profile::default(),
    };

    // Flag > env > profile
    if let Some(ref controller) = global.controller {
        profile.controller.clone_from(controller);
    }
    if global.username.is_some() {
        profile.username.clone_from(&global.username);
    }
    if global.transport.is_some() {
        profile.transport.clone_from(&global.transport);
    }
    if global.fixture.is_some() {
        profile.fixture.clone_from(&global.fixture);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }
    if global.tls {
        profile.tls = Some(true);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }

    Ok((name, profile))
}

/// Build the `ClientSettings` for a controller-bound command.
pub fn resolve_settings(global: &GlobalOpts, config: &Config) -> Result<ClientSettings, CliError> {
    let (name, profile) = resolve_profile(global, config)?;
    Ok(jbctl_config::profile_to_client_settings(
        &profile,
        &name,
        &config.defaults,
    )?)
}

/// `--output`, else the configured default, else plain.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&config.defaults.output, true).unwrap_or(OutputFormat::Plain)
    })
}

fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
