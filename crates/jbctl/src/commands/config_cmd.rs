//! Config subcommand handlers.

use serde::Serialize;
use tabled::Tabled;

use jbctl_core::ControllerAddress;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// A copy of `cfg` with plaintext passwords masked.
fn redacted(cfg: &Config) -> Config {
    let profiles = cfg
        .profiles
        .iter()
        .map(|(name, p)| {
            let mut p = p.clone();
            if p.password.is_some() {
                p.password = Some(MASK.into());
            }
            (name.clone(), p)
        })
        .collect();
    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: cfg.defaults.clone(),
        profiles,
    }
}

#[derive(Debug, Serialize)]
struct ProfileSummary {
    name: String,
    default: bool,
    controller: String,
    username: Option<String>,
    transport: Option<String>,
}

impl ProfileSummary {
    fn new(name: &str, p: &Profile, default: bool) -> Self {
        Self {
            name: name.to_owned(),
            default,
            controller: p.controller.clone(),
            username: p.username.clone(),
            transport: p.transport.clone(),
        }
    }
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Controller")]
    controller: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Transport")]
    transport: String,
}

fn to_row(s: &ProfileSummary) -> ProfileRow {
    ProfileRow {
        marker: if s.default { "*" } else { "" },
        name: s.name.clone(),
        controller: s.controller.clone(),
        username: s.username.clone().unwrap_or_else(|| "-".into()),
        transport: s.transport.clone().unwrap_or_else(|| "-".into()),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let rendered = toml::to_string_pretty(&redacted(cfg))
                .map_err(|e| CliError::Render(e.to_string()))?;
            output::print_output(rendered.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let active = config::active_profile_name(global, cfg);
            let summaries: Vec<ProfileSummary> = cfg
                .profiles
                .iter()
                .map(|(name, p)| ProfileSummary::new(name, p, *name == active))
                .collect();
            let format = config::output_format(global, cfg);
            let out = output::render_list(format, &summaries, to_row, |s| s.name.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::AddProfile {
            name,
            controller,
            default,
        } => {
            // Reject an unusable address before it lands on disk.
            ControllerAddress::parse(&controller).map_err(|e| CliError::InvalidAddress {
                reason: e.to_string(),
            })?;

            let mut cfg = config::load_config()?;
            cfg.profiles.insert(
                name.clone(),
                Profile {
                    controller,
                    username: global.username.clone(),
                    transport: global.transport.clone(),
                    ..Profile::default()
                },
            );
            if default {
                cfg.default_profile = Some(name.clone());
            }
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Profile '{name}' written to {}", config::config_path().display());
            }
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let name = config::active_profile_name(global, cfg);
            let password = rpassword::prompt_password(format!("Password for profile '{name}': "))?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }
            jbctl_config::store_password(&name, &password)?;
            if !global.quiet {
                eprintln!("Password for profile '{name}' stored in system keyring");
            }
            Ok(())
        }
    }
}
