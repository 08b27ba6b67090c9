//! Command dispatch: bridges CLI args -> `ControllerClient` calls -> output.

pub mod address;
pub mod config_cmd;
pub mod get;
pub mod ping;

use jbctl_config::Config;
use jbctl_core::{ClientSettings, ControllerClient};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub fn dispatch(
    cmd: Command,
    settings: &ClientSettings,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(), CliError> {
    let mut client = ControllerClient::from_settings(settings)?;
    match cmd {
        Command::Get(args) => get::handle(&mut client, &args, global, cfg),
        Command::Ping => ping::handle(&mut client, global),
        // Handled before dispatch
        Command::Address(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
