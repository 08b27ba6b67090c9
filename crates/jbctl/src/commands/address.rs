//! `jbctl address [literal]`: show how a controller address resolves.

use serde::Serialize;
use tabled::Tabled;

use jbctl_config::Config;
use jbctl_core::ControllerAddress;

use crate::cli::{AddressArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const MASK: &str = "***";

#[derive(Debug, Serialize)]
struct AddressView {
    protocol: &'static str,
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<&'static str>,
    literal: String,
}

impl From<&ControllerAddress> for AddressView {
    fn from(address: &ControllerAddress) -> Self {
        Self {
            protocol: address.protocol(),
            host: address.host().to_owned(),
            port: address.port(),
            username: address.username().map(str::to_owned),
            password: address.password().map(|_| MASK),
            literal: address.literal(),
        }
    }
}

#[derive(Tabled)]
struct AddressRow {
    #[tabled(rename = "Protocol")]
    protocol: &'static str,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Port")]
    port: u16,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Password")]
    password: &'static str,
    #[tabled(rename = "Literal")]
    literal: String,
}

fn to_row(v: &AddressView) -> AddressRow {
    AddressRow {
        protocol: v.protocol,
        host: v.host.clone(),
        port: v.port,
        username: v.username.clone().unwrap_or_else(|| "-".into()),
        password: v.password.unwrap_or("-"),
        literal: v.literal.clone(),
    }
}

/// `[username@]host:port`, the resolved endpoint.
fn plain(v: &AddressView) -> String {
    match v.username {
        Some(ref user) => format!("{user}@{}:{}", v.host, v.port),
        None => format!("{}:{}", v.host, v.port),
    }
}

pub fn handle(args: &AddressArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let literal = match args.literal {
        Some(ref literal) => literal.clone(),
        None => config::resolve_profile(global, cfg)?.1.controller,
    };
    let address = ControllerAddress::parse(&literal).map_err(|e| CliError::InvalidAddress {
        reason: e.to_string(),
    })?;
    tracing::debug!(%address, "parsed controller address");

    let view = AddressView::from(&address);
    let format = config::output_format(global, cfg);
    let out = output::render_single(format, &view, to_row, plain)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
