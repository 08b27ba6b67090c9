//! `jbctl get <path> <attribute>`

use serde::Serialize;
use tabled::Tabled;

use jbctl_config::Config;
use jbctl_core::{AttributeValue, ControllerClient};

use crate::cli::{GetArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const UNDEFINED: &str = "undefined";

#[derive(Debug, Serialize)]
struct Reading {
    controller: String,
    path: String,
    attribute: String,
    #[serde(rename = "type")]
    model_type: Option<String>,
    value: Option<AttributeValue>,
}

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Attribute")]
    attribute: String,
    #[tabled(rename = "Type")]
    model_type: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn to_row(r: &Reading) -> ReadingRow {
    ReadingRow {
        path: r.path.clone(),
        attribute: r.attribute.clone(),
        model_type: r.model_type.clone().unwrap_or_else(|| "-".into()),
        value: plain(r),
    }
}

fn plain(r: &Reading) -> String {
    r.value
        .as_ref()
        .map_or_else(|| UNDEFINED.to_owned(), ToString::to_string)
}

pub fn handle(
    client: &mut ControllerClient,
    args: &GetArgs,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(), CliError> {
    client.connect()?;
    let value = client.get_attribute_value(&args.path, &args.attribute);
    client.disconnect();
    let value = value?;

    let reading = Reading {
        controller: client.to_string(),
        path: args.path.clone(),
        attribute: args.attribute.clone(),
        model_type: value.as_ref().map(|v| v.model_type().to_string()),
        value,
    };

    let format = config::output_format(global, cfg);
    let out = output::render_single(format, &reading, to_row, plain)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
