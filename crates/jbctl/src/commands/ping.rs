//! `jbctl ping`: open a session and close it.

use std::time::Instant;

use jbctl_core::ControllerClient;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub fn handle(client: &mut ControllerClient, global: &GlobalOpts) -> Result<(), CliError> {
    let started = Instant::now();
    client.connect()?;
    let elapsed = started.elapsed();
    client.disconnect();

    output::print_output(
        &format!("connected to {client} in {}ms", elapsed.as_millis()),
        global.quiet,
    );
    Ok(())
}
