//! Clap derive structures for the `jbctl` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// jbctl -- read JBoss / WildFly management attributes from the command line
#[derive(Debug, Parser)]
#[command(
    name = "jbctl",
    version,
    about = "Query JBoss / WildFly management controllers from the command line",
    long_about = "Connects to a JBoss / WildFly management controller and reads\n\
        resource attributes, e.g. `jbctl get /subsystem=web native`.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "JBCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller address, [jbosscli://][user:pass@]host[:port] (overrides profile)
    #[arg(long, short = 'c', env = "JBCTL_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Management user (password from JBCTL_PASSWORD or the keyring)
    #[arg(long, short = 'u', env = "JBCTL_USERNAME", global = true)]
    pub username: Option<String>,

    /// Transport: http or memory
    #[arg(long, env = "JBCTL_TRANSPORT", global = true)]
    pub transport: Option<String>,

    /// JSON fixture for the memory transport
    #[arg(long, env = "JBCTL_FIXTURE", global = true)]
    pub fixture: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', env = "JBCTL_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Talk HTTPS to the controller, verifying against the system roots
    #[arg(long, global = true)]
    pub tls: bool,

    /// Talk HTTPS and accept any certificate
    #[arg(long, short = 'k', env = "JBCTL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "JBCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Bare value (default, scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read one attribute of a management resource
    #[command(alias = "read")]
    Get(GetArgs),

    /// Open a session to the controller and close it again
    Ping,

    /// Parse a controller address and show how it resolves
    #[command(alias = "addr")]
    Address(AddressArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Get ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Resource path, e.g. /subsystem=web or / for the root
    pub path: String,

    /// Attribute name, e.g. default-virtual-server
    pub attribute: String,
}

// ── Address ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AddressArgs {
    /// Address literal; defaults to the active profile's controller
    pub literal: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display current configuration (secrets masked)
    Show,

    /// List configured profiles
    Profiles,

    /// Create or replace a profile (takes --username and --transport)
    AddProfile {
        /// Profile name
        name: String,

        /// Controller address, [jbosscli://]host[:port]
        controller: String,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// Store a profile's password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
