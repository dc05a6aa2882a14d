//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::properties::parse_key_value;

/// ident - manage sids and sips in the identity service.
#[derive(Parser, Debug, Clone)]
#[command(name = "ident")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Identity service connection and credentials.
    #[command(flatten)]
    pub auth: AuthArgs,

    /// Path to a TOML config file.
    #[arg(long, env = "IDENT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table, global = true)]
    pub format: Format,

    /// Only show the given field or column (repeatable).
    #[arg(short = 'c', long = "column", value_name = "COLUMN", global = true)]
    pub columns: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Connection and credential options, mirroring the usual `OS_*` variables.
#[derive(Args, Debug, Clone, Default)]
pub struct AuthArgs {
    /// Identity endpoint URL, e.g. `https://keystone:5000/v3`.
    #[arg(long, env = "OS_AUTH_URL", global = true)]
    pub os_auth_url: Option<String>,

    /// Pre-issued token.
    #[arg(long, env = "OS_TOKEN", hide_env_values = true, global = true)]
    pub os_token: Option<String>,

    /// User name for password authentication.
    #[arg(long, env = "OS_USERNAME", global = true)]
    pub os_username: Option<String>,

    /// Password for password authentication.
    #[arg(long, env = "OS_PASSWORD", hide_env_values = true, global = true)]
    pub os_password: Option<String>,

    /// Domain of the user.
    #[arg(long, env = "OS_USER_DOMAIN_NAME", global = true)]
    pub os_user_domain_name: Option<String>,

    /// Project to scope the token to.
    #[arg(long, env = "OS_PROJECT_NAME", global = true)]
    pub os_project_name: Option<String>,

    /// Domain of the scoping project.
    #[arg(long, env = "OS_PROJECT_DOMAIN_NAME", global = true)]
    pub os_project_domain_name: Option<String>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
    /// Bare values, one record field or listing row per line.
    Value,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Sid management commands.
    Sid {
        /// Sid subcommand to execute.
        #[command(subcommand)]
        command: SidCommands,
    },

    /// Sip management commands.
    Sip {
        /// Sip subcommand to execute.
        #[command(subcommand)]
        command: SipCommands,
    },
}

/// Sid subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum SidCommands {
    /// Create a sid.
    Create(SidCreateArgs),

    /// Delete a sid.
    Delete {
        /// Name or ID of sid to delete.
        #[arg(value_name = "SID")]
        sid: String,
    },

    /// List sids.
    List,

    /// Change sid attributes.
    Set(SidSetArgs),

    /// Show a sid.
    Show {
        /// Name or ID of sid to display.
        #[arg(value_name = "SID")]
        sid: String,
    },
}

/// Arguments for `sid create`.
#[derive(Args, Debug, Clone)]
pub struct SidCreateArgs {
    /// New sid name.
    #[arg(value_name = "SID_NAME")]
    pub name: String,

    /// New sid description.
    #[arg(long)]
    pub description: Option<String>,

    /// Enable sid (default).
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    /// Disable sid.
    #[arg(long)]
    pub disable: bool,

    /// Domain identifier to include as a member (repeatable).
    #[arg(long = "member", value_name = "DOMAIN_ID")]
    pub members: Vec<String>,
}

/// Arguments for `sid set`.
#[derive(Args, Debug, Clone)]
pub struct SidSetArgs {
    /// Name or ID of sid to change.
    #[arg(value_name = "SID")]
    pub sid: String,

    /// New sid name.
    #[arg(long)]
    pub name: Option<String>,

    /// New sid description.
    #[arg(long)]
    pub description: Option<String>,

    /// Enable sid.
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    /// Disable sid.
    #[arg(long)]
    pub disable: bool,

    /// Replace the member list with these domain identifiers (repeatable).
    #[arg(long = "member", value_name = "DOMAIN_ID")]
    pub members: Vec<String>,
}

/// Sip subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum SipCommands {
    /// Create a sip.
    Create(SipCreateArgs),

    /// Delete a sip.
    Delete {
        /// Sip to delete (name or ID).
        #[arg(value_name = "SIP")]
        sip: String,
    },

    /// List sips.
    List {
        /// List additional fields in output.
        #[arg(long)]
        long: bool,

        /// Filter by owning sid (name or ID).
        #[arg(long, value_name = "SID")]
        sid: Option<String>,
    },

    /// Change sip attributes.
    Set(SipSetArgs),

    /// Show a sip.
    Show {
        /// Name or ID of sip to display.
        #[arg(value_name = "SIP")]
        sip: String,
    },
}

/// Arguments for `sip create`.
#[derive(Args, Debug, Clone)]
pub struct SipCreateArgs {
    /// New sip name.
    #[arg(value_name = "SIP_NAME")]
    pub name: String,

    /// Sid owning the sip (name or ID).
    #[arg(long, value_name = "SID")]
    pub sid: Option<String>,

    /// New sip description.
    #[arg(long)]
    pub description: Option<String>,

    /// Enable sip (default).
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    /// Disable sip.
    #[arg(long)]
    pub disable: bool,

    /// Property to add for this sip (repeat option to set multiple properties).
    #[arg(long = "property", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub properties: Vec<(String, String)>,
}

/// Arguments for `sip set`.
#[derive(Args, Debug, Clone)]
pub struct SipSetArgs {
    /// Sip to change (name or ID).
    #[arg(value_name = "SIP")]
    pub sip: String,

    /// New sip name.
    #[arg(long)]
    pub name: Option<String>,

    /// New sid owning the sip (name or ID).
    #[arg(long, value_name = "SID")]
    pub sid: Option<String>,

    /// New sip description.
    #[arg(long)]
    pub description: Option<String>,

    /// Enable sip.
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    /// Disable sip.
    #[arg(long)]
    pub disable: bool,

    /// Property to add for this sip (repeat option to set multiple properties).
    #[arg(long = "property", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub properties: Vec<(String, String)>,
}

/// Maps an `--enable`/`--disable` pair to the requested state.
pub const fn enabled_flag(enable: bool, disable: bool) -> Option<bool> {
    if disable {
        Some(false)
    } else if enable {
        Some(true)
    } else {
        None
    }
}
