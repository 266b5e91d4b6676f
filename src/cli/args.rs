//! CLI argument definitions using clap
//!
//! This module defines all command-line arguments for reqpad.

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

use crate::config::CONFIG_DIR_ENV;
use crate::logging::LogFormat;

/// A string that redacts its value in Debug output to prevent credential leakage
#[derive(Clone, Default)]
pub struct SecretString(pub String);

impl SecretString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "SecretString(\"\")")
        } else {
            write!(f, "SecretString(\"[REDACTED]\")")
        }
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "")
        } else {
            write!(f, "[REDACTED]")
        }
    }
}

impl std::str::FromStr for SecretString {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SecretString(s.to_string()))
    }
}

/// reqpad - save, send and convert HTTP requests from the command line
#[derive(Parser, Debug, Clone)]
#[command(name = "reqpad", version, about, long_about = None)]
pub struct Args {
    /// Verbose logging. Use -vv for even more verbose
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format on stderr
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Directory holding config.toml and the default store
    #[arg(long = "config-dir", value_name = "DIR", env = CONFIG_DIR_ENV, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Show traceback on error
    #[arg(long = "traceback", action = ArgAction::SetTrue, global = true)]
    pub traceback: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Parse a curl command and save it as a request
    Import(ImportArgs),

    /// Print a saved request as a curl command
    Export {
        /// Request id
        id: String,
        /// Colorize the command
        #[arg(long = "pretty", action = ArgAction::SetTrue)]
        pretty: bool,
    },

    /// Send a saved request or a curl command
    Send(SendArgs),

    /// Manage saved requests
    #[command(subcommand)]
    Request(RequestCommand),

    /// Manage collections
    #[command(subcommand)]
    Collection(CollectionCommand),

    /// Manage environments and their variables
    #[command(subcommand)]
    Env(EnvCommand),

    /// Browse and prune recorded responses
    #[command(subcommand)]
    History(HistoryCommand),

    /// Export or import the whole store
    #[command(subcommand)]
    Data(DataCommand),

    /// Show the effective configuration
    Config,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ImportArgs {
    /// curl command line; read from stdin when omitted or "-"
    #[arg(value_name = "CURL")]
    pub command: Option<String>,

    /// Request name (defaults to "METHOD /path")
    #[arg(long = "name", short = 'n')]
    pub name: Option<String>,

    /// Collection id or name to file the request under
    #[arg(long = "collection", short = 'c')]
    pub collection: Option<String>,

    /// Parse and print without saving
    #[arg(long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Print the parsed request as JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SendArgs {
    /// Saved request id, or a curl command line with --curl
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Treat TARGET as a curl command line
    #[arg(long = "curl", action = ArgAction::SetTrue)]
    pub curl: bool,

    /// Credentials: user:password (basic), token (bearer), name:value (api-key)
    #[arg(short = 'a', long = "auth", value_name = "CREDENTIALS")]
    pub auth: Option<SecretString>,

    /// Authentication scheme for --auth
    #[arg(short = 'A', long = "auth-type", value_enum, default_value_t = AuthType::Basic)]
    pub auth_type: AuthType,

    /// Where an api-key is sent
    #[arg(long = "api-key-in", value_enum, default_value_t = ApiKeyPlacement::Header)]
    pub api_key_in: ApiKeyPlacement,

    /// Print response headers
    #[arg(long = "headers", action = ArgAction::SetTrue)]
    pub headers: bool,

    /// Print the response record as JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    pub json: bool,

    /// Exit with error on HTTP error status codes (4xx, 5xx)
    #[arg(long = "check-status", action = ArgAction::SetTrue)]
    pub check_status: bool,
}

/// Authentication type
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum AuthType {
    /// HTTP Basic authentication
    #[default]
    Basic,
    /// Bearer token authentication
    Bearer,
    /// API key header or query parameter
    #[value(name = "api-key", alias = "apikey")]
    ApiKey,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ApiKeyPlacement {
    #[default]
    Header,
    Query,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RequestCommand {
    /// List saved requests, most recently updated first
    List {
        /// Only requests in this collection (id or name)
        #[arg(long = "collection", short = 'c')]
        collection: Option<String>,
        /// Only requests whose name or URL contains this text
        #[arg(long = "search", short = 's')]
        search: Option<String>,
        #[arg(long = "limit")]
        limit: Option<usize>,
    },
    /// Show a saved request
    Show { id: String },
    /// Delete a saved request and its history
    Delete { id: String },
    /// Copy a saved request
    Duplicate { id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum CollectionCommand {
    List {
        #[arg(long = "search", short = 's')]
        search: Option<String>,
    },
    Create {
        name: String,
        #[arg(long = "description", short = 'd')]
        description: Option<String>,
    },
    /// Show a collection and its requests
    Show { collection: String },
    /// Delete a collection with its requests and their history
    Delete { collection: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum EnvCommand {
    List,
    Create {
        name: String,
        /// Variable as NAME=VALUE (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,
        /// Load variables from a .env file
        #[arg(long = "from-dotenv", value_name = "FILE")]
        from_dotenv: Option<PathBuf>,
        /// Make it the active environment
        #[arg(long = "activate", action = ArgAction::SetTrue)]
        activate: bool,
    },
    Show { env: String },
    /// Set a variable
    Set {
        env: String,
        name: String,
        value: String,
    },
    /// Remove a variable
    Unset { env: String, name: String },
    /// Make an environment the only active one
    Activate { env: String },
    Delete { env: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    List {
        /// Only responses to this request
        #[arg(long = "request", short = 'r')]
        request: Option<String>,
        #[arg(long = "limit", default_value_t = 20)]
        limit: usize,
    },
    Show {
        id: String,
        #[arg(long = "headers", action = ArgAction::SetTrue)]
        headers: bool,
    },
    /// Delete recorded responses
    Clear {
        /// Only responses older than this (e.g. "7d", "12h")
        #[arg(long = "older-than", value_name = "DURATION")]
        older_than: Option<String>,
        /// Only responses to this request
        #[arg(long = "request", short = 'r', conflicts_with = "older_than")]
        request: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum DataCommand {
    Export { path: PathBuf },
    Import { path: PathBuf },
}
