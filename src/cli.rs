//! CLI argument definitions for jwt-workbench.
//!
//! Uses `clap` derive macros to define the command-line interface.
//! Each subcommand has its own argument struct for type-safe parsing.
//!
//! # Security
//!
//! `DecodeArgs` and `EditArgs` implement custom `Debug` to redact token
//! material and prevent accidental leakage through debug formatting,
//! error chains, or logging.

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, PartEditMode};

/// An offline JWT decoder and editor that keeps the raw token and its
/// decoded header and payload in sync.
#[derive(Debug, Parser)]
#[command(name = "jwt-workbench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the state file holding the saved session token.
    #[arg(long, global = true, value_name = "PATH", env = "JWT_WORKBENCH_STORE")]
    pub store: Option<PathBuf>,

    /// Namespace for saved session state.
    #[arg(long, global = true, value_name = "ID", env = "JWT_WORKBENCH_TOOL_ID")]
    pub tool_id: Option<String>,

    /// What editing a base64url part does to the decoded JSON.
    #[arg(long, global = true, value_enum, default_value_t = PartEditMode::Outward)]
    pub part_edit: PartEditMode,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Resolve the global options into a [`Config`].
    pub fn config(&self) -> Config {
        Config::resolve(self.store.clone(), self.tool_id.clone(), self.part_edit)
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode and inspect a JWT without verifying its signature.
    Decode(DecodeArgs),

    /// Edit a JWT's header, payload or parts and print the rebuilt token.
    Edit(EditArgs),

    /// Import a JWT from clipboard text read on stdin.
    Import,

    /// Show or clear the saved session token.
    #[command(subcommand)]
    Session(SessionCommand),
}

/// Arguments for the `decode` subcommand.
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// The JWT to decode. If omitted, reads from stdin, then the session.
    pub token: Option<String>,

    /// Read the token from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub token_env: Option<String>,

    /// Output raw JSON (machine-readable).
    #[arg(long)]
    pub json: bool,
}

/// Custom `Debug` that redacts the token field to prevent accidental leakage.
impl fmt::Debug for DecodeArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeArgs")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("token_env", &self.token_env)
            .field("json", &self.json)
            .finish()
    }
}

/// Arguments for the `edit` subcommand.
///
/// Part edits are applied before JSON edits.
#[derive(clap::Args)]
pub struct EditArgs {
    /// The JWT to edit. If omitted, reads from stdin, then the session.
    pub token: Option<String>,

    /// Read the token from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub token_env: Option<String>,

    /// Replace the base64url header part.
    #[arg(long, value_name = "B64")]
    pub header_b64: Option<String>,

    /// Replace the base64url payload part.
    #[arg(long, value_name = "B64")]
    pub payload_b64: Option<String>,

    /// Replace the signature part. An empty value removes it.
    #[arg(long, value_name = "B64")]
    pub signature: Option<String>,

    /// Replace the header with this JSON text.
    #[arg(long, value_name = "JSON")]
    pub header: Option<String>,

    /// Replace the payload with this JSON text.
    #[arg(long, value_name = "JSON")]
    pub payload: Option<String>,
}

/// Custom `Debug` that redacts every token-bearing field.
impl fmt::Debug for EditArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("EditArgs")
            .field("token", &redact(&self.token))
            .field("token_env", &self.token_env)
            .field("header_b64", &redact(&self.header_b64))
            .field("payload_b64", &redact(&self.payload_b64))
            .field("signature", &redact(&self.signature))
            .field("header", &redact(&self.header))
            .field("payload", &redact(&self.payload))
            .finish()
    }
}

/// `session` subcommands.
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Print the saved token.
    Show,
    /// Clear the saved token.
    Clear,
}
