//! Command handlers for each CLI subcommand.
//!
//! Each subcommand is implemented in its own module and exposes
//! a single `execute` function that receives the parsed arguments.

pub mod decode;
pub mod edit;
pub mod import;
pub mod input;
pub mod session;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::session::{DecoderSession, ToolContext};
use crate::store::JsonFileStore;

/// Open the decoder session described by `config`.
pub fn open_session(config: &Config) -> Result<DecoderSession<JsonFileStore>> {
    let store = JsonFileStore::new(&config.store_path);
    let context = ToolContext::new(config.tool_id.clone(), store);
    DecoderSession::open(context, config.part_edit).context("failed to open decoder session")
}
