//! Runtime configuration.
//!
//! Values come from CLI flags, with environment variable fallbacks handled
//! by clap. [`Config`] is the resolved result the commands work from.

use std::path::PathBuf;

use clap::ValueEnum;
use tracing::warn;

use crate::core::token::PartEditPolicy;
use crate::session::DEFAULT_TOOL_ID;

/// Directory name used under the platform config directory.
pub const APP_DIR_NAME: &str = "jwt-workbench";

/// File name of the state store.
pub const STATE_FILE_NAME: &str = "state.json";

/// CLI spelling of [`PartEditPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PartEditMode {
    /// Part edits only rebuild the raw token.
    #[default]
    Outward,
    /// Part edits also re-decode the header and payload JSON.
    Redecode,
}

impl From<PartEditMode> for PartEditPolicy {
    fn from(mode: PartEditMode) -> Self {
        match mode {
            PartEditMode::Outward => PartEditPolicy::Outward,
            PartEditMode::Redecode => PartEditPolicy::Redecode,
        }
    }
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path of the JSON state file.
    pub store_path: PathBuf,
    /// Namespace for persisted keys.
    pub tool_id: String,
    /// What direct part edits do to the JSON fields.
    pub part_edit: PartEditPolicy,
}

impl Config {
    /// Build a config, falling back to defaults for unset values.
    pub fn resolve(
        store_path: Option<PathBuf>,
        tool_id: Option<String>,
        part_edit: PartEditMode,
    ) -> Self {
        Self {
            store_path: store_path.unwrap_or_else(default_store_path),
            tool_id: tool_id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TOOL_ID.to_string()),
            part_edit: part_edit.into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::resolve(None, None, PartEditMode::default())
    }
}

/// `<config dir>/jwt-workbench/state.json`, or a path relative to the
/// working directory when the platform has no config directory.
pub fn default_store_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join(APP_DIR_NAME).join(STATE_FILE_NAME),
        None => {
            warn!("could not determine OS config directory, using ./{APP_DIR_NAME}");
            PathBuf::from(".").join(APP_DIR_NAME).join(STATE_FILE_NAME)
        }
    }
}
