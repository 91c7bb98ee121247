//! Handler for the `import` subcommand.
//!
//! Treats stdin as the clipboard and applies the auto-import rule: the
//! text replaces the saved token only if it looks like a JWT and differs
//! from what is already saved.

use std::io;

use anyhow::Result;

use crate::commands::input::read_all;
use crate::commands::open_session;
use crate::config::Config;
use crate::core::clipboard::StaticClipboard;

/// Execute the `import` subcommand.
pub fn execute(config: &Config) -> Result<()> {
    let text = read_all(io::stdin().lock())?;
    let mut clipboard = StaticClipboard(Some(text.to_string()));
    let mut session = open_session(config)?;

    if session.import_from_clipboard(&mut clipboard)? {
        println!("imported");
    } else {
        println!("unchanged");
    }
    Ok(())
}
