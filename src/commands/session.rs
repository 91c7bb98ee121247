//! Handler for the `session` subcommands.

use anyhow::Result;

use crate::cli::SessionCommand;
use crate::commands::open_session;
use crate::config::Config;

/// Execute a `session` subcommand.
pub fn execute(command: &SessionCommand, config: &Config) -> Result<()> {
    let mut session = open_session(config)?;
    match command {
        SessionCommand::Show => {
            let raw = session.token().raw_token();
            if raw.is_empty() {
                eprintln!("no saved token");
            } else {
                println!("{raw}");
            }
        }
        SessionCommand::Clear => {
            session.clear()?;
            println!("cleared");
        }
    }
    Ok(())
}
