//! Handler for the `decode` subcommand.
//!
//! Decodes and pretty-prints a JWT's header and payload without
//! verifying its signature. Supports reading the token from a CLI
//! argument, environment variable, stdin, or the saved session.

use anyhow::Result;
use tracing::warn;

use crate::cli::DecodeArgs;
use crate::commands::input::resolve_token;
use crate::commands::open_session;
use crate::config::Config;
use crate::core::token::{EditableToken, TokenState};
use crate::display::token_view::{TokenReport, render_human};
use crate::error::WorkbenchError;

/// Execute the `decode` subcommand with the given arguments.
pub fn execute(args: &DecodeArgs, config: &Config) -> Result<()> {
    let input = resolve_token(args.token.as_deref(), args.token_env.as_deref())?;

    match input {
        Some(text) => {
            let token = EditableToken::with_policy(text.as_str(), config.part_edit);
            report(&token, args.json)?;
            // Only tokens that decoded cleanly replace the saved one.
            if let Err(e) = open_session(config).and_then(|mut session| {
                session.set_raw_token(token.raw_token())?;
                Ok(())
            }) {
                warn!(error = %format!("{e:#}"), "could not save session token");
            }
            Ok(())
        }
        None => {
            let session = open_session(config)?;
            if session.token().state() == TokenState::Empty {
                return Err(WorkbenchError::NoTokenProvided.into());
            }
            report(session.token(), args.json)
        }
    }
}

/// Print `token`, failing if any part of it did not decode.
fn report(token: &EditableToken, json: bool) -> Result<()> {
    if token.state() == TokenState::Empty {
        return Err(WorkbenchError::NoTokenProvided.into());
    }

    if json {
        let report = TokenReport::from_token(token);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if token.state() != TokenState::Malformed {
        println!("{}", render_human(token));
    }

    match token.error_message() {
        Some(message) => Err(WorkbenchError::TokenInvalid { message }.into()),
        None => Ok(()),
    }
}
