//! Handler for the `edit` subcommand.
//!
//! Loads a token, applies part edits and then JSON edits through the
//! session, and prints the rebuilt raw token. Edits are never refused:
//! invalid JSON is encoded as typed and reported as a warning.

use anyhow::Result;

use crate::cli::EditArgs;
use crate::commands::input::resolve_token;
use crate::commands::open_session;
use crate::config::Config;
use crate::core::token::Part;
use crate::error::Segment;

/// Execute the `edit` subcommand with the given arguments.
pub fn execute(args: &EditArgs, config: &Config) -> Result<()> {
    let input = resolve_token(args.token.as_deref(), args.token_env.as_deref())?;
    let mut session = open_session(config)?;
    if let Some(text) = input {
        session.set_raw_token(text.as_str())?;
    }

    let part_edits = [
        (Part::Header, &args.header_b64),
        (Part::Payload, &args.payload_b64),
        (Part::Signature, &args.signature),
    ];
    for (part, value) in part_edits {
        if let Some(value) = value {
            session.set_part(part, value)?;
        }
    }

    let json_edits = [
        (Segment::Header, &args.header),
        (Segment::Payload, &args.payload),
    ];
    for (segment, value) in json_edits {
        if let Some(value) = value {
            session.set_json(segment, value)?;
        }
    }

    println!("{}", session.token().raw_token());
    if let Some(message) = session.token().error_message() {
        eprintln!("Warning: {message}");
    }
    Ok(())
}
