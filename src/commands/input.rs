//! Token input resolution shared by the subcommands.
//!
//! A token can come from a positional argument, an environment variable,
//! or piped stdin, in that order. Buffers are wrapped in `Zeroizing` so
//! token text is wiped from memory when dropped.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::error::WorkbenchError;

/// Resolve the token from the argument, the named environment variable,
/// or the process's stdin when it is not a terminal.
///
/// Returns `Ok(None)` when no source supplied anything, so the caller can
/// fall back to the saved session token.
///
/// # Errors
///
/// Returns an error if the argument is empty, the environment variable
/// name is invalid or unset, or stdin cannot be read.
pub fn resolve_token(
    token: Option<&str>,
    token_env: Option<&str>,
) -> Result<Option<Zeroizing<String>>, WorkbenchError> {
    let stdin = io::stdin();
    let piped = (!stdin.is_terminal()).then(|| stdin.lock());
    resolve_token_from(token, token_env, piped)
}

/// [`resolve_token`] with an explicit stdin reader.
///
/// # Errors
///
/// See [`resolve_token`].
pub fn resolve_token_from<R: Read>(
    token: Option<&str>,
    token_env: Option<&str>,
    stdin: Option<R>,
) -> Result<Option<Zeroizing<String>>, WorkbenchError> {
    if let Some(token) = token {
        return non_blank(Zeroizing::new(token.to_string()))
            .map(Some)
            .ok_or(WorkbenchError::NoTokenProvided);
    }

    if let Some(name) = token_env {
        let value = read_env_var(name)?;
        return non_blank(value)
            .map(Some)
            .ok_or(WorkbenchError::NoTokenProvided);
    }

    match stdin {
        Some(reader) => Ok(non_blank(read_all(reader)?)),
        None => Ok(None),
    }
}

/// Read all of `reader` into a zeroizing buffer.
///
/// # Errors
///
/// Returns an error if reading fails or the input is not UTF-8.
pub fn read_all<R: Read>(mut reader: R) -> Result<Zeroizing<String>, WorkbenchError> {
    let mut buffer = Zeroizing::new(String::new());
    reader
        .read_to_string(&mut buffer)
        .map_err(|source| WorkbenchError::StdinRead { source })?;
    Ok(buffer)
}

fn read_env_var(name: &str) -> Result<Zeroizing<String>, WorkbenchError> {
    if name.is_empty() || name.contains('=') || name.contains('\0') {
        return Err(WorkbenchError::InvalidEnvVarName {
            name: name.to_string(),
        });
    }
    std::env::var(name)
        .map(Zeroizing::new)
        .map_err(|_| WorkbenchError::EnvVarNotFound {
            name: name.to_string(),
        })
}

/// Trim surrounding whitespace, returning `None` if nothing is left.
fn non_blank(text: Zeroizing<String>) -> Option<Zeroizing<String>> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| Zeroizing::new(trimmed.to_string()))
}
