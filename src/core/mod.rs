//! Core token logic.
//!
//! Everything here is independent of the CLI and of persistence, so a UI
//! layer can bind directly to [`token::EditableToken`].

pub mod base64url;
pub mod charset;
pub mod clipboard;
pub mod token;
