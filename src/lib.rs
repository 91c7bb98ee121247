//! jwt-workbench: an offline JWT decoder and editor.
//!
//! The heart of the crate is [`core::token::EditableToken`], which keeps a
//! raw token and its decoded header and payload consistent as either side
//! is edited. [`session::DecoderSession`] adds persistence and clipboard
//! import on top of it; the `jwt-workbench` binary is a thin CLI over both.

#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod display;
pub mod error;
pub mod session;
pub mod store;

pub use crate::core::base64url;
pub use crate::core::token::{EditableToken, Field, Part, PartEditPolicy, TokenFields, TokenState};
pub use crate::error::{Segment, TokenError, WorkbenchError};
