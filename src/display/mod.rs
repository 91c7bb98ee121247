//! Terminal display and formatting utilities.
//!
//! Renders a token as labelled sections for humans, or as a single JSON
//! document for machines.

pub mod json_printer;
pub mod token_view;
