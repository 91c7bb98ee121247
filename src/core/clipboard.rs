//! Clipboard polling and the "looks like a JWT" heuristic.

use crate::core::base64url;

/// Something that can be asked for the current text clipboard contents.
pub trait ClipboardSource {
    /// The current clipboard text, or `None` if it holds no text.
    fn read_text(&mut self) -> Option<String>;
}

/// A clipboard with fixed contents, for hosts that receive the text from
/// elsewhere (stdin, a test).
#[derive(Debug, Clone, Default)]
pub struct StaticClipboard(pub Option<String>);

impl ClipboardSource for StaticClipboard {
    fn read_text(&mut self) -> Option<String> {
        self.0.clone()
    }
}

/// Whether `text` has exactly three `.`-separated parts that each decode
/// as base64url. The header and payload must be non-empty; the signature
/// may be empty. JSON content is not checked.
pub fn looks_like_jwt(text: &str) -> bool {
    let parts: Vec<&str> = text.split('.').collect();
    let [header, payload, signature] = parts.as_slice() else {
        return false;
    };
    !header.is_empty()
        && !payload.is_empty()
        && [header, payload, signature]
            .iter()
            .all(|part| base64url::is_decodable(part))
}
