//! Human-readable and machine-readable views of an [`EditableToken`].

use serde::Serialize;
use serde_json::Value;

use crate::core::token::EditableToken;
use crate::display::json_printer::render_section;
use crate::error::Segment;

/// The `--json` output document.
#[derive(Debug, Serialize)]
pub struct TokenReport {
    pub header: Option<Value>,
    pub payload: Option<Value>,
    pub signature: Option<String>,
    pub error: Option<String>,
}

impl TokenReport {
    pub fn from_token(token: &EditableToken) -> Self {
        Self {
            header: token.json_value(Segment::Header),
            payload: token.json_value(Segment::Payload),
            signature: token.signature_base64().map(str::to_owned),
            error: token.error_message(),
        }
    }
}

/// Render the header, payload and signature as labelled sections.
pub fn render_human(token: &EditableToken) -> String {
    let signature = match (token.signature_base64(), token.signature_len()) {
        (Some(sig), Some(len)) => format!("{sig}\n({len} bytes, not verified)"),
        (Some(sig), None) => format!("{sig}\n(not valid base64url)"),
        (None, _) => "(none)".to_string(),
    };

    [
        render_section("Header", token.header_json()),
        render_section("Payload", token.payload_json()),
        render_section("Signature", Some(signature.as_str())),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
                         eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IlRlc3QgVXNlciIsImlhdCI6MTUxNjIzOTAyMn0.\
                         SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";

    #[test]
    fn test_render_human_lists_all_sections() {
        let out = render_human(&EditableToken::new(TOKEN));
        assert!(out.contains("--- Header ---"));
        assert!(out.contains("\"alg\": \"HS256\""));
        assert!(out.contains("--- Payload ---"));
        assert!(out.contains("\"name\": \"Test User\""));
        assert!(out.contains("--- Signature ---"));
        assert!(out.contains("(32 bytes, not verified)"));
    }

    #[test]
    fn test_render_human_unsigned_token() {
        let out = render_human(&EditableToken::new("eyJhbGciOiJub25lIn0.e30."));
        assert!(out.contains("--- Signature ---\n(none)"));
    }

    #[test]
    fn test_report_carries_values_and_error() {
        let token = EditableToken::new("eyJhbGciOiJub25lIn0.bm90IGpzb24.");
        let report = TokenReport::from_token(&token);
        assert_eq!(report.header, Some(serde_json::json!({"alg": "none"})));
        assert_eq!(report.payload, None);
        assert_eq!(report.signature, None);
        assert!(report.error.unwrap().contains("payload"));
    }
}
