//! Base64url encoding with JWT padding rules.
//!
//! Encoding always produces the unpadded URL-safe alphabet. Decoding is
//! lenient: it accepts padded or unpadded input, restores padding itself,
//! and skips characters outside the base64 alphabet (stray whitespace or
//! line breaks pasted along with a token).

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use thiserror::Error;

/// Standard-alphabet engine used after reversing the URL-safe substitution.
///
/// Trailing bits are tolerated so that non-canonical encodings from other
/// producers still decode.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Why a base64url value could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The length leaves a single dangling character that no padding can fix.
    #[error("length {length} cannot be padded to a whole base64 quantum")]
    DanglingCharacter {
        /// Length of the input after reversing the URL-safe substitution.
        length: usize,
    },

    /// Nothing decodable remained once unknown characters were skipped.
    #[error("no base64 characters found")]
    NoContent,

    /// The remaining characters are not valid base64.
    #[error("invalid base64: {reason}")]
    Invalid {
        /// Message from the underlying decoder.
        reason: String,
    },
}

/// Encode bytes as unpadded base64url.
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode a base64url value, restoring padding as needed.
///
/// Padding is computed from the length of the input after `-`/`_` are
/// mapped back to `+`/`/`. A remainder of one character is rejected
/// outright. Characters outside the base64 alphabet are then skipped.
///
/// # Errors
///
/// Returns [`DecodeError`] if the length is unrecoverable, if a non-empty
/// input contains no base64 characters at all, or if the remaining text is
/// not valid base64.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let mut standard: String = text
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    let length = standard.chars().count();
    match length % 4 {
        1 => return Err(DecodeError::DanglingCharacter { length }),
        0 => {}
        remainder => standard.extend(std::iter::repeat_n('=', 4 - remainder)),
    }

    let filtered: String = standard.chars().filter(is_base64_char).collect();
    if filtered.trim_end_matches('=').is_empty() {
        return Err(DecodeError::NoContent);
    }

    LENIENT_STANDARD
        .decode(filtered.as_bytes())
        .map_err(|e| DecodeError::Invalid {
            reason: e.to_string(),
        })
}

/// Whether `text` decodes as base64url without error.
pub fn is_decodable(text: &str) -> bool {
    decode(text).is_ok()
}

fn is_base64_char(c: &char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')
}
