//! Error types for jwt-workbench.
//!
//! [`TokenError`] covers everything that can go wrong while decoding a
//! token. These errors are never returned from the editing API; the
//! token model records them and renders them as its error message.
//! [`WorkbenchError`] covers the collaborators around the token (input
//! resolution, persistence) and does propagate to the CLI boundary.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The decoded segments of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Header,
    Payload,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Segment::Header => "header",
            Segment::Payload => "payload",
        })
    }
}

/// Errors produced while decoding a token or one of its segments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token does not split into exactly three `.`-separated parts.
    #[error("invalid token format: expected 'header.payload.signature' structure")]
    InvalidTokenFormat,

    /// A segment is not valid base64url.
    #[error("failed to decode {segment}: invalid base64url encoding")]
    InvalidBase64 {
        /// Which segment failed to decode.
        segment: Segment,
    },

    /// A segment decoded to bytes that no supported charset can read.
    #[error("failed to decode {segment}: bytes are not text in any supported encoding")]
    UndecodableText {
        /// Which segment failed to decode.
        segment: Segment,
    },

    /// A segment's text is not valid JSON.
    #[error("failed to parse {segment} as JSON: {reason}")]
    InvalidJson {
        /// Which segment failed to parse.
        segment: Segment,
        /// Description of the parsing failure.
        reason: String,
    },

    /// A segment's JSON is valid but its top-level value is not an object.
    #[error("{segment} JSON is not an object")]
    NotJsonObject {
        /// Which segment held the non-object value.
        segment: Segment,
    },
}

impl TokenError {
    /// The segment this error concerns, if it is segment-specific.
    pub fn segment(&self) -> Option<Segment> {
        match self {
            TokenError::InvalidTokenFormat => None,
            TokenError::InvalidBase64 { segment }
            | TokenError::UndecodableText { segment }
            | TokenError::InvalidJson { segment, .. }
            | TokenError::NotJsonObject { segment } => Some(*segment),
        }
    }
}

/// Errors from token input resolution and session persistence.
#[derive(Debug, Error)]
pub enum WorkbenchError {
    /// No token was provided via any input method.
    #[error(
        "no token provided: pass a token as an argument, via --token-env, through stdin, or save one in the session"
    )]
    NoTokenProvided,

    /// The environment variable name cannot be looked up.
    #[error("invalid environment variable name '{name}'")]
    InvalidEnvVarName {
        /// The rejected name.
        name: String,
    },

    /// The specified environment variable is not set.
    #[error("environment variable '{name}' is not set")]
    EnvVarNotFound {
        /// Name of the missing environment variable.
        name: String,
    },

    /// Reading the token from stdin failed.
    #[error("failed to read token from stdin: {source}")]
    StdinRead {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the state file failed.
    #[error("failed to access state file '{}': {source}", path.display())]
    StoreIo {
        /// Path of the state file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The state file or a stored value is not in the expected format.
    #[error("state file '{}' is corrupt: {reason}", path.display())]
    StoreFormat {
        /// Path of the state file.
        path: PathBuf,
        /// Description of the format problem.
        reason: String,
    },

    /// A value could not be encoded for saving.
    #[error("failed to encode value for '{key}': {reason}")]
    ValueEncode {
        /// Fully qualified store key.
        key: String,
        /// Description of the encoding problem.
        reason: String,
    },

    /// A token carried one or more decode errors.
    #[error("{message}")]
    TokenInvalid {
        /// The token's composed error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_token_format_display() {
        assert_eq!(
            TokenError::InvalidTokenFormat.to_string(),
            "invalid token format: expected 'header.payload.signature' structure"
        );
    }

    #[test]
    fn test_invalid_base64_display_includes_segment() {
        let err = TokenError::InvalidBase64 {
            segment: Segment::Header,
        };
        assert_eq!(
            err.to_string(),
            "failed to decode header: invalid base64url encoding"
        );
    }

    #[test]
    fn test_invalid_json_display_includes_segment_and_reason() {
        let err = TokenError::InvalidJson {
            segment: Segment::Payload,
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse payload as JSON: expected value at line 1 column 1"
        );
    }

    #[test]
    fn test_not_json_object_display() {
        let err = TokenError::NotJsonObject {
            segment: Segment::Payload,
        };
        assert_eq!(err.to_string(), "payload JSON is not an object");
    }

    #[test]
    fn test_undecodable_text_display() {
        let err = TokenError::UndecodableText {
            segment: Segment::Header,
        };
        assert!(err.to_string().contains("header"));
        assert!(err.to_string().contains("encoding"));
    }

    #[test]
    fn test_segment_accessor() {
        assert_eq!(TokenError::InvalidTokenFormat.segment(), None);
        assert_eq!(
            TokenError::NotJsonObject {
                segment: Segment::Header
            }
            .segment(),
            Some(Segment::Header)
        );
    }

    #[test]
    fn test_no_token_provided_display() {
        let err = WorkbenchError::NoTokenProvided;
        assert!(err.to_string().contains("no token provided"));
        assert!(err.to_string().contains("--token-env"));
        assert!(err.to_string().contains("stdin"));
    }

    #[test]
    fn test_env_var_not_found_display() {
        let err = WorkbenchError::EnvVarNotFound {
            name: "JWT_TOKEN".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "environment variable 'JWT_TOKEN' is not set"
        );
    }

    #[test]
    fn test_store_format_display_includes_path() {
        let err = WorkbenchError::StoreFormat {
            path: PathBuf::from("/tmp/state.json"),
            reason: "expected an object".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "state file '/tmp/state.json' is corrupt: expected an object"
        );
    }

    #[test]
    fn test_value_encode_display_names_key() {
        let err = WorkbenchError::ValueEncode {
            key: "tool.x.rawToken".to_string(),
            reason: "key must be a string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to encode value for 'tool.x.rawToken': key must be a string"
        );
    }

    #[test]
    fn test_errors_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TokenError>();
        assert_send_sync::<WorkbenchError>();
    }
}
