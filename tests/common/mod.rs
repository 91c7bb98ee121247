//! Shared test fixtures and helper utilities.
//!
//! Provides pre-built JWT tokens with known claims and a per-test
//! workbench whose session state lives in a temporary directory.
#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// A valid HS256-signed JWT for testing.
///
/// Header: `{"alg":"HS256","typ":"JWT"}`
/// Payload: `{"sub":"1234567890","name":"Test User","iat":1516239022}`
pub const VALID_HS256_TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
     eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IlRlc3QgVXNlciIsImlhdCI6MTUxNjIzOTAyMn0.\
     SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";

/// The signature part of [`VALID_HS256_TOKEN`].
pub const VALID_HS256_SIGNATURE: &str = "SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";

/// An unsigned token: `{"alg":"none"}` . `{}` . (empty)
pub const UNSIGNED_TOKEN: &str = "eyJhbGciOiJub25lIn0.e30.";

/// A token whose payload decodes to the text `not json`.
pub const PAYLOAD_NOT_JSON_TOKEN: &str = "eyJhbGciOiJub25lIn0.bm90IGpzb24.sig";

/// A malformed token with only two parts (missing signature).
pub const MALFORMED_TOKEN_TWO_PARTS: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";

/// A completely invalid token string.
pub const INVALID_TOKEN: &str = "not-a-valid-jwt";

/// A workbench with its own empty state file.
pub struct Workbench {
    dir: TempDir,
}

impl Workbench {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("state.json")
    }

    /// A command for the binary pointed at this workbench's state file.
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("jwt-workbench");
        cmd.env("JWT_WORKBENCH_STORE", self.store_path())
            .env_remove("JWT_WORKBENCH_TOOL_ID");
        cmd
    }
}

/// Decode one base64url part of a token as JSON.
pub fn decode_part(token: &str, index: usize) -> serde_json::Value {
    let part = token.trim().split('.').nth(index).unwrap();
    let bytes = jwt_workbench::base64url::decode(part).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
