//! Decoder sessions: an [`EditableToken`] plus its saved state.
//!
//! A [`ToolContext`] namespaces keys as `tool.<id>.<key>` and stores each
//! value as a JSON document. A [`DecoderSession`] restores the last raw
//! token when it opens and saves it whenever the raw token changes through
//! the session.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::core::clipboard::{ClipboardSource, looks_like_jwt};
use crate::core::token::{EditableToken, Part, PartEditPolicy};
use crate::error::{Segment, WorkbenchError};
use crate::store::KeyValueStore;

/// Key under which the raw token is saved.
pub const RAW_TOKEN_KEY: &str = "rawToken";

/// Tool identifier used when none is configured.
pub const DEFAULT_TOOL_ID: &str = "jwtdecoder";

/// Per-tool view of a [`KeyValueStore`].
#[derive(Debug)]
pub struct ToolContext<S> {
    tool_id: String,
    store: S,
}

impl<S: KeyValueStore> ToolContext<S> {
    pub fn new(tool_id: impl Into<String>, store: S) -> Self {
        Self {
            tool_id: tool_id.into(),
            store,
        }
    }

    pub fn tool_id(&self) -> &str {
        &self.tool_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The fully qualified store key for `key`.
    pub fn full_key(&self, key: &str) -> String {
        format!("tool.{}.{}", self.tool_id, key)
    }

    /// Serialize `value` as JSON and save it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be encoded as JSON or the store
    /// cannot be written.
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), WorkbenchError> {
        let full_key = self.full_key(key);
        let encoded = serde_json::to_string(value).map_err(|e| WorkbenchError::ValueEncode {
            key: full_key.clone(),
            reason: e.to_string(),
        })?;
        self.store.save(&full_key, &encoded)
    }

    /// Load and deserialize the value saved under `key`.
    ///
    /// A value that no longer deserializes as `T` is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, WorkbenchError> {
        let full_key = self.full_key(key);
        let Some(encoded) = self.store.load(&full_key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&encoded) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = %full_key, error = %e, "ignoring undecodable saved value");
                Ok(None)
            }
        }
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn remove(&mut self, key: &str) -> Result<(), WorkbenchError> {
        let full_key = self.full_key(key);
        self.store.remove(&full_key)
    }
}

/// One open decoder: the token being edited and where it is saved.
#[derive(Debug)]
pub struct DecoderSession<S> {
    context: ToolContext<S>,
    token: EditableToken,
}

impl<S: KeyValueStore> DecoderSession<S> {
    /// Open a session, restoring the saved raw token if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn open(context: ToolContext<S>, policy: PartEditPolicy) -> Result<Self, WorkbenchError> {
        let saved: Option<String> = context.load(RAW_TOKEN_KEY)?;
        debug!(
            tool_id = context.tool_id(),
            restored = saved.is_some(),
            "decoder session opened"
        );
        let token = EditableToken::with_policy(saved.unwrap_or_default(), policy);
        Ok(Self { context, token })
    }

    pub fn token(&self) -> &EditableToken {
        &self.token
    }

    pub fn context(&self) -> &ToolContext<S> {
        &self.context
    }

    /// Replace the raw token and save it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn set_raw_token(&mut self, raw_token: impl Into<String>) -> Result<(), WorkbenchError> {
        self.token.set_raw_token(raw_token);
        self.persist()
    }

    /// Replace a segment's JSON text and save the rebuilt raw token.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn set_json(&mut self, segment: Segment, json: &str) -> Result<(), WorkbenchError> {
        match segment {
            Segment::Header => self.token.set_header_json(json),
            Segment::Payload => self.token.set_payload_json(json),
        }
        self.persist()
    }

    /// Replace a base64url part and save the rebuilt raw token.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn set_part(&mut self, part: Part, value: &str) -> Result<(), WorkbenchError> {
        self.token
            .set_part(part, (!value.is_empty()).then(|| value.to_string()));
        self.persist()
    }

    /// Empty the token and save the empty state.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear(&mut self) -> Result<(), WorkbenchError> {
        self.set_raw_token("")
    }

    /// Import the clipboard text if it is a JWT different from the current
    /// token. Returns whether the token was replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the imported token cannot be saved.
    pub fn import_from_clipboard(
        &mut self,
        clipboard: &mut dyn ClipboardSource,
    ) -> Result<bool, WorkbenchError> {
        let Some(text) = clipboard.read_text() else {
            debug!("clipboard holds no text");
            return Ok(false);
        };
        let candidate = text.trim();
        if candidate.is_empty() || candidate == self.token.raw_token() {
            debug!("clipboard text is empty or already loaded");
            return Ok(false);
        }
        if !looks_like_jwt(candidate) {
            debug!("clipboard text does not look like a JWT");
            return Ok(false);
        }

        self.set_raw_token(candidate)?;
        info!(tool_id = self.context.tool_id(), "imported token from clipboard");
        Ok(true)
    }

    fn persist(&mut self) -> Result<(), WorkbenchError> {
        self.context.save(RAW_TOKEN_KEY, self.token.raw_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clipboard::StaticClipboard;
    use crate::store::MemoryStore;

    const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxMjM0In0.sig";

    fn session() -> DecoderSession<MemoryStore> {
        DecoderSession::open(
            ToolContext::new(DEFAULT_TOOL_ID, MemoryStore::new()),
            PartEditPolicy::Outward,
        )
        .unwrap()
    }

    #[test]
    fn test_full_key_is_namespaced() {
        let context = ToolContext::new("jwtdecoder", MemoryStore::new());
        assert_eq!(context.full_key("rawToken"), "tool.jwtdecoder.rawToken");
    }

    #[test]
    fn test_context_stores_json_envelope() {
        let mut context = ToolContext::new("t", MemoryStore::new());
        context.save("k", "a\"b").unwrap();
        assert_eq!(
            context.store().load("tool.t.k").unwrap().as_deref(),
            Some("\"a\\\"b\"")
        );
        assert_eq!(context.load::<String>("k").unwrap().as_deref(), Some("a\"b"));
    }

    #[test]
    fn test_context_ignores_undecodable_value() {
        let mut store = MemoryStore::new();
        store.save("tool.t.k", "not json").unwrap();
        let context = ToolContext::new("t", store);
        assert_eq!(context.load::<String>("k").unwrap(), None);
    }

    #[test]
    fn test_new_session_starts_empty() {
        let session = session();
        assert_eq!(session.token().raw_token(), "");
        assert_eq!(session.token().error_message(), None);
    }

    #[test]
    fn test_session_restores_saved_token() {
        let mut first = session();
        first.set_raw_token(TOKEN).unwrap();
        let store = first.context().store().clone();

        let reopened =
            DecoderSession::open(ToolContext::new(DEFAULT_TOOL_ID, store), PartEditPolicy::Outward)
                .unwrap();
        assert_eq!(reopened.token().raw_token(), TOKEN);
        assert!(reopened.token().header_json().is_some());
    }

    #[test]
    fn test_json_edit_is_saved() {
        let mut session = session();
        session.set_raw_token(TOKEN).unwrap();
        session.set_json(Segment::Payload, "{}").unwrap();

        let saved: Option<String> = session.context().load(RAW_TOKEN_KEY).unwrap();
        assert_eq!(saved.as_deref(), Some("eyJhbGciOiJIUzI1NiJ9.e30.sig"));
    }

    #[test]
    fn test_part_edit_is_saved() {
        let mut session = session();
        session.set_raw_token(TOKEN).unwrap();
        session.set_part(Part::Signature, "").unwrap();

        let saved: Option<String> = session.context().load(RAW_TOKEN_KEY).unwrap();
        assert_eq!(
            saved.as_deref(),
            Some("eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxMjM0In0.")
        );
    }

    #[test]
    fn test_clear_saves_empty_token() {
        let mut session = session();
        session.set_raw_token(TOKEN).unwrap();
        session.clear().unwrap();

        assert_eq!(session.token().raw_token(), "");
        let saved: Option<String> = session.context().load(RAW_TOKEN_KEY).unwrap();
        assert_eq!(saved.as_deref(), Some(""));
    }

    #[test]
    fn test_unencodable_value_reports_key() {
        let mut context = ToolContext::new("x", MemoryStore::new());
        let value: std::collections::BTreeMap<(u8, u8), u8> = [((1, 2), 3)].into();

        let err = context.save("pairs", &value).unwrap_err();

        assert!(matches!(
            &err,
            WorkbenchError::ValueEncode { key, .. } if key == "tool.x.pairs"
        ));
        assert!(!err.to_string().contains("state file"));
    }

    #[test]
    fn test_clipboard_import_takes_trimmed_jwt() {
        let mut session = session();
        let mut clipboard = StaticClipboard(Some(format!("  {TOKEN}\n")));

        assert!(session.import_from_clipboard(&mut clipboard).unwrap());
        assert_eq!(session.token().raw_token(), TOKEN);
    }

    #[test]
    fn test_clipboard_import_skips_current_token() {
        let mut session = session();
        session.set_raw_token(TOKEN).unwrap();
        let mut clipboard = StaticClipboard(Some(TOKEN.to_string()));

        assert!(!session.import_from_clipboard(&mut clipboard).unwrap());
    }

    #[test]
    fn test_clipboard_import_skips_non_jwt_text() {
        let mut session = session();
        session.set_raw_token(TOKEN).unwrap();

        for text in [
            None,
            Some(""),
            Some("   "),
            Some("hello world"),
            Some("a.b"),
            Some(".."),
            Some("e30.."),
        ] {
            let mut clipboard = StaticClipboard(text.map(str::to_string));
            assert!(!session.import_from_clipboard(&mut clipboard).unwrap());
        }
        assert_eq!(session.token().raw_token(), TOKEN);
    }
}
