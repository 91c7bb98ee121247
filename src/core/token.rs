//! The editable token model.
//!
//! [`EditableToken`] owns the raw token text together with its three
//! base64url parts and the pretty-printed JSON of the header and payload.
//! Every mutation is a single synchronous call that brings all dependent
//! fields up to date before it returns:
//!
//! - [`EditableToken::set_raw_token`] splits and decodes the token,
//!   replacing every part and JSON field.
//! - [`EditableToken::set_json`] re-encodes one segment's JSON text and
//!   rebuilds the raw token, keeping the signature verbatim. The edited
//!   text is stored as typed, even when it is not valid JSON.
//! - [`EditableToken::set_part`] replaces one base64url part and rebuilds
//!   the raw token. Whether the JSON fields follow is a [`PartEditPolicy`].
//!
//! Decode failures never surface as `Err`. They are collected per segment
//! and exposed through [`EditableToken::error_message`].

use std::fmt;
use std::ops::{Deref, DerefMut};

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::core::base64url;
use crate::core::charset::decode_text;
use crate::error::{Segment, TokenError};

/// Separator between messages when more than one segment failed.
pub const ERROR_SEPARATOR: &str = "; ";

/// One of the three base64url parts of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Header,
    Payload,
    Signature,
}

impl Part {
    fn segment(self) -> Option<Segment> {
        match self {
            Part::Header => Some(Segment::Header),
            Part::Payload => Some(Segment::Payload),
            Part::Signature => None,
        }
    }
}

/// What happens to the JSON fields when a base64url part is edited directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartEditPolicy {
    /// Only the raw token is rebuilt; the JSON fields keep their text.
    #[default]
    Outward,
    /// The rebuilt raw token is decoded again, refreshing the JSON fields.
    Redecode,
}

/// A field of [`EditableToken`] that observers are notified about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    RawToken,
    HeaderBase64,
    PayloadBase64,
    SignatureBase64,
    HeaderJson,
    PayloadJson,
    ErrorMessage,
}

impl Field {
    const ALL: [Field; 7] = [
        Field::RawToken,
        Field::HeaderBase64,
        Field::PayloadBase64,
        Field::SignatureBase64,
        Field::HeaderJson,
        Field::PayloadJson,
        Field::ErrorMessage,
    ];
}

/// Coarse classification of the current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// The raw token is empty or whitespace.
    Empty,
    /// The raw token does not have three parts.
    Malformed,
    /// The raw token has three parts. `complete` is false when a segment
    /// failed to decode.
    Decoded { complete: bool },
}

/// A copy of every bindable field at one instant.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct TokenFields {
    pub raw_token: String,
    pub header_base64: Option<String>,
    pub payload_base64: Option<String>,
    pub signature_base64: Option<String>,
    pub header_json: Option<String>,
    pub payload_json: Option<String>,
    pub error_message: Option<String>,
}

impl TokenFields {
    fn differs(&self, other: &TokenFields, field: Field) -> bool {
        match field {
            Field::RawToken => self.raw_token != other.raw_token,
            Field::HeaderBase64 => self.header_base64 != other.header_base64,
            Field::PayloadBase64 => self.payload_base64 != other.payload_base64,
            Field::SignatureBase64 => self.signature_base64 != other.signature_base64,
            Field::HeaderJson => self.header_json != other.header_json,
            Field::PayloadJson => self.payload_json != other.payload_json,
            Field::ErrorMessage => self.error_message != other.error_message,
        }
    }
}

/// Redacts token material; only the shape of each field is shown.
impl fmt::Debug for TokenFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("TokenFields")
            .field("raw_token", &"[REDACTED]")
            .field("header_base64", &redact(&self.header_base64))
            .field("payload_base64", &redact(&self.payload_base64))
            .field("signature_base64", &redact(&self.signature_base64))
            .field("header_json", &redact(&self.header_json))
            .field("payload_json", &redact(&self.payload_json))
            .field("error_message", &self.error_message)
            .finish()
    }
}

type Observer = Box<dyn FnMut(&mut EditableToken, Field)>;

/// A JWT being viewed and edited.
pub struct EditableToken {
    raw_token: String,
    header_base64: Option<String>,
    payload_base64: Option<String>,
    signature_base64: Option<String>,
    header_json: Option<String>,
    payload_json: Option<String>,
    errors: Vec<TokenError>,
    policy: PartEditPolicy,
    suppress_rebuild: bool,
    observers: Vec<Observer>,
}

impl EditableToken {
    /// Create a token from raw text, decoding it immediately.
    pub fn new(raw_token: impl Into<String>) -> Self {
        Self::with_policy(raw_token, PartEditPolicy::default())
    }

    /// Create a token with an explicit policy for direct part edits.
    pub fn with_policy(raw_token: impl Into<String>, policy: PartEditPolicy) -> Self {
        let mut token = Self {
            raw_token: raw_token.into(),
            header_base64: None,
            payload_base64: None,
            signature_base64: None,
            header_json: None,
            payload_json: None,
            errors: Vec::new(),
            policy,
            suppress_rebuild: false,
            observers: Vec::new(),
        };
        token.derive_from_raw();
        token
    }

    pub fn raw_token(&self) -> &str {
        &self.raw_token
    }

    pub fn header_base64(&self) -> Option<&str> {
        self.header_base64.as_deref()
    }

    pub fn payload_base64(&self) -> Option<&str> {
        self.payload_base64.as_deref()
    }

    pub fn signature_base64(&self) -> Option<&str> {
        self.signature_base64.as_deref()
    }

    pub fn header_json(&self) -> Option<&str> {
        self.header_json.as_deref()
    }

    pub fn payload_json(&self) -> Option<&str> {
        self.payload_json.as_deref()
    }

    pub fn part(&self, part: Part) -> Option<&str> {
        match part {
            Part::Header => self.header_base64(),
            Part::Payload => self.payload_base64(),
            Part::Signature => self.signature_base64(),
        }
    }

    pub fn json(&self, segment: Segment) -> Option<&str> {
        match segment {
            Segment::Header => self.header_json(),
            Segment::Payload => self.payload_json(),
        }
    }

    pub fn policy(&self) -> PartEditPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: PartEditPolicy) {
        self.policy = policy;
    }

    /// Errors from the most recent decode attempt, header before payload.
    pub fn errors(&self) -> &[TokenError] {
        &self.errors
    }

    /// All current errors as one human-readable message.
    pub fn error_message(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(ERROR_SEPARATOR),
        )
    }

    /// Decoded length in bytes of the signature part, if it is present and
    /// decodable.
    pub fn signature_len(&self) -> Option<usize> {
        self.signature_base64
            .as_deref()
            .and_then(|s| base64url::decode(s).ok())
            .map(|bytes| bytes.len())
    }

    pub fn state(&self) -> TokenState {
        if self.raw_token.trim().is_empty() {
            TokenState::Empty
        } else if self.errors.contains(&TokenError::InvalidTokenFormat) {
            TokenState::Malformed
        } else {
            TokenState::Decoded {
                complete: self.errors.is_empty(),
            }
        }
    }

    pub fn fields(&self) -> TokenFields {
        TokenFields {
            raw_token: self.raw_token.clone(),
            header_base64: self.header_base64.clone(),
            payload_base64: self.payload_base64.clone(),
            signature_base64: self.signature_base64.clone(),
            header_json: self.header_json.clone(),
            payload_json: self.payload_json.clone(),
            error_message: self.error_message(),
        }
    }

    /// Register a callback run after each mutation, once per changed field.
    ///
    /// Callbacks may mutate the token. Mutations made from inside a
    /// callback do not notify again, so a callback that edits the token in
    /// response to a change cannot recurse.
    pub fn observe(&mut self, observer: impl FnMut(&mut EditableToken, Field) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Replace the raw token and re-derive every part and JSON field.
    pub fn set_raw_token(&mut self, raw_token: impl Into<String>) {
        let before = self.fields();
        self.raw_token = raw_token.into();
        self.derive_from_raw();
        self.notify(&before);
    }

    /// Replace one segment's JSON text and rebuild the raw token.
    ///
    /// The text is stored as given and encoded byte-for-byte, so invalid
    /// JSON still reaches the raw token. The error message is refreshed to
    /// report any such problem. `None` removes the segment's part.
    pub fn set_json(&mut self, segment: Segment, json: Option<String>) {
        let before = self.fields();
        let encoded = json.as_deref().map(|text| base64url::encode(text.as_bytes()));
        match segment {
            Segment::Header => self.header_json = json,
            Segment::Payload => self.payload_json = json,
        }
        let part = match segment {
            Segment::Header => Part::Header,
            Segment::Payload => Part::Payload,
        };
        self.assign_part(part, encoded);
        self.errors = analyze(&self.raw_token).errors();
        self.notify(&before);
    }

    /// Replace the header JSON as an editor would: empty text clears it.
    pub fn set_header_json(&mut self, json: &str) {
        self.set_json(Segment::Header, non_empty(json));
    }

    /// Replace the payload JSON as an editor would: empty text clears it.
    pub fn set_payload_json(&mut self, json: &str) {
        self.set_json(Segment::Payload, non_empty(json));
    }

    /// Replace one base64url part and rebuild the raw token.
    ///
    /// An empty signature is stored as absent. Under
    /// [`PartEditPolicy::Outward`] the JSON fields keep their text and only
    /// the error message is refreshed; under [`PartEditPolicy::Redecode`]
    /// the rebuilt token is decoded again.
    pub fn set_part(&mut self, part: Part, value: Option<String>) {
        let before = self.fields();
        let value = match part {
            Part::Signature => value.filter(|s| !s.is_empty()),
            Part::Header | Part::Payload => value,
        };
        self.assign_part(part, value);
        match self.policy {
            PartEditPolicy::Outward => self.errors = analyze(&self.raw_token).errors(),
            PartEditPolicy::Redecode => self.derive_from_raw(),
        }
        trace!(?part, segment = ?part.segment(), policy = ?self.policy, "part edited");
        self.notify(&before);
    }

    pub fn set_header_base64(&mut self, value: &str) {
        self.set_part(Part::Header, non_empty(value));
    }

    pub fn set_payload_base64(&mut self, value: &str) {
        self.set_part(Part::Payload, non_empty(value));
    }

    pub fn set_signature_base64(&mut self, value: &str) {
        self.set_part(Part::Signature, non_empty(value));
    }

    /// Parse the current JSON text of a segment, if it is a valid object.
    pub fn json_value(&self, segment: Segment) -> Option<Value> {
        self.json(segment)
            .and_then(|text| parse_object(text, segment).ok())
            .map(Value::Object)
    }

    fn derive_from_raw(&mut self) {
        let analysis = analyze(&self.raw_token);
        let mut token = SuppressRebuild::new(self);
        token.errors = analysis.errors();
        match analysis {
            Analysis::Empty | Analysis::Malformed => token.clear_parts(),
            Analysis::Split {
                header_base64,
                payload_base64,
                signature_base64,
                header,
                payload,
            } => {
                token.assign_part(Part::Header, Some(header_base64));
                token.assign_part(Part::Payload, Some(payload_base64));
                token.assign_part(Part::Signature, signature_base64);
                token.header_json = header.ok();
                token.payload_json = payload.ok();
            }
        }
        debug!(
            state = ?token.state(),
            errors = token.errors.len(),
            "token derived from raw text"
        );
    }

    fn clear_parts(&mut self) {
        let mut token = SuppressRebuild::new(self);
        token.header_json = None;
        token.payload_json = None;
        token.assign_part(Part::Header, None);
        token.assign_part(Part::Payload, None);
        token.assign_part(Part::Signature, None);
    }

    fn assign_part(&mut self, part: Part, value: Option<String>) {
        match part {
            Part::Header => self.header_base64 = value,
            Part::Payload => self.payload_base64 = value,
            Part::Signature => self.signature_base64 = value,
        }
        self.rebuild_raw_token();
    }

    fn rebuild_raw_token(&mut self) {
        if self.suppress_rebuild {
            return;
        }
        self.raw_token = format!(
            "{}.{}.{}",
            self.header_base64.as_deref().unwrap_or(""),
            self.payload_base64.as_deref().unwrap_or(""),
            self.signature_base64.as_deref().unwrap_or(""),
        );
    }

    fn notify(&mut self, before: &TokenFields) {
        if self.observers.is_empty() {
            return;
        }
        let after = self.fields();
        let changed: Vec<Field> = Field::ALL
            .into_iter()
            .filter(|&field| before.differs(&after, field))
            .collect();
        if changed.is_empty() {
            return;
        }

        let mut observers = std::mem::take(&mut self.observers);
        for field in changed {
            for observer in &mut observers {
                observer(&mut *self, field);
            }
        }
        observers.append(&mut self.observers);
        self.observers = observers;
    }
}

impl Default for EditableToken {
    fn default() -> Self {
        Self::new("")
    }
}

/// Custom `Debug` that redacts token material.
impl fmt::Debug for EditableToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditableToken")
            .field("fields", &self.fields())
            .field("policy", &self.policy)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Holds the rebuild suppression flag for its lifetime and restores the
/// previous value on drop, including during unwinding.
struct SuppressRebuild<'a> {
    token: &'a mut EditableToken,
    previous: bool,
}

impl<'a> SuppressRebuild<'a> {
    fn new(token: &'a mut EditableToken) -> Self {
        let previous = std::mem::replace(&mut token.suppress_rebuild, true);
        Self { token, previous }
    }
}

impl Deref for SuppressRebuild<'_> {
    type Target = EditableToken;

    fn deref(&self) -> &EditableToken {
        self.token
    }
}

impl DerefMut for SuppressRebuild<'_> {
    fn deref_mut(&mut self) -> &mut EditableToken {
        self.token
    }
}

impl Drop for SuppressRebuild<'_> {
    fn drop(&mut self) {
        self.token.suppress_rebuild = self.previous;
    }
}

/// The result of splitting and decoding raw token text.
enum Analysis {
    Empty,
    Malformed,
    Split {
        header_base64: String,
        payload_base64: String,
        signature_base64: Option<String>,
        header: Result<String, TokenError>,
        payload: Result<String, TokenError>,
    },
}

impl Analysis {
    fn errors(&self) -> Vec<TokenError> {
        match self {
            Analysis::Empty => Vec::new(),
            Analysis::Malformed => vec![TokenError::InvalidTokenFormat],
            Analysis::Split {
                header, payload, ..
            } => [header, payload]
                .into_iter()
                .filter_map(|result| result.as_ref().err().cloned())
                .collect(),
        }
    }
}

fn analyze(raw_token: &str) -> Analysis {
    let trimmed = raw_token.trim();
    if trimmed.is_empty() {
        return Analysis::Empty;
    }

    let parts: Vec<&str> = trimmed.split('.').collect();
    let [header_base64, payload_base64, signature_base64] = parts.as_slice() else {
        return Analysis::Malformed;
    };

    Analysis::Split {
        header: decode_segment(header_base64, Segment::Header),
        payload: decode_segment(payload_base64, Segment::Payload),
        header_base64: (*header_base64).to_string(),
        payload_base64: (*payload_base64).to_string(),
        signature_base64: non_empty(signature_base64),
    }
}

/// Base64url-decode a segment, read it as text, and pretty-print it as a
/// JSON object with sorted keys.
pub fn decode_segment(encoded: &str, segment: Segment) -> Result<String, TokenError> {
    let bytes =
        base64url::decode(encoded).map_err(|_| TokenError::InvalidBase64 { segment })?;
    let (charset, text) =
        decode_text(&bytes).ok_or(TokenError::UndecodableText { segment })?;
    trace!(%segment, ?charset, "segment text decoded");
    let object = parse_object(&text, segment)?;
    Ok(pretty_print(object))
}

fn parse_object(text: &str, segment: Segment) -> Result<Map<String, Value>, TokenError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(TokenError::NotJsonObject { segment }),
        Err(e) => Err(TokenError::InvalidJson {
            segment,
            reason: e.to_string(),
        }),
    }
}

fn pretty_print(object: Map<String, Value>) -> String {
    format!("{:#}", sort_keys(Value::Object(object)))
}

/// Rebuild every object with its keys in sorted order, independent of how
/// `serde_json` orders maps internally.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(object) => {
            let mut entries: Vec<(String, Value)> = object.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}
