//! Normalized response representation.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value, json};

/// The result of one request, normalized from the appliance's
/// heterogeneous response bodies.
///
/// Exactly one of:
/// - [`Json`](NormalizedResponse::Json) — the body parsed as JSON, unmodified;
/// - [`Headers`](NormalizedResponse::Headers) — the body was empty, so the
///   response headers stand in for it;
/// - [`Text`](NormalizedResponse::Text) — the body was non-empty but not
///   valid JSON.
///
/// A value is constructed fresh per request and never retained by the
/// client.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedResponse {
    /// JSON body, decoded.
    Json(Value),
    /// Empty body; response headers as a map.
    Headers(BTreeMap<String, String>),
    /// Non-empty body that is not valid JSON.
    Text(String),
}

impl NormalizedResponse {
    /// Render the mapping shape of this response:
    /// the JSON value itself, `{"headers": {...}}`, or `{"result": "..."}`.
    pub fn to_value(&self) -> Value {
        match self {
            NormalizedResponse::Json(value) => value.clone(),
            NormalizedResponse::Headers(headers) => {
                let map: Map<String, Value> = headers
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                json!({ "headers": map })
            }
            NormalizedResponse::Text(text) => json!({ "result": text }),
        }
    }

    /// The decoded JSON body, if this response carried one.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            NormalizedResponse::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The raw text body, if this response degraded to text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            NormalizedResponse::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The response headers, if the body was empty.
    pub fn headers(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            NormalizedResponse::Headers(headers) => Some(headers),
            _ => None,
        }
    }
}

// Serialize the same mapping shape `to_value()` renders, so callers can
// feed a response straight to a JSON writer.
impl Serialize for NormalizedResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_value().serialize(serializer)
    }
}
