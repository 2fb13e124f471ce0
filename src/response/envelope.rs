//! Response envelope
//!
//! Wraps a raw response and decodes its JSON body on first access.

use super::entity::{deserialize_entity, Entity};
use crate::error::{Error, Result};
use crate::http::RawResponse;
use crate::types::{
    HeaderLists, JsonObject, JsonValue, DEFAULT_STATUS, ODATA_DELTA_LINK, ODATA_NEXT_LINK,
    VALUE_FIELD,
};
use bytes::Bytes;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// A response from the API with lazily decoded JSON body
#[derive(Debug, Clone)]
pub struct GraphResponse {
    status: u16,
    headers: HeaderLists,
    raw_body: Bytes,
    /// Decode outcome; a failure is kept as its message so it is not re-run
    decoded: OnceCell<std::result::Result<JsonObject, String>>,
}

impl GraphResponse {
    /// Create a response
    pub fn new(status: u16, headers: HeaderLists, body: Option<Bytes>) -> Self {
        Self {
            status,
            headers,
            raw_body: body.unwrap_or_default(),
            decoded: OnceCell::new(),
        }
    }

    /// Create a 200 response with the given body and no headers
    pub fn from_body(body: impl Into<Bytes>) -> Self {
        Self::new(DEFAULT_STATUS, HeaderLists::new(), Some(body.into()))
    }

    /// Create a 200 response whose body is the serialized JSON value
    pub fn from_json(body: &JsonValue) -> Self {
        Self::from_body(body.to_string())
    }

    /// Create a 200 response with no body
    pub fn empty() -> Self {
        Self::new(DEFAULT_STATUS, HeaderLists::new(), None)
    }

    /// Set the status code
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Set the headers
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderLists) -> Self {
        self.headers = headers;
        self
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Check for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Headers exactly as received
    pub fn headers(&self) -> &HeaderLists {
        &self.headers
    }

    /// First value of a header, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    /// Undecoded body; empty when the response had none
    pub fn raw_body(&self) -> &Bytes {
        &self.raw_body
    }

    /// Undecoded body as text
    pub fn raw_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw_body)
    }

    /// Decoded body
    ///
    /// An empty body or a JSON `null` decodes to an empty object. Malformed
    /// JSON, or JSON that is not an object, is a decode error.
    pub fn body(&self) -> Result<&JsonObject> {
        self.decoded
            .get_or_init(|| decode_body(&self.raw_body))
            .as_ref()
            .map_err(|message| Error::decode(message.clone()))
    }

    /// Decoded body if it decoded successfully
    pub(crate) fn decoded_body(&self) -> Option<&JsonObject> {
        self.body().ok()
    }

    /// `@odata.nextLink` of the body, if any
    pub fn next_link(&self) -> Result<Option<&str>> {
        Ok(link_field(self.body()?, ODATA_NEXT_LINK))
    }

    /// `@odata.deltaLink` of the body, if any
    pub fn delta_link(&self) -> Result<Option<&str>> {
        Ok(link_field(self.body()?, ODATA_DELTA_LINK))
    }

    /// Deserialize the body into entities
    ///
    /// A body with a `value` array yields `Entity::Many` with one entry per
    /// record (possibly none). Any other body is a single record.
    pub fn as_entity<T: DeserializeOwned>(&self) -> Result<Entity<T>> {
        let body = self.body()?;
        match body.get(VALUE_FIELD) {
            Some(JsonValue::Array(records)) => records
                .iter()
                .map(deserialize_entity)
                .collect::<Result<Vec<T>>>()
                .map(Entity::Many),
            _ => deserialize_entity(&JsonValue::Object(body.clone())).map(Entity::One),
        }
    }

    /// Deserialize the body as a list of entities
    ///
    /// A single-record body yields a one-element list.
    pub fn as_entities<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.as_entity().map(Entity::into_vec)
    }

    /// Deserialize the whole body as one entity
    pub fn as_object<T: DeserializeOwned>(&self) -> Result<T> {
        deserialize_entity(&JsonValue::Object(self.body()?.clone()))
    }
}

impl From<RawResponse> for GraphResponse {
    fn from(raw: RawResponse) -> Self {
        Self::new(raw.status, raw.headers, raw.body)
    }
}

/// Non-empty string field of a decoded body
pub(crate) fn link_field<'a>(body: &'a JsonObject, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(JsonValue::as_str)
        .filter(|link| !link.is_empty())
}

fn decode_body(raw: &[u8]) -> std::result::Result<JsonObject, String> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(JsonObject::new());
    }

    match serde_json::from_slice::<JsonValue>(raw) {
        Ok(JsonValue::Object(map)) => Ok(map),
        Ok(JsonValue::Null) => Ok(JsonObject::new()),
        Ok(other) => Err(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        )),
        Err(e) => Err(format!("Failed to parse JSON: {e}")),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
