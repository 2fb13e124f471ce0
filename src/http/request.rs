//! Request types
//!
//! `GraphRequest` is the transport-neutral request the client facade builds.
//! `RequestOptions` carries extra headers and query parameters that are merged
//! into a request after the facade has built it.

use crate::error::Result;
use crate::types::{HeaderLists, JsonValue, Method, StringMap};
use std::time::Duration;
use url::Url;

/// A request ready to be handed to a transport
#[derive(Debug, Clone, PartialEq)]
pub struct GraphRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute target URL (may already carry a query string)
    pub url: String,
    /// Request headers
    pub headers: HeaderLists,
    /// Extra query parameters appended to `url`
    pub query: StringMap,
    /// JSON body
    pub body: Option<JsonValue>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
}

impl GraphRequest {
    /// Create a request with no headers or body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderLists::new(),
            query: StringMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Set a header, replacing any previous values
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(key, value);
        self
    }

    /// Set a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace all values of a header
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&key));
        self.headers.insert(key, vec![value.into()]);
    }

    /// Values of a header, matched case-insensitively
    pub fn header_values(&self, name: &str) -> Option<&[String]> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    /// Resolve `url` plus `query` into the final URL
    ///
    /// A parameter in `query` replaces a same-named parameter already in `url`.
    pub fn full_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.url)?;
        if !self.query.is_empty() {
            let kept: Vec<(String, String)> = url
                .query_pairs()
                .filter(|(key, _)| !self.query.contains_key(&**key))
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect();
            let mut params: Vec<(&String, &String)> = self.query.iter().collect();
            params.sort();

            url.set_query(None);
            url.query_pairs_mut().extend_pairs(kept).extend_pairs(params);
        }
        Ok(url)
    }
}

/// Extra configuration merged into follow-up requests
///
/// Headers given here replace same-named headers of the base request; every
/// other header of the base request is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Headers to add
    pub headers: HeaderLists,
    /// Query parameters to add
    pub query: StringMap,
    /// Override timeout
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Create empty request options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create request options from a header map
    pub fn with_headers(headers: HeaderLists) -> Self {
        Self {
            headers,
            ..Default::default()
        }
    }

    /// Add a header value
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .entry(key.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check if these options would change nothing
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.query.is_empty() && self.timeout.is_none()
    }

    /// Merge these options into a request
    pub fn apply_to(&self, request: &mut GraphRequest) {
        for (key, values) in &self.headers {
            request
                .headers
                .retain(|existing, _| !existing.eq_ignore_ascii_case(key));
            request.headers.insert(key.clone(), values.clone());
        }
        for (key, value) in &self.query {
            request.query.insert(key.clone(), value.clone());
        }
        if let Some(timeout) = self.timeout {
            request.timeout = Some(timeout);
        }
    }
}
