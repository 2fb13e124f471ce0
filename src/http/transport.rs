//! Transport boundary and adapters
//!
//! A transport sends one `GraphRequest` and returns the raw response. Non-2xx
//! statuses are ordinary responses here; only network-level failures are
//! errors. Nothing in this module retries.

use super::request::GraphRequest;
use super::throttle::{Throttle, ThrottleConfig};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::HeaderLists;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tower::{Service, ServiceExt};
use tracing::debug;

/// Raw response as returned by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderLists,
    /// Response body, `None` when the server sent nothing
    pub body: Option<Bytes>,
}

impl RawResponse {
    /// Create a response with no headers or body
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HeaderLists::new(),
            body: None,
        }
    }

    /// Create a response carrying a JSON body
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status)
            .with_header("Content-Type", "application/json")
            .with_body(body.to_string())
    }

    /// Set the body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header value
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .entry(key.into())
            .or_default()
            .push(value.into());
        self
    }
}

/// Capability to send a request and await its raw response
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one request
    async fn send(&self, request: GraphRequest) -> Result<RawResponse>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn send(&self, request: GraphRequest) -> Result<RawResponse> {
        (**self).send(request).await
    }
}

// ============================================================================
// Reqwest Transport
// ============================================================================

/// Transport backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
    throttle: Option<Throttle>,
}

impl ReqwestTransport {
    /// Build a transport from client configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout(),
            throttle: config.throttle.as_ref().map(Throttle::new),
        })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            throttle: None,
        }
    }

    /// Pace requests through a token bucket
    #[must_use]
    pub fn with_throttle(mut self, config: &ThrottleConfig) -> Self {
        self.throttle = Some(Throttle::new(config));
        self
    }

    /// Check if pacing is enabled
    pub fn has_throttle(&self) -> bool {
        self.throttle.is_some()
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: GraphRequest) -> Result<RawResponse> {
        if let Some(ref throttle) = self.throttle {
            throttle.wait().await;
        }

        let url = request.full_url()?;
        let timeout = request.timeout.unwrap_or(self.timeout);
        let mut req = self
            .client
            .request(request.method.into(), url.clone())
            .timeout(timeout);

        for (key, values) in &request.headers {
            for value in values {
                req = req.header(key.as_str(), value.as_str());
            }
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Err(Error::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            Err(e) => return Err(Error::Http(e)),
        };

        let status = response.status().as_u16();
        let mut headers = HeaderLists::new();
        for (name, value) in response.headers() {
            headers
                .entry(name.as_str().to_string())
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }

        let body = response.bytes().await?;
        debug!("{} {} -> {}", request.method, url, status);

        Ok(RawResponse {
            status,
            headers,
            body: if body.is_empty() { None } else { Some(body) },
        })
    }
}

// ============================================================================
// Service Adapter
// ============================================================================

/// Adapts a `tower::Service` into an `HttpTransport`
///
/// Each send drives a clone of the service, so the wrapped service must be
/// cheap to clone. `tower::service_fn` closures qualify.
#[derive(Debug, Clone)]
pub struct ServiceTransport<S> {
    service: S,
}

impl<S> ServiceTransport<S> {
    /// Wrap a service
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Unwrap the service
    pub fn into_inner(self) -> S {
        self.service
    }
}

#[async_trait]
impl<S> HttpTransport for ServiceTransport<S>
where
    S: Service<GraphRequest, Response = RawResponse> + Clone + Send + Sync + 'static,
    S::Future: Send,
    S::Error: Into<Error>,
{
    async fn send(&self, request: GraphRequest) -> Result<RawResponse> {
        self.service
            .clone()
            .oneshot(request)
            .await
            .map_err(Into::into)
    }
}
