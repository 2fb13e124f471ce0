//! Default client implementation
//!
//! `Client` resolves paths against the configured service root, attaches the
//! bearer token and hands requests to its transport.

use super::facade::GraphClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{GraphRequest, HttpTransport, RequestOptions, ReqwestTransport};
use crate::response::{CollectionResponse, GraphResponse};
use crate::types::Method;
use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

const AUTHORIZATION: &str = "Authorization";

/// Client for a Graph-style REST API
pub struct Client<T = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
    access_token: RwLock<Option<String>>,
}

impl Client<ReqwestTransport> {
    /// Create a client that sends through reqwest
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::from_config(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: HttpTransport> Client<T> {
    /// Create a client with a custom transport
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            access_token: RwLock::new(None),
        }
    }

    /// Set the initial access token
    #[must_use]
    pub fn with_access_token(self, token: impl Into<String>) -> Self {
        *self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token.into());
        self
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Current access token
    pub fn access_token(&self) -> Option<String> {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Build full URL from a path or absolute URL
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let root = self.config.service_root();
        let path = path.trim_start_matches('/');
        format!("{root}/{path}")
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<GraphResponse> {
        self.get_with_options(path, &RequestOptions::default())
            .await
    }

    /// Make a GET request with extra options
    pub async fn get_with_options(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<GraphResponse> {
        let mut request = self.create_request(Method::GET, path);
        options.apply_to(&mut request);
        self.send(request).await
    }

    /// Fetch the first page of a collection
    pub async fn get_collection(&self, path: &str) -> Result<CollectionResponse> {
        self.get(path).await?.into_collection()
    }
}

#[async_trait]
impl<T: HttpTransport> GraphClient for Client<T> {
    fn create_request(&self, method: Method, url: &str) -> GraphRequest {
        let mut request = GraphRequest::new(method, self.build_url(url));
        for (key, value) in &self.config.default_headers {
            request.set_header(key.as_str(), value.as_str());
        }
        request
    }

    async fn send(&self, mut request: GraphRequest) -> Result<GraphResponse> {
        if request.header_values(AUTHORIZATION).is_none() {
            if let Some(token) = self.access_token() {
                request.set_header(AUTHORIZATION, format!("Bearer {token}"));
            }
        }

        debug!("Sending {} {}", request.method, request.url);
        let raw = self.transport.send(request).await?;
        Ok(GraphResponse::from(raw))
    }

    fn set_access_token(&self, token: &str) {
        *self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }
}

impl<T> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let has_token = self
            .access_token
            .read()
            .map(|token| token.is_some())
            .unwrap_or(false);
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("has_access_token", &has_token)
            .finish_non_exhaustive()
    }
}
