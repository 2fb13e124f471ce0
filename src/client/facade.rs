//! Client facade trait
//!
//! The narrow capability the page iterator needs from its owning client.

use crate::error::Result;
use crate::http::GraphRequest;
use crate::response::GraphResponse;
use crate::types::Method;
use async_trait::async_trait;
use std::sync::Arc;

/// What the page iterator needs from a client
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// Build a request addressed at `url`, carrying the client's base configuration
    ///
    /// Absolute URLs (such as next links) are used as given.
    fn create_request(&self, method: Method, url: &str) -> GraphRequest;

    /// Send a request
    async fn send(&self, request: GraphRequest) -> Result<GraphResponse>;

    /// Replace the credential used for every later request
    fn set_access_token(&self, token: &str);
}

#[async_trait]
impl<C: GraphClient + ?Sized> GraphClient for Arc<C> {
    fn create_request(&self, method: Method, url: &str) -> GraphRequest {
        (**self).create_request(method, url)
    }

    async fn send(&self, request: GraphRequest) -> Result<GraphResponse> {
        (**self).send(request).await
    }

    fn set_access_token(&self, token: &str) {
        (**self).set_access_token(token);
    }
}
