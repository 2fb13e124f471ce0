//! Tests for the client module

use super::*;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{GraphRequest, HttpTransport, RawResponse, ServiceTransport};
use crate::types::Method;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Transport that records requests and answers with a fixed response
#[derive(Default)]
struct RecordingTransport {
    requests: Mutex<Vec<GraphRequest>>,
    response: Option<RawResponse>,
}

impl RecordingTransport {
    fn answering(response: RawResponse) -> Self {
        Self {
            requests: Mutex::default(),
            response: Some(response),
        }
    }

    fn requests(&self) -> Vec<GraphRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: GraphRequest) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(self
            .response
            .clone()
            .unwrap_or_else(|| RawResponse::json(200, &json!({"value": []}))))
    }
}

fn config() -> ClientConfig {
    ClientConfig::builder()
        .base_url("https://graph.test")
        .api_version("v1.0")
        .header("SdkVersion", "graph-pager")
        .build()
}

fn recording_client() -> Client<Arc<RecordingTransport>> {
    Client::with_transport(config(), Arc::new(RecordingTransport::default()))
}

// ============================================================================
// Request construction
// ============================================================================

#[test]
fn test_build_url() {
    let client = recording_client();
    assert_eq!(client.build_url("/users"), "https://graph.test/v1.0/users");
    assert_eq!(client.build_url("me/messages"), "https://graph.test/v1.0/me/messages");
    assert_eq!(
        client.build_url("https://other.test/v1.0/users?$skiptoken=x"),
        "https://other.test/v1.0/users?$skiptoken=x"
    );
}

#[test]
fn test_create_request_carries_default_headers() {
    let client = recording_client();
    let request = client.create_request(Method::GET, "/groups");

    assert_eq!(request.method, Method::GET);
    assert_eq!(request.url, "https://graph.test/v1.0/groups");
    assert_eq!(
        request.header_values("sdkversion"),
        Some(&["graph-pager".to_string()][..])
    );
    assert!(request.header_values("Authorization").is_none());
}

// ============================================================================
// Sending
// ============================================================================

#[tokio::test]
async fn test_send_attaches_bearer_token() {
    let transport = Arc::new(RecordingTransport::default());
    let client = Client::with_transport(config(), Arc::clone(&transport)).with_access_token("abc");

    client.get("/users").await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].header_values("Authorization"),
        Some(&["Bearer abc".to_string()][..])
    );
}

#[tokio::test]
async fn test_send_keeps_explicit_authorization() {
    let transport = Arc::new(RecordingTransport::default());
    let client = Client::with_transport(config(), Arc::clone(&transport)).with_access_token("abc");

    let request = client
        .create_request(Method::GET, "/users")
        .header("authorization", "Basic xyz");
    client.send(request).await.unwrap();

    assert_eq!(
        transport.requests()[0].header_values("Authorization"),
        Some(&["Basic xyz".to_string()][..])
    );
}

#[tokio::test]
async fn test_send_without_token() {
    let transport = Arc::new(RecordingTransport::default());
    let client = Client::with_transport(config(), Arc::clone(&transport));

    client.get("/users").await.unwrap();
    assert!(transport.requests()[0].header_values("Authorization").is_none());
}

#[tokio::test]
async fn test_set_access_token_through_shared_client() {
    let transport = Arc::new(RecordingTransport::default());
    let client = Arc::new(Client::with_transport(config(), Arc::clone(&transport)));
    let shared: Arc<dyn GraphClient> = client.clone();

    shared.set_access_token("first");
    client.get("/users").await.unwrap();
    shared.set_access_token("second");
    client.get("/users").await.unwrap();

    assert_eq!(client.access_token().as_deref(), Some("second"));
    let tokens: Vec<_> = transport
        .requests()
        .iter()
        .map(|r| r.header_values("Authorization").unwrap()[0].clone())
        .collect();
    assert_eq!(tokens, vec!["Bearer first", "Bearer second"]);
}

#[tokio::test]
async fn test_get_with_options_merges_headers() {
    let transport = Arc::new(RecordingTransport::default());
    let client = Client::with_transport(config(), Arc::clone(&transport));
    let options = crate::http::RequestOptions::new()
        .header("sdkversion", "override")
        .query("$top", "5");

    client.get_with_options("/users", &options).await.unwrap();

    let request = &transport.requests()[0];
    assert_eq!(
        request.header_values("SdkVersion"),
        Some(&["override".to_string()][..])
    );
    assert_eq!(request.query.get("$top"), Some(&"5".to_string()));
}

#[tokio::test]
async fn test_get_returns_raw_response() {
    let transport = RecordingTransport::answering(
        RawResponse::json(404, &json!({"error": {"code": "NotFound"}}))
            .with_header("request-id", "r-9"),
    );
    let client = Client::with_transport(config(), transport);

    let response = client.get("/users/missing").await.unwrap();
    assert_eq!(response.status(), 404);
    assert!(!response.is_success());
    assert_eq!(response.header("Request-Id"), Some("r-9"));
}

#[tokio::test]
async fn test_get_collection() {
    let transport = RecordingTransport::answering(RawResponse::json(
        200,
        &json!({"value": [{"id": "1"}, {"id": "2"}], "@odata.nextLink": "https://graph.test/next"}),
    ));
    let client = Client::with_transport(config(), transport);

    let collection = client.get_collection("/users").await.unwrap();
    assert_eq!(collection.len(), 2);
    assert_eq!(collection.next_link(), Some("https://graph.test/next"));
}

#[tokio::test]
async fn test_get_collection_rejects_single_entity() {
    let transport = RecordingTransport::answering(RawResponse::json(200, &json!({"id": "me"})));
    let client = Client::with_transport(config(), transport);

    let err = client.get_collection("/me").await.unwrap_err();
    assert!(matches!(err, Error::Client { .. }));
}

#[tokio::test]
async fn test_transport_error_is_propagated() {
    let service = tower::service_fn(|_request: GraphRequest| async move {
        Err::<RawResponse, _>(Error::transport("connection refused"))
    });
    let client = Client::with_transport(config(), ServiceTransport::new(service));

    let err = client.get("/users").await.unwrap_err();
    assert!(err.is_transport());
}

// ============================================================================
// Reqwest-backed client
// ============================================================================

#[test]
fn test_new_rejects_invalid_config() {
    let config = ClientConfig::builder().base_url("ftp://graph.test").build();
    assert!(matches!(Client::new(config), Err(Error::Config { .. })));

    let config = ClientConfig::builder().base_url("not a url").build();
    assert!(matches!(Client::new(config), Err(Error::InvalidUrl(_))));
}

#[tokio::test]
async fn test_client_against_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/beta/users"))
        .and(header("Authorization", "Bearer token-1"))
        .and(header("SdkVersion", "graph-pager"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": "1", "displayName": "Adele"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .base_url(server.uri())
        .api_version("beta")
        .header("SdkVersion", "graph-pager")
        .build();
    let client = Client::new(config).unwrap().with_access_token("token-1");

    let collection = client.get_collection("users").await.unwrap();
    assert_eq!(collection.items()[0]["displayName"], "Adele");
}

#[test]
fn test_debug_hides_token() {
    let client = recording_client().with_access_token("super-secret");
    let debug = format!("{client:?}");
    assert!(debug.contains("has_access_token: true"));
    assert!(!debug.contains("super-secret"));
}
