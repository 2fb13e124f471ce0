//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: client → first page → PageIterator → next links

use graph_pager::http::{ServiceTransport, ThrottleConfig};
use graph_pager::{
    Client, ClientConfig, Error, GraphRequest, GraphResponse, HttpTransport, IterationSignal,
    IteratorState, JsonValue, PageIterator, RawResponse, RequestOptions,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct User {
    id: String,
    display_name: String,
}

fn client_for(server: &MockServer) -> Arc<Client> {
    let config = ClientConfig::builder()
        .base_url(server.uri())
        .api_version("v1.0")
        .build();
    Arc::new(Client::new(config).unwrap().with_access_token("token-1"))
}

/// Mount three pages of users; the last one carries a delta link
async fn mount_user_pages(server: &MockServer) {
    let base = format!("{}/v1.0/users", server.uri());

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param_is_missing("$skiptoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@odata.context": "https://graph.test/v1.0/$metadata#users",
            "@odata.nextLink": format!("{base}?$skiptoken=page2"),
            "value": [
                {"id": "1", "displayName": "Adele"},
                {"id": "2", "displayName": "Alex"}
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param("$skiptoken", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@odata.nextLink": format!("{base}?$skiptoken=page3"),
            "value": [
                {"id": "3", "displayName": "Diego"},
                {"id": "4", "displayName": "Grady"}
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param("$skiptoken", "page3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@odata.deltaLink": format!("{base}/delta?$deltatoken=d1"),
            "value": [
                {"id": "5", "displayName": "Megan"}
            ]
        })))
        .mount(server)
        .await;
}

// ============================================================================
// Full Walk
// ============================================================================

#[tokio::test]
async fn test_walk_all_pages() {
    let server = MockServer::start().await;
    mount_user_pages(&server).await;
    let client = client_for(&server);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let first = client.get("/users").await.unwrap();
    let mut iterator = PageIterator::new(Arc::clone(&client), first, move |user: User| {
        assert!(!user.id.is_empty());
        sink.lock().unwrap().push(user.display_name);
        true
    })
    .unwrap();

    assert!(iterator.iterate().await.unwrap());
    assert!(iterator.is_complete());
    assert_eq!(iterator.items_processed(), 5);
    assert_eq!(iterator.pages_fetched(), 2);
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["Adele", "Alex", "Diego", "Grady", "Megan"]
    );
    assert_eq!(iterator.next_link(), None);
    assert_eq!(
        iterator.delta_link(),
        Some(format!("{}/v1.0/users/delta?$deltatoken=d1", server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_pause_and_resume_across_pages() {
    let server = MockServer::start().await;
    mount_user_pages(&server).await;
    let client = client_for(&server);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let first = client.get("/users").await.unwrap();
    let mut iterator = PageIterator::new(Arc::clone(&client), first, move |user: JsonValue| {
        let id = user["id"].as_str().unwrap_or_default().to_string();
        let mut seen = sink.lock().unwrap();
        seen.push(id.clone());
        // Pause after the first item of the second page
        if id == "3" {
            IterationSignal::Pause
        } else {
            IterationSignal::Continue
        }
    })
    .unwrap();

    assert!(!iterator.iterate().await.unwrap());
    assert_eq!(iterator.state(), IteratorState::Paused);
    assert_eq!(iterator.cursor(), 1);
    assert_eq!(*seen.lock().unwrap(), vec!["1", "2", "3"]);

    assert!(iterator.resume().await.unwrap());
    assert_eq!(*seen.lock().unwrap(), vec!["1", "2", "3", "4", "5"]);

    // Nothing left: no more requests, still complete
    assert!(iterator.resume().await.unwrap());
    assert_eq!(seen.lock().unwrap().len(), 5);
}

#[tokio::test]
async fn test_next_page_requests_carry_options_and_token() {
    let server = MockServer::start().await;
    let base = format!("{}/v1.0/groups", server.uri());

    Mock::given(method("GET"))
        .and(path("/v1.0/groups"))
        .and(query_param_is_missing("$skiptoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@odata.nextLink": format!("{base}?$skiptoken=g2"),
            "value": [{"id": "g1"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/groups"))
        .and(query_param("$skiptoken", "g2"))
        .and(header("ConsistencyLevel", "eventual"))
        .and(header("Authorization", "Bearer token-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": "g2"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let options = RequestOptions::new().header("ConsistencyLevel", "eventual");
    let first = client.get_with_options("/groups", &options).await.unwrap();

    let mut iterator = PageIterator::new(Arc::clone(&client), first, |_group: JsonValue| true)
        .unwrap()
        .with_request_options(options);
    iterator.set_access_token("token-2");

    assert!(iterator.iterate().await.unwrap());
    assert_eq!(iterator.items_processed(), 2);
}

#[tokio::test]
async fn test_failed_next_page_is_retried_on_resume() {
    let server = MockServer::start().await;
    let base = format!("{}/v1.0/users", server.uri());

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param_is_missing("$skiptoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@odata.nextLink": format!("{base}?$skiptoken=p2"),
            "value": [{"id": "1"}]
        })))
        .mount(&server)
        .await;

    // First attempt at page two is throttled, the retry succeeds
    Mock::given(method("GET"))
        .and(query_param("$skiptoken", "p2"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("$skiptoken", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": "2"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.get("/users").await.unwrap();
    let mut iterator = PageIterator::new(Arc::clone(&client), first, |_user: JsonValue| true).unwrap();

    let err = iterator.iterate().await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 429, .. }));
    assert_eq!(iterator.state(), IteratorState::Paused);
    assert_eq!(iterator.items_processed(), 1);

    assert!(iterator.resume().await.unwrap());
    assert_eq!(iterator.items_processed(), 2);
}

#[tokio::test]
async fn test_throttled_client_walks_pages() {
    let server = MockServer::start().await;
    mount_user_pages(&server).await;

    let config = ClientConfig::builder()
        .base_url(server.uri())
        .throttle(ThrottleConfig::new(50, 1))
        .build();
    let client = Arc::new(Client::new(config).unwrap());

    let first = client.get("/users").await.unwrap();
    let mut iterator = PageIterator::new(Arc::clone(&client), first, |_user: User| true).unwrap();

    assert!(iterator.iterate().await.unwrap());
    assert_eq!(iterator.items_processed(), 5);
}

// ============================================================================
// Custom Transport
// ============================================================================

fn paged_service_client() -> Arc<Client<impl HttpTransport>> {
    let service = tower::service_fn(|request: GraphRequest| async move {
        let body = if request.url.ends_with("page=2") {
            json!({"value": [{"id": "c"}]})
        } else {
            json!({
                "value": [{"id": "a"}, {"id": "b"}],
                "@odata.nextLink": "https://graph.test/v1.0/items?page=2"
            })
        };
        Ok::<_, Error>(RawResponse::json(200, &body))
    });
    let config = ClientConfig::builder().base_url("https://graph.test").build();
    Arc::new(Client::with_transport(config, ServiceTransport::new(service)))
}

#[test]
fn test_service_transport_walk_one_item_per_call() {
    tokio_test::block_on(async {
        let client = paged_service_client();
        let first = assert_ok!(client.get("/items").await);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        // A callback without a verdict pauses after every item
        let mut iterator = assert_ok!(PageIterator::new(
            Arc::clone(&client),
            first,
            move |item: JsonValue| {
                sink.lock().unwrap().push(item["id"].as_str().unwrap_or_default().to_string());
            },
        ));

        assert!(!assert_ok!(iterator.iterate().await));
        assert!(!assert_ok!(iterator.resume().await));
        assert!(!assert_ok!(iterator.resume().await));
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);

        assert!(assert_ok!(iterator.resume().await));
        assert!(iterator.is_complete());
    });
}

#[test]
fn test_first_page_must_be_a_collection() {
    let client = paged_service_client();
    let response = GraphResponse::from_json(&json!({"id": "me", "displayName": "Adele"}));

    let result = PageIterator::new(client, response, |_item: JsonValue| true);
    let err = assert_err!(result);
    assert!(matches!(err, Error::Client { .. }));
}
