//! Gateway behaviour against mock relays.

use std::time::Duration;

use shelfpick_fetch::{FetchError, JsonTransport, Relay, RelayGateway, RelaySettings};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TARGET: &str = "https://catalog.test/ttb/api/ItemList.aspx?QueryType=Bestseller";

fn gateway(server: &MockServer) -> RelayGateway {
    let settings = RelaySettings::default()
        .with_relays(vec![
            Relay::prefix(format!("{}/relay-a?url=", server.uri())),
            Relay::prefix(format!("{}/relay-b?url=", server.uri())),
        ])
        .with_retry_delay(Duration::from_millis(5));
    RelayGateway::new(settings).unwrap()
}

#[tokio::test]
async fn test_first_relay_success_returns_immediately() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/relay-a"))
        .and(query_param("url", TARGET))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"item": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/relay-b"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let body = gateway(&server).fetch_json(TARGET).await.unwrap();
    assert!(body["item"].is_array());
}

#[tokio::test]
async fn test_falls_back_to_second_relay_after_two_attempts() {
    let server = MockServer::start().await;

    Mock::given(path("/relay-a"))
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(path("/relay-b"))
        .and(query_param("url", TARGET))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let body = gateway(&server).fetch_json(TARGET).await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_non_json_body_counts_as_failure() {
    let server = MockServer::start().await;

    Mock::given(path("/relay-a"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(path("/relay-b"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[1, 2]"))
        .expect(1)
        .mount(&server)
        .await;

    let body = gateway(&server).fetch_json(TARGET).await.unwrap();
    assert_eq!(body, serde_json::json!([1, 2]));
}

#[tokio::test]
async fn test_exhausted_relays_surface_last_error() {
    let server = MockServer::start().await;

    Mock::given(path("/relay-a"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(path("/relay-b"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let err = gateway(&server).fetch_json(TARGET).await.unwrap_err();
    match err {
        FetchError::Status { status, .. } => assert_eq!(status, 503),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_direct_relay_hits_target() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("pageNo", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = RelayGateway::new(RelaySettings::direct()).unwrap();
    let body = gateway
        .fetch_json(&format!("{}/api?pageNo=1", server.uri()))
        .await
        .unwrap();
    assert!(body["response"].is_object());
}
