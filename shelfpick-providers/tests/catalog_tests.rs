//! Catalog client behaviour against a mock provider.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::{json, Value};
use shelfpick_core::{CredentialKind, DiscoverySource, SearchTarget};
use shelfpick_fetch::{Relay, RelayGateway, RelaySettings};
use shelfpick_providers::{CatalogClient, CatalogEndpoints, CatalogError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoints(server: &MockServer) -> CatalogEndpoints {
    CatalogEndpoints {
        catalog_base: format!("{}/ttb/api/", server.uri()),
        library_base: format!("{}/api/recommandList", server.uri()),
    }
}

fn direct_client(server: &MockServer) -> CatalogClient {
    let settings = RelaySettings::direct().with_retry_delay(Duration::from_millis(5));
    let gateway = Arc::new(RelayGateway::new(settings).unwrap());
    CatalogClient::new(gateway, endpoints(server))
}

fn item(id: &str, title: &str, pub_date: &str, category: &str) -> Value {
    json!({
        "itemId": id,
        "title": title,
        "author": "author",
        "publisher": "publisher",
        "pubDate": pub_date,
        "priceStandard": 15000,
        "priceSales": 13500,
        "categoryName": category
    })
}

async fn mount_list(server: &MockServer, query_type: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/ttb/api/ItemList.aspx"))
        .and(query_param("QueryType", query_type))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_search_keeps_only_recent_items() {
    let server = MockServer::start().await;
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

    Mock::given(method("GET"))
        .and(path("/ttb/api/ItemSearch.aspx"))
        .and(query_param("Query", "역사"))
        .and(query_param("QueryType", "Keyword"))
        .and(query_param("ttbkey", "ttb-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "item": [
                item("old", "13 months", "2025-09-18", "국내도서>역사"),
                item("new", "2 months", "2026-08-18", "국내도서>역사"),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let books = direct_client(&server)
        .search_as_of("역사", "ttb-key", SearchTarget::Keyword, 1, today)
        .await
        .unwrap();

    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, "new");
}

#[tokio::test]
async fn test_search_keeps_unparsable_dates_and_drops_comics() {
    let server = MockServer::start().await;
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

    Mock::given(path("/ttb/api/ItemSearch.aspx"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "item": [
                item("a", "undated", "출간예정", "국내도서>소설"),
                item("b", "comic", "2026-09-01", "국내도서>만화>웹툰"),
            ]
        })))
        .mount(&server)
        .await;

    let books = direct_client(&server)
        .search_as_of("anything", "ttb-key", SearchTarget::Title, 1, today)
        .await
        .unwrap();

    assert_eq!(books.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(), ["a"]);
}

#[tokio::test]
async fn test_search_provider_error() {
    let server = MockServer::start().await;
    Mock::given(path("/ttb/api/ItemSearch.aspx"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"errorCode": 2, "errorMessage": "잘못된 TTBKey"})),
        )
        .mount(&server)
        .await;

    let err = direct_client(&server)
        .search("역사", "bad", SearchTarget::Keyword, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Provider { .. }));
}

#[tokio::test]
async fn test_combined_merges_with_new_releases_winning() {
    let server = MockServer::start().await;

    mount_list(
        &server,
        "Bestseller",
        json!({"item": [
            item("1", "best one", "2026-01-01", "국내도서>소설"),
            item("2", "best two", "2026-01-01", "국내도서>소설"),
            item("3", "best three", "2026-01-01", "국내도서>소설"),
        ]}),
    )
    .await;
    mount_list(
        &server,
        "ItemNewSpecial",
        json!({"item": [
            item("2", "new two", "2026-02-02", "국내도서>에세이"),
            item("4", "new four", "2026-02-02", "국내도서>에세이"),
        ]}),
    )
    .await;

    let books = direct_client(&server)
        .fetch(DiscoverySource::Combined, Some("ttb-key"), None, 1)
        .await
        .unwrap();

    // |B| + |N| - k = 3 + 2 - 1
    assert_eq!(books.len(), 4);
    let shared = books.iter().find(|b| b.id == "2").unwrap();
    assert_eq!(shared.title, "new two");
    assert_eq!(shared.pub_date, "2026-02-02");
}

#[tokio::test]
async fn test_comics_dropped_for_bestseller_but_kept_for_editor_picks() {
    let server = MockServer::start().await;

    mount_list(
        &server,
        "Bestseller",
        json!({"item": [
            item("1", "comic", "2026-01-01", "국내도서>만화"),
            item("2", "novel", "2026-01-01", "국내도서>소설"),
        ]}),
    )
    .await;
    Mock::given(path("/api/recommandList"))
        .and(query_param("authKey", "lib-key"))
        .and(query_param("pageSize", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"docs": [
                {"doc": {"no": 1, "bookname": "comic", "isbn13": "9780000000001", "class_nm": "국내도서>만화"}},
                {"doc": {"no": 2, "bookname": "novel", "isbn13": "9780000000002", "class_nm": "국내도서>소설"}}
            ]}
        })))
        .mount(&server)
        .await;

    let client = direct_client(&server);

    let bestsellers = client
        .fetch(DiscoverySource::Bestseller, Some("ttb-key"), None, 1)
        .await
        .unwrap();
    assert_eq!(bestsellers.len(), 1);
    assert_eq!(bestsellers[0].title, "novel");

    let picks = client
        .fetch(DiscoverySource::EditorRecommend, None, Some("lib-key"), 1)
        .await
        .unwrap();
    assert_eq!(picks.len(), 2);
    assert_eq!(picks[0].id, "nlk-9780000000001");
    assert!(picks.iter().all(|b| b.price_standard == 0 && b.price_sales == 0));
}

#[tokio::test]
async fn test_validate_returns_false_when_relays_exhausted() {
    let server = MockServer::start().await;
    Mock::given(path("/relay"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&server)
        .await;

    let settings = RelaySettings::default()
        .with_relays(vec![
            Relay::prefix(format!("{}/relay?url=", server.uri())),
            Relay::prefix(format!("{}/relay?u=", server.uri())),
        ])
        .with_retry_delay(Duration::from_millis(5));
    let gateway = Arc::new(RelayGateway::new(settings).unwrap());
    let client = CatalogClient::new(gateway, endpoints(&server));

    assert!(!client.validate_credential(CredentialKind::Catalog, "ttb-key").await);
}

#[tokio::test]
async fn test_validate_accepts_well_formed_responses() {
    let server = MockServer::start().await;
    mount_list(&server, "Bestseller", json!({"item": []})).await;
    Mock::given(path("/api/recommandList"))
        .and(query_param("pageNo", "1"))
        .and(query_param("pageSize", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": {"docs": []}})))
        .mount(&server)
        .await;

    let client = direct_client(&server);
    assert!(client.validate_credential(CredentialKind::Catalog, "ttb-key").await);
    assert!(client.validate_credential(CredentialKind::Library, "lib-key").await);
}
