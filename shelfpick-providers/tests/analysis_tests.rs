//! Analysis client against a mock Gemini endpoint.

use serde_json::json;
use shelfpick_core::Book;
use shelfpick_providers::{AnalysisClient, AnalysisConfig, AnalysisError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> AnalysisConfig {
    AnalysisConfig {
        base_url: format!("{}/v1beta", server.uri()),
        api_key: Some("gemini-key".into()),
        ..Default::default()
    }
}

fn books() -> Vec<Book> {
    let mut book = Book::new("1", "역사의 쓸모");
    book.price_sales = 14400;
    vec![book]
}

#[tokio::test]
async fn test_analyze_parses_structured_reply() {
    let server = MockServer::start().await;
    let report = json!({
        "summary": "Strong history selection",
        "budgetEfficiency": "Within budget",
        "categoryDistribution": "History 100%",
        "recommendationScore": 76
    });

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "gemini-key"))
        .and(body_partial_json(json!({
            "generationConfig": {"responseMimeType": "application/json"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": report.to_string()}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AnalysisClient::new(config(&server)).unwrap();
    let result = client.analyze(&books()).await.unwrap();
    assert_eq!(result.summary, "Strong history selection");
    assert_eq!(result.recommendation_score, 76);
}

#[tokio::test]
async fn test_analyze_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}
        })))
        .mount(&server)
        .await;

    let client = AnalysisClient::new(config(&server)).unwrap();
    match client.analyze(&books()).await.unwrap_err() {
        AnalysisError::Status { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_selection_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = AnalysisClient::new(config(&server)).unwrap();
    let report = client.analyze(&[]).await.unwrap();
    assert_eq!(report.recommendation_score, 0);
}
