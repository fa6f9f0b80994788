//! Serde serialization/deserialization tests for core types.
//!
//! These tests pin the JSON field names shared with the CLI output, the
//! credential file and the analysis response schema.

use crate::{AnalysisReport, ApiKeys, Book, BookStatus, CartItem, DiscoverySource};
use chrono::{TimeZone, Utc};

// ============================================================================
// Book Serde Tests
// ============================================================================

#[test]
fn test_book_missing_status_is_discovery() {
    let json = r#"{"id": "42", "title": "Dune"}"#;
    let book: Book = serde_json::from_str(json).unwrap();
    assert_eq!(book.status, BookStatus::Discovery);
    assert_eq!(book.price_standard, 0);
    assert!(book.category_name.is_none());
}

#[test]
fn test_book_camel_case_fields() {
    let mut book = Book::new("42", "Dune");
    book.price_sales = 9000;
    book.category_name = Some("국내도서>소설".to_string());
    book.status = BookStatus::Confirmed;

    let value = serde_json::to_value(&book).unwrap();
    assert_eq!(value["priceSales"], 9000);
    assert_eq!(value["categoryName"], "국내도서>소설");
    assert_eq!(value["status"], "confirmed");
}

#[test]
fn test_cart_item_flattens_book() {
    let added = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let item = CartItem::new(Book::new("7", "Solaris"), added);

    let value = serde_json::to_value(&item).unwrap();
    assert_eq!(value["id"], "7");
    assert_eq!(value["title"], "Solaris");
    assert!(value["addedAt"].as_str().unwrap().starts_with("2026-03-01"));

    let back: CartItem = serde_json::from_value(value).unwrap();
    assert_eq!(back, item);
}

// ============================================================================
// Credentials & Report
// ============================================================================

#[test]
fn test_api_keys_defaults_when_fields_absent() {
    let keys: ApiKeys = serde_json::from_str("{}").unwrap();
    assert_eq!(keys, ApiKeys::default());

    let keys: ApiKeys = serde_json::from_str(r#"{"catalogKey": "ttb"}"#).unwrap();
    assert_eq!(keys.catalog_key, "ttb");
    assert_eq!(keys.library_key, "");
}

#[test]
fn test_analysis_report_schema_names() {
    let json = r#"{
        "summary": "Balanced list",
        "budgetEfficiency": "Good",
        "categoryDistribution": "Mostly fiction",
        "recommendationScore": 87
    }"#;
    let report: AnalysisReport = serde_json::from_str(json).unwrap();
    assert_eq!(report.recommendation_score, 87);
    assert_eq!(report.budget_efficiency, "Good");
}

#[test]
fn test_analysis_report_rejects_missing_field() {
    let json = r#"{"summary": "x", "budgetEfficiency": "y", "categoryDistribution": "z"}"#;
    assert!(serde_json::from_str::<AnalysisReport>(json).is_err());
}

#[test]
fn test_discovery_source_serde() {
    assert_eq!(
        serde_json::to_string(&DiscoverySource::ItemNewSpecial).unwrap(),
        r#""itemNewSpecial""#
    );
    let source: DiscoverySource = serde_json::from_str(r#""editorRecommend""#).unwrap();
    assert_eq!(source, DiscoverySource::EditorRecommend);
}
