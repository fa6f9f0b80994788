//! Parser edge case and error handling tests.
//!
//! These tests verify parser behavior with malformed, partial, or edge case inputs.

#[cfg(test)]
mod aladin_parser_edge_tests {
    use crate::aladin::parser::parse_items;
    use crate::error::CatalogError;
    use serde_json::json;

    // ========================================================================
    // Field type variations
    // ========================================================================

    #[test]
    fn test_prices_as_strings() {
        let body = json!({"item": [{"itemId": "1", "priceStandard": "18,000", "priceSales": " 16200 "}]});
        let book = &parse_items(body).unwrap()[0];
        assert_eq!(book.price_standard, 18000);
        assert_eq!(book.price_sales, 16200);
    }

    #[test]
    fn test_prices_garbage_become_zero() {
        let body = json!({"item": [{"itemId": 1, "priceStandard": "free", "priceSales": -5}]});
        let book = &parse_items(body).unwrap()[0];
        assert_eq!(book.price_standard, 0);
        assert_eq!(book.price_sales, 0);
    }

    #[test]
    fn test_fractional_price_rounds() {
        let body = json!({"item": [{"itemId": 1, "priceSales": 9999.6}]});
        assert_eq!(parse_items(body).unwrap()[0].price_sales, 10000);
    }

    #[test]
    fn test_isbn_as_number() {
        let body = json!({"item": [{"itemId": 7, "isbn13": 9791130600000_u64}]});
        assert_eq!(parse_items(body).unwrap()[0].isbn13, "9791130600000");
    }

    #[test]
    fn test_missing_item_id_falls_back_to_isbn() {
        let body = json!({"item": [{"isbn13": "9788900000002", "title": "no id"}]});
        assert_eq!(parse_items(body).unwrap()[0].id, "9788900000002");
    }

    #[test]
    fn test_null_fields() {
        let body = json!({"item": [{"itemId": null, "title": "t", "categoryName": null}]});
        let book = &parse_items(body).unwrap()[0];
        assert!(book.id.is_empty());
        assert!(book.category_name.is_none());
    }

    #[test]
    fn test_empty_category_is_none() {
        let body = json!({"item": [{"itemId": 1, "categoryName": ""}]});
        assert!(parse_items(body).unwrap()[0].category_name.is_none());
    }

    #[test]
    fn test_null_text_fields_keep_the_page() {
        let body = json!({"item": [
            {"itemId": 1, "title": "ok"},
            {
                "itemId": 2,
                "title": null,
                "author": null,
                "publisher": null,
                "pubDate": null,
                "cover": null,
                "description": null,
                "link": null
            }
        ]});
        let books = parse_items(body).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[1].id, "2");
        assert!(books[1].title.is_empty());
        assert!(books[1].description.is_empty());
        assert!(books[1].pub_date.is_empty());
    }

    // ========================================================================
    // Error shapes
    // ========================================================================

    #[test]
    fn test_error_code_without_message() {
        match parse_items(json!({"errorCode": "3"})).unwrap_err() {
            CatalogError::Provider { code, message } => {
                assert_eq!(code.as_deref(), Some("3"));
                assert_eq!(message, "error code 3");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_error_code_with_items_is_still_error() {
        let body = json!({"errorCode": 1, "errorMessage": "x", "item": [{"itemId": 1}]});
        assert!(matches!(parse_items(body), Err(CatalogError::Provider { .. })));
    }

    #[test]
    fn test_null_error_code_is_not_error() {
        let body = json!({"errorCode": null, "item": []});
        assert!(parse_items(body).unwrap().is_empty());
    }

    #[test]
    fn test_item_not_array() {
        assert!(matches!(
            parse_items(json!({"item": "nope"})),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_scalar_body() {
        assert!(matches!(parse_items(json!("html")), Err(CatalogError::Parse(_))));
    }
}

#[cfg(test)]
mod library_parser_edge_tests {
    use crate::error::CatalogError;
    use crate::library::parser::parse_docs;
    use serde_json::json;

    #[test]
    fn test_empty_docs() {
        assert!(parse_docs(json!({"response": {"docs": []}}), 0).unwrap().is_empty());
    }

    #[test]
    fn test_missing_docs_is_empty() {
        assert!(parse_docs(json!({"response": {"resultNum": 0}}), 0).unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_isbn_uses_sequence_number() {
        let body = json!({"response": {"docs": [{"doc": {"no": 4, "isbn13": "  "}}]}});
        assert_eq!(parse_docs(body, 0).unwrap()[0].id, "nlk-4");
    }

    #[test]
    fn test_numeric_publication_year() {
        let body = json!({"response": {"docs": [{"doc": {"isbn13": "1", "publication_year": 2025}}]}});
        assert_eq!(parse_docs(body, 0).unwrap()[0].pub_date, "2025");
    }

    #[test]
    fn test_null_text_fields_keep_the_page() {
        let body = json!({"response": {"docs": [
            {"doc": {"isbn13": "1", "bookname": "ok"}},
            {"doc": {
                "isbn13": "2",
                "bookname": null,
                "authors": null,
                "publisher": null,
                "bookImageURL": null,
                "description": null,
                "bookDtlUrl": null
            }}
        ]}});
        let books = parse_docs(body, 0).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[1].id, "nlk-2");
        assert!(books[1].title.is_empty());
        assert!(books[1].link.is_empty());
    }

    #[test]
    fn test_doc_without_wrapper() {
        let body = json!({"response": {"docs": [{"bookname": "unwrapped"}]}});
        assert!(matches!(parse_docs(body, 0), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_response_null() {
        assert!(matches!(
            parse_docs(json!({"response": null}), 0),
            Err(CatalogError::Parse(_))
        ));
    }
}
