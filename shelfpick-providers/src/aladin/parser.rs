//! Aladin response parser.

use serde::Deserialize;
use serde_json::Value;
use shelfpick_core::{Book, BookStatus};
use tracing::debug;

use crate::error::CatalogError;
use crate::lenient;

/// Top-level Aladin response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AladinResponse {
    /// Business error code.
    #[serde(default, deserialize_with = "lenient::code")]
    pub error_code: Option<String>,
    /// Business error message.
    #[serde(default)]
    pub error_message: Option<String>,
    /// Result items.
    #[serde(default)]
    pub item: Option<Vec<AladinItem>>,
}

/// One Aladin result item.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
#[allow(missing_docs)]
pub struct AladinItem {
    #[serde(deserialize_with = "lenient::string")]
    pub item_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub author: String,
    #[serde(deserialize_with = "lenient::string")]
    pub publisher: String,
    #[serde(deserialize_with = "lenient::string")]
    pub pub_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub cover: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string")]
    pub isbn13: String,
    #[serde(deserialize_with = "lenient::amount")]
    pub price_standard: u64,
    #[serde(deserialize_with = "lenient::amount")]
    pub price_sales: u64,
    #[serde(deserialize_with = "lenient::string")]
    pub link: String,
    pub category_name: Option<String>,
}

impl AladinItem {
    /// Converts to a discovery-stage [`Book`].
    pub fn into_book(self) -> Book {
        let id = if self.item_id.is_empty() {
            self.isbn13.clone()
        } else {
            self.item_id
        };

        Book {
            id,
            title: self.title,
            author: self.author,
            publisher: self.publisher,
            pub_date: self.pub_date,
            cover: self.cover,
            description: self.description,
            isbn13: self.isbn13,
            price_standard: self.price_standard,
            price_sales: self.price_sales,
            link: self.link,
            category_name: self.category_name.filter(|c| !c.is_empty()),
            status: BookStatus::Discovery,
        }
    }
}

impl AladinResponse {
    /// Parses a raw body.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if the body is not an object.
    pub fn from_value(value: Value) -> Result<Self, CatalogError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Returns the provider error, if the body carries one.
    pub fn provider_error(&self) -> Option<CatalogError> {
        self.error_code.as_ref().map(|code| {
            CatalogError::provider(
                Some(code.clone()),
                self.error_message
                    .clone()
                    .unwrap_or_else(|| format!("error code {code}")),
            )
        })
    }

    /// True when the body has no error and an item array.
    pub fn is_valid(&self) -> bool {
        self.error_code.is_none() && self.item.is_some()
    }
}

/// Parses an Aladin body into books.
///
/// A missing `item` array yields an empty list.
///
/// # Errors
///
/// Returns [`CatalogError::Provider`] when the body reports an error code
/// and [`CatalogError::Parse`] when the body is not an Aladin response.
pub fn parse_items(value: Value) -> Result<Vec<Book>, CatalogError> {
    let response = AladinResponse::from_value(value)?;
    if let Some(err) = response.provider_error() {
        return Err(err);
    }

    let books: Vec<Book> = response
        .item
        .unwrap_or_default()
        .into_iter()
        .map(AladinItem::into_book)
        .collect();
    debug!(count = books.len(), "Parsed catalog items");
    Ok(books)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_items() {
        let body = json!({
            "version": "20131101",
            "totalResults": 1,
            "item": [{
                "itemId": 123456,
                "title": "역사의 쓸모",
                "author": "최태성 (지은이)",
                "publisher": "다산초당",
                "pubDate": "2026-05-01",
                "cover": "https://image.aladin.co.kr/cover.jpg",
                "description": "desc",
                "isbn13": "9791130600000",
                "priceStandard": 16000,
                "priceSales": 14400,
                "link": "https://www.aladin.co.kr/shop/wproduct.aspx?ItemId=123456",
                "categoryName": "국내도서>역사>한국사"
            }]
        });

        let books = parse_items(body).unwrap();
        assert_eq!(books.len(), 1);
        let book = &books[0];
        assert_eq!(book.id, "123456");
        assert_eq!(book.price_standard, 16000);
        assert_eq!(book.price_sales, 14400);
        assert_eq!(book.status, BookStatus::Discovery);
        assert_eq!(book.category_name.as_deref(), Some("국내도서>역사>한국사"));
    }

    #[test]
    fn test_provider_error() {
        let body = json!({"errorCode": 8, "errorMessage": "잘못된 TTBKey 입니다."});
        match parse_items(body).unwrap_err() {
            CatalogError::Provider { code, message } => {
                assert_eq!(code.as_deref(), Some("8"));
                assert_eq!(message, "잘못된 TTBKey 입니다.");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_missing_item_is_empty() {
        assert!(parse_items(json!({"totalResults": 0})).unwrap().is_empty());
    }

    #[test]
    fn test_not_an_object() {
        assert!(matches!(parse_items(json!([1, 2])), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_validity() {
        let ok = AladinResponse::from_value(json!({"item": []})).unwrap();
        assert!(ok.is_valid());
        let missing = AladinResponse::from_value(json!({})).unwrap();
        assert!(!missing.is_valid());
        let failed = AladinResponse::from_value(json!({"errorCode": 1, "item": []})).unwrap();
        assert!(!failed.is_valid());
    }
}
