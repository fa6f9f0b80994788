//! Post-fetch filters.
//!
//! - [`retain_recent`] drops search results published more than a year ago
//! - [`drop_comics`] drops commercial-catalog comics
//! - [`dedup_last_wins`] merges listings by id

use chrono::{DateTime, Months, NaiveDate};
use shelfpick_core::Book;
use std::collections::HashMap;

/// Category marker for comics in the commercial catalog's taxonomy.
pub const COMICS_MARKER: &str = "만화";

/// Date layouts seen in provider `pubDate` fields.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%Y.%m.%d", "%Y/%m/%d"];

// ============================================================================
// Dates
// ============================================================================

/// Parses a provider publication date.
///
/// Accepts full dates in the common layouts, RFC 3339 and RFC 2822
/// timestamps, `YYYY-MM` (first of month) and a bare `YYYY` (January 1).
pub fn parse_pub_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d") {
        return Some(date);
    }
    if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit()) {
        return raw.parse().ok().and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
    }
    None
}

/// The oldest publication date still considered recent on `today`.
pub fn recency_cutoff(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN)
}

// ============================================================================
// Filters
// ============================================================================

/// Keeps books published on or after one year before `today`.
///
/// Books whose date does not parse are kept.
pub fn retain_recent(books: Vec<Book>, today: NaiveDate) -> Vec<Book> {
    let cutoff = recency_cutoff(today);
    books
        .into_iter()
        .filter(|b| parse_pub_date(&b.pub_date).is_none_or(|d| d >= cutoff))
        .collect()
}

/// Drops books whose category contains [`COMICS_MARKER`].
pub fn drop_comics(books: Vec<Book>) -> Vec<Book> {
    books
        .into_iter()
        .filter(|b| !b.in_category(COMICS_MARKER))
        .collect()
}

/// Deduplicates by id.
///
/// Each id keeps the position of its first occurrence and the fields of
/// its last.
pub fn dedup_last_wins(books: impl IntoIterator<Item = Book>) -> Vec<Book> {
    let mut merged: Vec<Book> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for book in books {
        match index.get(&book.id) {
            Some(&i) => merged[i] = book,
            None => {
                index.insert(book.id.clone(), merged.len());
                merged.push(book);
            }
        }
    }

    merged
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(id: &str, pub_date: &str) -> Book {
        let mut book = Book::new(id, id);
        book.pub_date = pub_date.to_string();
        book
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_pub_date_layouts() {
        assert_eq!(parse_pub_date("2024-01-15"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_pub_date("20240115"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_pub_date("2024.01.15"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_pub_date("2024-01"), Some(ymd(2024, 1, 1)));
        assert_eq!(parse_pub_date("2024"), Some(ymd(2024, 1, 1)));
        assert_eq!(
            parse_pub_date("Mon, 15 Jan 2024 00:00:00 GMT"),
            Some(ymd(2024, 1, 15))
        );
        assert_eq!(parse_pub_date("2024-01-15T09:00:00+09:00"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_pub_date(""), None);
        assert_eq!(parse_pub_date("coming soon"), None);
        assert_eq!(parse_pub_date("2024-13-45"), None);
    }

    #[test]
    fn test_cutoff_is_exactly_one_year() {
        assert_eq!(recency_cutoff(ymd(2026, 10, 18)), ymd(2025, 10, 18));
        assert_eq!(recency_cutoff(ymd(2024, 2, 29)), ymd(2023, 2, 28));
    }

    #[test]
    fn test_retain_recent_boundaries() {
        let today = ymd(2026, 10, 18);
        let books = vec![
            dated("on-cutoff", "2025-10-18"),
            dated("day-before", "2025-10-17"),
            dated("recent", "2026-08-18"),
            dated("unparsable", "미정"),
            dated("blank", ""),
        ];

        let kept: Vec<String> = retain_recent(books, today).into_iter().map(|b| b.id).collect();
        assert_eq!(kept, vec!["on-cutoff", "recent", "unparsable", "blank"]);
    }

    #[test]
    fn test_drop_comics() {
        let mut comic = Book::new("c", "c");
        comic.category_name = Some("국내도서>만화>웹툰".to_string());
        let mut novel = Book::new("n", "n");
        novel.category_name = Some("국내도서>소설/시/희곡".to_string());
        let uncategorised = Book::new("u", "u");

        let kept: Vec<String> = drop_comics(vec![comic, novel, uncategorised])
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(kept, vec!["n", "u"]);
    }

    #[test]
    fn test_dedup_keeps_first_position_last_fields() {
        let mut first = Book::new("1", "old title");
        first.price_sales = 100;
        let other = Book::new("2", "two");
        let mut second = Book::new("1", "new title");
        second.price_sales = 90;

        let merged = dedup_last_wins(vec![first, other, second]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "1");
        assert_eq!(merged[0].title, "new title");
        assert_eq!(merged[0].price_sales, 90);
        assert_eq!(merged[1].id, "2");
    }
}
