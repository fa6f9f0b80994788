//! Purchase-order CSV export.

use chrono::NaiveDate;
use shelfpick_core::Book;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::StoreError;

/// UTF-8 byte-order mark, so spreadsheet tools detect the encoding.
pub const BOM: &str = "\u{feff}";

/// Column headers.
pub const HEADER: [&str; 8] = [
    "Title",
    "Author",
    "Publisher",
    "PublicationDate",
    "ListPrice",
    "SalePrice",
    "ISBN13",
    "Category",
];

/// File name for an export made on `date`.
pub fn file_name(date: NaiveDate) -> String {
    format!("acquisition_list_{}.csv", date.format("%Y-%m-%d"))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Renders `books` as CSV text, BOM included.
///
/// Text columns are always quoted; price columns are bare integers.
pub fn render_csv(books: &[Book]) -> String {
    let mut out = String::from(BOM);
    out.push_str(&HEADER.join(","));
    out.push('\n');

    for book in books {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            quote(&book.title),
            quote(&book.author),
            quote(&book.publisher),
            quote(&book.pub_date),
            book.price_standard,
            book.price_sales,
            quote(&book.isbn13),
            quote(book.category_name.as_deref().unwrap_or_default()),
        ));
    }
    out
}

/// Writes `books` to `dir`, named for `date`.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub async fn write_csv(dir: &Path, books: &[Book], date: NaiveDate) -> Result<PathBuf, StoreError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name(date));
    tokio::fs::write(&path, render_csv(books)).await?;
    info!(path = %path.display(), rows = books.len(), "Exported purchase list");
    Ok(path)
}
