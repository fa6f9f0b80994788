//! Prompt and schema for the analysis request.

use serde_json::{json, Value};
use shelfpick_core::Book;

/// Renders the confirmed list as the analysis prompt.
pub fn render(books: &[Book]) -> String {
    let total: u64 = books.iter().map(|b| b.price_sales).sum();

    let mut prompt = String::from(
        "You are an acquisitions librarian. Review the following purchase list \
         and justify it for a library budget committee.\n\n",
    );
    prompt.push_str(&format!("Books ({}), total sale price {total} KRW:\n", books.len()));
    for (i, book) in books.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. {} / {} / {} / {} / {} KRW / {}\n",
            i + 1,
            book.title,
            book.author,
            book.publisher,
            book.pub_date,
            book.price_sales,
            book.category_name.as_deref().unwrap_or("uncategorized"),
        ));
    }
    prompt.push_str(
        "\nReturn a short summary of the selection, an assessment of budget \
         efficiency, a description of the category distribution, and a \
         recommendation score from 0 to 100.",
    );
    prompt
}

/// Structured-output schema for [`shelfpick_core::AnalysisReport`].
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "budgetEfficiency": { "type": "STRING" },
            "categoryDistribution": { "type": "STRING" },
            "recommendationScore": { "type": "INTEGER" }
        },
        "required": [
            "summary",
            "budgetEfficiency",
            "categoryDistribution",
            "recommendationScore"
        ]
    })
}
