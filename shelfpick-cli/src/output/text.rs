//! Text output formatting with colors.

use shelfpick_core::{AcquisitionBoard, AnalysisReport, ApiKeys, Book, BookStatus, CredentialKind};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Books
    // ========================================================================

    /// Formats one book as a single line.
    pub fn format_book_line(&self, index: usize, book: &Book) -> String {
        let mut line = format!(
            "{:>3}. {} {}",
            index + 1,
            self.dim(&format!("[{}]", book.id)),
            self.bold(&book.title)
        );

        let byline: Vec<&str> = [book.author.as_str(), book.publisher.as_str(), book.pub_date.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if !byline.is_empty() {
            line.push_str(&format!("\n       {}", byline.join(" / ")));
        }

        if book.price_sales > 0 || book.price_standard > 0 {
            line.push_str(&format!(
                "  {}",
                self.green(&format_price(book.price_sales))
            ));
            if book.price_standard > book.price_sales {
                line.push_str(&self.dim(&format!(" (list {})", format_price(book.price_standard))));
            }
        }

        if let Some(category) = &book.category_name {
            line.push_str(&format!("\n       {}", self.cyan(category)));
        }
        line
    }

    /// Formats a titled list of books.
    pub fn format_books(&self, title: &str, books: &[Book]) -> String {
        let mut lines = vec![format!("{} ({})", self.bold(title), books.len())];
        lines.push("─".repeat(40));

        if books.is_empty() {
            lines.push(self.dim("  (none)"));
        } else {
            lines.extend(books.iter().enumerate().map(|(i, b)| self.format_book_line(i, b)));
        }
        lines.join("\n")
    }

    /// Formats all three board columns.
    pub fn format_board(&self, board: &AcquisitionBoard, heading: &str) -> String {
        let mut sections = vec![self.bold(heading)];
        for status in BookStatus::all() {
            sections.push(self.format_books(status.display_name(), board.collection(*status)));
        }

        let total: u64 = board.confirmed().iter().map(|b| b.price_sales).sum();
        sections.push(format!("Confirmed total: {}", self.green(&format_price(total))));
        sections.join("\n\n")
    }

    // ========================================================================
    // Analysis
    // ========================================================================

    /// Formats an analysis report.
    pub fn format_report(&self, report: &AnalysisReport) -> String {
        let score = format!("{}/100", report.recommendation_score);
        let score = match report.recommendation_score {
            s if s >= 70 => self.green(&score),
            s if s >= 40 => self.yellow(&score),
            _ => self.red(&score),
        };

        [
            format!("{} {}", self.bold("Recommendation score:"), score),
            String::new(),
            self.bold("Summary"),
            report.summary.clone(),
            String::new(),
            self.bold("Budget efficiency"),
            report.budget_efficiency.clone(),
            String::new(),
            self.bold("Category distribution"),
            report.category_distribution.clone(),
        ]
        .join("\n")
    }

    // ========================================================================
    // Credentials
    // ========================================================================

    /// Formats the stored keys, masked.
    pub fn format_keys(&self, keys: &ApiKeys) -> String {
        CredentialKind::all()
            .iter()
            .map(|kind| {
                let value = if keys.configured(*kind).is_some() {
                    self.cyan(&keys.masked(*kind))
                } else {
                    self.dim("not set")
                };
                format!("{:<10} {}", format!("{kind}:"), value)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats a validation result.
    pub fn format_validation(&self, kind: CredentialKind, valid: bool) -> String {
        let status = if valid {
            self.green("✓ valid")
        } else {
            self.red("✗ rejected or unreachable")
        };
        format!("{:<10} {}", format!("{kind}:"), status)
    }

    /// Formats an error line.
    pub fn format_error(&self, message: &str) -> String {
        self.red(&format!("Error: {message}"))
    }

    // ========================================================================
    // Colors
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Formats a won amount with thousands separators.
pub fn format_price(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push('원');
    out
}
