//! Purchase-justification reports.

use serde::{Deserialize, Serialize};

/// Structured report returned by the analysis endpoint.
///
/// Field names match the response schema sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Overall summary of the selection.
    pub summary: String,
    /// Budget-efficiency commentary.
    pub budget_efficiency: String,
    /// Category-distribution commentary.
    pub category_distribution: String,
    /// Recommendation score, nominally 0-100 (not enforced).
    pub recommendation_score: i64,
}

impl AnalysisReport {
    /// The canned report for an empty selection.
    pub fn empty_selection() -> Self {
        Self {
            summary: "No books selected.".to_string(),
            budget_efficiency: "N/A".to_string(),
            category_distribution: "N/A".to_string(),
            recommendation_score: 0,
        }
    }
}
