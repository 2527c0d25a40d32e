//! C2 — Extraction Provider capability.

use async_trait::async_trait;

use crate::model::CategoryLabel;

/// One candidate belief proposed by an extraction provider for a piece of
/// memory content.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateBelief {
    pub statement: String,
    pub category: CategoryLabel,
    pub confidence: f64,
    /// `true` if the statement affirms something; `false` if it negates
    /// or contradicts something (see BRCA step 3d/3e).
    pub positive: bool,
    pub tags: Vec<String>,
    pub reasoning: String,
}

/// Content -> candidate beliefs; similarity and conflict judgments between
/// statements; category/confidence inference.
///
/// The engine never calls `extract_beliefs` twice for the same memory id.
#[async_trait]
pub trait ExtractionProvider: Send + Sync {
    async fn extract_beliefs(&self, content: &str, agent_id: &str, category_hint: &CategoryLabel) -> Result<Vec<CandidateBelief>, String>;

    async fn similarity(&self, statement_a: &str, statement_b: &str) -> Result<f64, String>;

    async fn are_conflicting(&self, statement_a: &str, statement_b: &str, category_a: &CategoryLabel, category_b: &CategoryLabel) -> Result<bool, String>;

    async fn extract_category(&self, statement: &str) -> Result<(CategoryLabel, f64), String>;

    async fn calculate_confidence(&self, content: &str, statement: &str, context: &str) -> Result<(f64, String), String>;

    async fn is_healthy(&self) -> bool;
}

/// Jaccard similarity over whitespace-tokenized, lowercased words.
///
/// Last-resort text similarity used when no extraction provider is
/// configured, or as the tie-breaking metric for text-only memory
/// similarity search.
pub fn text_jaccard_similarity(a: &str, b: &str) -> f64 {
    use std::collections::HashSet;

    let tokenize = |s: &str| -> HashSet<String> {
        s.to_lowercase()
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
            .filter(|w| !w.is_empty())
            .collect()
    };

    let set_a = tokenize(a);
    let set_b = tokenize(b);
    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}
