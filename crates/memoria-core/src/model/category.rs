//! Category labels attached to memories and beliefs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A classification applied to a memory or belief.
///
/// `tags` is a set — insertion order is irrelevant, so it is stored as a
/// `BTreeSet` for deterministic serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLabel {
    pub primary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub confidence: f64,
}

impl CategoryLabel {
    pub fn new(primary: impl Into<String>, confidence: f64) -> Self {
        Self {
            primary: primary.into(),
            secondary: None,
            tags: BTreeSet::new(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// The fallback label used when categorization fails.
    ///
    /// Confidence is capped at `0.2` — low enough to never outrank a real match.
    pub fn unknown() -> Self {
        Self::new("Unknown", 0.2)
    }

    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary = Some(secondary.into());
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags.extend(tags);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_label_has_capped_confidence() {
        let label = CategoryLabel::unknown();
        assert_eq!(label.primary, "Unknown");
        assert!(label.confidence <= 0.2);
    }

    #[test]
    fn confidence_clamps_into_unit_interval() {
        assert_eq!(CategoryLabel::new("x", 1.5).confidence, 1.0);
        assert_eq!(CategoryLabel::new("x", -1.0).confidence, 0.0);
    }
}
