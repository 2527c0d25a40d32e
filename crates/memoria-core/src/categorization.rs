//! C6 — Categorization Engine
//!
//! Classifies content into a `CategoryLabel` and extracts tags. When the
//! configured provider is unhealthy, substitutes the always-available
//! `PatternExtractionProvider` rather than giving up; only a call that
//! still fails after that falls back to
//! `{primary: "Unknown", confidence: <=0.2}`.

use std::collections::BTreeSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::capability::ExtractionProvider;
use crate::model::CategoryLabel;
use crate::providers::PatternExtractionProvider;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());
static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s]+").unwrap());
static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}-\d{2}-\d{2}\b|\b\d{1,2}/\d{1,2}/\d{2,4}\b").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?\d[\d\-. ]{7,}\d").unwrap());

/// Classifies content using an `ExtractionProvider`, substituting the
/// pattern-based fallback when it reports unhealthy. Tag extraction is
/// always regex-based and runs regardless of provider health.
pub struct CategorizationEngine {
    provider: Arc<dyn ExtractionProvider>,
    fallback: PatternExtractionProvider,
}

impl CategorizationEngine {
    pub fn new(provider: Arc<dyn ExtractionProvider>) -> Self {
        Self { provider, fallback: PatternExtractionProvider }
    }

    /// `categorize(content, metadata) -> CategoryLabel`.
    #[tracing::instrument(skip(self, content))]
    pub async fn categorize(&self, content: &str) -> CategoryLabel {
        let result = if self.provider.is_healthy().await {
            self.provider.extract_category(content).await
        } else {
            tracing::warn!("extraction provider unhealthy, substituting pattern-based fallback");
            self.fallback.extract_category(content).await
        };

        match result {
            Ok((mut category, confidence)) => {
                category.tags.extend(self.extract_tags(content));
                category.confidence = confidence.clamp(0.0, 1.0);
                category
            }
            Err(reason) => {
                tracing::warn!(reason = %reason, "categorization failed, falling back to Unknown category");
                CategoryLabel::unknown()
            }
        }
    }

    /// `extractTags(content) -> set<string>`: regex-matched emails, URLs,
    /// dates, and phone numbers, independent of provider health.
    pub fn extract_tags(&self, content: &str) -> BTreeSet<String> {
        let mut tags = BTreeSet::new();
        for m in EMAIL_RE.find_iter(content) {
            tags.insert(m.as_str().to_string());
        }
        for m in URL_RE.find_iter(content) {
            tags.insert(m.as_str().to_string());
        }
        for m in DATE_RE.find_iter(content) {
            tags.insert(m.as_str().to_string());
        }
        for m in PHONE_RE.find_iter(content) {
            tags.insert(m.as_str().to_string());
        }
        tags
    }
}
