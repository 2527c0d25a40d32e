//! Pattern-based extraction fallback — the always-healthy default C2
//! implementation.
//!
//! Recognizes preference statements ("I like/love/prefer/hate X"),
//! factual statements ("X is/lives in/works at Y"), and negations
//! ("I don't like X" / "X is not Y") via regex. An AI-backed provider
//! implementing the same `ExtractionProvider` trait can replace this one
//! without the rest of the engine changing.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::capability::{text_jaccard_similarity, CandidateBelief, ExtractionProvider};
use crate::model::CategoryLabel;

static PREFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(i|[a-z]+)\s+(don't|doesn't|do not|does not)?\s*(like|love|prefer|hate|enjoy|dislike)s?\s+(.+)").unwrap()
});

static FACTUAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)\s+(is not|isn't|is|lives in|lived in|works at|worked at|works for)\s+(.+)$").unwrap()
});

const NEGATION_WORDS: [&str; 6] = ["don't", "doesn't", "do not", "does not", "not", "isn't"];

fn is_negated(text: &str) -> bool {
    let lower = text.to_lowercase();
    NEGATION_WORDS.iter().any(|w| lower.contains(w))
}

/// Extract zero or more candidate beliefs from free-form content using
/// regex patterns. One sentence maps to at most one candidate.
fn extract_candidates(content: &str, category_hint: &CategoryLabel) -> Vec<CandidateBelief> {
    let mut candidates = Vec::new();

    for sentence in content.split(['.', '\n']) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        if let Some(caps) = PREFERENCE_RE.captures(sentence) {
            let positive = !is_negated(sentence);
            let verb = &caps[3];
            let object = caps[4].trim_end_matches(['!', '?']).trim();
            candidates.push(CandidateBelief {
                statement: format!("User {} {}", verb.to_lowercase(), object),
                category: CategoryLabel::new("preference", 0.75),
                confidence: 0.75,
                positive,
                tags: vec!["preference".to_string()],
                reasoning: "matched preference pattern".to_string(),
            });
            continue;
        }

        if let Some(caps) = FACTUAL_RE.captures(sentence) {
            let verb = &caps[2];
            let positive = !verb.to_lowercase().contains("not") && !verb.contains('\'');
            let subject = caps[1].trim();
            let object = caps[3].trim_end_matches(['!', '?']).trim();
            candidates.push(CandidateBelief {
                statement: format!("{} {} {}", subject, verb, object),
                category: category_hint.clone(),
                confidence: 0.7,
                positive,
                tags: vec![],
                reasoning: "matched factual pattern".to_string(),
            });
        }
    }

    candidates
}

/// Crude lexical contradiction heuristic: same subject tokens, one
/// statement negated and the other not, or the trailing noun phrases
/// differ entirely while the leading tokens overlap (e.g. "lives in
/// Arrakis" vs "lives in Caladan").
fn looks_contradictory(a: &str, b: &str) -> bool {
    let a_negated = is_negated(a);
    let b_negated = is_negated(b);
    let overlap = text_jaccard_similarity(a, b);

    if a_negated != b_negated && overlap > 0.3 {
        return true;
    }

    // Same leading words (subject + verb), different trailing object.
    let split_tail = |s: &str| -> (String, String) {
        let words: Vec<&str> = s.split_whitespace().collect();
        if words.len() < 2 {
            return (s.to_string(), String::new());
        }
        let head = words[..words.len() - 1].join(" ").to_lowercase();
        let tail = words[words.len() - 1].to_lowercase();
        (head, tail)
    };
    let (head_a, tail_a) = split_tail(a);
    let (head_b, tail_b) = split_tail(b);
    !head_a.is_empty() && head_a == head_b && tail_a != tail_b
}

/// The pattern-based fallback extraction provider.
pub struct PatternExtractionProvider;

impl Default for PatternExtractionProvider {
    fn default() -> Self {
        Self
    }
}

#[async_trait]
impl ExtractionProvider for PatternExtractionProvider {
    async fn extract_beliefs(&self, content: &str, _agent_id: &str, category_hint: &CategoryLabel) -> Result<Vec<CandidateBelief>, String> {
        Ok(extract_candidates(content, category_hint))
    }

    async fn similarity(&self, statement_a: &str, statement_b: &str) -> Result<f64, String> {
        Ok(text_jaccard_similarity(statement_a, statement_b))
    }

    async fn are_conflicting(&self, statement_a: &str, statement_b: &str, _category_a: &CategoryLabel, _category_b: &CategoryLabel) -> Result<bool, String> {
        Ok(looks_contradictory(statement_a, statement_b))
    }

    async fn extract_category(&self, statement: &str) -> Result<(CategoryLabel, f64), String> {
        if PREFERENCE_RE.is_match(statement) {
            Ok((CategoryLabel::new("preference", 0.75), 0.75))
        } else if FACTUAL_RE.is_match(statement) {
            Ok((CategoryLabel::new("fact", 0.6), 0.6))
        } else {
            Ok((CategoryLabel::unknown(), 0.2))
        }
    }

    async fn calculate_confidence(&self, content: &str, statement: &str, _context: &str) -> Result<(f64, String), String> {
        let overlap = text_jaccard_similarity(content, statement);
        let confidence = (0.5 + overlap * 0.5).clamp(0.0, 1.0);
        Ok((confidence, "derived from content/statement lexical overlap".to_string()))
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}
