//! Engine Statistics
//!
//! The only process-global state in the crate: monotonic counters for the
//! lifetime of the process, plus category/confidence distributions.
//! Incremented without ordering requirements — readers may observe
//! any consistent-per-counter snapshot.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// Confidence bucket used for reporting distributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBucket {
    High,
    Medium,
    Low,
}

impl ConfidenceBucket {
    pub fn classify(confidence: f64, config: &EngineConfig) -> Self {
        if confidence >= config.high_confidence_threshold {
            ConfidenceBucket::High
        } else if confidence >= 0.5 {
            ConfidenceBucket::Medium
        } else {
            ConfidenceBucket::Low
        }
    }
}

/// A snapshot of the engine-wide counters, safe to serialize for reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub analyses: u64,
    pub batch_analyses: u64,
    pub conflicts_detected: u64,
    pub conflicts_resolved: u64,
    pub beliefs_created: u64,
    pub beliefs_reinforced: u64,
    pub beliefs_weakened: u64,
    pub memories_encoded: u64,
    pub by_category: HashMap<String, u64>,
    pub by_confidence_bucket: HashMap<String, u64>,
}

/// Process-lifetime atomic counters behind a single encapsulating type.
///
/// `Default` gives every counter a zero start; counters never reset.
#[derive(Default)]
pub struct EngineStats {
    analyses: AtomicU64,
    batch_analyses: AtomicU64,
    conflicts_detected: AtomicU64,
    conflicts_resolved: AtomicU64,
    beliefs_created: AtomicU64,
    beliefs_reinforced: AtomicU64,
    beliefs_weakened: AtomicU64,
    memories_encoded: AtomicU64,
    by_category: DashMap<String, AtomicU64>,
    by_confidence_bucket: DashMap<ConfidenceBucket, AtomicU64>,
}

impl EngineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_analysis(&self) {
        self.analyses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch_analysis(&self) {
        self.batch_analyses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_conflict_detected(&self) {
        self.conflicts_detected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_conflict_resolved(&self) {
        self.conflicts_resolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_belief_created(&self, category: &str, confidence: f64, config: &EngineConfig) {
        self.beliefs_created.fetch_add(1, Ordering::Relaxed);
        self.bump_category(category);
        self.bump_bucket(ConfidenceBucket::classify(confidence, config));
    }

    pub fn record_belief_reinforced(&self) {
        self.beliefs_reinforced.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_belief_weakened(&self) {
        self.beliefs_weakened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_memory_encoded(&self, category: &str) {
        self.memories_encoded.fetch_add(1, Ordering::Relaxed);
        self.bump_category(category);
    }

    fn bump_category(&self, category: &str) {
        self.by_category
            .entry(category.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    fn bump_bucket(&self, bucket: ConfidenceBucket) {
        self.by_confidence_bucket
            .entry(bucket)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            analyses: self.analyses.load(Ordering::Relaxed),
            batch_analyses: self.batch_analyses.load(Ordering::Relaxed),
            conflicts_detected: self.conflicts_detected.load(Ordering::Relaxed),
            conflicts_resolved: self.conflicts_resolved.load(Ordering::Relaxed),
            beliefs_created: self.beliefs_created.load(Ordering::Relaxed),
            beliefs_reinforced: self.beliefs_reinforced.load(Ordering::Relaxed),
            beliefs_weakened: self.beliefs_weakened.load(Ordering::Relaxed),
            memories_encoded: self.memories_encoded.load(Ordering::Relaxed),
            by_category: self
                .by_category
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
                .collect(),
            by_confidence_bucket: self
                .by_confidence_bucket
                .iter()
                .map(|entry| {
                    let label = match entry.key() {
                        ConfidenceBucket::High => "high",
                        ConfidenceBucket::Medium => "medium",
                        ConfidenceBucket::Low => "low",
                    };
                    (label.to_string(), entry.value().load(Ordering::Relaxed))
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let stats = EngineStats::new();
        let config = EngineConfig::default();
        stats.record_analysis();
        stats.record_belief_created("preference", 0.9, &config);
        stats.record_belief_reinforced();

        let snap = stats.snapshot();
        assert_eq!(snap.analyses, 1);
        assert_eq!(snap.beliefs_created, 1);
        assert_eq!(snap.beliefs_reinforced, 1);
        assert_eq!(snap.by_category.get("preference"), Some(&1));
        assert_eq!(snap.by_confidence_bucket.get("high"), Some(&1));
    }

    #[test]
    fn confidence_bucket_boundaries() {
        let config = EngineConfig::default();
        assert_eq!(ConfidenceBucket::classify(0.8, &config), ConfidenceBucket::High);
        assert_eq!(ConfidenceBucket::classify(0.5, &config), ConfidenceBucket::Medium);
        assert_eq!(ConfidenceBucket::classify(0.49, &config), ConfidenceBucket::Low);
    }
}
