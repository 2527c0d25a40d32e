//! Engine Configuration
//!
//! Every magic number used by the belief/conflict pipeline is a field of
//! `EngineConfig`, built once at startup. No component reaches for an
//! ambient default at a call site.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Similarity metric used when comparing embedding vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    #[default]
    Cosine,
    Euclidean,
    Dot,
}

/// Resolution strategy applied to a detected conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// Deactivate the older belief; mark the conflict `ArchiveOld`.
    NewerWins,
    /// Deactivate the lower-confidence belief; mark the conflict `KeepOld`.
    HigherConfidence,
    /// Not implemented; falls through to `FlagForReview`.
    Merge,
    /// Leave both beliefs active and require a human decision.
    FlagForReview,
}

/// Conflict classification used to pick a resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    BeliefBelief,
    BeliefMemory,
    Unknown,
}

/// Map of conflict kind to resolution strategy, with a required default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionStrategies {
    pub strategies: HashMap<ConflictKind, ResolutionStrategy>,
    pub default: ResolutionStrategy,
}

impl Default for ResolutionStrategies {
    fn default() -> Self {
        let mut strategies = HashMap::new();
        strategies.insert(ConflictKind::BeliefBelief, ResolutionStrategy::FlagForReview);
        strategies.insert(ConflictKind::BeliefMemory, ResolutionStrategy::FlagForReview);
        Self {
            strategies,
            default: ResolutionStrategy::FlagForReview,
        }
    }
}

impl ResolutionStrategies {
    pub fn strategy_for(&self, kind: ConflictKind) -> ResolutionStrategy {
        self.strategies.get(&kind).copied().unwrap_or(self.default)
    }

    pub fn configure(&mut self, kind: ConflictKind, strategy: ResolutionStrategy) {
        self.strategies.insert(kind, strategy);
    }
}

/// Single configuration struct covering every tunable threshold, limit,
/// and resolution strategy the engine uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Confidence bump applied on reinforcement. Default `0.1`.
    pub reinforcement_increment: f64,
    /// Minimum similarity for a stored belief to count as a neighbor. Default `0.7`.
    pub neighbor_similarity_floor: f64,
    /// Minimum score for a memory record to survive `search_similar`. Default `0.15`.
    pub memory_similarity_drop_threshold: f64,
    /// Max neighbors considered per candidate. Default `10`.
    pub neighbor_lookup_k: usize,
    /// Threshold above which a belief is reported "high confidence". Default `0.8`.
    pub high_confidence_threshold: f64,
    /// Threshold below which a belief is reported "low confidence". Default `0.3`.
    pub low_confidence_threshold: f64,
    /// Maximum accepted content length for ingestion. Default `10_000`.
    pub max_content_length: usize,
    /// Maximum BFS depth for graph traversal operations. Default `5`.
    pub max_graph_traversal_depth: usize,
    /// Per-conflict-kind resolution strategy table.
    pub resolution_strategies: ResolutionStrategies,
    /// Fixed embedding dimension for this deployment. Default `1536`.
    pub embedding_dimension: usize,
    /// Similarity metric used for vector comparisons.
    pub similarity_metric: SimilarityMetric,
    /// Permitted clock skew when validating an ingestion timestamp against `now`.
    pub max_clock_skew_seconds: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reinforcement_increment: 0.1,
            neighbor_similarity_floor: 0.7,
            memory_similarity_drop_threshold: 0.15,
            neighbor_lookup_k: 10,
            high_confidence_threshold: 0.8,
            low_confidence_threshold: 0.3,
            max_content_length: 10_000,
            max_graph_traversal_depth: 5,
            resolution_strategies: ResolutionStrategies::default(),
            embedding_dimension: 1536,
            similarity_metric: SimilarityMetric::Cosine,
            max_clock_skew_seconds: 300,
        }
    }
}

/// Builder for `EngineConfig`, for deployments that only want to override
/// a handful of fields.
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self { config: EngineConfig::default() }
    }

    pub fn reinforcement_increment(mut self, value: f64) -> Self {
        self.config.reinforcement_increment = value;
        self
    }

    pub fn neighbor_similarity_floor(mut self, value: f64) -> Self {
        self.config.neighbor_similarity_floor = value;
        self
    }

    pub fn memory_similarity_drop_threshold(mut self, value: f64) -> Self {
        self.config.memory_similarity_drop_threshold = value;
        self
    }

    pub fn neighbor_lookup_k(mut self, value: usize) -> Self {
        self.config.neighbor_lookup_k = value;
        self
    }

    pub fn embedding_dimension(mut self, value: usize) -> Self {
        self.config.embedding_dimension = value;
        self
    }

    pub fn similarity_metric(mut self, value: SimilarityMetric) -> Self {
        self.config.similarity_metric = value;
        self
    }

    pub fn max_content_length(mut self, value: usize) -> Self {
        self.config.max_content_length = value;
        self
    }

    pub fn resolution_strategies(mut self, value: ResolutionStrategies) -> Self {
        self.config.resolution_strategies = value;
        self
    }

    pub fn build(self) -> EngineConfig {
        self.config
    }
}
