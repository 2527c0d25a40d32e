//! memoria-core: a per-agent belief-memory engine.
//!
//! Memories go in through [`Engine::ingest`]; the pipeline behind it
//! categorizes, embeds, persists, and runs reinforcement/conflict
//! analysis over a per-agent belief set, which in turn sits in a typed,
//! temporally-qualified relationship graph. Every provider and store is
//! a capability trait (see [`capability`]) — swap a deterministic
//! embedder for a real one, or an in-memory store for a backed one,
//! without touching the pipeline that drives them.

mod brca;
mod categorization;
mod config;
mod error;
mod ids;
mod memory_encoding;
mod orchestrator;
mod relationship;
mod stats;

pub mod capability;
pub mod model;
pub mod providers;
pub mod stores;

use std::sync::Arc;

pub use brca::{Brca, UpdateResult};
pub use categorization::CategorizationEngine;
pub use config::{ConflictKind, EngineConfig, EngineConfigBuilder, ResolutionStrategies, ResolutionStrategy};
pub use error::{Error, Result};
pub use memory_encoding::MemoryEncodingEngine;
pub use orchestrator::{BeliefAnalysisStatus, IngestInput, IngestionOrchestrator, IngestionResult};
pub use relationship::{BeliefRelationshipService, RelationshipUpdate};
pub use stats::{ConfidenceBucket, EngineStats, StatsSnapshot};

use capability::{BeliefStore, EmbeddingProvider, ExtractionProvider, GraphStore, MemoryStore};

/// Wires the five capabilities into the four pipeline components behind
/// one shared [`EngineStats`], so counters incremented by [`Brca`] and
/// [`MemoryEncodingEngine`] are the same ones [`BeliefStore::distribution_stats`]
/// reads back.
pub struct Engine {
    orchestrator: IngestionOrchestrator,
    belief_store: Arc<dyn BeliefStore>,
    graph: BeliefRelationshipService,
    stats: Arc<EngineStats>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(
        memory_store: Arc<dyn MemoryStore>,
        belief_store: Arc<dyn BeliefStore>,
        graph_store: Arc<dyn GraphStore>,
        embedder: Option<Arc<dyn EmbeddingProvider>>,
        extraction: Arc<dyn ExtractionProvider>,
        config: EngineConfig,
    ) -> Self {
        let stats = Arc::new(EngineStats::new());

        let categorization = CategorizationEngine::new(extraction.clone());
        let memory_encoding = MemoryEncodingEngine::new(memory_store, embedder, config.clone(), stats.clone());
        let brca = Brca::new(belief_store.clone(), extraction, config.clone(), stats.clone());
        let graph = BeliefRelationshipService::new(graph_store, belief_store.clone(), config.clone(), stats.clone());

        Self {
            orchestrator: IngestionOrchestrator::new(categorization, memory_encoding, brca, config.clone()),
            belief_store,
            graph,
            stats,
            config,
        }
    }

    /// The ingestion entrypoint: categorize, encode, analyze.
    pub async fn ingest(&self, input: IngestInput) -> Result<IngestionResult> {
        self.orchestrator.ingest(input).await
    }

    pub fn validate(&self, input: &IngestInput) -> Vec<Error> {
        self.orchestrator.validate(input)
    }

    /// Memory surface: read-only and removal operations outside ingest.
    pub fn memory(&self) -> &MemoryEncodingEngine {
        self.orchestrator.memory_encoding()
    }

    /// Belief surface: the underlying store, for reads and direct writes
    /// (`updateConfidence`, `deactivate`) outside the per-memory pipeline.
    pub fn beliefs(&self) -> &Arc<dyn BeliefStore> {
        &self.belief_store
    }

    /// Belief surface: the analyzer driving `ingest`, for `resolveConflict`
    /// and related operations outside the per-memory pipeline.
    pub fn brca(&self) -> &Brca {
        self.orchestrator.brca()
    }

    /// Graph surface: relationship CRUD and the graph algorithms (C9).
    pub fn graph(&self) -> &BeliefRelationshipService {
        &self.graph
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
