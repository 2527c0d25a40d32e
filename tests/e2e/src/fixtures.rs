//! Test doubles and builders shared across the integration test binaries.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use memoria_core::capability::{CandidateBelief, ExtractionProvider};
use memoria_core::model::CategoryLabel;
use memoria_core::providers::DeterministicEmbedder;
use memoria_core::stores::{InMemoryBeliefStore, InMemoryGraphStore, InMemoryMemoryStore};
use memoria_core::{Engine, EngineConfig, IngestInput};

#[derive(Debug, Clone)]
struct ScriptedResponse {
    candidates: Vec<CandidateBelief>,
    similarity: f64,
}

/// A queued `ExtractionProvider` double: each call to `extract_beliefs`
/// consumes the next queued response (and the similarity score that goes
/// with it); once drained, the last response repeats. Lets a scenario
/// script a specific extractor output per ingest call without a real
/// AI-backed provider.
pub struct ScriptedExtractionProvider {
    queue: Mutex<VecDeque<ScriptedResponse>>,
    last: Mutex<ScriptedResponse>,
    conflicting: AtomicBool,
    healthy: AtomicBool,
}

impl ScriptedExtractionProvider {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            last: Mutex::new(ScriptedResponse { candidates: Vec::new(), similarity: 0.0 }),
            conflicting: AtomicBool::new(false),
            healthy: AtomicBool::new(true),
        }
    }

    /// Queues a response: the candidates `extract_beliefs` returns next,
    /// paired with the similarity score `similarity` returns while that
    /// response is current.
    pub fn push(self, candidates: Vec<CandidateBelief>, similarity: f64) -> Self {
        self.queue.lock().unwrap().push_back(ScriptedResponse { candidates, similarity });
        self
    }

    pub fn with_conflicting(self, conflicting: bool) -> Self {
        self.conflicting.store(conflicting, Ordering::SeqCst);
        self
    }

    pub fn with_healthy(self, healthy: bool) -> Self {
        self.healthy.store(healthy, Ordering::SeqCst);
        self
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

impl Default for ScriptedExtractionProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionProvider for ScriptedExtractionProvider {
    async fn extract_beliefs(&self, _content: &str, _agent_id: &str, _category_hint: &CategoryLabel) -> Result<Vec<CandidateBelief>, String> {
        let response = match self.queue.lock().unwrap().pop_front() {
            Some(response) => {
                *self.last.lock().unwrap() = response.clone();
                response
            }
            None => self.last.lock().unwrap().clone(),
        };
        Ok(response.candidates)
    }

    async fn similarity(&self, _a: &str, _b: &str) -> Result<f64, String> {
        Ok(self.last.lock().unwrap().similarity)
    }

    async fn are_conflicting(&self, _a: &str, _b: &str, _category_a: &CategoryLabel, _category_b: &CategoryLabel) -> Result<bool, String> {
        Ok(self.conflicting.load(Ordering::SeqCst))
    }

    async fn extract_category(&self, _statement: &str) -> Result<(CategoryLabel, f64), String> {
        Ok((CategoryLabel::new("fact", 0.8), 0.8))
    }

    async fn calculate_confidence(&self, _content: &str, _statement: &str, _context: &str) -> Result<(f64, String), String> {
        Ok((0.7, "scripted".to_string()))
    }

    async fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }
}

pub fn candidate(statement: &str, confidence: f64, positive: bool) -> CandidateBelief {
    CandidateBelief {
        statement: statement.to_string(),
        category: CategoryLabel::new("fact", confidence),
        confidence,
        positive,
        tags: Vec::new(),
        reasoning: "scripted".to_string(),
    }
}

/// A fresh engine over in-memory stores, a deterministic embedder, and the
/// given extraction provider.
pub fn engine_with_extractor(extractor: Arc<dyn ExtractionProvider>) -> Engine {
    let config = EngineConfig::default();
    Engine::new(
        Arc::new(InMemoryMemoryStore::new(config.memory_similarity_drop_threshold)),
        Arc::new(InMemoryBeliefStore::new()),
        Arc::new(InMemoryGraphStore::new()),
        Some(Arc::new(DeterministicEmbedder::default())),
        extractor,
        config,
    )
}

pub fn ingest_input(agent_id: &str, content: &str) -> IngestInput {
    IngestInput {
        agent_id: agent_id.to_string(),
        content: content.to_string(),
        source: None,
        timestamp: None,
        metadata: None,
        dry_run: false,
    }
}
