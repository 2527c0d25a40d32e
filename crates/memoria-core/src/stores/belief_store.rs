//! In-memory reference implementation of `BeliefStore` (C4).

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::capability::{text_jaccard_similarity, BeliefStore};
use crate::error::Result;
use crate::model::{Belief, BeliefConflict};
use crate::stats::{EngineStats, StatsSnapshot};

/// Per-agent arenas of beliefs and conflicts behind concurrent maps.
///
/// `find_similar` here is the store-native fallback path: plain text
/// similarity over active beliefs, used when no extraction provider is
/// configured. `BRCA`'s internal neighbor lookup instead
/// scores candidates with the configured `ExtractionProvider::similarity`,
/// which is provider-aware and is what the deterministic test scenarios
/// exercise — see `brca::find_neighbors`.
///
/// `stats` is shared (not owned) so the same counters surfaced by
/// `distribution_stats` are the ones `brca::Brca` increments — there is
/// exactly one `EngineStats` per running engine.
pub struct InMemoryBeliefStore {
    beliefs: DashMap<String, Belief>,
    conflicts: DashMap<String, BeliefConflict>,
    stats: Arc<EngineStats>,
}

impl Default for InMemoryBeliefStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBeliefStore {
    pub fn new() -> Self {
        Self::with_stats(Arc::new(EngineStats::new()))
    }

    pub fn with_stats(stats: Arc<EngineStats>) -> Self {
        Self {
            beliefs: DashMap::new(),
            conflicts: DashMap::new(),
            stats,
        }
    }

    pub fn stats(&self) -> Arc<EngineStats> {
        self.stats.clone()
    }
}

#[async_trait]
impl BeliefStore for InMemoryBeliefStore {
    async fn put_belief(&self, belief: Belief) -> Result<()> {
        self.beliefs.insert(belief.id.clone(), belief);
        Ok(())
    }

    async fn get_belief(&self, id: &str) -> Result<Option<Belief>> {
        Ok(self.beliefs.get(id).map(|entry| entry.clone()))
    }

    async fn beliefs_for_agent(&self, agent_id: &str, include_inactive: bool) -> Result<Vec<Belief>> {
        Ok(self
            .beliefs
            .iter()
            .filter(|entry| entry.agent_id == agent_id)
            .filter(|entry| include_inactive || entry.active)
            .map(|entry| entry.clone())
            .collect())
    }

    async fn beliefs_in_category(&self, category: &str, agent_id: Option<&str>) -> Result<Vec<Belief>> {
        Ok(self
            .beliefs
            .iter()
            .filter(|entry| entry.category.primary == category)
            .filter(|entry| agent_id.map(|a| a == entry.agent_id).unwrap_or(true))
            .map(|entry| entry.clone())
            .collect())
    }

    async fn find_similar(&self, statement: &str, agent_id: &str, floor: f64, k: usize) -> Result<Vec<(Belief, f64)>> {
        let mut scored: Vec<(Belief, f64)> = self
            .beliefs
            .iter()
            .filter(|entry| entry.agent_id == agent_id && entry.active)
            .map(|entry| (entry.clone(), text_jaccard_similarity(statement, &entry.statement)))
            .filter(|(_, score)| *score >= floor)
            .collect();
        scored.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    async fn low_confidence_beliefs(&self, threshold: f64, agent_id: Option<&str>) -> Result<Vec<Belief>> {
        Ok(self
            .beliefs
            .iter()
            .filter(|entry| entry.confidence < threshold)
            .filter(|entry| agent_id.map(|a| a == entry.agent_id).unwrap_or(true))
            .map(|entry| entry.clone())
            .collect())
    }

    async fn put_conflict(&self, conflict: BeliefConflict) -> Result<()> {
        self.conflicts.insert(conflict.id.clone(), conflict);
        Ok(())
    }

    async fn get_conflict(&self, id: &str) -> Result<Option<BeliefConflict>> {
        Ok(self.conflicts.get(id).map(|entry| entry.clone()))
    }

    async fn remove_conflict(&self, id: &str) -> Result<bool> {
        Ok(self.conflicts.remove(id).is_some())
    }

    async fn conflicts_for_agent(&self, agent_id: &str, unresolved_only: bool) -> Result<Vec<BeliefConflict>> {
        Ok(self
            .conflicts
            .iter()
            .filter(|entry| entry.agent_id == agent_id)
            .filter(|entry| !unresolved_only || !entry.resolved)
            .map(|entry| entry.clone())
            .collect())
    }

    async fn distribution_stats(&self) -> Result<StatsSnapshot> {
        Ok(self.stats.snapshot())
    }
}
