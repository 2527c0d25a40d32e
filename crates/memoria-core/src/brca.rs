//! C8 — Belief Reinforcement & Conflict Analyzer (BRCA)
//!
//! The per-memory pipeline: extract candidate beliefs, look up similar
//! existing beliefs, then reinforce, create, or flag a conflict for each
//! candidate. Wraps C2 (extraction) + C4 (belief storage).
//!
//! Concurrency discipline: a per-agent `tokio::sync::Mutex`
//! is held around the belief-store write phase of `analyze_new_memory`, so
//! two candidates within the same call — and two concurrent calls for the
//! same agent — never interleave their writes at finer granularity than
//! one belief/conflict write.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};

use crate::capability::{BeliefStore, CandidateBelief, ExtractionProvider};
use crate::config::{ConflictKind, EngineConfig, ResolutionStrategies, ResolutionStrategy};
use crate::error::{Error, Result};
use crate::ids;
use crate::model::{determine_conflict_shape, Belief, BeliefConflict, CategoryLabel, ConflictResolution, ConflictShape, MemoryRecord};
use crate::providers::PatternExtractionProvider;
use crate::stats::EngineStats;

/// Outcome of analyzing one memory (or a batch, merged in order).
#[derive(Debug, Clone, Default)]
pub struct UpdateResult {
    pub new_beliefs: Vec<Belief>,
    pub reinforced_beliefs: Vec<Belief>,
    /// Populated only by callers that explicitly weaken a belief (see
    /// `update_belief_confidence`); the per-memory algorithm never
    /// weakens a belief on its own.
    pub weakened_beliefs: Vec<Belief>,
    pub conflicts: Vec<BeliefConflict>,
}

impl UpdateResult {
    fn merge(&mut self, other: UpdateResult) {
        self.new_beliefs.extend(other.new_beliefs);
        self.reinforced_beliefs.extend(other.reinforced_beliefs);
        self.weakened_beliefs.extend(other.weakened_beliefs);
        self.conflicts.extend(other.conflicts);
    }
}

fn general_candidate(record: &MemoryRecord) -> CandidateBelief {
    CandidateBelief {
        statement: format!("General memory: {}", record.content),
        category: record.category.clone(),
        confidence: 0.5,
        positive: true,
        tags: Vec::new(),
        reasoning: "no candidates extracted; synthesized a general belief".to_string(),
    }
}

fn conflict_kind_of(shape: ConflictShape) -> ConflictKind {
    match shape {
        ConflictShape::BeliefBelief => ConflictKind::BeliefBelief,
        ConflictShape::BeliefMemory => ConflictKind::BeliefMemory,
        ConflictShape::Unknown => ConflictKind::Unknown,
    }
}

pub struct Brca {
    belief_store: Arc<dyn BeliefStore>,
    extraction: Arc<dyn ExtractionProvider>,
    config: EngineConfig,
    /// Live, reconfigurable copy of `config.resolution_strategies`; the
    /// config field is the startup snapshot, this is the authoritative
    /// table once `configure_resolution_strategies` has been called.
    resolution_strategies: RwLock<ResolutionStrategies>,
    stats: Arc<EngineStats>,
    locks: DashMap<String, Arc<Mutex<()>>>,
    /// Always-healthy substitute used whenever `extraction` reports
    /// unhealthy — mirrors the categorization engine's fallback so a down
    /// AI-backed provider degrades to pattern matching instead of
    /// silently producing zero candidates.
    fallback: PatternExtractionProvider,
}

impl Brca {
    pub fn new(belief_store: Arc<dyn BeliefStore>, extraction: Arc<dyn ExtractionProvider>, config: EngineConfig, stats: Arc<EngineStats>) -> Self {
        let resolution_strategies = RwLock::new(config.resolution_strategies.clone());
        Self {
            belief_store,
            extraction,
            config,
            resolution_strategies,
            stats,
            locks: DashMap::new(),
            fallback: PatternExtractionProvider,
        }
    }

    fn agent_lock(&self, agent_id: &str) -> Arc<Mutex<()>> {
        self.locks.entry(agent_id.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }

    /// Returns the configured provider if healthy, otherwise the pattern
    /// fallback. Re-checked per call site rather than cached, since health
    /// can change between the several extraction calls one analysis makes.
    async fn provider(&self) -> &(dyn ExtractionProvider + '_) {
        if self.extraction.is_healthy().await {
            self.extraction.as_ref()
        } else {
            tracing::warn!("extraction provider unhealthy, substituting pattern-based fallback");
            &self.fallback
        }
    }

    async fn extract_candidates(&self, record: &MemoryRecord) -> Vec<CandidateBelief> {
        match self.provider().await.extract_beliefs(&record.content, &record.agent_id, &record.category).await {
            Ok(candidates) => candidates,
            Err(reason) => {
                tracing::warn!(reason = %reason, memory_id = %record.id, "belief extraction failed, treating as zero candidates");
                Vec::new()
            }
        }
    }

    /// Scores every active belief of `agent_id` against `statement` via the
    /// configured `ExtractionProvider::similarity`, keeping those at or
    /// above the configured floor, capped at the configured k. This is
    /// deliberately provider-aware (unlike `BeliefStore::find_similar`,
    /// which is the store's own text-only fallback) — it is what lets a
    /// scripted extractor drive deterministic neighbor lookups in tests.
    async fn find_neighbors(&self, statement: &str, agent_id: &str) -> Result<Vec<(Belief, f64)>> {
        let active = self.belief_store.beliefs_for_agent(agent_id, false).await?;
        let provider = self.provider().await;
        let mut scored = Vec::with_capacity(active.len());
        for belief in active {
            match provider.similarity(statement, &belief.statement).await {
                Ok(score) if score >= self.config.neighbor_similarity_floor => scored.push((belief, score)),
                Ok(_) => {}
                Err(reason) => tracing::warn!(reason = %reason, belief_id = %belief.id, "similarity scoring failed"),
            }
        }
        scored.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.config.neighbor_lookup_k);
        Ok(scored)
    }

    /// `analyzeNewMemory(record) -> UpdateResult`.
    pub async fn analyze_new_memory(&self, record: &MemoryRecord) -> Result<UpdateResult> {
        let lock = self.agent_lock(&record.agent_id);
        let _guard = lock.lock().await;
        self.analyze_locked(record).await
    }

    async fn analyze_locked(&self, record: &MemoryRecord) -> Result<UpdateResult> {
        let mut candidates = self.extract_candidates(record).await;
        if candidates.is_empty() {
            candidates.push(general_candidate(record));
        }

        let mut result = UpdateResult::default();

        for candidate in candidates {
            let neighbors = self.find_neighbors(&candidate.statement, &record.agent_id).await?;

            if neighbors.is_empty() && candidate.positive {
                let belief = Belief::new(
                    ids::new_belief_id(),
                    record.agent_id.clone(),
                    candidate.statement.clone(),
                    candidate.confidence,
                    candidate.category.clone(),
                    record.id.clone(),
                );
                self.belief_store.put_belief(belief.clone()).await?;
                self.stats.record_belief_created(&belief.category.primary, belief.confidence, &self.config);
                result.new_beliefs.push(belief);
            } else if !neighbors.is_empty() && candidate.positive {
                for (mut neighbor, _score) in neighbors {
                    neighbor.reinforce(self.config.reinforcement_increment, record.id.clone());
                    self.belief_store.put_belief(neighbor.clone()).await?;
                    self.stats.record_belief_reinforced();
                    result.reinforced_beliefs.push(neighbor);
                }
            } else if !candidate.positive && !neighbors.is_empty() {
                for (neighbor, _score) in neighbors {
                    let conflict = BeliefConflict::belief_vs_memory(ids::new_conflict_id(), record.agent_id.clone(), neighbor.id.clone(), record.id.clone());
                    self.belief_store.put_conflict(conflict.clone()).await?;
                    self.stats.record_conflict_detected();
                    result.conflicts.push(conflict);
                }
            }
            // negative candidate with no neighbors: no-op.
        }

        self.stats.record_analysis();
        Ok(result)
    }

    /// `analyzeBatch([records]) -> UpdateResult`, order preserved.
    pub async fn analyze_batch(&self, records: &[MemoryRecord]) -> Result<UpdateResult> {
        let mut merged = UpdateResult::default();
        for record in records {
            let outcome = self.analyze_new_memory(record).await?;
            merged.merge(outcome);
        }
        self.stats.record_batch_analysis();
        Ok(merged)
    }

    /// `reviewBeliefsForAgent(agentId) -> [Conflict]`: cross-pair scan over
    /// active beliefs, `b1.id < b2.id` to visit each unordered pair once.
    pub async fn review_beliefs_for_agent(&self, agent_id: &str) -> Result<Vec<BeliefConflict>> {
        let mut beliefs = self.belief_store.beliefs_for_agent(agent_id, false).await?;
        beliefs.sort_by(|a, b| a.id.cmp(&b.id));

        let provider = self.provider().await;
        let mut conflicts = Vec::new();
        for i in 0..beliefs.len() {
            for j in (i + 1)..beliefs.len() {
                let (b1, b2) = (&beliefs[i], &beliefs[j]);
                match provider.are_conflicting(&b1.statement, &b2.statement, &b1.category, &b2.category).await {
                    Ok(true) => {
                        let conflict = BeliefConflict::belief_vs_belief(ids::new_conflict_id(), agent_id, b1.id.clone(), b2.id.clone());
                        self.belief_store.put_conflict(conflict.clone()).await?;
                        self.stats.record_conflict_detected();
                        conflicts.push(conflict);
                    }
                    Ok(false) => {}
                    Err(reason) => tracing::warn!(reason = %reason, b1 = %b1.id, b2 = %b2.id, "conflict check failed"),
                }
            }
        }
        Ok(conflicts)
    }

    /// `resolveConflict(conflict) -> Conflict`, idempotent. A referenced
    /// belief that no longer exists is not an error — the conflict is
    /// returned unchanged.
    pub async fn resolve_conflict(&self, mut conflict: BeliefConflict) -> Result<BeliefConflict> {
        if conflict.resolved {
            return Ok(conflict);
        }

        let shape = determine_conflict_shape(&conflict);
        let strategy = self.resolution_strategies.read().await.strategy_for(conflict_kind_of(shape));

        let Some(primary) = self.belief_store.get_belief(&conflict.belief_id).await? else {
            return Ok(conflict);
        };

        match shape {
            ConflictShape::BeliefBelief => {
                let other_id = conflict.conflicting_belief_id.clone().expect("belief-belief shape carries conflicting_belief_id");
                let Some(other) = self.belief_store.get_belief(&other_id).await? else {
                    return Ok(conflict);
                };
                self.apply_belief_belief_strategy(strategy, primary, other, &mut conflict).await?;
            }
            ConflictShape::BeliefMemory => {
                self.apply_belief_memory_strategy(strategy, primary, &mut conflict).await?;
            }
            ConflictShape::Unknown => {
                conflict.resolution = Some(ConflictResolution::RequireManualReview);
            }
        }

        if conflict.resolved {
            self.belief_store.remove_conflict(&conflict.id).await?;
            self.stats.record_conflict_resolved();
        } else {
            self.belief_store.put_conflict(conflict.clone()).await?;
        }
        Ok(conflict)
    }

    async fn apply_belief_belief_strategy(&self, strategy: ResolutionStrategy, a: Belief, b: Belief, conflict: &mut BeliefConflict) -> Result<()> {
        match strategy {
            ResolutionStrategy::NewerWins => {
                let (mut older, newer) = if a.created_at <= b.created_at { (a, b) } else { (b, a) };
                older.deactivate();
                self.belief_store.put_belief(older).await?;
                conflict.mark_resolved(ConflictResolution::ArchiveOld, Some(format!("kept {}", newer.id)));
            }
            ResolutionStrategy::HigherConfidence => {
                let (mut lower, higher) = if a.confidence <= b.confidence { (a, b) } else { (b, a) };
                lower.deactivate();
                self.belief_store.put_belief(lower).await?;
                conflict.mark_resolved(ConflictResolution::KeepOld, Some(format!("kept {}", higher.id)));
            }
            ResolutionStrategy::Merge | ResolutionStrategy::FlagForReview => {
                conflict.resolution = Some(ConflictResolution::RequireManualReview);
            }
        }
        Ok(())
    }

    /// Belief-vs-memory conflicts have no second confidence or creation
    /// time to compare against — only `newer_wins` has a well-defined
    /// meaning (the incoming memory is, by construction, newer than any
    /// existing belief). Every other strategy flags for manual review.
    async fn apply_belief_memory_strategy(&self, strategy: ResolutionStrategy, belief: Belief, conflict: &mut BeliefConflict) -> Result<()> {
        match strategy {
            ResolutionStrategy::NewerWins => {
                let mut belief = belief;
                belief.deactivate();
                self.belief_store.put_belief(belief).await?;
                conflict.mark_resolved(ConflictResolution::ArchiveOld, Some("superseded by incoming memory".to_string()));
            }
            ResolutionStrategy::HigherConfidence | ResolutionStrategy::Merge | ResolutionStrategy::FlagForReview => {
                conflict.resolution = Some(ConflictResolution::RequireManualReview);
            }
        }
        Ok(())
    }

    /// `updateBeliefConfidence(id, newConfidence, reason) -> Belief`.
    /// Rejects updates to an inactive belief per the invariant that a
    /// deactivated belief is never further mutated.
    pub async fn update_belief_confidence(&self, id: &str, new_confidence: f64, reason: &str) -> Result<Belief> {
        let mut belief = self.belief_store.get_belief(id).await?.ok_or_else(|| Error::not_found("belief", id))?;
        if !belief.active {
            return Err(Error::invalid_input("id", id, "cannot update confidence of an inactive belief"));
        }
        let previous = belief.confidence;
        belief.set_confidence(new_confidence);
        if belief.confidence < previous {
            self.stats.record_belief_weakened();
        }
        tracing::info!(id, reason, previous, updated = belief.confidence, "belief confidence updated");
        self.belief_store.put_belief(belief.clone()).await?;
        Ok(belief)
    }

    /// `deactivateBelief(id, reason) -> Belief`, idempotent.
    pub async fn deactivate_belief(&self, id: &str, reason: &str) -> Result<Belief> {
        let mut belief = self.belief_store.get_belief(id).await?.ok_or_else(|| Error::not_found("belief", id))?;
        belief.deactivate();
        tracing::info!(id, reason, "belief deactivated");
        self.belief_store.put_belief(belief.clone()).await?;
        Ok(belief)
    }

    /// `findRelatedBeliefs(queryText, agentId?, limit) -> [Belief]`.
    ///
    /// Cross-agent belief sharing is an explicit non-goal, so unlike the
    /// spec's optional `agentId?`, this always requires one.
    pub async fn find_related_beliefs(&self, query_text: &str, agent_id: &str, limit: usize) -> Result<Vec<Belief>> {
        let scored = self.belief_store.find_similar(query_text, agent_id, 0.0, limit).await?;
        Ok(scored.into_iter().map(|(belief, _)| belief).collect())
    }

    /// `configureResolutionStrategies(map<conflictType, strategy>)`: merges
    /// the given overrides into the live strategy table.
    pub async fn configure_resolution_strategies(&self, updates: HashMap<ConflictKind, ResolutionStrategy>) {
        let mut strategies = self.resolution_strategies.write().await;
        for (kind, strategy) in updates {
            strategies.configure(kind, strategy);
        }
    }

    pub async fn stats_snapshot(&self) -> crate::stats::StatsSnapshot {
        self.stats.snapshot()
    }
}
