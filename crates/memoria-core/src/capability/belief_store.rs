//! C4 — Belief Store capability.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Belief, BeliefConflict};
use crate::stats::StatsSnapshot;

/// Persists beliefs and conflicts, keyed by id and partitioned per agent.
#[async_trait]
pub trait BeliefStore: Send + Sync {
    async fn put_belief(&self, belief: Belief) -> Result<()>;

    async fn get_belief(&self, id: &str) -> Result<Option<Belief>>;

    async fn beliefs_for_agent(&self, agent_id: &str, include_inactive: bool) -> Result<Vec<Belief>>;

    async fn beliefs_in_category(&self, category: &str, agent_id: Option<&str>) -> Result<Vec<Belief>>;

    /// Text/embedding-similarity lookup of neighbors above `floor`,
    /// capped at `k`, restricted to active beliefs for `agent_id`.
    async fn find_similar(&self, statement: &str, agent_id: &str, floor: f64, k: usize) -> Result<Vec<(Belief, f64)>>;

    async fn low_confidence_beliefs(&self, threshold: f64, agent_id: Option<&str>) -> Result<Vec<Belief>>;

    async fn put_conflict(&self, conflict: BeliefConflict) -> Result<()>;

    async fn get_conflict(&self, id: &str) -> Result<Option<BeliefConflict>>;

    async fn remove_conflict(&self, id: &str) -> Result<bool>;

    async fn conflicts_for_agent(&self, agent_id: &str, unresolved_only: bool) -> Result<Vec<BeliefConflict>>;

    /// Aggregate counters and category/confidence distributions. Backed
    /// by `EngineStats` in the default implementations; a relational/ES
    /// backend may compute this from a query instead.
    async fn distribution_stats(&self) -> Result<StatsSnapshot>;
}
