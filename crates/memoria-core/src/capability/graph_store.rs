//! C5 — Graph Store capability.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::BeliefRelationship;

/// Persists typed, temporally-qualified relationships between beliefs.
///
/// The graph itself is a view: this store only holds edges, never a
/// duplicate copy of belief content.
#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn put_relationship(&self, relationship: BeliefRelationship) -> Result<()>;

    async fn get_relationship(&self, id: &str) -> Result<Option<BeliefRelationship>>;

    async fn remove_relationship(&self, id: &str) -> Result<bool>;

    /// Edges with `belief_id` as source, target, or either, for `agent_id`.
    async fn edges_for_belief(&self, agent_id: &str, belief_id: &str, direction: EdgeDirection) -> Result<Vec<BeliefRelationship>>;

    async fn edges_for_agent(&self, agent_id: &str) -> Result<Vec<BeliefRelationship>>;

    async fn edges_by_ids(&self, ids: &[String]) -> Result<Vec<BeliefRelationship>>;
}

/// Which end(s) of an edge to match against a belief id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    Outgoing,
    Incoming,
    Both,
}
