//! In-memory reference implementation of `GraphStore` (C5).

use async_trait::async_trait;
use dashmap::DashMap;

use crate::capability::{EdgeDirection, GraphStore};
use crate::error::Result;
use crate::model::BeliefRelationship;

/// Edges keyed by id. Adjacency and per-agent lookups are computed by a
/// full scan over `edges` rather than a maintained secondary index — fine
/// at reference-implementation scale, not the shape a production-sized
/// graph store would take.
#[derive(Default)]
pub struct InMemoryGraphStore {
    edges: DashMap<String, BeliefRelationship>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn put_relationship(&self, relationship: BeliefRelationship) -> Result<()> {
        self.edges.insert(relationship.id.clone(), relationship);
        Ok(())
    }

    async fn get_relationship(&self, id: &str) -> Result<Option<BeliefRelationship>> {
        Ok(self.edges.get(id).map(|entry| entry.clone()))
    }

    async fn remove_relationship(&self, id: &str) -> Result<bool> {
        Ok(self.edges.remove(id).is_some())
    }

    async fn edges_for_belief(&self, agent_id: &str, belief_id: &str, direction: EdgeDirection) -> Result<Vec<BeliefRelationship>> {
        Ok(self
            .edges
            .iter()
            .filter(|entry| entry.agent_id == agent_id)
            .filter(|entry| match direction {
                EdgeDirection::Outgoing => entry.source_belief_id == belief_id,
                EdgeDirection::Incoming => entry.target_belief_id == belief_id,
                EdgeDirection::Both => entry.source_belief_id == belief_id || entry.target_belief_id == belief_id,
            })
            .map(|entry| entry.clone())
            .collect())
    }

    async fn edges_for_agent(&self, agent_id: &str) -> Result<Vec<BeliefRelationship>> {
        Ok(self.edges.iter().filter(|entry| entry.agent_id == agent_id).map(|entry| entry.clone()).collect())
    }

    async fn edges_by_ids(&self, ids: &[String]) -> Result<Vec<BeliefRelationship>> {
        Ok(ids.iter().filter_map(|id| self.edges.get(id).map(|entry| entry.clone())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RelationshipType;
    use chrono::Utc;
    use std::collections::HashMap;

    fn edge(id: &str, src: &str, tgt: &str) -> BeliefRelationship {
        BeliefRelationship::new(id.to_string(), "agent-a", src, tgt, RelationshipType::Supersedes, 0.9, HashMap::new(), Utc::now(), None).unwrap()
    }

    #[tokio::test]
    async fn edges_for_belief_direction_filtering() {
        let store = InMemoryGraphStore::new();
        store.put_relationship(edge("rel_1", "belief_2", "belief_1")).await.unwrap();

        let outgoing = store.edges_for_belief("agent-a", "belief_2", EdgeDirection::Outgoing).await.unwrap();
        assert_eq!(outgoing.len(), 1);
        let incoming = store.edges_for_belief("agent-a", "belief_2", EdgeDirection::Incoming).await.unwrap();
        assert!(incoming.is_empty());
        let both = store.edges_for_belief("agent-a", "belief_1", EdgeDirection::Both).await.unwrap();
        assert_eq!(both.len(), 1);
    }

    #[tokio::test]
    async fn remove_relationship_reports_presence() {
        let store = InMemoryGraphStore::new();
        store.put_relationship(edge("rel_1", "belief_2", "belief_1")).await.unwrap();
        assert!(store.remove_relationship("rel_1").await.unwrap());
        assert!(!store.remove_relationship("rel_1").await.unwrap());
    }
}
