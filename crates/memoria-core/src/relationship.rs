//! C9 — Belief Relationship Service
//!
//! CRUD over typed relationships plus the graph algorithms that run over
//! them: reachability, shortest path, clusters, conflict pairs, and
//! structural validation. The graph itself is a view computed from
//! `Belief` and `BeliefRelationship` sets — this service
//! never stores a duplicate of belief content, only edges via C5.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::capability::{BeliefStore, EdgeDirection, GraphStore};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::ids;
use crate::model::{BeliefRelationship, RelationshipType, DEPRECATING_KINDS};
use crate::stats::EngineStats;

/// Patch applied by `update_relationship`; `None` fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct RelationshipUpdate {
    pub strength: Option<f64>,
    pub active: Option<bool>,
    pub effective_until: Option<Option<DateTime<Utc>>>,
    pub deprecation_reason: Option<Option<String>>,
}

pub struct BeliefRelationshipService {
    graph_store: Arc<dyn GraphStore>,
    belief_store: Arc<dyn BeliefStore>,
    config: EngineConfig,
    stats: Arc<EngineStats>,
}

impl BeliefRelationshipService {
    pub fn new(graph_store: Arc<dyn GraphStore>, belief_store: Arc<dyn BeliefStore>, config: EngineConfig, stats: Arc<EngineStats>) -> Self {
        Self { graph_store, belief_store, config, stats }
    }

    /// True if an active edge already connects this ordered pair in a way
    /// that would conflict with creating one of `relationship_type` —
    /// `createRelationship` called twice with identical parameters fails on
    /// the second call rather than creating a duplicate edge. For a
    /// deprecating type this checks against *any* active deprecating edge
    /// on the pair, not just the same type: at most one active deprecating
    /// edge (`Supersedes`/`Deprecates`/`Replaces`/`Updates`) may connect the
    /// same ordered pair at a time.
    async fn has_conflicting_active_edge(&self, agent_id: &str, source_belief_id: &str, target_belief_id: &str, relationship_type: RelationshipType) -> Result<bool> {
        let outgoing = self.graph_store.edges_for_belief(agent_id, source_belief_id, EdgeDirection::Outgoing).await?;
        Ok(outgoing.iter().any(|edge| {
            edge.active
                && edge.target_belief_id == target_belief_id
                && if relationship_type.is_deprecating() {
                    edge.relationship_type.is_deprecating()
                } else {
                    edge.relationship_type == relationship_type
                }
        }))
    }

    /// `createRelationship(src, tgt, type, strength, agentId, metadata?, effectiveFrom?, effectiveUntil?) -> rel`.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_relationship(
        &self,
        agent_id: &str,
        source_belief_id: &str,
        target_belief_id: &str,
        relationship_type: RelationshipType,
        strength: f64,
        metadata: HashMap<String, Value>,
        effective_from: Option<DateTime<Utc>>,
        effective_until: Option<DateTime<Utc>>,
    ) -> Result<BeliefRelationship> {
        if self.has_conflicting_active_edge(agent_id, source_belief_id, target_belief_id, relationship_type).await? {
            let message = if relationship_type.is_deprecating() {
                "an active deprecating edge already exists between this ordered pair"
            } else {
                "an active edge of this type already exists between this ordered pair"
            };
            return Err(Error::invalid_input("relationshipType", format!("{relationship_type:?}"), message));
        }

        let relationship = BeliefRelationship::new(
            ids::new_relationship_id(),
            agent_id,
            source_belief_id,
            target_belief_id,
            relationship_type,
            strength,
            metadata,
            effective_from.unwrap_or_else(Utc::now),
            effective_until,
        )
        .map_err(|err| Error::invalid_input("relationship", format!("{source_belief_id}->{target_belief_id}"), err.to_string()))?;

        self.graph_store.put_relationship(relationship.clone()).await?;
        Ok(relationship)
    }

    /// `createTemporalRelationship(...)` with an explicit effectiveness window.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_temporal_relationship(
        &self,
        agent_id: &str,
        source_belief_id: &str,
        target_belief_id: &str,
        relationship_type: RelationshipType,
        strength: f64,
        metadata: HashMap<String, Value>,
        effective_from: DateTime<Utc>,
        effective_until: DateTime<Utc>,
    ) -> Result<BeliefRelationship> {
        self.create_relationship(agent_id, source_belief_id, target_belief_id, relationship_type, strength, metadata, Some(effective_from), Some(effective_until))
            .await
    }

    /// `deprecateBeliefWith(oldId, newId, reason, agentId) -> rel`: creates a
    /// `Supersedes` edge new→old, deactivates the old belief, and rejects a
    /// call that would introduce a cycle into the deprecation chain.
    pub async fn deprecate_belief_with(&self, agent_id: &str, old_id: &str, new_id: &str, reason: &str) -> Result<BeliefRelationship> {
        if old_id == new_id {
            return Err(Error::invalid_input("newId", new_id, "a belief cannot deprecate itself"));
        }

        if self.is_reachable_via_supersedes(agent_id, old_id, new_id).await? {
            return Err(Error::invalid_input(
                "newId",
                new_id,
                format!("deprecating {old_id} with {new_id} would introduce a cycle in the deprecation chain"),
            ));
        }

        let mut relationship = self
            .create_relationship(agent_id, new_id, old_id, RelationshipType::Supersedes, 1.0, HashMap::new(), None, None)
            .await?;
        relationship.deprecation_reason = Some(reason.to_string());
        self.graph_store.put_relationship(relationship.clone()).await?;

        let mut old_belief = self.belief_store.get_belief(old_id).await?.ok_or_else(|| Error::not_found("belief", old_id))?;
        old_belief.deactivate();
        self.belief_store.put_belief(old_belief).await?;
        self.stats.record_belief_weakened();

        Ok(relationship)
    }

    /// True if `target` is reachable from `start` by following outgoing
    /// `Supersedes` edges — i.e. `start` already (transitively) supersedes
    /// `target`, so adding `target -> start` would close a cycle.
    async fn is_reachable_via_supersedes(&self, agent_id: &str, start: &str, target: &str) -> Result<bool> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(start.to_string());
        visited.insert(start.to_string());

        while let Some(node) = queue.pop_front() {
            if node == target {
                return Ok(true);
            }
            let outgoing = self.graph_store.edges_for_belief(agent_id, &node, EdgeDirection::Outgoing).await?;
            for edge in outgoing {
                if edge.active && edge.relationship_type == RelationshipType::Supersedes && visited.insert(edge.target_belief_id.clone()) {
                    queue.push_back(edge.target_belief_id);
                }
            }
        }
        Ok(false)
    }

    pub async fn update_relationship(&self, id: &str, update: RelationshipUpdate) -> Result<BeliefRelationship> {
        let mut relationship = self.graph_store.get_relationship(id).await?.ok_or_else(|| Error::not_found("relationship", id))?;
        if let Some(strength) = update.strength {
            relationship.strength = strength.clamp(0.0, 1.0);
        }
        if let Some(active) = update.active {
            relationship.active = active;
        }
        if let Some(effective_until) = update.effective_until {
            relationship.effective_until = effective_until;
        }
        if let Some(deprecation_reason) = update.deprecation_reason {
            relationship.deprecation_reason = deprecation_reason;
        }
        self.graph_store.put_relationship(relationship.clone()).await?;
        Ok(relationship)
    }

    pub async fn delete_relationship(&self, id: &str) -> Result<bool> {
        self.graph_store.remove_relationship(id).await
    }

    pub async fn edges_for_belief(&self, agent_id: &str, belief_id: &str, direction: EdgeDirection) -> Result<Vec<BeliefRelationship>> {
        self.graph_store.edges_for_belief(agent_id, belief_id, direction).await
    }

    pub async fn edges_by_type(&self, agent_id: &str, relationship_type: RelationshipType) -> Result<Vec<BeliefRelationship>> {
        Ok(self
            .graph_store
            .edges_for_agent(agent_id)
            .await?
            .into_iter()
            .filter(|edge| edge.relationship_type == relationship_type)
            .collect())
    }

    /// Edges currently effective at `at` (defaults to now).
    pub async fn currently_effective(&self, agent_id: &str, at: Option<DateTime<Utc>>) -> Result<Vec<BeliefRelationship>> {
        let at = at.unwrap_or_else(Utc::now);
        Ok(self.graph_store.edges_for_agent(agent_id).await?.into_iter().filter(|edge| edge.is_effective_at(at)).collect())
    }

    /// Beliefs that are the target of at least one active deprecating edge.
    pub async fn find_deprecated(&self, agent_id: &str) -> Result<Vec<String>> {
        let mut deprecated: HashSet<String> = HashSet::new();
        for edge in self.graph_store.edges_for_agent(agent_id).await? {
            if edge.active && edge.relationship_type.is_deprecating() {
                deprecated.insert(edge.target_belief_id);
            }
        }
        Ok(deprecated.into_iter().collect())
    }

    async fn undirected_adjacency(&self, agent_id: &str) -> Result<HashMap<String, Vec<(String, f64)>>> {
        let mut adjacency: HashMap<String, Vec<(String, f64)>> = HashMap::new();
        for edge in self.currently_effective(agent_id, None).await? {
            adjacency.entry(edge.source_belief_id.clone()).or_default().push((edge.target_belief_id.clone(), edge.strength));
            adjacency.entry(edge.target_belief_id.clone()).or_default().push((edge.source_belief_id.clone(), edge.strength));
        }
        Ok(adjacency)
    }

    /// `findRelatedBeliefs(id, depth<=5)` via BFS over currently-effective
    /// edges treated as undirected for reachability purposes.
    pub async fn find_related_beliefs(&self, agent_id: &str, belief_id: &str, depth: usize) -> Result<Vec<String>> {
        let depth = depth.min(self.config.max_graph_traversal_depth);
        let adjacency = self.undirected_adjacency(agent_id).await?;

        let mut visited = HashSet::new();
        visited.insert(belief_id.to_string());
        let mut frontier = vec![belief_id.to_string()];
        let mut related = Vec::new();

        for _ in 0..depth {
            let mut next_frontier = Vec::new();
            for node in &frontier {
                if let Some(neighbors) = adjacency.get(node) {
                    for (neighbor, _strength) in neighbors {
                        if visited.insert(neighbor.clone()) {
                            related.push(neighbor.clone());
                            next_frontier.push(neighbor.clone());
                        }
                    }
                }
            }
            if next_frontier.is_empty() {
                break;
            }
            frontier = next_frontier;
        }

        Ok(related)
    }

    /// `shortestPath(src, tgt)` via BFS, ties among equal-length paths
    /// broken by higher total (equivalently, average) edge strength.
    pub async fn shortest_path(&self, agent_id: &str, source_belief_id: &str, target_belief_id: &str) -> Result<Option<Vec<String>>> {
        if source_belief_id == target_belief_id {
            return Ok(Some(vec![source_belief_id.to_string()]));
        }
        let adjacency = self.undirected_adjacency(agent_id).await?;

        let mut distance: HashMap<String, usize> = HashMap::new();
        let mut best_strength_sum: HashMap<String, f64> = HashMap::new();
        let mut predecessor: HashMap<String, String> = HashMap::new();
        let mut queue = VecDeque::new();

        distance.insert(source_belief_id.to_string(), 0);
        best_strength_sum.insert(source_belief_id.to_string(), 0.0);
        queue.push_back(source_belief_id.to_string());

        while let Some(node) = queue.pop_front() {
            let node_distance = distance[&node];
            let node_strength = best_strength_sum[&node];
            let Some(neighbors) = adjacency.get(&node) else { continue };
            for (neighbor, strength) in neighbors {
                let candidate_distance = node_distance + 1;
                let candidate_strength = node_strength + strength;
                match distance.get(neighbor) {
                    None => {
                        distance.insert(neighbor.clone(), candidate_distance);
                        best_strength_sum.insert(neighbor.clone(), candidate_strength);
                        predecessor.insert(neighbor.clone(), node.clone());
                        queue.push_back(neighbor.clone());
                    }
                    Some(&existing_distance) if existing_distance == candidate_distance && candidate_strength > best_strength_sum[neighbor] => {
                        best_strength_sum.insert(neighbor.clone(), candidate_strength);
                        predecessor.insert(neighbor.clone(), node.clone());
                    }
                    _ => {}
                }
            }
        }

        if !distance.contains_key(target_belief_id) {
            return Ok(None);
        }

        let mut path = vec![target_belief_id.to_string()];
        let mut current = target_belief_id.to_string();
        while current != source_belief_id {
            current = predecessor[&current].clone();
            path.push(current.clone());
        }
        path.reverse();
        Ok(Some(path))
    }

    /// `findClusters(strengthThreshold)` via connected components of the
    /// subgraph restricted to currently-effective edges at or above
    /// `strength_threshold`.
    pub async fn find_clusters(&self, agent_id: &str, strength_threshold: f64) -> Result<Vec<Vec<String>>> {
        let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
        let mut nodes: HashSet<String> = HashSet::new();
        for edge in self.currently_effective(agent_id, None).await? {
            if edge.strength < strength_threshold {
                continue;
            }
            nodes.insert(edge.source_belief_id.clone());
            nodes.insert(edge.target_belief_id.clone());
            adjacency.entry(edge.source_belief_id.clone()).or_default().push(edge.target_belief_id.clone());
            adjacency.entry(edge.target_belief_id.clone()).or_default().push(edge.source_belief_id.clone());
        }

        let mut visited = HashSet::new();
        let mut clusters = Vec::new();
        for node in nodes {
            if visited.contains(&node) {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = VecDeque::new();
            queue.push_back(node.clone());
            visited.insert(node);
            while let Some(current) = queue.pop_front() {
                component.push(current.clone());
                if let Some(neighbors) = adjacency.get(&current) {
                    for neighbor in neighbors {
                        if visited.insert(neighbor.clone()) {
                            queue.push_back(neighbor.clone());
                        }
                    }
                }
            }
            component.sort();
            clusters.push(component);
        }
        clusters.sort();
        Ok(clusters)
    }

    /// `findConflicts()`: pairs connected by a currently-effective
    /// `Contradicts`/`ConflictsWith` edge.
    pub async fn find_conflicts(&self, agent_id: &str) -> Result<Vec<(String, String)>> {
        Ok(self
            .currently_effective(agent_id, None)
            .await?
            .into_iter()
            .filter(|edge| edge.relationship_type.is_conflict_kind())
            .map(|edge| (edge.source_belief_id, edge.target_belief_id))
            .collect())
    }

    /// `validate()`: dangling endpoints, self-loops, deprecation cycles,
    /// and temporal inversions. The constructor already rejects self-loops
    /// and inverted windows for new edges, so flagging them here also
    /// catches data migrated or written by another backend.
    pub async fn validate(&self, agent_id: &str) -> Result<Vec<String>> {
        let edges = self.graph_store.edges_for_agent(agent_id).await?;
        let mut issues = Vec::new();

        for edge in &edges {
            if edge.source_belief_id == edge.target_belief_id {
                issues.push(format!("self-loop on belief {} (edge {})", edge.source_belief_id, edge.id));
            }
            if let Some(until) = edge.effective_until {
                if until <= edge.effective_from {
                    issues.push(format!("temporal inversion on edge {}: effectiveUntil <= effectiveFrom", edge.id));
                }
            }
            if self.belief_store.get_belief(&edge.source_belief_id).await?.is_none() {
                issues.push(format!("edge {} has a dangling source belief {}", edge.id, edge.source_belief_id));
            }
            if self.belief_store.get_belief(&edge.target_belief_id).await?.is_none() {
                issues.push(format!("edge {} has a dangling target belief {}", edge.id, edge.target_belief_id));
            }
        }

        let mut deprecation_adjacency: HashMap<String, Vec<String>> = HashMap::new();
        let mut deprecating_pairs: HashMap<(String, String), usize> = HashMap::new();
        for edge in &edges {
            if edge.active && DEPRECATING_KINDS.contains(&edge.relationship_type) {
                deprecation_adjacency.entry(edge.source_belief_id.clone()).or_default().push(edge.target_belief_id.clone());
                *deprecating_pairs.entry((edge.source_belief_id.clone(), edge.target_belief_id.clone())).or_insert(0) += 1;
            }
        }
        for start in deprecation_adjacency.keys() {
            if self.has_deprecation_cycle_from(start, &deprecation_adjacency) {
                issues.push(format!("deprecation chain starting at {start} contains a cycle"));
            }
        }
        for ((source, target), count) in deprecating_pairs {
            if count > 1 {
                issues.push(format!("{source}->{target} has {count} active deprecating edges, at most one is allowed"));
            }
        }

        Ok(issues)
    }

    fn has_deprecation_cycle_from(&self, start: &str, adjacency: &HashMap<String, Vec<String>>) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![start.to_string()];
        let mut path = HashSet::new();
        path.insert(start.to_string());

        while let Some(node) = stack.pop() {
            if !visited.insert(node.clone()) {
                continue;
            }
            if let Some(neighbors) = adjacency.get(&node) {
                for neighbor in neighbors {
                    if *neighbor == start {
                        return true;
                    }
                    stack.push(neighbor.clone());
                }
            }
        }
        false
    }

    /// `cleanup(olderThanDays)`: removes inactive relationships older than
    /// the bound, returning the number removed.
    pub async fn cleanup(&self, agent_id: &str, older_than_days: i64) -> Result<usize> {
        let cutoff = Utc::now() - chrono::Duration::days(older_than_days);
        let edges = self.graph_store.edges_for_agent(agent_id).await?;
        let mut removed = 0;
        for edge in edges {
            if !edge.active && edge.created_at <= cutoff && self.graph_store.remove_relationship(&edge.id).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
