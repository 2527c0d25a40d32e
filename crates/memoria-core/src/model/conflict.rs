//! Belief Conflict — a recorded incompatibility between beliefs, or
//! between a belief and an incoming memory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a conflict was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictResolution {
    KeepOld,
    KeepNew,
    ArchiveOld,
    MergeBoth,
    RequireManualReview,
}

/// A detected incompatibility.
///
/// Invariant: `resolved == true` implies both `resolved_at` and
/// `resolution` are set. Either `conflicting_belief_id` or `memory_id`
/// (or both) must be set — see `determine_conflict_kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeliefConflict {
    pub id: String,
    pub agent_id: String,
    pub belief_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_belief_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_id: Option<String>,
    pub detected_at: DateTime<Utc>,
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ConflictResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<f64>,
}

impl BeliefConflict {
    pub fn belief_vs_belief(id: String, agent_id: impl Into<String>, belief_id: impl Into<String>, conflicting_belief_id: impl Into<String>) -> Self {
        Self {
            id,
            agent_id: agent_id.into(),
            belief_id: belief_id.into(),
            conflicting_belief_id: Some(conflicting_belief_id.into()),
            memory_id: None,
            detected_at: Utc::now(),
            resolved: false,
            resolved_at: None,
            resolution: None,
            resolution_details: None,
            severity: None,
        }
    }

    pub fn belief_vs_memory(id: String, agent_id: impl Into<String>, belief_id: impl Into<String>, memory_id: impl Into<String>) -> Self {
        Self {
            id,
            agent_id: agent_id.into(),
            belief_id: belief_id.into(),
            conflicting_belief_id: None,
            memory_id: Some(memory_id.into()),
            detected_at: Utc::now(),
            resolved: false,
            resolved_at: None,
            resolution: None,
            resolution_details: None,
            severity: None,
        }
    }

    pub fn is_invariant_satisfied(&self) -> bool {
        let resolved_fields_consistent = !self.resolved || (self.resolved_at.is_some() && self.resolution.is_some());
        let has_target = self.conflicting_belief_id.is_some() || self.memory_id.is_some();
        resolved_fields_consistent && has_target
    }

    pub fn mark_resolved(&mut self, resolution: ConflictResolution, details: Option<String>) {
        self.resolved = true;
        self.resolved_at = Some(Utc::now());
        self.resolution = Some(resolution);
        self.resolution_details = details;
    }
}

/// Classification of a conflict's shape, used to pick a resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictShape {
    BeliefBelief,
    BeliefMemory,
    Unknown,
}

pub fn determine_conflict_shape(conflict: &BeliefConflict) -> ConflictShape {
    match (conflict.conflicting_belief_id.is_some(), conflict.memory_id.is_some()) {
        (true, _) => ConflictShape::BeliefBelief,
        (false, true) => ConflictShape::BeliefMemory,
        (false, false) => ConflictShape::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn belief_belief_conflict_classifies_correctly() {
        let conflict = BeliefConflict::belief_vs_belief("c1".into(), "agent-a", "b1", "b2");
        assert_eq!(determine_conflict_shape(&conflict), ConflictShape::BeliefBelief);
        assert!(conflict.is_invariant_satisfied());
    }

    #[test]
    fn belief_memory_conflict_classifies_correctly() {
        let conflict = BeliefConflict::belief_vs_memory("c1".into(), "agent-a", "b1", "mem_1");
        assert_eq!(determine_conflict_shape(&conflict), ConflictShape::BeliefMemory);
    }

    #[test]
    fn resolving_sets_required_fields() {
        let mut conflict = BeliefConflict::belief_vs_belief("c1".into(), "agent-a", "b1", "b2");
        conflict.mark_resolved(ConflictResolution::ArchiveOld, Some("kept b2".into()));
        assert!(conflict.is_invariant_satisfied());
        assert!(conflict.resolved_at.is_some());
    }
}
