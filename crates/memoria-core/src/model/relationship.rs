//! Belief Relationship — a typed, temporally-qualified edge in the
//! per-agent belief graph.
//!
//! Covers the full relationship vocabulary the belief graph needs:
//! semantic, temporal, causal, derivational, contradiction, refinement,
//! part-of, and an escape hatch for anything else.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The deprecating edge kinds: at most one active edge of these types may
/// exist between the same ordered (source, target) pair.
pub const DEPRECATING_KINDS: [RelationshipType; 4] = [
    RelationshipType::Supersedes,
    RelationshipType::Updates,
    RelationshipType::Deprecates,
    RelationshipType::Replaces,
];

/// Typed relationship between two beliefs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipType {
    Supersedes,
    Updates,
    Deprecates,
    Replaces,
    Supports,
    Contradicts,
    Implies,
    Reinforces,
    Weakens,
    RelatesTo,
    Specializes,
    Generalizes,
    Extends,
    DerivesFrom,
    Causes,
    CausedBy,
    Enables,
    Prevents,
    DependsOn,
    Precedes,
    Follows,
    ContextFor,
    EvidencedBy,
    ProvidesEvidenceFor,
    ConflictsWith,
    SimilarTo,
    AnalogousTo,
    ContrastsWith,
    Custom,
}

impl RelationshipType {
    pub fn is_deprecating(&self) -> bool {
        DEPRECATING_KINDS.contains(self)
    }

    pub fn is_conflict_kind(&self) -> bool {
        matches!(self, RelationshipType::Contradicts | RelationshipType::ConflictsWith)
    }
}

/// A typed, temporally-qualified edge between two beliefs belonging to the
/// same agent.
///
/// Invariants: `source_belief_id != target_belief_id`; when
/// `effective_until` is set it must be strictly after `effective_from`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeliefRelationship {
    pub id: String,
    pub agent_id: String,
    pub source_belief_id: String,
    pub target_belief_id: String,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    pub strength: f64,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    pub effective_from: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_until: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation_reason: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Error constructing a relationship whose endpoints coincide, or whose
/// temporal window is inverted.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RelationshipValidationError {
    #[error("a belief cannot relate to itself: {0}")]
    SelfLoop(String),
    #[error("effective_until ({until}) must be after effective_from ({from})")]
    InvertedWindow { from: DateTime<Utc>, until: DateTime<Utc> },
}

impl BeliefRelationship {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        agent_id: impl Into<String>,
        source_belief_id: impl Into<String>,
        target_belief_id: impl Into<String>,
        relationship_type: RelationshipType,
        strength: f64,
        metadata: HashMap<String, Value>,
        effective_from: DateTime<Utc>,
        effective_until: Option<DateTime<Utc>>,
    ) -> Result<Self, RelationshipValidationError> {
        let source_belief_id = source_belief_id.into();
        let target_belief_id = target_belief_id.into();
        if source_belief_id == target_belief_id {
            return Err(RelationshipValidationError::SelfLoop(source_belief_id));
        }
        if let Some(until) = effective_until {
            if until <= effective_from {
                return Err(RelationshipValidationError::InvertedWindow { from: effective_from, until });
            }
        }
        Ok(Self {
            id,
            agent_id: agent_id.into(),
            source_belief_id,
            target_belief_id,
            relationship_type,
            strength: strength.clamp(0.0, 1.0),
            metadata,
            effective_from,
            effective_until,
            deprecation_reason: None,
            active: true,
            created_at: Utc::now(),
        })
    }

    /// An edge is currently effective iff active and within its window.
    pub fn is_effective_at(&self, at: DateTime<Utc>) -> bool {
        self.active
            && self.effective_from <= at
            && self.effective_until.map(|until| until > at).unwrap_or(true)
    }

    pub fn is_currently_effective(&self) -> bool {
        self.is_effective_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn self_loop_is_rejected() {
        let err = BeliefRelationship::new(
            "rel_1".into(),
            "agent-a",
            "belief_1",
            "belief_1",
            RelationshipType::Supersedes,
            0.9,
            HashMap::new(),
            now(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, RelationshipValidationError::SelfLoop(_)));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let from = now();
        let until = from - chrono::Duration::hours(1);
        let err = BeliefRelationship::new(
            "rel_1".into(),
            "agent-a",
            "belief_1",
            "belief_2",
            RelationshipType::Supersedes,
            0.9,
            HashMap::new(),
            from,
            Some(until),
        )
        .unwrap_err();
        assert!(matches!(err, RelationshipValidationError::InvertedWindow { .. }));
    }

    #[test]
    fn effective_window_semantics() {
        let from = now() - chrono::Duration::hours(1);
        let rel = BeliefRelationship::new(
            "rel_1".into(),
            "agent-a",
            "belief_1",
            "belief_2",
            RelationshipType::Supersedes,
            0.9,
            HashMap::new(),
            from,
            None,
        )
        .unwrap();
        assert!(rel.is_currently_effective());
    }

    #[test]
    fn deprecating_kinds_classification() {
        assert!(RelationshipType::Supersedes.is_deprecating());
        assert!(RelationshipType::Updates.is_deprecating());
        assert!(!RelationshipType::Supports.is_deprecating());
        assert!(RelationshipType::Contradicts.is_conflict_kind());
        assert!(RelationshipType::ConflictsWith.is_conflict_kind());
    }
}
