//! Belief — a distilled proposition held by an agent (C4/C8).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::CategoryLabel;

/// A belief: a proposition with evidence and a confidence score.
///
/// Invariants: `last_updated >= created_at`; once `active = false` the
/// belief must never be reinforced again (enforced by `BeliefStore`
/// implementations and checked by `BRCA` before mutating).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Belief {
    pub id: String,
    pub agent_id: String,
    pub statement: String,
    pub confidence: f64,
    pub category: CategoryLabel,
    pub evidence_memory_ids: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub reinforcement_count: u64,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub active: bool,
}

impl Belief {
    pub fn new(id: String, agent_id: impl Into<String>, statement: impl Into<String>, confidence: f64, category: CategoryLabel, evidence_memory_id: impl Into<String>) -> Self {
        let now = Utc::now();
        let mut evidence_memory_ids = BTreeSet::new();
        evidence_memory_ids.insert(evidence_memory_id.into());
        Self {
            id,
            agent_id: agent_id.into(),
            statement: statement.into(),
            confidence: confidence.clamp(0.0, 1.0),
            category,
            evidence_memory_ids,
            tags: BTreeSet::new(),
            reinforcement_count: 0,
            created_at: now,
            last_updated: now,
            active: true,
        }
    }

    /// Apply the reinforcement constant, clamping confidence into `[0,1]`.
    pub fn reinforce(&mut self, increment: f64, evidence_memory_id: impl Into<String>) {
        self.confidence = (self.confidence + increment).clamp(0.0, 1.0);
        self.reinforcement_count += 1;
        self.evidence_memory_ids.insert(evidence_memory_id.into());
        self.last_updated = Utc::now();
    }

    pub fn set_confidence(&mut self, confidence: f64) {
        self.confidence = confidence.clamp(0.0, 1.0);
        self.last_updated = Utc::now();
    }

    pub fn deactivate(&mut self) {
        if self.active {
            self.active = false;
            self.last_updated = Utc::now();
        }
    }

    pub fn is_invariant_satisfied(&self) -> bool {
        self.last_updated >= self.created_at && (0.0..=1.0).contains(&self.confidence)
    }
}
