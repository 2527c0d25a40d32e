//! Memory Record — the unit persisted by the Memory Store (C3/C7).

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::category::CategoryLabel;

/// Free-form metadata bag carried on a memory record.
///
/// `importance`, `source`, `tags`, `access_count`, and `confidence` are
/// named fields; anything else a caller wants to stash rides in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryMetadata {
    #[serde(default)]
    pub importance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub access_count: u64,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, flatten)]
    pub extra: HashMap<String, Value>,
}

impl MemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A persisted memory: free-form content plus its derived category,
/// optional embedding, and bookkeeping fields.
///
/// Invariants: `created_at <= last_accessed`; `version` strictly
/// increases across updates; `embedding`, when present, has a fixed
/// length for the deployment (`EngineConfig::embedding_dimension`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    pub id: String,
    pub agent_id: String,
    pub content: String,
    pub category: CategoryLabel,
    pub metadata: MemoryMetadata,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    pub version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl MemoryRecord {
    /// Build a freshly-assigned record. `id` must already be generated by
    /// the caller (`ids::new_memory_id`) — this constructor never assigns
    /// one itself, keeping id assignment an explicit, auditable step in
    /// `MemoryEncodingEngine::encode_and_store`.
    pub fn new(id: String, agent_id: impl Into<String>, content: impl Into<String>, category: CategoryLabel, metadata: MemoryMetadata) -> Self {
        let now = Utc::now();
        Self {
            id,
            agent_id: agent_id.into(),
            content: content.into(),
            category,
            metadata,
            created_at: now,
            last_accessed: now,
            relevance_score: None,
            version: 1,
            embedding: None,
        }
    }

    /// Record an access: bump `access_count` and refresh `last_accessed`.
    /// Must be applied atomically with the store read that triggers it.
    pub fn touch(&mut self) {
        self.last_accessed = Utc::now();
        self.metadata.access_count += 1;
    }

    pub fn is_temporally_consistent(&self) -> bool {
        self.created_at <= self.last_accessed
    }
}
