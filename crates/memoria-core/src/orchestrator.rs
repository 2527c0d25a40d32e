//! C10 — Ingestion Orchestrator
//!
//! The single entrypoint a caller actually drives: validate, categorize
//! (C6), encode and store (C7), analyze for belief reinforcement and
//! conflict (C8), assemble a result.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::brca::Brca;
use crate::categorization::CategorizationEngine;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::ids;
use crate::memory_encoding::MemoryEncodingEngine;
use crate::model::{CategoryLabel, MemoryMetadata};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestInput {
    pub agent_id: String,
    pub content: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<MemoryMetadata>,
    #[serde(default)]
    pub dry_run: bool,
}

/// Whether belief analysis finished for an ingested memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BeliefAnalysisStatus {
    Completed,
    SkippedDryRun,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionResult {
    pub memory_id: Option<String>,
    pub encoded: bool,
    pub category: CategoryLabel,
    pub new_belief_ids: Vec<String>,
    pub reinforced_belief_ids: Vec<String>,
    pub conflict_ids: Vec<String>,
    pub dry_run: bool,
    pub belief_analysis: BeliefAnalysisStatus,
    pub processing_time_ms: u64,
}

pub struct IngestionOrchestrator {
    categorization: CategorizationEngine,
    memory_encoding: MemoryEncodingEngine,
    brca: Brca,
    config: EngineConfig,
}

impl IngestionOrchestrator {
    pub fn new(categorization: CategorizationEngine, memory_encoding: MemoryEncodingEngine, brca: Brca, config: EngineConfig) -> Self {
        Self { categorization, memory_encoding, brca, config }
    }

    /// The memory encoding engine driving this orchestrator, for read and
    /// removal operations outside the `ingest` pipeline.
    pub fn memory_encoding(&self) -> &MemoryEncodingEngine {
        &self.memory_encoding
    }

    /// The analyzer driving this orchestrator, for belief-surface
    /// operations outside the per-memory pipeline.
    pub fn brca(&self) -> &Brca {
        &self.brca
    }

    /// `validate(input)`: field-level errors, none of which are thrown.
    pub fn validate(&self, input: &IngestInput) -> Vec<Error> {
        let mut errors = Vec::new();

        if input.agent_id.trim().is_empty() {
            errors.push(Error::invalid_input("agentId", &input.agent_id, "agentId must not be empty"));
        }

        let content_len = input.content.chars().count();
        if content_len == 0 || content_len > self.config.max_content_length {
            errors.push(Error::invalid_input(
                "content",
                format!("<{content_len} chars>"),
                format!("content length must be within 1..={}", self.config.max_content_length),
            ));
        }

        if let Some(timestamp) = input.timestamp {
            let skew_bound = Utc::now() + chrono::Duration::seconds(self.config.max_clock_skew_seconds);
            if timestamp > skew_bound {
                errors.push(Error::invalid_input(
                    "timestamp",
                    timestamp.to_rfc3339(),
                    format!("timestamp is more than {}s ahead of now", self.config.max_clock_skew_seconds),
                ));
            }
        }

        errors
    }

    /// `ingest(input) -> IngestionResult`. On a dry run, nothing is
    /// persisted: the preview carries a synthetic `dry-run-{uuid}` id and
    /// `encoded = false`. Otherwise encodes, analyzes, and assembles the
    /// result; a belief-analysis failure after a successful encode is
    /// surfaced as `Error::BeliefAnalysisIncomplete` carrying the already-
    /// durable memory id, so the caller can recover it without re-ingesting.
    #[tracing::instrument(skip(self, input), fields(agent_id = %input.agent_id))]
    pub async fn ingest(&self, input: IngestInput) -> Result<IngestionResult> {
        let started = Instant::now();

        let errors = self.validate(&input);
        if let Some(first) = errors.into_iter().next() {
            return Err(first);
        }

        let category = self.categorization.categorize(&input.content).await;

        if input.dry_run {
            return Ok(IngestionResult {
                memory_id: Some(ids::new_dry_run_id()),
                encoded: false,
                category,
                new_belief_ids: Vec::new(),
                reinforced_belief_ids: Vec::new(),
                conflict_ids: Vec::new(),
                dry_run: true,
                belief_analysis: BeliefAnalysisStatus::SkippedDryRun,
                processing_time_ms: started.elapsed().as_millis() as u64,
            });
        }

        let mut metadata = input.metadata.unwrap_or_default();
        if let Some(source) = input.source {
            metadata.source = Some(source);
        }

        let record = self.memory_encoding.encode_and_store(&input.agent_id, &input.content, category.clone(), metadata).await?;

        let analysis = self.brca.analyze_new_memory(&record).await.map_err(|err| Error::BeliefAnalysisIncomplete {
            memory_id: record.id.clone(),
            reason: err.to_string(),
        })?;

        Ok(IngestionResult {
            memory_id: Some(record.id),
            encoded: true,
            category,
            new_belief_ids: analysis.new_beliefs.into_iter().map(|belief| belief.id).collect(),
            reinforced_belief_ids: analysis.reinforced_beliefs.into_iter().map(|belief| belief.id).collect(),
            conflict_ids: analysis.conflicts.into_iter().map(|conflict| conflict.id).collect(),
            dry_run: false,
            belief_analysis: BeliefAnalysisStatus::Completed,
            processing_time_ms: started.elapsed().as_millis() as u64,
        })
    }
}
