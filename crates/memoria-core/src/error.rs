//! Error Types
//!
//! A single discriminated error type covering every failure kind the
//! engine can surface. Provider-level failures (extraction, embedding,
//! categorization) are absorbed upstream and never reach this type; see
//! `categorization`, `memory_encoding`, and `brca` for the fallback paths.

use serde::{Deserialize, Serialize};

/// Engine error kinds.
///
/// `InvalidInput` and `NotFound` are reported to the caller unchanged.
/// `Storage` wraps a backend failure after it has been logged with
/// contextual fields. `BeliefAnalysisIncomplete` is returned (not thrown)
/// by the orchestrator when a memory was durably stored but belief
/// analysis failed afterward.
#[non_exhaustive]
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Error {
    /// Validation failure on caller-supplied input.
    #[error("invalid input: {field} = {value:?}: {message}")]
    InvalidInput {
        field: String,
        value: String,
        message: String,
    },

    /// Addressed entity does not exist. Distinct from an empty result set.
    #[error("not found: {entity} {id}")]
    NotFound { entity: String, id: String },

    /// Backend storage failure (transport, integrity, or constraint violation).
    #[error("storage error during {operation}: {message}")]
    Storage { operation: String, message: String },

    /// A memory was encoded and persisted, but belief analysis did not
    /// complete. The memory id is still valid and the record is not lost.
    #[error("belief analysis incomplete for memory {memory_id}: {reason}")]
    BeliefAnalysisIncomplete { memory_id: String, reason: String },

    /// The extraction provider reported itself unhealthy.
    ///
    /// Never surfaced to callers of the public engine operations — kept so
    /// a provider implementation has a typed way to report health, and so
    /// tests can assert the fallback path was taken.
    #[error("extraction provider unavailable: {reason}")]
    ExtractionUnavailable { reason: String },

    /// The embedding provider reported itself unhealthy or failed.
    ///
    /// Never surfaced to callers; the engine proceeds without an embedding.
    #[error("embedding provider unavailable: {reason}")]
    EmbeddingUnavailable { reason: String },
}

impl Error {
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidInput {
            field: field.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn storage(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Storage {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// True for errors the engine absorbs rather than propagates.
    pub fn is_absorbable(&self) -> bool {
        matches!(
            self,
            Error::ExtractionUnavailable { .. } | Error::EmbeddingUnavailable { .. }
        )
    }
}

/// Engine result type.
pub type Result<T> = std::result::Result<T, Error>;
