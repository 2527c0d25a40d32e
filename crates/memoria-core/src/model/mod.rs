//! Data Model
//!
//! The entity types exclusively owned per-agent: memories, beliefs,
//! conflicts, and the relationship edges that make up the belief graph.
//! The graph itself is never a separate source of truth — it is a view
//! computed from `Belief` and `BeliefRelationship` sets (see
//! `relationship::RelationshipService`).

mod belief;
mod category;
mod conflict;
mod memory;
mod relationship;

pub use belief::Belief;
pub use category::CategoryLabel;
pub use conflict::{determine_conflict_shape, BeliefConflict, ConflictResolution, ConflictShape};
pub use memory::{MemoryMetadata, MemoryRecord};
pub use relationship::{
    BeliefRelationship, RelationshipType, RelationshipValidationError, DEPRECATING_KINDS,
};
