//! Capability Contracts
//!
//! Each provider (embedding, extraction) and each store (memory, belief,
//! graph) is a single capability trait. Variants — an AI-backed extractor
//! vs. a pattern-based fallback, an in-memory store vs. a relational one —
//! are values selected at construction, not a type hierarchy dispatched by
//! inheritance.

mod belief_store;
mod embedding;
mod extraction;
mod graph_store;
mod memory_store;

pub use belief_store::BeliefStore;
pub use embedding::{cosine_similarity, dot_product, euclidean_distance, EmbeddingProvider};
pub use extraction::{text_jaccard_similarity, CandidateBelief, ExtractionProvider};
pub use graph_store::{EdgeDirection, GraphStore};
pub use memory_store::MemoryStore;
