//! Concrete Capability Implementations
//!
//! Default, always-available implementations of the C1/C2 capability
//! traits: a deterministic embedder and a pattern-based extractor. An
//! AI-backed provider implementing the same traits is a drop-in
//! replacement; the rest of the engine is unaware of the difference.

mod deterministic_embedder;
#[cfg(feature = "fastembed-embeddings")]
mod fastembed_provider;
mod pattern_extraction;

pub use deterministic_embedder::DeterministicEmbedder;
#[cfg(feature = "fastembed-embeddings")]
pub use fastembed_provider::{FastEmbedProvider, NOMIC_V1_5_DIMENSIONS};
pub use pattern_extraction::PatternExtractionProvider;
