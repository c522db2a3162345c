//! # Redplan Knowledge
//!
//! Technique knowledge retrieval for the planning pipeline:
//! - **Hashing encoder** - deterministic fixed-width text embeddings
//! - **Knowledge graph** - typed technique nodes with directed relations
//! - **Hybrid retrieval** - cosine similarity blended with structural centrality
//!
//! The encoder and graph are read-only after construction and can be shared
//! across concurrent planning runs without locking.

mod encoder;
mod error;
mod graph;

pub use encoder::{cosine_similarity, HashingEncoder, DEFAULT_DIMENSIONS};
pub use error::{KnowledgeError, Result};
pub use graph::{GraphEdge, GraphNode, KnowledgeGraph, RetrievalParams, ScoredNode};
