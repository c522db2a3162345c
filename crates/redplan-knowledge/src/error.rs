use thiserror::Error;

/// Result alias for knowledge operations
pub type Result<T> = std::result::Result<T, KnowledgeError>;

/// Errors raised while building or querying the knowledge layer
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// Encoder configured with zero dimensions
    #[error("embedding dimensionality must be positive")]
    InvalidDimensions,

    /// Cosine similarity over vectors of different width
    #[error("vector dimension mismatch: {lhs} vs {rhs}")]
    DimensionMismatch { lhs: usize, rhs: usize },

    /// Graph source could not be read
    #[error("failed to read knowledge graph source: {0}")]
    Io(#[from] std::io::Error),

    /// Graph source was not valid JSON or missed required fields
    #[error("malformed knowledge graph source: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Lookup of an unknown node id
    #[error("node not found: {0}")]
    NodeNotFound(String),
}
