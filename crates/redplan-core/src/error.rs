//! Pipeline error type

use redplan_knowledge::KnowledgeError;
use redplan_verify::VerifyError;

/// Failures surfaced by a planning run
///
/// Validation and repair failures are NOT errors; they come back inside the
/// planning outcome. This enum covers infrastructure faults only.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// Knowledge encoding or retrieval failed
    #[error("knowledge retrieval failed: {0}")]
    Knowledge(#[from] KnowledgeError),

    /// Domain/problem configuration was inconsistent
    #[error("verification setup failed: {0}")]
    Verify(#[from] VerifyError),
}

/// Convenience alias for pipeline results
pub type Result<T> = std::result::Result<T, PlannerError>;
