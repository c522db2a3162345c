use thiserror::Error;

/// Result alias for verification operations
pub type Result<T> = std::result::Result<T, VerifyError>;

/// Construction-time verification errors
///
/// Expected outcomes (missing preconditions, budget overruns, unrepairable
/// plans) are data on the report types, not variants here.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Domain and problem disagree on the domain name
    #[error("domain '{domain}' does not match problem domain '{problem}'")]
    DomainMismatch { domain: String, problem: String },
}
