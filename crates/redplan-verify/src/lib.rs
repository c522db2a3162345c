//! # Redplan Verify
//!
//! Formal plan verification with automatic constrained repair:
//! - **PlanValidator** - STRIPS-style forward simulation with accumulated
//!   cost and risk, missing-precondition detection, and goal checking
//! - **PlanRepairer** - bounded search over a fixed corrective-action
//!   library, inserting at most one step per iteration
//!
//! Validation failure and repair failure are reported as structured data,
//! never raised as errors; only misconfiguration (a domain/problem name
//! mismatch) fails construction.

mod error;
mod repair;
mod validator;

pub use error::{Result, VerifyError};
pub use repair::{PlanRepairer, RepairOutcome, RepairPolicy};
pub use validator::{PlanValidator, ValidationIssue, ValidationReport};
