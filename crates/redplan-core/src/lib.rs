//! # Redplan Core
//!
//! The planning pipeline tying the workspace together:
//! - **PlannerConfig** - retrieval, verification, and role configuration with
//!   documented defaults
//! - **Planner** - retrieve knowledge context, synthesize a plan role by
//!   role, then validate and repair it
//! - **PlanningOutcome** - the plan, domain, problem, validation report, and
//!   repair accounting for one run
//!
//! The pipeline is fully deterministic: no randomness, no ambient state, and
//! iteration everywhere follows insertion or configuration order.

mod config;
mod error;
mod pipeline;

pub use config::{default_roles, PlannerConfig, RetrievalConfig, VerificationConfig};
pub use error::{PlannerError, Result};
pub use pipeline::{goal_facts, initial_facts, Planner, PlanningOutcome, DOMAIN_NAME};

// The types a typical caller needs alongside the planner.
pub use redplan_agents::Scenario;
pub use redplan_knowledge::{HashingEncoder, KnowledgeGraph};
pub use redplan_plan::{Plan, PlanStep};
pub use redplan_verify::ValidationReport;
