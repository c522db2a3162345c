//! # Redplan Plan
//!
//! Plan primitives and the STRIPS-style action model shared across the
//! planning pipeline:
//! - **PlanStep / Plan / PlanState** - ordered steps and the evolving fact set
//! - **ActionDefinition / Domain** - the authoritative action registry plans
//!   are validated against
//! - **PlanningProblem** - initial facts, goal facts, and the risk budget
//!
//! Fact sets are `BTreeSet<String>` so iteration, serialization, and test
//! output stay deterministic. A `"not "` prefix on an effect marks removal
//! of the fact instead of addition.

mod domain;
mod plan;
mod problem;

pub use domain::{ActionDefinition, Domain};
pub use plan::{is_negated, strip_negation, FactSet, Layer, Plan, PlanState, PlanStep, NEGATION_PREFIX};
pub use problem::PlanningProblem;
