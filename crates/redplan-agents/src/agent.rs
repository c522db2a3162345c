//! The role-agent capability and its shared context

use crate::scenario::Scenario;
use redplan_knowledge::GraphNode;
use redplan_plan::{Layer, PlanStep};
use serde::{Deserialize, Serialize};

/// Identity and weighting of one configured role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleProfile {
    /// Role name, matched by the registry
    pub name: String,
    /// Abstraction layer the role plans at
    pub layer: Layer,
    /// Relative contribution weight
    pub weight: f64,
    /// Objective labels carried through from configuration
    #[serde(default)]
    pub objectives: Vec<String>,
}

impl RoleProfile {
    /// Create a profile without objectives
    #[must_use]
    pub fn new(name: impl Into<String>, layer: Layer, weight: f64) -> Self {
        Self {
            name: name.into(),
            layer,
            weight,
            objectives: Vec::new(),
        }
    }

    /// With objective labels
    #[must_use]
    pub fn with_objectives<I, S>(mut self, objectives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.objectives = objectives.into_iter().map(Into::into).collect();
        self
    }

    /// Start a plan step attributed to this role and layer
    #[must_use]
    pub fn step(&self, action_id: impl Into<String>, description: impl Into<String>) -> PlanStep {
        PlanStep::new(action_id, description, self.name.clone(), self.layer)
    }
}

/// Read-only context shared by every agent in one planning run
#[derive(Debug, Clone, Copy)]
pub struct AgentContext<'a> {
    /// The scenario being planned
    pub scenario: &'a Scenario,
    /// Knowledge nodes retrieved once per run, in ranked order
    pub retrieved: &'a [GraphNode],
}

/// Capability: produce plan steps for a scenario and retrieved context
///
/// Implementations return zero or more steps and never mutate shared state;
/// the reference roles each emit exactly one step per invocation.
pub trait RoleAgent {
    /// The role's configured identity
    fn profile(&self) -> &RoleProfile;

    /// Emit this role's contribution to the plan
    fn plan(&self, context: &AgentContext<'_>) -> Vec<PlanStep>;
}
