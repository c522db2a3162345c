//! The STRIPS action registry

use crate::plan::{FactSet, PlanStep};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Canonical STRIPS form of a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    /// Action name, unique within a domain
    pub name: String,
    /// Facts that must hold before the action
    pub preconditions: FactSet,
    /// Facts established by the action
    pub add_effects: FactSet,
    /// Facts removed by the action
    pub del_effects: FactSet,
    /// Nonnegative operational cost
    pub cost: f64,
    /// Risk probability in [0, 1]
    pub risk: f64,
}

impl ActionDefinition {
    /// Mirror a plan step into its canonical action form
    ///
    /// Negated effects land in `del_effects` with the prefix stripped.
    #[must_use]
    pub fn from_step(step: &PlanStep) -> Self {
        Self {
            name: step.action_id.clone(),
            preconditions: step.preconditions.clone(),
            add_effects: step.add_effects().map(str::to_string).collect(),
            del_effects: step.del_effects().map(str::to_string).collect(),
            cost: step.cost,
            risk: step.risk,
        }
    }
}

/// The authoritative registry of actions a plan is validated against
///
/// Action names are unique: re-registering a name replaces the previous
/// definition. Iteration follows registration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    /// Domain name, matched against the problem's declared domain
    pub name: String,
    actions: IndexMap<String, ActionDefinition>,
}

impl Domain {
    /// Create an empty domain
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: IndexMap::new(),
        }
    }

    /// Register an action, replacing any previous definition of the name
    pub fn register(&mut self, action: ActionDefinition) {
        self.actions.insert(action.name.clone(), action);
    }

    /// Look up an action by name
    #[inline]
    #[must_use]
    pub fn find_action(&self, name: &str) -> Option<&ActionDefinition> {
        self.actions.get(name)
    }

    /// Iterate actions in registration order
    pub fn actions(&self) -> impl Iterator<Item = &ActionDefinition> {
        self.actions.values()
    }

    /// Number of registered actions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no actions are registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
