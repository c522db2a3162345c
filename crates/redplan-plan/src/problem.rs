//! Problem instance the validator checks plans against

use crate::plan::FactSet;
use serde::{Deserialize, Serialize};

/// A planning problem: initial facts, goal facts, and a risk ceiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningProblem {
    /// Must match the domain the plan is validated against
    pub domain_name: String,
    /// Facts true before the first step
    pub initial_state: FactSet,
    /// Facts that must hold after the final step
    pub goals: FactSet,
    /// Ceiling on cumulative risk
    pub risk_budget: f64,
}

impl PlanningProblem {
    /// Create a problem with the default 0.35 risk budget
    #[must_use]
    pub fn new(domain_name: impl Into<String>, initial_state: FactSet, goals: FactSet) -> Self {
        Self {
            domain_name: domain_name.into(),
            initial_state,
            goals,
            risk_budget: 0.35,
        }
    }

    /// With risk budget
    #[inline]
    #[must_use]
    pub fn with_risk_budget(mut self, risk_budget: f64) -> Self {
        self.risk_budget = risk_budget;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_builder() {
        let problem = PlanningProblem::new(
            "redplan",
            ["mission_received".to_string()].into_iter().collect(),
            ["report_drafted".to_string()].into_iter().collect(),
        )
        .with_risk_budget(0.55);

        assert_eq!(problem.domain_name, "redplan");
        assert_eq!(problem.risk_budget, 0.55);
        assert!(problem.initial_state.contains("mission_received"));
        assert!(problem.goals.contains("report_drafted"));
    }
}
