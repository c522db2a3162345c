//! STRIPS-style forward-state plan validation

use crate::error::{Result, VerifyError};
use redplan_plan::{ActionDefinition, Domain, FactSet, Plan, PlanState, PlanStep, PlanningProblem};
use serde::Serialize;

/// Weights of the composite cost blend: plan length, risk, cost
const COMPOSITE_WEIGHTS: (f64, f64, f64) = (0.2, 0.4, 0.4);

/// One detected violation at a plan position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    /// Position of the offending step in the plan
    pub index: usize,
    /// The offending step
    pub step: PlanStep,
    /// Preconditions not true when the step was reached
    pub missing_preconditions: FactSet,
    /// Whether cumulative risk exceeded the budget at this point
    pub exceeded_risk: bool,
}

/// Outcome of simulating a plan to completion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// True iff no issues were recorded and every goal fact holds
    pub success: bool,
    /// Facts true after the final step
    pub final_state: FactSet,
    /// Issues in plan order
    pub issues: Vec<ValidationIssue>,
    /// Sum of action costs over the whole plan
    pub total_cost: f64,
    /// Sum of action risks over the whole plan
    pub total_risk: f64,
    /// Number of simulated steps
    pub plan_length: usize,
}

impl ValidationReport {
    /// Linear blend of plan length, accumulated risk, and accumulated cost
    ///
    /// This is the scalar the repairer minimizes indirectly by minimizing
    /// edits.
    #[must_use]
    pub fn composite_cost(&self) -> f64 {
        let (w_len, w_risk, w_cost) = COMPOSITE_WEIGHTS;
        w_len * self.plan_length as f64 + w_risk * self.total_risk + w_cost * self.total_cost
    }
}

/// Simulates plan execution against a domain/problem pair
#[derive(Debug, Clone, Copy)]
pub struct PlanValidator<'a> {
    domain: &'a Domain,
    problem: &'a PlanningProblem,
}

impl<'a> PlanValidator<'a> {
    /// Create a validator after checking domain/problem agreement
    ///
    /// # Errors
    /// Returns [`VerifyError::DomainMismatch`] when the problem declares a
    /// different domain name; this is a fatal configuration error.
    pub fn new(domain: &'a Domain, problem: &'a PlanningProblem) -> Result<Self> {
        if domain.name != problem.domain_name {
            return Err(VerifyError::DomainMismatch {
                domain: domain.name.clone(),
                problem: problem.domain_name.clone(),
            });
        }
        Ok(Self { domain, problem })
    }

    /// Forward-simulate the plan and report the outcome
    ///
    /// Per step, in plan order:
    /// 1. resolve the governing action (domain-registered, else synthesized
    ///    from the step's own declared facts),
    /// 2. record preconditions not currently true,
    /// 3. charge cost and risk unconditionally - a step still happens and
    ///    carries operational cost even when its preconditions fail,
    /// 4. record an issue on missing preconditions or budget overrun; a step
    ///    without satisfied preconditions does not mutate state, otherwise
    ///    add-effects apply before delete-effects.
    #[must_use]
    pub fn validate(&self, plan: &Plan) -> ValidationReport {
        let mut state = PlanState::new(self.problem.initial_state.clone());
        let mut issues = Vec::new();
        let mut total_cost = 0.0;
        let mut total_risk = 0.0;

        for (index, step) in plan.iter().enumerate() {
            let action = self.resolve_action(step);

            let missing: FactSet = action
                .preconditions
                .iter()
                .filter(|fact| !state.contains(fact))
                .cloned()
                .collect();

            total_cost += action.cost;
            total_risk += action.risk;
            let exceeded_risk = total_risk > self.problem.risk_budget;

            if !missing.is_empty() || exceeded_risk {
                issues.push(ValidationIssue {
                    index,
                    step: step.clone(),
                    missing_preconditions: missing.clone(),
                    exceeded_risk,
                });
                if !missing.is_empty() {
                    continue;
                }
            }

            for fact in &action.add_effects {
                state.insert(fact.clone());
            }
            for fact in &action.del_effects {
                state.remove(fact);
            }
        }

        let goal_satisfied = state.satisfies(&self.problem.goals);
        let success = issues.is_empty() && goal_satisfied;
        tracing::debug!(
            issues = issues.len(),
            goal_satisfied,
            total_cost,
            total_risk,
            "plan validation finished"
        );

        ValidationReport {
            success,
            final_state: state.into_facts(),
            issues,
            total_cost,
            total_risk,
            plan_length: plan.len(),
        }
    }

    /// Domain-registered action for the step's id, or an ad-hoc action
    /// synthesized from the step itself
    ///
    /// The fallback keeps validation functional before an orchestrator has
    /// mirrored the step into the domain.
    fn resolve_action(&self, step: &PlanStep) -> ActionDefinition {
        self.domain
            .find_action(&step.action_id)
            .cloned()
            .unwrap_or_else(|| ActionDefinition::from_step(step))
    }
}
