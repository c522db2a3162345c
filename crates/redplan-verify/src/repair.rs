//! Bounded constrained plan repair
//!
//! The repairer keeps a small fixed library of corrective actions, each
//! establishing exactly one known-recoverable fact. Repair only ever inserts
//! a single step immediately before the offending position - existing steps
//! are never removed or reordered - so the edit distance between the
//! original and repaired plan stays minimal by construction.

use crate::error::Result;
use crate::validator::{PlanValidator, ValidationIssue, ValidationReport};
use redplan_plan::{ActionDefinition, Domain, Layer, Plan, PlanStep, PlanningProblem};
use serde::Serialize;

/// Limits every accepted repair must respect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepairPolicy {
    /// Maximum validate-and-repair iterations
    pub max_iterations: usize,
    /// Ceiling on total plan cost after an insertion
    pub cost_ceiling: f64,
    /// Maximum plan length after an insertion
    pub max_plan_length: usize,
}

impl Default for RepairPolicy {
    fn default() -> Self {
        Self {
            max_iterations: 2,
            cost_ceiling: 24.0,
            max_plan_length: 32,
        }
    }
}

/// Result of a repair loop, surfaced as data rather than an error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepairOutcome {
    /// Whether validation eventually passed
    pub success: bool,
    /// Number of accepted insertions
    pub iterations: usize,
    /// Human-readable reason when unsuccessful
    pub reason: Option<String>,
    /// The last validation report produced
    pub report: ValidationReport,
}

/// One library entry: the fact it establishes and its corrective step
struct RepairEntry {
    fact: &'static str,
    build: fn() -> PlanStep,
}

/// Injects corrective steps when validation fails
pub struct PlanRepairer {
    library: Vec<RepairEntry>,
}

impl PlanRepairer {
    /// Create a repairer with the fixed corrective-action library
    #[must_use]
    pub fn new() -> Self {
        Self {
            library: vec![
                RepairEntry {
                    fact: "mission_received",
                    build: || {
                        PlanStep::new(
                            "ingest_mission",
                            "Register mission tasking and baseline objectives.",
                            "Manager",
                            Layer::Strategic,
                        )
                        .with_effects(["mission_received"])
                        .with_risk(0.0)
                        .with_cost(0.4)
                    },
                },
                RepairEntry {
                    fact: "campaign_sequence_prepared",
                    build: || {
                        PlanStep::new(
                            "synchronize_campaign",
                            "Synchronize campaign ordering across roles.",
                            "Commander",
                            Layer::Strategic,
                        )
                        .with_preconditions(["goals_established"])
                        .with_effects(["campaign_sequence_prepared"])
                        .with_risk(0.01)
                        .with_cost(0.6)
                    },
                },
                RepairEntry {
                    fact: "opsec_measures_established",
                    build: || {
                        PlanStep::new(
                            "deploy_opsec_controls",
                            "Deploy compensating controls to restore opsec discipline.",
                            "Opsec",
                            Layer::Tactical,
                        )
                        .with_effects(["opsec_measures_established"])
                        .with_risk(0.03)
                        .with_cost(0.7)
                    },
                },
                RepairEntry {
                    fact: "initial_access_vector_prepared",
                    build: || {
                        PlanStep::new(
                            "refresh_access_vector",
                            "Refresh initial access preparation with updated recon data.",
                            "SocialEngineer",
                            Layer::Tactical,
                        )
                        .with_preconditions(["reconnaissance_intelligence_collected"])
                        .with_effects(["initial_access_vector_prepared"])
                        .with_risk(0.05)
                        .with_cost(0.8)
                    },
                },
                RepairEntry {
                    fact: "access_obtained",
                    build: || {
                        PlanStep::new(
                            "re_execute_exploit",
                            "Re-run the exploit chain with a mitigated risk profile.",
                            "Exploiter",
                            Layer::Technical,
                        )
                        .with_preconditions(["initial_access_vector_prepared"])
                        .with_effects(["access_obtained"])
                        .with_risk(0.06)
                        .with_cost(1.0)
                    },
                },
            ],
        }
    }

    /// Facts the library can re-establish
    pub fn recoverable_facts(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.library.iter().map(|entry| entry.fact)
    }

    /// Try to resolve one issue with a single bounded insertion
    ///
    /// Walks the issue's missing preconditions in order; the first one with
    /// a library entry whose corrective step fits under the policy's length
    /// and cost ceilings is inserted immediately before the offending
    /// position and mirrored into the domain. Returns the inserted action id,
    /// or `None` with no mutation at all when nothing is admissible.
    pub fn attempt_repair(
        &self,
        plan: &mut Plan,
        domain: &mut Domain,
        issue: &ValidationIssue,
        policy: &RepairPolicy,
    ) -> Option<String> {
        for missing in &issue.missing_preconditions {
            let Some(entry) = self.library.iter().find(|entry| entry.fact == missing) else {
                continue;
            };
            let step = (entry.build)();

            if plan.len() + 1 > policy.max_plan_length {
                tracing::debug!(fact = %missing, "repair rejected: plan length ceiling");
                continue;
            }
            if plan.total_cost() + step.cost > policy.cost_ceiling {
                tracing::debug!(fact = %missing, "repair rejected: cost ceiling");
                continue;
            }

            let action_id = step.action_id.clone();
            domain.register(ActionDefinition::from_step(&step));
            plan.insert(issue.index, step);
            return Some(action_id);
        }
        None
    }

    /// Validate and repair until success or the budget is exhausted
    ///
    /// Issues are tried in report order; an iteration that yields no
    /// admissible repair terminates the loop in failure. Existing steps are
    /// never removed or reordered.
    ///
    /// # Errors
    /// Fails only on a domain/problem name mismatch.
    pub fn repair_loop(
        &self,
        plan: &mut Plan,
        domain: &mut Domain,
        problem: &PlanningProblem,
        policy: &RepairPolicy,
    ) -> Result<RepairOutcome> {
        let mut iterations = 0;

        loop {
            let report = PlanValidator::new(domain, problem)?.validate(plan);
            if report.success {
                tracing::debug!(iterations, "plan valid");
                return Ok(RepairOutcome {
                    success: true,
                    iterations,
                    reason: None,
                    report,
                });
            }
            if iterations >= policy.max_iterations {
                return Ok(RepairOutcome {
                    success: false,
                    iterations,
                    reason: Some(format!(
                        "plan still failing after {iterations} repair iterations"
                    )),
                    report,
                });
            }

            let inserted = report
                .issues
                .iter()
                .filter(|issue| !issue.missing_preconditions.is_empty())
                .find_map(|issue| self.attempt_repair(plan, domain, issue, policy));

            match inserted {
                Some(action_id) => {
                    iterations += 1;
                    tracing::debug!(%action_id, iterations, "inserted corrective step");
                }
                None => {
                    return Ok(RepairOutcome {
                        success: false,
                        iterations,
                        reason: Some(
                            "no admissible corrective action for the remaining issues".to_string(),
                        ),
                        report,
                    });
                }
            }
        }
    }
}

impl Default for PlanRepairer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redplan_plan::FactSet;

    fn facts<const N: usize>(names: [&str; N]) -> FactSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn exploit_step() -> PlanStep {
        PlanStep::new(
            "execute_exploit",
            "Execute the exploit chain.",
            "Exploiter",
            Layer::Technical,
        )
        .with_preconditions(["initial_access_vector_prepared", "opsec_measures_established"])
        .with_effects(["access_obtained"])
        .with_risk(0.08)
        .with_cost(1.8)
    }

    fn issue_for(plan: &Plan, index: usize, missing: FactSet) -> ValidationIssue {
        ValidationIssue {
            index,
            step: plan.steps()[index].clone(),
            missing_preconditions: missing,
            exceeded_risk: false,
        }
    }

    #[test]
    fn library_covers_the_recoverable_facts() {
        let repairer = PlanRepairer::new();
        let facts: Vec<&str> = repairer.recoverable_facts().collect();
        assert_eq!(
            facts,
            vec![
                "mission_received",
                "campaign_sequence_prepared",
                "opsec_measures_established",
                "initial_access_vector_prepared",
                "access_obtained",
            ]
        );
    }

    #[test]
    fn attempt_repair_inserts_exactly_one_step() {
        let repairer = PlanRepairer::new();
        let policy = RepairPolicy::default();
        let mut plan = Plan::new();
        plan.append(exploit_step());
        let mut domain = Domain::new("redplan");

        let issue = issue_for(&plan, 0, facts(["opsec_measures_established"]));
        let inserted = repairer.attempt_repair(&mut plan, &mut domain, &issue, &policy);

        assert_eq!(inserted.as_deref(), Some("deploy_opsec_controls"));
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.steps()[0].action_id, "deploy_opsec_controls");
        assert_eq!(plan.steps()[1].action_id, "execute_exploit");
        assert!(domain.find_action("deploy_opsec_controls").is_some());
    }

    #[test]
    fn attempt_repair_fails_closed_without_library_entry() {
        let repairer = PlanRepairer::new();
        let policy = RepairPolicy::default();
        let mut plan = Plan::new();
        plan.append(exploit_step());
        let before = plan.clone();
        let mut domain = Domain::new("redplan");

        let issue = issue_for(&plan, 0, facts(["quantum_entanglement_ready"]));
        let inserted = repairer.attempt_repair(&mut plan, &mut domain, &issue, &policy);

        assert!(inserted.is_none());
        assert_eq!(plan, before);
        assert!(domain.is_empty());
    }

    #[test]
    fn attempt_repair_respects_cost_ceiling() {
        let repairer = PlanRepairer::new();
        let policy = RepairPolicy {
            cost_ceiling: 2.0, // 1.8 already spent; 0.7 more would breach
            ..RepairPolicy::default()
        };
        let mut plan = Plan::new();
        plan.append(exploit_step());
        let mut domain = Domain::new("redplan");

        let issue = issue_for(&plan, 0, facts(["opsec_measures_established"]));
        let inserted = repairer.attempt_repair(&mut plan, &mut domain, &issue, &policy);

        assert!(inserted.is_none());
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn attempt_repair_respects_length_ceiling() {
        let repairer = PlanRepairer::new();
        let policy = RepairPolicy {
            max_plan_length: 1,
            ..RepairPolicy::default()
        };
        let mut plan = Plan::new();
        plan.append(exploit_step());
        let mut domain = Domain::new("redplan");

        let issue = issue_for(&plan, 0, facts(["opsec_measures_established"]));
        assert!(repairer
            .attempt_repair(&mut plan, &mut domain, &issue, &policy)
            .is_none());
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn repair_loop_fixes_missing_opsec_in_one_iteration() {
        let repairer = PlanRepairer::new();
        let policy = RepairPolicy::default();

        let mut plan = Plan::new();
        plan.append(exploit_step());
        let mut domain = Domain::new("redplan");
        domain.register(ActionDefinition::from_step(&plan.steps()[0]));

        let problem = PlanningProblem::new(
            "redplan",
            facts(["initial_access_vector_prepared"]),
            facts(["access_obtained"]),
        )
        .with_risk_budget(0.55);

        let outcome = repairer
            .repair_loop(&mut plan, &mut domain, &problem, &policy)
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.iterations, 1);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.steps()[0].action_id, "deploy_opsec_controls");
        assert!(outcome.report.final_state.contains("access_obtained"));
    }

    #[test]
    fn repair_loop_preserves_existing_step_order() {
        let repairer = PlanRepairer::new();
        let policy = RepairPolicy::default();

        let mut plan = Plan::new();
        plan.append(
            PlanStep::new("collect_recon", "", "Reconnaissance", Layer::Tactical)
                .with_preconditions(["campaign_sequence_prepared"])
                .with_effects(["reconnaissance_intelligence_collected"])
                .with_risk(0.04),
        );
        plan.append(exploit_step());
        let original_ids: Vec<String> =
            plan.iter().map(|step| step.action_id.clone()).collect();

        let mut domain = Domain::new("redplan");
        let problem = PlanningProblem::new(
            "redplan",
            facts(["campaign_sequence_prepared", "initial_access_vector_prepared"]),
            facts(["access_obtained"]),
        )
        .with_risk_budget(0.55);

        let outcome = repairer
            .repair_loop(&mut plan, &mut domain, &problem, &policy)
            .unwrap();
        assert!(outcome.success);

        // The original steps survive, in order, as a subsequence.
        let repaired_ids: Vec<String> =
            plan.iter().map(|step| step.action_id.clone()).collect();
        let mut cursor = repaired_ids.iter();
        for id in &original_ids {
            assert!(cursor.any(|r| r == id), "step {id} was removed or reordered");
        }
    }

    #[test]
    fn repair_loop_reports_unrecoverable_gap() {
        let repairer = PlanRepairer::new();
        let policy = RepairPolicy::default();

        let mut plan = Plan::new();
        plan.append(
            PlanStep::new("bespoke", "", "Exploiter", Layer::Technical)
                .with_preconditions(["undocumented_capability"])
                .with_effects(["done"]),
        );
        let mut domain = Domain::new("redplan");
        let problem =
            PlanningProblem::new("redplan", FactSet::new(), facts(["done"])).with_risk_budget(1.0);

        let outcome = repairer
            .repair_loop(&mut plan, &mut domain, &problem, &policy)
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.iterations, 0);
        assert!(outcome.reason.is_some());
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn repair_loop_stops_at_iteration_budget() {
        let repairer = PlanRepairer::new();
        let policy = RepairPolicy {
            max_iterations: 0,
            ..RepairPolicy::default()
        };

        let mut plan = Plan::new();
        plan.append(exploit_step());
        let mut domain = Domain::new("redplan");
        let problem = PlanningProblem::new(
            "redplan",
            facts(["initial_access_vector_prepared"]),
            facts(["access_obtained"]),
        )
        .with_risk_budget(0.55);

        let outcome = repairer
            .repair_loop(&mut plan, &mut domain, &problem, &policy)
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(plan.len(), 1);
    }
}
