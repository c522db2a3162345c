//! The end-to-end planning pipeline
//!
//! One `plan()` call runs the full cycle: retrieve knowledge context,
//! synthesize steps role by role, then validate and repair. The pipeline is
//! deterministic for a fixed configuration, graph, and scenario; identical
//! inputs yield byte-identical outcomes.

use crate::config::PlannerConfig;
use crate::error::Result;
use redplan_agents::{build_agent, AgentContext, RoleAgent, Scenario};
use redplan_knowledge::{GraphNode, HashingEncoder, KnowledgeGraph};
use redplan_plan::{ActionDefinition, Domain, FactSet, Plan, PlanningProblem};
use redplan_verify::{PlanRepairer, ValidationReport};
use serde::Serialize;

/// Domain name stamped on every generated domain and problem
pub const DOMAIN_NAME: &str = "redplan";

/// Everything one planning run produced
#[derive(Debug, Clone, Serialize)]
pub struct PlanningOutcome {
    /// The final plan, including any corrective insertions
    pub plan: Plan,
    /// The domain the plan was validated against
    pub domain: Domain,
    /// The problem instance derived from the scenario
    pub problem: PlanningProblem,
    /// The last validation report
    pub report: ValidationReport,
    /// Corrective insertions that were accepted
    pub repair_iterations: usize,
    /// Why repair gave up, when it did
    pub repair_reason: Option<String>,
    /// Ids of retrieved knowledge nodes, in score order
    pub retrieved_context: Vec<String>,
}

impl PlanningOutcome {
    /// Whether the final plan passed validation
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.report.success
    }
}

/// Orchestrates retrieval, role synthesis, and verification
pub struct Planner {
    config: PlannerConfig,
    encoder: HashingEncoder,
    graph: KnowledgeGraph,
    agents: Vec<Box<dyn RoleAgent>>,
    repairer: PlanRepairer,
}

impl Planner {
    /// Build a planner over a knowledge graph
    ///
    /// Configured roles that resolve to no known agent are skipped with a
    /// warning; the remaining roles run in configuration order.
    #[must_use]
    pub fn new(config: PlannerConfig, graph: KnowledgeGraph) -> Self {
        let agents: Vec<Box<dyn RoleAgent>> = config
            .roles
            .iter()
            .filter_map(|profile| {
                let agent = build_agent(profile.clone());
                if agent.is_none() {
                    tracing::warn!(role = %profile.name, "unknown role skipped");
                }
                agent
            })
            .collect();
        tracing::debug!(agents = agents.len(), "planner assembled");

        Self {
            config,
            encoder: HashingEncoder::default(),
            graph,
            agents,
            repairer: PlanRepairer::new(),
        }
    }

    /// The active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Run the full pipeline for one scenario
    ///
    /// # Errors
    /// Fails only on infrastructure faults (mismatched embedding dimensions,
    /// inconsistent domain wiring). A plan that cannot be made valid is a
    /// normal outcome with `report.success == false`.
    pub fn plan(&self, scenario: &Scenario) -> Result<PlanningOutcome> {
        let query = scenario.retrieval_query();
        let retrieved: Vec<GraphNode> = self
            .graph
            .retrieve(&query, &self.encoder, &self.config.retrieval.params())?
            .into_iter()
            .map(|scored| scored.node.clone())
            .collect();
        tracing::info!(
            hits = retrieved.len(),
            query_len = query.len(),
            "knowledge retrieval complete"
        );

        let (mut plan, mut domain) = self.synthesize(scenario, &retrieved);
        let problem = self.build_problem(scenario);

        let outcome = self.repairer.repair_loop(
            &mut plan,
            &mut domain,
            &problem,
            &self.config.verification.policy(),
        )?;
        tracing::info!(
            success = outcome.success,
            steps = plan.len(),
            repairs = outcome.iterations,
            "planning run finished"
        );

        Ok(PlanningOutcome {
            plan,
            domain,
            problem,
            report: outcome.report,
            repair_iterations: outcome.iterations,
            repair_reason: outcome.reason,
            retrieved_context: retrieved.into_iter().map(|node| node.id).collect(),
        })
    }

    /// Run every agent in order, mirroring each emitted step into the domain
    ///
    /// Synthesis stops once the configured plan length ceiling is reached;
    /// later roles contribute nothing.
    fn synthesize(&self, scenario: &Scenario, retrieved: &[GraphNode]) -> (Plan, Domain) {
        let context = AgentContext {
            scenario,
            retrieved,
        };
        let max_len = self.config.verification.max_plan_length;

        let mut plan = Plan::new();
        let mut domain = Domain::new(DOMAIN_NAME);
        'roles: for agent in &self.agents {
            for step in agent.plan(&context) {
                if plan.len() >= max_len {
                    tracing::debug!(
                        role = %agent.profile().name,
                        "plan length ceiling reached, stopping synthesis"
                    );
                    break 'roles;
                }
                domain.register(ActionDefinition::from_step(&step));
                plan.append(step);
            }
        }
        (plan, domain)
    }

    /// Derive the problem instance from the scenario
    fn build_problem(&self, scenario: &Scenario) -> PlanningProblem {
        PlanningProblem::new(
            DOMAIN_NAME,
            initial_facts(scenario),
            goal_facts(scenario),
        )
        .with_risk_budget(self.config.verification.risk_budget)
    }
}

/// Scenario-declared initial facts plus the facts every run starts from
///
/// `mission_received` and `environment_profiled` hold implicitly: tasking
/// exists and the environment was profiled before planning started.
#[must_use]
pub fn initial_facts(scenario: &Scenario) -> FactSet {
    let mut facts: FactSet = scenario.initial_facts.iter().cloned().collect();
    facts.insert("mission_received".to_string());
    facts.insert("environment_profiled".to_string());
    facts
}

/// Scenario-declared goals, or the default reporting goal
#[must_use]
pub fn goal_facts(scenario: &Scenario) -> FactSet {
    if scenario.goal_facts.is_empty() {
        ["report_drafted".to_string()].into_iter().collect()
    } else {
        scenario.goal_facts.iter().cloned().collect()
    }
}
