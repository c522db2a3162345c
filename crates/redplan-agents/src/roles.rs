//! The eleven reference roles
//!
//! Each role emits one step whose preconditions and effects encode a fixed
//! dependency chain: mission intake → goal establishment → campaign
//! sequencing → reconnaissance → initial-access preparation / opsec
//! readiness → exploitation → escalation, C2 and persistence → reporting.
//! That chain is exactly the fact-dependency graph the validator checks.
//!
//! Roles with a tactic keyword fold a one-line technique summary from the
//! retrieved context into their step description. When no tactic matches,
//! the first retrieved node is used; when retrieval is empty, the summary is
//! omitted. The first-node fallback can pick an unrelated technique; it is
//! preserved from the reference behavior and covered by boundary tests.

use crate::agent::{AgentContext, RoleAgent, RoleProfile};
use redplan_knowledge::GraphNode;
use redplan_plan::PlanStep;

/// First node whose tactic contains the keyword (case-insensitive),
/// falling back to the first retrieved node
fn select_technique<'a>(nodes: &'a [GraphNode], keyword: &str) -> Option<&'a GraphNode> {
    let keyword = keyword.to_lowercase();
    nodes
        .iter()
        .find(|node| node.tactic.to_lowercase().contains(&keyword))
        .or_else(|| nodes.first())
}

/// One-line summary folded into a step description, empty without a node
fn technique_note(node: Option<&GraphNode>) -> String {
    match node {
        Some(node) => format!(" Technique focus: {} ({}).", node.name, node.tactic),
        None => String::new(),
    }
}

macro_rules! role_struct {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            profile: RoleProfile,
        }

        impl $name {
            /// Create the role from its configured profile
            #[inline]
            #[must_use]
            pub fn new(profile: RoleProfile) -> Self {
                Self { profile }
            }
        }
    };
}

role_struct! {
    /// Strategic intake: turns mission tasking into established goals
    ManagerAgent
}

impl RoleAgent for ManagerAgent {
    fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    fn plan(&self, context: &AgentContext<'_>) -> Vec<PlanStep> {
        let scenario = context.scenario;
        let constraints = if scenario.constraints.is_empty() {
            "none".to_string()
        } else {
            scenario.constraints.join(", ")
        };
        let description = format!(
            "Assess mission '{}' and encode constraints: {constraints}.",
            scenario.mission_or_default()
        );
        vec![self
            .profile
            .step("analyze_mission", description)
            .with_preconditions(["mission_received"])
            .with_effects(["goals_established", "constraints_documented"])
            .with_risk(0.01)
            .with_cost(1.5)]
    }
}

role_struct! {
    /// Strategic sequencing: shapes the campaign around the priority asset
    CommanderAgent
}

impl RoleAgent for CommanderAgent {
    fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    fn plan(&self, context: &AgentContext<'_>) -> Vec<PlanStep> {
        let description = format!(
            "Translate mission goals into a campaign sequence focused on {}.",
            context.scenario.target_asset_or_default()
        );
        vec![self
            .profile
            .step("shape_campaign", description)
            .with_preconditions(["goals_established"])
            .with_effects(["campaign_sequence_prepared", "targets_prioritized"])
            .with_risk(0.02)
            .with_cost(1.2)]
    }
}

role_struct! {
    /// Tactical collection: maps exposed services and entry points
    ReconnaissanceAgent
}

impl RoleAgent for ReconnaissanceAgent {
    fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    fn plan(&self, context: &AgentContext<'_>) -> Vec<PlanStep> {
        let node = select_technique(context.retrieved, "reconnaissance");
        let description = format!(
            "Execute intelligence collection to map exposed services.{}",
            technique_note(node)
        );
        vec![self
            .profile
            .step("collect_recon", description)
            .with_preconditions(["campaign_sequence_prepared"])
            .with_effects(["reconnaissance_intelligence_collected"])
            .with_risk(0.04)
            .with_cost(1.5)]
    }
}

role_struct! {
    /// Tactical access crafting: human-centric initial access vectors
    SocialEngineerAgent
}

impl RoleAgent for SocialEngineerAgent {
    fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    fn plan(&self, context: &AgentContext<'_>) -> Vec<PlanStep> {
        let node = select_technique(context.retrieved, "initial access");
        let description = format!(
            "Construct a human-centric access vector informed by reconnaissance.{}",
            technique_note(node)
        );
        vec![self
            .profile
            .step("craft_initial_access", description)
            .with_preconditions(["reconnaissance_intelligence_collected"])
            .with_effects(["initial_access_vector_prepared"])
            .with_risk(0.06)
            .with_cost(1.6)]
    }
}

role_struct! {
    /// Tactical stealth: operational security controls before action
    OpsecAgent
}

impl RoleAgent for OpsecAgent {
    fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    fn plan(&self, context: &AgentContext<'_>) -> Vec<PlanStep> {
        let node = select_technique(context.retrieved, "defense evasion");
        let description = format!(
            "Apply operational security controls before action.{}",
            technique_note(node)
        );
        vec![self
            .profile
            .step("establish_opsec", description)
            .with_preconditions(["campaign_sequence_prepared"])
            .with_effects(["opsec_measures_established"])
            .with_risk(0.03)
            .with_cost(1.0)]
    }
}

role_struct! {
    /// Tactical alignment: cross-checks offense against defensive insight
    PurpleAgent
}

impl RoleAgent for PurpleAgent {
    fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    fn plan(&self, _context: &AgentContext<'_>) -> Vec<PlanStep> {
        let description =
            "Validate the offensive plan with defensive insights for coverage and stealth."
                .to_string();
        vec![self
            .profile
            .step("align_opsec", description)
            .with_preconditions(["opsec_measures_established", "initial_access_vector_prepared"])
            .with_effects(["joint_alignment_confirmed"])
            .with_risk(0.02)
            .with_cost(0.8)]
    }
}

role_struct! {
    /// Technical exploitation: runs the exploit chain to gain a foothold
    ExploiterAgent
}

impl RoleAgent for ExploiterAgent {
    fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    fn plan(&self, context: &AgentContext<'_>) -> Vec<PlanStep> {
        let node = select_technique(context.retrieved, "execution");
        let description = format!(
            "Execute the exploit chain to gain a foothold.{}",
            technique_note(node)
        );
        vec![self
            .profile
            .step("execute_exploit", description)
            .with_preconditions(["initial_access_vector_prepared", "opsec_measures_established"])
            .with_effects(["access_obtained"])
            .with_risk(0.08)
            .with_cost(1.8)]
    }
}

role_struct! {
    /// Technical escalation: elevates privileges and collects artifacts
    PostExploitationAgent
}

impl RoleAgent for PostExploitationAgent {
    fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    fn plan(&self, context: &AgentContext<'_>) -> Vec<PlanStep> {
        let node = select_technique(context.retrieved, "privilege escalation");
        let description = format!(
            "Elevate privileges and collect artifacts.{}",
            technique_note(node)
        );
        vec![self
            .profile
            .step("escalate_privileges", description)
            .with_preconditions(["access_obtained"])
            .with_effects(["privileges_escalated", "loot_collected"])
            .with_risk(0.07)
            .with_cost(1.7)]
    }
}

role_struct! {
    /// Technical infrastructure: stages command-and-control channels
    InfrastructureAgent
}

impl RoleAgent for InfrastructureAgent {
    fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    fn plan(&self, _context: &AgentContext<'_>) -> Vec<PlanStep> {
        let description =
            "Stage resilient command-and-control infrastructure for sustained operations."
                .to_string();
        vec![self
            .profile
            .step("stage_c2", description)
            .with_preconditions(["access_obtained"])
            .with_effects(["c2_channel_staged"])
            .with_risk(0.05)
            .with_cost(1.2)]
    }
}

role_struct! {
    /// Technical persistence across hybrid and cloud assets
    CloudAgent
}

impl RoleAgent for CloudAgent {
    fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    fn plan(&self, _context: &AgentContext<'_>) -> Vec<PlanStep> {
        let description = "Maintain persistence across hybrid and cloud assets.".to_string();
        vec![self
            .profile
            .step("maintain_cloud_persistence", description)
            .with_preconditions(["access_obtained"])
            .with_effects(["cloud_persistence_established"])
            .with_risk(0.04)
            .with_cost(1.3)]
    }
}

role_struct! {
    /// Technical debrief: compiles the mission report
    ReporterAgent
}

impl RoleAgent for ReporterAgent {
    fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    fn plan(&self, context: &AgentContext<'_>) -> Vec<PlanStep> {
        let description = format!(
            "Compile the mission report emphasizing {}.",
            context.scenario.report_focus_or_default()
        );
        vec![self
            .profile
            .step("prepare_report", description)
            .with_preconditions(["privileges_escalated", "joint_alignment_confirmed"])
            .with_effects(["report_drafted"])
            .with_risk(0.01)
            .with_cost(0.6)]
    }
}
