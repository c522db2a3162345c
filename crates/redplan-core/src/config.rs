//! Configuration surface consumed by the planning pipeline
//!
//! Every knob here has a defined effect on retrieval, synthesis, or
//! verification; nothing is advisory. Defaults reproduce the reference
//! eleven-role campaign ordering.

use redplan_agents::RoleProfile;
use redplan_knowledge::RetrievalParams;
use redplan_plan::Layer;
use redplan_verify::RepairPolicy;
use serde::{Deserialize, Serialize};

/// Knowledge retrieval parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Maximum retrieved nodes per planning run
    pub top_k: usize,
    /// Weight of query similarity in the blended score
    pub semantic_weight: f64,
    /// Weight of graph centrality in the blended score
    pub structural_weight: f64,
    /// Nodes below this similarity are discarded
    pub similarity_threshold: f64,
}

impl RetrievalConfig {
    /// Convert into the knowledge crate's parameter struct
    #[must_use]
    pub fn params(&self) -> RetrievalParams {
        RetrievalParams {
            top_k: self.top_k,
            semantic_weight: self.semantic_weight,
            structural_weight: self.structural_weight,
            similarity_threshold: self.similarity_threshold,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 8,
            semantic_weight: 0.7,
            structural_weight: 0.3,
            similarity_threshold: 0.32,
        }
    }
}

/// Validation and repair parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Maximum repair iterations per run
    pub max_repairs: usize,
    /// Ceiling on cumulative plan risk
    pub risk_budget: f64,
    /// Maximum plan length during synthesis and repair
    pub max_plan_length: usize,
    /// Ceiling on total plan cost after a corrective insertion
    pub repair_cost_ceiling: f64,
}

impl VerificationConfig {
    /// Convert into the repairer's policy struct
    #[must_use]
    pub fn policy(&self) -> RepairPolicy {
        RepairPolicy {
            max_iterations: self.max_repairs,
            cost_ceiling: self.repair_cost_ceiling,
            max_plan_length: self.max_plan_length,
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            max_repairs: 2,
            risk_budget: 0.55,
            max_plan_length: 32,
            repair_cost_ceiling: 24.0,
        }
    }
}

/// Aggregate pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Retrieval tuning
    pub retrieval: RetrievalConfig,
    /// Verification and repair tuning
    pub verification: VerificationConfig,
    /// Ordered role list; orchestration follows this order exactly
    pub roles: Vec<RoleProfile>,
}

impl PlannerConfig {
    /// Create the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            retrieval: RetrievalConfig::default(),
            verification: VerificationConfig::default(),
            roles: default_roles(),
        }
    }
}

/// The reference role ordering with weights and objective labels
///
/// The order is load-bearing: no role appears before an upstream dependency
/// of its emitted step.
#[must_use]
pub fn default_roles() -> Vec<RoleProfile> {
    vec![
        RoleProfile::new("Manager", Layer::Strategic, 0.22)
            .with_objectives(["identify mission goals", "map constraints"]),
        RoleProfile::new("Commander", Layer::Strategic, 0.2)
            .with_objectives(["sequence objectives", "assign tactics"]),
        RoleProfile::new("Reconnaissance", Layer::Tactical, 0.12)
            .with_objectives(["collect intelligence", "prepare entry"]),
        RoleProfile::new("SocialEngineer", Layer::Tactical, 0.08)
            .with_objectives(["craft initial access vectors"]),
        RoleProfile::new("Opsec", Layer::Tactical, 0.08)
            .with_objectives(["minimize detection", "ensure stealth"]),
        RoleProfile::new("Purple", Layer::Tactical, 0.08)
            .with_objectives(["align offensive and defensive insights"]),
        RoleProfile::new("Exploiter", Layer::Technical, 0.08)
            .with_objectives(["execute exploits", "obtain foothold"]),
        RoleProfile::new("PostExploitation", Layer::Technical, 0.05)
            .with_objectives(["escalate privileges", "harvest data"]),
        RoleProfile::new("Infrastructure", Layer::Technical, 0.03)
            .with_objectives(["maintain C2", "deploy tooling"]),
        RoleProfile::new("Cloud", Layer::Technical, 0.03)
            .with_objectives(["handle cloud assets", "maintain persistence"]),
        RoleProfile::new("Reporter", Layer::Technical, 0.01)
            .with_objectives(["summarize outcomes", "prepare debrief"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let config = PlannerConfig::default();
        assert_eq!(config.retrieval.top_k, 8);
        assert_eq!(config.retrieval.similarity_threshold, 0.32);
        assert_eq!(config.verification.max_repairs, 2);
        assert_eq!(config.verification.risk_budget, 0.55);
        assert_eq!(config.verification.max_plan_length, 32);
        assert_eq!(config.roles.len(), 11);
        assert_eq!(config.roles[0].name, "Manager");
        assert_eq!(config.roles[10].name, "Reporter");
    }

    #[test]
    fn partial_config_deserializes_with_defaults() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{"retrieval": {"top_k": 3}}"#).unwrap();
        assert_eq!(config.retrieval.top_k, 3);
        // Unspecified fields fall back to defaults.
        assert_eq!(config.retrieval.semantic_weight, 0.7);
        assert_eq!(config.roles.len(), 11);
    }

    #[test]
    fn verification_config_maps_to_policy() {
        let config = VerificationConfig {
            max_repairs: 5,
            risk_budget: 0.9,
            max_plan_length: 10,
            repair_cost_ceiling: 7.5,
        };
        let policy = config.policy();
        assert_eq!(policy.max_iterations, 5);
        assert_eq!(policy.max_plan_length, 10);
        assert_eq!(policy.cost_ceiling, 7.5);
    }
}
