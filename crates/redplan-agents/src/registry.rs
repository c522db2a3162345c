//! Role name → agent constructor registry

use crate::agent::{RoleAgent, RoleProfile};
use crate::roles::{
    CloudAgent, CommanderAgent, ExploiterAgent, InfrastructureAgent, ManagerAgent, OpsecAgent,
    PostExploitationAgent, PurpleAgent, ReconnaissanceAgent, ReporterAgent, SocialEngineerAgent,
};

/// The fixed role names, in default orchestration order
pub const ROLE_NAMES: [&str; 11] = [
    "Manager",
    "Commander",
    "Reconnaissance",
    "SocialEngineer",
    "Opsec",
    "Purple",
    "Exploiter",
    "PostExploitation",
    "Infrastructure",
    "Cloud",
    "Reporter",
];

/// Construct the agent for a configured role profile
///
/// Returns `None` for unknown role names; the orchestrator skips those
/// entries rather than failing the run.
#[must_use]
pub fn build_agent(profile: RoleProfile) -> Option<Box<dyn RoleAgent>> {
    let agent: Box<dyn RoleAgent> = match profile.name.as_str() {
        "Manager" => Box::new(ManagerAgent::new(profile)),
        "Commander" => Box::new(CommanderAgent::new(profile)),
        "Reconnaissance" => Box::new(ReconnaissanceAgent::new(profile)),
        "SocialEngineer" => Box::new(SocialEngineerAgent::new(profile)),
        "Opsec" => Box::new(OpsecAgent::new(profile)),
        "Purple" => Box::new(PurpleAgent::new(profile)),
        "Exploiter" => Box::new(ExploiterAgent::new(profile)),
        "PostExploitation" => Box::new(PostExploitationAgent::new(profile)),
        "Infrastructure" => Box::new(InfrastructureAgent::new(profile)),
        "Cloud" => Box::new(CloudAgent::new(profile)),
        "Reporter" => Box::new(ReporterAgent::new(profile)),
        _ => return None,
    };
    Some(agent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use redplan_plan::Layer;

    #[test]
    fn every_fixed_role_resolves() {
        for name in ROLE_NAMES {
            let profile = RoleProfile::new(name, Layer::Tactical, 0.1);
            let agent = build_agent(profile);
            assert!(agent.is_some(), "role {name} should resolve");
            assert_eq!(agent.unwrap().profile().name, name);
        }
    }

    #[test]
    fn unknown_role_is_skipped() {
        let profile = RoleProfile::new("Quartermaster", Layer::Tactical, 0.1);
        assert!(build_agent(profile).is_none());
    }
}
