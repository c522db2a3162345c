//! # Redplan Agents
//!
//! Role-specialized plan synthesis:
//! - **Scenario** - the planning input with documented fallbacks for every field
//! - **RoleAgent** - the capability "produce plan steps given scenario + retrieved context"
//! - **Eleven fixed roles** - Manager through Reporter, emitting a dependency
//!   chain of facts the validator checks
//! - **Registry** - maps configured role names to concrete agents
//!
//! Agents are pure: they return steps and never mutate shared state.

mod agent;
mod registry;
mod roles;
mod scenario;

pub use agent::{AgentContext, RoleAgent, RoleProfile};
pub use registry::{build_agent, ROLE_NAMES};
pub use roles::{
    CloudAgent, CommanderAgent, ExploiterAgent, InfrastructureAgent, ManagerAgent, OpsecAgent,
    PostExploitationAgent, PurpleAgent, ReconnaissanceAgent, ReporterAgent, SocialEngineerAgent,
};
pub use scenario::Scenario;
