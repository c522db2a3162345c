//! Scenario input consumed by role agents and the orchestrator

use serde::{Deserialize, Serialize};

/// A target scenario for one planning run
///
/// Every field is optional. Fallbacks: mission defaults to an unnamed
/// assessment, the target asset to a generic critical system, and the report
/// focus to impact and mitigations; empty lists simply contribute nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Mission tasking text
    #[serde(default)]
    pub mission: Option<String>,
    /// Primary asset the campaign centers on
    #[serde(default)]
    pub target_asset: Option<String>,
    /// Operational constraints (rules of engagement, windows, ...)
    #[serde(default)]
    pub constraints: Vec<String>,
    /// Known threat context folded into retrieval
    #[serde(default)]
    pub threats: Vec<String>,
    /// Emphasis of the final report
    #[serde(default)]
    pub report_focus: Option<String>,
    /// Extra facts true before the first step
    #[serde(default)]
    pub initial_facts: Vec<String>,
    /// Goal facts; an empty list falls back to the default goal
    #[serde(default)]
    pub goal_facts: Vec<String>,
}

impl Scenario {
    /// Mission text, or the documented fallback
    #[must_use]
    pub fn mission_or_default(&self) -> &str {
        self.mission.as_deref().unwrap_or("Unnamed assessment")
    }

    /// Target asset, or the documented fallback
    #[must_use]
    pub fn target_asset_or_default(&self) -> &str {
        self.target_asset.as_deref().unwrap_or("critical system")
    }

    /// Report focus, or the documented fallback
    #[must_use]
    pub fn report_focus_or_default(&self) -> &str {
        self.report_focus
            .as_deref()
            .unwrap_or("impact and mitigations")
    }

    /// Single query string for knowledge retrieval
    ///
    /// Mission, target asset, threats, and constraints joined by spaces;
    /// empty when no field is set.
    #[must_use]
    pub fn retrieval_query(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(mission) = self.mission.as_deref() {
            parts.push(mission);
        }
        if let Some(asset) = self.target_asset.as_deref() {
            parts.push(asset);
        }
        parts.extend(self.threats.iter().map(String::as_str));
        parts.extend(self.constraints.iter().map(String::as_str));
        parts.join(" ").trim().to_string()
    }
}
