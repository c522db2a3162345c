//! Plan steps, ordered plans, and the evolving fact state

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Effect prefix that removes a fact instead of adding it
pub const NEGATION_PREFIX: &str = "not ";

/// A set of atomic named propositions about world state
pub type FactSet = BTreeSet<String>;

/// Whether an effect removes its fact
#[inline]
#[must_use]
pub fn is_negated(effect: &str) -> bool {
    effect.starts_with(NEGATION_PREFIX)
}

/// The fact an effect refers to, with any negation prefix removed
#[inline]
#[must_use]
pub fn strip_negation(effect: &str) -> &str {
    effect.strip_prefix(NEGATION_PREFIX).unwrap_or(effect)
}

/// Abstraction layer a role plans at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Mission framing and campaign shaping
    Strategic,
    /// Preparation, access vectors, operational security
    Tactical,
    /// Exploitation, persistence, reporting
    Technical,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Layer::Strategic => "strategic",
            Layer::Tactical => "tactical",
            Layer::Technical => "technical",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strategic" => Ok(Layer::Strategic),
            "tactical" => Ok(Layer::Tactical),
            "technical" => Ok(Layer::Technical),
            other => Err(format!("unknown layer: {other}")),
        }
    }
}

/// One step of a plan
///
/// Created by a role agent or the repairer; owned by the [`Plan`] once
/// appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Action identifier, unique within the owning domain
    pub action_id: String,
    /// Human-readable description
    pub description: String,
    /// Originating role name
    pub role: String,
    /// Originating abstraction layer
    pub layer: Layer,
    /// Facts that must hold before the step
    pub preconditions: FactSet,
    /// Facts established (or, with a `"not "` prefix, removed) by the step
    pub effects: FactSet,
    /// Nonnegative operational cost
    pub cost: f64,
    /// Risk probability in [0, 1]
    pub risk: f64,
}

impl PlanStep {
    /// Create a step with default cost 1.0 and risk 0.05
    #[must_use]
    pub fn new(
        action_id: impl Into<String>,
        description: impl Into<String>,
        role: impl Into<String>,
        layer: Layer,
    ) -> Self {
        Self {
            action_id: action_id.into(),
            description: description.into(),
            role: role.into(),
            layer,
            preconditions: FactSet::new(),
            effects: FactSet::new(),
            cost: 1.0,
            risk: 0.05,
        }
    }

    /// With preconditions
    #[must_use]
    pub fn with_preconditions<I, S>(mut self, facts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preconditions = facts.into_iter().map(Into::into).collect();
        self
    }

    /// With effects
    #[must_use]
    pub fn with_effects<I, S>(mut self, effects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.effects = effects.into_iter().map(Into::into).collect();
        self
    }

    /// With cost
    #[inline]
    #[must_use]
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// With risk
    #[inline]
    #[must_use]
    pub fn with_risk(mut self, risk: f64) -> Self {
        self.risk = risk;
        self
    }

    /// Facts this step establishes
    pub fn add_effects(&self) -> impl Iterator<Item = &str> {
        self.effects
            .iter()
            .filter(|effect| !is_negated(effect))
            .map(String::as_str)
    }

    /// Facts this step removes
    pub fn del_effects(&self) -> impl Iterator<Item = &str> {
        self.effects
            .iter()
            .filter(|effect| is_negated(effect))
            .map(|effect| strip_negation(effect))
    }
}

/// An ordered sequence of plan steps
///
/// Mutated only by the orchestrator (append during synthesis) and the
/// repairer (positional insert).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    steps: Vec<PlanStep>,
}

impl Plan {
    /// Create an empty plan
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step at the end
    #[inline]
    pub fn append(&mut self, step: PlanStep) {
        self.steps.push(step);
    }

    /// Insert a step before position `index`
    ///
    /// # Panics
    /// Panics when `index > len`, matching `Vec::insert`.
    #[inline]
    pub fn insert(&mut self, index: usize, step: PlanStep) {
        self.steps.insert(index, step);
    }

    /// Steps in plan order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Iterate steps in plan order
    pub fn iter(&self) -> impl Iterator<Item = &PlanStep> {
        self.steps.iter()
    }

    /// Number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sum of step costs
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.steps.iter().map(|step| step.cost).sum()
    }

    /// Sum of step risks
    #[must_use]
    pub fn total_risk(&self) -> f64 {
        self.steps.iter().map(|step| step.risk).sum()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a PlanStep;
    type IntoIter = std::slice::Iter<'a, PlanStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// The set of currently-true facts during one validation pass
///
/// One owned instance per pass; never aliased between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanState {
    facts: FactSet,
}

impl PlanState {
    /// Start from an initial fact set
    #[inline]
    #[must_use]
    pub fn new(facts: FactSet) -> Self {
        Self { facts }
    }

    /// Whether a fact currently holds
    #[inline]
    #[must_use]
    pub fn contains(&self, fact: &str) -> bool {
        self.facts.contains(fact)
    }

    /// Establish a fact
    #[inline]
    pub fn insert(&mut self, fact: impl Into<String>) {
        self.facts.insert(fact.into());
    }

    /// Remove a fact
    #[inline]
    pub fn remove(&mut self, fact: &str) {
        self.facts.remove(fact);
    }

    /// Apply effects: non-negated effects add facts, negated ones remove them
    pub fn apply<'a>(&mut self, effects: impl IntoIterator<Item = &'a String>) {
        for effect in effects {
            if is_negated(effect) {
                self.facts.remove(strip_negation(effect));
            } else {
                self.facts.insert(effect.clone());
            }
        }
    }

    /// Whether every goal fact currently holds
    #[must_use]
    pub fn satisfies(&self, goals: &FactSet) -> bool {
        goals.iter().all(|goal| self.facts.contains(goal))
    }

    /// The current fact set
    #[inline]
    #[must_use]
    pub fn facts(&self) -> &FactSet {
        &self.facts
    }

    /// Consume the state, yielding the final fact set
    #[inline]
    #[must_use]
    pub fn into_facts(self) -> FactSet {
        self.facts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts<const N: usize>(names: [&str; N]) -> FactSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn step_builder_defaults() {
        let step = PlanStep::new("probe", "probe the perimeter", "Reconnaissance", Layer::Tactical);
        assert_eq!(step.cost, 1.0);
        assert_eq!(step.risk, 0.05);
        assert!(step.preconditions.is_empty());
    }

    #[test]
    fn step_effect_split() {
        let step = PlanStep::new("cleanup", "remove traces", "Opsec", Layer::Tactical)
            .with_effects(["traces_removed", "not foothold_visible"]);
        assert_eq!(step.add_effects().collect::<Vec<_>>(), vec!["traces_removed"]);
        assert_eq!(step.del_effects().collect::<Vec<_>>(), vec!["foothold_visible"]);
    }

    #[test]
    fn state_apply_handles_negation() {
        let mut state = PlanState::new(facts(["foothold_visible"]));
        state.apply(&facts(["traces_removed", "not foothold_visible"]));
        assert!(state.contains("traces_removed"));
        assert!(!state.contains("foothold_visible"));
    }

    #[test]
    fn state_satisfies_goal_subset() {
        let state = PlanState::new(facts(["a", "b", "c"]));
        assert!(state.satisfies(&facts(["a", "c"])));
        assert!(!state.satisfies(&facts(["a", "d"])));
        assert!(state.satisfies(&FactSet::new()));
    }

    #[test]
    fn plan_append_and_insert_preserve_order() {
        let mut plan = Plan::new();
        plan.append(PlanStep::new("first", "", "Manager", Layer::Strategic));
        plan.append(PlanStep::new("third", "", "Reporter", Layer::Technical));
        plan.insert(1, PlanStep::new("second", "", "Opsec", Layer::Tactical));

        let ids: Vec<&str> = plan.iter().map(|s| s.action_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn plan_totals() {
        let mut plan = Plan::new();
        plan.append(
            PlanStep::new("a", "", "Manager", Layer::Strategic)
                .with_cost(1.5)
                .with_risk(0.01),
        );
        plan.append(
            PlanStep::new("b", "", "Exploiter", Layer::Technical)
                .with_cost(1.8)
                .with_risk(0.08),
        );
        assert!((plan.total_cost() - 3.3).abs() < 1e-9);
        assert!((plan.total_risk() - 0.09).abs() < 1e-9);
    }

    #[test]
    fn layer_round_trip() {
        for layer in [Layer::Strategic, Layer::Tactical, Layer::Technical] {
            assert_eq!(layer.to_string().parse::<Layer>().unwrap(), layer);
        }
        assert!("orbital".parse::<Layer>().is_err());
    }

    #[test]
    fn step_serde_round_trip() {
        let step = PlanStep::new("probe", "probe the perimeter", "Reconnaissance", Layer::Tactical)
            .with_preconditions(["campaign_sequence_prepared"])
            .with_effects(["reconnaissance_intelligence_collected"])
            .with_risk(0.04);

        let text = serde_json::to_string(&step).unwrap();
        assert!(text.contains("\"layer\":\"tactical\""));
        let parsed: PlanStep = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, step);
    }
}
