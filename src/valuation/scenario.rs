//! Per-scenario result mapping

use crate::curve::Scenario;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Scenario name to PV or income sum
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioResult {
    values: BTreeMap<Scenario, f64>,
}

impl ScenarioResult {
    /// All given scenarios set to zero
    pub fn zeros(scenarios: &[Scenario]) -> Self {
        Self {
            values: scenarios.iter().map(|&s| (s, 0.0)).collect(),
        }
    }

    pub fn insert(&mut self, scenario: Scenario, value: f64) {
        self.values.insert(scenario, value);
    }

    /// Value for a scenario; 0.0 when the scenario is not part of this result
    pub fn get(&self, scenario: Scenario) -> f64 {
        self.values.get(&scenario).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, scenario: Scenario) -> bool {
        self.values.contains_key(&scenario)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Scenario, f64)> + '_ {
        self.values.iter().map(|(&s, &v)| (s, v))
    }

    /// Change versus the base scenario
    pub fn delta_vs_base(&self, scenario: Scenario) -> f64 {
        self.get(scenario) - self.get(Scenario::Base)
    }

    /// Scenario with the lowest value, excluding base
    pub fn worst(&self) -> Option<(Scenario, f64)> {
        self.iter()
            .filter(|(s, _)| *s != Scenario::Base)
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl AddAssign<&ScenarioResult> for ScenarioResult {
    fn add_assign(&mut self, other: &ScenarioResult) {
        for (scenario, value) in other.iter() {
            *self.values.entry(scenario).or_insert(0.0) += value;
        }
    }
}

impl FromIterator<(Scenario, f64)> for ScenarioResult {
    fn from_iter<I: IntoIterator<Item = (Scenario, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
