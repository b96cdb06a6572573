//! Reward types and the reward function trait

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Result, RewardError};
use crate::observation::Observation;
use crate::telemetry::TelemetrySink;

/// Scalar reward with optional decomposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    /// Total scalar reward
    pub value: f64,
    /// Decomposed components for analysis
    #[serde(default)]
    pub components: RewardComponents,
}

impl Reward {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            components: RewardComponents::new(),
        }
    }

    /// Attach a named component
    pub fn with_component(mut self, name: &str, value: f64) -> Self {
        self.components.insert(name.to_string(), value);
        self
    }

    /// Reject NaN and infinite totals
    pub fn ensure_finite(self) -> Result<Self> {
        if self.value.is_finite() {
            Ok(self)
        } else {
            Err(RewardError::NonFiniteReward(self.value))
        }
    }
}

/// Decomposed reward components
pub type RewardComponents = HashMap<String, f64>;

/// How a component folds into the scalar total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contribution {
    /// Summed with the other additive terms
    Additive,
    /// Scales the running total
    Multiplier,
    /// Is the total when it fires; at most one exclusive term fires per step
    Exclusive,
    /// Replaces whatever total was computed before it
    Override,
}

/// Component a heuristic may report in [`Reward::components`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardComponentDef {
    pub name: String,
    /// When the component fires and what it rewards
    pub description: String,
    /// Bounds for the current configuration, when they are fixed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    pub contribution: Contribution,
}

impl RewardComponentDef {
    /// Additive component
    pub fn new(name: &str, description: &str, range: Option<[f64; 2]>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            range,
            contribution: Contribution::Additive,
        }
    }

    pub fn contributing(mut self, contribution: Contribution) -> Self {
        self.contribution = contribution;
        self
    }
}

/// Trait for computing rewards from a single observation
pub trait RewardFunction: Send + Sync {
    /// Compute the reward for one step
    fn compute(&self, observation: &Observation, sink: &dyn TelemetrySink) -> Result<Reward>;

    /// List available reward components
    fn components(&self) -> Vec<RewardComponentDef>;
}
