//! Reward evaluator: configured heuristic plus diagnostic sink

use std::sync::Arc;

use crate::config::{RewardConfig, RewardVariant};
use crate::error::{Result, RewardError};
use crate::observation::Observation;
use crate::reward::{Reward, RewardComponentDef, RewardFunction};
use crate::telemetry::{TelemetrySink, TracingSink};
use crate::variants;

/// Maps one observation to one scalar reward.
///
/// Holds no per-call state: the same observation always gives the same
/// reward for a given configuration.
pub struct RewardEvaluator {
    config: RewardConfig,
    function: Box<dyn RewardFunction>,
    sink: Arc<dyn TelemetrySink>,
}

impl RewardEvaluator {
    /// Create an evaluator that reports diagnostics through `tracing`
    pub fn new(config: RewardConfig) -> Self {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Create an evaluator with a custom diagnostic sink
    pub fn with_sink(config: RewardConfig, sink: Arc<dyn TelemetrySink>) -> Self {
        let function = variants::build(&config.strategy);
        Self {
            config,
            function,
            sink,
        }
    }

    /// Scalar reward for one step
    pub fn evaluate(&self, observation: &Observation) -> Result<f64> {
        self.evaluate_detailed(observation).map(|reward| reward.value)
    }

    /// Reward with its per-term breakdown
    pub fn evaluate_detailed(&self, observation: &Observation) -> Result<Reward> {
        // Observations built in code skip the parse-time checks.
        if observation.waypoints.is_empty() {
            return Err(RewardError::EmptyWaypoints);
        }
        self.function
            .compute(observation, self.sink.as_ref())?
            .ensure_finite()
    }

    /// Parse a raw observation and evaluate it
    pub fn evaluate_value(&self, value: &serde_json::Value) -> Result<Reward> {
        let observation = Observation::from_value(value)?;
        self.evaluate_detailed(&observation)
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    pub fn variant(&self) -> RewardVariant {
        self.config.variant()
    }

    /// Components the active heuristic reports
    pub fn components(&self) -> Vec<RewardComponentDef> {
        self.function.components()
    }
}

impl Default for RewardEvaluator {
    fn default() -> Self {
        Self::new(RewardConfig::default())
    }
}
