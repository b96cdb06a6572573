//! Diagnostic channel for reward evaluation
//!
//! Evaluation is otherwise pure; the few human-readable diagnostics it emits
//! go through a [`TelemetrySink`] so the harness decides where they end up.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Why a variant fell back to a fixed reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// `steps` was zero so the progress rate is undefined
    ZeroSteps,
    /// No stage of the staged heuristic fired
    FallThrough,
}

/// One diagnostic emitted during evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    /// `progress / steps` for this step
    ProgressRatio { ratio: f64 },
    /// A checkpoint or lap target was hit
    TargetReached { stage: String },
    /// A fixed fallback reward was used
    Fallback { reason: FallbackReason },
}

/// Receiver for evaluation diagnostics
pub trait TelemetrySink: Send + Sync {
    fn record(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn record(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::ProgressRatio { ratio } => {
                debug!(target: "track_reward::telemetry", ratio, "progress ratio");
            }
            Diagnostic::TargetReached { stage } => {
                info!(target: "track_reward::telemetry", %stage, "reached target");
            }
            Diagnostic::Fallback { reason } => {
                warn!(target: "track_reward::telemetry", ?reason, "using fallback reward");
            }
        }
    }
}

/// Drops every diagnostic
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn record(&self, _diagnostic: Diagnostic) {}
}

/// Keeps diagnostics in memory for inspection
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything recorded so far
    pub fn drain(&self) -> Vec<Diagnostic> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl TelemetrySink for MemorySink {
    fn record(&self, diagnostic: Diagnostic) {
        match self.events.lock() {
            Ok(mut events) => events.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
