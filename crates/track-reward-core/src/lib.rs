//! # track-reward-core
//!
//! Reward shaping for the track-driving RL simulator.
//!
//! One observation in, one scalar reward out. This crate provides:
//! - The per-step observation record and its boundary checks
//! - Waypoint and bearing helpers
//! - Three reward heuristics behind a configurable strategy
//! - The evaluator and its diagnostic sink

pub mod config;
pub mod error;
pub mod evaluator;
pub mod geometry;
pub mod observation;
pub mod reward;
pub mod telemetry;
pub mod variants;

pub use config::{
    AdditiveMarkersConfig, BandedPenaltyConfig, RewardConfig, RewardStrategy, RewardVariant,
    StagedGatingConfig,
};
pub use error::{Result, RewardError, error_codes};
pub use evaluator::RewardEvaluator;
pub use geometry::Point;
pub use observation::Observation;
pub use reward::{Contribution, Reward, RewardComponentDef, RewardComponents, RewardFunction};
pub use telemetry::{Diagnostic, FallbackReason, MemorySink, NullSink, TelemetrySink, TracingSink};
