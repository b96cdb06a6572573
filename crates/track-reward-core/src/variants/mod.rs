//! The three reward heuristics

pub mod additive;
pub mod banded;
pub mod staged;

pub use additive::AdditiveMarkers;
pub use banded::BandedPenalty;
pub use staged::StagedGating;

use crate::config::RewardStrategy;
use crate::reward::RewardFunction;

/// Build the reward function for a strategy
pub fn build(strategy: &RewardStrategy) -> Box<dyn RewardFunction> {
    match strategy {
        RewardStrategy::AdditiveMarkers(config) => Box::new(AdditiveMarkers::new(config.clone())),
        RewardStrategy::BandedPenalty(config) => Box::new(BandedPenalty::new(config.clone())),
        RewardStrategy::StagedGating(config) => Box::new(StagedGating::new(config.clone())),
    }
}
