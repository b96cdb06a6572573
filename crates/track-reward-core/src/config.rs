//! Reward strategy selection and per-variant tuning

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, RewardError};

/// Top-level evaluator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct RewardConfig {
    /// Active heuristic and its constants
    #[serde(default)]
    pub strategy: RewardStrategy,
}

impl RewardConfig {
    /// Default configuration for one variant
    pub fn for_variant(variant: RewardVariant) -> Self {
        Self {
            strategy: RewardStrategy::default_for(variant),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RewardError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    /// Parse configuration from a JSON string
    ///
    /// Unknown keys are rejected, and so are band tables whose thresholds
    /// and rewards differ in length.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RewardError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every band table pairs each threshold with a reward
    pub fn validate(&self) -> Result<()> {
        match &self.strategy {
            RewardStrategy::AdditiveMarkers(cfg) => {
                check_table("markers", &cfg.markers, "marker_rewards", &cfg.marker_rewards)
            }
            RewardStrategy::BandedPenalty(cfg) => {
                check_table("bands", &cfg.bands, "band_rewards", &cfg.band_rewards)
            }
            RewardStrategy::StagedGating(_) => Ok(()),
        }
    }

    pub fn variant(&self) -> RewardVariant {
        self.strategy.variant()
    }
}

fn check_table(name: &str, thresholds: &[f64], rewards_name: &str, rewards: &[f64]) -> Result<()> {
    if thresholds.len() == rewards.len() {
        Ok(())
    } else {
        Err(RewardError::Config(format!(
            "{} has {} entries but {} has {}",
            name,
            thresholds.len(),
            rewards_name,
            rewards.len()
        )))
    }
}

/// Which heuristic to run, without its constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum RewardVariant {
    AdditiveMarkers,
    BandedPenalty,
    StagedGating,
}

impl RewardVariant {
    pub fn name(&self) -> &'static str {
        match self {
            RewardVariant::AdditiveMarkers => "AdditiveMarkers",
            RewardVariant::BandedPenalty => "BandedPenalty",
            RewardVariant::StagedGating => "StagedGating",
        }
    }
}

impl fmt::Display for RewardVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RewardVariant {
    type Err = RewardError;

    /// Accepts PascalCase (`StagedGating`) or kebab-case (`staged-gating`)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "additivemarkers" => Ok(RewardVariant::AdditiveMarkers),
            "bandedpenalty" => Ok(RewardVariant::BandedPenalty),
            "stagedgating" => Ok(RewardVariant::StagedGating),
            _ => Err(RewardError::Config(format!("Unknown reward variant: {}", s))),
        }
    }
}

/// Heuristic together with its tuning constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Variant")]
pub enum RewardStrategy {
    /// Additive bonuses for centerline markers, heading and progress
    AdditiveMarkers(AdditiveMarkersConfig),
    /// Distance bands scaled by speed, with an off-track penalty
    BandedPenalty(BandedPenaltyConfig),
    /// Checkpoint-style stages, first match returns
    StagedGating(StagedGatingConfig),
}

impl RewardStrategy {
    /// Strategy for `variant` with default constants
    pub fn default_for(variant: RewardVariant) -> Self {
        match variant {
            RewardVariant::AdditiveMarkers => {
                RewardStrategy::AdditiveMarkers(AdditiveMarkersConfig::default())
            }
            RewardVariant::BandedPenalty => {
                RewardStrategy::BandedPenalty(BandedPenaltyConfig::default())
            }
            RewardVariant::StagedGating => {
                RewardStrategy::StagedGating(StagedGatingConfig::default())
            }
        }
    }

    pub fn variant(&self) -> RewardVariant {
        match self {
            RewardStrategy::AdditiveMarkers(_) => RewardVariant::AdditiveMarkers,
            RewardStrategy::BandedPenalty(_) => RewardVariant::BandedPenalty,
            RewardStrategy::StagedGating(_) => RewardVariant::StagedGating,
        }
    }
}

impl Default for RewardStrategy {
    fn default() -> Self {
        RewardStrategy::default_for(RewardVariant::AdditiveMarkers)
    }
}

/// Constants for the additive marker heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdditiveMarkersConfig {
    /// Starting value and off-course result
    pub reward_floor: f64,
    /// Inner band, as a fraction of track width
    pub center_marker: f64,
    pub center_bonus: f64,
    /// Outer bands, as fractions of track width, innermost first
    pub markers: Vec<f64>,
    /// Bonus for each entry in `markers`
    pub marker_rewards: Vec<f64>,
    /// Heading error in degrees
    pub heading_threshold: f64,
    pub heading_bonus: f64,
    /// Exactly-on-threshold bonus inside `progress_window`
    pub aligned_mid_bonus: f64,
    /// Exactly-on-threshold bonus outside `progress_window`
    pub aligned_bonus: f64,
    /// Open interval of progress for `aligned_mid_bonus`
    pub progress_window: (f64, f64),
    /// Progress value that counts as a finished lap
    pub progress_complete: f64,
    pub completion_bonus: f64,
    /// Weight of `progress / steps`
    pub progress_rate_weight: f64,
    /// Absolute steering angle in degrees
    pub steering_threshold: f64,
    pub steering_multiplier: f64,
    /// Return the floor straight away when off course. When false the
    /// off-course check does nothing and scoring continues.
    pub offtrack_floor_gate: bool,
}

impl Default for AdditiveMarkersConfig {
    fn default() -> Self {
        Self {
            reward_floor: 1e-3,
            center_marker: 0.1,
            center_bonus: 1.0,
            markers: vec![0.2, 0.4, 0.6, 0.8],
            marker_rewards: vec![0.8, 0.6, 0.4, 0.2],
            heading_threshold: 10.0,
            heading_bonus: 0.4,
            aligned_mid_bonus: 0.8,
            aligned_bonus: 0.5,
            progress_window: (0.2, 0.8),
            progress_complete: 1.0,
            completion_bonus: 1.0,
            progress_rate_weight: 0.5,
            steering_threshold: 20.0,
            steering_multiplier: 0.8,
            offtrack_floor_gate: true,
        }
    }
}

/// Constants for the banded penalty heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BandedPenaltyConfig {
    pub reward_floor: f64,
    /// Off-course reward is `offtrack_base - offtrack_speed_weight * speed`
    pub offtrack_base: f64,
    pub offtrack_speed_weight: f64,
    /// Distance bands, as fractions of track width, innermost first
    pub bands: Vec<f64>,
    /// Base reward for each entry in `bands`
    pub band_rewards: Vec<f64>,
    /// Speed term added to band and steering rewards
    pub speed_weight: f64,
    /// Absolute steering angle in degrees
    pub steering_threshold: f64,
    pub steering_reward: f64,
}

impl Default for BandedPenaltyConfig {
    fn default() -> Self {
        Self {
            reward_floor: 1e-3,
            offtrack_base: -10.0,
            offtrack_speed_weight: 5.0,
            bands: vec![0.1, 0.25, 0.5],
            band_rewards: vec![1.0, 0.5, 0.1],
            speed_weight: 0.5,
            steering_threshold: 15.0,
            steering_reward: 0.8,
        }
    }
}

/// Constants for the staged gating heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StagedGatingConfig {
    pub reward_floor: f64,
    pub reward_max: f64,
    pub max_speed: f64,
    /// Below this share of `max_speed` the car counts as slow
    pub slow_speed_fraction: f64,
    pub heading_threshold: f64,
    pub heading_share: f64,
    pub smooth_steering_threshold: f64,
    pub smooth_share: f64,
    /// Degrees. The cornering stage compares speed against two thirds of it.
    pub max_steering_angle: f64,
    pub gentle_turn_threshold: f64,
    /// Half-turn used by the turn-angle normalization
    pub turn_wrap: f64,
    pub cornering_share: f64,
    /// Steps between checkpoints, 0 disables the checkpoint stage
    pub checkpoint_interval: u64,
    pub checkpoint_divisor: f64,
    pub checkpoint_share: f64,
    /// Returned when no stage fires
    pub fallthrough_reward: f64,
}

impl Default for StagedGatingConfig {
    fn default() -> Self {
        Self {
            reward_floor: 1e-3,
            reward_max: 9000.0,
            max_speed: 3.0,
            slow_speed_fraction: 0.1,
            heading_threshold: 10.0,
            heading_share: 0.3,
            smooth_steering_threshold: 15.0,
            smooth_share: 0.15,
            max_steering_angle: 30.0,
            gentle_turn_threshold: 10.0,
            turn_wrap: 180.0,
            cornering_share: 0.6,
            checkpoint_interval: 100,
            checkpoint_divisor: 150.0,
            checkpoint_share: 0.4,
            fallthrough_reward: 1e-3,
        }
    }
}
