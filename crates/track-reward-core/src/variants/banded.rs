//! Banded distance scoring with an off-track penalty

use crate::config::BandedPenaltyConfig;
use crate::error::Result;
use crate::observation::Observation;
use crate::reward::{Contribution, Reward, RewardComponentDef, RewardFunction};
use crate::telemetry::TelemetrySink;

pub struct BandedPenalty {
    config: BandedPenaltyConfig,
}

impl BandedPenalty {
    pub fn new(config: BandedPenaltyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BandedPenaltyConfig {
        &self.config
    }

    /// Base reward of the innermost band containing the car
    fn band_reward(&self, distance_from_center: f64, track_width: f64) -> Option<f64> {
        self.config
            .bands
            .iter()
            .zip(&self.config.band_rewards)
            .find(|(band, _)| distance_from_center <= *band * track_width)
            .map(|(_, reward)| *reward)
    }
}

impl RewardFunction for BandedPenalty {
    fn compute(&self, obs: &Observation, _sink: &dyn TelemetrySink) -> Result<Reward> {
        let cfg = &self.config;
        let speed_term = cfg.speed_weight * obs.speed;
        let mut components = Vec::new();

        let mut reward = cfg.reward_floor;
        if obs.is_off_course() {
            reward = cfg.offtrack_base - cfg.offtrack_speed_weight * obs.speed;
            components.push(("offtrack_penalty", reward));
        } else if let Some(base) = self.band_reward(obs.distance_from_center, obs.track_width) {
            reward = base + speed_term;
            components.push(("band", reward));
        }

        // Hard steering replaces whatever the branches above produced,
        // including the off-track penalty.
        if obs.steering_angle.abs() > cfg.steering_threshold {
            reward = cfg.steering_reward + speed_term;
            components.push(("steering_override", reward));
        }

        Ok(components
            .into_iter()
            .fold(Reward::new(reward), |acc, (name, value)| {
                acc.with_component(name, value)
            }))
    }

    fn components(&self) -> Vec<RewardComponentDef> {
        vec![
            RewardComponentDef::new(
                "offtrack_penalty",
                "Negative reward for leaving the track, larger at speed",
                None,
            )
            .contributing(Contribution::Exclusive),
            RewardComponentDef::new(
                "band",
                "Distance band base reward plus a speed term",
                None,
            )
            .contributing(Contribution::Exclusive),
            RewardComponentDef::new(
                "steering_override",
                "Flat reward plus speed term used whenever steering is hard",
                None,
            )
            .contributing(Contribution::Override),
        ]
    }
}
