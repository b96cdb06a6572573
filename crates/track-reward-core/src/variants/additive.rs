//! Additive marker scoring
//!
//! Starts from a small floor and stacks bonuses for staying near the
//! centerline, for the heading check, and for progress per step, then damps
//! the total when the car is steering hard.

use crate::config::AdditiveMarkersConfig;
use crate::error::Result;
use crate::observation::Observation;
use crate::reward::{Contribution, Reward, RewardComponentDef, RewardFunction};
use crate::telemetry::{Diagnostic, FallbackReason, TelemetrySink};

pub struct AdditiveMarkers {
    config: AdditiveMarkersConfig,
}

impl AdditiveMarkers {
    pub fn new(config: AdditiveMarkersConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdditiveMarkersConfig {
        &self.config
    }

    /// Centerline bonus: the inner marker stacks with the first outer band
    /// that contains the car. Bands past the first match are not counted.
    pub fn distance_bonus(&self, distance_from_center: f64, track_width: f64) -> f64 {
        let cfg = &self.config;
        let mut bonus = 0.0;

        if (0.0..=cfg.center_marker * track_width).contains(&distance_from_center) {
            bonus += cfg.center_bonus;
        }
        for (marker, marker_reward) in cfg.markers.iter().zip(&cfg.marker_rewards) {
            if distance_from_center <= marker * track_width {
                bonus += marker_reward;
                break;
            }
        }
        bonus
    }

    /// Bonus for the heading check.
    ///
    /// Pays out when the error is *above* the threshold. The exact-equality
    /// branch is practically unreachable with float inputs and is kept
    /// unchanged since the shaping was tuned with it in place.
    #[allow(clippy::float_cmp)]
    pub fn heading_bonus(&self, heading_error: f64, progress: f64) -> f64 {
        let cfg = &self.config;
        let (low, high) = cfg.progress_window;

        if heading_error > cfg.heading_threshold {
            cfg.heading_bonus
        } else if heading_error == cfg.heading_threshold {
            if progress > low && progress < high {
                cfg.aligned_mid_bonus
            } else {
                cfg.aligned_bonus
            }
        } else {
            0.0
        }
    }
}

impl RewardFunction for AdditiveMarkers {
    fn compute(&self, obs: &Observation, sink: &dyn TelemetrySink) -> Result<Reward> {
        let cfg = &self.config;
        let mut reward = cfg.reward_floor;

        // With the gate off, off-course steps are scored like any other.
        if obs.is_off_course() && cfg.offtrack_floor_gate {
            return Ok(Reward::new(cfg.reward_floor));
        }

        let distance = self.distance_bonus(obs.distance_from_center, obs.track_width);
        reward += distance;

        let heading = self.heading_bonus(obs.heading_error(), obs.progress);
        reward += heading;

        let progress = if obs.progress >= cfg.progress_complete {
            cfg.completion_bonus
        } else {
            if obs.steps == 0 {
                sink.record(Diagnostic::Fallback {
                    reason: FallbackReason::ZeroSteps,
                });
                return Ok(Reward::new(cfg.reward_floor));
            }
            let ratio = obs.progress / obs.steps as f64;
            sink.record(Diagnostic::ProgressRatio { ratio });
            cfg.progress_rate_weight * ratio
        };
        reward += progress;

        let multiplier = if obs.steering_angle.abs() > cfg.steering_threshold {
            cfg.steering_multiplier
        } else {
            1.0
        };
        reward *= multiplier;

        Ok(Reward::new(reward)
            .with_component("distance", distance)
            .with_component("heading", heading)
            .with_component("progress", progress)
            .with_component("steering_multiplier", multiplier))
    }

    fn components(&self) -> Vec<RewardComponentDef> {
        let cfg = &self.config;
        let max_marker = cfg.marker_rewards.iter().cloned().fold(0.0, f64::max);
        vec![
            RewardComponentDef::new(
                "distance",
                "Bonus for staying within the centerline marker bands",
                Some([0.0, cfg.center_bonus + max_marker]),
            ),
            RewardComponentDef::new(
                "heading",
                "Bonus from comparing heading against the track direction",
                None,
            ),
            RewardComponentDef::new(
                "progress",
                "Lap completion bonus, or weighted progress per step",
                None,
            ),
            RewardComponentDef::new(
                "steering_multiplier",
                "Damping applied to the total when steering hard",
                Some([cfg.steering_multiplier.min(1.0), cfg.steering_multiplier.max(1.0)]),
            )
            .contributing(Contribution::Multiplier),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::tests::sample;
    use crate::telemetry::{MemorySink, NullSink};

    fn scorer() -> AdditiveMarkers {
        AdditiveMarkers::new(AdditiveMarkersConfig::default())
    }

    #[test]
    fn test_band_values() {
        let s = scorer();
        let width = 1.0;
        let expect = [
            (0.05, 1.8),
            (0.15, 0.8),
            (0.3, 0.6),
            (0.5, 0.4),
            (0.7, 0.2),
            (0.9, 0.0),
        ];
        for (distance, bonus) in expect {
            let got = s.distance_bonus(distance, width);
            assert!(
                (got - bonus).abs() < 1e-12,
                "distance {} gave {}, expected {}",
                distance,
                got,
                bonus
            );
        }
    }

    #[test]
    fn test_band_bonus_never_increases_with_distance() {
        let s = scorer();
        let width = 0.6;
        let mut last = f64::INFINITY;
        for step in 0..=100 {
            let distance = step as f64 * 0.006;
            let bonus = s.distance_bonus(distance, width);
            assert!(bonus <= last, "bonus rose at distance {}", distance);
            last = bonus;
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn test_heading_bonus_branches() {
        let s = scorer();
        assert_eq!(s.heading_bonus(45.0, 0.5), 0.4);
        assert_eq!(s.heading_bonus(3.0, 0.5), 0.0);
        assert_eq!(s.heading_bonus(10.0, 0.5), 0.8);
        assert_eq!(s.heading_bonus(10.0, 0.9), 0.5);
        assert_eq!(s.heading_bonus(10.0, 0.2), 0.5);
    }

    #[test]
    fn test_sample_step() {
        let obs = sample();
        let sink = MemorySink::new();
        let reward = scorer().compute(&obs, &sink).unwrap();

        // Centered (1.0 + 0.8), aligned (0.0), progress 0/1 (0.0), steering 6.
        assert!((reward.value - (1e-3 + 1.8)).abs() < 1e-12);
        assert_eq!(reward.components["steering_multiplier"], 1.0);
        assert_eq!(sink.drain(), vec![Diagnostic::ProgressRatio { ratio: 0.0 }]);
    }

    #[test]
    fn test_progress_rate() {
        let mut obs = sample();
        obs.progress = 0.5;
        obs.steps = 10;
        let reward = scorer().compute(&obs, &NullSink).unwrap();
        assert!((reward.components["progress"] - 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_lap_complete_bonus() {
        let mut obs = sample();
        obs.progress = 1.0;
        obs.steps = 0;
        let sink = MemorySink::new();
        let reward = scorer().compute(&obs, &sink).unwrap();
        assert_eq!(reward.components["progress"], 1.0);
        assert!(sink.drain().is_empty());
    }

    #[test]
    fn test_zero_steps_falls_back_to_floor() {
        let mut obs = sample();
        obs.steps = 0;
        obs.progress = 0.4;
        let sink = MemorySink::new();
        let reward = scorer().compute(&obs, &sink).unwrap();

        assert_eq!(reward.value, 1e-3);
        assert_eq!(
            sink.drain(),
            vec![Diagnostic::Fallback {
                reason: FallbackReason::ZeroSteps
            }]
        );
    }

    #[test]
    fn test_steering_multiplier_scales_total() {
        let mut obs = sample();
        obs.progress = 0.3;
        obs.steps = 7;
        obs.heading = 30.0;
        obs.distance_from_center = 0.05;

        obs.steering_angle = 0.0;
        let straight = scorer().compute(&obs, &NullSink).unwrap().value;

        obs.steering_angle = -25.0;
        let hard = scorer().compute(&obs, &NullSink).unwrap().value;
        assert_eq!(hard, straight * 0.8);

        // On the threshold itself there is no damping
        obs.steering_angle = 20.0;
        let edge = scorer().compute(&obs, &NullSink).unwrap().value;
        assert_eq!(edge, straight);
    }

    #[test]
    fn test_off_course_returns_floor() {
        let mut obs = sample();
        obs.all_wheels_on_track = false;
        obs.is_reversed = false;
        let reward = scorer().compute(&obs, &NullSink).unwrap();
        assert_eq!(reward.value, 1e-3);
    }

    #[test]
    fn test_off_course_without_gate_keeps_scoring() {
        let mut obs = sample();
        obs.all_wheels_on_track = false;
        obs.is_reversed = false;
        let config = AdditiveMarkersConfig {
            offtrack_floor_gate: false,
            ..Default::default()
        };
        let reward = AdditiveMarkers::new(config).compute(&obs, &NullSink).unwrap();
        assert!((reward.value - (1e-3 + 1.8)).abs() < 1e-12);
    }

    #[test]
    fn test_reversed_off_track_is_not_gated() {
        let mut obs = sample();
        obs.all_wheels_on_track = false;
        obs.is_reversed = true;
        let reward = scorer().compute(&obs, &NullSink).unwrap();
        assert!(reward.value > 1e-3);
    }
}
