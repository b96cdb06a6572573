//! Per-step observation from the driving simulator

use serde::{Deserialize, Serialize};

use crate::error::{Result, RewardError};
use crate::geometry::{self, Point};

/// Fields the simulator must send on every step
pub const REQUIRED_FIELDS: &[&str] = &[
    "all_wheels_on_track",
    "x",
    "y",
    "distance_from_center",
    "is_left_of_center",
    "is_reversed",
    "is_crashed",
    "is_offtrack",
    "heading",
    "progress",
    "steps",
    "speed",
    "steering_angle",
    "track_width",
    "track_length",
    "waypoints",
    "closest_waypoints",
    "closest_objects",
    "objects_location",
    "objects_left_of_center",
    "object_in_camera",
    "objects_speed",
    "objects_heading",
    "objects_distance",
];

/// Snapshot of the simulation for a single timestep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// All four wheels are on the track surface
    pub all_wheels_on_track: bool,
    /// Vehicle position
    pub x: f64,
    pub y: f64,
    /// Lateral offset from the centerline
    pub distance_from_center: f64,
    pub is_left_of_center: bool,
    /// Driving the track clockwise
    pub is_reversed: bool,
    pub is_crashed: bool,
    pub is_offtrack: bool,
    /// Vehicle orientation in degrees
    pub heading: f64,
    /// Share of the lap completed
    pub progress: f64,
    /// Steps taken this episode
    pub steps: u64,
    pub speed: f64,
    /// Steering angle in degrees, negative is right
    pub steering_angle: f64,
    pub track_width: f64,
    pub track_length: f64,
    /// Centerline points forming a closed loop
    pub waypoints: Vec<Point>,
    /// (previous, next) waypoint indices around the vehicle
    pub closest_waypoints: [i64; 2],

    // Nearby obstacles, as parallel sequences
    pub closest_objects: Vec<i64>,
    pub objects_location: Vec<Point>,
    pub objects_left_of_center: Vec<bool>,
    pub object_in_camera: bool,
    pub objects_speed: Vec<f64>,
    pub objects_heading: Vec<f64>,
    pub objects_distance: Vec<f64>,
}

impl Observation {
    /// Parse an observation at the call boundary.
    ///
    /// Every field in [`REQUIRED_FIELDS`] must be present. Extra fields are
    /// ignored.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| RewardError::InvalidField {
            field: "<root>".to_string(),
            reason: "observation must be a JSON object".to_string(),
        })?;

        if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !object.contains_key(**f)) {
            return Err(RewardError::MissingField(missing.to_string()));
        }

        for field in REQUIRED_FIELDS {
            check_field(field, &object[*field])?;
        }

        let observation: Observation = serde_json::from_value(value.clone())?;
        if observation.waypoints.is_empty() {
            return Err(RewardError::EmptyWaypoints);
        }
        Ok(observation)
    }

    /// Parse an observation from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Waypoint at `index`, wrapping around the loop
    pub fn waypoint_at(&self, index: i64) -> Point {
        geometry::waypoint_at(&self.waypoints, index)
    }

    /// Index of the waypoint behind the vehicle
    pub fn prev_index(&self) -> i64 {
        self.closest_waypoints[0]
    }

    /// Index of the waypoint ahead of the vehicle
    pub fn next_index(&self) -> i64 {
        self.closest_waypoints[1]
    }

    pub fn prev_waypoint(&self) -> Point {
        self.waypoint_at(self.prev_index())
    }

    pub fn next_waypoint(&self) -> Point {
        self.waypoint_at(self.next_index())
    }

    /// Bearing of the track at the vehicle's position, in degrees
    pub fn track_direction(&self) -> f64 {
        geometry::track_direction(&self.waypoints, self.prev_index(), self.next_index())
    }

    /// Unwrapped difference between track direction and heading
    pub fn heading_error(&self) -> f64 {
        geometry::heading_error(self.track_direction(), self.heading)
    }

    /// Off the track and not deliberately driving it in reverse
    pub fn is_off_course(&self) -> bool {
        !(self.all_wheels_on_track || self.is_reversed)
    }
}

/// Shape check for one field, so type errors name the field instead of
/// surfacing as a generic deserialization message.
fn check_field(field: &str, value: &serde_json::Value) -> Result<()> {
    let expected = match field {
        "all_wheels_on_track" | "is_left_of_center" | "is_reversed" | "is_crashed"
        | "is_offtrack" | "object_in_camera" => {
            if value.is_boolean() {
                return Ok(());
            }
            "a boolean"
        }
        "steps" => {
            if value.is_u64() {
                return Ok(());
            }
            "a non-negative integer"
        }
        "waypoints" | "objects_location" => {
            if value
                .as_array()
                .is_some_and(|points| points.iter().all(is_point))
            {
                return Ok(());
            }
            "a list of [x, y] pairs"
        }
        "closest_waypoints" => {
            if value
                .as_array()
                .is_some_and(|pair| pair.len() == 2 && pair.iter().all(|i| i.is_i64()))
            {
                return Ok(());
            }
            "a pair of integer indices"
        }
        "closest_objects" => {
            if value
                .as_array()
                .is_some_and(|items| items.iter().all(|i| i.is_i64()))
            {
                return Ok(());
            }
            "a list of integer indices"
        }
        "objects_left_of_center" => {
            if value
                .as_array()
                .is_some_and(|items| items.iter().all(|b| b.is_boolean()))
            {
                return Ok(());
            }
            "a list of booleans"
        }
        "objects_speed" | "objects_heading" | "objects_distance" => {
            if value
                .as_array()
                .is_some_and(|items| items.iter().all(|n| n.is_number()))
            {
                return Ok(());
            }
            "a list of numbers"
        }
        _ => {
            if value.is_number() {
                return Ok(());
            }
            "a number"
        }
    };

    Err(RewardError::InvalidField {
        field: field.to_string(),
        reason: format!("expected {}, got {}", expected, value),
    })
}

fn is_point(value: &serde_json::Value) -> bool {
    value
        .as_array()
        .is_some_and(|xy| xy.len() == 2 && xy.iter().all(|c| c.is_number()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Observation from a real simulator step on the oval training track
    pub(crate) fn sample_value() -> serde_json::Value {
        json!({
            "all_wheels_on_track": true,
            "x": 2.5,
            "y": 0.75,
            "distance_from_center": 0.0,
            "heading": 0.0,
            "progress": 0.0,
            "steps": 1,
            "speed": 0.5,
            "steering_angle": 6.0,
            "track_width": 0.2,
            "waypoints": [
                [2.5, 0.75], [3.33, 0.75], [4.17, 0.75], [5.0, 0.75], [5.83, 0.75],
                [6.67, 0.75], [7.5, 0.75], [8.33, 0.75], [9.17, 0.75], [9.75, 0.94],
                [10.0, 1.5], [10.0, 1.875], [9.92, 2.125], [9.58, 2.375], [9.17, 2.75],
                [8.33, 2.5], [7.5, 2.5], [7.08, 2.56], [6.67, 2.625], [5.83, 3.44],
                [5.0, 4.375], [4.67, 4.69], [4.33, 4.875], [4.0, 5.0], [3.33, 5.0],
                [2.5, 4.95], [2.08, 4.94], [1.67, 4.875], [1.33, 4.69], [0.92, 4.06],
                [1.17, 3.185], [1.5, 1.94], [1.6, 1.5], [1.83, 1.125], [2.17, 0.885]
            ],
            "closest_waypoints": [0, 1],
            "is_left_of_center": true,
            "is_reversed": true,
            "track_length": 16.635021275568313,
            "closest_objects": [0, 1],
            "objects_location": [
                [4.511289152034186, 1.3292364463761641],
                [6.537302737755836, 1.4140104486149618],
                [4.752976532490525, 3.1350845729056838],
                [3.103370840828792, 4.133062703357412],
                [0.7094212601659824, 4.217507179944688],
                [1.5996645329306798, 1.7124666440529925]
            ],
            "objects_left_of_center": [true, true, false, true, false, true],
            "object_in_camera": true,
            "objects_speed": [0.2, 0.2, 0.2, 0.2, 0.2, 0.2],
            "objects_heading": [
                2.717322296283114, 2.368920328229894, -1.9305073380382327,
                -1.3586571052564007, 0.00025041038280975884, 0.5573269195381345
            ],
            "objects_distance": [
                1.9501724549506574, 4.139700164331426, 7.997164727523002,
                10.024219705986598, 12.56561517097048, 15.090712948383509
            ],
            "is_crashed": false,
            "is_offtrack": true
        })
    }

    pub(crate) fn sample() -> Observation {
        Observation::from_value(&sample_value()).unwrap()
    }

    #[test]
    fn test_parse_sample_observation() {
        let obs = sample();
        assert_eq!(obs.waypoints.len(), 35);
        assert_eq!(obs.closest_waypoints, [0, 1]);
        assert_eq!(obs.objects_location.len(), 6);
        assert_eq!(obs.steps, 1);
        assert!(obs.is_reversed);
        // Straight east along the bottom straight
        assert!(obs.track_direction().abs() < 1e-9);
        assert!(obs.heading_error().abs() < 1e-9);
    }

    #[test]
    fn test_missing_field_is_named() {
        let mut value = sample_value();
        value.as_object_mut().unwrap().remove("track_width");

        match Observation::from_value(&value) {
            Err(RewardError::MissingField(field)) => assert_eq!(field, "track_width"),
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_type_is_named() {
        let mut value = sample_value();
        value["speed"] = json!("fast");

        match Observation::from_value(&value) {
            Err(RewardError::InvalidField { field, .. }) => assert_eq!(field, "speed"),
            other => panic!("Expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_fractional_steps_rejected() {
        let mut value = sample_value();
        value["steps"] = json!(2.5);
        assert!(matches!(
            Observation::from_value(&value),
            Err(RewardError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_empty_waypoints_rejected() {
        let mut value = sample_value();
        value["waypoints"] = json!([]);
        assert!(matches!(
            Observation::from_value(&value),
            Err(RewardError::EmptyWaypoints)
        ));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let mut value = sample_value();
        value["episode_id"] = json!("ep-17");
        assert!(Observation::from_value(&value).is_ok());
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(Observation::from_json("[1, 2, 3]").is_err());
        assert!(Observation::from_json("not json").is_err());
    }

    #[test]
    fn test_closest_waypoints_wrap() {
        let mut obs = sample();
        obs.closest_waypoints = [-1, 35];
        assert_eq!(obs.prev_waypoint(), obs.waypoints[34]);
        assert_eq!(obs.next_waypoint(), obs.waypoints[0]);
    }

    #[test]
    fn test_off_course() {
        let mut obs = sample();
        obs.all_wheels_on_track = false;
        obs.is_reversed = false;
        assert!(obs.is_off_course());
        obs.is_reversed = true;
        assert!(!obs.is_off_course());
    }
}
