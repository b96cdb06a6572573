//! Method handlers for the reward protocol

use serde::Serialize;
use track_reward_core::RewardEvaluator;
use tracing::{debug, warn};

use crate::protocol::{EvaluateResult, INVALID_PARAMS, METHOD_NOT_FOUND, Request, Response};

/// Method description for `methods/list`
#[derive(Debug, Clone, Serialize)]
pub struct MethodDef {
    pub name: &'static str,
    pub description: &'static str,
}

/// Get list of available methods
pub fn list_methods() -> Vec<MethodDef> {
    vec![
        MethodDef {
            name: "evaluate",
            description: "Score one observation. Params: the observation object. Returns {\"reward\", \"components\"}.",
        },
        MethodDef {
            name: "components",
            description: "Reward components reported by the active variant",
        },
        MethodDef {
            name: "config",
            description: "Active reward configuration",
        },
        MethodDef {
            name: "methods/list",
            description: "This list",
        },
    ]
}

/// Dispatch one request
pub fn handle_request(evaluator: &RewardEvaluator, request: &Request) -> Response {
    match request.method.as_str() {
        "evaluate" => handle_evaluate(evaluator, request),
        "components" => to_response(request, &evaluator.components()),
        "config" => to_response(request, evaluator.config()),
        "methods/list" => to_response(request, &list_methods()),
        _ => Response::error(
            request.id.clone(),
            METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        ),
    }
}

fn handle_evaluate(evaluator: &RewardEvaluator, request: &Request) -> Response {
    if !request.params.is_object() {
        return Response::error(
            request.id.clone(),
            INVALID_PARAMS,
            "evaluate expects an observation object",
        );
    }

    match evaluator.evaluate_value(&request.params) {
        Ok(reward) => {
            debug!(reward = reward.value, "evaluated step");
            to_response(
                request,
                &EvaluateResult {
                    reward: reward.value,
                    components: reward.components,
                },
            )
        }
        Err(e) => {
            warn!("Evaluation failed: {}", e);
            Response::error(request.id.clone(), e.code(), e.to_string())
        }
    }
}

fn to_response<T: Serialize + ?Sized>(request: &Request, value: &T) -> Response {
    match serde_json::to_value(value) {
        Ok(result) => Response::success(request.id.clone(), result),
        Err(e) => Response::error(
            request.id.clone(),
            track_reward_core::error_codes::SERIALIZATION,
            format!("Failed to serialize result: {}", e),
        ),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::protocol::RequestId;
    use serde_json::json;
    use track_reward_core::{RewardConfig, RewardVariant, error_codes};

    pub(crate) fn observation() -> serde_json::Value {
        json!({
            "all_wheels_on_track": false,
            "x": 1.0,
            "y": 0.0,
            "distance_from_center": 0.0,
            "is_left_of_center": false,
            "is_reversed": false,
            "is_crashed": false,
            "is_offtrack": true,
            "heading": 0.0,
            "progress": 10.0,
            "steps": 40,
            "speed": 2.0,
            "steering_angle": 0.0,
            "track_width": 1.0,
            "track_length": 4.0,
            "waypoints": [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            "closest_waypoints": [0, 1],
            "closest_objects": [],
            "objects_location": [],
            "objects_left_of_center": [],
            "object_in_camera": false,
            "objects_speed": [],
            "objects_heading": [],
            "objects_distance": []
        })
    }

    fn banded() -> RewardEvaluator {
        RewardEvaluator::new(RewardConfig::for_variant(RewardVariant::BandedPenalty))
    }

    #[test]
    fn test_evaluate_returns_reward() {
        let request = Request::new(RequestId::Number(1), "evaluate", observation());
        let response = handle_request(&banded(), &request);

        assert!(response.error.is_none());
        let result: EvaluateResult = serde_json::from_value(response.result.unwrap()).unwrap();
        assert_eq!(result.reward, -20.0);
        assert_eq!(result.components["offtrack_penalty"], -20.0);
    }

    #[test]
    fn test_evaluate_missing_field() {
        let mut params = observation();
        params.as_object_mut().unwrap().remove("speed");
        let request = Request::new(RequestId::String("a".into()), "evaluate", params);
        let response = handle_request(&banded(), &request);

        let error = response.error.unwrap();
        assert_eq!(error.code, error_codes::MISSING_FIELD);
        assert!(error.message.contains("speed"));
        assert_eq!(response.id, Some(RequestId::String("a".into())));
    }

    #[test]
    fn test_evaluate_rejects_non_object_params() {
        let request = Request::new(RequestId::Number(2), "evaluate", json!([1, 2]));
        let response = handle_request(&banded(), &request);
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[test]
    fn test_unknown_method() {
        let request = Request::new(RequestId::Number(3), "reset", json!({}));
        let response = handle_request(&banded(), &request);
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[test]
    fn test_config_and_components() {
        let evaluator = banded();

        let response = handle_request(
            &evaluator,
            &Request::new(RequestId::Number(4), "config", json!(null)),
        );
        let config: RewardConfig = serde_json::from_value(response.result.unwrap()).unwrap();
        assert_eq!(config.variant(), RewardVariant::BandedPenalty);

        let response = handle_request(
            &evaluator,
            &Request::new(RequestId::Number(5), "components", json!(null)),
        );
        let components = response.result.unwrap();
        assert_eq!(components.as_array().unwrap().len(), 3);
    }
}
