//! Error types for reward evaluation

use thiserror::Error;

/// Result type for reward evaluation
pub type Result<T> = std::result::Result<T, RewardError>;

/// Reward evaluation errors
#[derive(Debug, Error)]
pub enum RewardError {
    /// Required observation field is absent
    #[error("Missing observation field: {0}")]
    MissingField(String),

    /// Observation field has the wrong shape
    #[error("Invalid observation field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// Waypoint list is empty, so there is no track to follow
    #[error("Observation has no waypoints")]
    EmptyWaypoints,

    /// Arithmetic produced NaN or infinity
    #[error("Reward is not finite: {0}")]
    NonFiniteReward(f64),

    /// Bad or unreadable configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RewardError {
    /// JSON-RPC error code for this error
    pub fn code(&self) -> i32 {
        match self {
            RewardError::MissingField(_) => error_codes::MISSING_FIELD,
            RewardError::InvalidField { .. } => error_codes::INVALID_FIELD,
            RewardError::EmptyWaypoints => error_codes::EMPTY_WAYPOINTS,
            RewardError::NonFiniteReward(_) => error_codes::NON_FINITE_REWARD,
            RewardError::Config(_) => error_codes::CONFIG,
            RewardError::Serialization(_) => error_codes::SERIALIZATION,
        }
    }
}

impl From<serde_json::Error> for RewardError {
    fn from(err: serde_json::Error) -> Self {
        RewardError::Serialization(err.to_string())
    }
}

/// JSON-RPC error codes for reward evaluation
pub mod error_codes {
    pub const MISSING_FIELD: i32 = -32010;
    pub const INVALID_FIELD: i32 = -32011;
    pub const EMPTY_WAYPOINTS: i32 = -32012;
    pub const NON_FINITE_REWARD: i32 = -32013;
    pub const CONFIG: i32 = -32014;
    pub const SERIALIZATION: i32 = -32015;
}
