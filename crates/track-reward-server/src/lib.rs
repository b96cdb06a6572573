//! # track-reward-server
//!
//! Line-delimited JSON-RPC server for the track reward evaluator.
//!
//! The simulator harness runs this as a sidecar process and sends one
//! `evaluate` request per simulation tick. This crate provides:
//! - JSON-RPC message types
//! - Method handlers (evaluate, components, config)
//! - The stdio transport

pub mod error;
pub mod methods;
pub mod protocol;
pub mod transport;

pub use error::{Result, ServerError};
pub use methods::handle_request;
pub use protocol::{Request, RequestId, Response};

use track_reward_core::RewardEvaluator;

/// Reward evaluation server
pub struct RewardServer {
    evaluator: RewardEvaluator,
}

impl RewardServer {
    /// Create a new server around an evaluator
    pub fn new(evaluator: RewardEvaluator) -> Self {
        Self { evaluator }
    }

    /// Run the server on stdio transport
    pub async fn run_stdio(self) -> Result<()> {
        transport::stdio::run(self).await
    }

    /// Answer a single request
    pub fn handle(&self, request: &Request) -> Response {
        handle_request(&self.evaluator, request)
    }

    pub fn evaluator(&self) -> &RewardEvaluator {
        &self.evaluator
    }
}
