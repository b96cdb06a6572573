//! Transports for the reward protocol

pub mod stdio;
