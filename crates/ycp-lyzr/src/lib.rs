//! Lyzr Studio integration for YC-Pilot
//!
//! This crate provides the Lyzr implementation of the ValidationAgent trait,
//! its environment-driven configuration and the credential health check.

mod client;
mod config;
mod health;

#[cfg(test)]
mod tests;

pub use client::LyzrClient;
pub use config::LyzrConfig;
pub use health::{HealthState, HealthStatus};

// Re-export core types for convenience
pub use ycp_core::{AgentPrompt, Error, Result, UpstreamCallResult, ValidationAgent};
