//! # Multi-Agent Training Module
//!
//! Drives a team of MADDPG agents against a simultaneous-action environment.
//!
//! ## Core Concepts
//!
//! - **Simultaneous actions**: Every agent submits a continuous action each step
//! - **Shared replay**: One buffer of joint transitions feeds every agent
//! - **Consistent targets**: All target-actor next actions are predicted before
//!   any agent updates within a training step
//! - **Best snapshots**: New best episode rewards and moving averages are
//!   cached on every agent

pub mod environment;
pub mod trainer;

pub use environment::{ContinuousMultiAgentEnv, MultiAgentStep};
pub use trainer::MaddpgTrainer;
