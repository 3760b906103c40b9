//! # MADDPG - Multi-Agent Deep Deterministic Policy Gradient
//!
//! A Rust implementation of the MADDPG agent core: decentralized actors trained
//! against centralized critics that observe every agent's observation and
//! action.
//!
//! ## Key Features
//!
//! - **Agent core**: Live, target, best-single and best-average network sets
//!   per agent, with soft target tracking
//! - **Neural Networks**: Dense multilayer perceptrons with batched backprop
//! - **Optimizers**: SGD and Adam with per-layer state
//! - **Exploration**: Ornstein-Uhlenbeck and Gaussian noise processes
//! - **Replay**: Shared buffer of joint transitions
//! - **Checkpoints**: Eight bincode network files per agent
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use maddpg::agent::AgentSpace;
//! use maddpg::config::MaddpgConfig;
//! use maddpg::multi_agent::MaddpgTrainer;
//!
//! let spaces = vec![AgentSpace::symmetric(3, 2, 1.0), AgentSpace::symmetric(2, 1, 1.0)];
//! let config = MaddpgConfig {
//!     batch_size: 256,
//!     ..MaddpgConfig::default()
//! };
//! let mut trainer = MaddpgTrainer::new(&spaces, config).unwrap();
//! // trainer.run_episode(&mut env, 25, PolicyVariant::Live, true, true)
//! assert_eq!(trainer.agents().len(), 2);
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions (ReLU, Tanh, etc.)
//! - [`agent`] - The MADDPG agent, joint layout and policy variants
//! - [`batch`] - Joint transition batches
//! - [`config`] - Hyperparameters
//! - [`error`] - Error types and result handling
//! - [`layers`] - Dense layers and weight initialization
//! - [`metrics`] - Update losses and episode reward tracking
//! - [`models`] - Actor and critic networks
//! - [`multi_agent`] - Environments and the team trainer
//! - [`network`] - Core neural network implementation
//! - [`noise`] - Exploration noise
//! - [`optimizer`] - Optimization algorithms
//! - [`replay_buffer`] - Experience replay of joint transitions

pub mod activations;
pub mod agent;
pub mod batch;
pub mod config;
pub mod error;
pub mod layers;
pub mod metrics;
pub mod models;
pub mod multi_agent;
pub mod network;
pub mod noise;
pub mod optimizer;
pub mod replay_buffer;

pub use agent::{AgentSpace, MaddpgAgent, MaddpgBuilder, PolicyVariant};
pub use config::MaddpgConfig;
pub use error::{MaddpgError, Result};
