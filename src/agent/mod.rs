//! # MADDPG Agent Module
//!
//! One [`MaddpgAgent`] per environment agent. Each agent keeps a decentralized
//! actor that sees only its own observation, and a centralized critic that sees
//! the joint observation and joint action of every agent.
//!
//! ## Core Concepts
//!
//! - **Joint layout**: Agents are ordered by index; joint vectors concatenate
//!   per-agent slices in that order ([`JointLayout`], [`AgentSegment`])
//! - **Policy variants**: Live, target, best single episode and best moving
//!   average parameter sets ([`PolicyVariant`])
//! - **Target tracking**: Targets follow the live networks at rate `tau`
//! - **Checkpoints**: Eight network files per agent ([`NetworkSlot`])
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use maddpg::agent::{AgentSpace, MaddpgBuilder};
//! use ndarray::array;
//!
//! let spaces = vec![AgentSpace::symmetric(3, 2, 1.0), AgentSpace::symmetric(2, 1, 1.0)];
//! let mut agent = MaddpgBuilder::new(spaces, 0)
//!     .hidden_sizes(vec![64, 64], vec![128, 128])
//!     .tau(0.01)
//!     .build()
//!     .unwrap();
//!
//! let action = agent.non_exploring_policy(array![0.1, 0.2, -0.3].view(), "best_overall").unwrap();
//! assert_eq!(action.len(), 2);
//! ```

mod builder;
mod checkpoint;
mod layout;
mod maddpg;
mod variant;

pub use builder::MaddpgBuilder;
pub use checkpoint::NetworkSlot;
pub use layout::{AgentSegment, AgentSpace, JointLayout};
pub use maddpg::{MaddpgAgent, NetworkPair};
pub use variant::PolicyVariant;
