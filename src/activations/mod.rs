//! # Activation Functions
//!
//! Element-wise non-linearities used by the actor and critic networks.
//!
//! - **ReLU**: `max(0, x)`, the default for hidden layers
//! - **Tanh**: bounded to `[-1, 1]`, used on the actor output so that scaling by
//!   the action bound keeps actions inside the action space
//! - **Linear**: identity, used on the critic output

pub mod functions;

pub use functions::Activation;
