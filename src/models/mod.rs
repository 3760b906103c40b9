//! # Actor and Critic Networks
//!
//! The agent core only relies on the [`Differentiable`] capability: evaluate a
//! batch, expose parameters, take a gradient step, and copy or blend weights from
//! a network of the same shape. [`Actor`] and [`Critic`] are the two concrete
//! topologies used by MADDPG.

pub mod actor;
pub mod critic;

pub use actor::Actor;
pub use critic::Critic;

use ndarray::{Array1, Array2, ArrayView2};

use crate::error::Result;
use crate::layers::LayerGradients;
use crate::network::{EvalMode, NeuralNetwork};

/// A differentiable function object with a parameter vector.
pub trait Differentiable {
    /// Evaluate a batch of row vectors.
    fn evaluate(&mut self, inputs: ArrayView2<f32>, mode: EvalMode) -> Result<Array2<f32>>;

    fn network(&self) -> &NeuralNetwork;

    fn network_mut(&mut self) -> &mut NeuralNetwork;

    fn parameters(&self) -> Array1<f32> {
        self.network().parameters()
    }

    /// One optimizer step on this object's own parameters.
    fn apply_gradients(&mut self, gradients: &[LayerGradients], learning_rate: f32) -> Result<()> {
        self.network_mut().apply_gradients(gradients, learning_rate)
    }

    /// Hard copy of `other`'s parameters.
    fn copy_from(&mut self, other: &Self) -> Result<()>
    where
        Self: Sized,
    {
        self.network_mut().copy_from(other.network())
    }

    /// `self ← tau * other + (1 - tau) * self`
    fn soft_update_from(&mut self, other: &Self, tau: f32) -> Result<()>
    where
        Self: Sized,
    {
        self.network_mut().soft_update_from(other.network(), tau)
    }
}
