use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::Differentiable;
use crate::activations::Activation;
use crate::error::{MaddpgError, Result};
use crate::layers::{LayerGradients, WeightInit};
use crate::network::{mlp_activations, EvalMode, NeuralNetwork};
use crate::optimizer::OptimizerKind;

/// Deterministic policy: own observation → own action.
///
/// The output layer is `tanh`, scaled by `action_scale`, so raw outputs lie in
/// `[-action_scale, action_scale]` before the agent clamps them to its bounds.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Actor {
    pub network: NeuralNetwork,
    pub action_scale: f32,
}

impl Actor {
    pub fn new(
        obs_dim: usize,
        act_dim: usize,
        hidden_sizes: &[usize],
        action_scale: f32,
        optimizer: OptimizerKind,
    ) -> Result<Self> {
        if !action_scale.is_finite() || action_scale <= 0.0 {
            return Err(MaddpgError::invalid_parameter(
                "action_scale".to_string(),
                format!("must be positive and finite, got {}", action_scale),
            ));
        }
        let mut sizes = Vec::with_capacity(hidden_sizes.len() + 2);
        sizes.push(obs_dim);
        sizes.extend_from_slice(hidden_sizes);
        sizes.push(act_dim);

        let network = NeuralNetwork::new(&sizes, &mlp_activations(hidden_sizes.len(), Activation::Tanh), optimizer)?
            .with_output_init(WeightInit::Uniform { min: -0.003, max: 0.003 });

        Ok(Actor { network, action_scale })
    }

    pub fn obs_dim(&self) -> usize {
        self.network.input_size()
    }

    pub fn act_dim(&self) -> usize {
        self.network.output_size()
    }

    /// Action for a single observation, without caching activations.
    pub fn act(&mut self, observation: ArrayView1<f32>) -> Result<ndarray::Array1<f32>> {
        let actions = self.evaluate(observation.insert_axis(Axis(0)), EvalMode::Inference)?;
        Ok(actions.index_axis_move(Axis(0), 0))
    }

    /// Backpropagate dL/d action through the scaled output and the network.
    pub fn backward(&self, action_grads: ArrayView2<f32>) -> Result<Vec<LayerGradients>> {
        let scaled = &action_grads * self.action_scale;
        let (_, gradients) = self.network.backward_batch(scaled.view())?;
        Ok(gradients)
    }
}

impl Differentiable for Actor {
    fn evaluate(&mut self, inputs: ArrayView2<f32>, mode: EvalMode) -> Result<Array2<f32>> {
        let raw = self.network.forward_batch(inputs, mode)?;
        Ok(raw * self.action_scale)
    }

    fn network(&self) -> &NeuralNetwork {
        &self.network
    }

    fn network_mut(&mut self) -> &mut NeuralNetwork {
        &mut self.network
    }
}
