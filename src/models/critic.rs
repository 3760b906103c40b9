use ndarray::{concatenate, s, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::Differentiable;
use crate::activations::Activation;
use crate::error::{MaddpgError, Result};
use crate::layers::LayerGradients;
use crate::network::{mlp_activations, EvalMode, NeuralNetwork};
use crate::optimizer::OptimizerKind;

/// Centralized action-value network: joint observation ++ joint action → Q.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Critic {
    pub network: NeuralNetwork,
    pub obs_dim: usize,
    pub act_dim: usize,
}

impl Critic {
    pub fn new(obs_dim: usize, act_dim: usize, hidden_sizes: &[usize], optimizer: OptimizerKind) -> Result<Self> {
        let mut sizes = Vec::with_capacity(hidden_sizes.len() + 2);
        sizes.push(obs_dim + act_dim);
        sizes.extend_from_slice(hidden_sizes);
        sizes.push(1);

        let network = NeuralNetwork::new(&sizes, &mlp_activations(hidden_sizes.len(), Activation::Linear), optimizer)?;
        Ok(Critic { network, obs_dim, act_dim })
    }

    /// Q(states, actions) as a `(batch, 1)` column.
    pub fn value<'a>(
        &mut self,
        states: ArrayView2<'a, f32>,
        actions: ArrayView2<'a, f32>,
        mode: EvalMode,
    ) -> Result<Array2<f32>> {
        MaddpgError::check_width("joint state", self.obs_dim, states.ncols())?;
        MaddpgError::check_width("joint action", self.act_dim, actions.ncols())?;
        if states.nrows() != actions.nrows() {
            return Err(MaddpgError::dimension_mismatch(
                format!("{} action rows", states.nrows()),
                format!("{}", actions.nrows()),
            ));
        }
        let inputs = concatenate(Axis(1), &[states, actions])?;
        self.evaluate(inputs.view(), mode)
    }

    /// Backpropagate dL/dQ. Returns dL/d joint-action and the parameter
    /// gradients; callers decide whether to apply the latter.
    pub fn backward(&self, value_grads: ArrayView2<f32>) -> Result<(Array2<f32>, Vec<LayerGradients>)> {
        let (input_grads, gradients) = self.network.backward_batch(value_grads)?;
        let action_grads = input_grads.slice(s![.., self.obs_dim..]).to_owned();
        Ok((action_grads, gradients))
    }
}

impl Differentiable for Critic {
    fn evaluate(&mut self, inputs: ArrayView2<f32>, mode: EvalMode) -> Result<Array2<f32>> {
        self.network.forward_batch(inputs, mode)
    }

    fn network(&self) -> &NeuralNetwork {
        &self.network
    }

    fn network_mut(&mut self) -> &mut NeuralNetwork {
        &mut self.network
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_value_shape() {
        let mut critic = Critic::new(5, 3, &[16, 16], OptimizerKind::Adam).unwrap();
        let q = critic
            .value(Array2::zeros((4, 5)).view(), Array2::zeros((4, 3)).view(), EvalMode::Inference)
            .unwrap();
        assert_eq!(q.dim(), (4, 1));
    }

    #[test]
    fn test_rejects_wrong_widths() {
        let mut critic = Critic::new(5, 3, &[8], OptimizerKind::Adam).unwrap();
        let res = critic.value(Array2::zeros((4, 4)).view(), Array2::zeros((4, 3)).view(), EvalMode::Train);
        assert!(matches!(res, Err(MaddpgError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_action_gradient_width() {
        let mut critic = Critic::new(2, 1, &[4], OptimizerKind::Sgd).unwrap();
        critic
            .value(array![[0.1, 0.2]].view(), array![[0.3]].view(), EvalMode::Train)
            .unwrap();
        let (action_grads, grads) = critic.backward(array![[1.0]].view()).unwrap();
        assert_eq!(action_grads.dim(), (1, 1));
        assert_eq!(grads.len(), 2);
    }
}
