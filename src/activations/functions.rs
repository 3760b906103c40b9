use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// An enumeration of the activation functions a dense layer can apply.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum Activation {
    #[default]
    Relu,
    Linear,
    Tanh,
}

impl Activation {
    /// Apply the activation to a batch of pre-activations in place.
    pub fn apply_batch(&self, inputs: &mut Array2<f32>) {
        match *self {
            Activation::Relu => inputs.mapv_inplace(|v| v.max(0.0)),
            Activation::Linear => {}
            Activation::Tanh => inputs.mapv_inplace(f32::tanh),
        }
    }

    /// Derivative of the activation evaluated at the stored pre-activations.
    pub fn derivative_batch(&self, pre_activations: ArrayView2<f32>) -> Array2<f32> {
        match *self {
            Activation::Relu => pre_activations.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Activation::Linear => Array2::ones(pre_activations.dim()),
            Activation::Tanh => pre_activations.mapv(|v| {
                let t = v.tanh();
                1.0 - t * t
            }),
        }
    }
}
