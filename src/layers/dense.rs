use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::initialization::WeightInit;
use crate::activations::Activation;
use crate::error::{MaddpgError, Result};

/// Values cached by a training-mode forward pass and consumed by backprop.
#[derive(Clone, Debug)]
struct ForwardCache {
    inputs: Array2<f32>,
    pre_activation: Array2<f32>,
}

/// Gradients of a loss with respect to one layer's parameters.
#[derive(Clone, Debug)]
pub struct LayerGradients {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
}

/// A fully connected (dense) layer in a neural network
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DenseLayer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
    #[serde(skip)]
    cache: Option<ForwardCache>,
}

impl DenseLayer {
    /// Create a new dense layer with the initialization recommended for its
    /// activation.
    pub fn new(input_size: usize, output_size: usize, activation: Activation) -> Self {
        Self::new_with_init(input_size, output_size, activation, WeightInit::for_activation(&activation))
    }

    pub fn new_with_init(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        init: WeightInit,
    ) -> Self {
        DenseLayer {
            weights: init.initialize_weights((input_size, output_size)),
            biases: init.initialize_biases(output_size),
            activation,
            cache: None,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn output_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Forward pass for a batch of row vectors. When `cache` is set the inputs
    /// and pre-activations are kept for a following [`DenseLayer::backward_batch`].
    pub fn forward_batch(&mut self, inputs: ArrayView2<f32>, cache: bool) -> Array2<f32> {
        let mut outputs = inputs.dot(&self.weights) + &self.biases.view().insert_axis(Axis(0));
        if cache {
            self.cache = Some(ForwardCache {
                inputs: inputs.to_owned(),
                pre_activation: outputs.clone(),
            });
        } else {
            self.cache = None;
        }
        self.activation.apply_batch(&mut outputs);
        outputs
    }

    /// Backpropagate `output_errors` (dL/d output) through the layer.
    ///
    /// Returns dL/d input together with the parameter gradients.
    pub fn backward_batch(&self, output_errors: ArrayView2<f32>) -> Result<(Array2<f32>, LayerGradients)> {
        let cache = self.cache.as_ref().ok_or_else(|| {
            MaddpgError::NumericalError(
                "backward_batch() requires a preceding training-mode forward pass".to_string(),
            )
        })?;
        if output_errors.dim() != cache.pre_activation.dim() {
            return Err(MaddpgError::dimension_mismatch(
                format!("{:?}", cache.pre_activation.dim()),
                format!("{:?}", output_errors.dim()),
            ));
        }

        let adjusted = &output_errors * &self.activation.derivative_batch(cache.pre_activation.view());
        let gradients = LayerGradients {
            weights: cache.inputs.t().dot(&adjusted),
            biases: adjusted.sum_axis(Axis(0)),
        };
        let input_errors = adjusted.dot(&self.weights.t());
        Ok((input_errors, gradients))
    }

    /// Overwrite parameters with another layer's, leaving the cache alone.
    pub fn copy_parameters_from(&mut self, other: &DenseLayer) {
        self.weights.assign(&other.weights);
        self.biases.assign(&other.biases);
    }

    /// `self ← tau * other + (1 - tau) * self`, element-wise.
    pub fn blend_towards(&mut self, other: &DenseLayer, tau: f32) {
        self.weights.zip_mut_with(&other.weights, |t, &s| *t = tau * s + (1.0 - tau) * *t);
        self.biases.zip_mut_with(&other.biases, |t, &s| *t = tau * s + (1.0 - tau) * *t);
    }

    pub fn same_shape(&self, other: &DenseLayer) -> bool {
        self.weights.dim() == other.weights.dim() && self.biases.dim() == other.biases.dim()
    }
}
