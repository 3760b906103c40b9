use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::activations::Activation;
use crate::error::{MaddpgError, Result};
use crate::layers::{DenseLayer, LayerGradients, WeightInit};
use crate::optimizer::{Optimizer, OptimizerKind, OptimizerWrapper};

/// How a network is evaluated.
///
/// `Train` keeps the per-layer activations needed for backpropagation;
/// `Inference` discards them. Layers with mode-dependent behaviour would branch
/// on this value as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EvalMode {
    #[default]
    Train,
    Inference,
}

/// A multi-layer perceptron with its own optimizer state.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NeuralNetwork {
    pub layers: Vec<DenseLayer>,
    pub optimizer: OptimizerWrapper,
}

impl NeuralNetwork {
    /// Create a network from layer sizes and one activation per layer.
    pub fn new(layer_sizes: &[usize], activations: &[Activation], optimizer: OptimizerKind) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(MaddpgError::invalid_parameter(
                "layer_sizes",
                "network needs at least an input and an output size",
            ));
        }
        if layer_sizes.len() - 1 != activations.len() {
            return Err(MaddpgError::dimension_mismatch(
                format!("{} activations", layer_sizes.len() - 1),
                format!("{} activations", activations.len()),
            ));
        }
        if let Some(pos) = layer_sizes.iter().position(|&s| s == 0) {
            return Err(MaddpgError::invalid_parameter(
                "layer_sizes".to_string(),
                format!("layer size at position {} is zero", pos),
            ));
        }

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| DenseLayer::new(window[0], window[1], activation))
            .collect::<Vec<_>>();

        Ok(Self::from_layers(layers, optimizer))
    }

    /// Build a network around pre-constructed layers.
    pub fn from_layers(layers: Vec<DenseLayer>, optimizer: OptimizerKind) -> Self {
        let optimizer = optimizer.build(&layers);
        NeuralNetwork { layers, optimizer }
    }

    /// Replace the initialization of the output layer, e.g. with a small
    /// uniform range so an untrained policy starts near zero.
    pub fn with_output_init(mut self, init: WeightInit) -> Self {
        if let Some(last) = self.layers.last_mut() {
            let (fan_in, fan_out) = last.weights.dim();
            last.weights = init.initialize_weights((fan_in, fan_out));
            last.biases = init.initialize_biases(fan_out);
        }
        self
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, DenseLayer::input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, DenseLayer::output_size)
    }

    /// Forward pass for a batch of row vectors.
    pub fn forward_batch(&mut self, inputs: ArrayView2<f32>, mode: EvalMode) -> Result<Array2<f32>> {
        MaddpgError::check_width("network input", self.input_size(), inputs.ncols())?;
        let cache = mode == EvalMode::Train;
        let mut current = inputs.to_owned();
        for layer in &mut self.layers {
            current = layer.forward_batch(current.view(), cache);
        }
        Ok(current)
    }

    /// Backpropagate dL/d output through every layer.
    ///
    /// Returns dL/d input and the per-layer parameter gradients, in layer
    /// order. Requires a preceding `Train`-mode forward pass.
    pub fn backward_batch(&self, output_errors: ArrayView2<f32>) -> Result<(Array2<f32>, Vec<LayerGradients>)> {
        let mut gradients = Vec::with_capacity(self.layers.len());
        let mut current = output_errors.to_owned();
        for layer in self.layers.iter().rev() {
            let (input_errors, layer_gradients) = layer.backward_batch(current.view())?;
            gradients.push(layer_gradients);
            current = input_errors;
        }
        gradients.reverse();
        Ok((current, gradients))
    }

    /// Apply one optimizer step with the given per-layer gradients.
    pub fn apply_gradients(&mut self, gradients: &[LayerGradients], learning_rate: f32) -> Result<()> {
        MaddpgError::check_width("gradient list", self.layers.len(), gradients.len())?;
        for (index, (layer, grads)) in self.layers.iter_mut().zip(gradients).enumerate() {
            if layer.weights.dim() != grads.weights.dim() || layer.biases.dim() != grads.biases.dim() {
                return Err(MaddpgError::dimension_mismatch(
                    format!("layer {} gradients of shape {:?}", index, layer.weights.dim()),
                    format!("{:?}", grads.weights.dim()),
                ));
            }
            self.optimizer.update_weights(index, &mut layer.weights, &grads.weights, learning_rate);
            self.optimizer.update_biases(index, &mut layer.biases, &grads.biases, learning_rate);
        }
        self.optimizer.end_step();
        Ok(())
    }

    pub fn same_architecture(&self, other: &NeuralNetwork) -> bool {
        self.layers.len() == other.layers.len()
            && self.layers.iter().zip(&other.layers).all(|(a, b)| a.same_shape(b))
    }

    fn ensure_same_architecture(&self, other: &NeuralNetwork) -> Result<()> {
        if self.same_architecture(other) {
            Ok(())
        } else {
            Err(MaddpgError::dimension_mismatch(self.describe(), other.describe()))
        }
    }

    /// Layer shapes, e.g. `[3x256, 256x256, 256x2]`.
    pub fn describe(&self) -> String {
        let shapes = self
            .layers
            .iter()
            .map(|l| format!("{}x{}", l.input_size(), l.output_size()))
            .collect::<Vec<_>>();
        format!("[{}]", shapes.join(", "))
    }

    /// Hard copy of another network's parameters. Optimizer state is kept.
    pub fn copy_from(&mut self, other: &NeuralNetwork) -> Result<()> {
        self.ensure_same_architecture(other)?;
        for (target, source) in self.layers.iter_mut().zip(&other.layers) {
            target.copy_parameters_from(source);
        }
        Ok(())
    }

    /// Exponential tracking: `self ← tau * other + (1 - tau) * self`.
    pub fn soft_update_from(&mut self, other: &NeuralNetwork, tau: f32) -> Result<()> {
        self.ensure_same_architecture(other)?;
        for (target, source) in self.layers.iter_mut().zip(&other.layers) {
            target.blend_towards(source, tau);
        }
        Ok(())
    }

    /// All parameters flattened in layer order, weights before biases.
    pub fn parameters(&self) -> Array1<f32> {
        self.layers
            .iter()
            .flat_map(|l| l.weights.iter().chain(l.biases.iter()).copied())
            .collect()
    }

    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(|l| l.weights.len() + l.biases.len()).sum()
    }

    /// Serialize the network, optimizer state included, to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = bincode::serialize(self)?;
        fs::write(path, serialized)?;
        Ok(())
    }

    /// Deserialize a network written by [`NeuralNetwork::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        let network = bincode::deserialize(&data)?;
        Ok(network)
    }
}

/// Hidden layers use ReLU, the output layer uses `output`.
pub fn mlp_activations(hidden_layers: usize, output: Activation) -> Vec<Activation> {
    std::iter::repeat(Activation::Relu)
        .take(hidden_layers)
        .chain(std::iter::once(output))
        .collect()
}
