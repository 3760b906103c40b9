use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use serde::{Deserialize, Serialize};

use crate::activations::Activation;

/// Weight initialization strategies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WeightInit {
    /// Xavier/Glorot uniform initialization
    XavierUniform,

    /// He/Kaiming uniform initialization (for ReLU)
    HeUniform,

    /// Uniform distribution with custom range
    Uniform { min: f32, max: f32 },

    /// All zeros
    Zeros,
}

impl WeightInit {
    /// Initialize weights for a layer of shape `(fan_in, fan_out)`
    pub fn initialize_weights(&self, shape: (usize, usize)) -> Array2<f32> {
        let (fan_in, fan_out) = shape;

        match *self {
            WeightInit::XavierUniform => {
                let limit = (6.0 / (fan_in + fan_out).max(1) as f32).sqrt();
                Array2::random(shape, Uniform::new_inclusive(-limit, limit))
            }
            WeightInit::HeUniform => {
                let limit = (6.0 / fan_in.max(1) as f32).sqrt();
                Array2::random(shape, Uniform::new_inclusive(-limit, limit))
            }
            WeightInit::Uniform { min, max } => {
                Array2::random(shape, Uniform::new_inclusive(min, max))
            }
            WeightInit::Zeros => Array2::zeros(shape),
        }
    }

    /// Initialize biases for a layer. Only the explicit uniform range draws
    /// random biases; every other scheme starts at zero.
    pub fn initialize_biases(&self, size: usize) -> Array1<f32> {
        match *self {
            WeightInit::Uniform { min, max } => Array1::random(size, Uniform::new_inclusive(min, max)),
            _ => Array1::zeros(size),
        }
    }

    /// Get the recommended initialization for an activation function
    pub fn for_activation(activation: &Activation) -> Self {
        match activation {
            Activation::Relu => WeightInit::HeUniform,
            Activation::Tanh | Activation::Linear => WeightInit::XavierUniform,
        }
    }
}
