//! Gradient-descent optimizers.
//!
//! Optimizers live inside a [`NeuralNetwork`](crate::network::NeuralNetwork) and
//! are serialized with it, so Adam moment estimates survive a checkpoint.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::layers::DenseLayer;

pub trait Optimizer {
    /// Update the weights of layer `layer` in place.
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32);

    /// Update the biases of layer `layer` in place.
    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32);

    /// Called once after every layer has been updated for one step.
    fn end_step(&mut self) {}
}

/// Which optimizer a freshly built network gets.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub enum OptimizerKind {
    Sgd,
    #[default]
    Adam,
}

impl OptimizerKind {
    pub fn build(&self, layers: &[DenseLayer]) -> OptimizerWrapper {
        match self {
            OptimizerKind::Sgd => OptimizerWrapper::SGD(SGD::new()),
            OptimizerKind::Adam => OptimizerWrapper::Adam(Adam::default(layers)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl Optimizer for OptimizerWrapper {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
        }
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
        }
    }

    fn end_step(&mut self) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.end_step(),
            OptimizerWrapper::Adam(optimizer) => optimizer.end_step(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Default for SGD {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for SGD {
    fn update_weights(&mut self, _layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
    }

    fn update_biases(&mut self, _layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        biases.zip_mut_with(gradients, |b, &g| *b -= learning_rate * g);
    }
}

/// Adam with one pair of moment estimates per layer.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    m_weights: Vec<Array2<f32>>,
    v_weights: Vec<Array2<f32>>,
    m_biases: Vec<Array1<f32>>,
    v_biases: Vec<Array1<f32>>,
    /// 1-based step counter used for bias correction
    pub t: u32,
}

impl Adam {
    pub fn new(layers: &[DenseLayer], beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            m_weights: layers.iter().map(|l| Array2::zeros(l.weights.dim())).collect(),
            v_weights: layers.iter().map(|l| Array2::zeros(l.weights.dim())).collect(),
            m_biases: layers.iter().map(|l| Array1::zeros(l.biases.dim())).collect(),
            v_biases: layers.iter().map(|l| Array1::zeros(l.biases.dim())).collect(),
            t: 1,
        }
    }

    pub fn default(layers: &[DenseLayer]) -> Self {
        Self::new(layers, 0.9, 0.999, 1e-7)
    }

    fn corrections(&self) -> (f32, f32) {
        (
            1.0 - self.beta1.powi(self.t as i32),
            1.0 - self.beta2.powi(self.t as i32),
        )
    }
}

impl Optimizer for Adam {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        let (c1, c2) = self.corrections();
        let (beta1, beta2, eps) = (self.beta1, self.beta2, self.epsilon);
        let m = &mut self.m_weights[layer];
        let v = &mut self.v_weights[layer];

        m.zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        v.zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        ndarray::Zip::from(weights)
            .and(&*m)
            .and(&*v)
            .for_each(|w, &m, &v| *w -= learning_rate * (m / c1) / ((v / c2).sqrt() + eps));
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        let (c1, c2) = self.corrections();
        let (beta1, beta2, eps) = (self.beta1, self.beta2, self.epsilon);
        let m = &mut self.m_biases[layer];
        let v = &mut self.v_biases[layer];

        m.zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        v.zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        ndarray::Zip::from(biases)
            .and(&*m)
            .and(&*v)
            .for_each(|b, &m, &v| *b -= learning_rate * (m / c1) / ((v / c2).sqrt() + eps));
    }

    fn end_step(&mut self) {
        self.t += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activations::Activation;
    use ndarray::array;

    #[test]
    fn test_sgd_step() {
        let mut sgd = SGD::new();
        let mut w = array![[1.0, 2.0]];
        sgd.update_weights(0, &mut w, &array![[1.0, -1.0]], 0.5);
        assert_eq!(w, array![[0.5, 2.5]]);
    }

    #[test]
    fn test_adam_first_step_magnitude() {
        // With bias correction the first Adam step moves each parameter by ~lr.
        let layers = vec![DenseLayer::new(2, 1, Activation::Linear)];
        let mut adam = Adam::default(&layers);
        let mut w = array![[0.0], [0.0]];
        adam.update_weights(0, &mut w, &array![[3.0], [-0.5]], 0.01);
        adam.end_step();
        assert!((w[[0, 0]] + 0.01).abs() < 1e-4);
        assert!((w[[1, 0]] - 0.01).abs() < 1e-4);
        assert_eq!(adam.t, 2);
    }

    #[test]
    fn test_adam_keeps_layers_separate() {
        let layers = vec![
            DenseLayer::new(2, 3, Activation::Relu),
            DenseLayer::new(3, 1, Activation::Linear),
        ];
        let mut adam = Adam::default(&layers);
        let mut w0 = Array2::zeros((2, 3));
        let mut w1 = Array2::zeros((3, 1));
        adam.update_weights(0, &mut w0, &Array2::ones((2, 3)), 0.1);
        adam.update_weights(1, &mut w1, &Array2::ones((3, 1)), 0.1);
        assert!(w0.iter().all(|&v| v < 0.0));
        assert!(w1.iter().all(|&v| v < 0.0));
    }
}
