//! # Exploration Noise
//!
//! Stateful processes that produce one perturbation vector per call, matching
//! the action width of the agent that owns them.

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::{MaddpgError, Result};

pub trait NoiseProcess: Send {
    /// Draw the next perturbation.
    fn sample(&mut self) -> Array1<f32>;

    /// Return the process to its initial state.
    fn reset(&mut self);

    /// Width of every sample.
    fn dim(&self) -> usize;
}

fn check_std_dev(std_dev: &Array1<f32>) -> Result<()> {
    if std_dev.iter().all(|s| s.is_finite() && *s >= 0.0) {
        Ok(())
    } else {
        Err(MaddpgError::invalid_parameter(
            "std_dev",
            "every component must be finite and non-negative",
        ))
    }
}

/// Ornstein-Uhlenbeck process, temporally correlated noise for continuous
/// control:
///
/// `x ← x + θ (μ − x) dt + σ √dt · N(0, 1)`
pub struct OrnsteinUhlenbeckNoise {
    pub mean: Array1<f32>,
    pub std_dev: Array1<f32>,
    pub theta: f32,
    pub dt: f32,
    initial: Array1<f32>,
    state: Array1<f32>,
    rng: StdRng,
}

impl OrnsteinUhlenbeckNoise {
    pub fn new(mean: Array1<f32>, std_dev: Array1<f32>) -> Result<Self> {
        MaddpgError::check_width("noise std_dev", mean.len(), std_dev.len())?;
        check_std_dev(&std_dev)?;
        let initial = Array1::zeros(mean.len());
        Ok(OrnsteinUhlenbeckNoise {
            state: initial.clone(),
            initial,
            mean,
            std_dev,
            theta: 0.15,
            dt: 1e-2,
            rng: StdRng::from_entropy(),
        })
    }

    /// Zero-mean process with the same `std_dev` in every dimension.
    pub fn isotropic(dim: usize, std_dev: f32) -> Result<Self> {
        Self::new(Array1::zeros(dim), Array1::from_elem(dim, std_dev))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_initial_state(mut self, initial: Array1<f32>) -> Result<Self> {
        MaddpgError::check_width("noise initial state", self.mean.len(), initial.len())?;
        self.state = initial.clone();
        self.initial = initial;
        Ok(self)
    }
}

impl NoiseProcess for OrnsteinUhlenbeckNoise {
    fn sample(&mut self) -> Array1<f32> {
        let sqrt_dt = self.dt.sqrt();
        for i in 0..self.state.len() {
            let gaussian: f32 = self.rng.sample(StandardNormal);
            let x = self.state[i];
            self.state[i] = x + self.theta * (self.mean[i] - x) * self.dt + self.std_dev[i] * sqrt_dt * gaussian;
        }
        self.state.clone()
    }

    fn reset(&mut self) {
        self.state.assign(&self.initial);
    }

    fn dim(&self) -> usize {
        self.state.len()
    }
}

/// Independent zero-mean Gaussian noise per call.
pub struct GaussianNoise {
    pub std_dev: Array1<f32>,
    rng: StdRng,
}

impl GaussianNoise {
    pub fn new(std_dev: Array1<f32>) -> Result<Self> {
        check_std_dev(&std_dev)?;
        Ok(GaussianNoise {
            std_dev,
            rng: StdRng::from_entropy(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl NoiseProcess for GaussianNoise {
    fn sample(&mut self) -> Array1<f32> {
        let rng = &mut self.rng;
        self.std_dev.mapv(|s| s * rng.sample::<f32, _>(StandardNormal))
    }

    fn reset(&mut self) {}

    fn dim(&self) -> usize {
        self.std_dev.len()
    }
}
