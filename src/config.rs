//! Hyperparameters shared by every agent of a training run.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MaddpgError, Result};
use crate::network::EvalMode;
use crate::optimizer::OptimizerKind;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MaddpgConfig {
    /// Discount factor, in (0, 1)
    pub gamma: f32,
    /// Target tracking rate, in (0, 1]
    pub tau: f32,
    pub critic_lr: f32,
    pub actor_lr: f32,
    /// Standard deviation of the exploration noise
    pub noise_std_dev: f32,
    /// Replay capacity; consumed by the replay buffer, not the agent
    pub buffer_size: usize,
    pub batch_size: usize,
    pub actor_hidden: Vec<usize>,
    pub critic_hidden: Vec<usize>,
    pub optimizer: OptimizerKind,
    /// Base directory for checkpoints, resolved when saving or loading
    pub checkpoint_dir: PathBuf,
    /// Mode used when evaluating the target networks for TD targets
    pub target_eval_mode: EvalMode,
    /// Multiply the bootstrapped value by `1 - done`
    pub mask_terminal: bool,
}

impl Default for MaddpgConfig {
    fn default() -> Self {
        MaddpgConfig {
            gamma: 0.95,
            tau: 0.01,
            critic_lr: 0.002,
            actor_lr: 0.001,
            noise_std_dev: 0.02,
            buffer_size: 10_000_000,
            batch_size: 1024,
            actor_hidden: vec![256, 256],
            critic_hidden: vec![256, 256],
            optimizer: OptimizerKind::Adam,
            checkpoint_dir: PathBuf::from("./weights"),
            target_eval_mode: EvalMode::Train,
            mask_terminal: false,
        }
    }
}

impl MaddpgConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.gamma > 0.0 && self.gamma < 1.0) {
            return Err(invalid("gamma", format!("must lie in (0, 1), got {}", self.gamma)));
        }
        if !(self.tau > 0.0 && self.tau <= 1.0) {
            return Err(invalid("tau", format!("must lie in (0, 1], got {}", self.tau)));
        }
        for (name, lr) in [("critic_lr", self.critic_lr), ("actor_lr", self.actor_lr)] {
            if !(lr.is_finite() && lr > 0.0) {
                return Err(invalid(name, format!("must be positive, got {}", lr)));
            }
        }
        if !(self.noise_std_dev.is_finite() && self.noise_std_dev >= 0.0) {
            return Err(invalid(
                "noise_std_dev",
                format!("must be non-negative, got {}", self.noise_std_dev),
            ));
        }
        if self.batch_size == 0 {
            return Err(invalid("batch_size", "must be at least 1".to_string()));
        }
        if self.buffer_size < self.batch_size {
            return Err(invalid(
                "buffer_size",
                format!("{} cannot hold a batch of {}", self.buffer_size, self.batch_size),
            ));
        }
        for (name, hidden) in [("actor_hidden", &self.actor_hidden), ("critic_hidden", &self.critic_hidden)] {
            if hidden.iter().any(|&h| h == 0) {
                return Err(invalid(name, "hidden layer sizes must be non-zero".to_string()));
            }
        }
        Ok(())
    }

    /// Directory holding one agent's checkpoint files for `suffix`.
    pub fn checkpoint_path(&self, suffix: &str) -> PathBuf {
        self.checkpoint_dir.join(format!("maddpg{}", suffix))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: MaddpgConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn invalid(name: &str, reason: String) -> MaddpgError {
    MaddpgError::InvalidParameter {
        name: name.to_string(),
        reason,
    }
}
