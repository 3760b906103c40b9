use std::path::PathBuf;

use super::layout::AgentSpace;
use super::maddpg::MaddpgAgent;
use crate::config::MaddpgConfig;
use crate::error::Result;
use crate::noise::NoiseProcess;
use crate::optimizer::OptimizerKind;

/// Builder for [`MaddpgAgent`]
pub struct MaddpgBuilder {
    spaces: Vec<AgentSpace>,
    agent_index: usize,
    config: MaddpgConfig,
    noise: Option<Box<dyn NoiseProcess>>,
}

impl MaddpgBuilder {
    pub fn new(spaces: Vec<AgentSpace>, agent_index: usize) -> Self {
        MaddpgBuilder {
            spaces,
            agent_index,
            config: MaddpgConfig::default(),
            noise: None,
        }
    }

    /// Start from an existing configuration instead of the defaults.
    pub fn config(mut self, config: MaddpgConfig) -> Self {
        self.config = config;
        self
    }

    pub fn gamma(mut self, gamma: f32) -> Self {
        self.config.gamma = gamma;
        self
    }

    pub fn tau(mut self, tau: f32) -> Self {
        self.config.tau = tau;
        self
    }

    pub fn learning_rates(mut self, actor_lr: f32, critic_lr: f32) -> Self {
        self.config.actor_lr = actor_lr;
        self.config.critic_lr = critic_lr;
        self
    }

    pub fn hidden_sizes(mut self, actor: Vec<usize>, critic: Vec<usize>) -> Self {
        self.config.actor_hidden = actor;
        self.config.critic_hidden = critic;
        self
    }

    pub fn optimizer(mut self, optimizer: OptimizerKind) -> Self {
        self.config.optimizer = optimizer;
        self
    }

    pub fn noise_std_dev(mut self, std_dev: f32) -> Self {
        self.config.noise_std_dev = std_dev;
        self
    }

    /// Custom exploration process; replaces the default Ornstein-Uhlenbeck one.
    pub fn noise(mut self, noise: Box<dyn NoiseProcess>) -> Self {
        self.noise = Some(noise);
        self
    }

    pub fn checkpoint_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.checkpoint_dir = dir.into();
        self
    }

    pub fn mask_terminal(mut self, mask: bool) -> Self {
        self.config.mask_terminal = mask;
        self
    }

    pub fn build(self) -> Result<MaddpgAgent> {
        let mut agent = MaddpgAgent::new(&self.spaces, self.agent_index, self.config)?;
        if let Some(noise) = self.noise {
            agent.set_noise(noise)?;
        }
        Ok(agent)
    }
}
