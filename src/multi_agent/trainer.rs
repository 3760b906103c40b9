use log::{debug, info};
use ndarray::{s, Array1, Array2};

use super::environment::{ContinuousMultiAgentEnv, MultiAgentStep};
use crate::agent::{AgentSpace, JointLayout, MaddpgAgent, PolicyVariant};
use crate::batch::TransitionBatch;
use crate::config::MaddpgConfig;
use crate::error::{MaddpgError, Result};
use crate::metrics::{RewardTracker, UpdateStats};
use crate::replay_buffer::{JointReplayBuffer, JointTransition};

/// Runs a team of [`MaddpgAgent`]s against one environment: collects joint
/// transitions, drives the per-agent updates and keeps the best-policy
/// snapshots current.
pub struct MaddpgTrainer {
    agents: Vec<MaddpgAgent>,
    layout: JointLayout,
    buffer: JointReplayBuffer,
    batch_size: usize,
    tracker: RewardTracker,
}

impl MaddpgTrainer {
    pub fn new(spaces: &[AgentSpace], config: MaddpgConfig) -> Result<Self> {
        config.validate()?;
        let layout = JointLayout::new(spaces)?;
        let agents = (0..spaces.len())
            .map(|i| MaddpgAgent::new(spaces, i, config.clone()))
            .collect::<Result<Vec<_>>>()?;
        info!(
            "MADDPG team of {} agents, joint observation {} joint action {}",
            agents.len(),
            layout.total_obs(),
            layout.total_act()
        );
        Ok(MaddpgTrainer {
            agents,
            layout,
            buffer: JointReplayBuffer::new(config.buffer_size),
            batch_size: config.batch_size,
            tracker: RewardTracker::default(),
        })
    }

    pub fn agents(&self) -> &[MaddpgAgent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [MaddpgAgent] {
        &mut self.agents
    }

    pub fn agent(&self, index: usize) -> Result<&MaddpgAgent> {
        self.agents.get(index).ok_or(MaddpgError::UnknownAgent {
            index,
            num_agents: self.agents.len(),
        })
    }

    pub fn layout(&self) -> &JointLayout {
        &self.layout
    }

    pub fn buffer(&self) -> &JointReplayBuffer {
        &self.buffer
    }

    pub fn tracker(&self) -> &RewardTracker {
        &self.tracker
    }

    /// One action per agent from its own observation.
    pub fn act_all(
        &mut self,
        observations: &[Array1<f32>],
        variant: PolicyVariant,
        explore: bool,
    ) -> Result<Vec<Array1<f32>>> {
        MaddpgError::check_width("observation list", self.agents.len(), observations.len())?;
        self.agents
            .iter_mut()
            .zip(observations)
            .map(|(agent, obs)| agent.act(obs.view(), variant, explore))
            .collect()
    }

    /// Store one step of the environment in the shared replay buffer.
    pub fn remember(
        &mut self,
        observations: &[Array1<f32>],
        actions: &[Array1<f32>],
        step: &MultiAgentStep,
    ) -> Result<()> {
        let n = self.layout.num_agents();
        MaddpgError::check_width("reward list", n, step.rewards.len())?;
        MaddpgError::check_width("done list", n, step.dones.len())?;
        let transition = JointTransition::new(
            self.layout.join_observations(observations)?,
            self.layout.join_actions(actions)?,
            Array1::from(step.rewards.clone()),
            self.layout.join_observations(&step.observations)?,
            step.done_mask(),
        );
        self.buffer.add(transition);
        Ok(())
    }

    /// Every agent's target-actor prediction for `batch.next_states`, assembled
    /// into the joint action layout.
    pub fn joint_next_actions(&mut self, batch: &TransitionBatch) -> Result<Array2<f32>> {
        batch.check_layout(&self.layout)?;
        let mut joint = Array2::zeros((batch.len(), self.layout.total_act()));
        for agent in self.agents.iter_mut() {
            let actions = agent.target_actions(batch.next_states.view())?;
            let columns = agent.segment().act.clone();
            joint.slice_mut(s![.., columns]).assign(&actions);
        }
        Ok(joint)
    }

    /// Sample one batch and update every agent on it.
    ///
    /// Next actions are predicted once, before any agent changes, so every
    /// agent trains against the same target snapshot. Returns `None` until
    /// the buffer holds a full batch.
    pub fn train_step(&mut self) -> Result<Option<Vec<UpdateStats>>> {
        if !self.buffer.can_sample(self.batch_size) {
            return Ok(None);
        }
        let batch = self.buffer.sample(self.batch_size)?;
        let next_actions = self.joint_next_actions(&batch)?;
        let stats = self
            .agents
            .iter_mut()
            .map(|agent| agent.perform_update_step(&batch, next_actions.view()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(stats))
    }

    /// Play one episode and return the reward summed over agents and steps.
    ///
    /// With `learn`, transitions are stored, an update runs after every step,
    /// and the episode counts towards the best-policy snapshots.
    pub fn run_episode<E: ContinuousMultiAgentEnv>(
        &mut self,
        env: &mut E,
        max_steps: usize,
        variant: PolicyVariant,
        explore: bool,
        learn: bool,
    ) -> Result<f32> {
        for agent in self.agents.iter_mut() {
            agent.reset_noise();
        }
        let mut observations = env.reset();
        let mut episode_reward = 0.0;

        for _ in 0..max_steps {
            let actions = self.act_all(&observations, variant, explore)?;
            let step = env.step(&actions);
            MaddpgError::check_width("environment observations", self.agents.len(), step.observations.len())?;
            episode_reward += step.total_reward();

            if learn {
                self.remember(&observations, &actions, &step)?;
                self.train_step()?;
            }
            let terminal = step.is_terminal();
            observations = step.observations;
            if terminal {
                break;
            }
        }

        if learn {
            self.record_episode(episode_reward);
        }
        Ok(episode_reward)
    }

    fn record_episode(&mut self, episode_reward: f32) {
        let best = self.tracker.record(episode_reward);
        if best.single {
            info!("episode {}: new best reward {:.3}", self.tracker.episodes(), episode_reward);
            for agent in self.agents.iter_mut() {
                agent.cache_best_single();
            }
        }
        if best.average {
            debug!(
                "episode {}: new best moving average {:.3}",
                self.tracker.episodes(),
                self.tracker.moving_average()
            );
            for agent in self.agents.iter_mut() {
                agent.cache_best_average();
            }
        }
    }

    /// Save every agent under `suffix_agent{i}`.
    pub fn save_all(&self, suffix: &str) -> Result<()> {
        for (i, agent) in self.agents.iter().enumerate() {
            agent.save_models(&format!("{}_agent{}", suffix, i))?;
        }
        Ok(())
    }

    pub fn load_all(&mut self, suffix: &str) -> Result<()> {
        for (i, agent) in self.agents.iter_mut().enumerate() {
            agent.load_models(&format!("{}_agent{}", suffix, i))?;
        }
        Ok(())
    }
}
