use log::{debug, info, warn};
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use std::fs;

use super::checkpoint::NetworkSlot;
use super::layout::{AgentSegment, AgentSpace, JointLayout};
use super::variant::PolicyVariant;
use crate::batch::TransitionBatch;
use crate::config::MaddpgConfig;
use crate::error::{MaddpgError, Result};
use crate::metrics::UpdateStats;
use crate::models::{Actor, Critic, Differentiable};
use crate::network::{EvalMode, NeuralNetwork};
use crate::noise::{NoiseProcess, OrnsteinUhlenbeckNoise};

/// One actor and one critic belonging to the same parameter-set variant.
#[derive(Clone, Debug)]
pub struct NetworkPair {
    pub actor: Actor,
    pub critic: Critic,
}

/// MADDPG agent core.
///
/// Owns a decentralized actor over its own observation and a centralized
/// critic over the joint observation and joint action of every agent, each in
/// four variants (see [`PolicyVariant`]).
///
/// # Example
///
/// ```rust,no_run
/// use maddpg::agent::{AgentSpace, MaddpgAgent};
/// use maddpg::config::MaddpgConfig;
/// use ndarray::array;
///
/// let spaces = vec![AgentSpace::symmetric(3, 2, 1.0), AgentSpace::symmetric(2, 1, 1.0)];
/// let mut agent = MaddpgAgent::new(&spaces, 1, MaddpgConfig::default()).unwrap();
/// assert_eq!(agent.obs_start(), 3);
///
/// let action = agent.policy(array![0.1, -0.4].view(), "last").unwrap();
/// assert_eq!(action.len(), 1);
/// ```
pub struct MaddpgAgent {
    agent_index: usize,
    layout: JointLayout,
    segment: AgentSegment,
    action_low: f32,
    action_high: f32,
    config: MaddpgConfig,
    live: NetworkPair,
    target: NetworkPair,
    best_overall: NetworkPair,
    best_average: NetworkPair,
    noise: Box<dyn NoiseProcess>,
    train_steps: usize,
}

impl MaddpgAgent {
    /// Build agent `agent_index` for an environment whose agents have the given
    /// spaces, in index order.
    pub fn new(spaces: &[AgentSpace], agent_index: usize, config: MaddpgConfig) -> Result<Self> {
        config.validate()?;
        let layout = JointLayout::new(spaces)?;
        let segment = layout.segment(agent_index)?;
        let own = spaces[agent_index];

        let live = Self::build_pair(&own, &layout, &config)?;
        let target = live.clone();
        let best_overall = Self::build_pair(&own, &layout, &config)?;
        let best_average = Self::build_pair(&own, &layout, &config)?;
        let noise = OrnsteinUhlenbeckNoise::isotropic(own.act_dim, config.noise_std_dev)?;

        debug!(
            "agent {}: obs {:?} act {:?} of joint ({}, {}); actor {} critic {}",
            agent_index,
            segment.obs,
            segment.act,
            layout.total_obs(),
            layout.total_act(),
            live.actor.network.describe(),
            live.critic.network.describe(),
        );

        Ok(MaddpgAgent {
            agent_index,
            layout,
            segment,
            action_low: own.action_low,
            action_high: own.action_high,
            config,
            live,
            target,
            best_overall,
            best_average,
            noise: Box::new(noise),
            train_steps: 0,
        })
    }

    fn build_pair(own: &AgentSpace, layout: &JointLayout, config: &MaddpgConfig) -> Result<NetworkPair> {
        // tanh output scaled to the widest bound; clamping enforces the exact range
        let scale = own.action_high.abs().max(own.action_low.abs()).max(f32::EPSILON);
        Ok(NetworkPair {
            actor: Actor::new(own.obs_dim, own.act_dim, &config.actor_hidden, scale, config.optimizer)?,
            critic: Critic::new(layout.total_obs(), layout.total_act(), &config.critic_hidden, config.optimizer)?,
        })
    }

    pub fn agent_index(&self) -> usize {
        self.agent_index
    }

    pub fn layout(&self) -> &JointLayout {
        &self.layout
    }

    pub fn segment(&self) -> &AgentSegment {
        &self.segment
    }

    pub fn obs_start(&self) -> usize {
        self.segment.obs_start()
    }

    pub fn act_start(&self) -> usize {
        self.segment.act_start()
    }

    pub fn obs_dim(&self) -> usize {
        self.segment.obs_width()
    }

    pub fn act_dim(&self) -> usize {
        self.segment.act_width()
    }

    pub fn action_bounds(&self) -> (f32, f32) {
        (self.action_low, self.action_high)
    }

    pub fn config(&self) -> &MaddpgConfig {
        &self.config
    }

    /// Number of completed update steps.
    pub fn train_steps(&self) -> usize {
        self.train_steps
    }

    fn pair(&self, variant: PolicyVariant) -> &NetworkPair {
        match variant {
            PolicyVariant::Live => &self.live,
            PolicyVariant::Target => &self.target,
            PolicyVariant::BestOverall => &self.best_overall,
            PolicyVariant::BestAverage => &self.best_average,
        }
    }

    fn pair_mut(&mut self, variant: PolicyVariant) -> &mut NetworkPair {
        match variant {
            PolicyVariant::Live => &mut self.live,
            PolicyVariant::Target => &mut self.target,
            PolicyVariant::BestOverall => &mut self.best_overall,
            PolicyVariant::BestAverage => &mut self.best_average,
        }
    }

    pub fn actor(&self, variant: PolicyVariant) -> &Actor {
        &self.pair(variant).actor
    }

    pub fn critic(&self, variant: PolicyVariant) -> &Critic {
        &self.pair(variant).critic
    }

    pub fn network(&self, slot: NetworkSlot) -> &NeuralNetwork {
        match slot {
            NetworkSlot::Actor(v) => &self.pair(v).actor.network,
            NetworkSlot::Critic(v) => &self.pair(v).critic.network,
        }
    }

    pub fn network_mut(&mut self, slot: NetworkSlot) -> &mut NeuralNetwork {
        match slot {
            NetworkSlot::Actor(v) => &mut self.pair_mut(v).actor.network,
            NetworkSlot::Critic(v) => &mut self.pair_mut(v).critic.network,
        }
    }

    /// Replace the exploration process. Its width must match the action width.
    pub fn set_noise(&mut self, noise: Box<dyn NoiseProcess>) -> Result<()> {
        MaddpgError::check_width("noise process", self.act_dim(), noise.dim())?;
        self.noise = noise;
        Ok(())
    }

    pub fn reset_noise(&mut self) {
        self.noise.reset();
    }

    /// Action for a local observation from the chosen parameter set, clamped to
    /// the action bounds. With `explore` one noise sample is added first.
    pub fn act(&mut self, state: ArrayView1<f32>, variant: PolicyVariant, explore: bool) -> Result<Array1<f32>> {
        MaddpgError::check_width("observation", self.obs_dim(), state.len())?;
        let mut action = self.pair_mut(variant).actor.act(state)?;
        if explore {
            action += &self.noise.sample();
        }
        let (low, high) = (self.action_low, self.action_high);
        action.mapv_inplace(|a| a.clamp(low, high));
        Ok(action)
    }

    /// Exploring policy. `selector` is `"last"`, `"best_overall"` or
    /// `"best_average"`; any other value uses the live actor.
    pub fn policy(&mut self, state: ArrayView1<f32>, selector: &str) -> Result<Array1<f32>> {
        self.act(state, PolicyVariant::from_selector(selector), true)
    }

    /// Noise-free policy for evaluation; deterministic for fixed parameters.
    pub fn non_exploring_policy(&mut self, state: ArrayView1<f32>, selector: &str) -> Result<Array1<f32>> {
        self.act(state, PolicyVariant::from_selector(selector), false)
    }

    /// This agent's target-actor actions for its slice of a joint observation
    /// batch. The coordinator assembles these into the joint next actions.
    pub fn target_actions(&mut self, joint_states: ArrayView2<f32>) -> Result<Array2<f32>> {
        MaddpgError::check_width("joint state", self.layout.total_obs(), joint_states.ncols())?;
        let local = self.segment.own_observations(joint_states);
        self.target.actor.evaluate(local, self.config.target_eval_mode)
    }

    /// One MADDPG step: critic update, actor update, then target tracking.
    ///
    /// `joint_next_actions` holds every agent's target-actor prediction for
    /// `batch.next_states`; this agent's own columns are recomputed here.
    pub fn perform_update_step(
        &mut self,
        batch: &TransitionBatch,
        joint_next_actions: ArrayView2<f32>,
    ) -> Result<UpdateStats> {
        batch.check_layout(&self.layout)?;
        if joint_next_actions.dim() != (batch.len(), self.layout.total_act()) {
            return Err(MaddpgError::dimension_mismatch(
                format!("joint next actions of shape ({}, {})", batch.len(), self.layout.total_act()),
                format!("{:?}", joint_next_actions.dim()),
            ));
        }

        let critic_loss = self.update_critic(batch, joint_next_actions)?;
        let actor_loss = self.update_actor(batch)?;
        self.update_targets()?;
        self.train_steps += 1;

        let stats = UpdateStats { critic_loss, actor_loss };
        if stats.is_finite() {
            debug!(
                "agent {} step {}: critic loss {:.6}, actor loss {:.6}",
                self.agent_index, self.train_steps, critic_loss, actor_loss
            );
        } else {
            warn!(
                "agent {} step {}: non-finite losses (critic {}, actor {})",
                self.agent_index, self.train_steps, critic_loss, actor_loss
            );
        }
        Ok(stats)
    }

    fn update_critic(&mut self, batch: &TransitionBatch, joint_next_actions: ArrayView2<f32>) -> Result<f32> {
        let mode = self.config.target_eval_mode;
        let batch_size = batch.len() as f32;

        let local_next_states = self.segment.own_observations(batch.next_states.view());
        let own_next_actions = self.target.actor.evaluate(local_next_states, mode)?;
        let mut next_actions = joint_next_actions.to_owned();
        self.segment.splice_actions(&mut next_actions, own_next_actions.view())?;

        let bootstrap = self
            .target
            .critic
            .value(batch.next_states.view(), next_actions.view(), mode)?
            .index_axis_move(Axis(1), 0);
        let mut y = bootstrap * self.config.gamma;
        if self.config.mask_terminal {
            y.zip_mut_with(&batch.dones_of(self.agent_index), |v, &done| *v *= 1.0 - done);
        }
        y += &batch.rewards_of(self.agent_index);

        let q = self
            .live
            .critic
            .value(batch.states.view(), batch.actions.view(), EvalMode::Train)?
            .index_axis_move(Axis(1), 0);
        let td_error = &q - &y;
        let loss = td_error.mapv(|d| d * d).sum() / batch_size;

        let value_grads = (td_error * (2.0 / batch_size)).insert_axis(Axis(1));
        let (_, gradients) = self.live.critic.backward(value_grads.view())?;
        self.live.critic.apply_gradients(&gradients, self.config.critic_lr)?;
        Ok(loss)
    }

    fn update_actor(&mut self, batch: &TransitionBatch) -> Result<f32> {
        let batch_size = batch.len();

        let local_states = self.segment.own_observations(batch.states.view());
        let own_actions = self.live.actor.evaluate(local_states, EvalMode::Train)?;
        let mut actions = batch.actions.clone();
        self.segment.splice_actions(&mut actions, own_actions.view())?;

        let q = self.live.critic.value(batch.states.view(), actions.view(), EvalMode::Train)?;
        let loss = -q.sum() / batch_size as f32;

        // The critic only supplies dQ/da here; its parameter gradients are dropped.
        let value_grads = Array2::from_elem((batch_size, 1), -1.0 / batch_size as f32);
        let (action_grads, _) = self.live.critic.backward(value_grads.view())?;
        let own_grads = action_grads.slice(s![.., self.segment.act.clone()]);
        let gradients = self.live.actor.backward(own_grads)?;
        self.live.actor.apply_gradients(&gradients, self.config.actor_lr)?;
        Ok(loss)
    }

    fn update_targets(&mut self) -> Result<()> {
        let tau = self.config.tau;
        self.target.actor.soft_update_from(&self.live.actor, tau)?;
        self.target.critic.soft_update_from(&self.live.critic, tau)?;
        Ok(())
    }

    /// Snapshot the live networks as the best running-average set.
    pub fn cache_best_average(&mut self) {
        self.best_average = self.live.clone();
    }

    /// Snapshot the live networks as the best single-episode set.
    pub fn cache_best_single(&mut self) {
        self.best_overall = self.live.clone();
    }

    /// Write all eight networks under `checkpoint_dir/maddpg{suffix}/`.
    pub fn save_models(&self, suffix: &str) -> Result<()> {
        let dir = self.config.checkpoint_path(suffix);
        fs::create_dir_all(&dir)?;
        for slot in NetworkSlot::ALL {
            self.network(slot).save(dir.join(slot.file_name()))?;
        }
        info!("agent {}: saved networks to {}", self.agent_index, dir.display());
        Ok(())
    }

    /// Restore all eight networks written by [`MaddpgAgent::save_models`].
    ///
    /// Every file is read and checked before anything is replaced, so a
    /// failed load leaves the agent untouched.
    pub fn load_models(&mut self, suffix: &str) -> Result<()> {
        let dir = self.config.checkpoint_path(suffix);
        let mut loaded = Vec::with_capacity(NetworkSlot::ALL.len());
        for slot in NetworkSlot::ALL {
            let network = NeuralNetwork::load(dir.join(slot.file_name()))?;
            let current = self.network(slot);
            if !current.same_architecture(&network) {
                return Err(MaddpgError::dimension_mismatch(
                    format!("{} with layers {}", slot, current.describe()),
                    network.describe(),
                ));
            }
            loaded.push((slot, network));
        }
        for (slot, network) in loaded {
            *self.network_mut(slot) = network;
        }
        info!("agent {}: loaded networks from {}", self.agent_index, dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn small_config() -> MaddpgConfig {
        MaddpgConfig {
            actor_hidden: vec![8],
            critic_hidden: vec![8],
            batch_size: 4,
            buffer_size: 100,
            ..MaddpgConfig::default()
        }
    }

    fn spaces() -> Vec<AgentSpace> {
        vec![AgentSpace::symmetric(3, 2, 1.0), AgentSpace::symmetric(2, 1, 2.0)]
    }

    fn random_batch(rows: usize) -> TransitionBatch {
        use ndarray_rand::rand_distr::Uniform;
        use ndarray_rand::RandomExt;
        let u = Uniform::new(-1.0f32, 1.0);
        TransitionBatch::new(
            Array2::random((rows, 5), u),
            Array2::random((rows, 3), u),
            Array2::random((rows, 2), u),
            Array2::random((rows, 5), u),
            Array2::zeros((rows, 2)),
        )
        .unwrap()
    }

    #[test]
    fn test_layout_offsets() {
        let agent = MaddpgAgent::new(&spaces(), 1, small_config()).unwrap();
        assert_eq!(agent.obs_start(), 3);
        assert_eq!(agent.act_start(), 2);
        assert_eq!(agent.layout().total_obs(), 5);
        assert_eq!(agent.layout().total_act(), 3);
        assert_eq!(agent.critic(PolicyVariant::Live).network.input_size(), 8);
    }

    #[test]
    fn test_construction_errors() {
        assert!(MaddpgAgent::new(&spaces(), 2, small_config()).is_err());
        let bad = MaddpgConfig { tau: 1.5, ..small_config() };
        assert!(MaddpgAgent::new(&spaces(), 0, bad).is_err());
    }

    #[test]
    fn test_target_equals_live_after_construction() {
        let agent = MaddpgAgent::new(&spaces(), 0, small_config()).unwrap();
        assert_eq!(
            agent.actor(PolicyVariant::Live).parameters(),
            agent.actor(PolicyVariant::Target).parameters()
        );
        assert_eq!(
            agent.critic(PolicyVariant::Live).parameters(),
            agent.critic(PolicyVariant::Target).parameters()
        );
    }

    #[test]
    fn test_policy_respects_bounds_and_width() {
        let config = MaddpgConfig { noise_std_dev: 50.0, ..small_config() };
        let mut agent = MaddpgAgent::new(&spaces(), 1, config).unwrap();
        for _ in 0..20 {
            let a = agent.policy(array![0.3, -0.7].view(), "last").unwrap();
            assert_eq!(a.len(), 1);
            assert!(a.iter().all(|v| (-2.0..=2.0).contains(v)));
        }
        assert!(agent.policy(array![0.3].view(), "last").is_err());
    }

    #[test]
    fn test_non_exploring_is_deterministic() {
        let mut agent = MaddpgAgent::new(&spaces(), 0, small_config()).unwrap();
        let obs = array![0.2, 0.1, -0.3];
        let a = agent.non_exploring_policy(obs.view(), "best_average").unwrap();
        let b = agent.non_exploring_policy(obs.view(), "best_average").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_selector_uses_live() {
        let mut agent = MaddpgAgent::new(&spaces(), 0, small_config()).unwrap();
        let obs = array![0.2, 0.1, -0.3];
        let live = agent.non_exploring_policy(obs.view(), "last").unwrap();
        let fallback = agent.non_exploring_policy(obs.view(), "no-such-policy").unwrap();
        assert_eq!(live, fallback);
    }

    #[test]
    fn test_cache_best_single_reproduces_live() {
        let mut agent = MaddpgAgent::new(&spaces(), 0, small_config()).unwrap();
        let batch = random_batch(4);
        let next = Array2::zeros((4, 3));
        agent.perform_update_step(&batch, next.view()).unwrap();
        agent.cache_best_single();
        let obs = array![0.5, -0.5, 0.25];
        assert_eq!(
            agent.non_exploring_policy(obs.view(), "best_overall").unwrap(),
            agent.non_exploring_policy(obs.view(), "last").unwrap()
        );
        agent.cache_best_average();
        assert_eq!(
            agent.critic(PolicyVariant::BestAverage).parameters(),
            agent.critic(PolicyVariant::Live).parameters()
        );
    }

    #[test]
    fn test_update_moves_targets_towards_live() {
        let mut agent = MaddpgAgent::new(&spaces(), 0, small_config()).unwrap();
        let old_target = agent.critic(PolicyVariant::Target).parameters();
        let batch = random_batch(8);
        let next = Array2::zeros((8, 3));
        agent.perform_update_step(&batch, next.view()).unwrap();

        let live = agent.critic(PolicyVariant::Live).parameters();
        let new_target = agent.critic(PolicyVariant::Target).parameters();
        for ((&old, &l), &new) in old_target.iter().zip(live.iter()).zip(new_target.iter()) {
            let (lo, hi) = if old <= l { (old, l) } else { (l, old) };
            assert!(new >= lo - 1e-6 && new <= hi + 1e-6);
            assert!((new - (0.01 * l + 0.99 * old)).abs() < 1e-6);
        }
        assert_eq!(agent.train_steps(), 1);
    }

    #[test]
    fn test_actor_step_leaves_critic_untouched() {
        let mut agent = MaddpgAgent::new(&spaces(), 1, small_config()).unwrap();
        let batch = random_batch(8);
        let critic_before = agent.critic(PolicyVariant::Live).parameters();
        let actor_before = agent.actor(PolicyVariant::Live).parameters();
        agent.update_actor(&batch).unwrap();
        assert_eq!(agent.critic(PolicyVariant::Live).parameters(), critic_before);
        assert_ne!(agent.actor(PolicyVariant::Live).parameters(), actor_before);
    }

    #[test]
    fn test_target_actions_follow_configured_mode() {
        let states = Array2::from_elem((3, 5), 0.2);
        let grads = Array2::ones((3, 1));

        let mut train = MaddpgAgent::new(&spaces(), 1, small_config()).unwrap();
        train.target_actions(states.view()).unwrap();
        assert!(train.target.actor.backward(grads.view()).is_ok());

        let inference = MaddpgConfig { target_eval_mode: EvalMode::Inference, ..small_config() };
        let mut inference = MaddpgAgent::new(&spaces(), 1, inference).unwrap();
        inference.target_actions(states.view()).unwrap();
        assert!(inference.target.actor.backward(grads.view()).is_err());
    }

    #[test]
    fn test_critic_loss_matches_td_target() {
        let mut agent = MaddpgAgent::new(&spaces(), 1, small_config()).unwrap();
        let batch = random_batch(6);
        // own columns hold junk that must be replaced by the target actor
        let mut joint_next = Array2::from_elem((6, 3), 0.25);
        joint_next.slice_mut(s![.., 2..3]).fill(99.0);

        let mut target_actor = agent.target.actor.clone();
        let mut target_critic = agent.target.critic.clone();
        let mut live_critic = agent.live.critic.clone();
        let actor_before = agent.live.actor.parameters();

        let own_next = target_actor
            .evaluate(batch.next_states.slice(s![.., 3..5]), EvalMode::Train)
            .unwrap();
        let mut next_actions = joint_next.clone();
        next_actions.slice_mut(s![.., 2..3]).assign(&own_next);
        let q_next = target_critic
            .value(batch.next_states.view(), next_actions.view(), EvalMode::Train)
            .unwrap()
            .column(0)
            .to_owned();
        let q = live_critic
            .value(batch.states.view(), batch.actions.view(), EvalMode::Train)
            .unwrap()
            .column(0)
            .to_owned();
        let mse = |rewards: Array1<f32>| {
            let y = rewards + &q_next * 0.95;
            (&q - &y).mapv(|d| d * d).mean().unwrap()
        };
        let expected = mse(batch.rewards.column(1).to_owned());
        assert!((mse(batch.rewards.column(0).to_owned()) - expected).abs() > 1e-6);

        let loss = agent.update_critic(&batch, joint_next.view()).unwrap();
        assert!(
            (loss - expected).abs() <= 1e-5 * expected.abs().max(1.0),
            "expected {} got {}",
            expected,
            loss
        );
        assert_eq!(agent.live.actor.parameters(), actor_before);
        assert_ne!(agent.live.critic.parameters(), live_critic.parameters());
        assert!(joint_next.slice(s![.., 2..3]).iter().all(|&v| v == 99.0));
    }

    #[test]
    fn test_actor_step_raises_critic_value() {
        let config = MaddpgConfig { actor_lr: 0.005, ..small_config() };
        let mut agent = MaddpgAgent::new(&spaces(), 1, config).unwrap();
        let batch = random_batch(16);
        let mean_q = |agent: &mut MaddpgAgent| {
            let own = agent
                .live
                .actor
                .evaluate(batch.states.slice(s![.., 3..5]), EvalMode::Inference)
                .unwrap();
            let mut actions = batch.actions.clone();
            actions.slice_mut(s![.., 2..3]).assign(&own);
            agent
                .live
                .critic
                .value(batch.states.view(), actions.view(), EvalMode::Inference)
                .unwrap()
                .mean()
                .unwrap()
        };
        let before = mean_q(&mut agent);
        let loss = agent.update_actor(&batch).unwrap();
        assert!((loss + before).abs() < 1e-5);
        let after = mean_q(&mut agent);
        assert!(after > before, "mean Q went from {} to {}", before, after);
    }

    #[test]
    fn test_terminal_mask_changes_critic_target() {
        let masked = MaddpgConfig { mask_terminal: true, ..small_config() };
        let mut plain = MaddpgAgent::new(&spaces(), 0, small_config()).unwrap();
        let mut with_mask = MaddpgAgent::new(&spaces(), 0, masked).unwrap();
        for slot in NetworkSlot::ALL {
            *with_mask.network_mut(slot) = plain.network(slot).clone();
        }
        let mut batch = random_batch(4);
        batch.dones.fill(1.0);
        let next = Array2::zeros((4, 3));
        let a = plain.update_critic(&batch, next.view()).unwrap();
        let b = with_mask.update_critic(&batch, next.view()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_tau_one_is_hard_copy() {
        let config = MaddpgConfig { tau: 1.0, ..small_config() };
        let mut agent = MaddpgAgent::new(&spaces(), 1, config).unwrap();
        let batch = random_batch(4);
        agent.perform_update_step(&batch, Array2::zeros((4, 3)).view()).unwrap();
        assert_eq!(
            agent.actor(PolicyVariant::Target).parameters(),
            agent.actor(PolicyVariant::Live).parameters()
        );
        assert_eq!(
            agent.critic(PolicyVariant::Target).parameters(),
            agent.critic(PolicyVariant::Live).parameters()
        );
    }

    #[test]
    fn test_update_rejects_bad_shapes() {
        let mut agent = MaddpgAgent::new(&spaces(), 0, small_config()).unwrap();
        let batch = random_batch(4);
        assert!(agent.perform_update_step(&batch, Array2::zeros((4, 2)).view()).is_err());
        assert!(agent.perform_update_step(&batch, Array2::zeros((3, 3)).view()).is_err());
        assert_eq!(agent.train_steps(), 0);
    }

    #[test]
    fn test_critic_loss_decreases_on_fixed_batch() {
        let config = MaddpgConfig { critic_lr: 0.01, ..small_config() };
        let mut agent = MaddpgAgent::new(&spaces(), 0, config).unwrap();
        let batch = random_batch(16);
        let next = Array2::zeros((16, 3));
        let first = agent.perform_update_step(&batch, next.view()).unwrap().critic_loss;
        let mut last = first;
        for _ in 0..200 {
            last = agent.perform_update_step(&batch, next.view()).unwrap().critic_loss;
        }
        assert!(last < first, "critic loss {} did not drop below {}", last, first);
    }

    #[test]
    fn test_set_noise_checks_width() {
        let mut agent = MaddpgAgent::new(&spaces(), 0, small_config()).unwrap();
        let wrong = OrnsteinUhlenbeckNoise::isotropic(3, 0.1).unwrap();
        assert!(agent.set_noise(Box::new(wrong)).is_err());
        let right = OrnsteinUhlenbeckNoise::isotropic(2, 0.1).unwrap();
        assert!(agent.set_noise(Box::new(right)).is_ok());
    }

    #[test]
    fn test_target_actions_shape() {
        let mut agent = MaddpgAgent::new(&spaces(), 1, small_config()).unwrap();
        let states = Array2::zeros((6, 5));
        assert_eq!(agent.target_actions(states.view()).unwrap().dim(), (6, 1));
        assert!(agent.target_actions(Array2::zeros((6, 4)).view()).is_err());
    }
}
