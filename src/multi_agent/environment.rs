use ndarray::Array1;

use crate::agent::AgentSpace;

/// Environment where every agent acts simultaneously with a continuous action.
pub trait ContinuousMultiAgentEnv {
    /// Observation and action space of each agent, in agent index order
    fn spaces(&self) -> Vec<AgentSpace>;

    /// Start a new episode; one observation per agent
    fn reset(&mut self) -> Vec<Array1<f32>>;

    /// Apply one action per agent
    fn step(&mut self, actions: &[Array1<f32>]) -> MultiAgentStep;

    fn num_agents(&self) -> usize {
        self.spaces().len()
    }
}

/// Result of one simultaneous step, indexed by agent
#[derive(Clone, Debug, PartialEq)]
pub struct MultiAgentStep {
    pub observations: Vec<Array1<f32>>,
    pub rewards: Vec<f32>,
    pub dones: Vec<bool>,
}

impl MultiAgentStep {
    pub fn new(observations: Vec<Array1<f32>>, rewards: Vec<f32>, dones: Vec<bool>) -> Self {
        Self {
            observations,
            rewards,
            dones,
        }
    }

    /// The episode ends as soon as any agent is done.
    pub fn is_terminal(&self) -> bool {
        self.dones.iter().any(|&d| d)
    }

    pub fn total_reward(&self) -> f32 {
        self.rewards.iter().sum()
    }

    /// Done flags as 0.0 / 1.0
    pub fn done_mask(&self) -> Array1<f32> {
        self.dones.iter().map(|&d| if d { 1.0 } else { 0.0 }).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    struct Counter {
        t: usize,
    }

    impl ContinuousMultiAgentEnv for Counter {
        fn spaces(&self) -> Vec<AgentSpace> {
            vec![AgentSpace::symmetric(1, 1, 1.0); 3]
        }

        fn reset(&mut self) -> Vec<Array1<f32>> {
            self.t = 0;
            vec![array![0.0]; 3]
        }

        fn step(&mut self, actions: &[Array1<f32>]) -> MultiAgentStep {
            self.t += 1;
            let rewards = actions.iter().map(|a| a[0]).collect();
            MultiAgentStep::new(vec![array![self.t as f32]; 3], rewards, vec![false, self.t >= 2, false])
        }
    }

    #[test]
    fn test_step_summary() {
        let mut env = Counter { t: 0 };
        assert_eq!(env.num_agents(), 3);
        env.reset();
        let step = env.step(&[array![0.5], array![0.25], array![-1.0]]);
        assert!(!step.is_terminal());
        assert_eq!(step.total_reward(), -0.25);
        let step = env.step(&[array![0.0], array![0.0], array![0.0]]);
        assert!(step.is_terminal());
        assert_eq!(step.done_mask(), array![0.0, 1.0, 0.0]);
    }
}
