use ndarray::{Array2, ArrayView1};

use crate::agent::JointLayout;
use crate::error::{MaddpgError, Result};

/// A batch of joint transitions, one row per transition.
///
/// | field         | shape                  |
/// |---------------|------------------------|
/// | `states`      | `(batch, total_obs)`   |
/// | `actions`     | `(batch, total_act)`   |
/// | `rewards`     | `(batch, num_agents)`  |
/// | `next_states` | `(batch, total_obs)`   |
/// | `dones`       | `(batch, num_agents)`  |
///
/// `dones` holds 1.0 for terminal transitions and 0.0 otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionBatch {
    pub states: Array2<f32>,
    pub actions: Array2<f32>,
    pub rewards: Array2<f32>,
    pub next_states: Array2<f32>,
    pub dones: Array2<f32>,
}

impl TransitionBatch {
    pub fn new(
        states: Array2<f32>,
        actions: Array2<f32>,
        rewards: Array2<f32>,
        next_states: Array2<f32>,
        dones: Array2<f32>,
    ) -> Result<Self> {
        let batch = TransitionBatch {
            states,
            actions,
            rewards,
            next_states,
            dones,
        };
        let rows = batch.len();
        for (name, n) in [
            ("actions", batch.actions.nrows()),
            ("rewards", batch.rewards.nrows()),
            ("next_states", batch.next_states.nrows()),
            ("dones", batch.dones.nrows()),
        ] {
            if n != rows {
                return Err(MaddpgError::dimension_mismatch(
                    format!("{} rows in {}", rows, name),
                    format!("{}", n),
                ));
            }
        }
        Ok(batch)
    }

    pub fn len(&self) -> usize {
        self.states.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reward column of one agent.
    pub fn rewards_of(&self, agent_index: usize) -> ArrayView1<'_, f32> {
        self.rewards.column(agent_index)
    }

    /// Done column of one agent.
    pub fn dones_of(&self, agent_index: usize) -> ArrayView1<'_, f32> {
        self.dones.column(agent_index)
    }

    /// Check every column count against the joint layout.
    pub fn check_layout(&self, layout: &JointLayout) -> Result<()> {
        if self.is_empty() {
            return Err(MaddpgError::EmptyBuffer("transition batch has no rows".to_string()));
        }
        MaddpgError::check_width("joint state", layout.total_obs(), self.states.ncols())?;
        MaddpgError::check_width("joint action", layout.total_act(), self.actions.ncols())?;
        MaddpgError::check_width("reward", layout.num_agents(), self.rewards.ncols())?;
        MaddpgError::check_width("joint next state", layout.total_obs(), self.next_states.ncols())?;
        MaddpgError::check_width("done", layout.num_agents(), self.dones.ncols())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentSpace;

    fn batch(rows: usize) -> TransitionBatch {
        TransitionBatch::new(
            Array2::zeros((rows, 5)),
            Array2::zeros((rows, 3)),
            Array2::zeros((rows, 2)),
            Array2::zeros((rows, 5)),
            Array2::zeros((rows, 2)),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_row_mismatch() {
        let res = TransitionBatch::new(
            Array2::zeros((4, 5)),
            Array2::zeros((3, 3)),
            Array2::zeros((4, 2)),
            Array2::zeros((4, 5)),
            Array2::zeros((4, 2)),
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_check_layout() {
        let layout = JointLayout::new(&[AgentSpace::symmetric(3, 2, 1.0), AgentSpace::symmetric(2, 1, 1.0)]).unwrap();
        assert!(batch(4).check_layout(&layout).is_ok());
        assert!(matches!(batch(0).check_layout(&layout), Err(MaddpgError::EmptyBuffer(_))));

        let wide = JointLayout::new(&[AgentSpace::symmetric(4, 2, 1.0), AgentSpace::symmetric(2, 1, 1.0)]).unwrap();
        assert!(batch(4).check_layout(&wide).is_err());
    }
}
