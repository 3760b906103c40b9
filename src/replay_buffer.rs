use ndarray::{Array1, Array2};
use rand::seq::index;
use rand::thread_rng;
use std::collections::VecDeque;

use crate::batch::TransitionBatch;
use crate::error::{MaddpgError, Result};

/// One environment step of every agent, stored as joint vectors.
#[derive(Clone, Debug, PartialEq)]
pub struct JointTransition {
    pub states: Array1<f32>,
    pub actions: Array1<f32>,
    /// One reward per agent
    pub rewards: Array1<f32>,
    pub next_states: Array1<f32>,
    /// One flag per agent, 1.0 when terminal
    pub dones: Array1<f32>,
}

impl JointTransition {
    pub fn new(
        states: Array1<f32>,
        actions: Array1<f32>,
        rewards: Array1<f32>,
        next_states: Array1<f32>,
        dones: Array1<f32>,
    ) -> Self {
        JointTransition {
            states,
            actions,
            rewards,
            next_states,
            dones,
        }
    }
}

/// Replay memory shared by all agents; drops the oldest transition when full.
#[derive(Clone)]
pub struct JointReplayBuffer {
    buffer: VecDeque<JointTransition>,
    capacity: usize,
}

impl JointReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        JointReplayBuffer {
            // capacities in the millions are common; grow lazily
            buffer: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    pub fn add(&mut self, transition: JointTransition) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn can_sample(&self, batch_size: usize) -> bool {
        batch_size > 0 && self.buffer.len() >= batch_size
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Uniformly draw up to `batch_size` distinct transitions and stack them
    /// row-wise.
    pub fn sample(&self, batch_size: usize) -> Result<TransitionBatch> {
        if self.buffer.is_empty() || batch_size == 0 {
            return Err(MaddpgError::EmptyBuffer(format!(
                "cannot sample {} transitions from a buffer of {}",
                batch_size,
                self.buffer.len()
            )));
        }
        let amount = batch_size.min(self.buffer.len());
        let indices = index::sample(&mut thread_rng(), self.buffer.len(), amount);
        let picked: Vec<&JointTransition> = indices.iter().map(|i| &self.buffer[i]).collect();

        TransitionBatch::new(
            stack(&picked, |t| &t.states)?,
            stack(&picked, |t| &t.actions)?,
            stack(&picked, |t| &t.rewards)?,
            stack(&picked, |t| &t.next_states)?,
            stack(&picked, |t| &t.dones)?,
        )
    }
}

fn stack<F>(rows: &[&JointTransition], field: F) -> Result<Array2<f32>>
where
    F: Fn(&JointTransition) -> &Array1<f32>,
{
    let width = field(rows[0]).len();
    let mut out = Array2::zeros((rows.len(), width));
    for (mut row, transition) in out.rows_mut().into_iter().zip(rows) {
        let values = field(transition);
        MaddpgError::check_width("stored transition", width, values.len())?;
        row.assign(values);
    }
    Ok(out)
}
