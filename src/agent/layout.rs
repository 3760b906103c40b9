use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::{MaddpgError, Result};

/// Observation/action space of one agent, as reported by the environment.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct AgentSpace {
    pub obs_dim: usize,
    pub act_dim: usize,
    pub action_low: f32,
    pub action_high: f32,
}

impl AgentSpace {
    pub fn new(obs_dim: usize, act_dim: usize, action_low: f32, action_high: f32) -> Self {
        AgentSpace {
            obs_dim,
            act_dim,
            action_low,
            action_high,
        }
    }

    /// Symmetric bounds `[-bound, bound]`.
    pub fn symmetric(obs_dim: usize, act_dim: usize, bound: f32) -> Self {
        Self::new(obs_dim, act_dim, -bound, bound)
    }

    fn validate(&self, index: usize) -> Result<()> {
        let name = format!("spaces[{}]", index);
        if self.obs_dim == 0 || self.act_dim == 0 {
            return Err(MaddpgError::invalid_parameter(
                name,
                format!("observation and action widths must be non-zero, got {} and {}", self.obs_dim, self.act_dim),
            ));
        }
        if !self.action_low.is_finite() || !self.action_high.is_finite() || self.action_low > self.action_high {
            return Err(MaddpgError::invalid_parameter(
                name,
                format!("invalid action bounds [{}, {}]", self.action_low, self.action_high),
            ));
        }
        Ok(())
    }
}

/// Where one agent's observation and action live inside the joint vectors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentSegment {
    pub index: usize,
    pub obs: Range<usize>,
    pub act: Range<usize>,
}

impl AgentSegment {
    pub fn obs_start(&self) -> usize {
        self.obs.start
    }

    pub fn act_start(&self) -> usize {
        self.act.start
    }

    pub fn obs_width(&self) -> usize {
        self.obs.len()
    }

    pub fn act_width(&self) -> usize {
        self.act.len()
    }

    /// This agent's columns of a joint observation batch.
    pub fn own_observations<'a>(&self, joint: ArrayView2<'a, f32>) -> ArrayView2<'a, f32> {
        joint.slice_move(s![.., self.obs.clone()])
    }

    /// Overwrite this agent's action columns, leaving every other column as is.
    pub fn splice_actions(&self, joint: &mut Array2<f32>, own: ArrayView2<f32>) -> Result<()> {
        if own.dim() != (joint.nrows(), self.act_width()) {
            return Err(MaddpgError::dimension_mismatch(
                format!("({}, {})", joint.nrows(), self.act_width()),
                format!("{:?}", own.dim()),
            ));
        }
        joint.slice_mut(s![.., self.act.clone()]).assign(&own);
        Ok(())
    }
}

/// Per-agent offsets into the joint observation and action vectors.
///
/// Offsets are prefix sums of the widths in agent order, so the segments
/// partition the joint vectors with no gaps or overlaps.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct JointLayout {
    obs_widths: Vec<usize>,
    act_widths: Vec<usize>,
    obs_offsets: Vec<usize>,
    act_offsets: Vec<usize>,
    total_obs: usize,
    total_act: usize,
}

impl JointLayout {
    pub fn new(spaces: &[AgentSpace]) -> Result<Self> {
        if spaces.is_empty() {
            return Err(MaddpgError::invalid_parameter("spaces", "at least one agent is required"));
        }

        let mut layout = JointLayout {
            obs_widths: Vec::with_capacity(spaces.len()),
            act_widths: Vec::with_capacity(spaces.len()),
            obs_offsets: Vec::with_capacity(spaces.len()),
            act_offsets: Vec::with_capacity(spaces.len()),
            total_obs: 0,
            total_act: 0,
        };
        for (index, space) in spaces.iter().enumerate() {
            space.validate(index)?;
            layout.obs_offsets.push(layout.total_obs);
            layout.act_offsets.push(layout.total_act);
            layout.obs_widths.push(space.obs_dim);
            layout.act_widths.push(space.act_dim);
            layout.total_obs += space.obs_dim;
            layout.total_act += space.act_dim;
        }
        Ok(layout)
    }

    pub fn num_agents(&self) -> usize {
        self.obs_widths.len()
    }

    pub fn total_obs(&self) -> usize {
        self.total_obs
    }

    pub fn total_act(&self) -> usize {
        self.total_act
    }

    pub fn segment(&self, index: usize) -> Result<AgentSegment> {
        if index >= self.num_agents() {
            return Err(MaddpgError::UnknownAgent {
                index,
                num_agents: self.num_agents(),
            });
        }
        let (obs_start, act_start) = (self.obs_offsets[index], self.act_offsets[index]);
        Ok(AgentSegment {
            index,
            obs: obs_start..obs_start + self.obs_widths[index],
            act: act_start..act_start + self.act_widths[index],
        })
    }

    pub fn segments(&self) -> impl Iterator<Item = AgentSegment> + '_ {
        (0..self.num_agents()).filter_map(move |i| self.segment(i).ok())
    }

    /// Concatenate per-agent observations into one joint vector.
    pub fn join_observations(&self, parts: &[Array1<f32>]) -> Result<Array1<f32>> {
        Self::join(parts, &self.obs_widths, self.total_obs, "observation")
    }

    /// Concatenate per-agent actions into one joint vector.
    pub fn join_actions(&self, parts: &[Array1<f32>]) -> Result<Array1<f32>> {
        Self::join(parts, &self.act_widths, self.total_act, "action")
    }

    /// Split a joint observation back into per-agent vectors.
    pub fn split_observations(&self, joint: ArrayView1<f32>) -> Result<Vec<Array1<f32>>> {
        MaddpgError::check_width("joint observation", self.total_obs, joint.len())?;
        Ok(self
            .segments()
            .map(|seg| joint.slice(s![seg.obs]).to_owned())
            .collect())
    }

    fn join(parts: &[Array1<f32>], widths: &[usize], total: usize, what: &str) -> Result<Array1<f32>> {
        MaddpgError::check_width(&format!("{} list", what), widths.len(), parts.len())?;
        let mut joint = Vec::with_capacity(total);
        for (part, &width) in parts.iter().zip(widths) {
            MaddpgError::check_width(what, width, part.len())?;
            joint.extend(part.iter().copied());
        }
        Ok(Array1::from(joint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_agents() -> Vec<AgentSpace> {
        vec![AgentSpace::symmetric(3, 2, 1.0), AgentSpace::symmetric(2, 1, 1.0)]
    }

    #[test]
    fn test_two_agent_scenario() {
        let layout = JointLayout::new(&two_agents()).unwrap();
        let seg = layout.segment(1).unwrap();
        assert_eq!(seg.obs_start(), 3);
        assert_eq!(seg.act_start(), 2);
        assert_eq!(layout.total_obs(), 5);
        assert_eq!(layout.total_act(), 3);
        assert!(layout.segment(2).is_err());
    }

    #[test]
    fn test_rejects_degenerate_spaces() {
        assert!(JointLayout::new(&[]).is_err());
        assert!(JointLayout::new(&[AgentSpace::symmetric(0, 1, 1.0)]).is_err());
        assert!(JointLayout::new(&[AgentSpace::new(2, 1, 1.0, -1.0)]).is_err());
        assert!(JointLayout::new(&[AgentSpace::new(2, 1, f32::NEG_INFINITY, 1.0)]).is_err());
    }

    #[test]
    fn test_splice_leaves_other_columns() {
        let layout = JointLayout::new(&two_agents()).unwrap();
        let seg = layout.segment(0).unwrap();
        let mut joint = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        seg.splice_actions(&mut joint, array![[9.0, 8.0], [7.0, 6.0]].view()).unwrap();
        assert_eq!(joint, array![[9.0, 8.0, 3.0], [7.0, 6.0, 6.0]]);
        assert!(seg.splice_actions(&mut joint, array![[1.0], [2.0]].view()).is_err());
    }

    #[test]
    fn test_join_and_split() {
        let layout = JointLayout::new(&two_agents()).unwrap();
        let joint = layout
            .join_observations(&[array![1.0, 2.0, 3.0], array![4.0, 5.0]])
            .unwrap();
        assert_eq!(joint, array![1.0, 2.0, 3.0, 4.0, 5.0]);
        let parts = layout.split_observations(joint.view()).unwrap();
        assert_eq!(parts[1], array![4.0, 5.0]);
        assert!(layout.join_actions(&[array![1.0, 2.0]]).is_err());
    }

    #[test]
    fn test_own_observations_slice() {
        let layout = JointLayout::new(&two_agents()).unwrap();
        let seg = layout.segment(1).unwrap();
        let joint = array![[0.0, 1.0, 2.0, 3.0, 4.0]];
        assert_eq!(seg.own_observations(joint.view()), array![[3.0, 4.0]]);
    }
}
