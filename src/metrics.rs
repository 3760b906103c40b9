//! Training metrics: per-update losses and episode reward tracking.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Losses of one `perform_update_step` call.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct UpdateStats {
    pub critic_loss: f32,
    pub actor_loss: f32,
}

impl UpdateStats {
    pub fn is_finite(&self) -> bool {
        self.critic_loss.is_finite() && self.actor_loss.is_finite()
    }
}

/// Which snapshots an episode result earned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NewBest {
    pub single: bool,
    pub average: bool,
}

/// Episode reward history with a moving-average window and best-so-far marks.
#[derive(Clone, Debug)]
pub struct RewardTracker {
    window: usize,
    recent: VecDeque<f32>,
    episodes: usize,
    total: f64,
    best_single: Option<f32>,
    best_average: Option<f32>,
    min: f32,
    max: f32,
}

impl RewardTracker {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        RewardTracker {
            window,
            recent: VecDeque::with_capacity(window),
            episodes: 0,
            total: 0.0,
            best_single: None,
            best_average: None,
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
        }
    }

    /// Record an episode reward and report whether it set a new best single
    /// episode and/or a new best moving average.
    pub fn record(&mut self, episode_reward: f32) -> NewBest {
        if self.recent.len() == self.window {
            self.recent.pop_front();
        }
        self.recent.push_back(episode_reward);
        self.episodes += 1;
        self.total += episode_reward as f64;
        self.min = self.min.min(episode_reward);
        self.max = self.max.max(episode_reward);

        let single = self.best_single.map_or(true, |best| episode_reward > best);
        if single {
            self.best_single = Some(episode_reward);
        }
        let average = self.moving_average();
        let average_improved = self.best_average.map_or(true, |best| average > best);
        if average_improved {
            self.best_average = Some(average);
        }
        NewBest {
            single,
            average: average_improved,
        }
    }

    /// Mean reward over the last `window` episodes; 0.0 before any episode.
    pub fn moving_average(&self) -> f32 {
        if self.recent.is_empty() {
            0.0
        } else {
            self.recent.iter().sum::<f32>() / self.recent.len() as f32
        }
    }

    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// Mean over every recorded episode.
    pub fn mean(&self) -> f32 {
        if self.episodes == 0 {
            0.0
        } else {
            (self.total / self.episodes as f64) as f32
        }
    }

    pub fn best_single(&self) -> Option<f32> {
        self.best_single
    }

    pub fn best_average(&self) -> Option<f32> {
        self.best_average
    }

    pub fn min(&self) -> f32 {
        if self.episodes == 0 {
            0.0
        } else {
            self.min
        }
    }

    pub fn max(&self) -> f32 {
        if self.episodes == 0 {
            0.0
        } else {
            self.max
        }
    }
}

impl Default for RewardTracker {
    fn default() -> Self {
        Self::new(40)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_tracking() {
        let mut tracker = RewardTracker::new(2);
        assert_eq!(tracker.record(1.0), NewBest { single: true, average: true });
        assert_eq!(tracker.record(0.0), NewBest { single: false, average: false });
        assert_eq!(tracker.record(3.0), NewBest { single: true, average: true });
        assert_eq!(tracker.moving_average(), 1.5);
        assert_eq!(tracker.best_single(), Some(3.0));
        assert_eq!(tracker.min(), 0.0);
        assert_eq!(tracker.episodes(), 3);
    }

    #[test]
    fn test_window_eviction() {
        let mut tracker = RewardTracker::new(3);
        for r in [10.0, 0.0, 0.0, 0.0] {
            tracker.record(r);
        }
        assert_eq!(tracker.moving_average(), 0.0);
        assert_eq!(tracker.max(), 10.0);
        assert_eq!(tracker.mean(), 2.5);
    }
}
