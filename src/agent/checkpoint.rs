use std::fmt;

use super::variant::PolicyVariant;

/// One of the eight named networks an agent persists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NetworkSlot {
    Actor(PolicyVariant),
    Critic(PolicyVariant),
}

impl NetworkSlot {
    pub const ALL: [NetworkSlot; 8] = [
        NetworkSlot::Actor(PolicyVariant::Live),
        NetworkSlot::Critic(PolicyVariant::Live),
        NetworkSlot::Actor(PolicyVariant::Target),
        NetworkSlot::Critic(PolicyVariant::Target),
        NetworkSlot::Actor(PolicyVariant::BestOverall),
        NetworkSlot::Critic(PolicyVariant::BestOverall),
        NetworkSlot::Actor(PolicyVariant::BestAverage),
        NetworkSlot::Critic(PolicyVariant::BestAverage),
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NetworkSlot::Actor(PolicyVariant::Live) => "actor",
            NetworkSlot::Critic(PolicyVariant::Live) => "critic",
            NetworkSlot::Actor(PolicyVariant::Target) => "target_actor",
            NetworkSlot::Critic(PolicyVariant::Target) => "target_critic",
            NetworkSlot::Actor(PolicyVariant::BestOverall) => "actor_best",
            NetworkSlot::Critic(PolicyVariant::BestOverall) => "critic_best",
            NetworkSlot::Actor(PolicyVariant::BestAverage) => "actor_best_average",
            NetworkSlot::Critic(PolicyVariant::BestAverage) => "critic_best_average",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.bin", self.name())
    }

    pub fn variant(&self) -> PolicyVariant {
        match *self {
            NetworkSlot::Actor(v) | NetworkSlot::Critic(v) => v,
        }
    }
}

impl fmt::Display for NetworkSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = NetworkSlot::ALL.iter().map(|s| s.file_name()).collect();
        assert_eq!(names.len(), 8);
        assert!(names.contains("target_critic.bin"));
    }
}
