use serde::{Deserialize, Serialize};
use std::fmt;

/// The four parameter sets an agent keeps for its actor and critic.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PolicyVariant {
    /// Actively trained networks
    #[default]
    Live,
    /// Slow-tracking copies used for TD targets
    Target,
    /// Snapshot of the best single-episode performance
    BestOverall,
    /// Snapshot of the best running-average performance
    BestAverage,
}

impl PolicyVariant {
    pub const ALL: [PolicyVariant; 4] = [
        PolicyVariant::Live,
        PolicyVariant::Target,
        PolicyVariant::BestOverall,
        PolicyVariant::BestAverage,
    ];

    /// Resolve an action-selection token. `"last"`, `"best_overall"` and
    /// `"best_average"` are recognized; anything else selects the live policy.
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            "last" => PolicyVariant::Live,
            "best_overall" => PolicyVariant::BestOverall,
            "best_average" => PolicyVariant::BestAverage,
            _ => PolicyVariant::Live,
        }
    }
}

impl From<&str> for PolicyVariant {
    fn from(selector: &str) -> Self {
        Self::from_selector(selector)
    }
}

impl fmt::Display for PolicyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyVariant::Live => "last",
            PolicyVariant::Target => "target",
            PolicyVariant::BestOverall => "best_overall",
            PolicyVariant::BestAverage => "best_average",
        };
        f.write_str(name)
    }
}
