use serde::{Deserialize, Serialize};

/// Tunable constants of the round engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Chance, in percent, that a wizard clones an infantry unit each round.
    #[serde(default = "default_clone_chance")]
    pub clone_chance_percent: u32,
    #[serde(default = "default_heal_amount")]
    pub heal_amount: u32,
    /// Healers only pick units below this hp.
    #[serde(default = "default_heal_below")]
    pub heal_below_hp: u32,
    /// Maximum position distance an archer can shoot across.
    #[serde(default = "default_archer_reach")]
    pub archer_reach: usize,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

fn default_clone_chance() -> u32 {
    10
}
fn default_heal_amount() -> u32 {
    20
}
fn default_heal_below() -> u32 {
    30
}
fn default_archer_reach() -> usize {
    3
}
fn default_max_rounds() -> u32 {
    500
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            clone_chance_percent: default_clone_chance(),
            heal_amount: default_heal_amount(),
            heal_below_hp: default_heal_below(),
            archer_reach: default_archer_reach(),
            max_rounds: default_max_rounds(),
        }
    }
}
