//! Helpers for deterministic regression tests.

use serde_json::json;
use skirmish_core::{record, Battle, EventLog, Rules, SimulationRng, Team, UnitKind};

pub use skirmish_core::rng::DEFAULT_SEED;

const HOME_LINEUP: [UnitKind; 5] = [
    UnitKind::LightInfantry,
    UnitKind::Archer,
    UnitKind::Wizard,
    UnitKind::Healer,
    UnitKind::Archer,
];

const AWAY_LINEUP: [UnitKind; 5] = [
    UnitKind::HeavyInfantry,
    UnitKind::Archer,
    UnitKind::SiegeSupport,
    UnitKind::LightInfantry,
    UnitKind::Archer,
];

pub fn lineup(name: &str, kinds: &[UnitKind]) -> Team {
    let mut team = Team::new(name);
    for &kind in kinds {
        team.roster.push(kind);
    }
    team
}

/// Runs the fixed mixed lineups to the end and returns the whole trace.
pub fn sample_battle(seed: u64) -> serde_json::Value {
    let mut battle = Battle::new(
        lineup("Red", &HOME_LINEUP),
        lineup("Blue", &AWAY_LINEUP),
        Rules::default(),
        SimulationRng::new(seed),
    );
    let mut log = EventLog::new();
    let outcome = battle.run(&mut log);
    let survivors = |team: &Team| -> Vec<String> { team.roster.iter().map(record::encode).collect() };
    json!({
        "seed": seed,
        "rounds": battle.round(),
        "outcome": outcome,
        "events": log.events().iter().map(|e| e.message.clone()).collect::<Vec<_>>(),
        "survivors": {
            "home": survivors(battle.home()),
            "away": survivors(battle.away()),
        },
    })
}

/// Narration of two heavy infantry fighting it out. Draws no dice.
pub fn duel_trace() -> String {
    let mut battle = Battle::new(
        lineup("Red", &[UnitKind::HeavyInfantry]),
        lineup("Blue", &[UnitKind::HeavyInfantry]),
        Rules::default(),
        SimulationRng::new(DEFAULT_SEED),
    );
    let mut log = EventLog::new();
    battle.run(&mut log);
    log.events()
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battle_is_deterministic() {
        let a = sample_battle(DEFAULT_SEED);
        let b = sample_battle(DEFAULT_SEED);
        assert_eq!(a, b);
    }

    #[test]
    fn duel_ends_with_winner() {
        assert!(duel_trace().ends_with("Red wins!"));
    }
}
