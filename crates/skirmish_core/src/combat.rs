//! Attack resolution between one attacker and one target.

use crate::events::EventSink;
use crate::rng::Dice;
use crate::unit::{Strikes, Unit};

/// Names of the two teams involved in an exchange, used for narration.
#[derive(Debug, Clone, Copy)]
pub struct Matchup<'a> {
    pub attacker_team: &'a str,
    pub target_team: &'a str,
}

/// Number of hits `attacker` lands this attack. Draws from `dice` only for
/// kinds with a random profile.
pub fn hit_count(attacker: &Unit, dice: &mut impl Dice) -> u32 {
    match attacker.kind().profile().strikes {
        Strikes::None => 0,
        Strikes::Single => 1,
        Strikes::Volley { min, max } => dice.roll(min..=max),
        Strikes::Flurry { base, bonus } => {
            let extra = attacker
                .loadout()
                .map(|l| l.totals().extra_attack_bonus)
                .unwrap_or(0);
            base + dice.roll(0..=bonus) + extra
        }
    }
}

/// Resolves a full attack. Returns the number of hits that landed.
pub fn perform_attack(
    attacker: &Unit,
    target: &mut Unit,
    matchup: Matchup<'_>,
    dice: &mut impl Dice,
    sink: &mut impl EventSink,
) -> u32 {
    if !target.is_alive() {
        return 0;
    }
    let hits = hit_count(attacker, dice);
    let mut landed = 0;
    for _ in 0..hits {
        if !target.is_alive() {
            break;
        }
        let dealt = target.take_damage(attacker.attack);
        sink.info(format!(
            "{}: {} [{}] attacks {}: {} [{}] and deals {} damage.",
            matchup.attacker_team,
            attacker.name(),
            attacker.position,
            matchup.target_team,
            target.name(),
            target.position,
            dealt
        ));
        target.check_buff_loss(matchup.target_team, sink);
        landed += 1;
    }
    landed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::BuffCode;
    use crate::events::BattleEvent;
    use crate::rng::ScriptedDice;
    use crate::unit::UnitKind;

    const MATCHUP: Matchup<'static> = Matchup {
        attacker_team: "Red",
        target_team: "Blue",
    };

    #[test]
    fn heavy_infantry_hits_once() {
        let attacker = Unit::new(UnitKind::HeavyInfantry, 1);
        let mut target = Unit::new(UnitKind::HeavyInfantry, 1);
        let mut dice = ScriptedDice::default();
        let mut events: Vec<BattleEvent> = Vec::new();

        let landed = perform_attack(&attacker, &mut target, MATCHUP, &mut dice, &mut events);
        assert_eq!(landed, 1);
        assert_eq!(target.hp, 80);
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].message,
            "Red: Heavy Infantry [1] attacks Blue: Heavy Infantry [1] and deals 20 damage."
        );
        assert_eq!(dice.consumed(), 0);
    }

    #[test]
    fn light_infantry_hit_count_includes_mobility_bonus() {
        let mut li = Unit::new(UnitKind::LightInfantry, 1);
        let mut dice = ScriptedDice::new([0, 1, 0, 1]);
        assert_eq!(hit_count(&li, &mut dice), 2);
        assert_eq!(hit_count(&li, &mut dice), 3);
        li.grant_buff(BuffCode::Horse).unwrap();
        assert_eq!(hit_count(&li, &mut dice), 4);
        assert_eq!(hit_count(&li, &mut dice), 5);
    }

    #[test]
    fn archer_volley_within_one_to_five() {
        let archer = Unit::new(UnitKind::Archer, 1);
        let mut dice = ScriptedDice::new([0, 3, 9]);
        assert_eq!(hit_count(&archer, &mut dice), 1);
        assert_eq!(hit_count(&archer, &mut dice), 3);
        assert_eq!(hit_count(&archer, &mut dice), 5);
    }

    #[test]
    fn non_combatants_never_strike() {
        let mut dice = ScriptedDice::default();
        let mut events: Vec<BattleEvent> = Vec::new();
        for kind in [UnitKind::Healer, UnitKind::SiegeSupport] {
            let unit = Unit::new(kind, 1);
            let mut target = Unit::new(UnitKind::Archer, 1);
            assert_eq!(
                perform_attack(&unit, &mut target, MATCHUP, &mut dice, &mut events),
                0
            );
            assert_eq!(target.hp, 40);
        }
        assert!(events.is_empty());
    }

    #[test]
    fn stops_once_target_dies() {
        let attacker = Unit::new(UnitKind::Archer, 1);
        let mut target = Unit::new(UnitKind::Wizard, 1);
        target.hp = 10;
        let mut dice = ScriptedDice::new([5]);
        let mut events: Vec<BattleEvent> = Vec::new();

        let landed = perform_attack(&attacker, &mut target, MATCHUP, &mut dice, &mut events);
        assert_eq!(landed, 2);
        assert_eq!(target.hp, 0);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn dead_target_is_ignored() {
        let attacker = Unit::new(UnitKind::Archer, 1);
        let mut target = Unit::new(UnitKind::Wizard, 1);
        target.hp = 0;
        let mut dice = ScriptedDice::new([5]);
        let mut events: Vec<BattleEvent> = Vec::new();
        assert_eq!(
            perform_attack(&attacker, &mut target, MATCHUP, &mut dice, &mut events),
            0
        );
        assert_eq!(dice.consumed(), 0);
    }

    #[test]
    fn mobility_buff_lost_mid_battle_drops_extra_hits() {
        let mut rider = Unit::new(UnitKind::LightInfantry, 1);
        rider.grant_buff(BuffCode::Horse).unwrap();
        assert_eq!(rider.max_hp, 70);

        let heavy = Unit::new(UnitKind::HeavyInfantry, 1);
        let mut dice = ScriptedDice::new([0]);
        let mut events: Vec<BattleEvent> = Vec::new();
        perform_attack(&heavy, &mut rider, MATCHUP, &mut dice, &mut events);

        assert_eq!(rider.loadout().unwrap().total_damage_taken, 20);
        assert!(!rider.has_buff(BuffCode::Horse));
        assert_eq!(rider.max_hp, 50);
        assert_eq!(rider.hp, 50);
        assert_eq!(hit_count(&rider, &mut dice), 2);
    }
}
