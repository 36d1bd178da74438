//! Once-per-round special abilities, resolved before a unit attacks.

use crate::events::EventSink;
use crate::rng::Dice;
use crate::roster::Roster;
use crate::rules::Rules;
use crate::unit::{Ability, FortBoost, KindState, UnitKind};

/// What triggering an ability changed, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityOutcome {
    Idle,
    Cloned { original: usize, clone: usize },
    Healed { target: usize, amount: u32 },
    Boosted { count: usize },
}

/// Fires the ability of the unit at `index` in `roster`.
pub fn trigger(
    roster: &mut Roster,
    index: usize,
    team: &str,
    round: u32,
    rules: &Rules,
    dice: &mut impl Dice,
    sink: &mut impl EventSink,
) -> AbilityOutcome {
    let Some(actor) = roster.get(index) else {
        return AbilityOutcome::Idle;
    };
    match actor.kind().profile().ability {
        Ability::None => AbilityOutcome::Idle,
        Ability::CloneInfantry => clone_infantry(roster, index, team, rules, dice, sink),
        Ability::Heal => heal_wounded(roster, index, team, rules, sink),
        Ability::FortBoost if round == 1 => boost_neighbours(roster, index, team, sink),
        Ability::FortBoost => AbilityOutcome::Idle,
    }
}

fn clone_infantry(
    roster: &mut Roster,
    index: usize,
    team: &str,
    rules: &Rules,
    dice: &mut impl Dice,
    sink: &mut impl EventSink,
) -> AbilityOutcome {
    if !dice.chance(rules.clone_chance_percent) {
        return AbilityOutcome::Idle;
    }
    let wizard_position = roster.units()[index].position;
    let Some(original) = roster.iter().position(|u| {
        u.is_alive() && matches!(u.kind(), UnitKind::LightInfantry | UnitKind::Archer)
    }) else {
        return AbilityOutcome::Idle;
    };

    let source = &roster.units()[original];
    let twin = source.clone_for_ability();
    let (source_name, source_position) = (source.name(), source.position);
    roster.insert_clone(original + 1, twin);
    sink.info(format!(
        "{team}: Wizard [{wizard_position}] clones {source_name} [{source_position}]!"
    ));
    AbilityOutcome::Cloned {
        original,
        clone: original + 1,
    }
}

fn heal_wounded(
    roster: &mut Roster,
    index: usize,
    team: &str,
    rules: &Rules,
    sink: &mut impl EventSink,
) -> AbilityOutcome {
    let healer_position = roster.units()[index].position;
    if roster.units()[index].healing_charges().unwrap_or(0) == 0 {
        return AbilityOutcome::Idle;
    }
    let Some(target) = roster.iter().position(|u| {
        u.is_alive()
            && u.hp < rules.heal_below_hp
            && !matches!(u.kind(), UnitKind::Wizard | UnitKind::SiegeSupport)
    }) else {
        return AbilityOutcome::Idle;
    };

    let units = roster.units_mut();
    let patient = &mut units[target];
    let amount = patient.heal(rules.heal_amount);
    let (patient_name, patient_position) = (patient.name(), patient.position);
    if let KindState::Healer { healing_charges } = &mut units[index].state {
        *healing_charges -= 1;
    }
    sink.info(format!(
        "{team}: Healer [{healer_position}] heals {patient_name} [{patient_position}] for {amount} HP."
    ));
    AbilityOutcome::Healed { target, amount }
}

fn boost_neighbours(
    roster: &mut Roster,
    index: usize,
    team: &str,
    sink: &mut impl EventSink,
) -> AbilityOutcome {
    let fort_position = roster.units()[index].position;
    let boost = match roster.units()[index].state {
        KindState::SiegeSupport(boost) => boost,
        _ => FortBoost::default(),
    };
    let mut count = 0;
    for unit in roster.units_mut() {
        if !unit.is_alive() || unit.position.abs_diff(fort_position) != 1 {
            continue;
        }
        boost.apply(unit);
        sink.info(format!(
            "{team}: Rolling Fort [{fort_position}] shields {} [{}], +{} HP.",
            unit.name(),
            unit.position,
            boost.amount
        ));
        count += 1;
    }
    AbilityOutcome::Boosted { count }
}
