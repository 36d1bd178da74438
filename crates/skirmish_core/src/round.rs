//! One round of play: every living unit of the home team acts in roster
//! order, then every living unit of the away team.

use tracing::debug;

use crate::ability;
use crate::combat::{perform_attack, Matchup};
use crate::events::EventSink;
use crate::rng::Dice;
use crate::roster::Roster;
use crate::rules::Rules;
use crate::team::Team;
use crate::unit::{Unit, UnitId, UnitKind};

/// Index into `opposing` of the unit `actor` would attack, if any.
///
/// Archers shoot the first living enemy within reach of their own position.
/// Everyone else fights only from the front and only hits the enemy front.
pub fn select_target(actor: &Unit, opposing: &Roster, archer_reach: usize) -> Option<usize> {
    if actor.kind() == UnitKind::Archer {
        return opposing
            .iter()
            .position(|t| t.is_alive() && actor.position.abs_diff(t.position) <= archer_reach);
    }
    if actor.position != 1 {
        return None;
    }
    opposing
        .iter()
        .position(|t| t.is_alive() && t.position == 1)
}

/// Resolves round `round` for both teams. Nothing is removed from either
/// roster here; dead units wait for compaction.
pub fn resolve_round(
    home: &mut Team,
    away: &mut Team,
    round: u32,
    rules: &Rules,
    dice: &mut impl Dice,
    sink: &mut impl EventSink,
) {
    let home_order = home.roster.ids();
    let away_order = away.roster.ids();
    take_turn(home, away, &home_order, round, rules, dice, sink);
    take_turn(away, home, &away_order, round, rules, dice, sink);
}

/// Lets each unit in `order` act. Units cloned in mid-turn are not in
/// `order`, so they wait for the next round.
pub fn take_turn(
    acting: &mut Team,
    opposing: &mut Team,
    order: &[UnitId],
    round: u32,
    rules: &Rules,
    dice: &mut impl Dice,
    sink: &mut impl EventSink,
) {
    for &id in order {
        let Some(index) = acting.roster.index_of(id) else {
            continue;
        };
        if !acting.roster.units()[index].is_alive() {
            continue;
        }

        let outcome = ability::trigger(
            &mut acting.roster,
            index,
            &acting.name,
            round,
            rules,
            dice,
            sink,
        );
        debug!(target: "skirmish_core.round", round, team = %acting.name, ?outcome, "ability resolved");

        if opposing.roster.is_empty() {
            break;
        }
        // A clone may have been inserted ahead of the actor.
        let Some(index) = acting.roster.index_of(id) else {
            continue;
        };
        let actor = &acting.roster.units()[index];
        let Some(target) = select_target(actor, &opposing.roster, rules.archer_reach) else {
            continue;
        };
        let matchup = Matchup {
            attacker_team: &acting.name,
            target_team: &opposing.name,
        };
        perform_attack(
            actor,
            &mut opposing.roster.units_mut()[target],
            matchup,
            dice,
            sink,
        );
    }
}
