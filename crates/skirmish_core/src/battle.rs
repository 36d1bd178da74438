//! The battle context: both teams, the rules, the dice and the round counter.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::events::EventSink;
use crate::rng::Dice;
use crate::round::resolve_round;
use crate::rules::Rules;
use crate::team::{Side, Team};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Victory { side: Side, team: String },
    /// Both rosters emptied in the same round.
    Draw,
    /// The round limit was reached with both teams still standing.
    Stalemate,
}

#[derive(Debug, Clone)]
pub struct Battle<D> {
    home: Team,
    away: Team,
    rules: Rules,
    dice: D,
    round: u32,
}

impl<D: Dice> Battle<D> {
    pub fn new(home: Team, away: Team, rules: Rules, dice: D) -> Self {
        Self::resume(home, away, rules, dice, 0)
    }

    /// Continues a battle whose last resolved round was `round`.
    pub fn resume(home: Team, away: Team, rules: Rules, dice: D, round: u32) -> Self {
        Self {
            home,
            away,
            rules,
            dice,
            round,
        }
    }

    pub fn home(&self) -> &Team {
        &self.home
    }

    pub fn away(&self) -> &Team {
        &self.away
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Rounds resolved so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    pub fn into_teams(self) -> (Team, Team) {
        (self.home, self.away)
    }

    /// Resolves the next round without compacting.
    pub fn resolve_round(&mut self, sink: &mut impl EventSink) -> u32 {
        self.round += 1;
        sink.info(format!("Round {}:", self.round));
        resolve_round(
            &mut self.home,
            &mut self.away,
            self.round,
            &self.rules,
            &mut self.dice,
            sink,
        );
        self.round
    }

    /// Removes dead units from both rosters. Returns (home, away) removals.
    pub fn compact(&mut self) -> (usize, usize) {
        (self.home.roster.compact(), self.away.roster.compact())
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match (self.home.is_defeated(), self.away.is_defeated()) {
            (true, true) => Some(Outcome::Draw),
            (false, true) => Some(self.victory(Side::Home)),
            (true, false) => Some(self.victory(Side::Away)),
            (false, false) if self.round >= self.rules.max_rounds => Some(Outcome::Stalemate),
            (false, false) => None,
        }
    }

    fn victory(&self, side: Side) -> Outcome {
        Outcome::Victory {
            side,
            team: self.team(side).name.clone(),
        }
    }

    /// One full round: resolve, compact, then check for a result.
    pub fn play_round(&mut self, sink: &mut impl EventSink) -> Option<Outcome> {
        self.resolve_round(sink);
        let (home_losses, away_losses) = self.compact();
        info!(
            target: "skirmish_core.battle",
            round = self.round,
            home = self.home.roster.len(),
            away = self.away.roster.len(),
            home_losses,
            away_losses,
            "round resolved"
        );
        let outcome = self.outcome();
        if let Some(outcome) = &outcome {
            narrate_outcome(outcome, sink);
        }
        outcome
    }

    /// Plays rounds until there is a result.
    pub fn run(&mut self, sink: &mut impl EventSink) -> Outcome {
        if let Some(outcome) = self.outcome() {
            narrate_outcome(&outcome, sink);
            return outcome;
        }
        loop {
            if let Some(outcome) = self.play_round(sink) {
                info!(target: "skirmish_core.battle", rounds = self.round, ?outcome, "battle over");
                return outcome;
            }
        }
    }
}

fn narrate_outcome(outcome: &Outcome, sink: &mut impl EventSink) {
    match outcome {
        Outcome::Victory { team, .. } => sink.info(format!("{team} wins!")),
        Outcome::Draw => sink.info("Both armies fall. The battle is a draw.".to_string()),
        Outcome::Stalemate => sink.info("Neither army can break the other. Stalemate.".to_string()),
    }
}
