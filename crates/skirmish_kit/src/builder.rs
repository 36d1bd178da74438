//! Budgeted army construction.

use std::fmt;
use std::str::FromStr;

use skirmish_core::{BuffCode, Dice, Roster, Team, UnitKind};
use tracing::debug;

use crate::error::BuildError;

/// Odds, in percent, that an automatic build buys a buff right after buying
/// light infantry.
const AUTO_BUFF_CHANCE: u32 = 25;

/// Something that costs money.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purchase {
    Unit(UnitKind),
    Buff { position: usize, code: BuffCode },
}

/// One line typed during manual army building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildCommand {
    Buy(Purchase),
    Undo,
    Redo,
    Show,
    Done,
}

impl FromStr for BuildCommand {
    type Err = BuildError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let unknown = || BuildError::UnknownCommand(line.trim().to_string());
        match words.as_slice() {
            [word] => match word.to_ascii_lowercase().as_str() {
                "undo" => Ok(BuildCommand::Undo),
                "redo" => Ok(BuildCommand::Redo),
                "show" => Ok(BuildCommand::Show),
                "done" => Ok(BuildCommand::Done),
                _ => UnitKind::from_code(&word.to_ascii_uppercase())
                    .map(|kind| BuildCommand::Buy(Purchase::Unit(kind)))
                    .ok_or_else(unknown),
            },
            [verb, position, code] if verb.eq_ignore_ascii_case("buff") => {
                let position = position.parse().map_err(|_| unknown())?;
                let code = code.to_ascii_uppercase().parse()?;
                Ok(BuildCommand::Buy(Purchase::Buff { position, code }))
            }
            _ => Err(unknown()),
        }
    }
}

/// A team under construction with its remaining budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDraft {
    pub name: String,
    pub roster: Roster,
    pub budget: u32,
}

impl TeamDraft {
    pub fn new(name: impl Into<String>, budget: u32) -> Self {
        Self {
            name: name.into(),
            roster: Roster::new(),
            budget,
        }
    }

    fn charge(&mut self, item: &'static str, cost: u32) -> Result<(), BuildError> {
        if cost > self.budget {
            return Err(BuildError::InsufficientFunds {
                item,
                cost,
                budget: self.budget,
            });
        }
        self.budget -= cost;
        Ok(())
    }

    /// Buys a unit of `kind` and appends it to the roster.
    pub fn add_unit(&mut self, kind: UnitKind) -> Result<usize, BuildError> {
        self.charge(kind.name(), kind.cost())?;
        Ok(self.roster.push(kind).position)
    }

    /// Buys `code` for the light infantry at `position`.
    pub fn add_buff(&mut self, position: usize, code: BuffCode) -> Result<(), BuildError> {
        let buff = code.buff();
        let unit = self
            .roster
            .at_position(position)
            .ok_or(BuildError::NoSuchPosition(position))?;
        if unit.kind() != UnitKind::LightInfantry {
            return Err(BuildError::NotLightInfantry(position));
        }
        if unit.has_buff(code) {
            return Err(BuildError::DuplicateBuff {
                position,
                buff: buff.name,
            });
        }
        self.charge(buff.name, buff.cost)?;
        let unit = self
            .roster
            .at_position_mut(position)
            .ok_or(BuildError::NoSuchPosition(position))?;
        unit.grant_buff(code)
            .map_err(|err| BuildError::from_grant(err, position, buff.name))
    }

    pub fn execute(&mut self, purchase: Purchase) -> Result<(), BuildError> {
        match purchase {
            Purchase::Unit(kind) => self.add_unit(kind).map(|_| ()),
            Purchase::Buff { position, code } => self.add_buff(position, code),
        }
    }

    pub fn can_afford_anything(&self) -> bool {
        UnitKind::ALL.iter().any(|k| k.cost() <= self.budget)
    }

    /// Buys random affordable units until the budget runs dry. After each
    /// light infantry there is a chance to also buy it an affordable buff.
    pub fn auto_fill(&mut self, dice: &mut impl Dice) {
        loop {
            let affordable: Vec<UnitKind> = UnitKind::ALL
                .into_iter()
                .filter(|k| k.cost() <= self.budget)
                .collect();
            if affordable.is_empty() {
                break;
            }
            let pick = affordable[dice.roll(0..=affordable.len() as u32 - 1) as usize];
            let Ok(position) = self.add_unit(pick) else {
                break;
            };
            debug!(target: "skirmish_kit.builder", team = %self.name, kind = pick.code(), budget = self.budget, "auto purchase");
            if pick == UnitKind::LightInfantry && dice.chance(AUTO_BUFF_CHANCE) {
                self.auto_buff(position, dice);
            }
        }
    }

    fn auto_buff(&mut self, position: usize, dice: &mut impl Dice) {
        let affordable: Vec<BuffCode> = BuffCode::ALL
            .into_iter()
            .filter(|c| c.buff().cost <= self.budget)
            .collect();
        if affordable.is_empty() {
            return;
        }
        let code = affordable[dice.roll(0..=affordable.len() as u32 - 1) as usize];
        if self.add_buff(position, code).is_ok() {
            debug!(target: "skirmish_kit.builder", team = %self.name, position, buff = code.code(), "auto buff");
        }
    }

    pub fn into_team(self) -> Team {
        Team::with_roster(self.name, self.roster)
    }
}

impl fmt::Display for TeamDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (budget {}):", self.name, self.budget)?;
        write!(f, "{}", self.roster)
    }
}
