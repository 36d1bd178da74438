//! Round-resolution engine for two-team skirmishes.
//!
//! Two ordered rosters take turns: every living unit of the home team fires
//! its special ability and then attacks, then the away team does the same.
//! Dead units are compacted away between rounds. All randomness goes through
//! [`Dice`] so a battle can be replayed exactly.

pub mod ability;
pub mod battle;
pub mod buff;
pub mod combat;
pub mod error;
pub mod events;
pub mod record;
pub mod rng;
pub mod roster;
pub mod round;
pub mod rules;
pub mod team;
pub mod unit;

pub use battle::{Battle, Outcome};
pub use buff::{Buff, BuffCode};
pub use error::{CodeError, RecordError};
pub use events::{BattleEvent, EventLog, EventSink, Severity};
pub use rng::{Dice, ScriptedDice, SimulationParams, SimulationRng};
pub use roster::Roster;
pub use rules::Rules;
pub use team::{Side, Team};
pub use unit::{GrantError, KindState, Unit, UnitId, UnitKind};
