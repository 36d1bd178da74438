//! Combat units: per-kind profiles, kind-specific state and the damage/heal
//! primitives the round resolver calls.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::buff::{BuffCode, BuffTotals};
use crate::error::CodeError;
use crate::events::EventSink;

pub const HEALER_CHARGES: u32 = 3;
pub const FORT_BOOST: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    LightInfantry,
    HeavyInfantry,
    Archer,
    Wizard,
    Healer,
    SiegeSupport,
}

/// How many hits one attack lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strikes {
    None,
    Single,
    /// Uniform in `[min, max]`.
    Volley { min: u32, max: u32 },
    /// `base` plus a uniform `[0, bonus]`, plus any buff extra hits.
    Flurry { base: u32, bonus: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ability {
    None,
    CloneInfantry,
    Heal,
    FortBoost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindProfile {
    pub code: &'static str,
    pub name: &'static str,
    pub hp: u32,
    pub attack: u32,
    pub cost: u32,
    pub strikes: Strikes,
    pub ability: Ability,
}

const LIGHT_INFANTRY: KindProfile = KindProfile {
    code: "LI",
    name: "Light Infantry",
    hp: 50,
    attack: 8,
    cost: 10,
    strikes: Strikes::Flurry { base: 2, bonus: 1 },
    ability: Ability::None,
};

const HEAVY_INFANTRY: KindProfile = KindProfile {
    code: "HI",
    name: "Heavy Infantry",
    hp: 100,
    attack: 20,
    cost: 30,
    strikes: Strikes::Single,
    ability: Ability::None,
};

const ARCHER: KindProfile = KindProfile {
    code: "A",
    name: "Archer",
    hp: 40,
    attack: 7,
    cost: 20,
    strikes: Strikes::Volley { min: 1, max: 5 },
    ability: Ability::None,
};

const WIZARD: KindProfile = KindProfile {
    code: "W",
    name: "Wizard",
    hp: 30,
    attack: 5,
    cost: 30,
    strikes: Strikes::Single,
    ability: Ability::CloneInfantry,
};

const HEALER: KindProfile = KindProfile {
    code: "H",
    name: "Healer",
    hp: 50,
    attack: 0,
    cost: 15,
    strikes: Strikes::None,
    ability: Ability::Heal,
};

const SIEGE_SUPPORT: KindProfile = KindProfile {
    code: "RF",
    name: "Rolling Fort",
    hp: 60,
    attack: 0,
    cost: 25,
    strikes: Strikes::None,
    ability: Ability::FortBoost,
};

impl UnitKind {
    pub const ALL: [UnitKind; 6] = [
        UnitKind::LightInfantry,
        UnitKind::HeavyInfantry,
        UnitKind::Archer,
        UnitKind::Wizard,
        UnitKind::Healer,
        UnitKind::SiegeSupport,
    ];

    pub fn profile(&self) -> &'static KindProfile {
        match self {
            UnitKind::LightInfantry => &LIGHT_INFANTRY,
            UnitKind::HeavyInfantry => &HEAVY_INFANTRY,
            UnitKind::Archer => &ARCHER,
            UnitKind::Wizard => &WIZARD,
            UnitKind::Healer => &HEALER,
            UnitKind::SiegeSupport => &SIEGE_SUPPORT,
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        UnitKind::ALL.into_iter().find(|k| k.code() == s)
    }

    pub fn code(&self) -> &'static str {
        self.profile().code
    }

    pub fn name(&self) -> &'static str {
        self.profile().name
    }

    pub fn cost(&self) -> u32 {
        self.profile().cost
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for UnitKind {
    type Err = CodeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitKind::from_code(s).ok_or_else(|| CodeError::UnknownUnit(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct UnitId(pub u64);

/// Buff state carried by light infantry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loadout {
    pub buffs: Vec<BuffCode>,
    pub total_damage_taken: u32,
    pub armor: u32,
    pub base_max_hp: u32,
    pub base_attack: u32,
}

impl Loadout {
    fn fresh() -> Self {
        Self {
            buffs: Vec::new(),
            total_damage_taken: 0,
            armor: 0,
            base_max_hp: LIGHT_INFANTRY.hp,
            base_attack: LIGHT_INFANTRY.attack,
        }
    }

    pub fn has(&self, code: BuffCode) -> bool {
        self.buffs.contains(&code)
    }

    pub fn totals(&self) -> BuffTotals {
        BuffTotals::of(&self.buffs)
    }
}

/// The rolling fort's boost effect: raises hp and max hp of a neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FortBoost {
    pub amount: u32,
}

impl Default for FortBoost {
    fn default() -> Self {
        Self { amount: FORT_BOOST }
    }
}

impl FortBoost {
    pub fn apply(&self, unit: &mut Unit) {
        unit.raise_max_hp(self.amount);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindState {
    LightInfantry(Loadout),
    HeavyInfantry,
    Archer,
    Wizard,
    Healer { healing_charges: u32 },
    SiegeSupport(FortBoost),
}

impl KindState {
    fn fresh(kind: UnitKind) -> Self {
        match kind {
            UnitKind::LightInfantry => KindState::LightInfantry(Loadout::fresh()),
            UnitKind::HeavyInfantry => KindState::HeavyInfantry,
            UnitKind::Archer => KindState::Archer,
            UnitKind::Wizard => KindState::Wizard,
            UnitKind::Healer => KindState::Healer {
                healing_charges: HEALER_CHARGES,
            },
            UnitKind::SiegeSupport => KindState::SiegeSupport(FortBoost::default()),
        }
    }

    pub fn kind(&self) -> UnitKind {
        match self {
            KindState::LightInfantry(_) => UnitKind::LightInfantry,
            KindState::HeavyInfantry => UnitKind::HeavyInfantry,
            KindState::Archer => UnitKind::Archer,
            KindState::Wizard => UnitKind::Wizard,
            KindState::Healer { .. } => UnitKind::Healer,
            KindState::SiegeSupport(_) => UnitKind::SiegeSupport,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GrantError {
    #[error("only light infantry can carry buffs")]
    NotLightInfantry,
    #[error("buff already active")]
    AlreadyActive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: UnitId,
    /// 1-based slot in the owning roster.
    pub position: usize,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub state: KindState,
}

impl Unit {
    pub fn new(kind: UnitKind, position: usize) -> Self {
        let profile = kind.profile();
        Self {
            id: UnitId::default(),
            position,
            hp: profile.hp,
            max_hp: profile.hp,
            attack: profile.attack,
            state: KindState::fresh(kind),
        }
    }

    pub fn kind(&self) -> UnitKind {
        self.state.kind()
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn cost(&self) -> u32 {
        self.kind().cost()
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn armor(&self) -> u32 {
        self.loadout().map(|l| l.armor).unwrap_or(0)
    }

    pub fn loadout(&self) -> Option<&Loadout> {
        match &self.state {
            KindState::LightInfantry(loadout) => Some(loadout),
            _ => None,
        }
    }

    pub fn loadout_mut(&mut self) -> Option<&mut Loadout> {
        match &mut self.state {
            KindState::LightInfantry(loadout) => Some(loadout),
            _ => None,
        }
    }

    pub fn has_buff(&self, code: BuffCode) -> bool {
        self.loadout().is_some_and(|l| l.has(code))
    }

    pub fn healing_charges(&self) -> Option<u32> {
        match self.state {
            KindState::Healer { healing_charges } => Some(healing_charges),
            _ => None,
        }
    }

    /// Applies `raw` damage mitigated by armor and returns what was dealt.
    /// Light infantry add it to their running total.
    pub fn take_damage(&mut self, raw: u32) -> u32 {
        let dealt = raw.saturating_sub(self.armor());
        self.hp = self.hp.saturating_sub(dealt);
        if let Some(loadout) = self.loadout_mut() {
            loadout.total_damage_taken = loadout.total_damage_taken.saturating_add(dealt);
        }
        dealt
    }

    /// [`Unit::take_damage`] followed by the buff-loss check.
    pub fn take_hit(&mut self, raw: u32, team: &str, sink: &mut impl EventSink) -> u32 {
        let dealt = self.take_damage(raw);
        self.check_buff_loss(team, sink);
        dealt
    }

    /// Heals up to `amount`, never past max hp. Returns what was restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }

    pub fn raise_max_hp(&mut self, amount: u32) {
        self.max_hp += amount;
        self.hp += amount;
        if let Some(loadout) = self.loadout_mut() {
            loadout.base_max_hp += amount;
        }
    }

    pub fn grant_buff(&mut self, code: BuffCode) -> Result<(), GrantError> {
        let loadout = self.loadout_mut().ok_or(GrantError::NotLightInfantry)?;
        if loadout.has(code) {
            return Err(GrantError::AlreadyActive);
        }
        loadout.buffs.push(code);
        self.apply_buffs();
        Ok(())
    }

    /// Recomputes max hp, attack and armor from the active buffs, keeping the
    /// current hp ratio (rounded down).
    pub fn apply_buffs(&mut self) {
        let old_max = self.max_hp;
        let old_hp = self.hp;
        if !self.recompute_stats() {
            return;
        }
        self.hp = if old_max == 0 {
            self.max_hp
        } else {
            (u64::from(old_hp) * u64::from(self.max_hp) / u64::from(old_max)) as u32
        };
        self.hp = self.hp.min(self.max_hp);
    }

    /// Strips every buff whose damage threshold has been exceeded. Lost buffs
    /// never come back.
    pub fn check_buff_loss(&mut self, team: &str, sink: &mut impl EventSink) -> Vec<BuffCode> {
        let (position, name) = (self.position, self.name());
        let Some(loadout) = self.loadout_mut() else {
            return Vec::new();
        };
        let total = loadout.total_damage_taken;
        let (lost, kept): (Vec<BuffCode>, Vec<BuffCode>) = loadout
            .buffs
            .iter()
            .copied()
            .partition(|code| code.buff().damage_threshold < total);
        if lost.is_empty() {
            return lost;
        }
        loadout.buffs = kept;
        for code in &lost {
            sink.info(format!("{team}: {name} [{position}] loses its {code}!"));
        }
        self.recompute_stats();
        self.hp = self.hp.min(self.max_hp);
        lost
    }

    /// New unit of the same kind carrying the same buffs and charges, but
    /// fresh health.
    pub fn clone_for_ability(&self) -> Unit {
        let mut twin = Unit::new(self.kind(), self.position);
        match &self.state {
            KindState::LightInfantry(loadout) => {
                if let Some(twin_loadout) = twin.loadout_mut() {
                    twin_loadout.buffs = loadout.buffs.clone();
                }
                twin.recompute_stats();
                twin.hp = twin.max_hp;
            }
            KindState::Healer { healing_charges } => {
                twin.state = KindState::Healer {
                    healing_charges: *healing_charges,
                };
            }
            _ => {}
        }
        twin
    }

    fn recompute_stats(&mut self) -> bool {
        let Some(loadout) = self.loadout_mut() else {
            return false;
        };
        let totals = loadout.totals();
        let (base_max_hp, base_attack) = (loadout.base_max_hp, loadout.base_attack);
        loadout.armor = totals.armor;
        self.max_hp = base_max_hp + totals.hp_boost;
        self.attack = base_attack + totals.attack_boost;
        true
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} - {} HP", self.position, self.name(), self.hp)?;
        match &self.state {
            KindState::LightInfantry(loadout) if !loadout.buffs.is_empty() => {
                let names: Vec<String> = loadout.buffs.iter().map(|b| b.to_string()).collect();
                write!(f, " ({})", names.join(", "))
            }
            KindState::Healer { healing_charges } => write!(f, " ({healing_charges} charges)"),
            _ => Ok(()),
        }
    }
}
