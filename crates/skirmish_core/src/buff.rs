//! Static buff table. Buffs only ever attach to light infantry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuffCode {
    /// Mounted: extra hits per attack.
    Horse,
    Shield,
    Spear,
    Helmet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buff {
    pub name: &'static str,
    pub hp_boost: u32,
    pub attack_boost: u32,
    pub extra_attack_bonus: u32,
    pub armor: u32,
    pub cost: u32,
    /// Cumulative damage beyond which the buff is stripped.
    pub damage_threshold: u32,
}

const HORSE: Buff = Buff {
    name: "Horse",
    hp_boost: 20,
    attack_boost: 0,
    extra_attack_bonus: 2,
    armor: 0,
    cost: 20,
    damage_threshold: 15,
};

const SHIELD: Buff = Buff {
    name: "Shield",
    hp_boost: 0,
    attack_boost: 0,
    extra_attack_bonus: 0,
    armor: 10,
    cost: 15,
    damage_threshold: 40,
};

const SPEAR: Buff = Buff {
    name: "Spear",
    hp_boost: 0,
    attack_boost: 4,
    extra_attack_bonus: 0,
    armor: 0,
    cost: 10,
    damage_threshold: 25,
};

const HELMET: Buff = Buff {
    name: "Helmet",
    hp_boost: 10,
    attack_boost: 0,
    extra_attack_bonus: 0,
    armor: 3,
    cost: 10,
    damage_threshold: 30,
};

impl BuffCode {
    pub const ALL: [BuffCode; 4] = [
        BuffCode::Horse,
        BuffCode::Shield,
        BuffCode::Spear,
        BuffCode::Helmet,
    ];

    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "HR" => Some(BuffCode::Horse),
            "SH" => Some(BuffCode::Shield),
            "SP" => Some(BuffCode::Spear),
            "HM" => Some(BuffCode::Helmet),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            BuffCode::Horse => "HR",
            BuffCode::Shield => "SH",
            BuffCode::Spear => "SP",
            BuffCode::Helmet => "HM",
        }
    }

    pub fn buff(&self) -> &'static Buff {
        match self {
            BuffCode::Horse => &HORSE,
            BuffCode::Shield => &SHIELD,
            BuffCode::Spear => &SPEAR,
            BuffCode::Helmet => &HELMET,
        }
    }

    /// Splits a concatenation such as `HRSH` into codes.
    pub fn parse_list(s: &str) -> Result<Vec<BuffCode>, CodeError> {
        if s.len() % 2 != 0 || !s.is_ascii() {
            return Err(CodeError::UnknownBuff(s.to_string()));
        }
        s.as_bytes()
            .chunks(2)
            .map(|chunk| {
                let token = std::str::from_utf8(chunk)
                    .map_err(|_| CodeError::UnknownBuff(s.to_string()))?;
                BuffCode::from_str(token)
            })
            .collect()
    }
}

impl fmt::Display for BuffCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.buff().name)
    }
}

impl FromStr for BuffCode {
    type Err = CodeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuffCode::from_code(s).ok_or_else(|| CodeError::UnknownBuff(s.to_string()))
    }
}

/// Sums of every active buff's modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuffTotals {
    pub hp_boost: u32,
    pub attack_boost: u32,
    pub extra_attack_bonus: u32,
    pub armor: u32,
}

impl BuffTotals {
    pub fn of(codes: &[BuffCode]) -> Self {
        codes.iter().map(BuffCode::buff).fold(Self::default(), |acc, b| Self {
            hp_boost: acc.hp_boost + b.hp_boost,
            attack_boost: acc.attack_boost + b.attack_boost,
            extra_attack_bonus: acc.extra_attack_bonus + b.extra_attack_bonus,
            armor: acc.armor + b.armor,
        })
    }
}
