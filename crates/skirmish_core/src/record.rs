//! One-line textual form of a unit:
//! `kind_code position hp max_hp [extra...]`.
//!
//! Light infantry append `total_damage_taken` and their buff codes glued
//! together (`HRSH`, omitted when empty); healers append their charges.

use crate::buff::{BuffCode, BuffTotals};
use crate::error::RecordError;
use crate::unit::{KindState, Unit, UnitKind};

pub fn encode(unit: &Unit) -> String {
    let mut line = format!(
        "{} {} {} {}",
        unit.kind().code(),
        unit.position,
        unit.hp,
        unit.max_hp
    );
    match &unit.state {
        KindState::LightInfantry(loadout) => {
            line.push_str(&format!(" {}", loadout.total_damage_taken));
            if !loadout.buffs.is_empty() {
                line.push(' ');
                for code in &loadout.buffs {
                    line.push_str(code.code());
                }
            }
        }
        KindState::Healer { healing_charges } => {
            line.push_str(&format!(" {healing_charges}"));
        }
        _ => {}
    }
    line
}

pub fn decode(line: &str) -> Result<Unit, RecordError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let Some((&code, rest)) = fields.split_first() else {
        return Err(RecordError::Empty);
    };
    let kind: UnitKind = code.parse()?;
    let (expected, accepted) = match kind {
        UnitKind::LightInfantry => ("4 or 5", 4..=5),
        UnitKind::Healer => ("4", 4..=4),
        _ => ("3", 3..=3),
    };
    if !accepted.contains(&rest.len()) {
        return Err(RecordError::FieldCount {
            kind: kind.code(),
            expected,
            found: rest.len(),
        });
    }

    let position = number(rest[0], "position")? as usize;
    if position == 0 {
        return Err(RecordError::ZeroPosition);
    }
    let hp = number(rest[1], "hp")?;
    let max_hp = number(rest[2], "max_hp")?;
    if hp > max_hp {
        return Err(RecordError::HpAboveMax { hp, max_hp });
    }

    let mut unit = Unit::new(kind, position);
    unit.hp = hp;
    unit.max_hp = max_hp;
    match &mut unit.state {
        KindState::LightInfantry(loadout) => {
            loadout.total_damage_taken = number(rest[3], "total_damage_taken")?;
            if let Some(list) = rest.get(4) {
                let codes = BuffCode::parse_list(list)
                    .map_err(|_| RecordError::BuffList(list.to_string()))?;
                let mut seen = Vec::with_capacity(codes.len());
                for code in codes {
                    if seen.contains(&code) {
                        return Err(RecordError::BuffList(list.to_string()));
                    }
                    seen.push(code);
                }
                loadout.buffs = seen;
            }
            let totals = BuffTotals::of(&loadout.buffs);
            loadout.armor = totals.armor;
            loadout.base_max_hp = max_hp.saturating_sub(totals.hp_boost);
            unit.attack = loadout.base_attack + totals.attack_boost;
        }
        KindState::Healer { healing_charges } => {
            *healing_charges = number(rest[3], "healing_charges")?;
        }
        _ => {}
    }
    Ok(unit)
}

fn number(value: &str, field: &'static str) -> Result<u32, RecordError> {
    value.parse().map_err(|_| RecordError::NotANumber {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::BattleEvent;
    use crate::unit::FortBoost;

    #[test]
    fn light_infantry_keeps_damage_and_buffs() {
        let mut events: Vec<BattleEvent> = Vec::new();
        let mut li = Unit::new(UnitKind::LightInfantry, 2);
        li.grant_buff(BuffCode::Horse).unwrap();
        li.grant_buff(BuffCode::Shield).unwrap();
        li.take_hit(18, "Red", &mut events);
        FortBoost::default().apply(&mut li);

        let line = encode(&li);
        assert_eq!(line, "LI 2 72 80 8 HRSH");
        let back = decode(&line).unwrap();
        assert_eq!(back.state, li.state);
        assert_eq!((back.hp, back.max_hp, back.attack), (li.hp, li.max_hp, li.attack));
    }

    #[test]
    fn healer_keeps_charges() {
        let mut healer = Unit::new(UnitKind::Healer, 4);
        healer.state = KindState::Healer { healing_charges: 1 };
        let line = encode(&healer);
        assert_eq!(line, "H 4 50 50 1");
        assert_eq!(decode(&line).unwrap().healing_charges(), Some(1));
    }

    #[test]
    fn plain_kinds_carry_only_common_fields() {
        let mut wizard = Unit::new(UnitKind::Wizard, 1);
        wizard.hp = 12;
        assert_eq!(encode(&wizard), "W 1 12 30");
        let unbuffed = decode("LI 3 40 50 10").unwrap();
        assert!(unbuffed.loadout().unwrap().buffs.is_empty());
    }

    #[test]
    fn malformed_records_are_rejected() {
        assert_eq!(decode("   "), Err(RecordError::Empty));
        assert!(matches!(decode("ZZ 1 2 3"), Err(RecordError::Code(_))));
        assert!(matches!(
            decode("HI 1 100"),
            Err(RecordError::FieldCount { found: 2, .. })
        ));
        assert!(matches!(
            decode("A 1 forty 40"),
            Err(RecordError::NotANumber { field: "hp", .. })
        ));
        assert_eq!(
            decode("A 1 41 40"),
            Err(RecordError::HpAboveMax { hp: 41, max_hp: 40 })
        );
        assert_eq!(decode("A 0 40 40"), Err(RecordError::ZeroPosition));
        assert!(matches!(
            decode("LI 1 50 50 0 HRHR"),
            Err(RecordError::BuffList(_))
        ));
    }
}
