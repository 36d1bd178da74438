use std::fmt;

use crate::unit::{Unit, UnitId, UnitKind};

/// Ordered units of one team. `units[i].position == i + 1` holds after every
/// operation exposed here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    units: Vec<Unit>,
    next_id: u64,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of already-built units (e.g. loaded from a save),
    /// assigning fresh ids and dense positions in the given order.
    pub fn from_units(units: impl IntoIterator<Item = Unit>) -> Self {
        let mut roster = Self::new();
        for unit in units {
            roster.append(unit);
        }
        roster
    }

    pub fn alloc_id(&mut self) -> UnitId {
        self.next_id += 1;
        UnitId(self.next_id)
    }

    /// Appends a fresh unit of `kind` at the back.
    pub fn push(&mut self, kind: UnitKind) -> &mut Unit {
        self.append(Unit::new(kind, 0))
    }

    fn append(&mut self, mut unit: Unit) -> &mut Unit {
        unit.id = self.alloc_id();
        unit.position = self.units.len() + 1;
        self.units.push(unit);
        let last = self.units.len() - 1;
        &mut self.units[last]
    }

    /// Inserts `unit` at `index` (clamped to the end) with a fresh id and
    /// renumbers everything.
    pub fn insert_clone(&mut self, index: usize, mut unit: Unit) -> UnitId {
        let id = self.alloc_id();
        unit.id = id;
        let index = index.min(self.units.len());
        self.units.insert(index, unit);
        self.renumber();
        id
    }

    /// Drops dead units, keeps survivor order, renumbers. Returns how many
    /// were removed.
    pub fn compact(&mut self) -> usize {
        let before = self.units.len();
        self.units.retain(Unit::is_alive);
        self.renumber();
        before - self.units.len()
    }

    fn renumber(&mut self) {
        for (idx, unit) in self.units.iter_mut().enumerate() {
            unit.position = idx + 1;
        }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Mutable access to the units. Slices cannot change length, and nothing
    /// in the engine writes `position` through this.
    pub fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Unit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Unit> {
        self.units.get(index)
    }

    pub fn at_position(&self, position: usize) -> Option<&Unit> {
        position.checked_sub(1).and_then(|idx| self.units.get(idx))
    }

    pub fn at_position_mut(&mut self, position: usize) -> Option<&mut Unit> {
        position.checked_sub(1).and_then(|idx| self.units.get_mut(idx))
    }

    pub fn index_of(&self, id: UnitId) -> Option<usize> {
        self.units.iter().position(|u| u.id == id)
    }

    /// Ids in acting order, captured before a side takes its turn.
    pub fn ids(&self) -> Vec<UnitId> {
        self.units.iter().map(|u| u.id).collect()
    }

    pub fn is_dense(&self) -> bool {
        self.units
            .iter()
            .enumerate()
            .all(|(idx, u)| u.position == idx + 1)
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Unit;
    type IntoIter = std::slice::Iter<'a, Unit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

impl fmt::Display for Roster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.units.is_empty() {
            return writeln!(f, "No units remaining.");
        }
        for unit in &self.units {
            writeln!(f, "{unit}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_of(kinds: &[UnitKind]) -> Roster {
        let mut roster = Roster::new();
        for &kind in kinds {
            roster.push(kind);
        }
        roster
    }

    #[test]
    fn push_assigns_dense_positions_and_unique_ids() {
        let roster = roster_of(&[UnitKind::Archer, UnitKind::Wizard, UnitKind::Healer]);
        assert!(roster.is_dense());
        let mut ids = roster.ids();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn compact_drops_dead_and_renumbers() {
        let mut roster = roster_of(&[
            UnitKind::LightInfantry,
            UnitKind::Archer,
            UnitKind::HeavyInfantry,
        ]);
        roster.units_mut()[0].hp = 0;
        let survivors: Vec<UnitId> = roster.ids()[1..].to_vec();

        assert_eq!(roster.compact(), 1);
        assert_eq!(roster.ids(), survivors);
        assert!(roster.is_dense());
        assert_eq!(roster.get(0).unwrap().kind(), UnitKind::Archer);
    }

    #[test]
    fn compact_is_idempotent() {
        let mut roster = roster_of(&[UnitKind::Archer, UnitKind::Wizard, UnitKind::Healer]);
        roster.units_mut()[1].hp = 0;
        roster.compact();
        let once = roster.clone();
        assert_eq!(roster.compact(), 0);
        assert_eq!(roster, once);
    }

    #[test]
    fn insert_clone_renumbers_tail() {
        let mut roster = roster_of(&[UnitKind::LightInfantry, UnitKind::Archer]);
        let twin = roster.get(0).unwrap().clone_for_ability();
        let id = roster.insert_clone(1, twin);

        assert_eq!(roster.len(), 3);
        assert_eq!(roster.index_of(id), Some(1));
        assert!(roster.is_dense());
        assert_eq!(roster.at_position(3).unwrap().kind(), UnitKind::Archer);
    }

    #[test]
    fn display_lists_each_unit() {
        let roster = roster_of(&[UnitKind::HeavyInfantry]);
        assert_eq!(roster.to_string(), "[1] Heavy Infantry - 100 HP\n");
        assert_eq!(Roster::new().to_string(), "No units remaining.\n");
    }
}
