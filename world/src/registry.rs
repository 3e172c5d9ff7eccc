//! Authoritative unit storage and the occupancy grid derived from it.

use std::collections::BTreeMap;

use hex_tactics_core::{
    CommandError, GridBounds, HexCoord, PlayerId, UnitId, UnitKind, UnitSnapshot,
};

/// Mutable state of a single fielded unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Unit {
    pub(crate) id: UnitId,
    pub(crate) kind: UnitKind,
    pub(crate) owner: PlayerId,
    pub(crate) cell: HexCoord,
    pub(crate) hp: u32,
    pub(crate) remaining_moves: u32,
}

impl Unit {
    pub(crate) fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            id: self.id,
            kind: self.kind,
            owner: self.owner,
            cell: self.cell,
            hp: self.hp,
            remaining_moves: self.remaining_moves,
        }
    }
}

/// Result of subtracting hit points from a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Damage {
    /// The unit survived with the given hit points.
    Survived(u32),
    /// The unit reached zero hit points and left the map.
    Removed(Unit),
}

/// Registry storing units and the single source of truth for occupancy.
///
/// Units are keyed by identifier so iteration order is deterministic; the
/// dense row-major occupancy grid mirrors every unit position.
#[derive(Clone, Debug)]
pub(crate) struct UnitRegistry {
    bounds: GridBounds,
    units: BTreeMap<UnitId, Unit>,
    occupancy: Vec<Option<UnitId>>,
    next_unit_id: u32,
}

impl UnitRegistry {
    pub(crate) fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            units: BTreeMap::new(),
            occupancy: vec![None; bounds.cell_count()],
            next_unit_id: 0,
        }
    }

    /// Places a new unit with full hit points and move allowance.
    pub(crate) fn spawn(
        &mut self,
        kind: UnitKind,
        cell: HexCoord,
        owner: PlayerId,
    ) -> Result<UnitId, CommandError> {
        let index = self
            .bounds
            .index(cell)
            .ok_or(CommandError::InvalidCoordinate { cell })?;
        if self.occupancy[index].is_some() {
            return Err(CommandError::OccupiedDestination { cell });
        }

        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id = self.next_unit_id.saturating_add(1);
        let stats = kind.stats();
        let _ = self.units.insert(
            id,
            Unit {
                id,
                kind,
                owner,
                cell,
                hp: stats.max_hp(),
                remaining_moves: stats.move_allowance(),
            },
        );
        self.occupancy[index] = Some(id);
        Ok(id)
    }

    pub(crate) fn remove(&mut self, id: UnitId) -> Result<Unit, CommandError> {
        let unit = self
            .units
            .remove(&id)
            .ok_or(CommandError::UnknownUnit { unit: id })?;
        if let Some(slot) = self.slot_mut(unit.cell) {
            *slot = None;
        }
        Ok(unit)
    }

    pub(crate) fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Unit standing on the cell, ignoring `excluding` when provided.
    pub(crate) fn occupant_at(&self, cell: HexCoord, excluding: Option<UnitId>) -> Option<&Unit> {
        let index = self.bounds.index(cell)?;
        let id = self.occupancy.get(index).copied().flatten()?;
        if Some(id) == excluding {
            return None;
        }
        self.units.get(&id)
    }

    pub(crate) fn all_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub(crate) fn units_of(&self, player: PlayerId) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(move |unit| unit.owner == player)
    }

    /// Moves a unit onto a free cell and deducts the paid move points.
    pub(crate) fn relocate(&mut self, id: UnitId, to: HexCoord, cost: u32) {
        let Some(unit) = self.units.get_mut(&id) else {
            return;
        };
        let from = unit.cell;
        unit.cell = to;
        unit.remaining_moves = unit.remaining_moves.saturating_sub(cost);

        if let Some(slot) = self.slot_mut(from) {
            *slot = None;
        }
        if let Some(slot) = self.slot_mut(to) {
            *slot = Some(id);
        }
    }

    /// Restores the move allowance of every unit owned by `player`.
    pub(crate) fn reset_moves_for(&mut self, player: PlayerId) {
        for unit in self.units.values_mut().filter(|unit| unit.owner == player) {
            unit.remaining_moves = unit.kind.stats().move_allowance();
        }
    }

    /// Subtracts hit points, removing the unit once none remain.
    pub(crate) fn apply_damage(&mut self, id: UnitId, amount: u32) -> Result<Damage, CommandError> {
        let unit = self
            .units
            .get_mut(&id)
            .ok_or(CommandError::UnknownUnit { unit: id })?;
        unit.hp = unit.hp.saturating_sub(amount);
        if unit.hp > 0 {
            return Ok(Damage::Survived(unit.hp));
        }
        self.remove(id).map(Damage::Removed)
    }

    pub(crate) fn occupancy(&self) -> &[Option<UnitId>] {
        &self.occupancy
    }

    fn slot_mut(&mut self, cell: HexCoord) -> Option<&mut Option<UnitId>> {
        let index = self.bounds.index(cell)?;
        self.occupancy.get_mut(index)
    }
}
