//! Authoritative tower state and the dense obstacle map derived from it.

use std::collections::BTreeMap;

use creepline_core::{CellCoord, Grid, TowerId, TowerKind};
use creepline_system_tower_combat::Firing;
use creepline_system_tower_targeting::Targeting;

/// Dense row-major map recording which tower, if any, occupies each cell.
///
/// This is the single source of truth for obstacles; navigation and
/// placement analysis borrow it for the duration of a rebuild.
#[derive(Clone, Debug)]
pub struct TowerMap {
    width: u32,
    height: u32,
    cells: Vec<Option<TowerId>>,
}

impl TowerMap {
    pub(crate) fn new(grid: &Grid) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            cells: vec![None; grid.cell_count()],
        }
    }

    /// Tower occupying the cell, if any.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<TowerId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Reports whether a tower occupies the cell.
    #[must_use]
    pub fn has_tower(&self, cell: CellCoord) -> bool {
        self.get(cell).is_some()
    }

    /// Reports whether a tower occupies the cell at the row-major index.
    #[must_use]
    pub fn has_tower_at_index(&self, index: usize) -> bool {
        self.cells.get(index).copied().flatten().is_some()
    }

    fn occupy(&mut self, cell: CellCoord, tower: TowerId) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(tower);
            }
        }
    }

    fn vacate(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = None;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.width && cell.row() < self.height {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// A constructed tower with its strategies.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    pub(crate) id: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) cell: CellCoord,
    pub(crate) sell_value: u64,
    pub(crate) targeting: Targeting,
    pub(crate) firing: Firing,
}

impl Tower {
    fn new(id: TowerId, kind: TowerKind, cell: CellCoord) -> Self {
        Self {
            id,
            kind,
            cell,
            sell_value: kind.sell_value(),
            targeting: Targeting::new(kind.targeting()),
            firing: Firing::for_tower(kind),
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    map: TowerMap,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    pub(crate) fn new(grid: &Grid) -> Self {
        Self {
            entries: BTreeMap::new(),
            map: TowerMap::new(grid),
            next_tower_id: TowerId::new(0),
        }
    }

    pub(crate) fn map(&self) -> &TowerMap {
        &self.map
    }

    pub(crate) fn insert(&mut self, kind: TowerKind, cell: CellCoord) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        self.map.occupy(cell, id);
        let _ = self.entries.insert(id, Tower::new(id, kind, cell));
        id
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<Tower> {
        let tower = self.entries.remove(&id)?;
        self.map.vacate(tower.cell);
        Some(tower)
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    pub(crate) fn contains(&self, id: TowerId) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
