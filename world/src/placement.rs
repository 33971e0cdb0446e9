//! Tower placement legality.
//!
//! A cell is placeable when putting a wall on it cannot disconnect any spawn
//! point or live creep from the goal. The oracle finds such cells with a
//! single depth-first search from the goal that computes discovery order,
//! low-links, and the number of demand cells (spawn points and creep cells)
//! in each DFS subtree. A cell is a cut when removing it isolates a subtree
//! that still carries demand.

use creepline_core::{CellCoord, Grid};

use crate::towers::TowerMap;

const UNVISITED: u32 = u32::MAX;

#[derive(Clone, Copy, Debug)]
struct Frame {
    cell: usize,
    neighbors: [usize; 4],
    count: usize,
    next: usize,
}

/// Per-cell placement restrictions.
#[derive(Clone, Debug)]
pub struct PlacementOracle {
    grid: Grid,
    forbidden: Vec<bool>,
    spawn: Vec<bool>,
    creep_occupied: Vec<bool>,
    tower: Vec<bool>,
    cut: Vec<bool>,
    pre: Vec<u32>,
    low: Vec<u32>,
    demand: Vec<u32>,
    parent: Vec<Option<usize>>,
    stack: Vec<Frame>,
}

impl PlacementOracle {
    pub(crate) fn new(grid: &Grid, spawn_points: &[CellCoord]) -> Self {
        let cell_count = grid.cell_count();
        let mut forbidden = vec![false; cell_count];
        let mut spawn = vec![false; cell_count];

        if let Some(index) = grid.index(grid.goal()) {
            forbidden[index] = true;
        }
        for cell in spawn_points {
            if let Some(index) = grid.index(*cell) {
                forbidden[index] = true;
                spawn[index] = true;
            }
        }

        Self {
            grid: grid.clone(),
            forbidden,
            spawn,
            creep_occupied: vec![false; cell_count],
            tower: vec![false; cell_count],
            cut: vec![false; cell_count],
            pre: vec![UNVISITED; cell_count],
            low: vec![UNVISITED; cell_count],
            demand: vec![0; cell_count],
            parent: vec![None; cell_count],
            stack: Vec::new(),
        }
    }

    /// Reports whether a tower may be constructed on the cell right now.
    #[must_use]
    pub fn can_place_tower_here(&self, cell: CellCoord) -> bool {
        let Some(index) = self.grid.index(cell) else {
            return false;
        };
        !self.forbidden[index] && !self.creep_occupied[index] && !self.tower[index] && !self.cut[index]
    }

    /// Every cell that currently accepts a tower, in row-major order.
    #[must_use]
    pub fn placeable_cells(&self) -> Vec<CellCoord> {
        self.grid
            .cells()
            .filter(|cell| self.can_place_tower_here(*cell))
            .collect()
    }

    /// Recomputes the restrictions after a tower was added or removed.
    pub(crate) fn update_tower_restrictions(&mut self, towers: &TowerMap) {
        for (index, slot) in self.tower.iter_mut().enumerate() {
            *slot = towers.has_tower_at_index(index);
        }
        self.analyse();
    }

    /// Replaces the creep occupancy view and recomputes the restrictions.
    pub(crate) fn update_creep_restrictions<I>(&mut self, occupied: I)
    where
        I: IntoIterator<Item = CellCoord>,
    {
        self.creep_occupied.fill(false);
        for cell in occupied {
            if let Some(index) = self.grid.index(cell) {
                self.creep_occupied[index] = true;
            }
        }
        self.analyse();
    }

    fn analyse(&mut self) {
        self.cut.fill(false);
        self.pre.fill(UNVISITED);
        self.low.fill(UNVISITED);
        self.demand.fill(0);
        self.parent.fill(None);
        self.stack.clear();

        let Some(root) = self.grid.index(self.grid.goal()) else {
            return;
        };
        if self.tower[root] {
            return;
        }

        let mut counter = 0;
        self.discover(root, None, &mut counter);

        loop {
            let (cell, neighbor) = match self.stack.last_mut() {
                Some(frame) if frame.next < frame.count => {
                    let neighbor = frame.neighbors[frame.next];
                    frame.next += 1;
                    (frame.cell, Some(neighbor))
                }
                Some(frame) => (frame.cell, None),
                None => break,
            };

            match neighbor {
                Some(neighbor) => {
                    if self.tower[neighbor] {
                        continue;
                    }
                    if self.pre[neighbor] == UNVISITED {
                        self.discover(neighbor, Some(cell), &mut counter);
                    } else if self.parent[cell] != Some(neighbor) {
                        self.low[cell] = self.low[cell].min(self.pre[neighbor]);
                    }
                }
                None => {
                    let _ = self.stack.pop();
                    self.finish(cell);
                }
            }
        }
    }

    fn discover(&mut self, cell: usize, parent: Option<usize>, counter: &mut u32) {
        self.parent[cell] = parent;
        self.pre[cell] = *counter;
        self.low[cell] = *counter;
        *counter += 1;
        self.demand[cell] = u32::from(self.spawn[cell] || self.creep_occupied[cell]);

        let mut frame = Frame {
            cell,
            neighbors: [0; 4],
            count: 0,
            next: 0,
        };
        if let Some(coord) = self.grid.cell_at(cell) {
            for neighbor in self.grid.neighbors(coord) {
                if let Some(index) = self.grid.index(neighbor) {
                    frame.neighbors[frame.count] = index;
                    frame.count += 1;
                }
            }
        }
        self.stack.push(frame);
    }

    fn finish(&mut self, cell: usize) {
        let Some(parent) = self.parent[cell] else {
            return;
        };
        self.low[parent] = self.low[parent].min(self.low[cell]);
        self.demand[parent] = self.demand[parent].saturating_add(self.demand[cell]);
        if self.low[cell] >= self.pre[parent] && self.demand[cell] > 0 {
            self.cut[parent] = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::towers::TowerRegistry;
    use creepline_core::TowerKind;

    fn oracle(grid: &Grid, spawns: &[CellCoord], towers: &TowerRegistry) -> PlacementOracle {
        let mut oracle = PlacementOracle::new(grid, spawns);
        oracle.update_tower_restrictions(towers.map());
        oracle
    }

    #[test]
    fn goal_and_spawn_points_are_forbidden() {
        let grid = Grid::new(4, 4, CellCoord::new(3, 3), 0, 1);
        let towers = TowerRegistry::new(&grid);
        let oracle = oracle(&grid, &[CellCoord::new(0, 0)], &towers);
        assert!(!oracle.can_place_tower_here(CellCoord::new(3, 3)));
        assert!(!oracle.can_place_tower_here(CellCoord::new(0, 0)));
        assert!(oracle.can_place_tower_here(CellCoord::new(1, 1)));
        assert!(!oracle.can_place_tower_here(CellCoord::new(4, 0)));
    }

    #[test]
    fn corridor_cells_leading_to_a_spawn_are_cuts() {
        let grid = Grid::new(4, 1, CellCoord::new(3, 0), 0, 1);
        let towers = TowerRegistry::new(&grid);
        let oracle = oracle(&grid, &[CellCoord::new(0, 0)], &towers);
        assert!(!oracle.can_place_tower_here(CellCoord::new(1, 0)));
        assert!(!oracle.can_place_tower_here(CellCoord::new(2, 0)));
    }

    #[test]
    fn dead_end_corridor_without_demand_stays_placeable() {
        // Row 0 runs from the spawn to the goal; row 1 hangs below as a dead
        // end reachable only through (1, 0).
        let grid = Grid::new(3, 2, CellCoord::new(2, 0), 0, 1);
        let mut towers = TowerRegistry::new(&grid);
        let _ = towers.insert(TowerKind::GenericTower, CellCoord::new(0, 1));
        let _ = towers.insert(TowerKind::GenericTower, CellCoord::new(2, 1));
        let oracle = oracle(&grid, &[CellCoord::new(0, 0)], &towers);

        assert!(!oracle.can_place_tower_here(CellCoord::new(1, 0)));
        assert!(oracle.can_place_tower_here(CellCoord::new(1, 1)));
    }

    #[test]
    fn creep_cells_add_demand_and_become_unplaceable() {
        let grid = Grid::new(3, 2, CellCoord::new(2, 0), 0, 1);
        let mut towers = TowerRegistry::new(&grid);
        let _ = towers.insert(TowerKind::GenericTower, CellCoord::new(0, 1));
        let _ = towers.insert(TowerKind::GenericTower, CellCoord::new(2, 1));
        let mut oracle = oracle(&grid, &[CellCoord::new(0, 0)], &towers);
        assert!(oracle.can_place_tower_here(CellCoord::new(1, 1)));

        oracle.update_creep_restrictions([CellCoord::new(1, 1)]);
        assert!(!oracle.can_place_tower_here(CellCoord::new(1, 1)));
        assert!(!oracle.can_place_tower_here(CellCoord::new(1, 0)));

        oracle.update_creep_restrictions(std::iter::empty());
        assert!(oracle.can_place_tower_here(CellCoord::new(1, 1)));
    }

    #[test]
    fn cells_behind_towers_remain_placeable() {
        let grid = Grid::new(3, 3, CellCoord::new(2, 2), 0, 1);
        let mut towers = TowerRegistry::new(&grid);
        let _ = towers.insert(TowerKind::GenericTower, CellCoord::new(1, 0));
        let _ = towers.insert(TowerKind::GenericTower, CellCoord::new(0, 1));
        let oracle = oracle(&grid, &[CellCoord::new(2, 0)], &towers);

        // (0, 0) is enclosed by towers and carries no demand.
        assert!(oracle.can_place_tower_here(CellCoord::new(0, 0)));
        assert!(!oracle.can_place_tower_here(CellCoord::new(1, 0)));
        assert!(!oracle.can_place_tower_here(CellCoord::new(2, 1)));
    }
}
