//! Shortest-path guidance toward the goal.

use std::collections::VecDeque;

use creepline_core::{CellCoord, Grid};

use crate::towers::TowerMap;

/// Breadth-first navigation tree rooted at the goal.
///
/// Every reachable cell records the neighbor one step closer to the goal;
/// the goal records itself. Distances are `u32::MAX` for cells that cannot
/// reach the goal so callers can tell walls from open ground.
#[derive(Clone, Debug)]
pub struct NavigationProvider {
    grid: Grid,
    steps: Vec<Option<CellCoord>>,
    distances: Vec<u32>,
}

impl NavigationProvider {
    pub(crate) fn new(grid: &Grid) -> Self {
        let cell_count = grid.cell_count();
        Self {
            grid: grid.clone(),
            steps: vec![None; cell_count],
            distances: vec![u32::MAX; cell_count],
        }
    }

    /// Recomputes the tree from scratch, treating tower cells as walls.
    ///
    /// Neighbors are expanded in the fixed order down, up, right, left, so
    /// ties between equally short paths always resolve the same way.
    pub(crate) fn rebuild(&mut self, towers: &TowerMap) {
        self.steps.fill(None);
        self.distances.fill(u32::MAX);

        let goal = self.grid.goal();
        let Some(goal_index) = self.grid.index(goal) else {
            return;
        };
        if towers.has_tower(goal) {
            return;
        }

        self.steps[goal_index] = Some(goal);
        self.distances[goal_index] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(goal);

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = self.grid.index(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for neighbor in self.grid.neighbors(cell) {
                if towers.has_tower(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = self.grid.index(neighbor) else {
                    continue;
                };

                if self.steps[neighbor_index].is_some() {
                    continue;
                }

                self.steps[neighbor_index] = Some(cell);
                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Neighbor one step closer to the goal.
    ///
    /// Returns `None` for cells outside the grid and for cells walled off
    /// from the goal. The goal maps to itself.
    #[must_use]
    pub fn next_step(&self, cell: CellCoord) -> Option<CellCoord> {
        self.grid
            .index(cell)
            .and_then(|index| self.steps.get(index).copied().flatten())
    }

    /// Number of steps from the cell to the goal, if it is reachable.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        self.grid
            .index(cell)
            .and_then(|index| self.distances.get(index).copied())
            .filter(|distance| *distance != u32::MAX)
    }

    /// Cell every path leads to.
    #[must_use]
    pub fn goal(&self) -> CellCoord {
        self.grid.goal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::towers::TowerRegistry;
    use creepline_core::TowerKind;

    #[test]
    fn goal_points_to_itself_and_neighbors_point_to_goal() {
        let grid = Grid::new(3, 4, CellCoord::new(1, 2), 0, 1);
        let towers = TowerRegistry::new(&grid);
        let mut navigation = NavigationProvider::new(&grid);
        navigation.rebuild(towers.map());

        assert_eq!(navigation.next_step(CellCoord::new(1, 2)), Some(CellCoord::new(1, 2)));
        assert_eq!(navigation.distance(CellCoord::new(1, 2)), Some(0));
        assert_eq!(navigation.next_step(CellCoord::new(1, 1)), Some(CellCoord::new(1, 2)));
        assert_eq!(navigation.distance(CellCoord::new(1, 0)), Some(2));
        assert_eq!(navigation.distance(CellCoord::new(0, 0)), Some(3));
    }

    #[test]
    fn ties_resolve_in_expansion_order() {
        // (0, 0) is reachable in two steps through either (1, 0) or (0, 1).
        // The goal expands up before left, so (1, 0) is discovered first and
        // then expands left into (0, 0).
        let grid = Grid::new(2, 2, CellCoord::new(1, 1), 0, 1);
        let towers = TowerRegistry::new(&grid);
        let mut navigation = NavigationProvider::new(&grid);
        navigation.rebuild(towers.map());

        assert_eq!(navigation.next_step(CellCoord::new(0, 0)), Some(CellCoord::new(1, 0)));
    }

    #[test]
    fn towers_are_walls() {
        let grid = Grid::new(3, 4, CellCoord::new(1, 2), 0, 1);
        let mut towers = TowerRegistry::new(&grid);
        let wall = CellCoord::new(1, 1);
        let _ = towers.insert(TowerKind::GenericTower, wall);

        let mut navigation = NavigationProvider::new(&grid);
        navigation.rebuild(towers.map());

        assert_eq!(navigation.next_step(wall), None);
        assert_eq!(navigation.distance(wall), None);
        assert_eq!(navigation.distance(CellCoord::new(1, 0)), Some(4));
        assert_eq!(navigation.distance(CellCoord::new(0, 1)), Some(2));
    }

    #[test]
    fn out_of_bounds_cells_have_no_step() {
        let grid = Grid::new(2, 2, CellCoord::new(0, 0), 0, 1);
        let towers = TowerRegistry::new(&grid);
        let mut navigation = NavigationProvider::new(&grid);
        navigation.rebuild(towers.map());
        assert_eq!(navigation.next_step(CellCoord::new(2, 0)), None);
        assert_eq!(navigation.distance(CellCoord::new(0, 5)), None);
    }
}
