//! Breadth-first search (spec §4.6): Dijkstra with unit edge weight and an
//! accessibility callback in place of `step_lengths`, backed by a FIFO
//! queue instead of a heap since every edge costs exactly one step.

use super::{reconstruct_path, Visited};
use crate::cell::{Cell, CellPath, Step};
use crate::error::{GridError, GridResult};
use crate::grid::Grid;
use std::collections::{HashSet, VecDeque};

pub struct BfsRun {
    source: Cell,
    visited: Visited,
}

impl BfsRun {
    /// Run BFS from `source` until every cell in `targets` has been found
    /// (or the frontier is exhausted), stopping early past `max_distance`
    /// steps if given.
    pub fn run(
        grid: &dyn Grid,
        source: Cell,
        targets: &[Cell],
        mut accessible: impl FnMut(Cell) -> bool,
        max_distance: Option<u32>,
    ) -> GridResult<BfsRun> {
        if !grid.is_cell_in_grid(source) {
            return Err(GridError::CellNotInGrid);
        }
        let mut visited = Visited::new();
        visited.relax(source, 0.0, None);
        let targets: HashSet<Cell> = targets.iter().copied().collect();
        let mut remaining = targets.clone();
        remaining.remove(&source);

        let mut queue: VecDeque<Cell> = VecDeque::new();
        queue.push_back(source);

        while let Some(current) = queue.pop_front() {
            let distance = visited.score_of(current).unwrap_or(0.0);
            if remaining.is_empty() {
                break;
            }
            if let Some(limit) = max_distance {
                if distance >= limit as f32 {
                    log::trace!("bfs pruning frontier at {current:?}, max_distance {limit} reached");
                    continue;
                }
            }
            for dir in grid.cell_dirs(current) {
                let Some((dest, inverse_dir, connection)) = grid.try_move(current, dir) else {
                    continue;
                };
                if visited.contains(dest) || !accessible(dest) {
                    continue;
                }
                let step = Step {
                    src: current,
                    dest,
                    dir,
                    inverse_dir,
                    connection,
                    length: 1.0,
                };
                visited.relax(dest, distance + 1.0, Some(step));
                remaining.remove(&dest);
                queue.push_back(dest);
            }
        }

        Ok(BfsRun { source, visited })
    }

    pub fn path_to(&self, target: Cell) -> GridResult<CellPath> {
        if !self.visited.contains(target) && target != self.source {
            return Err(GridError::PathNotFound);
        }
        reconstruct_path(&self.visited, self.source, target)
    }

    /// Integer step distance to `cell`, or `None` if unreached.
    pub fn distance_to(&self, cell: Cell) -> Option<u32> {
        if cell == self.source {
            return Some(0);
        }
        self.visited.score_of(cell).map(|s| s as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bfs_with_obstacle_matches_spec_scenario() {
        use crate::grids::square::SquareGrid;
        let grid = SquareGrid::new(1.0);
        let source = Cell::new(0, 0, 0);
        let target = Cell::new(3, 3, 0);
        let obstacle = Cell::new(2, 2, 0);
        let run = BfsRun::run(&grid, source, &[target], |cell| cell != obstacle, None).unwrap();
        // The named scenario this is drawn from states distance 7, but a
        // single cell at (2,2) blocks none of the monotone 4-connected
        // routes from (0,0) to (3,3) (e.g. R,R,R,U,U,U never visits
        // (2,2)), so the true shortest distance is 6, same as the
        // unobstructed case below. Asserting 7 here would fail against a
        // correct BFS.
        assert_eq!(run.distance_to(target), Some(6));
        let path = run.path_to(target).unwrap();
        assert!(path.steps.iter().all(|s| s.dest != obstacle));
        assert_eq!(path.steps.len(), 6);
    }

    #[test]
    fn direct_path_without_obstacle_is_manhattan_distance() {
        use crate::grids::square::SquareGrid;
        let grid = SquareGrid::new(1.0);
        let source = Cell::new(0, 0, 0);
        let target = Cell::new(3, 3, 0);
        let run = BfsRun::run(&grid, source, &[target], |_cell| true, None).unwrap();
        assert_eq!(run.distance_to(target), Some(6));
    }
}
