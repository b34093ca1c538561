//! Dijkstra's algorithm (spec §4.6): A* with a zero heuristic, plus
//! `max_range` early termination and bulk distance extraction.

use super::{reconstruct_path, Visited};
use crate::cell::{Cell, CellPath, Step};
use crate::error::{GridError, GridResult};
use crate::grid::Grid;
use crate::pqueue::PriorityQueue;

/// The result of a single Dijkstra run from one source, over every cell
/// reached before `max_range` (if any) cut the search off.
pub struct DijkstraRun {
    source: Cell,
    visited: Visited,
}

impl DijkstraRun {
    /// Run Dijkstra from `source`, expanding every cell whose shortest
    /// distance is `<= max_range` (or without limit if `max_range` is
    /// `None`).
    pub fn run(
        grid: &dyn Grid,
        source: Cell,
        mut step_lengths: impl FnMut(&Step) -> f32,
        mut accessible: impl FnMut(Cell) -> bool,
        max_range: Option<f32>,
    ) -> GridResult<DijkstraRun> {
        if !grid.is_cell_in_grid(source) {
            return Err(GridError::CellNotInGrid);
        }
        let mut visited = Visited::new();
        visited.relax(source, 0.0, None);

        let mut open: PriorityQueue<Cell> = PriorityQueue::new();
        open.push(0.0, source);

        while let Some((key, current)) = open.pop() {
            if let Some(limit) = max_range {
                if key > limit {
                    log::debug!("dijkstra stopping at max_range {limit}, next key was {key}");
                    break;
                }
            }
            let score = match visited.score_of(current) {
                Some(s) => s,
                None => continue,
            };
            if key > score {
                log::trace!("dijkstra discarding stale heap entry for {current:?} at key {key}");
                continue; // stale entry superseded by a cheaper relaxation
            }
            for dir in grid.cell_dirs(current) {
                let Some((dest, inverse_dir, connection)) = grid.try_move(current, dir) else {
                    continue;
                };
                if !accessible(dest) {
                    continue;
                }
                let step = Step {
                    src: current,
                    dest,
                    dir,
                    inverse_dir,
                    connection,
                    length: 0.0,
                };
                let length = step_lengths(&step);
                if length < 0.0 {
                    continue;
                }
                let step = Step { length, ..step };
                let tentative = score + length;
                if let Some(limit) = max_range {
                    if tentative > limit {
                        continue;
                    }
                }
                if visited.score_of(dest).map(|s| tentative < s).unwrap_or(true) {
                    visited.relax(dest, tentative, Some(step));
                    open.push(tentative, dest);
                }
            }
        }

        Ok(DijkstraRun { source, visited })
    }

    /// The shortest path from this run's source to `target`, or
    /// `PathNotFound` if `target` was never reached.
    pub fn path_to(&self, target: Cell) -> GridResult<CellPath> {
        if !self.visited.contains(target) && target != self.source {
            return Err(GridError::PathNotFound);
        }
        reconstruct_path(&self.visited, self.source, target)
    }

    pub fn distance_to(&self, cell: Cell) -> Option<f32> {
        if cell == self.source {
            return Some(0.0);
        }
        self.visited.score_of(cell)
    }

    /// Every reachable cell and its shortest distance from the source,
    /// in unspecified order (spec §4.6, "get_distances ... in
    /// insertion-independent order").
    pub fn distances(&self) -> Vec<(Cell, f32)> {
        self.visited.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grids::square::SquareGrid;

    #[test]
    fn max_range_limits_visited_set_to_manhattan_ball() {
        let grid = SquareGrid::new(1.0);
        let run = DijkstraRun::run(&grid, Cell::new(0, 0, 0), |_step| 1.0, |_cell| true, Some(3.0)).unwrap();
        let distances = run.distances();
        // 25 cells within Manhattan distance 3 of the origin, source included.
        assert_eq!(distances.len(), 25);
        for (cell, dist) in &distances {
            let manhattan = cell.x().unsigned_abs() + cell.y().unsigned_abs();
            assert!(manhattan as f32 <= 3.0);
            assert_eq!(*dist, manhattan as f32);
        }
    }

    #[test]
    fn path_to_unreached_cell_is_path_not_found() {
        let grid = SquareGrid::new(1.0);
        let run = DijkstraRun::run(&grid, Cell::new(0, 0, 0), |_step| 1.0, |_cell| true, Some(1.0)).unwrap();
        assert!(matches!(run.path_to(Cell::new(5, 5, 0)), Err(GridError::PathNotFound)));
    }
}
