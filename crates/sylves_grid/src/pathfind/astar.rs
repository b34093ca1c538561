//! A* search (spec §4.6).

use super::{reconstruct_path, Visited};
use crate::cell::{Cell, CellPath, Step};
use crate::error::{GridError, GridResult};
use crate::grid::Grid;
use crate::pqueue::PriorityQueue;

/// Find a shortest path from `source` to `target` on `grid`.
///
/// - `step_lengths(step)` returns the traversal cost of `step`; a negative
///   result rejects the edge.
/// - `accessible(cell)` gates whether `cell` may be entered at all.
/// - `heuristic(cell)` must be admissible (never overestimate the true
///   remaining distance to `target`) for the returned path to be optimal
///   (spec §4.6, "Heuristic contract").
///
/// Returns `PathNotFound` if `target` is unreachable.
pub fn find_path(
    grid: &dyn Grid,
    source: Cell,
    target: Cell,
    mut heuristic: impl FnMut(Cell) -> f32,
    mut step_lengths: impl FnMut(&Step) -> f32,
    mut accessible: impl FnMut(Cell) -> bool,
) -> GridResult<CellPath> {
    log::debug!("a* searching from {source:?} to {target:?}");
    if source == target {
        return Ok(CellPath::zero_length());
    }
    if !grid.is_cell_in_grid(target) {
        return Err(GridError::CellNotInGrid);
    }

    let mut visited = Visited::new();
    visited.relax(source, 0.0, None);

    // Heap payload carries the cell and the g-score it was pushed with, so
    // a pop can detect staleness even though the heap's sort key is the
    // f-score (`g + heuristic`), not `g` itself.
    let mut open: PriorityQueue<(Cell, f32)> = PriorityQueue::new();
    open.push(heuristic(source), (source, 0.0));

    while let Some((_f_key, (current, pushed_score))) = open.pop() {
        if visited.score_of(current).map(|s| pushed_score > s).unwrap_or(true) {
            log::trace!("a* discarding stale heap entry for {current:?} at score {pushed_score}");
            continue;
        }
        if current == target {
            return reconstruct_path(&visited, source, target);
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
            let tentative = pushed_score + length;
            if visited.score_of(dest).map(|s| tentative < s).unwrap_or(true) {
                visited.relax(dest, tentative, Some(step));
                open.push(tentative + heuristic(dest), (dest, tentative));
            }
        }
    }

    log::debug!("a* exhausted open set without reaching {target:?}");
    Err(GridError::PathNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::Bound;
    use crate::grids::square::SquareGrid;
    use crate::pathfind::heuristic::sylves_heuristic_manhattan;

    #[test]
    fn square_a_star_matches_spec_scenario() {
        let grid = SquareGrid::with_bound(1.0, Bound::rectangle((0, 0), (10, 10)));
        let source = Cell::new(0, 0, 0);
        let target = Cell::new(10, 10, 0);
        let path = find_path(
            &grid,
            source,
            target,
            |c| sylves_heuristic_manhattan(c, target, 1.0),
            |_step| 1.0,
            |_cell| true,
        )
        .unwrap();
        assert_eq!(path.steps.len(), 20);
        assert!((path.total_length - 20.0).abs() < 1e-5);
        assert_eq!(path.source(), Some(source));
        assert_eq!(path.target(), Some(target));
    }

    #[test]
    fn unreachable_target_returns_path_not_found() {
        let grid = SquareGrid::with_bound(1.0, Bound::rectangle((0, 0), (2, 2)));
        let source = Cell::new(0, 0, 0);
        let target = Cell::new(2, 2, 0);
        let result = find_path(
            &grid,
            source,
            target,
            |c| sylves_heuristic_manhattan(c, target, 1.0),
            |_step| 1.0,
            |cell| cell != Cell::new(1, 1, 0) && cell != Cell::new(1, 0, 0) && cell != Cell::new(0, 1, 0),
        );
        assert!(matches!(result, Err(GridError::PathNotFound)));
    }
}
