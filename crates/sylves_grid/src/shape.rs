//! Ring/range shape queries over any [`Grid`]: every cell within (or
//! exactly at) some number of steps from a center cell. Implemented as a
//! single breadth-first search over the uniform `Grid` contract
//! (`cell_dirs`/`try_move`) rather than per-topology coordinate
//! arithmetic, since every topology already exposes the traversal
//! primitives this needs.

use crate::bound::Mask;
use crate::cell::Cell;
use crate::grid::Grid;
use std::collections::{HashMap, VecDeque};

fn distances(grid: &dyn Grid, center: Cell, radius: u32) -> HashMap<Cell, u32> {
    let mut dist = HashMap::new();
    dist.insert(center, 0);
    let mut queue = VecDeque::new();
    queue.push_back(center);
    while let Some(cell) = queue.pop_front() {
        let d = dist[&cell];
        if d >= radius {
            continue;
        }
        for dir in grid.cell_dirs(cell) {
            let Some((dest, _, _)) = grid.try_move(cell, dir) else {
                continue;
            };
            if dist.contains_key(&dest) {
                continue;
            }
            dist.insert(dest, d + 1);
            queue.push_back(dest);
        }
    }
    dist
}

/// Every cell within `radius` steps of `center` (inclusive), as a [`Mask`].
pub fn range(grid: &dyn Grid, center: Cell, radius: u32) -> Mask {
    distances(grid, center, radius).into_keys().collect()
}

/// Every cell exactly `radius` steps from `center`, as a [`Mask`].
/// `ring(.., 0)` is just `{center}`.
pub fn ring(grid: &dyn Grid, center: Cell, radius: u32) -> Mask {
    if radius == 0 {
        return Mask::new([center]);
    }
    distances(grid, center, radius)
        .into_iter()
        .filter(|&(_, d)| d == radius)
        .map(|(c, _)| c)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grids::square::SquareGrid;

    #[test]
    fn square_range_zero_is_just_center() {
        let grid = SquareGrid::new(1.0);
        let center = Cell::new(0, 0, 0);
        let m = range(&grid, center, 0);
        assert_eq!(m.len(), 1);
        assert!(m.contains(center));
    }

    #[test]
    fn square_ring_one_is_four_neighbors() {
        let grid = SquareGrid::new(1.0);
        let center = Cell::new(2, 2, 0);
        let m = ring(&grid, center, 1);
        assert_eq!(m.len(), 4);
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            assert!(m.contains(Cell::new(2 + dx, 2 + dy, 0)));
        }
    }

    #[test]
    fn square_range_two_contains_ring_one_and_ring_two() {
        let grid = SquareGrid::new(1.0);
        let center = Cell::new(0, 0, 0);
        let r2 = range(&grid, center, 2);
        let ring1 = ring(&grid, center, 1);
        let ring2 = ring(&grid, center, 2);
        assert_eq!(r2.len(), 1 + ring1.len() + ring2.len());
    }
}
