//! Built-in A* heuristics (spec §4.6).
//!
//! Both are admissible only for the grids their geometry actually matches
//! (Manhattan for square grids moving axis-aligned, Euclidean for any grid
//! whose `cell_center` is a faithful embedding); callers are responsible for
//! pairing a heuristic with a grid it is actually admissible for.

use crate::cell::Cell;
use crate::grid::Grid;

/// `scale * (|dx| + |dy| + |dz|)` between `current` and `target`.
pub fn sylves_heuristic_manhattan(current: Cell, target: Cell, scale: f32) -> f32 {
    let d = current - target;
    scale * (d.x().unsigned_abs() + d.y().unsigned_abs() + d.z().unsigned_abs()) as f32
}

/// Euclidean distance between `cell_center(current)` and
/// `cell_center(target)`, as guaranteed by spec §4.6.
pub fn sylves_heuristic_euclidean(grid: &dyn Grid, current: Cell, target: Cell) -> f32 {
    (grid.cell_center(current) - grid.cell_center(target)).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_is_zero_at_target() {
        let target = Cell::new(3, -2, 0);
        assert_eq!(sylves_heuristic_manhattan(target, target, 1.0), 0.0);
    }

    #[test]
    fn manhattan_scales_linearly() {
        let a = Cell::new(0, 0, 0);
        let b = Cell::new(3, 4, 0);
        assert_eq!(sylves_heuristic_manhattan(a, b, 1.0), 7.0);
        assert_eq!(sylves_heuristic_manhattan(a, b, 2.0), 14.0);
    }

    #[test]
    fn euclidean_matches_grid_geometry() {
        use crate::grids::square::SquareGrid;
        let grid = SquareGrid::new(1.0);
        let a = Cell::new(0, 0, 0);
        let b = Cell::new(3, 4, 0);
        assert!((sylves_heuristic_euclidean(&grid, a, b) - 5.0).abs() < 1e-5);
    }
}
