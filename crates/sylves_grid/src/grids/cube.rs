//! The cube grid (spec §4.4.4): a trivial translational 3D grid.

use crate::bound::Bound;
use crate::cell::Cell;
use crate::cell_type::{CellType, CubeCellType};
use crate::grid::Grid;
use crate::math::Vec3;
use sylves_direction::{Connection, Direction};

static CUBE_CELL_TYPE: CubeCellType = CubeCellType;

/// `(dx, dy, dz)` offset for each of the six cube directions, in spec
/// order `{0=+X, 1=-X, 2=+Y, 3=-Y, 4=+Z, 5=-Z}` (spec §3).
const OFFSETS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

#[derive(Debug, Clone, PartialEq)]
pub struct CubeGrid {
    pub cell_size: f32,
    pub bound: Option<Bound>,
}

impl CubeGrid {
    pub fn new(cell_size: f32) -> Self {
        CubeGrid {
            cell_size,
            bound: None,
        }
    }

    pub fn with_bound(cell_size: f32, bound: Bound) -> Self {
        CubeGrid {
            cell_size,
            bound: Some(bound),
        }
    }
}

impl Grid for CubeGrid {
    fn is_2d(&self) -> bool {
        false
    }

    fn cell_type(&self, cell: Cell) -> Option<&'static dyn CellType> {
        self.is_cell_in_grid(cell).then_some(&CUBE_CELL_TYPE as &'static dyn CellType)
    }

    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        match &self.bound {
            Some(bound) => bound.contains(cell),
            None => true,
        }
    }

    fn try_move(&self, cell: Cell, dir: Direction) -> Option<(Cell, Direction, Connection)> {
        if !self.is_cell_in_grid(cell) || dir.index() >= 6 {
            return None;
        }
        let (dx, dy, dz) = OFFSETS[dir.index() as usize];
        let dest = Cell::new(cell.x() + dx, cell.y() + dy, cell.z() + dz);
        if !self.is_cell_in_grid(dest) {
            return None;
        }
        Some((dest, Direction::new(dir.index() ^ 1), Connection::IDENTITY))
    }

    fn cell_center(&self, cell: Cell) -> Vec3 {
        (cell.to_vec3i().as_vec3() + Vec3::splat(0.5)) * self.cell_size
    }

    fn cell_corner_pos(&self, cell: Cell, corner: u8) -> Vec3 {
        self.cell_center(cell) + CUBE_CELL_TYPE.corner_position(corner) * self.cell_size
    }

    fn find_cell(&self, pos: Vec3) -> Option<Cell> {
        let cell = Cell::new(
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
            (pos.z / self.cell_size).floor() as i32,
        );
        self.is_cell_in_grid(cell).then_some(cell)
    }

    fn cells_in_aabb(&self, min: Vec3, max: Vec3) -> Vec<Cell> {
        let eps = crate::math::EPSILON;
        let min_c = (min / self.cell_size).floor();
        let max_c = ((max - Vec3::splat(eps)) / self.cell_size).floor();
        let mut out = Vec::new();
        for z in min_c.z as i32..=max_c.z as i32 {
            for y in min_c.y as i32..=max_c.y as i32 {
                for x in min_c.x as i32..=max_c.x as i32 {
                    let cell = Cell::new(x, y, z);
                    if self.is_cell_in_grid(cell) {
                        out.push(cell);
                    }
                }
            }
        }
        out
    }

    fn bound(&self) -> Option<&Bound> {
        self.bound.as_ref()
    }

    fn bound_by(&self, bound: Bound) -> Box<dyn Grid> {
        Box::new(CubeGrid::with_bound(self.cell_size, bound))
    }

    fn unbounded(&self) -> Box<dyn Grid> {
        Box::new(CubeGrid::new(self.cell_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_cell_matches_spec_scenario() {
        let grid = CubeGrid::new(2.0);
        assert_eq!(grid.find_cell(Vec3::new(3.0, 3.0, 2.0)), Some(Cell::new(1, 1, 1)));
    }

    #[test]
    fn try_move_is_reversible() {
        let grid = CubeGrid::new(1.0);
        let (dest, inv, _) = grid.try_move(Cell::new(0, 0, 0), Direction::new(4)).unwrap();
        assert_eq!(dest, Cell::new(0, 0, 1));
        let (back, _, _) = grid.try_move(dest, inv).unwrap();
        assert_eq!(back, Cell::new(0, 0, 0));
    }
}
