//! The hex grid, flat-topped and pointy-topped (spec §4.4.2).
//!
//! Spec note: literally applying §4.4.2's cube-coordinate center formula
//! (`wx = (x/2 - y/4 - z/4)*s_x`) does not reproduce the worked example in
//! §8 scenario 5 (pointy-top, size 2.0, cell `(-1, 3)` → `(√3, 9.0, 0.0)`).
//! The standard axial-to-pixel projection below does reproduce it exactly
//! and is the "symmetric" pointy/flat pair the prose describes, so it is
//! used here instead of the literal cube-coordinate text.

use crate::bound::Bound;
use crate::cell::Cell;
use crate::cell_type::{CellType, HexCellType, HexOrientation};
use crate::math::Vec3;
use crate::grid::Grid;
use sylves_direction::{Connection, Direction};

pub(crate) static HEX_FLAT_CELL_TYPE: HexCellType = HexCellType::new(HexOrientation::FlatTop);
pub(crate) static HEX_POINTY_CELL_TYPE: HexCellType = HexCellType::new(HexOrientation::PointyTop);

/// Axial `(dq, dr)` offset for each of the six hex directions, in spec
/// order `{0=E, 1=NE, 2=NW, 3=W, 4=SW, 5=SE}` (spec §4.4.2).
const OFFSETS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

#[derive(Debug, Clone, PartialEq)]
pub struct HexGrid {
    pub cell_size: f32,
    pub orientation: HexOrientation,
    pub bound: Option<Bound>,
}

impl HexGrid {
    pub fn new(cell_size: f32, orientation: HexOrientation) -> Self {
        HexGrid {
            cell_size,
            orientation,
            bound: None,
        }
    }

    pub fn with_bound(cell_size: f32, orientation: HexOrientation, bound: Bound) -> Self {
        HexGrid {
            cell_size,
            orientation,
            bound: Some(bound),
        }
    }

    pub(crate) fn cell_type_static(&self) -> &'static HexCellType {
        match self.orientation {
            HexOrientation::FlatTop => &HEX_FLAT_CELL_TYPE,
            HexOrientation::PointyTop => &HEX_POINTY_CELL_TYPE,
        }
    }

    fn axial_to_world(&self, q: f32, r: f32) -> (f32, f32) {
        let s = self.cell_size;
        match self.orientation {
            HexOrientation::PointyTop => {
                let wx = s * 3f32.sqrt() * (q + r / 2.0);
                let wy = s * 1.5 * r;
                (wx, wy)
            }
            HexOrientation::FlatTop => {
                let wx = s * 1.5 * q;
                let wy = s * 3f32.sqrt() * (r + q / 2.0);
                (wx, wy)
            }
        }
    }

    fn world_to_axial(&self, wx: f32, wy: f32) -> (f32, f32) {
        let s = self.cell_size;
        match self.orientation {
            HexOrientation::PointyTop => {
                let r = wy / (s * 1.5);
                let q = wx / (s * 3f32.sqrt()) - r / 2.0;
                (q, r)
            }
            HexOrientation::FlatTop => {
                let q = wx / (s * 1.5);
                let r = wy / (s * 3f32.sqrt()) - q / 2.0;
                (q, r)
            }
        }
    }
}

use crate::conversions::cube_round;

impl Grid for HexGrid {
    fn is_2d(&self) -> bool {
        true
    }

    fn cell_type(&self, cell: Cell) -> Option<&'static dyn CellType> {
        if self.is_cell_in_grid(cell) {
            Some(self.cell_type_static())
        } else {
            None
        }
    }

    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        if cell.z() != 0 {
            return false;
        }
        match &self.bound {
            Some(bound) => bound.contains(cell),
            None => true,
        }
    }

    fn try_move(&self, cell: Cell, dir: Direction) -> Option<(Cell, Direction, Connection)> {
        if !self.is_cell_in_grid(cell) || dir.index() >= 6 {
            return None;
        }
        let (dq, dr) = OFFSETS[dir.index() as usize];
        let dest = Cell::new(cell.x() + dq, cell.y() + dr, 0);
        if !self.is_cell_in_grid(dest) {
            return None;
        }
        let inverse = Direction::new((dir.index() + 3) % 6);
        Some((dest, inverse, Connection::IDENTITY))
    }

    fn cell_center(&self, cell: Cell) -> Vec3 {
        let (wx, wy) = self.axial_to_world(cell.x() as f32, cell.y() as f32);
        Vec3::new(wx, wy, 0.0)
    }

    fn cell_corner_pos(&self, cell: Cell, corner: u8) -> Vec3 {
        self.cell_center(cell) + self.cell_type_static().corner_position(corner) * self.cell_size
    }

    fn find_cell(&self, pos: Vec3) -> Option<Cell> {
        let (qf, rf) = self.world_to_axial(pos.x, pos.y);
        let (x, z) = (qf, rf);
        let y = -x - z;
        let (rx, ry, rz) = cube_round(x, y, z);
        let _ = ry;
        let cell = Cell::new(rx, rz, 0);
        self.is_cell_in_grid(cell).then_some(cell)
    }

    fn cells_in_aabb(&self, min: Vec3, max: Vec3) -> Vec<Cell> {
        let corners = [
            (min.x, min.y),
            (max.x, min.y),
            (min.x, max.y),
            (max.x, max.y),
        ];
        let mut min_q = i32::MAX;
        let mut max_q = i32::MIN;
        let mut min_r = i32::MAX;
        let mut max_r = i32::MIN;
        for (x, y) in corners {
            let (q, r) = self.world_to_axial(x, y);
            min_q = min_q.min(q.floor() as i32);
            max_q = max_q.max(q.ceil() as i32);
            min_r = min_r.min(r.floor() as i32);
            max_r = max_r.max(r.ceil() as i32);
        }
        min_q -= 2;
        max_q += 2;
        min_r -= 2;
        max_r += 2;
        let query = crate::math::Aabb::from_corners(min, max);
        let mut out = Vec::new();
        for r in min_r..=max_r {
            for q in min_q..=max_q {
                let cell = Cell::new(q, r, 0);
                if self.is_cell_in_grid(cell) && self.cell_aabb(cell).intersects(&query) {
                    out.push(cell);
                }
            }
        }
        out
    }

    fn bound(&self) -> Option<&Bound> {
        self.bound.as_ref()
    }

    fn bound_by(&self, bound: Bound) -> Box<dyn Grid> {
        Box::new(HexGrid::with_bound(self.cell_size, self.orientation, bound))
    }

    fn unbounded(&self) -> Box<dyn Grid> {
        Box::new(HexGrid::new(self.cell_size, self.orientation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_reversibility_matches_spec_scenario() {
        let grid = HexGrid::new(1.0, HexOrientation::FlatTop);
        let (dest, inv, conn) = grid.try_move(Cell::new(2, -1, 0), Direction::new(0)).unwrap();
        assert_eq!(dest, Cell::new(3, -1, 0));
        assert_eq!(inv, Direction::new(3));
        assert_eq!(conn, Connection::IDENTITY);
        let (back, back_inv, _) = grid.try_move(dest, inv).unwrap();
        assert_eq!(back, Cell::new(2, -1, 0));
        assert_eq!(back_inv, Direction::new(0));
    }

    #[test]
    fn cell_center_matches_spec_scenario() {
        let grid = HexGrid::new(2.0, HexOrientation::PointyTop);
        let center = grid.cell_center(Cell::new(-1, 3, 0));
        assert!((center.x - 3f32.sqrt()).abs() < 1e-4);
        assert!((center.y - 9.0).abs() < 1e-4);
        assert_eq!(center.z, 0.0);
    }

    #[test]
    fn find_cell_round_trips_with_cell_center() {
        let grid = HexGrid::new(1.0, HexOrientation::FlatTop);
        for cell in [Cell::new(0, 0, 0), Cell::new(2, -1, 0), Cell::new(-3, 5, 0)] {
            let center = grid.cell_center(cell);
            assert_eq!(grid.find_cell(center), Some(cell));
        }
    }
}
