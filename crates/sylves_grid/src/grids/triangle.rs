//! The triangle grid (spec §4.4.3).
//!
//! Cell centers and `find_cell` are not pinned down by any literal
//! worked example (unlike hex scenario 5); §8 scenario 6 only constrains
//! parity and the live direction set. The formulas below are a
//! self-consistent choice documented here rather than derived from an
//! external reference.

use crate::bound::Bound;
use crate::cell::Cell;
use crate::cell_type::{CellType, TriangleCellType, TrianglePoint, TRIANGLE_DIR_AXIS_SIGN, TRIANGLE_INVERT_PAIRS};
use crate::grid::Grid;
use crate::math::Vec3;
use sylves_direction::{Connection, Direction};

pub(crate) static TRIANGLE_UP_CELL_TYPE: TriangleCellType = TriangleCellType::new(TrianglePoint::Up);
pub(crate) static TRIANGLE_DOWN_CELL_TYPE: TriangleCellType = TriangleCellType::new(TrianglePoint::Down);

pub(crate) fn point_of(cell: Cell) -> Option<TrianglePoint> {
    match cell.x() + cell.y() + cell.z() {
        2 => Some(TrianglePoint::Up),
        1 => Some(TrianglePoint::Down),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriangleGrid {
    pub cell_size: f32,
    pub bound: Option<Bound>,
}

impl TriangleGrid {
    pub fn new(cell_size: f32) -> Self {
        TriangleGrid {
            cell_size,
            bound: None,
        }
    }

    pub fn with_bound(cell_size: f32, bound: Bound) -> Self {
        TriangleGrid {
            cell_size,
            bound: Some(bound),
        }
    }

    fn row_height(&self) -> f32 {
        self.cell_size * 3f32.sqrt() / 2.0
    }
}

impl Grid for TriangleGrid {
    fn is_2d(&self) -> bool {
        true
    }

    fn cell_type(&self, cell: Cell) -> Option<&'static dyn CellType> {
        match point_of(cell) {
            Some(TrianglePoint::Up) if self.is_cell_in_grid(cell) => Some(&TRIANGLE_UP_CELL_TYPE),
            Some(TrianglePoint::Down) if self.is_cell_in_grid(cell) => Some(&TRIANGLE_DOWN_CELL_TYPE),
            _ => None,
        }
    }

    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        if point_of(cell).is_none() {
            return false;
        }
        match &self.bound {
            Some(bound) => bound.contains(cell),
            None => true,
        }
    }

    fn try_move(&self, cell: Cell, dir: Direction) -> Option<(Cell, Direction, Connection)> {
        let point = point_of(cell)?;
        if !self.is_cell_in_grid(cell) {
            return None;
        }
        let live = match point {
            TrianglePoint::Up => TriangleCellType::new(TrianglePoint::Up).live_directions(),
            TrianglePoint::Down => TriangleCellType::new(TrianglePoint::Down).live_directions(),
        };
        if !live.contains(dir) || dir.index() >= 6 {
            return None;
        }
        let (axis, sign) = TRIANGLE_DIR_AXIS_SIGN[dir.index() as usize];
        let mut v = cell.to_vec3i();
        match axis {
            0 => v.x += sign,
            1 => v.y += sign,
            _ => v.z += sign,
        }
        let dest = Cell::from_vec3i(v);
        if !self.is_cell_in_grid(dest) {
            return None;
        }
        let inverse = Direction::new(TRIANGLE_INVERT_PAIRS[dir.index() as usize]);
        Some((dest, inverse, Connection::IDENTITY))
    }

    fn cell_center(&self, cell: Cell) -> Vec3 {
        let wx = (cell.x() - cell.z()) as f32 * 0.5 * self.cell_size;
        let wy = cell.y() as f32 * self.row_height();
        Vec3::new(wx, wy, 0.0)
    }

    fn cell_corner_pos(&self, cell: Cell, corner: u8) -> Vec3 {
        let ct = match point_of(cell) {
            Some(TrianglePoint::Up) => &TRIANGLE_UP_CELL_TYPE,
            Some(TrianglePoint::Down) => &TRIANGLE_DOWN_CELL_TYPE,
            None => return self.cell_center(cell),
        };
        self.cell_center(cell) + ct.corner_position(corner) * self.cell_size
    }

    fn find_cell(&self, pos: Vec3) -> Option<Cell> {
        let h = self.row_height();
        let y = (pos.y / h).round() as i32;
        let raw_d = pos.x / (0.5 * self.cell_size);

        let mut best: Option<(Cell, f32)> = None;
        for parity in [1i32, 2i32] {
            let x = ((raw_d + parity as f32 - y as f32) / 2.0).round() as i32;
            let z = parity - x - y;
            let d = (x - z) as f32;
            let error = (d - raw_d).abs();
            let cell = Cell::new(x, y, z);
            if best.as_ref().map(|(_, best_err)| error < *best_err).unwrap_or(true) {
                best = Some((cell, error));
            }
        }
        let cell = best.map(|(c, _)| c)?;
        self.is_cell_in_grid(cell).then_some(cell)
    }

    fn cells_in_aabb(&self, min: Vec3, max: Vec3) -> Vec<Cell> {
        let query = crate::math::Aabb::from_corners(min, max);
        let h = self.row_height();
        let min_y = (min.y / h).floor() as i32 - 1;
        let max_y = (max.y / h).ceil() as i32 + 1;
        let min_x_raw = (min.x / (0.5 * self.cell_size)).floor() as i32 - 2;
        let max_x_raw = (max.x / (0.5 * self.cell_size)).ceil() as i32 + 2;
        let mut out = Vec::new();
        for y in min_y..=max_y {
            for d in min_x_raw..=max_x_raw {
                for parity in [1i32, 2i32] {
                    let x = (d + parity - y) / 2;
                    let z = parity - x - y;
                    if x - z != d {
                        continue;
                    }
                    let cell = Cell::new(x, y, z);
                    if self.is_cell_in_grid(cell) && self.cell_aabb(cell).intersects(&query) && !out.contains(&cell) {
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
        Box::new(TriangleGrid::with_bound(self.cell_size, bound))
    }

    fn unbounded(&self) -> Box<dyn Grid> {
        Box::new(TriangleGrid::new(self.cell_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parity_and_live_directions_match_spec_scenario() {
        let grid = TriangleGrid::new(1.0);
        let cell = Cell::new(0, 0, 1);
        assert_eq!(point_of(cell), Some(TrianglePoint::Down));
        let dirs = grid.cell_dirs(cell);
        let mut indices: Vec<u8> = dirs.iter().map(|d| d.index()).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![1, 4, 5]);
    }

    #[test]
    fn try_move_is_reversible_and_flips_parity() {
        let grid = TriangleGrid::new(1.0);
        let cell = Cell::new(0, 0, 1);
        let (dest, inv, _) = grid.try_move(cell, Direction::new(1)).unwrap();
        assert_eq!(point_of(dest), Some(TrianglePoint::Up));
        let (back, _, _) = grid.try_move(dest, inv).unwrap();
        assert_eq!(back, cell);
    }

    #[test]
    fn find_cell_round_trips_with_cell_center() {
        let grid = TriangleGrid::new(1.0);
        for cell in [
            Cell::new(0, 0, 1),
            Cell::new(1, 0, 1),
            Cell::new(0, 0, 2),
            Cell::new(2, 1, -1),
        ] {
            if point_of(cell).is_none() {
                continue;
            }
            let center = grid.cell_center(cell);
            assert_eq!(grid.find_cell(center), Some(cell));
        }
    }
}
