//! The square grid (spec §4.4.1).

use crate::bound::Bound;
use crate::cell::Cell;
use crate::cell_type::{CellType, SquareCellType};
use crate::error::GridResult;
use crate::grid::Grid;
use crate::math::Vec3;
use sylves_direction::{Connection, Direction};

pub(crate) static SQUARE_CELL_TYPE: SquareCellType = SquareCellType;

/// Axial offset and inverse direction for each of the four square
/// directions, in spec order `{0=Right, 1=Up, 2=Left, 3=Down}`.
const OFFSETS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

#[derive(Debug, Clone, PartialEq)]
pub struct SquareGrid {
    pub cell_size: f32,
    pub bound: Option<Bound>,
}

impl SquareGrid {
    pub fn new(cell_size: f32) -> Self {
        SquareGrid {
            cell_size,
            bound: None,
        }
    }

    pub fn with_bound(cell_size: f32, bound: Bound) -> Self {
        SquareGrid {
            cell_size,
            bound: Some(bound),
        }
    }

    /// Row-major width of the bound, if any (spec §4.4.1: "Indexing is
    /// row-major on (x, y) over the bound").
    fn bound_dims(&self) -> Option<((i32, i32), i32)> {
        match &self.bound {
            Some(Bound::Rectangle { min, max }) => Some((*min, max.0 - min.0 + 1)),
            _ => None,
        }
    }
}

impl Grid for SquareGrid {
    fn is_2d(&self) -> bool {
        true
    }

    fn cell_type(&self, cell: Cell) -> Option<&'static dyn CellType> {
        if self.is_cell_in_grid(cell) {
            Some(&SQUARE_CELL_TYPE)
        } else {
            None
        }
    }

    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        if cell.z() != 0 {
            return false;
        }
        match &self.bound {
            Some(bound) => {
                let in_bound = bound.contains(cell);
                if !in_bound {
                    log::trace!("square grid rejecting {cell:?}, outside bound");
                }
                in_bound
            }
            None => true,
        }
    }

    fn try_move(&self, cell: Cell, dir: Direction) -> Option<(Cell, Direction, Connection)> {
        if !self.is_cell_in_grid(cell) || dir.index() >= 4 {
            return None;
        }
        let (dx, dy) = OFFSETS[dir.index() as usize];
        let dest = Cell::new(cell.x() + dx, cell.y() + dy, 0);
        if !self.is_cell_in_grid(dest) {
            return None;
        }
        let inverse = Direction::new((dir.index() + 2) % 4);
        Some((dest, inverse, Connection::IDENTITY))
    }

    fn cell_center(&self, cell: Cell) -> Vec3 {
        Vec3::new(
            (cell.x() as f32 + 0.5) * self.cell_size,
            (cell.y() as f32 + 0.5) * self.cell_size,
            0.0,
        )
    }

    fn cell_corner_pos(&self, cell: Cell, corner: u8) -> Vec3 {
        self.cell_center(cell) + SQUARE_CELL_TYPE.corner_position(corner) * self.cell_size
    }

    fn find_cell(&self, pos: Vec3) -> Option<Cell> {
        let cell = Cell::new(
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
            0,
        );
        self.is_cell_in_grid(cell).then_some(cell)
    }

    fn cells_in_aabb(&self, min: Vec3, max: Vec3) -> Vec<Cell> {
        let eps = crate::math::EPSILON;
        let min_x = (min.x / self.cell_size).floor() as i32;
        let min_y = (min.y / self.cell_size).floor() as i32;
        let max_x = ((max.x - eps) / self.cell_size).floor() as i32;
        let max_y = ((max.y - eps) / self.cell_size).floor() as i32;
        let mut out = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let cell = Cell::new(x, y, 0);
                if self.is_cell_in_grid(cell) {
                    out.push(cell);
                }
            }
        }
        out
    }

    /// `None` whenever `index`/`cell_by_index` are also `None`, i.e. for
    /// every bound shape other than `Bound::Rectangle`.
    fn index_count(&self) -> Option<usize> {
        self.bound_dims()?;
        self.bound.as_ref().map(|b| b.count())
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if !self.is_cell_in_grid(cell) {
            return None;
        }
        let (min, width) = self.bound_dims()?;
        Some(((cell.y() - min.1) * width + (cell.x() - min.0)) as usize)
    }

    fn cell_by_index(&self, index: usize) -> Option<Cell> {
        let (min, width) = self.bound_dims()?;
        if width <= 0 {
            return None;
        }
        let index = index as i32;
        let cell = Cell::new(min.0 + index % width, min.1 + index / width, 0);
        self.is_cell_in_grid(cell).then_some(cell)
    }

    fn bound(&self) -> Option<&Bound> {
        self.bound.as_ref()
    }

    fn bound_by(&self, bound: Bound) -> Box<dyn Grid> {
        Box::new(SquareGrid::with_bound(self.cell_size, bound))
    }

    fn unbounded(&self) -> Box<dyn Grid> {
        Box::new(SquareGrid::new(self.cell_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_move_is_reversible() {
        let grid = SquareGrid::new(1.0);
        let (dest, inv, conn) = grid.try_move(Cell::new(0, 0, 0), Direction::new(0)).unwrap();
        assert_eq!(dest, Cell::new(1, 0, 0));
        assert_eq!(inv, Direction::new(2));
        assert_eq!(conn, Connection::IDENTITY);
        let (back, _, _) = grid.try_move(dest, inv).unwrap();
        assert_eq!(back, Cell::new(0, 0, 0));
    }

    #[test]
    fn find_cell_round_trips_with_cell_center() {
        let grid = SquareGrid::new(1.0);
        for cell in [Cell::new(0, 0, 0), Cell::new(3, -2, 0), Cell::new(-5, 7, 0)] {
            let center = grid.cell_center(cell);
            assert_eq!(grid.find_cell(center), Some(cell));
        }
    }

    #[test]
    fn bounded_grid_move_fails_at_edge() {
        let grid = SquareGrid::with_bound(1.0, Bound::rectangle((0, 0), (2, 2)));
        assert!(grid.try_move(Cell::new(2, 2, 0), Direction::new(0)).is_none());
        assert!(grid.try_move(Cell::new(2, 2, 0), Direction::new(2)).is_some());
    }

    #[test]
    fn indexing_is_row_major_and_bijective() {
        let grid = SquareGrid::with_bound(1.0, Bound::rectangle((0, 0), (2, 2)));
        for i in 0..grid.index_count().unwrap() {
            let cell = grid.cell_by_index(i).unwrap();
            assert_eq!(grid.index(cell), Some(i));
        }
    }

    #[test]
    fn mask_bound_has_no_closed_form_indexing() {
        let mask = crate::bound::Mask::new([Cell::new(0, 0, 0), Cell::new(1, 1, 0)]);
        let grid = SquareGrid::with_bound(1.0, Bound::Mask(mask));
        assert_eq!(grid.index_count(), None);
        assert_eq!(grid.index(Cell::new(0, 0, 0)), None);
        assert_eq!(grid.cell_by_index(0), None);
    }

    #[test]
    fn cells_in_aabb_is_a_superset() {
        let grid = SquareGrid::new(1.0);
        let cells = grid.cells_in_aabb(Vec3::new(0.5, 0.5, 0.0), Vec3::new(2.5, 1.5, 0.0));
        assert!(cells.contains(&Cell::new(0, 0, 0)));
        assert!(cells.contains(&Cell::new(2, 1, 0)));
        for cell in &cells {
            assert!(grid.cell_aabb(*cell).intersects(&crate::math::Aabb::from_corners(
                Vec3::new(0.5, 0.5, 0.0),
                Vec3::new(2.5, 1.5, 0.0)
            )));
        }
    }
}
