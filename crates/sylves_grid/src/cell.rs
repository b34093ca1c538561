//! `Cell`, `Step`, and `CellPath` (spec component C2 and parts of §3).

use crate::math::Vec3i;
use sylves_direction::{Connection, Direction};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::Display;

//////////////////////////////////////////////////////////////////////////////

/// An ordered triple of signed integers identifying a cell. Semantic
/// meaning depends on the grid: `(x, y, 0)` for square, `(q, r, 0)` axial
/// for hex, `(x, y, z)` with `x + y + z ∈ {1, 2}` for triangle, `(x, y, z)`
/// for cube, and base-coordinate-plus-layer for prisms (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell(pub Vec3i);

impl Cell {
    pub const ZERO: Cell = Cell(Vec3i::ZERO);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Cell(Vec3i::new(x, y, z))
    }

    pub const fn from_vec3i(v: Vec3i) -> Self {
        Cell(v)
    }

    pub const fn to_vec3i(self) -> Vec3i {
        self.0
    }

    pub const fn x(self) -> i32 {
        self.0.x
    }

    pub const fn y(self) -> i32 {
        self.0.y
    }

    pub const fn z(self) -> i32 {
        self.0.z
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}

impl std::ops::Add for Cell {
    type Output = Cell;
    fn add(self, rhs: Cell) -> Cell {
        Cell(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Cell {
    type Output = Cell;
    fn sub(self, rhs: Cell) -> Cell {
        Cell(self.0 - rhs.0)
    }
}

impl std::ops::Neg for Cell {
    type Output = Cell;
    fn neg(self) -> Cell {
        Cell(-self.0)
    }
}

impl From<Vec3i> for Cell {
    fn from(v: Vec3i) -> Self {
        Cell(v)
    }
}

//////////////////////////////////////////////////////////////////////////////

/// A single edge traversed while navigating a grid.
///
/// Invariant: following `dir` from `src` yields `dest`; following
/// `inverse_dir` from `dest` yields `src` (spec §3).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Step {
    pub src: Cell,
    pub dest: Cell,
    pub dir: Direction,
    pub inverse_dir: Direction,
    pub connection: Connection,
    pub length: f32,
}

//////////////////////////////////////////////////////////////////////////////

/// An ordered sequence of `Step`s plus their summed length.
///
/// Invariant: consecutive steps share endpoints
/// (`steps[i].dest == steps[i + 1].src`). A zero-length path (source ==
/// target) is representable as an empty step list.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellPath {
    pub steps: Vec<Step>,
    pub total_length: f32,
}

impl CellPath {
    /// An empty path at `cell` (source == target).
    pub fn zero_length() -> Self {
        CellPath {
            steps: Vec::new(),
            total_length: 0.0,
        }
    }

    /// Build a `CellPath` from a sequence of steps, checking the
    /// continuity invariant in debug builds.
    pub fn from_steps(steps: Vec<Step>) -> Self {
        debug_assert!(
            steps
                .windows(2)
                .all(|pair| pair[0].dest == pair[1].src),
            "CellPath steps must be contiguous"
        );
        let total_length = steps.iter().map(|s| s.length).sum();
        CellPath { steps, total_length }
    }

    pub fn is_zero_length(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn source(&self) -> Option<Cell> {
        self.steps.first().map(|s| s.src)
    }

    pub fn target(&self) -> Option<Cell> {
        self.steps.last().map(|s| s.dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_addition_and_negation() {
        let a = Cell::new(1, 2, 3);
        let b = Cell::new(-1, 0, 2);
        assert_eq!(a + b, Cell::new(0, 2, 5));
        assert_eq!(-a, Cell::new(-1, -2, -3));
    }

    #[test]
    fn cell_path_from_steps_sums_length() {
        let step = |src: Cell, dest: Cell| Step {
            src,
            dest,
            dir: Direction::new(0),
            inverse_dir: Direction::new(1),
            connection: Connection::IDENTITY,
            length: 1.0,
        };
        let path = CellPath::from_steps(vec![
            step(Cell::new(0, 0, 0), Cell::new(1, 0, 0)),
            step(Cell::new(1, 0, 0), Cell::new(2, 0, 0)),
        ]);
        assert_eq!(path.total_length, 2.0);
        assert_eq!(path.source(), Some(Cell::new(0, 0, 0)));
        assert_eq!(path.target(), Some(Cell::new(2, 0, 0)));
    }
}
