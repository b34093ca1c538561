//! The uniform grid contract (spec component C5).
//!
//! Spec design notes §9 sanction either a tagged enum or a trait object for
//! this polymorphism ("Prefer a tagged enum ... or a trait object, never
//! duplicate code paths"). A trait object is used here: `Grid` is
//! object-safe, every per-topology struct in `grids/` implements it, and
//! callers hold `Box<dyn Grid>`. Default methods mirror the C reference's
//! `grid_defaults.c` fallbacks (e.g. `is_planar` defaults to `is_2d`).

use crate::bound::Bound;
use crate::cell::Cell;
use crate::cell_type::CellType;
use crate::error::{GridError, GridResult};
use crate::math::{Aabb, Vec3};
use sylves_direction::{Connection, Direction};
use std::fmt::Debug;

/// A minimal triangulated surface for a single cell, returned by
/// `mesh_data` on 3D grids. Full mesh construction (Delaunay/Voronoi,
/// stitching across cells, I/O) is out of scope (spec §1 non-goals); this
/// is just the per-cell geometry a caller needs to hand to a renderer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
}

/// A single hit produced by [`Grid::raycast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub cell: Cell,
    pub distance: f32,
    pub point: Vec3,
}

/// The uniform cell-navigation contract every topology implements (spec
/// §4.4).
pub trait Grid: Debug {
    fn is_2d(&self) -> bool;

    fn is_3d(&self) -> bool {
        !self.is_2d()
    }

    fn is_planar(&self) -> bool {
        self.is_2d()
    }

    fn is_repeating(&self) -> bool {
        true
    }

    fn is_orientable(&self) -> bool {
        true
    }

    fn is_finite(&self) -> bool {
        self.bound().is_some()
    }

    fn coord_dim(&self) -> u8 {
        if self.is_2d() {
            2
        } else {
            3
        }
    }

    /// The cell type for `cell`, or `None` if `cell` is not a member of
    /// this grid.
    fn cell_type(&self, cell: Cell) -> Option<&'static dyn CellType>;

    fn is_cell_in_grid(&self, cell: Cell) -> bool;

    /// Move one step from `cell` in `dir`. Contract: if
    /// `try_move(c, d) == Some((c', d', k))` then
    /// `try_move(c', d') == Some((c, d, k^-1))` (spec §4.4).
    fn try_move(&self, cell: Cell, dir: Direction) -> Option<(Cell, Direction, Connection)>;

    /// Enumerate only the *live* directions of `cell` (spec §4.4: crucial
    /// for triangle, where parity selects 3 of 6). Default implementation
    /// filters the cell type's full direction set by `try_move` success;
    /// per-topology overrides may do this without probing every direction.
    fn cell_dirs(&self, cell: Cell) -> Vec<Direction> {
        match self.cell_type(cell) {
            None => Vec::new(),
            Some(ct) => ct
                .live_directions()
                .iter()
                .filter(|d| self.try_move(cell, *d).is_some())
                .collect(),
        }
    }

    fn cell_corners(&self, cell: Cell) -> Vec<u8> {
        match self.cell_type(cell) {
            None => Vec::new(),
            Some(ct) => (0..ct.corner_count()).collect(),
        }
    }

    fn cell_center(&self, cell: Cell) -> Vec3;

    fn cell_corner_pos(&self, cell: Cell, corner: u8) -> Vec3;

    fn cell_aabb(&self, cell: Cell) -> Aabb {
        let points: Vec<Vec3> = self
            .cell_corners(cell)
            .into_iter()
            .map(|c| self.cell_corner_pos(cell, c))
            .collect();
        Aabb::from_points(&points).unwrap_or_else(|| Aabb::from_center_half_extents(self.cell_center(cell), Vec3::ZERO))
    }

    /// 2D grids only; vertices are ordered CCW (spec §4.4). Default `None`
    /// for 3D grids.
    fn polygon(&self, cell: Cell) -> Option<Vec<Vec3>> {
        if !self.is_2d() {
            return None;
        }
        Some(
            self.cell_corners(cell)
                .into_iter()
                .map(|c| self.cell_corner_pos(cell, c))
                .collect(),
        )
    }

    /// 3D grids only. Default `None`; prism grids override this.
    fn mesh_data(&self, _cell: Cell) -> Option<Mesh> {
        None
    }

    fn find_cell(&self, pos: Vec3) -> Option<Cell>;

    /// A conservative superset: every cell whose `cell_aabb` overlaps
    /// `[min, max]` must appear, with no duplicates (spec §4.4).
    fn cells_in_aabb(&self, min: Vec3, max: Vec3) -> Vec<Cell>;

    /// Optional; grids without a native raycast return `NotImplemented`
    /// (spec §4.4).
    fn raycast(&self, _origin: Vec3, _dir: Vec3, _max_dist: f32) -> GridResult<Vec<RaycastHit>> {
        Err(GridError::NotImplemented)
    }

    fn index_count(&self) -> Option<usize> {
        self.bound().map(|b| b.count())
    }

    /// Default implementation is `O(n)` in the bound's cell count;
    /// per-topology overrides compute this with closed-form arithmetic.
    fn index(&self, cell: Cell) -> Option<usize> {
        if !self.is_cell_in_grid(cell) {
            return None;
        }
        let bound = self.bound()?;
        bound.enumerate().into_iter().position(|c| c == cell)
    }

    fn cell_by_index(&self, index: usize) -> Option<Cell> {
        let bound = self.bound()?;
        bound.enumerate().get(index).copied()
    }

    fn bound(&self) -> Option<&Bound>;

    /// Replace this grid's bound, producing a new grid (spec §3: "a grid
    /// with a bound replaced produces a new grid").
    fn bound_by(&self, bound: Bound) -> Box<dyn Grid>;

    /// An unbounded copy of this grid.
    fn unbounded(&self) -> Box<dyn Grid>;
}
