//! Modifier wrappers that implement [`Grid`] over another `Grid`. A
//! modifier takes ownership of its underlying grid; dropping the wrapper
//! drops the whole chain.
//!
//! Three wrappers are implemented here, covering `cell_type`,
//! `is_cell_in_grid`, `try_move`, `cell_dirs`, `cell_center`, `find_cell`,
//! and `bound` plus whatever else the `Grid` trait requires. A `wrap`
//! combinator, a `nested`-grid wrapper, and a planar-prism modifier are
//! left out (see `DESIGN.md`).

use crate::bound::{Bound, Mask};
use crate::cell::Cell;
use crate::cell_type::CellType;
use crate::error::{GridError, GridResult};
use crate::grid::{Grid, Mesh};
use crate::math::{Trs, Vec3};
use sylves_direction::{Connection, Direction};
use std::rc::Rc;

//////////////////////////////////////////////////////////////////////////////

/// Applies a translation/rotation/scale to every world-space coordinate an
/// inner grid produces or consumes, without touching cell topology: `Cell`
/// values, `try_move`, and `bound` all pass through to `inner` untouched.
#[derive(Debug)]
pub struct TransformGrid {
    inner: Box<dyn Grid>,
    trs: Trs,
    inverse: Trs,
}

impl TransformGrid {
    /// Fails if `trs` is non-invertible (a zero scale component), matching
    /// `Trs::inverse`'s own failure mode (spec §4.1).
    pub fn new(inner: Box<dyn Grid>, trs: Trs) -> GridResult<Self> {
        let inverse = trs.inverse().map_err(|_| GridError::InvalidArgument)?;
        Ok(TransformGrid { inner, trs, inverse })
    }
}

impl Grid for TransformGrid {
    fn is_2d(&self) -> bool {
        self.inner.is_2d()
    }

    fn cell_type(&self, cell: Cell) -> Option<&'static dyn CellType> {
        self.inner.cell_type(cell)
    }

    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        self.inner.is_cell_in_grid(cell)
    }

    fn try_move(&self, cell: Cell, dir: Direction) -> Option<(Cell, Direction, Connection)> {
        self.inner.try_move(cell, dir)
    }

    fn cell_dirs(&self, cell: Cell) -> Vec<Direction> {
        self.inner.cell_dirs(cell)
    }

    fn cell_center(&self, cell: Cell) -> Vec3 {
        self.trs.transform_point(self.inner.cell_center(cell))
    }

    fn cell_corner_pos(&self, cell: Cell, corner: u8) -> Vec3 {
        self.trs.transform_point(self.inner.cell_corner_pos(cell, corner))
    }

    fn mesh_data(&self, cell: Cell) -> Option<Mesh> {
        let mesh = self.inner.mesh_data(cell)?;
        Some(Mesh {
            vertices: mesh.vertices.into_iter().map(|v| self.trs.transform_point(v)).collect(),
            indices: mesh.indices,
        })
    }

    fn find_cell(&self, pos: Vec3) -> Option<Cell> {
        self.inner.find_cell(self.inverse.transform_point(pos))
    }

    fn cells_in_aabb(&self, min: Vec3, max: Vec3) -> Vec<Cell> {
        // Transform the query box's corners back into the inner grid's
        // frame, query a conservative axis-aligned superset there, then
        // filter by true intersection in world space (the inverse of an
        // axis-aligned box under rotation is no longer axis-aligned, so
        // the inner query must over-fetch).
        let query = crate::math::Aabb::from_corners(min, max);
        let corners = [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ];
        let local = corners.map(|c| self.inverse.transform_point(c));
        let local_aabb = crate::math::Aabb::from_points(&local).unwrap_or(crate::math::Aabb::ZERO);
        self.inner
            .cells_in_aabb(local_aabb.min, local_aabb.max)
            .into_iter()
            .filter(|c| self.cell_aabb(*c).intersects(&query))
            .collect()
    }

    fn bound(&self) -> Option<&Bound> {
        self.inner.bound()
    }

    fn bound_by(&self, bound: Bound) -> Box<dyn Grid> {
        Box::new(TransformGrid {
            inner: self.inner.bound_by(bound),
            trs: self.trs,
            inverse: self.inverse,
        })
    }

    fn unbounded(&self) -> Box<dyn Grid> {
        Box::new(TransformGrid {
            inner: self.inner.unbounded(),
            trs: self.trs,
            inverse: self.inverse,
        })
    }
}

//////////////////////////////////////////////////////////////////////////////

/// Restricts an inner grid to the cells a [`Mask`] admits, degrading
/// gracefully to the inner grid's own bound/membership rules otherwise
/// (spec §9, "Bound composition": masks are the universal fallback shape).
#[derive(Debug)]
pub struct MaskGrid {
    inner: Box<dyn Grid>,
    mask: Mask,
}

impl MaskGrid {
    pub fn new(inner: Box<dyn Grid>, mask: Mask) -> Self {
        MaskGrid { inner, mask }
    }
}

impl Grid for MaskGrid {
    fn is_2d(&self) -> bool {
        self.inner.is_2d()
    }

    fn cell_type(&self, cell: Cell) -> Option<&'static dyn CellType> {
        self.is_cell_in_grid(cell).then(|| self.inner.cell_type(cell)).flatten()
    }

    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        self.mask.contains(cell) && self.inner.is_cell_in_grid(cell)
    }

    fn try_move(&self, cell: Cell, dir: Direction) -> Option<(Cell, Direction, Connection)> {
        if !self.is_cell_in_grid(cell) {
            return None;
        }
        let (dest, inverse_dir, connection) = self.inner.try_move(cell, dir)?;
        self.is_cell_in_grid(dest).then_some((dest, inverse_dir, connection))
    }

    fn cell_center(&self, cell: Cell) -> Vec3 {
        self.inner.cell_center(cell)
    }

    fn cell_corner_pos(&self, cell: Cell, corner: u8) -> Vec3 {
        self.inner.cell_corner_pos(cell, corner)
    }

    fn find_cell(&self, pos: Vec3) -> Option<Cell> {
        let cell = self.inner.find_cell(pos)?;
        self.is_cell_in_grid(cell).then_some(cell)
    }

    fn cells_in_aabb(&self, min: Vec3, max: Vec3) -> Vec<Cell> {
        self.inner
            .cells_in_aabb(min, max)
            .into_iter()
            .filter(|c| self.mask.contains(*c))
            .collect()
    }

    fn bound(&self) -> Option<&Bound> {
        self.inner.bound()
    }

    fn bound_by(&self, bound: Bound) -> Box<dyn Grid> {
        Box::new(MaskGrid {
            inner: self.inner.bound_by(bound),
            mask: self.mask.clone(),
        })
    }

    fn unbounded(&self) -> Box<dyn Grid> {
        Box::new(MaskGrid {
            inner: self.inner.unbounded(),
            mask: self.mask.clone(),
        })
    }
}

//////////////////////////////////////////////////////////////////////////////

/// Remaps cell identities through a user-supplied bijection (spec §6,
/// `CellMap(in) -> out`; "must be a true bijection, unverified by the
/// core"). `to_inner`/`from_inner` are `Rc`-shared rather than owned
/// closures so `bound_by`/`unbounded` can cheaply rebuild the wrapper
/// around a fresh inner grid without re-threading closures through every
/// call site — consistent with this crate's single-threaded ownership
/// model (spec §5).
pub struct BijectionGrid {
    inner: Box<dyn Grid>,
    to_inner: Rc<dyn Fn(Cell) -> Cell>,
    from_inner: Rc<dyn Fn(Cell) -> Cell>,
}

impl std::fmt::Debug for BijectionGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BijectionGrid").field("inner", &self.inner).finish_non_exhaustive()
    }
}

impl BijectionGrid {
    pub fn new(
        inner: Box<dyn Grid>,
        to_inner: impl Fn(Cell) -> Cell + 'static,
        from_inner: impl Fn(Cell) -> Cell + 'static,
    ) -> Self {
        BijectionGrid {
            inner,
            to_inner: Rc::new(to_inner),
            from_inner: Rc::new(from_inner),
        }
    }
}

impl Grid for BijectionGrid {
    fn is_2d(&self) -> bool {
        self.inner.is_2d()
    }

    fn cell_type(&self, cell: Cell) -> Option<&'static dyn CellType> {
        self.inner.cell_type((self.to_inner)(cell))
    }

    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        self.inner.is_cell_in_grid((self.to_inner)(cell))
    }

    fn try_move(&self, cell: Cell, dir: Direction) -> Option<(Cell, Direction, Connection)> {
        let (dest, inverse_dir, connection) = self.inner.try_move((self.to_inner)(cell), dir)?;
        Some(((self.from_inner)(dest), inverse_dir, connection))
    }

    fn cell_dirs(&self, cell: Cell) -> Vec<Direction> {
        self.inner.cell_dirs((self.to_inner)(cell))
    }

    fn cell_center(&self, cell: Cell) -> Vec3 {
        self.inner.cell_center((self.to_inner)(cell))
    }

    fn cell_corner_pos(&self, cell: Cell, corner: u8) -> Vec3 {
        self.inner.cell_corner_pos((self.to_inner)(cell), corner)
    }

    fn find_cell(&self, pos: Vec3) -> Option<Cell> {
        self.inner.find_cell(pos).map(|c| (self.from_inner)(c))
    }

    fn cells_in_aabb(&self, min: Vec3, max: Vec3) -> Vec<Cell> {
        self.inner.cells_in_aabb(min, max).into_iter().map(|c| (self.from_inner)(c)).collect()
    }

    fn bound(&self) -> Option<&Bound> {
        self.inner.bound()
    }

    fn bound_by(&self, bound: Bound) -> Box<dyn Grid> {
        Box::new(BijectionGrid {
            inner: self.inner.bound_by(bound),
            to_inner: Rc::clone(&self.to_inner),
            from_inner: Rc::clone(&self.from_inner),
        })
    }

    fn unbounded(&self) -> Box<dyn Grid> {
        Box::new(BijectionGrid {
            inner: self.inner.unbounded(),
            to_inner: Rc::clone(&self.to_inner),
            from_inner: Rc::clone(&self.from_inner),
        })
    }

    // `index`/`cell_by_index` are left at the trait default rather than
    // remapped: the inner grid's indexing enumerates *inner* coordinates.
    // Callers that need bijected indices should compose
    // `from_inner`/`to_inner` themselves.
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grids::square::SquareGrid;
    use crate::math::{Quat, Vec3};

    #[test]
    fn transform_grid_translates_cell_center() {
        let inner = Box::new(SquareGrid::new(1.0));
        let trs = Trs::new(Vec3::new(10.0, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE);
        let grid = TransformGrid::new(inner, trs).unwrap();
        let untransformed = SquareGrid::new(1.0).cell_center(Cell::new(2, 3, 0));
        let transformed = grid.cell_center(Cell::new(2, 3, 0));
        assert!((transformed - (untransformed + Vec3::new(10.0, 0.0, 0.0))).length() < 1e-5);
    }

    #[test]
    fn transform_grid_find_cell_round_trips() {
        let inner = Box::new(SquareGrid::new(1.0));
        let trs = Trs::new(Vec3::new(5.0, -3.0, 0.0), Quat::IDENTITY, Vec3::splat(2.0));
        let grid = TransformGrid::new(inner, trs).unwrap();
        let cell = Cell::new(1, 1, 0);
        let center = grid.cell_center(cell);
        assert_eq!(grid.find_cell(center), Some(cell));
    }

    #[test]
    fn mask_grid_excludes_cells_outside_mask() {
        let inner = Box::new(SquareGrid::new(1.0));
        let mask = Mask::new([Cell::new(0, 0, 0), Cell::new(1, 0, 0)]);
        let grid = MaskGrid::new(inner, mask);
        assert!(grid.is_cell_in_grid(Cell::new(0, 0, 0)));
        assert!(!grid.is_cell_in_grid(Cell::new(5, 5, 0)));
        assert!(grid.try_move(Cell::new(0, 0, 0), Direction::new(0)).is_some());
        assert!(grid.try_move(Cell::new(1, 0, 0), Direction::new(0)).is_none());
    }

    #[test]
    fn bijection_grid_round_trips_through_offset() {
        let inner = Box::new(SquareGrid::new(1.0));
        let offset = Cell::new(100, 100, 0);
        let grid = BijectionGrid::new(inner, move |c| c - offset, move |c| c + offset);
        let outer_cell = Cell::new(105, 103, 0);
        assert!(grid.is_cell_in_grid(outer_cell));
        let (dest, _, _) = grid.try_move(outer_cell, Direction::new(0)).unwrap();
        assert_eq!(dest, Cell::new(106, 103, 0));
    }
}
