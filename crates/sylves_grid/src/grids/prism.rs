//! Prism grids: 3D extrusion of a 2D base grid along Z (spec §4.4.5).
//!
//! Square and hex prisms pack `(base_x, base_y, layer)` directly into a
//! `Cell`'s three slots, since their base topology only ever uses two of
//! them. A triangle base already uses all three slots for its own
//! `x + y + z ∈ {1, 2}` coordinates, leaving no free slot for a layer
//! index; `TrianglePrismGrid` resolves this by packing
//! `layer * 2 + parity_bit` into `z` and recomputing the base triangle's
//! true `z` from `x`, `y`, and the recovered parity on every access. This
//! is a deliberate encoding choice, not a literal reading of any spec
//! formula (documented in `DESIGN.md`).

use crate::bound::Bound;
use crate::cell::Cell;
use crate::cell_type::{CellType, PrismCellType};
use crate::grid::{Grid, Mesh};
use crate::grids::hex::{HexGrid, HEX_FLAT_CELL_TYPE, HEX_POINTY_CELL_TYPE};
use crate::grids::square::{SquareGrid, SQUARE_CELL_TYPE};
use crate::grids::triangle::{self, TriangleGrid, TRIANGLE_DOWN_CELL_TYPE, TRIANGLE_UP_CELL_TYPE};
use crate::cell_type::{HexOrientation, TrianglePoint};
use crate::math::Vec3;
use sylves_direction::{Connection, Direction};

static SQUARE_PRISM_CELL_TYPE: PrismCellType = PrismCellType::new(&SQUARE_CELL_TYPE);
static HEX_FLAT_PRISM_CELL_TYPE: PrismCellType = PrismCellType::new(&HEX_FLAT_CELL_TYPE);
static HEX_POINTY_PRISM_CELL_TYPE: PrismCellType = PrismCellType::new(&HEX_POINTY_CELL_TYPE);
static TRIANGLE_UP_PRISM_CELL_TYPE: PrismCellType = PrismCellType::new(&TRIANGLE_UP_CELL_TYPE);
static TRIANGLE_DOWN_PRISM_CELL_TYPE: PrismCellType = PrismCellType::new(&TRIANGLE_DOWN_CELL_TYPE);

/// `Some(+1)`/`Some(-1)` if `dir` is the prism's `+Z`/`-Z` direction,
/// `None` if it addresses the base topology instead.
fn vertical_delta(dir: u8, base_count: u8) -> Option<i32> {
    if dir == base_count {
        Some(1)
    } else if dir == base_count + 1 {
        Some(-1)
    } else {
        None
    }
}

fn prism_mesh(base_corners: &[Vec3], base_count: u8) -> Mesh {
    let mut vertices = Vec::with_capacity(base_corners.len());
    vertices.extend_from_slice(base_corners);
    let mut indices = Vec::new();
    // Side quads, two triangles each.
    for i in 0..base_count as u32 {
        let j = (i + 1) % base_count as u32;
        let bl = i;
        let br = j;
        let tl = i + base_count as u32;
        let tr = j + base_count as u32;
        indices.extend_from_slice(&[bl, br, tr, bl, tr, tl]);
    }
    Mesh { vertices, indices }
}

//////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub struct SquarePrismGrid {
    pub base: SquareGrid,
    pub layer_height: f32,
    pub bound: Option<Bound>,
}

impl SquarePrismGrid {
    pub fn new(cell_size: f32, layer_height: f32) -> Self {
        SquarePrismGrid {
            base: SquareGrid::new(cell_size),
            layer_height,
            bound: None,
        }
    }

    fn base_cell(cell: Cell) -> Cell {
        Cell::new(cell.x(), cell.y(), 0)
    }
}

impl Grid for SquarePrismGrid {
    fn is_2d(&self) -> bool {
        false
    }

    fn cell_type(&self, cell: Cell) -> Option<&'static dyn CellType> {
        self.is_cell_in_grid(cell)
            .then_some(&SQUARE_PRISM_CELL_TYPE as &'static dyn CellType)
    }

    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        if !self.base.is_cell_in_grid(Self::base_cell(cell)) {
            return false;
        }
        match &self.bound {
            Some(bound) => bound.contains(cell),
            None => true,
        }
    }

    fn try_move(&self, cell: Cell, dir: Direction) -> Option<(Cell, Direction, Connection)> {
        if !self.is_cell_in_grid(cell) {
            return None;
        }
        let base_count = self.base.cell_type(Self::base_cell(cell))?.dir_count();
        if let Some(delta) = vertical_delta(dir.index(), base_count) {
            let dest = Cell::new(cell.x(), cell.y(), cell.z() + delta);
            if !self.is_cell_in_grid(dest) {
                return None;
            }
            let inverse = Direction::new(if delta > 0 { base_count + 1 } else { base_count });
            return Some((dest, inverse, Connection::IDENTITY));
        }
        let (base_dest, inverse, conn) = self.base.try_move(Self::base_cell(cell), dir)?;
        let dest = Cell::new(base_dest.x(), base_dest.y(), cell.z());
        self.is_cell_in_grid(dest).then_some((dest, inverse, conn))
    }

    fn cell_center(&self, cell: Cell) -> Vec3 {
        let base_center = self.base.cell_center(Self::base_cell(cell));
        Vec3::new(base_center.x, base_center.y, (cell.z() as f32 + 0.5) * self.layer_height)
    }

    fn cell_corner_pos(&self, cell: Cell, corner: u8) -> Vec3 {
        let base_count = SQUARE_CELL_TYPE.corner_count();
        let (base_corner, z) = if corner < base_count {
            (corner, cell.z() as f32 * self.layer_height)
        } else {
            (corner - base_count, (cell.z() + 1) as f32 * self.layer_height)
        };
        let p = self.base.cell_corner_pos(Self::base_cell(cell), base_corner);
        Vec3::new(p.x, p.y, z)
    }

    fn mesh_data(&self, cell: Cell) -> Option<Mesh> {
        let base_count = SQUARE_CELL_TYPE.corner_count();
        let corners: Vec<Vec3> = (0..base_count * 2).map(|c| self.cell_corner_pos(cell, c)).collect();
        Some(prism_mesh(&corners, base_count))
    }

    fn find_cell(&self, pos: Vec3) -> Option<Cell> {
        let base = self.base.find_cell(Vec3::new(pos.x, pos.y, 0.0))?;
        let layer = (pos.z / self.layer_height).floor() as i32;
        let cell = Cell::new(base.x(), base.y(), layer);
        self.is_cell_in_grid(cell).then_some(cell)
    }

    fn cells_in_aabb(&self, min: Vec3, max: Vec3) -> Vec<Cell> {
        let min_layer = (min.z / self.layer_height).floor() as i32;
        let max_layer = (max.z / self.layer_height).ceil() as i32;
        let base_cells = self.base.cells_in_aabb(Vec3::new(min.x, min.y, 0.0), Vec3::new(max.x, max.y, 0.0));
        let mut out = Vec::new();
        for layer in min_layer..=max_layer {
            for base in &base_cells {
                let cell = Cell::new(base.x(), base.y(), layer);
                if self.is_cell_in_grid(cell) {
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
        Box::new(SquarePrismGrid {
            base: self.base.clone(),
            layer_height: self.layer_height,
            bound: Some(bound),
        })
    }

    fn unbounded(&self) -> Box<dyn Grid> {
        Box::new(SquarePrismGrid::new(self.base.cell_size, self.layer_height))
    }
}

//////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub struct HexPrismGrid {
    pub base: HexGrid,
    pub layer_height: f32,
    pub bound: Option<Bound>,
}

impl HexPrismGrid {
    pub fn new(cell_size: f32, orientation: HexOrientation, layer_height: f32) -> Self {
        HexPrismGrid {
            base: HexGrid::new(cell_size, orientation),
            layer_height,
            bound: None,
        }
    }

    fn base_cell(cell: Cell) -> Cell {
        Cell::new(cell.x(), cell.y(), 0)
    }

    fn prism_cell_type(&self) -> &'static PrismCellType {
        match self.base.orientation {
            HexOrientation::FlatTop => &HEX_FLAT_PRISM_CELL_TYPE,
            HexOrientation::PointyTop => &HEX_POINTY_PRISM_CELL_TYPE,
        }
    }
}

impl Grid for HexPrismGrid {
    fn is_2d(&self) -> bool {
        false
    }

    fn cell_type(&self, cell: Cell) -> Option<&'static dyn CellType> {
        self.is_cell_in_grid(cell).then(|| self.prism_cell_type() as &'static dyn CellType)
    }

    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        if !self.base.is_cell_in_grid(Self::base_cell(cell)) {
            return false;
        }
        match &self.bound {
            Some(bound) => bound.contains(cell),
            None => true,
        }
    }

    fn try_move(&self, cell: Cell, dir: Direction) -> Option<(Cell, Direction, Connection)> {
        if !self.is_cell_in_grid(cell) {
            return None;
        }
        let base_count = 6u8;
        if let Some(delta) = vertical_delta(dir.index(), base_count) {
            let dest = Cell::new(cell.x(), cell.y(), cell.z() + delta);
            if !self.is_cell_in_grid(dest) {
                return None;
            }
            let inverse = Direction::new(if delta > 0 { base_count + 1 } else { base_count });
            return Some((dest, inverse, Connection::IDENTITY));
        }
        let (base_dest, inverse, conn) = self.base.try_move(Self::base_cell(cell), dir)?;
        let dest = Cell::new(base_dest.x(), base_dest.y(), cell.z());
        self.is_cell_in_grid(dest).then_some((dest, inverse, conn))
    }

    fn cell_center(&self, cell: Cell) -> Vec3 {
        let base_center = self.base.cell_center(Self::base_cell(cell));
        Vec3::new(base_center.x, base_center.y, (cell.z() as f32 + 0.5) * self.layer_height)
    }

    fn cell_corner_pos(&self, cell: Cell, corner: u8) -> Vec3 {
        let base_count = 6u8;
        let (base_corner, z) = if corner < base_count {
            (corner, cell.z() as f32 * self.layer_height)
        } else {
            (corner - base_count, (cell.z() + 1) as f32 * self.layer_height)
        };
        let p = self.base.cell_corner_pos(Self::base_cell(cell), base_corner);
        Vec3::new(p.x, p.y, z)
    }

    fn mesh_data(&self, cell: Cell) -> Option<Mesh> {
        let base_count = 6u8;
        let corners: Vec<Vec3> = (0..base_count * 2).map(|c| self.cell_corner_pos(cell, c)).collect();
        Some(prism_mesh(&corners, base_count))
    }

    fn find_cell(&self, pos: Vec3) -> Option<Cell> {
        let base = self.base.find_cell(Vec3::new(pos.x, pos.y, 0.0))?;
        let layer = (pos.z / self.layer_height).floor() as i32;
        let cell = Cell::new(base.x(), base.y(), layer);
        self.is_cell_in_grid(cell).then_some(cell)
    }

    fn cells_in_aabb(&self, min: Vec3, max: Vec3) -> Vec<Cell> {
        let min_layer = (min.z / self.layer_height).floor() as i32;
        let max_layer = (max.z / self.layer_height).ceil() as i32;
        let base_cells = self.base.cells_in_aabb(Vec3::new(min.x, min.y, 0.0), Vec3::new(max.x, max.y, 0.0));
        let mut out = Vec::new();
        for layer in min_layer..=max_layer {
            for base in &base_cells {
                let cell = Cell::new(base.x(), base.y(), layer);
                if self.is_cell_in_grid(cell) {
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
        Box::new(HexPrismGrid {
            base: self.base.clone(),
            layer_height: self.layer_height,
            bound: Some(bound),
        })
    }

    fn unbounded(&self) -> Box<dyn Grid> {
        Box::new(HexPrismGrid::new(self.base.cell_size, self.base.orientation, self.layer_height))
    }
}

//////////////////////////////////////////////////////////////////////////////

/// Recover the base triangle cell and layer from a `TrianglePrismGrid`
/// cell's packed `z = layer * 2 + parity_bit` encoding.
fn triangle_prism_decode(cell: Cell) -> Option<(Cell, i32)> {
    let layer = cell.z().div_euclid(2);
    let parity_bit = cell.z().rem_euclid(2);
    let parity = 1 + parity_bit;
    let base = Cell::new(cell.x(), cell.y(), parity - cell.x() - cell.y());
    triangle::point_of(base)?;
    Some((base, layer))
}

fn triangle_prism_encode(base: Cell, layer: i32) -> Option<Cell> {
    let point = triangle::point_of(base)?;
    let parity_bit = match point {
        TrianglePoint::Up => 1,
        TrianglePoint::Down => 0,
    };
    Some(Cell::new(base.x(), base.y(), layer * 2 + parity_bit))
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrianglePrismGrid {
    pub base: TriangleGrid,
    pub layer_height: f32,
    pub bound: Option<Bound>,
}

impl TrianglePrismGrid {
    pub fn new(cell_size: f32, layer_height: f32) -> Self {
        TrianglePrismGrid {
            base: TriangleGrid::new(cell_size),
            layer_height,
            bound: None,
        }
    }

    fn prism_cell_type(point: TrianglePoint) -> &'static PrismCellType {
        match point {
            TrianglePoint::Up => &TRIANGLE_UP_PRISM_CELL_TYPE,
            TrianglePoint::Down => &TRIANGLE_DOWN_PRISM_CELL_TYPE,
        }
    }
}

impl Grid for TrianglePrismGrid {
    fn is_2d(&self) -> bool {
        false
    }

    fn cell_type(&self, cell: Cell) -> Option<&'static dyn CellType> {
        let (base, _layer) = triangle_prism_decode(cell)?;
        if !self.is_cell_in_grid(cell) {
            return None;
        }
        Some(Self::prism_cell_type(triangle::point_of(base)?) as &'static dyn CellType)
    }

    fn is_cell_in_grid(&self, cell: Cell) -> bool {
        let Some((base, _layer)) = triangle_prism_decode(cell) else {
            return false;
        };
        if !self.base.is_cell_in_grid(base) {
            return false;
        }
        match &self.bound {
            Some(bound) => bound.contains(cell),
            None => true,
        }
    }

    fn try_move(&self, cell: Cell, dir: Direction) -> Option<(Cell, Direction, Connection)> {
        let (base, layer) = triangle_prism_decode(cell)?;
        if !self.is_cell_in_grid(cell) {
            return None;
        }
        let base_count = 6u8;
        if let Some(delta) = vertical_delta(dir.index(), base_count) {
            let dest = triangle_prism_encode(base, layer + delta)?;
            if !self.is_cell_in_grid(dest) {
                return None;
            }
            let inverse = Direction::new(if delta > 0 { base_count + 1 } else { base_count });
            return Some((dest, inverse, Connection::IDENTITY));
        }
        // TODO: spec §9 flags the down-pointing triangle's direction/inverse
        // pairing here as ambiguous in the reference source. This takes the
        // base triangle's own inverse verbatim rather than special-casing
        // the down-pointing parity (documented in DESIGN.md).
        let (base_dest, inverse, conn) = self.base.try_move(base, dir)?;
        let dest = triangle_prism_encode(base_dest, layer)?;
        self.is_cell_in_grid(dest).then_some((dest, inverse, conn))
    }

    fn cell_center(&self, cell: Cell) -> Vec3 {
        let Some((base, layer)) = triangle_prism_decode(cell) else {
            return Vec3::ZERO;
        };
        let base_center = self.base.cell_center(base);
        Vec3::new(base_center.x, base_center.y, (layer as f32 + 0.5) * self.layer_height)
    }

    fn cell_corner_pos(&self, cell: Cell, corner: u8) -> Vec3 {
        let Some((base, layer)) = triangle_prism_decode(cell) else {
            return Vec3::ZERO;
        };
        let base_count = 3u8;
        let (base_corner, z) = if corner < base_count {
            (corner, layer as f32 * self.layer_height)
        } else {
            (corner - base_count, (layer + 1) as f32 * self.layer_height)
        };
        let p = self.base.cell_corner_pos(base, base_corner);
        Vec3::new(p.x, p.y, z)
    }

    fn mesh_data(&self, cell: Cell) -> Option<Mesh> {
        let base_count = 3u8;
        let corners: Vec<Vec3> = (0..base_count * 2).map(|c| self.cell_corner_pos(cell, c)).collect();
        Some(prism_mesh(&corners, base_count))
    }

    fn find_cell(&self, pos: Vec3) -> Option<Cell> {
        let base = self.base.find_cell(Vec3::new(pos.x, pos.y, 0.0))?;
        let layer = (pos.z / self.layer_height).floor() as i32;
        let cell = triangle_prism_encode(base, layer)?;
        self.is_cell_in_grid(cell).then_some(cell)
    }

    fn cells_in_aabb(&self, min: Vec3, max: Vec3) -> Vec<Cell> {
        let min_layer = (min.z / self.layer_height).floor() as i32;
        let max_layer = (max.z / self.layer_height).ceil() as i32;
        let base_cells = self.base.cells_in_aabb(Vec3::new(min.x, min.y, 0.0), Vec3::new(max.x, max.y, 0.0));
        let mut out = Vec::new();
        for layer in min_layer..=max_layer {
            for base in &base_cells {
                if let Some(cell) = triangle_prism_encode(*base, layer) {
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
        Box::new(TrianglePrismGrid {
            base: self.base.clone(),
            layer_height: self.layer_height,
            bound: Some(bound),
        })
    }

    fn unbounded(&self) -> Box<dyn Grid> {
        Box::new(TrianglePrismGrid::new(self.base.cell_size, self.layer_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_prism_vertical_move_is_reversible() {
        let grid = SquarePrismGrid::new(1.0, 1.0);
        let (dest, inv, _) = grid.try_move(Cell::new(0, 0, 0), Direction::new(4)).unwrap();
        assert_eq!(dest, Cell::new(0, 0, 1));
        let (back, _, _) = grid.try_move(dest, inv).unwrap();
        assert_eq!(back, Cell::new(0, 0, 0));
    }

    #[test]
    fn square_prism_cell_center_has_layered_z() {
        let grid = SquarePrismGrid::new(1.0, 2.0);
        let center = grid.cell_center(Cell::new(0, 0, 1));
        assert!((center.z - 3.0).abs() < 1e-5);
    }

    #[test]
    fn triangle_prism_encode_decode_round_trips() {
        let base = Cell::new(0, 0, 1);
        let cell = triangle_prism_encode(base, 2).unwrap();
        let (decoded_base, decoded_layer) = triangle_prism_decode(cell).unwrap();
        assert_eq!(decoded_base, base);
        assert_eq!(decoded_layer, 2);
    }

    #[test]
    fn triangle_prism_vertical_move_preserves_base() {
        let grid = TrianglePrismGrid::new(1.0, 1.0);
        let base = Cell::new(0, 0, 1);
        let cell = triangle_prism_encode(base, 0).unwrap();
        let (dest, inv, _) = grid.try_move(cell, Direction::new(6)).unwrap();
        let (decoded_base, decoded_layer) = triangle_prism_decode(dest).unwrap();
        assert_eq!(decoded_base, base);
        assert_eq!(decoded_layer, 1);
        let (back, _, _) = grid.try_move(dest, inv).unwrap();
        assert_eq!(back, cell);
    }
}
