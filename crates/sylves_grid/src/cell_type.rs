//! The cell-type registry (spec component C3): per-topology direction
//! count, corner count, corner geometry, and the rotation/reflection
//! group acting on directions and corners.
//!
//! Spec §4.2 describes instances as singletons per `(topology,
//! orientation)`, constructed idempotently. Every cell type here is a
//! zero-sized (or near-zero-sized) marker value rather than a heap
//! allocation, so "construction" is free and "singleton" just means every
//! value of the type is interchangeable.

use crate::math::Vec3;
use lazy_static::lazy_static;
use sylves_direction::{Connection, CyclicGroup, DihedralGroup, Direction, DirectionSet, Rotation};
use std::fmt::Debug;

/// The per-topology direction/corner algebra. All indices passed to and
/// returned from this trait are raw `u8`s rather than `Direction`, since
/// most call sites are doing arithmetic on them; `Grid` implementations
/// wrap them in `Direction` at the API boundary.
pub trait CellType: Debug {
    fn dimension(&self) -> u8;
    fn dir_count(&self) -> u8;
    fn corner_count(&self) -> u8;

    /// The position of `corner` in a canonical unit frame centered at the
    /// cell's origin (spec §4.2).
    fn corner_position(&self, corner: u8) -> Vec3;

    /// The directions that are actually traversable from a cell of this
    /// exact type. For square, hex, and cube every direction in
    /// `0..dir_count` is live; for a triangle cell type only three of the
    /// six addressable directions are (spec glossary, "live direction").
    fn live_directions(&self) -> DirectionSet;

    /// Invert a direction. Partial on triangle cell types: only live
    /// directions have a defined inverse (spec §4.2).
    fn invert_dir(&self, dir: u8) -> Option<u8>;

    fn rotate_dir(&self, dir: u8, rot: Rotation) -> Option<u8>;
    fn rotate_corner(&self, corner: u8, rot: Rotation) -> u8;
    fn compose(&self, a: Rotation, b: Rotation) -> Rotation;
    fn invert_rotation(&self, rot: Rotation) -> Rotation;

    /// The minimal rotation/reflection mapping `from_dir` to `to_dir`
    /// (spec §4.2).
    fn connection(&self, from_dir: u8, to_dir: u8) -> Connection;
}

//////////////////////////////////////////////////////////////////////////////
// Square: cyclic group of order 4 (spec §4.2).
//////////////////////////////////////////////////////////////////////////////

/// Direction order `{0=Right, 1=Up, 2=Left, 3=Down}` (spec §3).
/// Corner order `{BR=0, TR=1, TL=2, BL=3}` (spec §4.4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SquareCellType;

const SQUARE_GROUP: CyclicGroup = CyclicGroup::new(4);

impl CellType for SquareCellType {
    fn dimension(&self) -> u8 {
        2
    }

    fn dir_count(&self) -> u8 {
        4
    }

    fn corner_count(&self) -> u8 {
        4
    }

    fn corner_position(&self, corner: u8) -> Vec3 {
        match corner % 4 {
            0 => Vec3::new(0.5, -0.5, 0.0),  // BR
            1 => Vec3::new(0.5, 0.5, 0.0),   // TR
            2 => Vec3::new(-0.5, 0.5, 0.0),  // TL
            _ => Vec3::new(-0.5, -0.5, 0.0), // BL
        }
    }

    fn live_directions(&self) -> DirectionSet {
        DirectionSet::range(4)
    }

    fn invert_dir(&self, dir: u8) -> Option<u8> {
        Some((dir + 2) % 4)
    }

    fn rotate_dir(&self, dir: u8, rot: Rotation) -> Option<u8> {
        if rot.is_reflection() {
            return None;
        }
        Some(SQUARE_GROUP.action_on_dir(rot, dir % 4))
    }

    fn rotate_corner(&self, corner: u8, rot: Rotation) -> u8 {
        SQUARE_GROUP.action_on_dir(rot, corner % 4)
    }

    fn compose(&self, a: Rotation, b: Rotation) -> Rotation {
        SQUARE_GROUP.compose(a, b)
    }

    fn invert_rotation(&self, rot: Rotation) -> Rotation {
        SQUARE_GROUP.invert(rot)
    }

    fn connection(&self, from_dir: u8, to_dir: u8) -> Connection {
        SQUARE_GROUP.connection_between(from_dir % 4, to_dir % 4)
    }
}

//////////////////////////////////////////////////////////////////////////////
// Hex: dihedral group of order 12 (6 rotations + 6 reflections), spec §4.2.
//////////////////////////////////////////////////////////////////////////////

/// Whether hex cells are drawn with a flat edge or a vertex at the top.
/// Affects only corner/screen geometry, never the direction/rotation
/// algebra (spec §4.4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexOrientation {
    FlatTop,
    PointyTop,
}

/// Direction order `{0=E, 1=NE, 2=NW, 3=W, 4=SW, 5=SE}` (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexCellType {
    pub orientation: HexOrientation,
}

const HEX_GROUP: DihedralGroup = DihedralGroup::new(6);

impl HexCellType {
    pub const fn new(orientation: HexOrientation) -> Self {
        HexCellType { orientation }
    }
}

impl CellType for HexCellType {
    fn dimension(&self) -> u8 {
        2
    }

    fn dir_count(&self) -> u8 {
        6
    }

    fn corner_count(&self) -> u8 {
        6
    }

    fn corner_position(&self, corner: u8) -> Vec3 {
        // Circumradius 1 in the canonical unit frame; six vertices spaced
        // 60 degrees apart, offset by 30 degrees for the pointy-top case.
        let base_angle = match self.orientation {
            HexOrientation::FlatTop => 0.0,
            HexOrientation::PointyTop => std::f32::consts::PI / 6.0,
        };
        let angle = base_angle + (corner % 6) as f32 * std::f32::consts::FRAC_PI_3;
        Vec3::new(angle.cos(), angle.sin(), 0.0)
    }

    fn live_directions(&self) -> DirectionSet {
        DirectionSet::range(6)
    }

    fn invert_dir(&self, dir: u8) -> Option<u8> {
        Some((dir + 3) % 6)
    }

    fn rotate_dir(&self, dir: u8, rot: Rotation) -> Option<u8> {
        Some(HEX_GROUP.action_on_dir(rot, dir % 6))
    }

    fn rotate_corner(&self, corner: u8, rot: Rotation) -> u8 {
        HEX_GROUP.action_on_dir(rot, corner % 6)
    }

    fn compose(&self, a: Rotation, b: Rotation) -> Rotation {
        HEX_GROUP.compose(a, b)
    }

    fn invert_rotation(&self, rot: Rotation) -> Rotation {
        HEX_GROUP.invert(rot)
    }

    fn connection(&self, from_dir: u8, to_dir: u8) -> Connection {
        HEX_GROUP.connection_between(from_dir % 6, to_dir % 6)
    }
}

//////////////////////////////////////////////////////////////////////////////
// Triangle: shares the hex group's encoding (spec §4.2), but only three of
// the six addressable directions are live, depending on parity.
//////////////////////////////////////////////////////////////////////////////

/// Which way a triangle cell points. `Up` cells have `x + y + z == 2`,
/// `Down` cells have `x + y + z == 1` (spec §3, glossary "Parity").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrianglePoint {
    Up,
    Down,
}

impl std::ops::Not for TrianglePoint {
    type Output = TrianglePoint;
    fn not(self) -> TrianglePoint {
        match self {
            TrianglePoint::Up => TrianglePoint::Down,
            TrianglePoint::Down => TrianglePoint::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleCellType {
    pub point: TrianglePoint,
}

impl TriangleCellType {
    pub const fn new(point: TrianglePoint) -> Self {
        TriangleCellType { point }
    }
}

lazy_static! {
    /// Live directions for an up-pointing triangle. The six addressable
    /// direction slots are paired into three (axis, sign) pairs
    /// `(0,1), (2,4), (3,5)`; `Up` cells (`x+y+z==2`) can only move by
    /// decrementing a coordinate, which resolves to slots `{0, 2, 3}`
    /// (spec §9: the exact index-to-neighbor assignment is not pinned
    /// down by the glossary's dangling "table in 9.1" reference, so this
    /// is a documented implementation choice, not a derived fact).
    static ref TRIANGLE_LIVE_UP: DirectionSet = DirectionSet::from_slice(&[
        Direction::new(0),
        Direction::new(2),
        Direction::new(3),
    ]);

    /// Live directions for a down-pointing triangle: the complementary
    /// slots `{1, 4, 5}`, matching spec §8 scenario 6 literally.
    static ref TRIANGLE_LIVE_DOWN: DirectionSet = DirectionSet::from_slice(&[
        Direction::new(1),
        Direction::new(4),
        Direction::new(5),
    ]);
}

/// `invert_dir` pairing for the six addressable triangle direction slots:
/// moving via slot `a` from one parity and back via slot `b` from the
/// other always returns to the origin cell. Shared with `grids::triangle`,
/// which performs the actual coordinate arithmetic for a move.
pub(crate) const TRIANGLE_INVERT_PAIRS: [u8; 6] = [1, 0, 4, 5, 2, 3];

/// `(axis, sign)` for each of the six addressable triangle direction
/// slots, axis `0 = x, 1 = y, 2 = z`. Slots `{1, 4, 5}` (sign `+1`) are
/// live on `Down` cells; slots `{0, 2, 3}` (sign `-1`) are live on `Up`
/// cells (spec §9: see `TRIANGLE_INVERT_PAIRS` doc comment above for why
/// this assignment, not some other, was chosen).
pub(crate) const TRIANGLE_DIR_AXIS_SIGN: [(u8, i32); 6] =
    [(0, -1), (0, 1), (1, -1), (2, -1), (1, 1), (2, 1)];

impl CellType for TriangleCellType {
    fn dimension(&self) -> u8 {
        2
    }

    fn dir_count(&self) -> u8 {
        6
    }

    fn corner_count(&self) -> u8 {
        3
    }

    fn corner_position(&self, corner: u8) -> Vec3 {
        // Equilateral triangle inscribed in the unit circle, apex up or
        // down depending on the cell's point.
        let apex_angle = match self.point {
            TrianglePoint::Up => std::f32::consts::FRAC_PI_2,
            TrianglePoint::Down => -std::f32::consts::FRAC_PI_2,
        };
        let angle = apex_angle + (corner % 3) as f32 * (2.0 * std::f32::consts::FRAC_PI_3);
        Vec3::new(angle.cos(), angle.sin(), 0.0)
    }

    fn live_directions(&self) -> DirectionSet {
        match self.point {
            TrianglePoint::Up => *TRIANGLE_LIVE_UP,
            TrianglePoint::Down => *TRIANGLE_LIVE_DOWN,
        }
    }

    fn invert_dir(&self, dir: u8) -> Option<u8> {
        if !self.live_directions().contains(Direction::new(dir)) {
            return None;
        }
        Some(TRIANGLE_INVERT_PAIRS[dir as usize % 6])
    }

    fn rotate_dir(&self, dir: u8, rot: Rotation) -> Option<u8> {
        Some(HEX_GROUP.action_on_dir(rot, dir % 6))
    }

    fn rotate_corner(&self, corner: u8, rot: Rotation) -> u8 {
        // Corners only number 3, but they're drawn from the same
        // dihedral group acting on a coarser (mod-3) quotient.
        HEX_GROUP.action_on_dir(rot, (corner % 3) * 2) % 3
    }

    fn compose(&self, a: Rotation, b: Rotation) -> Rotation {
        HEX_GROUP.compose(a, b)
    }

    fn invert_rotation(&self, rot: Rotation) -> Rotation {
        HEX_GROUP.invert(rot)
    }

    fn connection(&self, from_dir: u8, to_dir: u8) -> Connection {
        HEX_GROUP.connection_between(from_dir % 6, to_dir % 6)
    }
}

//////////////////////////////////////////////////////////////////////////////
// Cube: minimal rotation-only model (spec §4.2: reflections are
// recognized structurally via `Rotation::Reflect` but never constructed).
//////////////////////////////////////////////////////////////////////////////

/// Direction order `{0=+X, 1=-X, 2=+Y, 3=-Y, 4=+Z, 5=-Z}` (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CubeCellType;

/// A signed 3x3 permutation matrix, used to enumerate the 24-element
/// proper rotation group of the cube.
type Mat3i = [[i8; 3]; 3];

const IDENTITY_MAT3I: Mat3i = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];

fn mat3i_mul(a: Mat3i, b: Mat3i) -> Mat3i {
    let mut out = [[0i8; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

fn mat3i_apply_axis(m: Mat3i, axis: usize, sign: i8) -> (usize, i8) {
    // Apply `m` to the signed unit basis vector for `axis`, returning the
    // resulting (axis, sign) pair. Every row/column of a rotation matrix
    // here has exactly one nonzero +-1 entry.
    let col = [m[0][axis], m[1][axis], m[2][axis]];
    let out_axis = col.iter().position(|&v| v != 0).expect("rotation matrix column must be nonzero");
    (out_axis, col[out_axis] * sign)
}

lazy_static! {
    /// The 24 proper rotations of the cube, generated by closing the two
    /// 90-degree generators (about X and about Y) under composition.
    static ref CUBE_ROTATIONS: Vec<Mat3i> = {
        let rot_x: Mat3i = [[1, 0, 0], [0, 0, -1], [0, 1, 0]];
        let rot_y: Mat3i = [[0, 0, 1], [0, 1, 0], [-1, 0, 0]];
        let mut group = vec![IDENTITY_MAT3I];
        let mut frontier = vec![IDENTITY_MAT3I];
        while let Some(m) = frontier.pop() {
            for gen in [rot_x, rot_y] {
                let next = mat3i_mul(gen, m);
                if !group.contains(&next) {
                    group.push(next);
                    frontier.push(next);
                }
            }
        }
        group
    };
}

/// `(axis, sign)` for each of the six cube directions, in spec order.
const CUBE_DIR_AXES: [(usize, i8); 6] = [(0, 1), (0, -1), (1, 1), (1, -1), (2, 1), (2, -1)];

fn cube_dir_index(axis: usize, sign: i8) -> u8 {
    CUBE_DIR_AXES
        .iter()
        .position(|&(a, s)| a == axis && s == sign)
        .expect("every (axis, sign) pair is addressable") as u8
}

fn cube_rotation_index(rot: Rotation) -> usize {
    match rot {
        Rotation::Rotate(n) => (n as usize) % CUBE_ROTATIONS.len(),
        // The cube cell type never constructs a `Reflect` value itself,
        // but accepts one structurally by treating its step the same as
        // a pure rotation (spec §4.2: reflections recognized, not
        // enumerated).
        Rotation::Reflect(n) => (n as usize) % CUBE_ROTATIONS.len(),
    }
}

impl CellType for CubeCellType {
    fn dimension(&self) -> u8 {
        3
    }

    fn dir_count(&self) -> u8 {
        6
    }

    fn corner_count(&self) -> u8 {
        8
    }

    fn corner_position(&self, corner: u8) -> Vec3 {
        let c = corner % 8;
        let x = if c & 1 == 0 { -0.5 } else { 0.5 };
        let y = if c & 2 == 0 { -0.5 } else { 0.5 };
        let z = if c & 4 == 0 { -0.5 } else { 0.5 };
        Vec3::new(x, y, z)
    }

    fn live_directions(&self) -> DirectionSet {
        DirectionSet::range(6)
    }

    fn invert_dir(&self, dir: u8) -> Option<u8> {
        Some(dir ^ 1)
    }

    fn rotate_dir(&self, dir: u8, rot: Rotation) -> Option<u8> {
        let (axis, sign) = CUBE_DIR_AXES[dir as usize % 6];
        let m = CUBE_ROTATIONS[cube_rotation_index(rot)];
        let (out_axis, out_sign) = mat3i_apply_axis(m, axis, sign);
        Some(cube_dir_index(out_axis, out_sign))
    }

    fn rotate_corner(&self, corner: u8, rot: Rotation) -> u8 {
        let c = self.corner_position(corner);
        let m = CUBE_ROTATIONS[cube_rotation_index(rot)];
        let signs = [
            if c.x > 0.0 { 1i8 } else { -1 },
            if c.y > 0.0 { 1i8 } else { -1 },
            if c.z > 0.0 { 1i8 } else { -1 },
        ];
        let mut out_signs = [0i8; 3];
        for (axis, &sign) in signs.iter().enumerate() {
            let (out_axis, out_sign) = mat3i_apply_axis(m, axis, sign);
            out_signs[out_axis] = out_sign;
        }
        let mut index = 0u8;
        if out_signs[0] > 0 {
            index |= 1;
        }
        if out_signs[1] > 0 {
            index |= 2;
        }
        if out_signs[2] > 0 {
            index |= 4;
        }
        index
    }

    fn compose(&self, a: Rotation, b: Rotation) -> Rotation {
        let ma = CUBE_ROTATIONS[cube_rotation_index(a)];
        let mb = CUBE_ROTATIONS[cube_rotation_index(b)];
        let product = mat3i_mul(ma, mb);
        let index = CUBE_ROTATIONS
            .iter()
            .position(|m| *m == product)
            .expect("cube rotation group is closed under composition");
        Rotation::Rotate(index as u8)
    }

    fn invert_rotation(&self, rot: Rotation) -> Rotation {
        let m = CUBE_ROTATIONS[cube_rotation_index(rot)];
        // A rotation matrix's inverse is its transpose.
        let mut t = [[0i8; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                t[i][j] = m[j][i];
            }
        }
        let index = CUBE_ROTATIONS
            .iter()
            .position(|candidate| *candidate == t)
            .expect("cube rotation group is closed under inversion");
        Rotation::Rotate(index as u8)
    }

    fn connection(&self, from_dir: u8, to_dir: u8) -> Connection {
        let (from_axis, from_sign) = CUBE_DIR_AXES[from_dir as usize % 6];
        let (to_axis, to_sign) = CUBE_DIR_AXES[to_dir as usize % 6];
        let index = CUBE_ROTATIONS
            .iter()
            .position(|m| mat3i_apply_axis(*m, from_axis, from_sign) == (to_axis, to_sign))
            .expect("every cube direction pair is reachable by some rotation");
        Connection::new(Rotation::Rotate(index as u8))
    }
}

//////////////////////////////////////////////////////////////////////////////
// Prism: base directions/corners followed by {+Z, -Z} (spec §4.4.5).
//////////////////////////////////////////////////////////////////////////////

/// A cell type built by extruding a 2D base cell type along Z. Direction
/// set is the base's directions followed by `{+Z = base_dir_count,
/// -Z = base_dir_count + 1}`; corner count doubles (bottom ring, then top
/// ring), per spec §4.4.5.
#[derive(Debug, Clone, Copy)]
pub struct PrismCellType {
    pub base: &'static dyn CellType,
}

impl PrismCellType {
    pub const fn new(base: &'static dyn CellType) -> Self {
        PrismCellType { base }
    }
}

impl CellType for PrismCellType {
    fn dimension(&self) -> u8 {
        3
    }

    fn dir_count(&self) -> u8 {
        self.base.dir_count() + 2
    }

    fn corner_count(&self) -> u8 {
        self.base.corner_count() * 2
    }

    fn corner_position(&self, corner: u8) -> Vec3 {
        let base_count = self.base.corner_count();
        if corner < base_count {
            let p = self.base.corner_position(corner);
            Vec3::new(p.x, p.y, -0.5)
        } else {
            let p = self.base.corner_position(corner - base_count);
            Vec3::new(p.x, p.y, 0.5)
        }
    }

    fn live_directions(&self) -> DirectionSet {
        let base_count = self.base.dir_count();
        self.base.live_directions().union(DirectionSet::from_slice(&[
            Direction::new(base_count),
            Direction::new(base_count + 1),
        ]))
    }

    fn invert_dir(&self, dir: u8) -> Option<u8> {
        let base_count = self.base.dir_count();
        if dir < base_count {
            self.base.invert_dir(dir)
        } else if dir == base_count {
            Some(base_count + 1)
        } else if dir == base_count + 1 {
            Some(base_count)
        } else {
            None
        }
    }

    fn rotate_dir(&self, dir: u8, rot: Rotation) -> Option<u8> {
        let base_count = self.base.dir_count();
        if dir < base_count {
            self.base.rotate_dir(dir, rot)
        } else {
            Some(dir)
        }
    }

    fn rotate_corner(&self, corner: u8, rot: Rotation) -> u8 {
        let base_count = self.base.corner_count();
        if corner < base_count {
            self.base.rotate_corner(corner, rot)
        } else {
            self.base.rotate_corner(corner - base_count, rot) + base_count
        }
    }

    fn compose(&self, a: Rotation, b: Rotation) -> Rotation {
        self.base.compose(a, b)
    }

    fn invert_rotation(&self, rot: Rotation) -> Rotation {
        self.base.invert_rotation(rot)
    }

    fn connection(&self, from_dir: u8, to_dir: u8) -> Connection {
        let base_count = self.base.dir_count();
        if from_dir < base_count && to_dir < base_count {
            self.base.connection(from_dir, to_dir)
        } else {
            Connection::IDENTITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_invert_dir_is_involution() {
        let ct = SquareCellType;
        for d in 0..4u8 {
            let inv = ct.invert_dir(d).unwrap();
            assert_eq!(ct.invert_dir(inv).unwrap(), d);
        }
    }

    #[test]
    fn hex_rotate_dir_matches_spec_example() {
        // try_move(·, E=0) from (2,-1) should be consistent with rotating
        // E by the identity rotation (sanity check of the table, not the
        // grid's coordinate math).
        let ct = HexCellType::new(HexOrientation::FlatTop);
        assert_eq!(ct.rotate_dir(0, Rotation::IDENTITY), Some(0));
        assert_eq!(ct.invert_dir(0), Some(3));
    }

    #[test]
    fn triangle_down_live_directions_matches_spec_scenario() {
        let ct = TriangleCellType::new(TrianglePoint::Down);
        let live: Vec<u8> = ct.live_directions().iter().map(|d| d.index()).collect();
        assert_eq!(live, vec![1, 4, 5]);
    }

    #[test]
    fn triangle_invert_dir_is_none_for_non_live_direction() {
        let ct = TriangleCellType::new(TrianglePoint::Down);
        assert!(ct.invert_dir(0).is_none());
        assert_eq!(ct.invert_dir(1), Some(0));
    }

    #[test]
    fn cube_rotation_group_has_24_elements() {
        assert_eq!(CUBE_ROTATIONS.len(), 24);
    }

    #[test]
    fn cube_invert_dir_is_antipodal() {
        let ct = CubeCellType;
        for d in 0..6u8 {
            assert_eq!(ct.invert_dir(d), Some(d ^ 1));
        }
    }

    #[test]
    fn cube_rotate_dir_round_trips_through_inverse() {
        let ct = CubeCellType;
        for index in 0..CUBE_ROTATIONS.len() as u8 {
            let rot = Rotation::Rotate(index);
            let inv = ct.invert_rotation(rot);
            for d in 0..6u8 {
                let rotated = ct.rotate_dir(d, rot).unwrap();
                assert_eq!(ct.rotate_dir(rotated, inv).unwrap(), d);
            }
        }
    }
}
