//! Direction, direction-set, and rotation/reflection group algebra shared by
//! every grid topology in `sylves_grid`.
//!
//! Unlike a fixed eight-point compass, a `Direction` here is just a small
//! integer whose meaning is local to a particular cell type: square cells
//! use four of them, hexagons six, cubes six, prisms base-count-plus-two.
//! Keeping the value a plain index (rather than a named enum) is what lets
//! one `DirectionSet` bitset implementation serve every topology.

use bitset_core::BitSet;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::Display;

//////////////////////////////////////////////////////////////////////////////

/// A direction local to some cell type, represented as a small index.
/// The maximum number of directions any topology in this crate needs is
/// eight (a hex or triangle prism: six base directions plus up/down), so a
/// `u8` is ample and lets `DirectionSet` stay a single-byte bitset.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Direction(pub u8);

impl Direction {
    pub const fn new(index: u8) -> Self {
        Direction(index)
    }

    pub const fn index(self) -> u8 {
        self.0
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.0)
    }
}

impl From<u8> for Direction {
    fn from(value: u8) -> Self {
        Direction(value)
    }
}

//////////////////////////////////////////////////////////////////////////////

/// A set of `Direction`s, represented as a bitset over indices `0..8`.
/// Every topology's maximum direction count fits comfortably within a
/// single byte, so membership, union, and intersection are all single
/// machine instructions.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DirectionSet(u8);

impl Display for DirectionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (index, dir) in self.iter().enumerate() {
            if index != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", dir)?;
        }
        write!(f, "}}")
    }
}

pub struct DirectionSetIter {
    set: DirectionSet,
    index: u8,
}

impl DirectionSetIter {
    fn new(set: DirectionSet) -> Self {
        DirectionSetIter { set, index: 0 }
    }

    fn position(&mut self) {
        while self.index < 8 && !self.set.0.bit_test(self.index as usize) {
            self.index += 1;
        }
    }
}

impl Iterator for DirectionSetIter {
    type Item = Direction;

    fn next(&mut self) -> Option<Self::Item> {
        self.position();
        if self.index == 8 {
            return None;
        }
        let dir = Direction(self.index);
        self.index += 1;
        Some(dir)
    }
}

impl IntoIterator for DirectionSet {
    type Item = Direction;
    type IntoIter = DirectionSetIter;

    fn into_iter(self) -> Self::IntoIter {
        DirectionSetIter::new(self)
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = DirectionSet::empty();
        for dir in iter {
            set.insert(dir);
        }
        set
    }
}

impl DirectionSet {
    /// Create a `DirectionSet` from a slice of `Direction`s.
    pub const fn from_slice(dirs: &[Direction]) -> Self {
        let mut v = 0u8;
        let mut index = 0usize;
        while index < dirs.len() {
            v |= 1 << dirs[index].0 as usize;
            index += 1;
        }
        DirectionSet(v)
    }

    /// A set containing the first `count` directions `0..count`, used by
    /// cell types where every direction is always live (square, hex, cube).
    pub const fn range(count: u8) -> Self {
        DirectionSet(((1u16 << count) - 1) as u8)
    }

    pub const fn empty() -> DirectionSet {
        DirectionSet(0)
    }

    pub fn insert(&mut self, dir: Direction) {
        self.0.bit_set(dir.0 as usize);
    }

    pub fn superset(&self, other: DirectionSet) -> bool {
        self.0.bit_superset(&other.0)
    }

    pub fn subset(&self, other: DirectionSet) -> bool {
        self.0.bit_subset(&other.0)
    }

    pub fn intersection(&self, other: DirectionSet) -> DirectionSet {
        let mut v = self.0;
        DirectionSet(*v.bit_and(&other.0))
    }

    pub fn union(&self, other: DirectionSet) -> DirectionSet {
        let mut v = self.0;
        DirectionSet(*v.bit_or(&other.0))
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0.bit_none()
    }

    pub fn iter(&self) -> DirectionSetIter {
        DirectionSetIter::new(*self)
    }

    pub fn contains(&self, dir: Direction) -> bool {
        self.0.bit_test(dir.0 as usize)
    }
}

//////////////////////////////////////////////////////////////////////////////

/// A rotation/reflection group element.
///
/// Spec note (design notes §9, "Rotation encoding"): the reference C
/// implementation packs this into a signed integer and uses `~r` to denote
/// "reflect then rotate by `r`". That bit trick is deliberately not used
/// here; `Reflect`/`Rotate` are distinct variants so composition tables can
/// match on them directly rather than relying on two's-complement
/// arithmetic to separate the cases.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    /// A pure rotation by `n` steps of the cell type's minimal rotation
    /// unit (60 degrees for hex/triangle, 90 degrees for square).
    Rotate(u8),
    /// A reflection followed by a rotation of `n` steps.
    Reflect(u8),
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation::Rotate(0);

    pub fn is_reflection(self) -> bool {
        matches!(self, Rotation::Reflect(_))
    }

    /// The rotation step embedded in this element, independent of whether
    /// it is a pure rotation or a reflection composed with a rotation.
    pub fn step(self) -> u8 {
        match self {
            Rotation::Rotate(n) | Rotation::Reflect(n) => n,
        }
    }
}

impl Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rotation::Rotate(n) => write!(f, "Rotate({})", n),
            Rotation::Reflect(n) => write!(f, "Reflect({})", n),
        }
    }
}

//////////////////////////////////////////////////////////////////////////////

/// A purely rotational cyclic group of a given `order`, used by cell types
/// whose group does not include reflections (the square grid: "cyclic of
/// order 4", spec §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclicGroup {
    pub order: u8,
}

impl CyclicGroup {
    pub const fn new(order: u8) -> Self {
        CyclicGroup { order }
    }

    pub fn compose(&self, a: Rotation, b: Rotation) -> Rotation {
        Rotation::Rotate((a.step() + b.step()) % self.order)
    }

    pub fn invert(&self, a: Rotation) -> Rotation {
        Rotation::Rotate((self.order - a.step() % self.order) % self.order)
    }

    /// Apply a rotation to a direction index drawn from `0..order`.
    pub fn action_on_dir(&self, r: Rotation, dir: u8) -> u8 {
        (dir + r.step()) % self.order
    }

    /// The minimal rotation mapping `from_dir` to `to_dir`.
    pub fn connection_between(&self, from_dir: u8, to_dir: u8) -> Connection {
        let diff = (to_dir + self.order - from_dir % self.order) % self.order;
        Connection::new(Rotation::Rotate(diff))
    }
}

/// A dihedral group of order `2 * order` (`order` rotations plus `order`
/// reflections), used by the hex and triangle cell types, which spec §4.2
/// and §4.7 describe identically: "Triangle group uses the same encoding
/// as hex."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DihedralGroup {
    pub order: u8,
}

impl DihedralGroup {
    pub const fn new(order: u8) -> Self {
        DihedralGroup { order }
    }

    /// Composition rules for `(a, b)` are the four cases over
    /// `(is_reflection(a), is_reflection(b))`, per spec §4.7.
    pub fn compose(&self, a: Rotation, b: Rotation) -> Rotation {
        let n = self.order;
        match (a, b) {
            (Rotation::Rotate(ra), Rotation::Rotate(rb)) => Rotation::Rotate((ra + rb) % n),
            (Rotation::Rotate(ra), Rotation::Reflect(rb)) => Rotation::Reflect((ra + rb) % n),
            (Rotation::Reflect(ra), Rotation::Rotate(rb)) => {
                Rotation::Reflect((ra + n - rb % n) % n)
            }
            (Rotation::Reflect(ra), Rotation::Reflect(rb)) => {
                Rotation::Rotate((n + ra - rb) % n)
            }
        }
    }

    pub fn invert(&self, a: Rotation) -> Rotation {
        let n = self.order;
        match a {
            Rotation::Rotate(r) => Rotation::Rotate((n - r % n) % n),
            // Reflections are involutions: composing Reflect(r) with itself
            // must yield the identity rotation, so the inverse is itself.
            Rotation::Reflect(r) => Rotation::Reflect(r),
        }
    }

    /// Apply a rotation to a direction index drawn from `0..order`. For a
    /// pure rotation `r`, `d' = (d + r) mod order`; for a reflection with
    /// rotation `r`, `d' = (order - 1 - d + r) mod order` (spec §4.7).
    pub fn action_on_dir(&self, rot: Rotation, dir: u8) -> u8 {
        let n = self.order as i32;
        let d = dir as i32;
        match rot {
            Rotation::Rotate(r) => ((d + r as i32) % n) as u8,
            Rotation::Reflect(r) => ((n - 1 - d + r as i32).rem_euclid(n)) as u8,
        }
    }

    /// The minimal rotation/reflection mapping `from_dir` to `to_dir`.
    /// Prefers a pure rotation when one exists.
    pub fn connection_between(&self, from_dir: u8, to_dir: u8) -> Connection {
        let n = self.order;
        let rotate_step = (to_dir + n - from_dir % n) % n;
        Connection::new(Rotation::Rotate(rotate_step))
    }
}

//////////////////////////////////////////////////////////////////////////////

/// The local-frame transformation realized by moving from one cell to an
/// adjacent one. Identity for every purely translational grid in this
/// crate (square, hex, triangle, cube; prisms over any of them).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Connection {
    pub rotation: Rotation,
    pub mirror: bool,
}

impl Connection {
    pub const IDENTITY: Connection = Connection {
        rotation: Rotation::IDENTITY,
        mirror: false,
    };

    pub fn new(rotation: Rotation) -> Self {
        Connection {
            mirror: rotation.is_reflection(),
            rotation,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Connection::IDENTITY
    }
}

impl Display for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Connection({}, mirror={})", self.rotation, self.mirror)
    }
}

//////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_set_roundtrips_through_slice() {
        let dirs = [Direction(0), Direction(2), Direction(5)];
        let set = DirectionSet::from_slice(&dirs);
        for d in dirs {
            assert!(set.contains(d));
        }
        assert!(!set.contains(Direction(1)));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn direction_set_union_and_intersection() {
        let a = DirectionSet::from_slice(&[Direction(0), Direction(1)]);
        let b = DirectionSet::from_slice(&[Direction(1), Direction(2)]);
        assert_eq!(
            a.union(b),
            DirectionSet::from_slice(&[Direction(0), Direction(1), Direction(2)])
        );
        assert_eq!(a.intersection(b), DirectionSet::from_slice(&[Direction(1)]));
    }

    #[test]
    fn cyclic_group_compose_and_invert_are_group_axioms() {
        let g = CyclicGroup::new(4);
        for i in 0..4u8 {
            let r = Rotation::Rotate(i);
            let inv = g.invert(r);
            assert_eq!(g.compose(r, inv), Rotation::IDENTITY);
        }
    }

    #[test]
    fn dihedral_group_reflection_is_involution() {
        let g = DihedralGroup::new(6);
        for i in 0..6u8 {
            let r = Rotation::Reflect(i);
            let composed = g.compose(r, r);
            assert_eq!(composed, Rotation::Rotate(0));
        }
    }

    #[test]
    fn dihedral_connection_between_round_trips() {
        let g = DihedralGroup::new(6);
        for from in 0..6u8 {
            for to in 0..6u8 {
                let conn = g.connection_between(from, to);
                assert_eq!(g.action_on_dir(conn.rotation, from), to);
            }
        }
    }
}
