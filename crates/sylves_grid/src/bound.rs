//! Topology-tagged finite cell regions (spec component C4).

use crate::cell::Cell;
use crate::math::{Aabb, IVec3, Vec3};
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//////////////////////////////////////////////////////////////////////////////

/// An order-independent hash set of cells, used by [`Bound::Mask`] and by
/// cross-variant `intersect`/`union` (spec §9, "Bound composition": degrade
/// to Mask, never requiring a particular topology's enumeration order).
///
/// `Hash` sums the hash of each member rather than hashing the underlying
/// `HashSet` directly (whose iteration order is unspecified), so two masks
/// with the same members hash identically regardless of insertion order.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mask(HashSet<Cell>);

impl Mask {
    pub fn new(cells: impl IntoIterator<Item = Cell>) -> Self {
        Mask(cells.into_iter().collect())
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.0.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.0.iter().copied()
    }

    pub fn insert(&mut self, cell: Cell) {
        self.0.insert(cell);
    }
}

impl PartialEq for Mask {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for Mask {}

impl std::hash::Hash for Mask {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        let mut hashes: Vec<u64> = self
            .0
            .iter()
            .map(|cell| {
                use std::hash::{Hash, Hasher};
                let mut h = std::collections::hash_map::DefaultHasher::new();
                cell.hash(&mut h);
                h.finish()
            })
            .collect();
        hashes.sort_unstable();
        for h in hashes {
            h.hash(state);
        }
    }
}

impl FromIterator<Cell> for Mask {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Mask::new(iter)
    }
}

//////////////////////////////////////////////////////////////////////////////

/// A topology-tagged finite region of cells (spec §3, §4.3).
///
/// Every variant besides `Mask` stores inclusive `min..=max` extents per
/// axis; `min <= max` componentwise is an invariant, and an empty range
/// (`min > max` on construction would be a caller bug, but `count() == 0`
/// is perfectly valid when `min == max + 1`-style degenerate ranges arise
/// from `intersect`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Bound {
    Rectangle { min: (i32, i32), max: (i32, i32) },
    Cube { min: IVec3, max: IVec3 },
    HexParallelogram { min: (i32, i32), max: (i32, i32) },
    TriangleParallelogram { min: (i32, i32), max: (i32, i32) },
    Mask(Mask),
    Aabb(Aabb),
}

impl Bound {
    pub fn rectangle(min: (i32, i32), max: (i32, i32)) -> Self {
        Bound::Rectangle { min, max }
    }

    pub fn cube(min: IVec3, max: IVec3) -> Self {
        Bound::Cube { min, max }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        match self {
            Bound::Rectangle { min, max } => {
                cell.x() >= min.0 && cell.x() <= max.0 && cell.y() >= min.1 && cell.y() <= max.1
            }
            Bound::Cube { min, max } => {
                let v = cell.to_vec3i();
                v.x >= min.x && v.x <= max.x && v.y >= min.y && v.y <= max.y && v.z >= min.z && v.z <= max.z
            }
            Bound::HexParallelogram { min, max } => {
                cell.x() >= min.0 && cell.x() <= max.0 && cell.y() >= min.1 && cell.y() <= max.1
            }
            Bound::TriangleParallelogram { min, max } => {
                cell.x() >= min.0 && cell.x() <= max.0 && cell.y() >= min.1 && cell.y() <= max.1
            }
            Bound::Mask(mask) => mask.contains(cell),
            Bound::Aabb(aabb) => aabb.contains(cell.to_vec3i().as_vec3()),
        }
    }

    /// Total cell count. `0` for an empty-but-valid range.
    pub fn count(&self) -> usize {
        match self {
            Bound::Rectangle { min, max } | Bound::HexParallelogram { min, max } | Bound::TriangleParallelogram { min, max } => {
                let w = (max.0 - min.0 + 1).max(0) as usize;
                let h = (max.1 - min.1 + 1).max(0) as usize;
                w * h
            }
            Bound::Cube { min, max } => {
                let w = (max.x - min.x + 1).max(0) as usize;
                let h = (max.y - min.y + 1).max(0) as usize;
                let d = (max.z - min.z + 1).max(0) as usize;
                w * h * d
            }
            Bound::Mask(mask) => mask.len(),
            Bound::Aabb(_) => 0, // continuous region; has no intrinsic cell count without grid context.
        }
    }

    /// Enumerate every cell in canonical order: row-major on `(x, y)` for
    /// `Rectangle`/`Cube`/`HexParallelogram`/`TriangleParallelogram`,
    /// `HashSet` iteration order for `Mask` (spec §4.3 only mandates
    /// canonical order for the coordinate-range variants).
    pub fn enumerate(&self) -> Vec<Cell> {
        match self {
            Bound::Rectangle { min, max } => {
                let mut out = Vec::with_capacity(self.count());
                for y in min.1..=max.1 {
                    for x in min.0..=max.0 {
                        out.push(Cell::new(x, y, 0));
                    }
                }
                out
            }
            Bound::HexParallelogram { min, max } => {
                let mut out = Vec::with_capacity(self.count());
                for r in min.1..=max.1 {
                    for q in min.0..=max.0 {
                        out.push(Cell::new(q, r, 0));
                    }
                }
                out
            }
            Bound::TriangleParallelogram { min, max } => {
                let mut out = Vec::with_capacity(self.count());
                for y in min.1..=max.1 {
                    for x in min.0..=max.0 {
                        out.push(Cell::new(x, y, 0));
                    }
                }
                out
            }
            Bound::Cube { min, max } => {
                let mut out = Vec::with_capacity(self.count());
                for z in min.z..=max.z {
                    for y in min.y..=max.y {
                        for x in min.x..=max.x {
                            out.push(Cell::new(x, y, z));
                        }
                    }
                }
                out
            }
            Bound::Mask(mask) => mask.iter().collect(),
            Bound::Aabb(_) => Vec::new(),
        }
    }

    /// Same-variant intersection clamps extents; cross-variant intersection
    /// degrades to a `Mask` computed from `contains` (spec §9).
    pub fn intersect(&self, other: &Bound) -> Bound {
        match (self, other) {
            (Bound::Rectangle { min: a_min, max: a_max }, Bound::Rectangle { min: b_min, max: b_max }) => {
                Bound::Rectangle {
                    min: (a_min.0.max(b_min.0), a_min.1.max(b_min.1)),
                    max: (a_max.0.min(b_max.0), a_max.1.min(b_max.1)),
                }
            }
            (Bound::Cube { min: a_min, max: a_max }, Bound::Cube { min: b_min, max: b_max }) => Bound::Cube {
                min: a_min.max(*b_min),
                max: a_max.min(*b_max),
            },
            (Bound::HexParallelogram { min: a_min, max: a_max }, Bound::HexParallelogram { min: b_min, max: b_max }) => {
                Bound::HexParallelogram {
                    min: (a_min.0.max(b_min.0), a_min.1.max(b_min.1)),
                    max: (a_max.0.min(b_max.0), a_max.1.min(b_max.1)),
                }
            }
            (Bound::TriangleParallelogram { min: a_min, max: a_max }, Bound::TriangleParallelogram { min: b_min, max: b_max }) => {
                Bound::TriangleParallelogram {
                    min: (a_min.0.max(b_min.0), a_min.1.max(b_min.1)),
                    max: (a_max.0.min(b_max.0), a_max.1.min(b_max.1)),
                }
            }
            _ => Bound::Mask(Mask::new(
                self.enumerate().into_iter().filter(|c| other.contains(*c)),
            )),
        }
    }

    /// Same-variant union expands extents; cross-variant union degrades to
    /// a `Mask` (spec §9).
    pub fn union(&self, other: &Bound) -> Bound {
        match (self, other) {
            (Bound::Rectangle { min: a_min, max: a_max }, Bound::Rectangle { min: b_min, max: b_max }) => {
                Bound::Rectangle {
                    min: (a_min.0.min(b_min.0), a_min.1.min(b_min.1)),
                    max: (a_max.0.max(b_max.0), a_max.1.max(b_max.1)),
                }
            }
            (Bound::Cube { min: a_min, max: a_max }, Bound::Cube { min: b_min, max: b_max }) => Bound::Cube {
                min: a_min.min(*b_min),
                max: a_max.max(*b_max),
            },
            (Bound::HexParallelogram { min: a_min, max: a_max }, Bound::HexParallelogram { min: b_min, max: b_max }) => {
                Bound::HexParallelogram {
                    min: (a_min.0.min(b_min.0), a_min.1.min(b_min.1)),
                    max: (a_max.0.max(b_max.0), a_max.1.max(b_max.1)),
                }
            }
            (Bound::TriangleParallelogram { min: a_min, max: a_max }, Bound::TriangleParallelogram { min: b_min, max: b_max }) => {
                Bound::TriangleParallelogram {
                    min: (a_min.0.min(b_min.0), a_min.1.min(b_min.1)),
                    max: (a_max.0.max(b_max.0), a_max.1.max(b_max.1)),
                }
            }
            _ => {
                let mut mask = Mask::new(self.enumerate());
                for cell in other.enumerate() {
                    mask.insert(cell);
                }
                Bound::Mask(mask)
            }
        }
    }

    /// A best-effort geometric bounding box usable without full grid
    /// context. `Grid` implementations that need an exact AABB union
    /// individual `cell_aabb` results over `enumerate()` instead; this is a
    /// coarse estimate for the coordinate-range variants (spec §4.3: "AABB
    /// requires grid context for non-rectangular variants").
    pub fn aabb(&self, cell_size: f32) -> Aabb {
        match self {
            Bound::Rectangle { min, max } | Bound::HexParallelogram { min, max } | Bound::TriangleParallelogram { min, max } => {
                Aabb::from_corners(
                    Vec3::new(min.0 as f32 * cell_size, min.1 as f32 * cell_size, 0.0),
                    Vec3::new((max.0 + 1) as f32 * cell_size, (max.1 + 1) as f32 * cell_size, 0.0),
                )
            }
            Bound::Cube { min, max } => Aabb::from_corners(
                Vec3::new(min.x as f32, min.y as f32, min.z as f32) * cell_size,
                Vec3::new((max.x + 1) as f32, (max.y + 1) as f32, (max.z + 1) as f32) * cell_size,
            ),
            Bound::Mask(mask) => {
                let points: Vec<Vec3> = mask
                    .iter()
                    .map(|c| c.to_vec3i().as_vec3() * cell_size)
                    .collect();
                Aabb::from_points(&points).unwrap_or(Aabb::ZERO)
            }
            Bound::Aabb(aabb) => *aabb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_count_and_enumerate_agree() {
        let b = Bound::rectangle((0, 0), (2, 1));
        assert_eq!(b.count(), 6);
        assert_eq!(b.enumerate().len(), 6);
    }

    #[test]
    fn rectangle_intersect_clamps_extents() {
        let a = Bound::rectangle((0, 0), (5, 5));
        let b = Bound::rectangle((3, 3), (8, 8));
        let i = a.intersect(&b);
        assert_eq!(i, Bound::rectangle((3, 3), (5, 5)));
    }

    #[test]
    fn cross_variant_intersect_degrades_to_mask() {
        let rect = Bound::rectangle((0, 0), (3, 3));
        let mask = Bound::Mask(Mask::new([Cell::new(1, 1, 0), Cell::new(5, 5, 0)]));
        let result = rect.intersect(&mask);
        match result {
            Bound::Mask(m) => {
                assert!(m.contains(Cell::new(1, 1, 0)));
                assert_eq!(m.len(), 1);
            }
            _ => panic!("expected Mask"),
        }
    }

    #[test]
    fn mask_hash_is_order_independent() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let a = Mask::new([Cell::new(0, 0, 0), Cell::new(1, 0, 0)]);
        let b = Mask::new([Cell::new(1, 0, 0), Cell::new(0, 0, 0)]);
        let hash_of = |m: &Mask| {
            let mut h = DefaultHasher::new();
            m.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn empty_rectangle_is_valid_and_empty() {
        let b = Bound::rectangle((5, 5), (4, 4));
        assert_eq!(b.count(), 0);
        assert!(b.enumerate().is_empty());
    }
}
