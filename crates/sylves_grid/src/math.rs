//! Geometric primitives shared by every grid topology (spec component C1).
//!
//! These are thin, total, pure value types built directly on
//! `glam::Vec2`/`Vec3`/`Mat4` rather than a hand-rolled vector algebra.
//! `Aabb` and `Trs` have no `glam` equivalent, so they are defined here.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use glam::{IVec3, Mat4, Quat, Vec2, Vec3, Vec4};

/// Absolute epsilon used by floating-point comparisons in this crate's test
/// suite, per spec §4.1.
pub const EPSILON: f32 = 1e-6;

/// Below this determinant magnitude, [`Mat4`] inversion is considered
/// singular (spec §4.1).
pub const SINGULAR_DETERMINANT_THRESHOLD: f64 = 1e-12;

/// An integer triple, used as the coordinate representation for every
/// topology's [`crate::cell::Cell`]. A thin alias over `glam::IVec3` so the
/// rest of the crate gets vector arithmetic (`+`, `-`, component swizzles)
/// for free.
pub type Vec3i = IVec3;

/// Failure mode for [`checked_inverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("matrix is singular (determinant magnitude below {SINGULAR_DETERMINANT_THRESHOLD:e})")]
pub struct SingularMatrix;

/// Invert a [`Mat4`], failing explicitly instead of silently producing a
/// matrix full of `NaN`/`inf` the way `Mat4::inverse` does on a singular
/// input.
pub fn checked_inverse(m: Mat4) -> Result<Mat4, SingularMatrix> {
    if (m.determinant() as f64).abs() < SINGULAR_DETERMINANT_THRESHOLD {
        return Err(SingularMatrix);
    }
    Ok(m.inverse())
}

/// Normalize `v`, returning the zero vector instead of `NaN` when `v` is
/// itself the zero vector (spec §4.1).
pub fn safe_normalize2(v: Vec2) -> Vec2 {
    if v.length_squared() <= f32::EPSILON {
        Vec2::ZERO
    } else {
        v.normalize()
    }
}

/// See [`safe_normalize2`].
pub fn safe_normalize3(v: Vec3) -> Vec3 {
    if v.length_squared() <= f32::EPSILON {
        Vec3::ZERO
    } else {
        v.normalize()
    }
}

//////////////////////////////////////////////////////////////////////////////

/// An axis-aligned bounding box with inclusive `min`/`max` corners.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// The degenerate `Aabb` consisting of just the origin point.
    pub const ZERO: Aabb = Aabb {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    /// Construct an `Aabb` from two corners, ordering them so that
    /// `min <= max` componentwise regardless of the order given.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Aabb {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Aabb {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec3) -> bool {
        (self.min.cmple(point) & point.cmple(self.max)).all()
    }

    /// Does this box overlap `other`? Touching edges/faces count as overlap.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The smallest `Aabb` containing every point in `points`. Returns
    /// `None` for an empty slice.
    pub fn from_points(points: &[Vec3]) -> Option<Aabb> {
        let mut iter = points.iter().copied();
        let first = iter.next()?;
        Some(iter.fold(Aabb::from_corners(first, first), |acc, p| {
            acc.union(&Aabb::from_corners(p, p))
        }))
    }
}

//////////////////////////////////////////////////////////////////////////////

/// A translation + rotation + non-uniform scale transform, used by the
/// transform modifier grid (spec §3 modifier wrappers).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trs {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Trs {
    fn default() -> Self {
        Trs::IDENTITY
    }
}

impl Trs {
    pub const IDENTITY: Trs = Trs {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Trs {
            translation,
            rotation,
            scale,
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * p)
    }

    /// The inverse transform, failing if `scale` has a zero component (and
    /// is therefore non-invertible).
    pub fn inverse(&self) -> Result<Trs, SingularMatrix> {
        if self.scale.min_element().abs() <= f32::EPSILON {
            return Err(SingularMatrix);
        }
        let inv_scale = 1.0 / self.scale;
        let inv_rotation = self.rotation.inverse();
        let inv_translation = -(inv_rotation * (inv_scale * self.translation));
        Ok(Trs {
            translation: inv_translation,
            rotation: inv_rotation,
            scale: inv_scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_contains_is_inclusive_at_corners() {
        let b = Aabb::from_corners(Vec3::ZERO, Vec3::splat(2.0));
        assert!(b.contains(Vec3::ZERO));
        assert!(b.contains(Vec3::splat(2.0)));
        assert!(!b.contains(Vec3::splat(2.0 + 1e-4)));
    }

    #[test]
    fn aabb_intersects_touching_boxes() {
        let a = Aabb::from_corners(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_corners(Vec3::ONE, Vec3::splat(2.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn safe_normalize_of_zero_is_zero() {
        assert_eq!(safe_normalize3(Vec3::ZERO), Vec3::ZERO);
        assert_eq!(safe_normalize2(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn checked_inverse_rejects_singular_matrix() {
        let singular = Mat4::from_cols(Vec4::ZERO, Vec4::Y, Vec4::Z, Vec4::W);
        assert_eq!(checked_inverse(singular), Err(SingularMatrix));
    }

    #[test]
    fn trs_round_trips_through_inverse() {
        let trs = Trs::new(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, Vec3::splat(2.0));
        let p = Vec3::new(4.0, -1.0, 0.5);
        let transformed = trs.transform_point(p);
        let back = trs.inverse().unwrap().transform_point(transformed);
        assert!((back - p).length() < EPSILON);
    }
}
