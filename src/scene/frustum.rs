//! Planes and View Frustums
//!
//! # Convention
//!
//! All matrices are `glam` column-major matrices applied to column vectors
//! (`clip = projection * view * p`). Projections are right-handed and map
//! depth to `[0, 1]` (`Mat4::perspective_rh` / `Mat4::orthographic_rh`).
//!
//! Planes are extracted from the rows of `projection * view` using the
//! Gribb-Hartmann combinations:
//!
//! | Slot   | Row combination |
//! |--------|-----------------|
//! | Right  | `r3 - r0`       |
//! | Left   | `r3 + r0`       |
//! | Bottom | `r3 + r1`       |
//! | Top    | `r3 - r1`       |
//! | Far    | `r3 - r2`       |
//! | Near   | `r2`            |
//!
//! A point is inside a plane when `dot(normal, p) + d >= 0`.

use std::ops::Neg;

use glam::{Mat4, Vec3, Vec4};

use crate::resources::geometry::BoundingBox;

/// Normals shorter than this are treated as degenerate.
const DEGENERATE_NORMAL_EPSILON: f32 = 1e-6;

// ============================================================================
// Plane
// ============================================================================

/// Which side of a [`Plane`] a point or box lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Exactly on the plane.
    NoSide,
    /// The half-space the normal points into.
    Positive,
    Negative,
    /// Box straddles the plane.
    Both,
}

/// The plane `dot(normal, p) + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    /// Plane that every point is inside of. Stands in for degenerate planes.
    pub const ALWAYS_INSIDE: Self = Self {
        normal: Vec3::ZERO,
        d: 1.0,
    };

    #[inline]
    #[must_use]
    pub const fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    /// `(A, B, C, D)` packed as `xyz = normal`, `w = d`.
    #[inline]
    #[must_use]
    pub fn from_vec4(v: Vec4) -> Self {
        Self {
            normal: v.truncate(),
            d: v.w,
        }
    }

    #[must_use]
    pub fn from_normal_point(normal: Vec3, point: Vec3) -> Self {
        Self {
            normal,
            d: -normal.dot(point),
        }
    }

    /// Plane through three points, counter-clockwise winding facing the normal.
    #[must_use]
    pub fn from_points(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
        Self::from_normal_point(normal, p0)
    }

    #[inline]
    #[must_use]
    pub fn to_vec4(self) -> Vec4 {
        self.normal.extend(self.d)
    }

    /// Scales the plane so the normal has unit length and returns the previous length.
    ///
    /// Zero-length normals are left untouched.
    pub fn normalize(&mut self) -> f32 {
        let length = self.normal.length();
        if length > DEGENERATE_NORMAL_EPSILON {
            let inv = 1.0 / length;
            self.normal *= inv;
            self.d *= inv;
        }
        length
    }

    /// Signed pseudo-distance. True distance only for unit normals.
    #[inline]
    #[must_use]
    pub fn distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }

    #[must_use]
    pub fn side(&self, point: Vec3) -> PlaneSide {
        let distance = self.distance(point);
        if distance < 0.0 {
            PlaneSide::Negative
        } else if distance > 0.0 {
            PlaneSide::Positive
        } else {
            PlaneSide::NoSide
        }
    }

    /// Side of a box given as center/half-size. [`PlaneSide::Both`] means the box
    /// intersects the plane.
    #[must_use]
    pub fn side_box(&self, center: Vec3, half_size: Vec3) -> PlaneSide {
        let distance = self.distance(center);
        let max_abs_distance = self.projected_radius(half_size);

        if distance < -max_abs_distance {
            PlaneSide::Negative
        } else if distance > max_abs_distance {
            PlaneSide::Positive
        } else {
            PlaneSide::Both
        }
    }

    /// Largest distance from the box center to any of its corners, measured along the normal.
    #[inline]
    #[must_use]
    pub fn projected_radius(&self, half_size: Vec3) -> f32 {
        self.normal.abs().dot(half_size.abs())
    }

    /// Component of `v` lying in the plane.
    #[must_use]
    pub fn project_vector(&self, v: Vec3) -> Vec3 {
        v - self.normal * self.normal.dot(v)
    }
}

impl Neg for Plane {
    type Output = Plane;

    fn neg(self) -> Plane {
        Plane {
            normal: -self.normal,
            d: -self.d,
        }
    }
}

// ============================================================================
// Frustum
// ============================================================================

/// Fixed slot order of the six frustum planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrustumSide {
    Right = 0,
    Left = 1,
    Bottom = 2,
    Top = 3,
    Far = 4,
    Near = 5,
}

impl FrustumSide {
    pub const ALL: [FrustumSide; 6] = [
        FrustumSide::Right,
        FrustumSide::Left,
        FrustumSide::Bottom,
        FrustumSide::Top,
        FrustumSide::Far,
        FrustumSide::Near,
    ];
}

/// Six normalized planes bounding what a camera or light view can see.
///
/// Always derived from `projection * view`. There is no incremental update:
/// call [`Frustum::extract_planes`] whenever either matrix changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    planes: [Plane; 6],
}

impl Default for Frustum {
    /// A frustum that contains everything.
    fn default() -> Self {
        Self {
            planes: [Plane::ALWAYS_INSIDE; 6],
        }
    }
}

impl Frustum {
    /// Extracts the planes of a combined clip matrix (`projection * view`).
    #[must_use]
    pub fn from_matrix(clip: Mat4) -> Self {
        let rows = [clip.row(0), clip.row(1), clip.row(2), clip.row(3)];

        let mut planes = [
            Plane::from_vec4(rows[3] - rows[0]), // Right
            Plane::from_vec4(rows[3] + rows[0]), // Left
            Plane::from_vec4(rows[3] + rows[1]), // Bottom
            Plane::from_vec4(rows[3] - rows[1]), // Top
            Plane::from_vec4(rows[3] - rows[2]), // Far
            Plane::from_vec4(rows[2]),           // Near ([0, 1] depth)
        ];

        for (slot, plane) in planes.iter_mut().enumerate() {
            let length = plane.normalize();
            if length <= DEGENERATE_NORMAL_EPSILON || !length.is_finite() {
                log::debug!("Degenerate frustum plane {slot} (|n| = {length}), disabling it");
                *plane = Plane::ALWAYS_INSIDE;
            }
        }

        Self { planes }
    }

    #[must_use]
    pub fn from_view_projection(view: Mat4, projection: Mat4) -> Self {
        Self::from_matrix(projection * view)
    }

    /// Rebuilds the planes in place from a view and projection matrix.
    pub fn extract_planes(&mut self, view: Mat4, projection: Mat4) {
        *self = Self::from_view_projection(view, projection);
    }

    #[inline]
    #[must_use]
    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    #[inline]
    #[must_use]
    pub fn plane(&self, side: FrustumSide) -> &Plane {
        &self.planes[side as usize]
    }

    /// `true` iff the point lies inside (or on) all six planes.
    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.distance(point) >= 0.0)
    }

    /// Conservative sphere test: may report spheres near frustum corners as visible.
    #[must_use]
    pub fn contains_sphere(&self, center: Vec3, radius: f32) -> bool {
        for plane in &self.planes {
            if plane.distance(center) < -radius {
                return false;
            }
        }
        true
    }

    /// Box given as center/half-size. Rejected only if fully outside some plane.
    #[must_use]
    pub fn contains_box(&self, center: Vec3, half_size: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance(center) >= -plane.projected_radius(half_size))
    }

    /// Null boxes are never visible, infinite boxes always are.
    #[must_use]
    pub fn contains_aabb(&self, bounds: &BoundingBox) -> bool {
        if bounds.is_null() {
            return false;
        }
        if bounds.is_infinite() {
            return true;
        }
        self.contains_box(bounds.center(), bounds.half_size())
    }

    /// Cube of half-extent `size` centered at `(x, y, z)`.
    ///
    /// Rejected only when all eight corners are outside the same plane.
    #[must_use]
    pub fn contains_cube(&self, x: f32, y: f32, z: f32, size: f32) -> bool {
        let center = Vec3::new(x, y, z);
        let corners = [
            Vec3::new(-size, -size, -size),
            Vec3::new(size, -size, -size),
            Vec3::new(-size, size, -size),
            Vec3::new(size, size, -size),
            Vec3::new(-size, -size, size),
            Vec3::new(size, -size, size),
            Vec3::new(-size, size, size),
            Vec3::new(size, size, size),
        ];

        self.planes.iter().all(|plane| {
            corners
                .iter()
                .any(|offset| plane.distance(center + *offset) >= 0.0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_clip_matrix_yields_finite_planes() {
        let frustum = Frustum::from_matrix(Mat4::ZERO);
        for plane in frustum.planes() {
            assert!(plane.normal.is_finite());
            assert!(plane.d.is_finite());
        }
        assert!(frustum.contains_point(Vec3::new(1.0e6, -3.0, 7.0)));
    }

    #[test]
    fn plane_side_box_straddles() {
        let plane = Plane::from_normal_point(Vec3::Y, Vec3::ZERO);
        assert_eq!(plane.side_box(Vec3::ZERO, Vec3::ONE), PlaneSide::Both);
        assert_eq!(plane.side_box(Vec3::new(0.0, 5.0, 0.0), Vec3::ONE), PlaneSide::Positive);
        assert_eq!((-plane).side(Vec3::new(0.0, 5.0, 0.0)), PlaneSide::Negative);
    }

    #[test]
    fn normalize_keeps_zero_normal() {
        let mut plane = Plane::new(Vec3::ZERO, 3.0);
        assert_eq!(plane.normalize(), 0.0);
        assert_eq!(plane.d, 3.0);
    }
}
