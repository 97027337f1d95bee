//! Bounding Volumes
//!
//! World-space bounds owned by renderables. The visibility subsystem only
//! reads them; the scene/transform system rewrites them between frames.

use glam::{Affine3A, Vec3};
use serde::{Deserialize, Serialize};

/// State of a [`BoundingBox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Extent {
    /// Empty box. Never visible, never intersects anything.
    #[default]
    Null,
    /// Regular box described by `min`/`max`.
    Finite,
    /// Unbounded box. Always visible, intersects everything.
    Infinite,
}

/// Axis-aligned bounding box with null/infinite sentinel states.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
    pub extent: Extent,
}

impl BoundingBox {
    pub const NULL: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
        extent: Extent::Null,
    };

    pub const INFINITE: Self = Self {
        min: Vec3::NEG_INFINITY,
        max: Vec3::INFINITY,
        extent: Extent::Infinite,
    };

    /// Creates a finite box. `min` and `max` are reordered per axis if needed.
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            extent: Extent::Finite,
        }
    }

    #[must_use]
    pub fn from_center_half_size(center: Vec3, half_size: Vec3) -> Self {
        let half_size = half_size.abs();
        Self::new(center - half_size, center + half_size)
    }

    /// Smallest finite box enclosing all `points`. Empty input yields [`Self::NULL`].
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Self {
        points
            .iter()
            .fold(Self::NULL, |bounds, p| bounds.merge_point(*p))
    }

    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.extent == Extent::Null
    }

    #[inline]
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        self.extent == Extent::Infinite
    }

    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.extent == Extent::Finite
    }

    pub fn center(&self) -> Vec3 {
        match self.extent {
            Extent::Finite => (self.min + self.max) * 0.5,
            Extent::Null | Extent::Infinite => Vec3::ZERO,
        }
    }

    pub fn size(&self) -> Vec3 {
        match self.extent {
            Extent::Finite => self.max - self.min,
            Extent::Null => Vec3::ZERO,
            Extent::Infinite => Vec3::INFINITY,
        }
    }

    pub fn half_size(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Radius of the sphere centered on [`Self::center`] that encloses the box.
    pub fn radius(&self) -> f32 {
        self.half_size().length()
    }

    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        match (self.extent, other.extent) {
            (Extent::Infinite, _) | (_, Extent::Infinite) => Self::INFINITE,
            (Extent::Null, _) => *other,
            (_, Extent::Null) => *self,
            (Extent::Finite, Extent::Finite) => BoundingBox {
                min: self.min.min(other.min),
                max: self.max.max(other.max),
                extent: Extent::Finite,
            },
        }
    }

    #[must_use]
    pub fn merge_point(&self, point: Vec3) -> BoundingBox {
        match self.extent {
            Extent::Null => Self::new(point, point),
            Extent::Finite => BoundingBox {
                min: self.min.min(point),
                max: self.max.max(point),
                extent: Extent::Finite,
            },
            Extent::Infinite => *self,
        }
    }

    /// Transforms the box and returns the axis-aligned box around the result.
    #[must_use]
    pub fn transform(&self, matrix: &Affine3A) -> Self {
        if !self.is_finite() {
            return *self;
        }

        let center = matrix.transform_point3(self.center());
        let half = self.half_size();
        let m = matrix.matrix3;
        let half_size = m.x_axis.abs() * half.x + m.y_axis.abs() * half.y + m.z_axis.abs() * half.z;

        Self::from_center_half_size(center, Vec3::from(half_size))
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        if self.is_infinite() || other.is_infinite() {
            return true;
        }

        self.max.cmpge(other.min).all() && self.min.cmple(other.max).all()
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        match self.extent {
            Extent::Null => false,
            Extent::Infinite => true,
            Extent::Finite => point.cmpge(self.min).all() && point.cmple(self.max).all(),
        }
    }

    /// Sphere/box overlap using Arvo's closest-point distance.
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        match self.extent {
            Extent::Null => false,
            Extent::Infinite => true,
            Extent::Finite => {
                let closest = center.clamp(self.min, self.max);
                closest.distance_squared(center) <= radius * radius
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl From<&BoundingBox> for BoundingSphere {
    fn from(bounds: &BoundingBox) -> Self {
        Self {
            center: bounds.center(),
            radius: bounds.radius(),
        }
    }
}
