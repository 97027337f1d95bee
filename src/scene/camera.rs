use glam::{Affine3A, Mat4, Vec3};
use std::borrow::Cow;
use uuid::Uuid;

use crate::resources::geometry::BoundingBox;
use crate::scene::layers::CullingMask;

pub use crate::scene::frustum::{Frustum, FrustumSide, Plane, PlaneSide};

/// Vertical FOV limits in degrees.
pub const MIN_FOV_DEGREES: f32 = 1.0;
pub const MAX_FOV_DEGREES: f32 = 179.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionType {
    #[default]
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub uuid: Uuid,
    pub name: Cow<'static, str>,
    pub enabled: bool,
    pub culling_mask: CullingMask,

    // === Projection ===
    projection_type: ProjectionType,
    /// Vertical FOV in radians.
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    ortho_size: f32,
    flip_h: bool,
    flip_v: bool,

    // Cached matrices, re-derived on every change
    world_matrix: Affine3A,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    view_projection_matrix: Mat4,
    frustum: Frustum,
}

impl Camera {
    /// `fov` is the vertical field of view in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            uuid: Uuid::new_v4(),
            name: Cow::Borrowed("Camera"),
            enabled: true,
            culling_mask: CullingMask::ALL,

            projection_type: ProjectionType::Perspective,
            fov: fov.clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES).to_radians(),
            aspect,
            near,
            far,
            ortho_size: 10.0,
            flip_h: false,
            flip_v: false,

            world_matrix: Affine3A::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
            frustum: Frustum::default(),
        };

        cam.update_projection_matrix();
        cam
    }

    /// `size` is the half height of the view volume.
    #[must_use]
    pub fn new_orthographic(size: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self::new_perspective(60.0, aspect, near, far);
        cam.projection_type = ProjectionType::Orthographic;
        cam.ortho_size = size;
        cam.update_projection_matrix();
        cam
    }

    pub fn update_projection_matrix(&mut self) {
        let mut projection = match self.projection_type {
            ProjectionType::Perspective => {
                Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
            }
            ProjectionType::Orthographic => {
                let w = self.ortho_size * self.aspect;
                let h = self.ortho_size;
                Mat4::orthographic_rh(-w, w, -h, h, self.near, self.far)
            }
        };

        if self.flip_h || self.flip_v {
            let flip = Vec3::new(
                if self.flip_h { -1.0 } else { 1.0 },
                if self.flip_v { -1.0 } else { 1.0 },
                1.0,
            );
            projection *= Mat4::from_scale(flip);
        }

        self.projection_matrix = projection;
        self.refresh_view_projection();
    }

    pub fn update_view_projection(&mut self, world_transform: &Affine3A) {
        self.world_matrix = *world_transform;
        self.view_matrix = Mat4::from(*world_transform).inverse();
        self.refresh_view_projection();
    }

    fn refresh_view_projection(&mut self) {
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
        self.frustum = Frustum::from_matrix(self.view_projection_matrix);
    }

    // === Projection parameters ===

    #[inline]
    #[must_use]
    pub fn projection_type(&self) -> ProjectionType {
        self.projection_type
    }

    pub fn set_projection_type(&mut self, projection_type: ProjectionType) {
        self.projection_type = projection_type;
        self.update_projection_matrix();
    }

    /// Vertical FOV in degrees.
    #[must_use]
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }

    /// Clamped to `[MIN_FOV_DEGREES, MAX_FOV_DEGREES]`.
    pub fn set_fov_degrees(&mut self, fov: f32) {
        self.fov = fov.clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES).to_radians();
        self.update_projection_matrix();
    }

    #[inline]
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    #[inline]
    #[must_use]
    pub fn near(&self) -> f32 {
        self.near
    }

    #[inline]
    #[must_use]
    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
        self.update_projection_matrix();
    }

    pub fn set_ortho_size(&mut self, size: f32) {
        self.ortho_size = size;
        self.update_projection_matrix();
    }

    pub fn set_flip(&mut self, horizontal: bool, vertical: bool) {
        self.flip_h = horizontal;
        self.flip_v = vertical;
        self.update_projection_matrix();
    }

    /// `(tan(fovy / 2) * aspect, tan(fovy / 2))`: view-space half extents at unit distance.
    #[must_use]
    pub fn projection_half_extents(&self) -> (f32, f32) {
        let half_height = (self.fov * 0.5).tan();
        (half_height * self.aspect, half_height)
    }

    // === Cached state ===

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.view_projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.world_matrix.translation)
    }

    /// World-space viewing direction (`-Z` of the camera transform).
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (-Vec3::from(self.world_matrix.matrix3.z_axis)).normalize_or(Vec3::NEG_Z)
    }

    /// Sphere test of `bounds` against this camera's frustum, radius scaled by `bias`.
    #[must_use]
    pub fn is_visible(&self, bounds: &BoundingBox, bias: f32) -> bool {
        if bounds.is_null() {
            return false;
        }
        if bounds.is_infinite() {
            return true;
        }
        self.frustum
            .contains_sphere(bounds.center(), bounds.radius() * bias)
    }
}
