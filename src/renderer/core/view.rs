//! Render View Abstraction
//!
//! # "Everything is a View" Architecture
//!
//! Every viewpoint the culler evaluates is identified by a [`ViewTarget`]:
//!
//! - **Camera**: 1 view per enabled camera
//! - **Spot Light Shadow**: 1 view
//! - **Directional Light (CSM)**: N views (one per cascade, N <= 4)
//! - **Point Light**: 4 wide-FOV views packed into one atlas
//!
//! Shadow views share one record shape, [`ShadowView`], stored in a
//! fixed-capacity [`LightShadowViews`] per light.

use glam::{Mat4, Vec2, Vec4};

use crate::renderer::graph::shadow_utils::MAX_CASCADES;
use crate::scene::camera::Frustum;
use crate::scene::{CameraKey, LightKey};

/// Identifies what a visibility set is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewTarget {
    /// A camera's own view.
    Camera(CameraKey),
    /// A shadow map view for a specific light and sub-view.
    ///
    /// - Directional lights: `layer_index` = cascade index (0..N).
    /// - Point lights: `layer_index` = atlas quadrant view (0..4).
    /// - Spot lights: `layer_index` = 0.
    ShadowLight { light: LightKey, layer_index: u32 },
}

// ============================================================================
// Atlas Slots
// ============================================================================

/// Viewport rectangle of one sub-view inside a square shadow map, in pixels
/// with the origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShadowAtlasSlot {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ShadowAtlasSlot {
    /// The whole map.
    #[must_use]
    pub const fn full(map_size: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width: map_size,
            height: map_size,
        }
    }

    /// Quadrant `index` in row-major order from the top-left:
    /// `0` top-left, `1` top-right, `2` bottom-left, `3` bottom-right.
    #[must_use]
    pub const fn quadrant(map_size: u32, index: usize) -> Self {
        let half = map_size / 2;
        Self {
            x: (index as u32 % 2) * half,
            y: (index as u32 / 2) * half,
            width: half,
            height: half,
        }
    }

    /// `(u_min, v_min, u_max, v_max)` with a top-left texture origin.
    #[must_use]
    pub fn uv_rect(&self, map_size: u32) -> Vec4 {
        let inv = 1.0 / map_size.max(1) as f32;
        let min = Vec2::new(self.x as f32, self.y as f32) * inv;
        let max = min + Vec2::new(self.width as f32, self.height as f32) * inv;
        Vec4::new(min.x, min.y, max.x, max.y)
    }
}

// ============================================================================
// Shadow Views
// ============================================================================

/// One light sub-view: a directional cascade, a point quadrant or the spot view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowView {
    /// View-space split range. Zero for point and spot views.
    pub split_near: f32,
    pub split_far: f32,

    pub view_matrix: Mat4,
    pub projection_matrix: Mat4,

    /// World space to shadow-map texture coordinates plus depth.
    pub shadow_matrix: Mat4,

    /// Extracted from `projection_matrix * view_matrix`.
    pub frustum: Frustum,

    pub slot: ShadowAtlasSlot,
}

impl Default for ShadowView {
    fn default() -> Self {
        Self {
            split_near: 0.0,
            split_far: 0.0,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            shadow_matrix: Mat4::IDENTITY,
            frustum: Frustum::default(),
            slot: ShadowAtlasSlot::default(),
        }
    }
}

impl ShadowView {
    #[inline]
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }
}

/// Up to four shadow views of one light, rebuilt in place every frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LightShadowViews {
    views: [ShadowView; MAX_CASCADES as usize],
    count: usize,
    /// Edge length of the square shadow map the views render into.
    pub map_size: u32,
}

impl LightShadowViews {
    #[must_use]
    pub fn new(map_size: u32) -> Self {
        Self {
            map_size,
            ..Self::default()
        }
    }

    /// Appends a view. Views beyond the capacity are dropped.
    pub fn push(&mut self, view: ShadowView) {
        if self.count < self.views.len() {
            self.views[self.count] = view;
            self.count += 1;
        } else {
            log::warn!("LightShadowViews full, dropping extra shadow view");
        }
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    #[must_use]
    pub fn views(&self) -> &[ShadowView] {
        &self.views[..self.count]
    }

    /// Shadow matrices for all four slots; unused slots are identity.
    #[must_use]
    pub fn shadow_matrices(&self) -> [Mat4; MAX_CASCADES as usize] {
        let mut matrices = [Mat4::IDENTITY; MAX_CASCADES as usize];
        for (dst, view) in matrices.iter_mut().zip(self.views()) {
            *dst = view.shadow_matrix;
        }
        matrices
    }
}
