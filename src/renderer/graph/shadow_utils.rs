//! Shadow Utilities
//!
//! Pure math functions for shadow mapping, kept out of the cull pass
//! for reuse and testability.
//!
//! # Provided Functions
//!
//! - Cascade split computation (Practical Split Scheme, with overlap)
//! - Frustum corner extraction in world space
//! - Light-space bounds and texel-stable crop fitting for CSM cascades
//! - Sampling bias matrices for the configured texture convention
//! - High-level view builders for directional, point and spot lights
//!
//! All matrices follow the crate convention: column-major, column vectors,
//! right-handed view space looking down `-Z`, clip depth produced by the
//! `glam` `*_rh` projections.

use glam::{EulerRot, Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::renderer::core::view::{LightShadowViews, ShadowAtlasSlot, ShadowView};
use crate::renderer::settings::{DepthRange, SamplingConvention, ShadowSettings, TexCoordOrigin};
use crate::scene::camera::{Camera, Frustum};
use crate::scene::light::{Light, LightKind};

/// Maximum cascade count per directional light.
pub const MAX_CASCADES: u32 = 4;

/// Multiplier applied to each cascade's far bound so neighbouring cascades overlap.
pub const CASCADE_OVERLAP: f32 = 1.005;

/// Half depth of the base orthographic volume in light space.
pub const DIRECTIONAL_DEPTH_EXTENT: f32 = 2500.0;

/// Step used to quantize the cascade crop scale.
pub const CASCADE_SCALE_QUANTIZER: f32 = 64.0;

/// Clip range for point and spot light projections.
pub const LOCAL_LIGHT_NEAR: f32 = 0.25;
pub const LOCAL_LIGHT_FAR: f32 = 250.0;

pub const SPOT_FOV_DEGREES: f32 = 130.0;

/// Smallest light-space extent a cascade crop is computed for.
const MIN_CROP_EXTENT: f32 = 1e-4;
const MIN_SPLIT_NEAR: f32 = 1e-4;
const MIN_SPLIT_RANGE: f32 = 1e-3;

// ============================================================================
// Cascade Split Computation
// ============================================================================

/// Near/far view-space distances for up to [`MAX_CASCADES`] cascades.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CascadeSplits {
    ranges: [(f32, f32); MAX_CASCADES as usize],
    count: usize,
}

impl CascadeSplits {
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

    /// `(split_near, split_far)` pairs, nearest cascade first.
    #[inline]
    #[must_use]
    pub fn ranges(&self) -> &[(f32, f32)] {
        &self.ranges[..self.count]
    }

    /// Flattened `[near0, far0, near1, far1, ...]`.
    #[must_use]
    pub fn to_interleaved(&self) -> [f32; 2 * MAX_CASCADES as usize] {
        let mut out = [0.0; 2 * MAX_CASCADES as usize];
        for (i, (near, far)) in self.ranges().iter().enumerate() {
            out[2 * i] = *near;
            out[2 * i + 1] = *far;
        }
        out
    }
}

/// Computes cascade split distances using the Practical Split Scheme.
///
/// `lambda` blends between uniform (`0.0`) and logarithmic (`1.0`) distribution.
/// The first near and the last far are pinned to `near` and `far`. Every
/// other far is pushed [`CASCADE_OVERLAP`] past the next cascade's near.
///
/// `cascade_count` is clamped to `1..=MAX_CASCADES`; a non-positive `near`
/// or an empty range is widened so that no cascade is ever inverted.
#[must_use]
pub fn compute_cascade_splits(cascade_count: u32, near: f32, far: f32, lambda: f32) -> CascadeSplits {
    let n = cascade_count.clamp(1, MAX_CASCADES) as usize;
    let near = near.max(MIN_SPLIT_NEAR);
    let far = if far - near < MIN_SPLIT_RANGE {
        log::debug!("Degenerate cascade range {near}..{far}, widening");
        near + MIN_SPLIT_RANGE
    } else {
        far
    };
    let lambda = lambda.clamp(0.0, 1.0);

    let mut splits = CascadeSplits {
        count: n,
        ..Default::default()
    };
    splits.ranges[0].0 = near;

    for i in 1..n {
        let p = i as f32 / n as f32;
        let log_split = near * (far / near).powf(p);
        let uni_split = near + (far - near) * p;
        let split = lambda * log_split + (1.0 - lambda) * uni_split;

        splits.ranges[i].0 = split;
        splits.ranges[i - 1].1 = (split * CASCADE_OVERLAP).min(far);
    }

    // Ensure the last split reaches the far plane
    splits.ranges[n - 1].1 = far;

    splits
}

// ============================================================================
// Frustum Corners in World Space
// ============================================================================

/// Computes the 8 corners of a view-space frustum slab in world space.
///
/// `half_width` / `half_height` are the view-space half extents at unit
/// distance (`tan(fovy / 2) * aspect`, `tan(fovy / 2)`). Corners are ordered
/// top-left, top-right, bottom-right, bottom-left on the near face, then the
/// same on the far face.
#[must_use]
pub fn compute_frustum_corners_world(
    slice_near: f32,
    slice_far: f32,
    half_width: f32,
    half_height: f32,
    inverse_view: &Mat4,
) -> [Vec3; 8] {
    let mut corners = [Vec3::ZERO; 8];

    for (face, distance) in [slice_near, slice_far].into_iter().enumerate() {
        let w = half_width * distance;
        let h = half_height * distance;
        // Corners in view space (RH: -Z is forward)
        let face_corners = [
            Vec3::new(-w, h, -distance),
            Vec3::new(w, h, -distance),
            Vec3::new(w, -h, -distance),
            Vec3::new(-w, -h, -distance),
        ];
        for (i, c) in face_corners.into_iter().enumerate() {
            corners[face * 4 + i] = inverse_view.transform_point3(c);
        }
    }

    corners
}

/// [`compute_frustum_corners_world`] using a camera's projection and transform.
#[must_use]
pub fn camera_frustum_corners_world(camera: &Camera, slice_near: f32, slice_far: f32) -> [Vec3; 8] {
    let (half_width, half_height) = camera.projection_half_extents();
    let inverse_view = Mat4::from(*camera.world_matrix());
    compute_frustum_corners_world(slice_near, slice_far, half_width, half_height, &inverse_view)
}

// ============================================================================
// CSM: Crop Fitting
// ============================================================================

/// Light-space axis-aligned bounds of a set of world-space points.
#[must_use]
pub fn light_space_bounds(light_view: &Mat4, corners: &[Vec3]) -> (Vec3, Vec3) {
    corners.iter().fold(
        (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
        |(min, max), c| {
            let ls = light_view.transform_point3(*c);
            (min.min(ls), max.max(ls))
        },
    )
}

/// Scale and offset that tighten the base orthographic projection around a cascade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeCrop {
    pub scale: Vec2,
    pub offset: Vec2,
}

/// The fixed symmetric orthographic volume every cascade is cropped from.
#[must_use]
pub fn directional_base_projection() -> Mat4 {
    Mat4::orthographic_rh(
        -1.0,
        1.0,
        -1.0,
        1.0,
        -DIRECTIONAL_DEPTH_EXTENT,
        DIRECTIONAL_DEPTH_EXTENT,
    )
}

/// Derives the crop for light-space bounds `min..max`.
///
/// The scale is `2 / extent` per axis, optionally quantized to
/// `CASCADE_SCALE_QUANTIZER / ceil(CASCADE_SCALE_QUANTIZER / scale)`.
/// The offset is always snapped to whole texels of a `map_size` map so the
/// cascade only ever moves in texel increments.
#[must_use]
pub fn compute_cascade_crop(min: Vec3, max: Vec3, map_size: u32, quantize: bool) -> CascadeCrop {
    let base = directional_base_projection();
    let min_ndc = base.project_point3(min);
    let max_ndc = base.project_point3(max);
    let lo = min_ndc.truncate().min(max_ndc.truncate());
    let hi = min_ndc.truncate().max(max_ndc.truncate());

    let extent = hi - lo;
    if extent.min_element() < MIN_CROP_EXTENT {
        log::debug!("Degenerate cascade extent {extent:?}, clamping");
    }
    let mut scale = Vec2::splat(2.0) / extent.max(Vec2::splat(MIN_CROP_EXTENT));

    if quantize {
        scale = Vec2::splat(CASCADE_SCALE_QUANTIZER)
            / (Vec2::splat(CASCADE_SCALE_QUANTIZER) / scale).ceil();
    }

    let mut offset = -0.5 * (hi + lo) * scale;

    let half_map = (map_size.max(1) as f32) * 0.5;
    offset = (offset * half_map).ceil() / half_map;

    CascadeCrop { scale, offset }
}

/// Crop matrix applying `crop` after the base projection.
#[must_use]
pub fn crop_matrix(crop: &CascadeCrop) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(crop.scale.x, 0.0, 0.0, 0.0),
        Vec4::new(0.0, crop.scale.y, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(crop.offset.x, crop.offset.y, 0.0, 1.0),
    )
}

// ============================================================================
// Sampling Bias
// ============================================================================

/// Maps clip space into a square UV region.
///
/// `scale` is the half size of the region in UV units and `center` is its
/// center with a bottom-left UV origin. The Y axis is mirrored for top-left
/// targets; depth is remapped for `[-1, 1]` clip ranges.
#[must_use]
pub fn region_bias_matrix(scale: f32, center: Vec2, convention: SamplingConvention) -> Mat4 {
    let (scale_y, offset_y) = match convention.origin {
        TexCoordOrigin::BottomLeft => (scale, center.y),
        TexCoordOrigin::TopLeft => (-scale, 1.0 - center.y),
    };
    let (scale_z, offset_z) = match convention.depth {
        DepthRange::ZeroToOne => (1.0, 0.0),
        DepthRange::NegativeOneToOne => (0.5, 0.5),
    };

    Mat4::from_cols(
        Vec4::new(scale, 0.0, 0.0, 0.0),
        Vec4::new(0.0, scale_y, 0.0, 0.0),
        Vec4::new(0.0, 0.0, scale_z, 0.0),
        Vec4::new(center.x, offset_y, offset_z, 1.0),
    )
}

/// Maps clip space onto the whole shadow map.
#[must_use]
pub fn sampling_bias_matrix(convention: SamplingConvention) -> Mat4 {
    region_bias_matrix(0.5, Vec2::splat(0.5), convention)
}

// ============================================================================
// Light View Helpers
// ============================================================================

/// `look_at_rh` along `direction` with an up vector that is never parallel to it.
#[must_use]
pub fn safe_look_at(eye: Vec3, direction: Vec3) -> Mat4 {
    let safe_dir = direction.normalize_or(Vec3::NEG_Z);
    let up = if safe_dir.y.abs() > 0.99 {
        Vec3::X
    } else {
        Vec3::Y
    };
    Mat4::look_at_rh(eye, eye + safe_dir, up)
}

// ============================================================================
// Directional Lights (CSM)
// ============================================================================

/// Fits one cascade to its world-space corners.
///
/// Returns `(view, projection, shadow_matrix)`. The light view is anchored
/// at `eye` (the camera position) looking along `light_direction`.
#[must_use]
pub fn fit_directional_cascade(
    eye: Vec3,
    light_direction: Vec3,
    corners: &[Vec3; 8],
    map_size: u32,
    quantize: bool,
    convention: SamplingConvention,
) -> (Mat4, Mat4, Mat4) {
    let view = safe_look_at(eye, light_direction);
    let (min, max) = light_space_bounds(&view, corners);
    let crop = compute_cascade_crop(min, max, map_size, quantize);
    let projection = crop_matrix(&crop) * directional_base_projection();
    let shadow = sampling_bias_matrix(convention) * projection * view;
    (view, projection, shadow)
}

/// Builds every cascade of a directional light for `camera`.
#[must_use]
pub fn build_directional_views(
    light_direction: Vec3,
    camera: &Camera,
    settings: &ShadowSettings,
    map_size: u32,
) -> LightShadowViews {
    let mut views = LightShadowViews::new(map_size);
    let splits = compute_cascade_splits(
        settings.cascade_count,
        settings.cascade_near,
        settings.cascade_far,
        settings.cascade_split_lambda,
    );
    let eye = camera.position();

    for &(split_near, split_far) in splits.ranges() {
        let corners = camera_frustum_corners_world(camera, split_near, split_far);
        let (view, projection, shadow) = fit_directional_cascade(
            eye,
            light_direction,
            &corners,
            map_size,
            settings.stabilize_cascades,
            settings.sampling,
        );
        views.push(ShadowView {
            split_near,
            split_far,
            view_matrix: view,
            projection_matrix: projection,
            shadow_matrix: shadow,
            frustum: Frustum::from_view_projection(view, projection),
            slot: ShadowAtlasSlot::full(map_size),
        });
    }

    views
}

// ============================================================================
// Point Lights (4-view atlas)
// ============================================================================

const POINT_PITCH_DEGREES: f32 = 27.367_805;

/// `(yaw, pitch)` in degrees of the four point-light views.
pub const POINT_VIEW_ORIENTATIONS: [(f32, f32); 4] = [
    (180.0, -POINT_PITCH_DEGREES),
    (0.0, -POINT_PITCH_DEGREES),
    (90.0, POINT_PITCH_DEGREES),
    (-90.0, POINT_PITCH_DEGREES),
];

/// Horizontal and vertical point-light FOV in degrees, margin included.
pub const POINT_FOV_X_DEGREES: f32 = 143.985_7 + 7.8;
pub const POINT_FOV_Y_DEGREES: f32 = 125.264_39 + 3.0;

/// Centers (bottom-left UV) of the four atlas quadrants.
const POINT_QUADRANT_CENTERS: [Vec2; 4] = [
    Vec2::new(0.25, 0.25),
    Vec2::new(0.75, 0.25),
    Vec2::new(0.25, 0.75),
    Vec2::new(0.75, 0.75),
];

/// Quadrant bias used by each point-light view.
pub const POINT_VIEW_TO_QUADRANT: [usize; 4] = [2, 3, 0, 1];

/// View matrices of the four point-light views at `position`.
#[must_use]
pub fn point_light_views(position: Vec3) -> [Mat4; 4] {
    POINT_VIEW_ORIENTATIONS.map(|(yaw, pitch)| {
        let rotation = Mat3::from_euler(EulerRot::YXZ, yaw.to_radians(), pitch.to_radians(), 0.0);
        let translation = Vec3::new(
            -position.dot(rotation.x_axis),
            -position.dot(rotation.y_axis),
            -position.dot(rotation.z_axis),
        );
        let mut view = Mat4::from_mat3(rotation.transpose());
        view.w_axis = translation.extend(1.0);
        view
    })
}

/// Shared wide-FOV projection of the point-light views.
#[must_use]
pub fn point_light_projection() -> Mat4 {
    let half_x = (POINT_FOV_X_DEGREES * 0.5).to_radians().tan();
    let half_y = (POINT_FOV_Y_DEGREES * 0.5).to_radians().tan();
    Mat4::perspective_rh(
        POINT_FOV_Y_DEGREES.to_radians(),
        half_x / half_y,
        LOCAL_LIGHT_NEAR,
        LOCAL_LIGHT_FAR,
    )
}

/// Crop-bias of atlas quadrant `quadrant` (bottom-left UV order).
#[must_use]
pub fn point_quadrant_bias(quadrant: usize, convention: SamplingConvention) -> Mat4 {
    region_bias_matrix(0.25, POINT_QUADRANT_CENTERS[quadrant % 4], convention)
}

#[must_use]
pub fn build_point_views(position: Vec3, map_size: u32, convention: SamplingConvention) -> LightShadowViews {
    let mut views = LightShadowViews::new(map_size);
    let projection = point_light_projection();

    for (i, view) in point_light_views(position).into_iter().enumerate() {
        let bias = point_quadrant_bias(POINT_VIEW_TO_QUADRANT[i], convention);
        views.push(ShadowView {
            view_matrix: view,
            projection_matrix: projection,
            shadow_matrix: bias * projection * view,
            frustum: Frustum::from_view_projection(view, projection),
            slot: ShadowAtlasSlot::quadrant(map_size, i),
            ..ShadowView::default()
        });
    }

    views
}

// ============================================================================
// Spot Lights
// ============================================================================

#[must_use]
pub fn spot_light_projection() -> Mat4 {
    Mat4::perspective_rh(SPOT_FOV_DEGREES.to_radians(), 1.0, LOCAL_LIGHT_NEAR, LOCAL_LIGHT_FAR)
}

#[must_use]
pub fn build_spot_view(
    position: Vec3,
    direction: Vec3,
    map_size: u32,
    convention: SamplingConvention,
) -> LightShadowViews {
    let view = safe_look_at(position, direction);
    let projection = spot_light_projection();

    let mut views = LightShadowViews::new(map_size);
    views.push(ShadowView {
        view_matrix: view,
        projection_matrix: projection,
        shadow_matrix: sampling_bias_matrix(convention) * projection * view,
        frustum: Frustum::from_view_projection(view, projection),
        slot: ShadowAtlasSlot::full(map_size),
        ..ShadowView::default()
    });
    views
}

// ============================================================================
// Dispatch
// ============================================================================

/// Map size for `light`: its own override, else the global size for its kind.
#[must_use]
pub fn shadow_map_size(light: &Light, settings: &ShadowSettings) -> u32 {
    light.shadow.map_size().unwrap_or(match light.kind() {
        LightKind::Directional(_) => settings.directional_map_size,
        LightKind::Point(_) => settings.point_map_size,
        LightKind::Spot(_) => settings.spot_map_size,
    })
}

/// Builds the shadow views of any light kind.
///
/// Directional lights are fitted to `camera`; without one they get no views.
#[must_use]
pub fn compute_light_shadow_views(
    light: &Light,
    camera: Option<&Camera>,
    settings: &ShadowSettings,
) -> LightShadowViews {
    let map_size = shadow_map_size(light, settings);

    match light.kind() {
        LightKind::Directional(_) => match camera {
            Some(camera) => build_directional_views(light.direction(), camera, settings, map_size),
            None => LightShadowViews::new(map_size),
        },
        LightKind::Point(_) => build_point_views(light.position(), map_size, settings.sampling),
        LightKind::Spot(_) => {
            build_spot_view(light.position(), light.direction(), map_size, settings.sampling)
        }
    }
}
