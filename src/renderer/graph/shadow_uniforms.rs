//! Per-light shadow uniform block.
//!
//! [`ShadowLightUniforms`] is built from a light and its shadow views and
//! handed to whatever submits draws; nothing here touches GPU state.

use glam::{Mat4, Vec3, Vec4};

use crate::renderer::core::view::LightShadowViews;
use crate::renderer::graph::shadow_utils::MAX_CASCADES;
use crate::renderer::settings::ShadowSettings;
use crate::scene::light::{Light, LightKind};

/// Map size the cascade bias factors are tuned for.
const BIAS_REFERENCE_MAP_SIZE: f32 = 1024.0;

/// Bias growth of cascades 1..=3 relative to cascade 0.
const CASCADE_BIAS_FACTORS: [f32; 3] = [1.05, 1.20, 4.40];

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowLightUniforms {
    // 16 bytes chunk 0
    pub color: Vec3,
    pub intensity: f32,

    // 16 bytes chunk 1
    pub position: Vec3,
    pub range: f32,

    // 16 bytes chunk 2
    pub direction: Vec3,
    pub light_type: u32,

    // 16 bytes chunk 3
    pub inner_cone_cos: f32,
    pub outer_cone_cos: f32,
    pub render_mode: u32,
    pub cast_shadows: u32,

    /// Depth bias per cascade (or per view).
    pub shadow_bias: Vec4,

    // 16 bytes chunk 5
    pub texel_size: f32,
    pub normal_bias: f32,
    pub view_count: u32,
    pub(crate) _padding0: u32,

    /// `(pcf_samples, 0, 1, 1)`
    pub sampling_params: Vec4,

    /// Far distance of each cascade, zero for point and spot lights.
    pub cascade_splits: Vec4,

    pub shadow_matrices: [Mat4; MAX_CASCADES as usize],
}

/// Depth bias per view, scaled by the map resolution.
///
/// With fewer than four cascades the factors shift down so that the last
/// cascade always gets the largest one.
#[must_use]
pub fn cascade_bias(bias: f32, map_size: u32, cascade_count: u32) -> Vec4 {
    let scale = BIAS_REFERENCE_MAP_SIZE / map_size.max(1) as f32;
    let [f1, f2, f3] = CASCADE_BIAS_FACTORS.map(|f| f * scale);

    let (m1, m2, m3) = match cascade_count {
        2 => (f3, f2, f3),
        3 => (f2, f3, f3),
        _ => (f1, f2, f3),
    };

    Vec4::new(bias, bias * m1, bias * m2, bias * m3)
}

impl ShadowLightUniforms {
    /// Packs `light` and the shadow views computed for it this frame.
    #[must_use]
    pub fn new(light: &Light, views: &LightShadowViews, settings: &ShadowSettings) -> Self {
        let kind = light.kind();
        let (inner_cone_cos, outer_cone_cos) = match kind {
            LightKind::Spot(spot) => (
                (spot.inner_cone * 0.5).to_radians().cos(),
                (spot.outer_cone * 0.5).to_radians().cos(),
            ),
            _ => (1.0, 1.0),
        };

        let mut cascade_splits = [0.0; MAX_CASCADES as usize];
        if matches!(kind, LightKind::Directional(_)) {
            for (dst, view) in cascade_splits.iter_mut().zip(views.views()) {
                *dst = view.split_far;
            }
        }

        let casts = settings.enabled && light.shadow_casting() && !views.is_empty();

        Self {
            color: light.color,
            intensity: light.intensity,
            position: light.position(),
            range: kind.range(),
            direction: light.direction(),
            light_type: kind.type_index(),
            inner_cone_cos,
            outer_cone_cos,
            render_mode: light.render_mode as u32,
            cast_shadows: u32::from(casts),
            shadow_bias: cascade_bias(light.shadow.bias, views.map_size, settings.cascade_count),
            texel_size: 1.0 / views.map_size.max(1) as f32,
            normal_bias: light.shadow.normal_bias,
            view_count: views.len() as u32,
            _padding0: 0,
            sampling_params: Vec4::new(settings.pcf_samples as f32, 0.0, 1.0, 1.0),
            cascade_splits: Vec4::from_array(cascade_splits),
            shadow_matrices: views.shadow_matrices(),
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
