//! Shadow & Visibility Settings
//!
//! [`ShadowSettings`] is consumed when the cull pass is created and is
//! validated once up front, so nothing in the per-frame path has to reject
//! configuration.
//!
//! # Example
//!
//! ```rust,ignore
//! use myth_visibility::renderer::settings::ShadowSettings;
//!
//! let settings = ShadowSettings {
//!     cascade_count: 3,
//!     shadow_distance: 150.0,
//!     ..Default::default()
//! };
//! settings.validate()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{MythError, Result};
use crate::renderer::graph::shadow_utils::MAX_CASCADES;
use crate::scene::light::validate_map_size;

// ---------------------------------------------------------------------------
// Target conventions
// ---------------------------------------------------------------------------

/// Where texture coordinate `(0, 0)` sits in the shadow map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TexCoordOrigin {
    /// WebGPU, Vulkan, D3D, Metal. Clip-space `+Y` maps to `v = 0`.
    #[default]
    TopLeft,
    /// OpenGL. Clip-space `+Y` maps to `v = 1`.
    BottomLeft,
}

/// Clip-space depth range produced by the light projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DepthRange {
    /// `glam` `*_rh` projections. Depth is sampled as-is.
    #[default]
    ZeroToOne,
    /// OpenGL-style projections. Depth is remapped with `z * 0.5 + 0.5`.
    NegativeOneToOne,
}

/// Convention the shadow sampling matrices are built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SamplingConvention {
    pub origin: TexCoordOrigin,
    pub depth: DepthRange,
}

// ---------------------------------------------------------------------------
// ShadowSettings
// ---------------------------------------------------------------------------

/// Global shadow and visibility configuration.
///
/// | Field                     | Default |
/// |---------------------------|---------|
/// | `enabled`                 | `true`  |
/// | `cascade_count`           | `4`     |
/// | `cascade_split_lambda`    | `0.6`   |
/// | `cascade_near`            | `0.25`  |
/// | `cascade_far`             | `250.0` |
/// | `shadow_distance`         | `100.0` |
/// | `directional_map_size`    | `2048`  |
/// | `point_map_size`          | `2048`  |
/// | `spot_map_size`           | `1024`  |
/// | `pcf_samples`             | `2`     |
/// | `stabilize_cascades`      | `true`  |
/// | `camera_visibility_bias`  | `2.2`   |
/// | `runtime_mode`            | `true`  |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    /// Master switch. When `false` no shadow views are produced.
    pub enabled: bool,

    /// Number of directional cascades, `1..=MAX_CASCADES`.
    pub cascade_count: u32,

    /// Blend between uniform (`0.0`) and logarithmic (`1.0`) cascade splits.
    pub cascade_split_lambda: f32,

    /// View-space range split into cascades. Independent of the camera clip planes.
    pub cascade_near: f32,
    pub cascade_far: f32,

    /// Maximum distance from a camera at which objects still cast shadows.
    pub shadow_distance: f32,

    pub directional_map_size: u32,
    pub point_map_size: u32,
    pub spot_map_size: u32,

    /// PCF kernel size forwarded to the sampling shader.
    pub pcf_samples: u32,

    /// Quantize cascade scale so cascade size only changes in coarse steps.
    pub stabilize_cascades: bool,

    /// Radius multiplier applied to a caster's bounds when checking whether any
    /// camera could see the shadow it casts.
    pub camera_visibility_bias: f32,

    /// In editor mode (`false`) only the scene's main camera is considered.
    pub runtime_mode: bool,

    pub sampling: SamplingConvention,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            cascade_count: 4,
            cascade_split_lambda: 0.6,
            cascade_near: 0.25,
            cascade_far: 250.0,
            shadow_distance: 100.0,
            directional_map_size: 2048,
            point_map_size: 2048,
            spot_map_size: 1024,
            pcf_samples: 2,
            stabilize_cascades: true,
            camera_visibility_bias: 2.2,
            runtime_mode: true,
            sampling: SamplingConvention::default(),
        }
    }
}

impl ShadowSettings {
    /// Rejects configurations the per-frame path cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.cascade_count == 0 || self.cascade_count > MAX_CASCADES {
            return Err(MythError::InvalidCascadeCount {
                count: self.cascade_count,
                max: MAX_CASCADES,
            });
        }

        if !(0.0..=1.0).contains(&self.cascade_split_lambda) {
            return Err(MythError::InvalidSplitLambda(self.cascade_split_lambda));
        }

        if !(self.cascade_near > 0.0 && self.cascade_far > self.cascade_near)
            || !self.cascade_far.is_finite()
        {
            return Err(MythError::InvalidRange {
                context: "cascade",
                near: self.cascade_near,
                far: self.cascade_far,
            });
        }

        positive("shadow distance", self.shadow_distance)?;
        positive("camera visibility bias", self.camera_visibility_bias)?;

        validate_map_size(self.directional_map_size)?;
        validate_map_size(self.point_map_size)?;
        validate_map_size(self.spot_map_size)?;

        Ok(())
    }
}

fn positive(context: &'static str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(MythError::InvalidValue { context, value })
    }
}
