use glam::{Affine3A, Vec3};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

use crate::errors::{MythError, Result};

/// Largest accepted spot cone angle, in degrees.
pub const MAX_CONE_DEGREES: f32 = 179.0;

/// Largest accepted shadow map edge length, in pixels.
pub const MAX_SHADOW_MAP_SIZE: u32 = 16384;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShadowConfig {
    pub bias: f32,
    pub normal_bias: f32,
    /// Per-light override of the global map size for this light kind.
    map_size: Option<u32>,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            bias: 0.005,
            normal_bias: 0.02,
            map_size: None,
        }
    }
}

impl ShadowConfig {
    #[inline]
    #[must_use]
    pub fn map_size(&self) -> Option<u32> {
        self.map_size
    }

    /// `None` restores the global size.
    pub fn set_map_size(&mut self, size: Option<u32>) -> Result<()> {
        if let Some(size) = size {
            validate_map_size(size)?;
        }
        self.map_size = size;
        Ok(())
    }
}

pub(crate) fn validate_map_size(size: u32) -> Result<()> {
    if size == 0 || size > MAX_SHADOW_MAP_SIZE {
        return Err(MythError::InvalidShadowMapSize {
            size,
            max: MAX_SHADOW_MAP_SIZE,
        });
    }
    Ok(())
}

/// How a light contributes to shadows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightRenderMode {
    /// Fully dynamic: every caster is rendered into the shadow map.
    #[default]
    Realtime,
    /// Static casters are baked; only dynamic casters are rendered.
    Mixed,
    /// No runtime shadow maps.
    Baked,
}

#[derive(Debug, Clone, Default)]
pub struct DirectionalLight {}

#[derive(Debug, Clone)]
pub struct PointLight {
    pub range: f32,
}

/// Cone angles are full apertures in degrees.
#[derive(Debug, Clone)]
pub struct SpotLight {
    pub range: f32,
    pub inner_cone: f32,
    pub outer_cone: f32,
}

impl SpotLight {
    /// Rejects angles above [`MAX_CONE_DEGREES`]; raises `outer_cone` if it would fall below.
    pub fn set_inner_cone(&mut self, degrees: f32) -> Result<()> {
        validate_cone(degrees)?;
        self.inner_cone = degrees;
        if self.inner_cone > self.outer_cone {
            self.outer_cone = self.inner_cone;
        }
        Ok(())
    }

    /// Rejects angles above [`MAX_CONE_DEGREES`]; lowers `inner_cone` if it would rise above.
    pub fn set_outer_cone(&mut self, degrees: f32) -> Result<()> {
        validate_cone(degrees)?;
        self.outer_cone = degrees;
        if self.outer_cone < self.inner_cone {
            self.inner_cone = self.outer_cone;
        }
        Ok(())
    }
}

fn validate_cone(degrees: f32) -> Result<()> {
    if !(0.0..=MAX_CONE_DEGREES).contains(&degrees) {
        return Err(MythError::InvalidConeAngle(degrees));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub enum LightKind {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

impl LightKind {
    /// Shadow bias that suits this light kind's projection.
    #[must_use]
    pub fn default_shadow_bias(&self) -> f32 {
        match self {
            LightKind::Directional(_) => 0.000_01,
            LightKind::Point(_) | LightKind::Spot(_) => 0.002,
        }
    }

    /// Radius of influence. Directional lights are unbounded.
    #[must_use]
    pub fn range(&self) -> f32 {
        match self {
            LightKind::Directional(_) => f32::INFINITY,
            LightKind::Point(point) => point.range,
            LightKind::Spot(spot) => spot.range,
        }
    }

    /// Discriminant uploaded to shaders.
    #[must_use]
    pub fn type_index(&self) -> u32 {
        match self {
            LightKind::Point(_) => 0,
            LightKind::Spot(_) => 1,
            LightKind::Directional(_) => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Light {
    pub uuid: Uuid,
    pub id: u64,
    pub color: Vec3,
    pub intensity: f32,
    pub enabled: bool,
    pub render_mode: LightRenderMode,
    kind: LightKind,

    pub cast_shadows: bool,
    pub shadow: ShadowConfig,

    position: Vec3,
    direction: Vec3,
}

impl Light {
    fn generate_id_from_uuid(uuid: &Uuid) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        uuid.hash(&mut hasher);
        hasher.finish()
    }

    fn with_kind(kind: LightKind, color: Vec3, intensity: f32) -> Self {
        let uuid = Uuid::new_v4();
        let shadow = ShadowConfig {
            bias: kind.default_shadow_bias(),
            ..ShadowConfig::default()
        };
        Self {
            uuid,
            id: Self::generate_id_from_uuid(&uuid),
            color,
            intensity,
            enabled: true,
            render_mode: LightRenderMode::Realtime,
            kind,
            cast_shadows: true,
            shadow,
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }

    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self::with_kind(
            LightKind::Directional(DirectionalLight {}),
            color,
            intensity,
        )
    }

    #[must_use]
    pub fn new_point(color: Vec3, intensity: f32, range: f32) -> Self {
        Self::with_kind(LightKind::Point(PointLight { range }), color, intensity)
    }

    /// Cone angles in degrees, clamped to `[0, MAX_CONE_DEGREES]` with `inner <= outer`.
    #[must_use]
    pub fn new_spot(
        color: Vec3,
        intensity: f32,
        range: f32,
        inner_cone: f32,
        outer_cone: f32,
    ) -> Self {
        let outer_cone = outer_cone.clamp(0.0, MAX_CONE_DEGREES);
        let inner_cone = inner_cone.clamp(0.0, outer_cone);
        Self::with_kind(
            LightKind::Spot(SpotLight {
                range,
                inner_cone,
                outer_cone,
            }),
            color,
            intensity,
        )
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &LightKind {
        &self.kind
    }

    #[inline]
    pub fn kind_mut(&mut self) -> &mut LightKind {
        &mut self.kind
    }

    /// Changes the light kind and resets the shadow bias to the kind's default.
    pub fn set_kind(&mut self, kind: LightKind) {
        self.shadow.bias = kind.default_shadow_bias();
        self.kind = kind;
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit direction the light shines along.
    #[inline]
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Zero-length directions fall back to `-Z`.
    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction.normalize_or(Vec3::NEG_Z);
    }

    /// Position from the translation, direction from the transformed `-Z` axis.
    pub fn update_world_transform(&mut self, world: &Affine3A) {
        self.position = Vec3::from(world.translation);
        self.set_direction(world.transform_vector3(Vec3::NEG_Z));
    }

    /// `true` when this light needs runtime shadow maps.
    #[must_use]
    pub fn shadow_casting(&self) -> bool {
        self.enabled && self.cast_shadows && self.render_mode != LightRenderMode::Baked
    }
}
