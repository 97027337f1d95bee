use glam::Affine3A;
use slotmap::SlotMap;

use crate::resources::geometry::BoundingBox;
use crate::scene::camera::Camera;
use crate::scene::layers::CullingMask;
use crate::scene::light::Light;
use crate::scene::{CameraKey, LightKey, RenderableKey};

/// Per-object data the culler reads. Bounds are in world space.
#[derive(Debug, Clone)]
pub struct Renderable {
    pub bounds: BoundingBox,
    pub layers: CullingMask,
    pub cast_shadows: bool,
    /// Static objects are baked into lightmaps and skipped by `Mixed` lights.
    pub is_static: bool,
    /// Bypasses camera frustum tests (still subject to layers and distance).
    pub always_visible: bool,
    pub skip_rendering: bool,
    pub transparent: bool,
}

impl Renderable {
    #[must_use]
    pub fn new(bounds: BoundingBox) -> Self {
        Self {
            bounds,
            layers: CullingMask::DEFAULT,
            cast_shadows: true,
            is_static: false,
            always_visible: false,
            skip_rendering: false,
            transparent: false,
        }
    }

    /// Recomputes world bounds from local bounds and a world transform.
    pub fn update_world_bounds(&mut self, local_bounds: &BoundingBox, world: &Affine3A) {
        self.bounds = local_bounds.transform(world);
    }

    #[inline]
    #[must_use]
    pub fn check_culling_mask(&self, mask: CullingMask) -> bool {
        self.layers.intersects(mask)
    }
}

/// Container handed to the cull pass once per frame.
#[derive(Debug, Default)]
pub struct Scene {
    pub cameras: SlotMap<CameraKey, Camera>,
    pub lights: SlotMap<LightKey, Light>,
    pub renderables: SlotMap<RenderableKey, Renderable>,
    /// Camera used for directional cascades and, outside runtime mode, the only camera culled.
    pub main_camera: Option<CameraKey>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The first camera added becomes the main camera.
    pub fn add_camera(&mut self, camera: Camera) -> CameraKey {
        let key = self.cameras.insert(camera);
        if self.main_camera.is_none() {
            self.main_camera = Some(key);
        }
        key
    }

    pub fn add_light(&mut self, light: Light) -> LightKey {
        self.lights.insert(light)
    }

    pub fn add_renderable(&mut self, renderable: Renderable) -> RenderableKey {
        self.renderables.insert(renderable)
    }

    pub fn remove_camera(&mut self, key: CameraKey) -> Option<Camera> {
        if self.main_camera == Some(key) {
            self.main_camera = None;
        }
        self.cameras.remove(key)
    }

    pub fn remove_light(&mut self, key: LightKey) -> Option<Light> {
        self.lights.remove(key)
    }

    pub fn remove_renderable(&mut self, key: RenderableKey) -> Option<Renderable> {
        self.renderables.remove(key)
    }

    #[must_use]
    pub fn main_camera(&self) -> Option<(CameraKey, &Camera)> {
        let key = self.main_camera?;
        self.cameras.get(key).map(|camera| (key, camera))
    }
}
