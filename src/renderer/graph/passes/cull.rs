//! Scene Cull Pass
//!
//! Builds every visibility set of the frame: camera queues and one shadow
//! queue per light sub-view. Shadow views are computed here as well, so the
//! pass is the only per-frame entry point of the subsystem.
//!
//! # Data Flow
//! ```text
//! Scene ─┬─ cameras ──────────────────────────────► camera queues
//!        └─ lights → compute_light_shadow_views ──► shadow views + shadow queues
//! ```
//!
//! # Caster filters (point / spot)
//! 1. `skip_rendering` or not a shadow caster
//! 2. static caster of a `Mixed` light (baked)
//! 3. bounds outside the light's range
//! 4. not visible to any active camera (mask, shadow distance, biased frustum test)
//! 5. bounding sphere outside the sub-view frustum
//!
//! Directional casters are tested against the main camera's mask and shadow
//! distance, then against each cascade frustum.

use glam::Vec3;

use crate::errors::Result;
use crate::renderer::core::view::LightShadowViews;
use crate::renderer::graph::frame::{RenderItem, RenderLists};
use crate::renderer::graph::shadow_utils::compute_light_shadow_views;
use crate::renderer::settings::ShadowSettings;
use crate::scene::camera::Camera;
use crate::scene::light::{Light, LightKind, LightRenderMode};
use crate::scene::{CameraKey, LightKey, Renderable, RenderableKey, Scene};

/// Fraction of a local light's range that must be in view for it to get shadows.
const LIGHT_VISIBILITY_RANGE_FACTOR: f32 = 0.5;

/// Scene culling pass.
///
/// Configuration is validated once in [`SceneCullPass::new`]; [`execute`]
/// never fails and always produces a complete set of lists.
///
/// [`execute`]: SceneCullPass::execute
pub struct SceneCullPass {
    settings: ShadowSettings,
    active_cameras: Vec<CameraKey>,
}

impl SceneCullPass {
    pub fn new(settings: ShadowSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            active_cameras: Vec::new(),
        })
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ShadowSettings {
        &self.settings
    }

    /// Replaces the settings. The current ones are kept if validation fails.
    pub fn set_settings(&mut self, settings: ShadowSettings) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Rebuilds `lists` for the current state of `scene`.
    ///
    /// # Steps
    /// 1. Clear `lists`
    /// 2. Collect active cameras (only the main camera outside runtime mode)
    /// 3. Fill camera queues
    /// 4. Compute shadow views and fill shadow queues
    /// 5. Drop stale entries and sort
    pub fn execute(&mut self, scene: &Scene, lists: &mut RenderLists) {
        lists.clear();
        self.collect_active_cameras(scene);

        for &key in &self.active_cameras {
            let Some(camera) = scene.cameras.get(key) else {
                continue;
            };
            Self::cull_camera(scene, key, camera, lists);
        }

        if self.settings.enabled {
            for (light_key, light) in &scene.lights {
                if !light.shadow_casting() {
                    continue;
                }
                self.cull_light(scene, light_key, light, lists);
            }
        }

        lists.retain_active(&self.active_cameras);
        lists.sort();

        log::trace!(
            "Culled {} renderables: {} cameras, {} shadow-casting lights",
            scene.renderables.len(),
            self.active_cameras.len(),
            lists.shadow_views.len()
        );
    }

    fn collect_active_cameras(&mut self, scene: &Scene) {
        self.active_cameras.clear();

        if self.settings.runtime_mode {
            self.active_cameras.extend(
                scene
                    .cameras
                    .iter()
                    .filter(|(_, camera)| camera.enabled)
                    .map(|(key, _)| key),
            );
        } else if let Some((key, camera)) = scene.main_camera()
            && camera.enabled
        {
            self.active_cameras.push(key);
        }
    }

    fn camera_refs<'a>(&'a self, scene: &'a Scene) -> impl Iterator<Item = &'a Camera> + 'a {
        self.active_cameras
            .iter()
            .filter_map(|key| scene.cameras.get(*key))
    }

    // ========================================================================
    // Camera queues
    // ========================================================================

    fn cull_camera(scene: &Scene, key: CameraKey, camera: &Camera, lists: &mut RenderLists) {
        let eye = camera.position();
        let queues = lists.camera_mut(key);

        for (renderable_key, renderable) in &scene.renderables {
            if renderable.skip_rendering || !renderable.check_culling_mask(camera.culling_mask) {
                continue;
            }
            if !renderable.always_visible && !camera.is_visible(&renderable.bounds, 1.0) {
                continue;
            }

            let item = RenderItem {
                renderable: renderable_key,
                distance_sq: renderable.bounds.center().distance_squared(eye),
            };
            if renderable.transparent {
                queues.transparent.push(item);
            } else {
                queues.opaque.push(item);
            }
        }
    }

    // ========================================================================
    // Shadow queues
    // ========================================================================

    fn cull_light(&self, scene: &Scene, light_key: LightKey, light: &Light, lists: &mut RenderLists) {
        let is_local = !matches!(light.kind(), LightKind::Directional(_));

        if is_local {
            let position = light.position();
            let radius = light.kind().range() * LIGHT_VISIBILITY_RANGE_FACTOR;
            if !self
                .camera_refs(scene)
                .any(|camera| camera.frustum().contains_sphere(position, radius))
            {
                return;
            }
        }

        let main_camera = scene.main_camera().map(|(_, camera)| camera);
        let views = compute_light_shadow_views(light, main_camera, &self.settings);
        if views.is_empty() {
            return;
        }

        for (renderable_key, renderable) in &scene.renderables {
            let eligible = match (is_local, main_camera) {
                (true, _) => self.local_caster_eligible(scene, light, renderable),
                (false, Some(camera)) => self.directional_caster_eligible(camera, light, renderable),
                (false, None) => false,
            };
            if eligible {
                Self::submit_to_views(light_key, renderable_key, renderable, &views, lists);
            }
        }

        lists.shadow_views.insert(light_key, views);
    }

    fn local_caster_eligible(&self, scene: &Scene, light: &Light, renderable: &Renderable) -> bool {
        if renderable.skip_rendering || !casts_for(light, renderable) {
            return false;
        }
        if !renderable
            .bounds
            .intersects_sphere(light.position(), light.kind().range())
        {
            return false;
        }

        self.camera_refs(scene)
            .any(|camera| self.caster_visible_to(camera, renderable))
    }

    fn directional_caster_eligible(&self, camera: &Camera, light: &Light, renderable: &Renderable) -> bool {
        renderable.bounds.is_finite()
            && !renderable.skip_rendering
            && casts_for(light, renderable)
            && renderable.check_culling_mask(camera.culling_mask)
            && within_distance(camera.position(), self.settings.shadow_distance, renderable)
    }

    /// Whether `camera` could see a shadow cast by `renderable`.
    fn caster_visible_to(&self, camera: &Camera, renderable: &Renderable) -> bool {
        renderable.check_culling_mask(camera.culling_mask)
            && within_distance(camera.position(), self.settings.shadow_distance, renderable)
            && (renderable.always_visible
                || camera.is_visible(&renderable.bounds, self.settings.camera_visibility_bias))
    }

    fn submit_to_views(
        light_key: LightKey,
        renderable_key: RenderableKey,
        renderable: &Renderable,
        views: &LightShadowViews,
        lists: &mut RenderLists,
    ) {
        let center = renderable.bounds.center();
        let radius = renderable.bounds.radius();

        for (layer_index, view) in views.views().iter().enumerate() {
            if view.frustum.contains_sphere(center, radius) {
                lists
                    .shadow_queue_mut(light_key, layer_index as u32)
                    .push(renderable_key);
            }
        }
    }
}

/// Casters, minus static ones whose shadows a `Mixed` light has baked.
fn casts_for(light: &Light, renderable: &Renderable) -> bool {
    renderable.cast_shadows && !(renderable.is_static && light.render_mode == LightRenderMode::Mixed)
}

fn within_distance(eye: Vec3, distance: f32, renderable: &Renderable) -> bool {
    renderable.bounds.intersects_sphere(eye, distance)
}
