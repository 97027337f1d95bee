//! Per-frame visibility output.
//!
//! [`RenderLists`] is cleared and refilled by the cull pass every frame and
//! read, unchanged, by whatever submits draws for that frame.

use rustc_hash::FxHashMap;

use crate::renderer::core::view::{LightShadowViews, ViewTarget};
use crate::scene::{CameraKey, LightKey, RenderableKey};

/// Visible renderable and its squared distance to the view origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem {
    pub renderable: RenderableKey,
    pub distance_sq: f32,
}

/// Opaque and transparent queues of one camera.
#[derive(Debug, Clone, Default)]
pub struct CameraQueues {
    /// Front-to-back.
    pub opaque: Vec<RenderItem>,
    /// Back-to-front.
    pub transparent: Vec<RenderItem>,
}

impl CameraQueues {
    fn clear(&mut self) {
        self.opaque.clear();
        self.transparent.clear();
    }

    pub fn sort(&mut self) {
        self.opaque
            .sort_unstable_by(|a, b| a.distance_sq.total_cmp(&b.distance_sq));
        self.transparent
            .sort_unstable_by(|a, b| b.distance_sq.total_cmp(&a.distance_sq));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty() && self.transparent.is_empty()
    }

    #[must_use]
    pub fn contains(&self, renderable: RenderableKey) -> bool {
        self.opaque
            .iter()
            .chain(&self.transparent)
            .any(|item| item.renderable == renderable)
    }
}

/// Visibility sets keyed by camera and by light sub-view.
#[derive(Debug, Default)]
pub struct RenderLists {
    pub cameras: FxHashMap<CameraKey, CameraQueues>,
    /// Keyed by [`ViewTarget::ShadowLight`].
    pub shadow_queues: FxHashMap<ViewTarget, Vec<RenderableKey>>,
    pub shadow_views: FxHashMap<LightKey, LightShadowViews>,
}

impl RenderLists {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties every list but keeps allocations for the next frame.
    pub fn clear(&mut self) {
        self.cameras.values_mut().for_each(CameraQueues::clear);
        self.shadow_queues.values_mut().for_each(Vec::clear);
        self.shadow_views.clear();
    }

    /// Drops entries of cameras and lights that produced no view this frame.
    pub(crate) fn retain_active(&mut self, cameras: &[CameraKey]) {
        self.cameras.retain(|key, _| cameras.contains(key));
        self.shadow_queues.retain(|target, _| match target {
            ViewTarget::ShadowLight { light, layer_index } => self
                .shadow_views
                .get(light)
                .is_some_and(|views| (*layer_index as usize) < views.len()),
            ViewTarget::Camera(_) => false,
        });
    }

    #[must_use]
    pub fn camera(&self, camera: CameraKey) -> Option<&CameraQueues> {
        self.cameras.get(&camera)
    }

    pub fn camera_mut(&mut self, camera: CameraKey) -> &mut CameraQueues {
        self.cameras.entry(camera).or_default()
    }

    /// Renderables submitted to sub-view `layer_index` of `light`.
    #[must_use]
    pub fn shadow_queue(&self, light: LightKey, layer_index: u32) -> &[RenderableKey] {
        self.shadow_queues
            .get(&ViewTarget::ShadowLight { light, layer_index })
            .map_or(&[], Vec::as_slice)
    }

    pub fn shadow_queue_mut(&mut self, light: LightKey, layer_index: u32) -> &mut Vec<RenderableKey> {
        self.shadow_queues
            .entry(ViewTarget::ShadowLight { light, layer_index })
            .or_default()
    }

    #[must_use]
    pub fn shadow_views(&self, light: LightKey) -> Option<&LightShadowViews> {
        self.shadow_views.get(&light)
    }

    pub fn sort(&mut self) {
        self.cameras.values_mut().for_each(CameraQueues::sort);
    }
}
