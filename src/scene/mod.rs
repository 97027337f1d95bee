//! Scene-side inputs of the visibility subsystem:
//! - Frustum / Plane: six-plane containment queries
//! - Camera: projection, view and cached frustum
//! - Light: directional / point / spot light description
//! - Scene: slotmap-keyed storage of cameras, lights and renderables

pub mod frustum;
pub mod camera;
pub mod layers;
pub mod light;
pub mod scene;

pub use camera::{Camera, ProjectionType};
pub use frustum::{Frustum, FrustumSide, Plane, PlaneSide};
pub use layers::CullingMask;
pub use light::{Light, LightKind, LightRenderMode};
pub use scene::{Renderable, Scene};

use slotmap::new_key_type;

new_key_type! {
    pub struct CameraKey;
    pub struct LightKey;
    pub struct RenderableKey;
}
