#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod errors;
pub mod renderer;
pub mod resources;
pub mod scene;

pub use errors::{MythError, Result};
pub use renderer::core::{LightShadowViews, ShadowAtlasSlot, ShadowView, ViewTarget};
pub use renderer::{RenderLists, SceneCullPass, ShadowSettings};
pub use resources::{BoundingBox, BoundingSphere};
pub use scene::{Camera, CullingMask, Frustum, Light, Plane, Renderable, Scene};
