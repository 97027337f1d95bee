//! Renderer-side half of the visibility subsystem: configuration, view
//! records and the per-frame cull pass.

pub mod core;
pub mod graph;
pub mod settings;

pub use graph::{RenderLists, SceneCullPass};
pub use settings::ShadowSettings;
