//! View records shared by the shadow builders and the cull pass.
//!
//! Provides:
//! - ViewTarget: identifies a camera view or a light sub-view
//! - ShadowAtlasSlot: fixed viewport of a sub-view inside a shadow map
//! - ShadowView / LightShadowViews: per-light shadow view storage

pub mod view;

pub use view::{LightShadowViews, ShadowAtlasSlot, ShadowView, ViewTarget};
