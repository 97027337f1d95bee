//! Per-frame shadow and visibility evaluation
//!
//! Provides:
//! - shadow_utils: cascade splitting, corner projection and light view fitting
//! - shadow_uniforms: per-light shadow uniform block
//! - RenderLists: visibility sets of the frame
//! - SceneCullPass: fills RenderLists from a Scene

pub mod frame;
pub mod passes;
pub mod shadow_uniforms;
pub mod shadow_utils;

pub use frame::{CameraQueues, RenderItem, RenderLists};
pub use passes::SceneCullPass;
pub use shadow_uniforms::ShadowLightUniforms;
