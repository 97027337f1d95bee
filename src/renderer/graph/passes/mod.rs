//! Per-frame passes.

mod cull;

pub use cull::SceneCullPass;
