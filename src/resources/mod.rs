//! Resource data consumed by the visibility subsystem.

pub mod geometry;

pub use geometry::{BoundingBox, BoundingSphere, Extent};
