//! Error Types
//!
//! This module defines the error types used by the visibility subsystem.
//!
//! # Overview
//!
//! Only configuration entry points can fail. Per-frame evaluation (plane
//! extraction, cascade fitting, culling) never returns an error: degenerate
//! geometry is clamped locally so that every frame produces a usable result.
//!
//! # Usage
//!
//! ```rust,ignore
//! use myth_visibility::errors::Result;
//! use myth_visibility::renderer::settings::ShadowSettings;
//!
//! fn configure(settings: &ShadowSettings) -> Result<()> {
//!     settings.validate()?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the visibility subsystem.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MythError {
    // ========================================================================
    // Shadow Configuration Errors
    // ========================================================================
    /// Cascade count outside `1..=MAX_CASCADES`.
    #[error("Invalid shadow cascade count: {count} (expected 1..={max})")]
    InvalidCascadeCount {
        /// The rejected count
        count: u32,
        /// The largest supported count
        max: u32,
    },

    /// Shadow map size is zero or exceeds the supported maximum.
    #[error("Invalid shadow map size: {size} (expected 1..={max})")]
    InvalidShadowMapSize {
        /// The rejected size in pixels
        size: u32,
        /// The largest supported size in pixels
        max: u32,
    },

    /// Cascade split blend weight outside `[0, 1]`.
    #[error("Invalid cascade split lambda: {0} (expected 0.0..=1.0)")]
    InvalidSplitLambda(f32),

    /// A near/far pair that is not strictly positive and increasing.
    #[error("Invalid {context} range: near={near}, far={far}")]
    InvalidRange {
        /// Which range was being configured
        context: &'static str,
        /// Near bound
        near: f32,
        /// Far bound
        far: f32,
    },

    /// A distance, radius or multiplier that must be positive and finite.
    #[error("Invalid {context}: {value}")]
    InvalidValue {
        /// Which value was being configured
        context: &'static str,
        /// The rejected value
        value: f32,
    },

    // ========================================================================
    // Light Configuration Errors
    // ========================================================================
    /// Spot cone angle outside `(0°, 179°]`.
    #[error("Invalid spot cone angle: {0} degrees (expected 0..=179)")]
    InvalidConeAngle(f32),
}

/// Alias for `Result<T, MythError>`.
pub type Result<T> = std::result::Result<T, MythError>;
