//! Core engine types and utilities for the lander.
//!
//! This crate provides the foundational types used across all engine systems:
//! - 2D transform (viewport position + heading in degrees)
//! - Fixed-step tick clock

pub mod time;
pub mod transform;

pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::Vec2;
