//! Geometry helpers
//!
//! Vectors are `glam::DVec2`; everything here is pure math.

pub mod aabb;
pub mod ease;

pub use aabb::Aabb;
pub use ease::{ease_in_out_cubic, lerp_clamped};
