//! Board-to-screen projection
//!
//! The renderer lives elsewhere; the simulation only fills in the pixel
//! rectangles it will read.

use serde::{Deserialize, Serialize};

use crate::consts::{FULL_HEIGHT, FULL_WIDTH, GAME_INFO_HEIGHT, RELATIVE_LINE_WIDTH};
use crate::math::Aabb;

/// Render target size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub width: f64,
    pub height: f64,
}

impl Dimension {
    /// 100 pixels per cell, used for headless runs
    pub fn headless() -> Self {
        Self {
            width: crate::consts::GAME_WIDTH as f64 * 100.0,
            height: crate::consts::GAME_HEIGHT as f64 * 100.0,
        }
    }
}

/// Projected screen rectangle (`renderX`, `renderY`, `renderWidth`, `renderHeight`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Project a board box into pixels, leaving room for the line gutter and info bar
pub fn project(dim: Dimension, body: &Aabb) -> RenderRect {
    let norm_width = dim.width / FULL_WIDTH;
    let norm_height = dim.height / FULL_HEIGHT;

    RenderRect {
        x: (RELATIVE_LINE_WIDTH * norm_width) as i64 + (body.pos.x * norm_width).floor() as i64,
        y: (GAME_INFO_HEIGHT * norm_height) as i64 + (body.pos.y * norm_height).floor() as i64,
        width: (body.width * norm_width).floor() as i64,
        height: (body.height * norm_height).floor() as i64,
    }
}
