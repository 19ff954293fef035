//! Titan Sim - deterministic platform movement simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor movement, collisions, scheduling, fuzz driver)
//! - `level`: Platforms, behaviors, levels and level sets
//! - `math`: AABB and easing helpers on top of `glam::DVec2`
//! - `platform`: Clocks and loop drivers (frame-paced or virtual time)
//! - `persistence`: Level set save/load with validation
//! - `settings`: Tunable game options

pub mod error;
pub mod level;
pub mod math;
pub mod persistence;
pub mod physics;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod window;

pub use error::{SimError, ValidationError};
pub use settings::{GameOptions, SimOptions};

/// Game configuration constants
pub mod consts {
    /// Playable board width in grid cells
    pub const GAME_WIDTH: usize = 32;
    /// Playable board height in grid cells
    pub const GAME_HEIGHT: usize = 24;
    /// Line-number gutter on the left of the board
    pub const RELATIVE_LINE_WIDTH: f64 = 2.0;
    /// Info bar above the board
    pub const GAME_INFO_HEIGHT: f64 = 2.0;
    pub const FULL_WIDTH: f64 = GAME_WIDTH as f64 + RELATIVE_LINE_WIDTH;
    pub const FULL_HEIGHT: f64 = GAME_HEIGHT as f64 + GAME_INFO_HEIGHT;

    /// Actor box size in grid units
    pub const ACTOR_WIDTH: f64 = 0.5;
    pub const ACTOR_HEIGHT: f64 = 1.0;

    /// Below this y (board height + 3) the actor is considered fallen out
    pub const FALL_OUT_MARGIN: f64 = 3.0;

    /// Axis value in a level-change destination meaning "keep the actor's coordinate"
    pub const LEVEL_POSITION_SENTINEL: f64 = -69.0;

    /// Jump row counts are clamped to this range
    pub const MIN_JUMP_ROWS: u32 = 1;
    pub const MAX_JUMP_ROWS: u32 = 15;

    /// Added to corrected dash/jump velocity so the next step lands in the easing branch
    pub const EASE_ENTRY_BONUS: f64 = 0.01;

    /// `t` stops this far before the target letter, `T` this far after it
    pub const TILL_OFFSET: f64 = 0.01;
    pub const TILL_BACK_OFFSET: f64 = 1.01;

    /// Portal normals must be unit length within this tolerance
    pub const PORTAL_NORMAL_TOLERANCE: f64 = 0.001;

    /// Synchronous frames before the runner yields back to its loop driver
    pub const YIELD_EVERY_FRAMES: u32 = 500;
}
