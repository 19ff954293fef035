//! Error types
//!
//! Two tiers: `ValidationError` for bad level data caught at load time, and
//! `SimError` for fatal invariant violations that stop a run.

use std::io;

use thiserror::Error;

use crate::level::PlatformId;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("platform {id} carries more than one `{tag}` behavior")]
    DuplicateBehavior { id: PlatformId, tag: &'static str },

    #[error("platform {id} cannot be both an obstacle and instagib")]
    ObstacleInstaGib { id: PlatformId },

    #[error("portal platform {id} cannot also be `{tag}`")]
    PortalConflict { id: PlatformId, tag: &'static str },

    #[error("portal platform {id} points at missing platform {to}")]
    PortalTargetMissing { id: PlatformId, to: PlatformId },

    #[error("portal platform {id} points at platform {to}, which is not a portal")]
    PortalTargetNotPortal { id: PlatformId, to: PlatformId },

    #[error("portal platform {id} normal has magnitude {magnitude}, expected 1")]
    PortalNormal { id: PlatformId, magnitude: f64 },

    #[error("lazer platform {id} is {width}x{height}, lazers must be 1x1")]
    LazerSize {
        id: PlatformId,
        width: f64,
        height: f64,
    },

    #[error("powerup platform {id} is {width}x{height}, powerups must be 2x1")]
    PowerUpSize {
        id: PlatformId,
        width: f64,
        height: f64,
    },

    #[error("platform id {id} is used more than once")]
    DuplicatePlatformId { id: PlatformId },

    #[error("platform id {id} leaves no room for further ids")]
    PlatformIdOverflow { id: PlatformId },

    #[error("initial level {initial} is out of range for {count} levels")]
    InitialLevelOutOfRange { initial: usize, count: usize },

    #[error("level set has no levels")]
    NoLevels,

    #[error("malformed geometry: width {width}, height {height}")]
    Geometry { width: f64, height: f64 },
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("platform {0} does not exist in the level set")]
    PlatformNotFound(PlatformId),

    #[error("level {to} does not exist ({count} levels loaded)")]
    LevelNotFound { to: usize, count: usize },

    #[error("invalid level data: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{failed} of {runs} batch runs failed")]
    BatchFailed { failed: u32, runs: u32 },
}
