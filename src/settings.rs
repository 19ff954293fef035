//! Tunable game options
//!
//! Persisted as JSON next to level sets. Every field has a default so partial
//! files are accepted.

use std::fs;
use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::sim::rng::{Mulberry32, SimRange};

/// Targeted horizontal motion (w/b/f/F/t/T)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashOptions {
    /// Full dash speed in cells per second
    pub norm_width: f64,
    pub distance: f64,
    pub ease_range: f64,
}

impl Default for DashOptions {
    fn default() -> Self {
        Self {
            norm_width: 70.0,
            distance: 5.0,
            ease_range: 0.10,
        }
    }
}

/// Vertical row jumps (j/k)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JumpOptions {
    pub ease_range: f64,
    /// Full jump speed in rows per second
    pub norm_height: f64,
    /// Lockout after a jump: `rows * no_jump_multiplier + no_jump_base` ms
    pub no_jump_base: f64,
    pub no_jump_multiplier: f64,
}

impl Default for JumpOptions {
    fn default() -> Self {
        Self {
            ease_range: 0.10,
            norm_height: 70.0,
            no_jump_base: 450.0,
            no_jump_multiplier: 350.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActorOptions {
    /// Spawn grace period (ms) with collisions suppressed
    pub hodl_time: f64,
    /// h/l walking speed in cells per second
    pub norm_widths_per_second: f64,
    /// Time a dead actor stays dead before respawning (ms)
    pub respawn_delay_ms: f64,
    pub dash: DashOptions,
    pub jump: JumpOptions,
}

impl Default for ActorOptions {
    fn default() -> Self {
        Self {
            hodl_time: 500.0,
            norm_widths_per_second: 16.0,
            respawn_delay_ms: 1000.0,
            dash: DashOptions::default(),
            jump: JumpOptions::default(),
        }
    }
}

/// How far a dash may clip into an obstacle's top/bottom edge and still hop it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tolerance {
    pub top_by: f64,
    pub bottom_by: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            top_by: 0.15,
            bottom_by: 0.15,
        }
    }
}

/// Game options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameOptions {
    // === Timing ===
    /// Outer frame length (ms)
    #[serde(rename = "frameTimeMS")]
    pub frame_time_ms: f64,
    /// Largest physics slice (ms)
    #[serde(rename = "tickTimeMS")]
    pub tick_time_ms: f64,

    // === Movement ===
    pub actor: ActorOptions,
    pub tolerance: Tolerance,
    /// Cells per second squared, y points down
    pub gravity: DVec2,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            frame_time_ms: 16.0,
            tick_time_ms: 8.0,
            actor: ActorOptions::default(),
            tolerance: Tolerance::default(),
            gravity: DVec2::new(0.0, 28.0),
        }
    }
}

impl GameOptions {
    /// Fuzz configuration drawn from the seeded generator
    pub fn randomized(rng: &mut Mulberry32) -> Self {
        let frame_time_ms = rng.rand_range(50.0, 2.0) as f64;
        let tick_time_ms = rng.rand_range(50.0, 2.0) as f64;

        let actor = ActorOptions {
            hodl_time: rng.rand_range(1000.0, 0.0) as f64,
            norm_widths_per_second: rng.rand_range(20.0, 1.0) as f64,
            respawn_delay_ms: 1000.0,
            dash: DashOptions {
                norm_width: rng.rand_range(50.0, 1.0) as f64,
                distance: rng.rand_range(15.0, 0.0) as f64,
                ease_range: rng.rand() * 5.0,
            },
            jump: JumpOptions {
                ease_range: rng.rand() * 5.0,
                norm_height: rng.rand_range(50.0, 1.0) as f64,
                no_jump_base: rng.rand_range(1000.0, 0.0) as f64,
                no_jump_multiplier: rng.rand_range(1000.0, 0.0) as f64,
            },
        };

        let tolerance = Tolerance {
            top_by: rng.rand() * 0.45,
            bottom_by: rng.rand() * 0.45,
        };

        Self {
            frame_time_ms,
            tick_time_ms,
            actor,
            tolerance,
            gravity: DVec2::new(0.0, rng.rand_range(48.0, 2.0) as f64),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = fs::read_to_string(path.as_ref())?;
        let opts = serde_json::from_str(&json)?;
        log::info!("Loaded game options from {}", path.as_ref().display());
        Ok(opts)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        fs::write(path.as_ref(), serde_json::to_string_pretty(self)?)?;
        log::info!("Game options saved to {}", path.as_ref().display());
        Ok(())
    }
}

/// Fuzz driver tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimOptions {
    /// Jump row modifiers are drawn from `0..max_jump`
    pub max_jump: u32,
    /// Pause after a key is released (ms)
    pub wait_range: SimRange,
    /// How long a key stays down (ms)
    pub hold_range: SimRange,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            max_jump: 15,
            wait_range: SimRange::new(100.0, 500.0),
            hold_range: SimRange::new(100.0, 1500.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let opts: GameOptions =
            serde_json::from_str(r#"{"tickTimeMS": 4, "actor": {"hodlTime": 0}}"#).unwrap();
        assert_eq!(opts.tick_time_ms, 4.0);
        assert_eq!(opts.frame_time_ms, 16.0);
        assert_eq!(opts.actor.hodl_time, 0.0);
        assert_eq!(opts.actor.dash, DashOptions::default());
        assert_eq!(opts.gravity, DVec2::new(0.0, 28.0));
    }

    #[test]
    fn randomized_is_seed_stable_and_in_range() {
        let a = GameOptions::randomized(&mut Mulberry32::new(42));
        let b = GameOptions::randomized(&mut Mulberry32::new(42));
        assert_eq!(a, b);
        assert!((2.0..50.0).contains(&a.frame_time_ms));
        assert!((2.0..50.0).contains(&a.tick_time_ms));
        assert!(a.tick_time_ms > 0.0);
        assert!((2.0..48.0).contains(&a.gravity.y));
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = std::env::temp_dir().join(format!("titan-opts-{}.json", std::process::id()));
        let mut opts = GameOptions::default();
        opts.actor.hodl_time = 123.0;
        opts.save(&path).unwrap();
        let loaded = GameOptions::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, opts);
    }
}
