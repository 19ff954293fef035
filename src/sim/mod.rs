//! Deterministic simulation module
//!
//! All movement and collision logic lives here. This module must be pure and deterministic:
//! - Time only advances through the loop driver's delta
//! - Seeded RNG only, owned by the state's context
//! - Stable iteration order (platform list order)
//! - No rendering dependencies; projection is opt-in

pub mod actor;
pub mod circuit;
pub mod collision;
pub mod context;
pub mod driver;
pub mod input;
pub mod movement;
pub mod rng;
pub mod runner;
pub mod state;
pub mod tick;

pub use actor::{Actor, AxisMotion, PlatformCarry, PortalState};
pub use collision::{Contact, ContactKind, Side};
pub use context::{IdAllocator, SimulationContext};
pub use driver::SimDriver;
pub use input::{InputKind, InputMode, InputState, KeyEvent, KeyEventKind, TargetMotion};
pub use rng::{Mulberry32, SimRange};
pub use runner::{RunSummary, StopReason, run};
pub use state::{GameState, LevelTransition};
pub use tick::{FrameTick, Scheduler, Subsystem, slices};
