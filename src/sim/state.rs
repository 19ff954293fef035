//! Simulation state
//!
//! Everything one simulation owns: options, services, the level set, the actor
//! and the input queue. Independent simulations share nothing.

use glam::DVec2;

use super::actor::Actor;
use super::context::SimulationContext;
use super::input::InputState;
use crate::error::SimError;
use crate::level::LevelSet;
use crate::settings::GameOptions;
use crate::window::{Dimension, project};

/// Level change requested during a slice, carried out once the platforms have committed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelTransition {
    pub level: usize,
    pub position: DVec2,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub opts: GameOptions,
    pub ctx: SimulationContext,
    pub levels: LevelSet,
    pub actor: Actor,
    pub input: InputState,
    /// Frame counter, bumped at the start of every frame
    pub tick: u64,
    /// Set by the `:q` command; the runner stops
    pub done: bool,
    /// A level was entered this frame; cleared at the start of the next one
    pub level_changed: bool,
    pub pending_transition: Option<LevelTransition>,
    pub loop_start_time: f64,
    /// Length of the current frame in ms
    pub loop_delta: f64,
    pub deaths: u32,
    /// Render surface; `None` skips projection entirely
    pub dim: Option<Dimension>,
}

impl GameState {
    pub fn new(opts: GameOptions, levels: LevelSet, ctx: SimulationContext) -> Self {
        let spawn = levels.active_level().initial_position;
        let actor = Actor::new(&opts.actor, spawn);
        let mut state = Self {
            opts,
            ctx,
            levels,
            actor,
            input: InputState::new(),
            tick: 0,
            done: false,
            level_changed: false,
            pending_transition: None,
            loop_start_time: 0.0,
            loop_delta: 0.0,
            deaths: 0,
            dim: None,
        };
        state.reset();
        state
    }

    /// Fresh actor at the active level's spawn point
    pub fn reset(&mut self) {
        let spawn = self.levels.active_level().initial_position;
        self.actor = Actor::new(&self.opts.actor, spawn);
        self.actor.changing_levels = true;
        self.level_changed = true;
        self.pending_transition = None;
        self.loop_start_time = self.ctx.now();
        self.loop_delta = 0.0;
        log::info!(
            "tick {}: actor spawned in level {} at ({:.2}, {:.2})",
            self.tick,
            self.levels.active_index(),
            spawn.x,
            spawn.y
        );
    }

    pub fn with_dimension(mut self, dim: Dimension) -> Self {
        self.dim = Some(dim);
        self.project_all();
        self
    }

    /// Dead for longer than the respawn delay
    pub fn should_respawn(&self) -> bool {
        self.actor.dead
            && self.loop_start_time - self.actor.dead_at > self.opts.actor.respawn_delay_ms
    }

    /// Switch levels. The entered level remembers `position` as its spawn point.
    pub fn change_level(&mut self, transition: LevelTransition) -> Result<(), SimError> {
        let from = self.levels.active_index();
        let level = self.levels.set_active(transition.level)?;
        level.initial_position = transition.position;

        self.actor.physics.teleport(transition.position);
        self.actor.carry.clear();
        self.actor.changing_levels = true;
        self.level_changed = true;
        self.project_all();

        log::info!(
            "tick {}: level {} -> {} at ({:.2}, {:.2})",
            self.tick,
            from,
            transition.level,
            transition.position.x,
            transition.position.y
        );
        Ok(())
    }

    /// Unfreeze the actor one frame after a level change
    pub fn clear_level_change(&mut self) {
        self.level_changed = false;
        self.actor.changing_levels = false;
        self.actor.carry.clear();
        self.project_all();
    }

    /// Refresh every render rectangle from the committed boxes
    pub fn project_all(&mut self) {
        let Some(dim) = self.dim else {
            return;
        };
        for platform in &mut self.levels.active_level_mut().platforms {
            platform.projection = project(dim, platform.body());
        }
        self.actor.projection = project(dim, &self.actor.physics.current().body);
    }
}
