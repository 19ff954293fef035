//! Frame scheduler
//!
//! One frame covers `loop_delta` ms of game time:
//! 1. updateables run once with the full delta
//! 2. the delta is cut into slices of at most `tick_time_ms`; each slice runs
//!    update, then check, then apply across every applyable
//! 3. every subsystem gets a `tick_clear`
//!
//! Update writes only `next` buffers, check only reads, apply commits.

use super::state::GameState;
use super::{actor, circuit, collision, movement};
use crate::error::SimError;

/// A participant in the frame. Every phase defaults to doing nothing.
pub trait Subsystem {
    fn name(&self) -> &'static str;

    fn update(&self, _state: &mut GameState, _delta: f64) -> Result<(), SimError> {
        Ok(())
    }

    fn check(&self, _state: &mut GameState) -> Result<(), SimError> {
        Ok(())
    }

    fn apply(&self, _state: &mut GameState) -> Result<(), SimError> {
        Ok(())
    }

    fn tick_clear(&self, _state: &mut GameState) -> Result<(), SimError> {
        Ok(())
    }
}

/// Anything that wants a callback once per frame
pub trait FrameTick {
    fn tick(&mut self, state: &mut GameState) -> Result<(), SimError>;
}

/// Stamps the input queue with the frame and drops released keys at the end
#[derive(Debug, Default)]
pub struct InputSystem;

impl Subsystem for InputSystem {
    fn name(&self) -> &'static str {
        "input"
    }

    fn update(&self, state: &mut GameState, _delta: f64) -> Result<(), SimError> {
        state.input.begin_tick(state.tick);
        Ok(())
    }

    fn tick_clear(&self, state: &mut GameState) -> Result<(), SimError> {
        state.input.tick_clear();
        Ok(())
    }
}

/// Key-driven actor transitions
#[derive(Debug, Default)]
pub struct ActorInputSystem;

impl Subsystem for ActorInputSystem {
    fn name(&self) -> &'static str {
        "actor-input"
    }

    fn update(&self, state: &mut GameState, _delta: f64) -> Result<(), SimError> {
        if state.actor.dead {
            return Ok(());
        }
        movement::update(state)
    }
}

/// Active level's platforms: circuit motion and commit
#[derive(Debug, Default)]
pub struct LevelSystem;

impl Subsystem for LevelSystem {
    fn name(&self) -> &'static str {
        "level"
    }

    fn update(&self, state: &mut GameState, delta: f64) -> Result<(), SimError> {
        circuit::update(state.levels.active_level_mut(), delta)
    }

    fn apply(&self, state: &mut GameState) -> Result<(), SimError> {
        circuit::commit(state.levels.active_level_mut());
        if let Some(dim) = state.dim {
            for platform in &mut state.levels.active_level_mut().platforms {
                platform.projection = crate::window::project(dim, platform.body());
            }
        }
        Ok(())
    }
}

/// Actor physics, collisions and level transitions
#[derive(Debug, Default)]
pub struct ActorSystem;

impl Subsystem for ActorSystem {
    fn name(&self) -> &'static str {
        "actor"
    }

    fn update(&self, state: &mut GameState, delta: f64) -> Result<(), SimError> {
        actor::update(state, delta)
    }

    fn check(&self, state: &mut GameState) -> Result<(), SimError> {
        collision::check(state);
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<(), SimError> {
        collision::resolve(state);

        let tick = state.tick;
        let actor = &mut state.actor;
        actor.physics.commit();
        if let Some(dim) = state.dim {
            actor.projection = crate::window::project(dim, &actor.physics.current().body);
        }

        if actor.portal.portaling && actor.portal.resolved_tick != Some(tick) {
            if let Some(level) = actor.portal.to {
                if level != state.levels.active_index() {
                    state.pending_transition = Some(super::state::LevelTransition {
                        level,
                        position: actor.position(),
                    });
                }
            }
            actor.portal.resolved_tick = Some(tick);
        }

        if let Some(transition) = state.pending_transition.take() {
            state.change_level(transition)?;
        }
        Ok(())
    }

    fn tick_clear(&self, state: &mut GameState) -> Result<(), SimError> {
        actor::tick_clear(state);
        Ok(())
    }
}

/// Splits a frame delta into slices no longer than `max`. Every slice but the
/// last is exactly `max`; the last is `delta` minus what was already emitted,
/// so summing the slices in order gives back `delta` exactly.
#[derive(Debug, Clone, Copy)]
pub struct Slices {
    delta: f64,
    emitted: f64,
    max: f64,
}

impl Iterator for Slices {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.emitted >= self.delta {
            return None;
        }
        let rest = self.delta - self.emitted;
        if self.max > 0.0 && rest > self.max {
            self.emitted += self.max;
            return Some(self.max);
        }
        self.emitted = self.delta;
        Some(rest)
    }
}

pub fn slices(delta: f64, max: f64) -> Slices {
    Slices {
        delta,
        emitted: 0.0,
        max,
    }
}

/// Ordered subsystem lists. Order within each list is execution order.
pub struct Scheduler {
    updateables: Vec<Box<dyn Subsystem>>,
    applyables: Vec<Box<dyn Subsystem>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::standard()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            updateables: Vec::new(),
            applyables: Vec::new(),
        }
    }

    /// Input, then the level's platforms before the actor
    pub fn standard() -> Self {
        let mut scheduler = Self::new();
        scheduler.add_updateable(InputSystem);
        scheduler.add_updateable(ActorInputSystem);
        scheduler.add_applyable(LevelSystem);
        scheduler.add_applyable(ActorSystem);
        scheduler
    }

    pub fn add_updateable(&mut self, system: impl Subsystem + 'static) {
        self.updateables.push(Box::new(system));
    }

    pub fn add_applyable(&mut self, system: impl Subsystem + 'static) {
        self.applyables.push(Box::new(system));
    }

    pub fn clear(&mut self) {
        self.updateables.clear();
        self.applyables.clear();
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.updateables
            .iter()
            .chain(&self.applyables)
            .map(|s| s.name())
    }

    /// Run one frame of `state.loop_delta` ms
    pub fn frame(&self, state: &mut GameState) -> Result<(), SimError> {
        let delta = state.loop_delta;
        state.tick += 1;

        if state.should_respawn() {
            state.reset();
            return Ok(());
        }
        if state.level_changed {
            state.clear_level_change();
        }

        for system in &self.updateables {
            system.update(state, delta)?;
        }

        for slice in slices(delta, state.opts.tick_time_ms) {
            for system in &self.applyables {
                system.update(state, slice)?;
            }
            for system in &self.applyables {
                system.check(state)?;
            }
            for system in &self.applyables {
                system.apply(state)?;
            }
        }

        for system in self.updateables.iter().chain(&self.applyables) {
            system.tick_clear(state)?;
        }
        Ok(())
    }
}

impl FrameTick for Scheduler {
    fn tick(&mut self, state: &mut GameState) -> Result<(), SimError> {
        self.frame(state)
    }
}
