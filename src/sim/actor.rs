//! The controllable actor
//!
//! Holds the movement sub-states and the per-slice position update. At most
//! one of jumping, dashing and portaling is active; the `start_*` methods keep
//! it that way.

use glam::DVec2;

use super::collision::Contact;
use super::input::TargetMotion;
use super::state::GameState;
use crate::consts::{ACTOR_HEIGHT, ACTOR_WIDTH, EASE_ENTRY_BONUS, FALL_OUT_MARGIN, FULL_HEIGHT};
use crate::error::SimError;
use crate::level::PlatformId;
use crate::math::Aabb;
use crate::physics::Physics;
use crate::settings::ActorOptions;
use crate::window::RenderRect;

/// Eased motion toward an exact distance along one axis (dash on x, jump on y)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisMotion {
    pub active: bool,
    pub distance: f64,
    /// Axis coordinate latched on the first step
    pub start: Option<f64>,
    pub dir: i8,
    /// Lockout in ms, counts down every update
    pub cooldown: f64,
}

impl AxisMotion {
    fn idle() -> Self {
        Self {
            dir: 1,
            ..Self::default()
        }
    }

    fn begin(distance: f64, dir: i8, cooldown: f64) -> Self {
        Self {
            active: true,
            distance,
            start: None,
            dir,
            cooldown,
        }
    }

    /// Velocity for this step. Full speed until the remaining distance would drop
    /// under `ease_range`, then one corrected step that lands just inside it, then
    /// a slow crawl of `2 * ease_range` per second. `active` turns off once
    /// nothing remains, evaluated before this step's velocity is applied.
    pub fn step(&mut self, pos: f64, ease_range: f64, norm_speed: f64, dt: f64) -> f64 {
        let start = *self.start.get_or_insert(pos);
        let dir = f64::from(self.dir);
        let remaining = self.distance - (pos - start).abs();
        let easing = remaining <= ease_range;

        let mut vel = dir * norm_speed;
        if easing {
            vel = dir * ease_range * 2.0;
        } else if remaining - (vel * dt).abs() <= ease_range {
            vel = dir * ((remaining - ease_range) / dt + EASE_ENTRY_BONUS);
        }

        self.active = remaining > 0.0;
        vel
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortalState {
    pub portaling: bool,
    /// Level holding the destination portal, once resolved
    pub to: Option<usize>,
    /// Tick in which the teleport was committed
    pub resolved_tick: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetState {
    pub motion: TargetMotion,
    pub start_tick: u64,
}

/// Weak link to the platform carrying the actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformCarry {
    pub platform: Option<PlatformId>,
    pub tick: u64,
}

impl PlatformCarry {
    pub fn clear(&mut self) {
        self.platform = None;
    }
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub physics: Physics,
    pub jump: AxisMotion,
    pub dash: AxisMotion,
    pub portal: PortalState,
    /// Spawn lock in ms; collisions are suppressed while positive
    pub hodl_time: f64,
    pub target: TargetState,
    pub carry: PlatformCarry,
    pub dead: bool,
    pub dead_at: f64,
    pub changing_levels: bool,
    pub projection: RenderRect,
    /// Contacts found by the last check phase, resolved in apply
    pub contacts: Vec<Contact>,
}

impl Actor {
    pub fn new(opts: &ActorOptions, pos: DVec2) -> Self {
        Self {
            physics: Physics::new(Aabb::new(pos, ACTOR_WIDTH, ACTOR_HEIGHT)),
            jump: AxisMotion::idle(),
            dash: AxisMotion::idle(),
            portal: PortalState::default(),
            hodl_time: opts.hodl_time,
            target: TargetState {
                motion: TargetMotion::Find,
                start_tick: 0,
            },
            carry: PlatformCarry::default(),
            dead: false,
            dead_at: 0.0,
            changing_levels: false,
            projection: RenderRect::default(),
            contacts: Vec::new(),
        }
    }

    pub fn position(&self) -> DVec2 {
        self.physics.current().body.pos
    }

    /// Letter-map row under the actor's vertical center
    pub fn row(&self) -> i64 {
        let body = &self.physics.current().body;
        (body.pos.y + body.height / 2.0).floor() as i64
    }

    pub fn next_row(&self) -> i64 {
        let body = &self.physics.next.body;
        (body.pos.y + body.height / 2.0).floor() as i64
    }

    pub fn next_col(&self) -> i64 {
        self.physics.next.body.pos.x.floor() as i64
    }

    /// Dashing or jumping: the actor is moving under its own power
    pub fn is_moving(&self) -> bool {
        self.dash.active || self.jump.active
    }

    pub fn reset_jump(&mut self) {
        self.physics.next.vel.y = 0.0;
        self.jump = AxisMotion::idle();
    }

    pub fn reset_dash(&mut self) {
        self.dash = AxisMotion::idle();
    }

    pub fn reset_portal(&mut self) {
        self.portal = PortalState::default();
    }

    pub fn reset_vel2(&mut self) {
        self.physics.next.vel2 = DVec2::ZERO;
    }

    pub fn start_dash(&mut self, distance: f64, dir: i8) {
        self.reset_jump();
        self.reset_portal();
        self.reset_vel2();
        self.dash = AxisMotion::begin(distance, dir, self.dash.cooldown);
        log::debug!("dash {:.3} cells, dir {}", distance, dir);
    }

    pub fn start_jump(&mut self, distance: f64, dir: i8, cooldown: f64) {
        self.reset_dash();
        self.reset_portal();
        self.reset_vel2();
        self.jump = AxisMotion::begin(distance, dir, cooldown);
        log::debug!("jump {:.3} rows, dir {}", distance, dir);
    }

    pub fn start_portal(&mut self) {
        self.reset_jump();
        self.reset_dash();
        self.reset_vel2();
        self.portal = PortalState {
            portaling: true,
            to: None,
            resolved_tick: None,
        };
    }
}

/// Per-slice actor update; writes only the `next` buffer
pub fn update(state: &mut GameState, delta: f64) -> Result<(), SimError> {
    let actor = &mut state.actor;
    if actor.dead || delta == 0.0 || actor.changing_levels {
        return Ok(());
    }

    if actor.hodl_time > 0.0 {
        actor.hodl_time -= delta;
        return Ok(());
    }

    update_position(state, delta)
}

fn update_position(state: &mut GameState, delta: f64) -> Result<(), SimError> {
    let dt = delta / 1000.0;

    {
        let actor = &mut state.actor;
        actor.jump.cooldown -= delta;
        actor.dash.cooldown -= delta;
    }

    if resolve_portal(state)? {
        // teleport owns this slice
    } else if state.actor.dash.active {
        let opts = state.opts.actor.dash;
        let actor = &mut state.actor;
        let x = actor.physics.current().body.pos.x;
        actor.physics.next.vel.x = actor.dash.step(x, opts.ease_range, opts.norm_width, dt);
    } else if state.actor.jump.active {
        let opts = state.opts.actor.jump;
        let actor = &mut state.actor;
        let y = actor.physics.current().body.pos.y;
        actor.physics.next.vel.y = actor.jump.step(y, opts.ease_range, opts.norm_height, dt);
    } else {
        state.actor.physics.next.vel += state.opts.gravity * dt;
        stay_on_moving_platform(state);
    }

    state.actor.physics.next.integrate(dt);
    Ok(())
}

/// Teleport through the portal under the actor. Returns whether portaling owned this slice.
fn resolve_portal(state: &mut GameState) -> Result<bool, SimError> {
    let tick = state.tick;
    let actor = &state.actor;
    if !actor.portal.portaling || actor.portal.resolved_tick == Some(tick) {
        return Ok(false);
    }

    let body = actor.physics.current().body;
    let target = state
        .levels
        .active_level()
        .platforms
        .iter()
        .filter(|p| p.body().intersects(&body))
        .find_map(|p| p.behaviors.portal().map(|portal| (p.id, portal.to)));

    let Some((from, to)) = target else {
        log::debug!("tick {}: portal fizzled, nothing under the actor", tick);
        state.actor.reset_portal();
        return Ok(true);
    };

    let slot = state.levels.locate(to)?;
    let dest = state.levels.platform(to)?;
    let normal = dest
        .behaviors
        .portal()
        .ok_or(SimError::PlatformNotFound(to))?
        .normal;
    let center = dest.body().center();

    let actor = &mut state.actor;
    let exit_speed = actor.physics.current().total_velocity().length();
    actor.reset_jump();
    actor.reset_dash();
    actor.carry.clear();
    actor.portal.to = Some(slot.level);
    actor.physics.next.body.pos = center;
    actor.physics.next.vel2 = normal * exit_speed;

    log::debug!(
        "tick {}: portal {} -> {} (level {}), exit speed {:.3}",
        tick,
        from,
        to,
        slot.level,
        exit_speed
    );
    Ok(true)
}

/// End-of-frame: fall-out death and portal reset
pub fn tick_clear(state: &mut GameState) {
    let actor = &mut state.actor;
    if !actor.dead && actor.position().y > FULL_HEIGHT + FALL_OUT_MARGIN {
        actor.dead = true;
        actor.dead_at = state.ctx.now();
        state.deaths += 1;
        log::info!("tick {}: actor fell out of the level", state.tick);
    }
    if actor.portal.portaling {
        actor.reset_portal();
    }
}

/// Keep a carried actor flush on a platform that moved out from under it
fn stay_on_moving_platform(state: &mut GameState) {
    let carry = state.actor.carry;
    let Some(id) = carry.platform else {
        return;
    };
    if state.tick > carry.tick + 1 || state.actor.is_moving() {
        return;
    }

    let Ok(platform) = state.levels.platform(id) else {
        state.actor.carry.clear();
        return;
    };
    let surface = *platform.next_body();
    let body = &mut state.actor.physics.next.body;
    if surface.intersects(body) {
        return;
    }
    body.pos.y = surface.pos.y - body.height;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Behavior, Level, LevelSet, Platform, Portal};
    use crate::settings::GameOptions;
    use crate::sim::context::SimulationContext;

    fn state_with(platforms: Vec<Platform>, start: DVec2) -> GameState {
        let levels =
            LevelSet::new("test", 1, 0, vec![Level::new(platforms, start)]).unwrap();
        let mut opts = GameOptions::default();
        opts.actor.hodl_time = 0.0;
        let mut state = GameState::new(opts, levels, SimulationContext::seeded(1));
        state.clear_level_change();
        state
    }

    #[test]
    fn dash_converges_on_target() {
        let mut motion = AxisMotion::begin(5.0, 1, 0.0);
        let mut pos = 0.0;
        let dt = 0.008;
        for _ in 0..2000 {
            if !motion.active {
                break;
            }
            pos += motion.step(pos, 0.1, 70.0, dt) * dt;
        }
        assert!(!motion.active);
        assert!((pos - 5.0).abs() < 0.02, "ended at {pos}");
    }

    #[test]
    fn corrected_step_lands_inside_ease_range() {
        let mut motion = AxisMotion::begin(1.0, 1, 0.0);
        let dt = 0.008;
        // 0.56 per step at full speed: first step full, second corrected
        let v1 = motion.step(0.0, 0.1, 70.0, dt);
        assert_eq!(v1, 70.0);
        let pos = v1 * dt;
        let v2 = motion.step(pos, 0.1, 70.0, dt);
        let landed = pos + v2 * dt;
        let remaining = 1.0 - landed;
        assert!(remaining < 0.1 && remaining > 0.09, "remaining {remaining}");
        let v3 = motion.step(landed, 0.1, 70.0, dt);
        assert!((v3 - 0.2).abs() < 1e-12);
    }

    #[test]
    fn starting_a_motion_clears_the_others() {
        let mut actor = Actor::new(&ActorOptions::default(), DVec2::ZERO);
        actor.start_portal();
        actor.physics.next.vel2 = DVec2::new(3.0, 0.0);
        actor.start_dash(2.0, 1);
        assert!(actor.dash.active && !actor.jump.active && !actor.portal.portaling);
        assert_eq!(actor.physics.next.vel2, DVec2::ZERO);

        actor.start_jump(3.0, -1, 500.0);
        assert!(actor.jump.active && !actor.dash.active && !actor.portal.portaling);

        actor.start_portal();
        assert!(actor.portal.portaling && !actor.jump.active && !actor.dash.active);
    }

    #[test]
    fn hodl_blocks_movement_until_spent() {
        let mut state = state_with(Vec::new(), DVec2::new(4.0, 4.0));
        state.actor.hodl_time = 10.0;
        update(&mut state, 8.0).unwrap();
        assert_eq!(state.actor.physics.next.vel, DVec2::ZERO);
        update(&mut state, 8.0).unwrap();
        assert_eq!(state.actor.physics.next.vel, DVec2::ZERO);
        assert!(state.actor.hodl_time <= 0.0);
        update(&mut state, 8.0).unwrap();
        assert!(state.actor.physics.next.vel.y > 0.0);
    }

    #[test]
    fn cooldowns_tick_down_during_motion() {
        let mut state = state_with(Vec::new(), DVec2::new(4.0, 4.0));
        state.actor.start_jump(3.0, -1, 100.0);
        state.actor.dash.cooldown = 50.0;
        update(&mut state, 8.0).unwrap();
        assert_eq!(state.actor.jump.cooldown, 92.0);
        assert_eq!(state.actor.dash.cooldown, 42.0);
    }

    #[test]
    fn portal_preserves_speed_and_redirects() {
        let normal = DVec2::new(0.6, -0.8);
        let a = Platform::new(PlatformId(0), Aabb::new(DVec2::new(2.0, 5.0), 1.0, 1.0))
            .with(Behavior::Portal(Portal {
                to: PlatformId(1),
                normal: DVec2::X,
            }))
            .unwrap();
        let b = Platform::new(PlatformId(1), Aabb::new(DVec2::new(20.0, 5.0), 1.0, 1.0))
            .with(Behavior::Portal(Portal {
                to: PlatformId(0),
                normal,
            }))
            .unwrap();
        let mut state = state_with(vec![a, b], DVec2::new(2.25, 5.0));
        state.actor.start_portal();

        // moving actor arriving at the portal
        state.actor.physics.next.vel = DVec2::new(3.0, 4.0);
        state.actor.physics.commit();
        let entry = state.actor.physics.current().total_velocity().length();

        assert!(resolve_portal(&mut state).unwrap());
        let actor = &state.actor;
        assert_eq!(actor.physics.next.body.pos, DVec2::new(20.5, 5.5));
        assert_eq!(actor.portal.to, Some(0));
        let exit = actor.physics.next.vel2;
        assert!((exit.length() - entry).abs() < 1e-9);
        assert!((exit.normalize() - normal).length() < 1e-9);
    }

    #[test]
    fn portal_without_a_portal_underneath_fizzles() {
        let mut state = state_with(Vec::new(), DVec2::new(4.0, 4.0));
        state.actor.start_portal();
        assert!(resolve_portal(&mut state).unwrap());
        assert!(!state.actor.portal.portaling);
        assert_eq!(state.actor.physics.next.body.pos, DVec2::new(4.0, 4.0));
    }

    #[test]
    fn portal_waits_until_the_resolution_tick_changes() {
        let mut state = state_with(Vec::new(), DVec2::new(4.0, 4.0));
        state.actor.start_portal();
        state.actor.portal.resolved_tick = Some(state.tick);
        assert!(!resolve_portal(&mut state).unwrap());
        assert!(state.actor.portal.portaling);
    }
}
