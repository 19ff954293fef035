//! Actor vs platform collision
//!
//! `check` runs in the check phase and only records what the actor touches.
//! `resolve` runs in the actor's apply phase and moves it out of the platforms.

use glam::DVec2;

use super::actor::Actor;
use super::state::{GameState, LevelTransition};
use crate::consts::LEVEL_POSITION_SENTINEL;
use crate::level::{NextLevel, PlatformId};
use crate::math::Aabb;
use crate::settings::Tolerance;

/// Which face of the platform the actor approached from, judged on committed positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Horizontal sides win when the approach is diagonal
    pub fn classify(actor: &Aabb, platform: &Aabb) -> Option<Side> {
        if actor.left_of(platform) {
            Some(Side::Left)
        } else if actor.right_of(platform) {
            Some(Side::Right)
        } else if actor.top_of(platform) {
            Some(Side::Top)
        } else if actor.bottom_of(platform) {
            Some(Side::Bottom)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContactKind {
    Obstacle { side: Option<Side> },
    NextLevel(NextLevel),
    InstaGib,
}

/// Snapshot of one overlap taken during the check phase
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub platform: PlatformId,
    pub kind: ContactKind,
    /// Platform's box for this slice
    pub body: Aabb,
    /// How far the platform moved this slice
    pub displacement: DVec2,
}

/// Record every platform the actor's next box overlaps. Obstacle wins over
/// next-level, which wins over instagib; other platforms are not contacts.
pub fn check(state: &mut GameState) {
    let actor = &mut state.actor;
    actor.contacts.clear();
    if actor.hodl_time > 0.0 || actor.changing_levels || actor.dead {
        return;
    }
    // next box is already in another level's coordinates
    if actor
        .portal
        .to
        .is_some_and(|level| level != state.levels.active_index())
    {
        return;
    }

    let current = actor.physics.current().body;
    let next = actor.physics.next.body;
    for platform in &state.levels.active_level().platforms {
        if !platform.next_body().intersects(&next) {
            continue;
        }

        let behaviors = &platform.behaviors;
        let kind = if behaviors.is_obstacle() {
            ContactKind::Obstacle {
                side: Side::classify(&current, platform.body()),
            }
        } else if let Some(next_level) = behaviors.next_level() {
            ContactKind::NextLevel(*next_level)
        } else if behaviors.is_instagib() {
            ContactKind::InstaGib
        } else {
            continue;
        };

        log::trace!("tick {}: contact {} {:?}", state.tick, platform.id, kind);
        actor.contacts.push(Contact {
            platform: platform.id,
            kind,
            body: *platform.next_body(),
            displacement: platform.physics.displacement(),
        });
    }
}

/// Apply recorded contacts in platform order
pub fn resolve(state: &mut GameState) {
    let contacts = std::mem::take(&mut state.actor.contacts);
    let tolerance = state.opts.tolerance;
    let tick = state.tick;

    for contact in &contacts {
        match &contact.kind {
            ContactKind::Obstacle { side } => {
                collide_platform(&mut state.actor, contact, *side, tolerance, tick);
            }
            ContactKind::InstaGib => {
                if !state.actor.dead {
                    state.actor.dead = true;
                    state.actor.dead_at = state.ctx.now();
                    state.deaths += 1;
                    log::info!("tick {}: actor killed by {}", tick, contact.platform);
                }
            }
            ContactKind::NextLevel(next_level) => {
                let mut position = state.actor.physics.next.body.pos;
                let to = next_level.to_level_position;
                if to.x != LEVEL_POSITION_SENTINEL {
                    position.x = to.x;
                }
                if to.y != LEVEL_POSITION_SENTINEL {
                    position.y = to.y;
                }
                state.actor.physics.next.body.pos = position;
                state.pending_transition = Some(LevelTransition {
                    level: next_level.to_level,
                    position,
                });
            }
        }
    }
}

fn collide_platform(
    actor: &mut Actor,
    contact: &Contact,
    side: Option<Side>,
    tolerance: Tolerance,
    tick: u64,
) {
    let plat = contact.body;
    let dashing = actor.dash.active;

    match side {
        Some(side @ (Side::Left | Side::Right)) => {
            let body = &mut actor.physics.next.body;
            if dashing && body.top_overlap_by(&plat, tolerance.top_by) {
                body.pos.y = plat.pos.y - body.height;
            } else if dashing && body.bottom_overlap_by(&plat, tolerance.bottom_by) {
                body.pos.y = plat.bottom();
            } else {
                body.pos.x = if side == Side::Left {
                    plat.pos.x - body.width
                } else {
                    plat.right()
                };
                actor.physics.next.vel.x = 0.0;
                actor.physics.next.vel2.x = 0.0;
                actor.reset_dash();
            }
        }
        Some(side @ (Side::Top | Side::Bottom)) => {
            actor.physics.next.vel.y = 0.0;
            if side == Side::Top {
                let moving = actor.is_moving();
                let body = &mut actor.physics.next.body;
                body.pos.y = plat.pos.y - body.height;
                if moving {
                    actor.carry.platform = None;
                } else {
                    body.pos.x += contact.displacement.x;
                    actor.carry.platform = Some(contact.platform);
                    actor.reset_vel2();
                }
                actor.carry.tick = tick;
            } else {
                actor.physics.next.body.pos.y = plat.bottom();
            }
            actor.reset_jump();
        }
        None => {
            log::trace!(
                "tick {}: no approach side against {}, contact skipped",
                tick,
                contact.platform
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Behavior, Level, LevelSet, Platform};
    use crate::settings::GameOptions;
    use crate::sim::context::SimulationContext;

    fn obstacle(id: u32, x: f64, y: f64, w: f64, h: f64) -> Platform {
        Platform::new(PlatformId(id), Aabb::new(DVec2::new(x, y), w, h))
            .with(Behavior::Obstacle)
            .unwrap()
    }

    fn state_with(platforms: Vec<Platform>, start: DVec2) -> GameState {
        let levels = LevelSet::new(
            "test",
            1,
            0,
            vec![
                Level::new(platforms, start),
                Level::new(Vec::new(), DVec2::new(1.0, 1.0)),
            ],
        )
        .unwrap();
        let mut opts = GameOptions::default();
        opts.actor.hodl_time = 0.0;
        let mut state = GameState::new(opts, levels, SimulationContext::seeded(7));
        state.clear_level_change();
        state
    }

    fn step_to(state: &mut GameState, pos: DVec2) {
        state.actor.physics.next.body.pos = pos;
        check(state);
        resolve(state);
    }

    #[test]
    fn test_classify_prefers_horizontal() {
        let plat = Aabb::new(DVec2::new(5.0, 5.0), 2.0, 1.0);
        let up_left = Aabb::new(DVec2::new(4.0, 3.5), 0.5, 1.0);
        assert_eq!(Side::classify(&up_left, &plat), Some(Side::Left));
        let above = Aabb::new(DVec2::new(5.5, 3.5), 0.5, 1.0);
        assert_eq!(Side::classify(&above, &plat), Some(Side::Top));
        let inside = Aabb::new(DVec2::new(5.5, 5.0), 0.5, 1.0);
        assert_eq!(Side::classify(&inside, &plat), None);
    }

    #[test]
    fn test_landing_on_obstacle() {
        let mut state = state_with(vec![obstacle(0, 0.0, 10.0, 10.0, 1.0)], DVec2::new(2.0, 8.9));
        state.actor.physics.next.vel.y = 5.0;
        step_to(&mut state, DVec2::new(2.0, 9.05));

        let next = &state.actor.physics.next;
        assert_eq!(next.body.pos.y, 9.0);
        assert_eq!(next.vel.y, 0.0);
        assert_eq!(state.actor.carry.platform, Some(PlatformId(0)));
        assert!(!state.actor.jump.active);
    }

    #[test]
    fn test_wall_stops_dash() {
        let mut state = state_with(vec![obstacle(0, 6.0, 5.0, 1.0, 3.0)], DVec2::new(5.0, 6.0));
        state.actor.start_dash(4.0, 1);
        state.actor.physics.next.vel.x = 70.0;
        step_to(&mut state, DVec2::new(5.6, 6.0));

        let next = &state.actor.physics.next;
        assert_eq!(next.body.pos.x, 5.5);
        assert_eq!(next.vel.x, 0.0);
        assert!(!state.actor.dash.active);
    }

    #[test]
    fn test_dash_hops_over_low_edge() {
        // actor's feet 0.1 below the obstacle's top
        let mut state = state_with(vec![obstacle(0, 6.0, 7.0, 1.0, 3.0)], DVec2::new(5.0, 6.1));
        state.actor.start_dash(4.0, 1);
        step_to(&mut state, DVec2::new(5.6, 6.1));

        let next = &state.actor.physics.next;
        assert_eq!(next.body.pos, DVec2::new(5.6, 6.0));
        assert!(state.actor.dash.active);
        assert!(!next.body.intersects(&Aabb::new(DVec2::new(6.0, 7.0), 1.0, 3.0)));
    }

    #[test]
    fn test_dash_slips_under_high_edge() {
        // actor's head 0.1 above the obstacle's bottom
        let mut state = state_with(vec![obstacle(0, 6.0, 2.0, 1.0, 3.0)], DVec2::new(5.0, 4.9));
        state.actor.start_dash(4.0, 1);
        step_to(&mut state, DVec2::new(5.6, 4.9));

        assert_eq!(state.actor.physics.next.body.pos, DVec2::new(5.6, 5.0));
        assert!(state.actor.dash.active);
    }

    #[test]
    fn test_ceiling_cancels_jump() {
        let mut state = state_with(vec![obstacle(0, 4.0, 2.0, 3.0, 1.0)], DVec2::new(5.0, 3.1));
        state.actor.start_jump(5.0, -1, 0.0);
        state.actor.physics.next.vel.y = -70.0;
        step_to(&mut state, DVec2::new(5.0, 2.6));

        let next = &state.actor.physics.next;
        assert_eq!(next.body.pos.y, 3.0);
        assert_eq!(next.vel.y, 0.0);
        assert!(!state.actor.jump.active);
    }

    #[test]
    fn test_carried_by_moving_platform() {
        let mut state = state_with(vec![obstacle(0, 0.0, 10.0, 4.0, 1.0)], DVec2::new(2.0, 9.0));
        state.levels.active_level_mut().platforms[0].physics.next.body.pos.x = 0.25;
        step_to(&mut state, DVec2::new(2.0, 9.01));

        let next = &state.actor.physics.next.body;
        assert_eq!(next.pos, DVec2::new(2.25, 9.0));
    }

    #[test]
    fn test_instagib_kills_once() {
        let pit = Platform::new(PlatformId(0), Aabb::new(DVec2::new(0.0, 10.0), 10.0, 1.0))
            .with(Behavior::InstaGib)
            .unwrap();
        let mut state = state_with(vec![pit], DVec2::new(2.0, 8.9));
        step_to(&mut state, DVec2::new(2.0, 9.5));
        assert!(state.actor.dead);
        assert_eq!(state.deaths, 1);

        state.actor.dead = false;
        state.actor.dead_at = -1.0;
        step_to(&mut state, DVec2::new(2.0, 9.5));
        assert_eq!(state.deaths, 2);
    }

    #[test]
    fn test_next_level_keeps_sentinel_axis() {
        let door = Platform::new(PlatformId(0), Aabb::new(DVec2::new(8.0, 5.0), 1.0, 2.0))
            .with(Behavior::NextLevel(NextLevel {
                to_level: 1,
                to_level_position: DVec2::new(5.0, LEVEL_POSITION_SENTINEL),
            }))
            .unwrap();
        let mut state = state_with(vec![door], DVec2::new(7.0, 5.0));
        step_to(&mut state, DVec2::new(7.6, 5.5));

        assert_eq!(
            state.pending_transition,
            Some(LevelTransition {
                level: 1,
                position: DVec2::new(5.0, 5.5),
            })
        );
    }

    #[test]
    fn test_nothing_recorded_during_hodl() {
        let mut state = state_with(vec![obstacle(0, 0.0, 10.0, 10.0, 1.0)], DVec2::new(2.0, 9.5));
        state.actor.hodl_time = 100.0;
        check(&mut state);
        assert!(state.actor.contacts.is_empty());
    }
}
