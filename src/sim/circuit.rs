//! Circuit platforms: eased back-and-forth motion between two points

use crate::error::SimError;
use crate::level::{Level, Platform};
use crate::math::{ease_in_out_cubic, lerp_clamped};

/// Advance every circuit platform in the level by `delta` ms
pub fn update(level: &mut Level, delta: f64) -> Result<(), SimError> {
    if delta <= 0.0 {
        return Ok(());
    }
    for platform in &mut level.platforms {
        step(platform, delta);
    }
    Ok(())
}

fn step(platform: &mut Platform, delta: f64) {
    let Platform {
        behaviors, physics, ..
    } = platform;
    let Some(circuit) = behaviors.circuit_mut() else {
        return;
    };

    circuit.current_time += delta;
    let progress = if circuit.time > 0.0 {
        (circuit.current_time / circuit.time).min(1.0)
    } else {
        1.0
    };
    let mut percent = ease_in_out_cubic(progress);
    if circuit.current_dir < 0 {
        percent = 1.0 - percent;
    }

    let pos = lerp_clamped(circuit.start_pos, circuit.end_pos, percent);
    let next = &mut physics.next;
    next.vel = (pos - next.body.pos) / (delta / 1000.0);
    next.body.pos = pos;

    let at_end = if circuit.current_dir > 0 {
        percent >= 1.0
    } else {
        percent <= 0.0
    };
    if at_end {
        circuit.current_dir = -circuit.current_dir;
        circuit.current_time = 0.0;
    }
}

/// Commit every platform of the level
pub fn commit(level: &mut Level) {
    for platform in &mut level.platforms {
        platform.physics.commit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Behavior, Circuit, PlatformId};
    use crate::math::Aabb;
    use glam::DVec2;
    use proptest::prelude::*;

    fn circuit_level(start: DVec2, end: DVec2, time: f64) -> Level {
        let platform = Platform::new(PlatformId(0), Aabb::new(start, 3.0, 1.0))
            .with(Behavior::Circuit(Circuit::new(start, end, time)))
            .unwrap();
        Level::new(vec![platform], start)
    }

    fn pos(level: &Level) -> DVec2 {
        level.platforms[0].next_body().pos
    }

    #[test]
    fn test_reaches_end_then_returns() {
        let start = DVec2::new(2.0, 10.0);
        let end = DVec2::new(12.0, 10.0);
        let mut level = circuit_level(start, end, 100.0);

        update(&mut level, 50.0).unwrap();
        assert!((pos(&level) - DVec2::new(7.0, 10.0)).length() < 1e-9);

        update(&mut level, 50.0).unwrap();
        assert_eq!(pos(&level), end);
        let circuit = level.platforms[0].behaviors.circuit().unwrap();
        assert_eq!(circuit.current_dir, -1);
        assert_eq!(circuit.current_time, 0.0);

        update(&mut level, 100.0).unwrap();
        assert_eq!(pos(&level), start);
        assert_eq!(level.platforms[0].behaviors.circuit().unwrap().current_dir, 1);
    }

    #[test]
    fn test_velocity_matches_displacement() {
        let mut level = circuit_level(DVec2::new(0.0, 5.0), DVec2::new(0.0, 15.0), 1000.0);
        update(&mut level, 16.0).unwrap();
        let platform = &level.platforms[0];
        let expected = platform.physics.displacement() / 0.016;
        assert!((platform.physics.next.vel - expected).length() < 1e-9);
    }

    #[test]
    fn test_zero_delta_is_a_no_op() {
        let start = DVec2::new(1.0, 1.0);
        let mut level = circuit_level(start, DVec2::new(9.0, 1.0), 500.0);
        update(&mut level, 0.0).unwrap();
        assert_eq!(pos(&level), start);
        assert_eq!(level.platforms[0].physics.next.vel, DVec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_stays_between_endpoints(
            deltas in prop::collection::vec(1.0f64..40.0, 1..200),
            time in 10.0f64..2000.0,
            sx in 0.0f64..30.0, sy in 0.0f64..20.0,
            ex in 0.0f64..30.0, ey in 0.0f64..20.0,
        ) {
            let start = DVec2::new(sx, sy);
            let end = DVec2::new(ex, ey);
            let lo = start.min(end);
            let hi = start.max(end);
            let mut level = circuit_level(start, end, time);
            for delta in deltas {
                update(&mut level, delta).unwrap();
                commit(&mut level);
                let p = pos(&level);
                prop_assert!(p.x >= lo.x && p.x <= hi.x);
                prop_assert!(p.y >= lo.y && p.y <= hi.y);
            }
        }
    }
}
