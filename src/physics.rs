//! Double-buffered kinematic state
//!
//! Every simulated entity owns a `current` and a `next` body. Update phases
//! write `next` only; `commit` is the single writer of `current`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::math::Aabb;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub acc: DVec2,
    pub vel: DVec2,
    /// Secondary impulse (portal exit speed), decays every integration step
    pub vel2: DVec2,
    pub body: Aabb,
}

impl PhysicsBody {
    pub fn at_rest(body: Aabb) -> Self {
        Self {
            acc: DVec2::ZERO,
            vel: DVec2::ZERO,
            vel2: DVec2::ZERO,
            body,
        }
    }

    /// Advance position by `vel + vel2` over `dt` seconds, then decay `vel2`
    pub fn integrate(&mut self, dt: f64) {
        self.body.pos += (self.vel + self.vel2) * dt;
        self.vel2 *= 1.0 - dt / 2.0;
    }

    /// Combined speed used when redirecting through a portal
    pub fn total_velocity(&self) -> DVec2 {
        self.vel + self.vel2
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Physics {
    current: PhysicsBody,
    pub next: PhysicsBody,
}

impl Physics {
    pub fn new(body: Aabb) -> Self {
        let state = PhysicsBody::at_rest(body);
        Self {
            current: state,
            next: state,
        }
    }

    #[inline]
    pub fn current(&self) -> &PhysicsBody {
        &self.current
    }

    /// `current := next`
    #[inline]
    pub fn commit(&mut self) {
        self.current = self.next;
    }

    /// Place both buffers at `pos`. Used by spawn and level transitions, outside the update phase.
    pub fn teleport(&mut self, pos: DVec2) {
        self.current.body.pos = pos;
        self.next.body.pos = pos;
    }

    /// Frame-to-frame displacement of the next buffer
    pub fn displacement(&self) -> DVec2 {
        self.next.body.pos - self.current.body.pos
    }
}
