//! Platforms: a box on the grid plus its behaviors

use std::fmt;

use serde::{Deserialize, Serialize};

use super::behavior::{Behavior, Behaviors};
use crate::error::ValidationError;
use crate::math::Aabb;
use crate::physics::Physics;
use crate::window::RenderRect;

/// Stable platform identity, unique across a level set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformId(pub u32);

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub id: PlatformId,
    pub physics: Physics,
    pub behaviors: Behaviors,
    pub projection: RenderRect,
}

impl Platform {
    pub fn new(id: PlatformId, body: Aabb) -> Self {
        Self {
            id,
            physics: Physics::new(body),
            behaviors: Behaviors::new(),
            projection: RenderRect::default(),
        }
    }

    /// Builder-style behavior insertion
    pub fn with(mut self, behavior: Behavior) -> Result<Self, ValidationError> {
        self.behaviors.insert(self.id, behavior)?;
        Ok(self)
    }

    /// Box as of the last commit
    pub fn body(&self) -> &Aabb {
        &self.physics.current().body
    }

    pub fn next_body(&self) -> &Aabb {
        &self.physics.next.body
    }

    /// Size-dependent behavior rules (lazer 1x1, powerup 2x1)
    pub fn check_shape(&self) -> Result<(), ValidationError> {
        let body = self.body();
        body.validate()?;
        if self.behaviors.is_lazer() && (body.width != 1.0 || body.height != 1.0) {
            return Err(ValidationError::LazerSize {
                id: self.id,
                width: body.width,
                height: body.height,
            });
        }
        if self.behaviors.powerup().is_some() && (body.width != 2.0 || body.height != 1.0) {
            return Err(ValidationError::PowerUpSize {
                id: self.id,
                width: body.width,
                height: body.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::behavior::PowerUp;
    use glam::DVec2;

    fn powerup() -> Behavior {
        Behavior::PowerUp(PowerUp {
            letter: "x".into(),
            start_range: 0.0,
            end_range: 3.0,
            range_speed: 1.0,
            action_list: "jk".into(),
            action_speed: 1.0,
        })
    }

    #[test]
    fn lazer_must_be_one_by_one() {
        let ok = Platform::new(PlatformId(1), Aabb::new(DVec2::ZERO, 1.0, 1.0))
            .with(Behavior::Lazer)
            .unwrap();
        assert!(ok.check_shape().is_ok());

        let wide = Platform::new(PlatformId(2), Aabb::new(DVec2::ZERO, 2.0, 1.0))
            .with(Behavior::Lazer)
            .unwrap();
        assert!(matches!(
            wide.check_shape(),
            Err(ValidationError::LazerSize { .. })
        ));
    }

    #[test]
    fn powerup_must_be_two_by_one() {
        let ok = Platform::new(PlatformId(1), Aabb::new(DVec2::ZERO, 2.0, 1.0))
            .with(powerup())
            .unwrap();
        assert!(ok.check_shape().is_ok());

        let square = Platform::new(PlatformId(2), Aabb::new(DVec2::ZERO, 1.0, 1.0))
            .with(powerup())
            .unwrap();
        assert!(matches!(
            square.check_shape(),
            Err(ValidationError::PowerUpSize { .. })
        ));
    }
}
