//! Platform behaviors
//!
//! A platform carries a small set of tagged behaviors. Each tag appears at most
//! once; obstacle and instagib exclude each other.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::PlatformId;
use crate::error::ValidationError;

/// Level-change destination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextLevel {
    pub to_level: usize,
    /// Per-axis arrival coordinate; `LEVEL_POSITION_SENTINEL` keeps the actor's own
    pub to_level_position: DVec2,
}

/// Oscillation between two fixed points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    pub start_pos: DVec2,
    pub end_pos: DVec2,
    /// Duration of one leg in milliseconds
    pub time: f64,
    #[serde(default)]
    pub current_time: f64,
    #[serde(default = "forward")]
    pub current_dir: i8,
}

fn forward() -> i8 {
    1
}

impl Circuit {
    pub fn new(start_pos: DVec2, end_pos: DVec2, time: f64) -> Self {
        Self {
            start_pos,
            end_pos,
            time,
            current_time: 0.0,
            current_dir: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    pub to: PlatformId,
    /// Outward exit direction, unit length
    pub normal: DVec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lettered {
    /// One letter per row, top to bottom
    pub letter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUp {
    pub letter: String,
    pub start_range: f64,
    pub end_range: f64,
    pub range_speed: f64,
    pub action_list: String,
    pub action_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Behavior {
    Obstacle,
    #[serde(rename = "instagib")]
    InstaGib,
    NextLevel(NextLevel),
    Circuit(Circuit),
    Portal(Portal),
    Lettered(Lettered),
    Lazer,
    #[serde(rename = "powerup")]
    PowerUp(PowerUp),
}

impl Behavior {
    pub fn tag(&self) -> &'static str {
        match self {
            Behavior::Obstacle => "obstacle",
            Behavior::InstaGib => "instagib",
            Behavior::NextLevel(_) => "next-level",
            Behavior::Circuit(_) => "circuit",
            Behavior::Portal(_) => "portal",
            Behavior::Lettered(_) => "lettered",
            Behavior::Lazer => "lazer",
            Behavior::PowerUp(_) => "powerup",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Behaviors(Vec<Behavior>);

impl Behaviors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a behavior, rejecting duplicate tags and obstacle/instagib combinations
    pub fn insert(&mut self, id: PlatformId, behavior: Behavior) -> Result<(), ValidationError> {
        let tag = behavior.tag();
        if self.has(tag) {
            return Err(ValidationError::DuplicateBehavior { id, tag });
        }
        let excluded = match behavior {
            Behavior::Obstacle => self.is_instagib(),
            Behavior::InstaGib => self.is_obstacle(),
            _ => false,
        };
        if excluded {
            return Err(ValidationError::ObstacleInstaGib { id });
        }
        self.0.push(behavior);
        Ok(())
    }

    /// Re-check the per-platform rules on a set that bypassed `insert` (deserialized data)
    pub fn check(&self, id: PlatformId) -> Result<(), ValidationError> {
        let mut seen = Behaviors::new();
        for behavior in &self.0 {
            seen.insert(id, behavior.clone())?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Behavior> {
        self.0.iter()
    }

    pub fn has(&self, tag: &str) -> bool {
        self.0.iter().any(|b| b.tag() == tag)
    }

    pub fn is_obstacle(&self) -> bool {
        self.0.iter().any(|b| matches!(b, Behavior::Obstacle))
    }

    pub fn is_instagib(&self) -> bool {
        self.0.iter().any(|b| matches!(b, Behavior::InstaGib))
    }

    pub fn is_lazer(&self) -> bool {
        self.0.iter().any(|b| matches!(b, Behavior::Lazer))
    }

    pub fn next_level(&self) -> Option<&NextLevel> {
        self.0.iter().find_map(|b| match b {
            Behavior::NextLevel(n) => Some(n),
            _ => None,
        })
    }

    pub fn circuit(&self) -> Option<&Circuit> {
        self.0.iter().find_map(|b| match b {
            Behavior::Circuit(c) => Some(c),
            _ => None,
        })
    }

    pub fn circuit_mut(&mut self) -> Option<&mut Circuit> {
        self.0.iter_mut().find_map(|b| match b {
            Behavior::Circuit(c) => Some(c),
            _ => None,
        })
    }

    pub fn portal(&self) -> Option<&Portal> {
        self.0.iter().find_map(|b| match b {
            Behavior::Portal(p) => Some(p),
            _ => None,
        })
    }

    pub fn lettered(&self) -> Option<&Lettered> {
        self.0.iter().find_map(|b| match b {
            Behavior::Lettered(l) => Some(l),
            _ => None,
        })
    }

    pub fn powerup(&self) -> Option<&PowerUp> {
        self.0.iter().find_map(|b| match b {
            Behavior::PowerUp(p) => Some(p),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obstacle_and_instagib_are_exclusive() {
        let id = PlatformId(7);
        let mut set = Behaviors::new();
        set.insert(id, Behavior::Obstacle).unwrap();
        assert_eq!(
            set.insert(id, Behavior::InstaGib),
            Err(ValidationError::ObstacleInstaGib { id })
        );

        let mut set = Behaviors::new();
        set.insert(id, Behavior::InstaGib).unwrap();
        assert!(set.insert(id, Behavior::Obstacle).is_err());
    }

    #[test]
    fn duplicate_tags_rejected() {
        let id = PlatformId(1);
        let mut set = Behaviors::new();
        set.insert(id, Behavior::Lazer).unwrap();
        assert_eq!(
            set.insert(id, Behavior::Lazer),
            Err(ValidationError::DuplicateBehavior { id, tag: "lazer" })
        );
    }

    #[test]
    fn behaviors_round_trip_through_json_tags() {
        let json = r#"[
            {"type": "obstacle"},
            {"type": "lettered", "letter": "ab"},
            {"type": "circuit", "startPos": [0.0, 1.0], "endPos": [4.0, 1.0], "time": 1000.0}
        ]"#;
        let set: Behaviors = serde_json::from_str(json).unwrap();
        assert!(set.is_obstacle());
        assert_eq!(set.lettered().map(|l| l.letter.as_str()), Some("ab"));
        let circuit = set.circuit().unwrap();
        assert_eq!(circuit.current_dir, 1);
        assert_eq!(circuit.current_time, 0.0);
        assert!(set.check(PlatformId(0)).is_ok());
    }

    #[test]
    fn check_catches_bad_deserialized_sets() {
        let json = r#"[{"type": "obstacle"}, {"type": "instagib"}]"#;
        let set: Behaviors = serde_json::from_str(json).unwrap();
        assert!(set.check(PlatformId(3)).is_err());
    }
}
