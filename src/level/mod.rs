//! Levels and level sets
//!
//! A level is a list of platforms plus a letter lookup grid derived from its
//! lettered platforms. A level set owns all levels and an id index into them.

pub mod behavior;
pub mod demo;
pub mod platform;

use std::collections::HashMap;

use glam::DVec2;

pub use behavior::{Behavior, Behaviors, Circuit, Lettered, NextLevel, Portal, PowerUp};
pub use platform::{Platform, PlatformId};

use crate::consts::{GAME_HEIGHT, GAME_WIDTH, PORTAL_NORMAL_TOLERANCE};
use crate::error::{SimError, ValidationError};

/// `grid[row][col]` of letters from lettered platforms
#[derive(Debug, Clone, PartialEq)]
pub struct LetterMap {
    rows: Vec<Vec<Option<char>>>,
}

impl LetterMap {
    /// Each lettered platform writes its letters down its column starting at its
    /// top-left cell; cells off the board are dropped.
    pub fn build(platforms: &[Platform]) -> Self {
        let mut rows = vec![vec![None; GAME_WIDTH]; GAME_HEIGHT];

        for p in platforms {
            let Some(lettered) = p.behaviors.lettered() else {
                continue;
            };
            let pos = p.body().pos;
            if pos.x < 0.0 || pos.y < 0.0 {
                continue;
            }
            let col = pos.x.floor() as usize;
            let top = pos.y.floor() as usize;
            if col >= GAME_WIDTH {
                continue;
            }
            for (offset, letter) in lettered.letter.chars().enumerate() {
                let row = top + offset;
                if row >= GAME_HEIGHT {
                    break;
                }
                rows[row][col] = Some(letter);
            }
        }

        Self { rows }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        self.rows.get(row).and_then(|r| r.get(col).copied().flatten())
    }

    /// Row contents; empty for rows off the board
    pub fn row(&self, row: i64) -> &[Option<char>] {
        usize::try_from(row)
            .ok()
            .and_then(|r| self.rows.get(r))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `(col, letter)` pairs present in `row`, left to right
    pub fn letters(&self, row: i64) -> impl Iterator<Item = (i64, char)> + '_ {
        self.row(row)
            .iter()
            .enumerate()
            .filter_map(|(col, l)| l.map(|l| (col as i64, l)))
    }

    /// Closest lettered column strictly after (`dir > 0`) or before `col` that satisfies `want`
    pub fn nearest(&self, row: i64, col: i64, dir: i8, want: impl Fn(char) -> bool) -> Option<i64> {
        let mut hits = self.letters(row).filter(|&(_, l)| want(l)).map(|(c, _)| c);
        if dir > 0 {
            hits.find(|&c| c > col)
        } else {
            hits.filter(|&c| c < col).last()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub platforms: Vec<Platform>,
    pub initial_position: DVec2,
    pub letter_map: LetterMap,
}

impl Level {
    pub fn new(platforms: Vec<Platform>, initial_position: DVec2) -> Self {
        let letter_map = LetterMap::build(&platforms);
        Self {
            platforms,
            initial_position,
            letter_map,
        }
    }

    /// Must be called after the platform list changes
    pub fn rebuild_letter_map(&mut self) {
        self.letter_map = LetterMap::build(&self.platforms);
    }
}

/// Where a platform lives inside a level set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformSlot {
    pub level: usize,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct LevelSet {
    pub title: String,
    pub difficulty: u32,
    pub initial_level: usize,
    pub levels: Vec<Level>,
    active: usize,
    index: HashMap<PlatformId, PlatformSlot>,
}

impl LevelSet {
    /// Build the id index and validate every level-load rule
    pub fn new(
        title: impl Into<String>,
        difficulty: u32,
        initial_level: usize,
        levels: Vec<Level>,
    ) -> Result<Self, ValidationError> {
        if levels.is_empty() {
            return Err(ValidationError::NoLevels);
        }
        if initial_level >= levels.len() {
            return Err(ValidationError::InitialLevelOutOfRange {
                initial: initial_level,
                count: levels.len(),
            });
        }

        let mut set = Self {
            title: title.into(),
            difficulty,
            initial_level,
            levels,
            active: initial_level,
            index: HashMap::new(),
        };
        set.rebuild_index()?;
        set.validate()?;
        Ok(set)
    }

    pub fn rebuild_index(&mut self) -> Result<(), ValidationError> {
        self.index.clear();
        for (level, l) in self.levels.iter().enumerate() {
            for (index, p) in l.platforms.iter().enumerate() {
                if self
                    .index
                    .insert(p.id, PlatformSlot { level, index })
                    .is_some()
                {
                    return Err(ValidationError::DuplicatePlatformId { id: p.id });
                }
            }
        }
        Ok(())
    }

    /// Data rules checked once at load, before any tick runs
    pub fn validate(&self) -> Result<(), ValidationError> {
        for level in &self.levels {
            for platform in &level.platforms {
                platform.behaviors.check(platform.id)?;
                platform.check_shape()?;

                let Some(portal) = platform.behaviors.portal() else {
                    continue;
                };
                let conflict = if platform.behaviors.is_obstacle() {
                    Some("obstacle")
                } else if platform.behaviors.next_level().is_some() {
                    Some("next-level")
                } else if platform.behaviors.is_instagib() {
                    Some("instagib")
                } else {
                    None
                };
                if let Some(tag) = conflict {
                    return Err(ValidationError::PortalConflict {
                        id: platform.id,
                        tag,
                    });
                }

                let other = self
                    .platform(portal.to)
                    .map_err(|_| ValidationError::PortalTargetMissing {
                        id: platform.id,
                        to: portal.to,
                    })?;
                if other.behaviors.portal().is_none() {
                    return Err(ValidationError::PortalTargetNotPortal {
                        id: platform.id,
                        to: portal.to,
                    });
                }

                let magnitude = portal.normal.length();
                if (1.0 - magnitude).abs() > PORTAL_NORMAL_TOLERANCE {
                    return Err(ValidationError::PortalNormal {
                        id: platform.id,
                        magnitude,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_level(&self) -> &Level {
        &self.levels[self.active]
    }

    pub fn active_level_mut(&mut self) -> &mut Level {
        &mut self.levels[self.active]
    }

    pub fn set_active(&mut self, to: usize) -> Result<&mut Level, SimError> {
        let count = self.levels.len();
        if to >= count {
            return Err(SimError::LevelNotFound { to, count });
        }
        self.active = to;
        Ok(&mut self.levels[to])
    }

    pub fn locate(&self, id: PlatformId) -> Result<PlatformSlot, SimError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(SimError::PlatformNotFound(id))
    }

    pub fn platform(&self, id: PlatformId) -> Result<&Platform, SimError> {
        let slot = self.locate(id)?;
        Ok(&self.levels[slot.level].platforms[slot.index])
    }

    pub fn max_platform_id(&self) -> Option<PlatformId> {
        self.index.keys().max().copied()
    }
}
