//! Built-in two-level set for headless runs

use glam::DVec2;

use super::{Behavior, Circuit, Level, LevelSet, Lettered, NextLevel, Platform, Portal};
use crate::consts::LEVEL_POSITION_SENTINEL;
use crate::error::ValidationError;
use crate::math::Aabb;
use crate::sim::context::IdAllocator;

fn block(ids: &mut IdAllocator, start: (f64, f64), end: (f64, f64)) -> Result<Platform, ValidationError> {
    let body = Aabb::from_corners(DVec2::new(start.0, start.1), DVec2::new(end.0, end.1))?;
    Ok(Platform::new(ids.next_id()?, body))
}

fn solid(ids: &mut IdAllocator, start: (f64, f64), end: (f64, f64)) -> Result<Platform, ValidationError> {
    block(ids, start, end)?.with(Behavior::Obstacle)
}

fn letters(ids: &mut IdAllocator, col: f64, row: f64, text: &str) -> Result<Platform, ValidationError> {
    let bottom = row + text.chars().count() as f64 - 1.0;
    block(ids, (col, row), (col, bottom))?.with(Behavior::Lettered(Lettered {
        letter: text.into(),
    }))
}

/// Level 0: floor with a letter row, a raised ledge, a moving lift, a spike
/// strip, a portal pair and a door on the right edge into level 1.
/// Level 1: a stepped floor, a portal back to level 0 and a door home.
pub fn level_set(ids: &mut IdAllocator) -> Result<LevelSet, ValidationError> {
    let mut first = vec![
        solid(ids, (0.0, 22.0), (31.0, 23.0))?,
        solid(ids, (8.0, 17.0), (13.0, 17.0))?,
        letters(ids, 3.0, 21.0, "a")?,
        letters(ids, 6.0, 21.0, "s")?,
        letters(ids, 16.0, 21.0, "d")?,
        letters(ids, 24.0, 21.0, "f")?,
        letters(ids, 9.0, 16.0, "q")?,
        letters(ids, 12.0, 16.0, "w")?,
        block(ids, (19.0, 21.0), (20.0, 21.0))?.with(Behavior::InstaGib)?,
        block(ids, (31.0, 18.0), (31.0, 21.0))?.with(Behavior::NextLevel(NextLevel {
            to_level: 1,
            to_level_position: DVec2::new(1.0, LEVEL_POSITION_SENTINEL),
        }))?,
    ];

    let lift_start = DVec2::new(15.0, 14.0);
    let lift_end = DVec2::new(25.0, 14.0);
    first.push(
        solid(ids, (15.0, 14.0), (18.0, 14.0))?
            .with(Behavior::Circuit(Circuit::new(lift_start, lift_end, 2500.0)))?,
    );

    let entry = block(ids, (1.0, 21.0), (1.0, 21.0))?;
    let exit = block(ids, (27.0, 10.0), (27.0, 10.0))?;
    let (entry_id, exit_id) = (entry.id, exit.id);
    first.push(entry.with(Behavior::Portal(Portal {
        to: exit_id,
        normal: DVec2::NEG_Y,
    }))?);
    first.push(exit.with(Behavior::Portal(Portal {
        to: entry_id,
        normal: DVec2::new(0.6, -0.8),
    }))?);
    first.push(solid(ids, (26.0, 12.0), (29.0, 12.0))?);

    let second = vec![
        solid(ids, (0.0, 22.0), (15.0, 23.0))?,
        solid(ids, (16.0, 20.0), (31.0, 23.0))?,
        letters(ids, 5.0, 21.0, "x")?,
        letters(ids, 10.0, 21.0, "y")?,
        letters(ids, 22.0, 19.0, "z")?,
        block(ids, (0.0, 17.0), (0.0, 21.0))?.with(Behavior::NextLevel(NextLevel {
            to_level: 0,
            to_level_position: DVec2::new(30.0, LEVEL_POSITION_SENTINEL),
        }))?,
        block(ids, (28.0, 19.0), (28.0, 19.0))?.with(Behavior::Portal(Portal {
            to: entry_id,
            normal: DVec2::X,
        }))?,
    ];

    LevelSet::new(
        "demo",
        1,
        0,
        vec![
            Level::new(first, DVec2::new(4.0, 20.0)),
            Level::new(second, DVec2::new(2.0, 20.0)),
        ],
    )
}
