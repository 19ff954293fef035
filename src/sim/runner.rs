//! Outer run loop
//!
//! Drives frames through a [`GameLoop`] until the state is done or the tick
//! ceiling is passed.

use glam::DVec2;

use super::state::GameState;
use super::tick::FrameTick;
use crate::consts::YIELD_EVERY_FRAMES;
use crate::error::SimError;
use crate::platform::GameLoop;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `:q` or an external `done`
    Quit,
    /// Tick ceiling passed
    TickLimit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub reason: StopReason,
    pub level: usize,
    pub position: DVec2,
    pub deaths: u32,
}

impl RunSummary {
    fn of(state: &GameState, reason: StopReason) -> Self {
        Self {
            ticks: state.tick,
            reason,
            level: state.levels.active_index(),
            position: state.actor.position(),
            deaths: state.deaths,
        }
    }
}

/// Run frames until `state.done` or, when `until > 0`, until the tick count passes `until`.
///
/// `ticks` run in order every frame; the first error stops the run.
pub fn run(
    state: &mut GameState,
    game_loop: &mut dyn GameLoop,
    ticks: &mut [&mut dyn FrameTick],
    until: u64,
) -> Result<RunSummary, SimError> {
    let mut synchronous = 0u32;

    loop {
        if state.done {
            return Ok(finish(state, StopReason::Quit));
        }

        synchronous += 1;
        if synchronous >= YIELD_EVERY_FRAMES {
            synchronous = 0;
            game_loop.yield_now();
        }

        game_loop.next_frame(state);
        for tick in ticks.iter_mut() {
            tick.tick(state)?;
        }

        if until > 0 && state.tick > until {
            return Ok(finish(state, StopReason::TickLimit));
        }
    }
}

fn finish(state: &GameState, reason: StopReason) -> RunSummary {
    let summary = RunSummary::of(state, reason);
    log::info!(
        "run finished after {} ticks ({:?}): level {}, at ({:.2}, {:.2}), {} deaths",
        summary.ticks,
        summary.reason,
        summary.level,
        summary.position.x,
        summary.position.y,
        summary.deaths
    );
    summary
}
