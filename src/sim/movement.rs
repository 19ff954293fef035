//! Key-driven movement transitions
//!
//! Runs once per frame, before any physics slice. Translates the input queue
//! into walking, dashes, jumps, portal presses and commands.

use super::input::{Input, InputMode, TargetMotion};
use super::state::GameState;
use crate::consts::{
    ACTOR_HEIGHT, ACTOR_WIDTH, MAX_JUMP_ROWS, MIN_JUMP_ROWS, TILL_BACK_OFFSET, TILL_OFFSET,
};
use crate::error::SimError;

pub fn update(state: &mut GameState) -> Result<(), SimError> {
    handle_hl(state);

    match state.input.mode {
        InputMode::AwaitingTarget(motion) => {
            complete_target(state, motion);
            return Ok(());
        }
        InputMode::AwaitingCommand => {
            complete_command(state);
            return Ok(());
        }
        InputMode::Normal => {}
    }

    let inputs = state.input.inputs.clone();
    for input in &inputs {
        // a continuation key cleared the queue
        if state.input.mode != InputMode::Normal {
            break;
        }
        dispatch(state, input);
    }
    Ok(())
}

fn dispatch(state: &mut GameState, input: &Input) {
    if !input.kind.is_down() {
        return;
    }

    match input.key {
        digit @ '0'..='9' => {
            if let Some(d) = digit.to_digit(10) {
                state.input.push_digit(d);
            }
        }
        'j' => jump(state, 1),
        'k' => jump(state, -1),
        'w' => word(state, 1),
        'b' => word(state, -1),
        ':' => state.input.await_next_key(InputMode::AwaitingCommand),
        '%' => {
            state.actor.start_portal();
            log::debug!("tick {}: portal pressed", state.tick);
        }
        key => {
            if let Some(motion) = TargetMotion::from_key(key) {
                state.actor.target.motion = motion;
                state.actor.target.start_tick = state.tick;
                state.input.await_next_key(InputMode::AwaitingTarget(motion));
            }
        }
    }
}

/// h/l walking. Frozen while a continuation key is pending.
fn handle_hl(state: &mut GameState) {
    let norm = state.opts.actor.norm_widths_per_second;
    let actor = &mut state.actor;

    if state.input.mode != InputMode::Normal {
        actor.physics.next.vel.x = 0.0;
        return;
    }

    let h = state.input.get('h').is_some();
    let l = state.input.get('l').is_some();
    match (h, l) {
        (true, false) => {
            actor.reset_vel2();
            actor.physics.next.vel.x = -norm;
        }
        (false, true) => {
            actor.reset_vel2();
            actor.physics.next.vel.x = norm;
        }
        _ if !actor.dash.active => actor.physics.next.vel.x = 0.0,
        _ => {}
    }
}

/// j/k: jump down/up by the numeric modifier's rows
fn jump(state: &mut GameState, dir: i8) {
    if state.actor.jump.cooldown > 0.0 {
        return;
    }

    let rows = state.input.take_modifier().clamp(MIN_JUMP_ROWS, MAX_JUMP_ROWS);
    let mut distance = f64::from(rows);
    if dir > 0 {
        distance -= ACTOR_HEIGHT;
    }

    let opts = state.opts.actor.jump;
    let cooldown = f64::from(rows) * opts.no_jump_multiplier + opts.no_jump_base;
    state.actor.start_jump(distance, dir, cooldown);
}

/// w/b: dash to the nearest letter in the actor's row
fn word(state: &mut GameState, dir: i8) {
    let actor = &state.actor;
    if actor.dash.active {
        return;
    }

    let row = actor.next_row();
    let col = actor.next_col();
    let Some(dest) = state.levels.active_level().letter_map.nearest(row, col, dir, |_| true)
    else {
        return;
    };

    let x = actor.physics.next.body.pos.x;
    let offset = dest as f64 - x + ACTOR_WIDTH;
    let dash_dir: i8 = if offset > 0.0 { 1 } else { -1 };
    let mut distance = offset.abs();
    if dash_dir == 1 {
        distance -= ACTOR_WIDTH;
    }
    state.actor.start_dash(distance, dash_dir);
}

/// Second key of f/F/t/T
fn complete_target(state: &mut GameState, motion: TargetMotion) {
    let Some(letter) = state.input.take_continuation_key() else {
        return;
    };

    let actor = &state.actor;
    let row = actor.next_row();
    let col = actor.next_col();
    let Some(col) = state
        .levels
        .active_level()
        .letter_map
        .nearest(row, col, motion.direction(), |l| l == letter)
    else {
        log::debug!("tick {}: no '{}' in row {}", state.tick, letter, row);
        return;
    };

    let mut dest = col as f64;
    match motion {
        TargetMotion::Till => dest -= ACTOR_WIDTH - TILL_OFFSET,
        TargetMotion::TillBack => dest += TILL_BACK_OFFSET,
        TargetMotion::Find | TargetMotion::FindBack => {}
    }

    let offset = dest - actor.physics.next.body.pos.x;
    let dir: i8 = if offset > 0.0 { 1 } else { -1 };
    state.actor.start_dash(offset.abs(), dir);
    state.actor.physics.next.acc = glam::DVec2::ZERO;
}

/// Second key of `:`
fn complete_command(state: &mut GameState) {
    let Some(key) = state.input.take_continuation_key() else {
        return;
    };
    if key == 'q' {
        log::info!("tick {}: quit requested", state.tick);
        state.done = true;
    }
}
