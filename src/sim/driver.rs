//! Seeded fuzz driver
//!
//! Picks random vim actions and feeds their key events into the input queue
//! exactly as a keyboard adapter would. All randomness comes from the state's
//! context generator, so a seed fully determines a run.

use super::input::KeyEvent;
use super::state::GameState;
use super::tick::FrameTick;
use crate::error::SimError;
use crate::settings::SimOptions;

/// Target letters tried when the actor's row has none
const RANDOM_LETTERS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789+[{(&=)}]*";

/// `None` is the idle action
const PALETTE: [Option<char>; 11] = [
    Some('f'),
    Some('F'),
    Some('t'),
    Some('T'),
    Some('w'),
    Some('b'),
    Some('j'),
    Some('k'),
    Some('h'),
    Some('l'),
    None,
];

/// One simulated key: held down for `held` ms, then released and followed by `wait` ms of nothing
#[derive(Debug, Clone, PartialEq)]
struct KeyAction {
    key: Option<char>,
    held: f64,
    wait: f64,
    down_sent: bool,
    up_sent: bool,
}

impl KeyAction {
    fn remaining(&self) -> f64 {
        self.held + self.wait
    }
}

#[derive(Debug, Clone, Default)]
struct Plan {
    keys: Vec<KeyAction>,
    idx: usize,
}

#[derive(Debug, Clone)]
pub struct SimDriver {
    opts: SimOptions,
    plan: Option<Plan>,
    planned: u64,
}

impl SimDriver {
    pub fn new(opts: SimOptions) -> Self {
        Self {
            opts,
            plan: None,
            planned: 0,
        }
    }

    /// Number of actions drawn so far
    pub fn planned(&self) -> u64 {
        self.planned
    }

    fn key_action(&self, state: &mut GameState, key: Option<char>) -> KeyAction {
        let rng = &mut state.ctx.rng;
        KeyAction {
            key,
            held: rng.rand_range_r(self.opts.hold_range),
            wait: rng.rand_range_r(self.opts.wait_range),
            down_sent: false,
            up_sent: false,
        }
    }

    fn next_plan(&mut self, state: &mut GameState) -> Plan {
        self.planned += 1;
        let action = PALETTE[state.ctx.rng.rand_index(PALETTE.len())];

        let keys = match action {
            Some(motion @ ('f' | 'F' | 't' | 'T')) => {
                let row = state.actor.row();
                let letters: Vec<char> = state
                    .levels
                    .active_level()
                    .letter_map
                    .letters(row)
                    .map(|(_, l)| l)
                    .collect();
                let letter = if letters.is_empty() {
                    let pool: Vec<char> = RANDOM_LETTERS.chars().collect();
                    pool[state.ctx.rng.rand_index(pool.len())]
                } else {
                    letters[state.ctx.rng.rand_index(letters.len())]
                };
                vec![
                    self.key_action(state, Some(motion)),
                    self.key_action(state, Some(letter)),
                ]
            }
            Some(jump @ ('j' | 'k')) => {
                let modifier = state.ctx.rng.rand_range(f64::from(self.opts.max_jump), 0.0);
                let mut keys: Vec<KeyAction> = modifier
                    .to_string()
                    .chars()
                    .map(|digit| self.key_action(state, Some(digit)))
                    .collect();
                keys.push(self.key_action(state, Some(jump)));
                keys
            }
            key => vec![self.key_action(state, key)],
        };

        log::trace!("tick {}: planned {:?}", state.tick, keys.iter().map(|k| k.key).collect::<Vec<_>>());
        Plan { keys, idx: 0 }
    }
}

impl FrameTick for SimDriver {
    fn tick(&mut self, state: &mut GameState) -> Result<(), SimError> {
        let delta = state.loop_delta;
        if self.plan.is_none() {
            let plan = self.next_plan(state);
            self.plan = Some(plan);
        }
        let Some(plan) = self.plan.as_mut() else {
            return Ok(());
        };

        let Some(current) = plan.keys.get_mut(plan.idx) else {
            self.plan = None;
            return Ok(());
        };
        if current.remaining() < 0.0 {
            plan.idx += 1;
            return Ok(());
        }

        if current.held > 0.0 {
            if !current.down_sent {
                current.down_sent = true;
                if let Some(key) = current.key {
                    state.input.process_key(&KeyEvent::down(key.to_string()));
                }
            }
            current.held -= delta;
        } else {
            if !current.up_sent {
                current.up_sent = true;
                if let Some(key) = current.key {
                    state.input.process_key(&KeyEvent::up(key.to_string()));
                }
            }
            current.wait -= delta;
        }
        Ok(())
    }
}
