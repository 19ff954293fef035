//! Keyboard input queue
//!
//! Raw key events are folded into one entry per key with a lifecycle of
//! `Down -> Hold -> Up`, or `DownUp` when pressed and released within a tick.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    Down,
    DownUp,
    Hold,
    Up,
}

impl InputKind {
    /// Pressed during this tick
    pub fn is_down(self) -> bool {
        matches!(self, InputKind::Down | InputKind::DownUp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub key: char,
    pub kind: InputKind,
    pub tick: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    KeyDown,
    KeyUp,
}

/// What an input adapter hands to the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub kind: KeyEventKind,
    /// OS auto-repeat
    pub repeat: bool,
}

impl KeyEvent {
    pub fn down(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: KeyEventKind::KeyDown,
            repeat: false,
        }
    }

    pub fn up(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: KeyEventKind::KeyUp,
            repeat: false,
        }
    }
}

/// f/F/t/T
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetMotion {
    /// `f`: onto the next matching letter
    Find,
    /// `F`: onto the previous matching letter
    FindBack,
    /// `t`: just before the next matching letter
    Till,
    /// `T`: just after the previous matching letter
    TillBack,
}

impl TargetMotion {
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'f' => Some(TargetMotion::Find),
            'F' => Some(TargetMotion::FindBack),
            't' => Some(TargetMotion::Till),
            'T' => Some(TargetMotion::TillBack),
            _ => None,
        }
    }

    /// +1 scans right, -1 scans left
    pub fn direction(self) -> i8 {
        match self {
            TargetMotion::Find | TargetMotion::Till => 1,
            TargetMotion::FindBack | TargetMotion::TillBack => -1,
        }
    }
}

/// Which handler owns the next key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// The next key is the f/F/t/T target letter
    AwaitingTarget(TargetMotion),
    /// The next key completes a `:` command
    AwaitingCommand,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub inputs: Vec<Input>,
    pub has_input: bool,
    pub tick: u64,
    pub numeric_modifier: u32,
    pub mode: InputMode,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: char) -> Option<&Input> {
        self.inputs.iter().find(|i| i.key == key)
    }

    fn get_mut(&mut self, key: char) -> Option<&mut Input> {
        self.inputs.iter_mut().find(|i| i.key == key)
    }

    /// Fold one raw key event into the queue. Repeats and named keys are ignored.
    pub fn process_key(&mut self, event: &KeyEvent) {
        let mut chars = event.key.chars();
        let (Some(key), None) = (chars.next(), chars.next()) else {
            return;
        };
        if event.repeat {
            return;
        }

        let tick = self.tick;
        match event.kind {
            KeyEventKind::KeyUp => {
                // Releasing shift first turns `F` into `f` on key-up
                let lower = key.to_ascii_lowercase();
                let entry = if self.get(key).is_some() {
                    self.get_mut(key)
                } else {
                    self.get_mut(lower)
                };
                if let Some(input) = entry {
                    input.kind = if input.tick == tick {
                        InputKind::DownUp
                    } else {
                        InputKind::Up
                    };
                }
            }
            KeyEventKind::KeyDown => match self.get_mut(key) {
                Some(input) => input.kind = InputKind::Down,
                None => self.inputs.push(Input {
                    key,
                    kind: InputKind::Down,
                    tick,
                }),
            },
        }
    }

    /// Start-of-frame bookkeeping
    pub fn begin_tick(&mut self, tick: u64) {
        self.tick = tick;
        self.has_input = !self.inputs.is_empty();
    }

    /// End-of-frame: drop released keys, promote fresh presses to holds
    pub fn tick_clear(&mut self) {
        self.inputs
            .retain(|i| !matches!(i.kind, InputKind::DownUp | InputKind::Up));
        for input in &mut self.inputs {
            if input.kind == InputKind::Down {
                input.kind = InputKind::Hold;
            }
        }
        self.has_input = false;
    }

    /// Take the oldest queued key for a pending continuation and clear the queue
    pub fn take_continuation_key(&mut self) -> Option<char> {
        let key = self.inputs.first()?.key;
        self.inputs.clear();
        self.mode = InputMode::Normal;
        Some(key)
    }

    /// Enter a continuation mode; pending inputs are discarded
    pub fn await_next_key(&mut self, mode: InputMode) {
        self.inputs.clear();
        self.mode = mode;
    }

    pub fn push_digit(&mut self, digit: u32) {
        self.numeric_modifier = self
            .numeric_modifier
            .saturating_mul(10)
            .saturating_add(digit);
    }

    pub fn take_modifier(&mut self) -> u32 {
        std::mem::take(&mut self.numeric_modifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_same_tick_is_down_up() {
        let mut input = InputState::new();
        input.begin_tick(3);
        input.process_key(&KeyEvent::down("j"));
        input.process_key(&KeyEvent::up("j"));
        assert_eq!(input.get('j').map(|i| i.kind), Some(InputKind::DownUp));

        input.tick_clear();
        assert!(input.get('j').is_none());
    }

    #[test]
    fn held_key_lifecycle() {
        let mut input = InputState::new();
        input.begin_tick(1);
        input.process_key(&KeyEvent::down("h"));
        input.tick_clear();
        assert_eq!(input.get('h').map(|i| i.kind), Some(InputKind::Hold));

        input.begin_tick(2);
        input.process_key(&KeyEvent::up("h"));
        assert_eq!(input.get('h').map(|i| i.kind), Some(InputKind::Up));
        input.tick_clear();
        assert!(input.inputs.is_empty());
    }

    #[test]
    fn repeats_and_named_keys_are_ignored() {
        let mut input = InputState::new();
        input.process_key(&KeyEvent::down("Shift"));
        input.process_key(&KeyEvent {
            repeat: true,
            ..KeyEvent::down("l")
        });
        input.process_key(&KeyEvent::down(""));
        assert!(input.inputs.is_empty());
    }

    #[test]
    fn shifted_release_falls_back_to_lowercase() {
        let mut input = InputState::new();
        input.begin_tick(1);
        input.process_key(&KeyEvent::down("f"));
        input.begin_tick(2);
        input.process_key(&KeyEvent::up("F"));
        assert_eq!(input.get('f').map(|i| i.kind), Some(InputKind::Up));
    }

    #[test]
    fn numeric_modifier_accumulates() {
        let mut input = InputState::new();
        input.push_digit(1);
        input.push_digit(2);
        assert_eq!(input.take_modifier(), 12);
        assert_eq!(input.numeric_modifier, 0);
    }

    #[test]
    fn continuation_consumes_first_key() {
        let mut input = InputState::new();
        input.await_next_key(InputMode::AwaitingTarget(TargetMotion::Till));
        assert_eq!(input.take_continuation_key(), None);
        assert_eq!(
            input.mode,
            InputMode::AwaitingTarget(TargetMotion::Till)
        );

        input.process_key(&KeyEvent::down("x"));
        input.process_key(&KeyEvent::down("y"));
        assert_eq!(input.take_continuation_key(), Some('x'));
        assert!(input.inputs.is_empty());
        assert_eq!(input.mode, InputMode::Normal);
    }
}
