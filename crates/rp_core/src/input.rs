//! Keyboard state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` returns true every tick the key
//!   is down. Used for running left/right.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only during the
//!   tick the transition happened. Jump, restart, proceed and quit all read the
//!   edge so holding a key never repeats the action. `end_frame()` clears the
//!   edges once the tick has consumed them.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    A,
    D,
    Z,
    Space,
    R,
    Enter,
    Escape,
}

impl Key {
    pub const ALL: &'static [Key] = &[
        Key::Left,
        Key::Right,
        Key::Up,
        Key::A,
        Key::D,
        Key::Z,
        Key::Space,
        Key::R,
        Key::Enter,
        Key::Escape,
    ];
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    /// Make `keys` the exact held set, generating press/release edges for every
    /// key whose state changed. Scripted drivers use this to replay a frame.
    pub fn sync_held(&mut self, keys: &[Key]) {
        for &key in Key::ALL {
            if keys.contains(&key) {
                self.key_down(key);
            } else {
                self.key_up(key);
            }
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
