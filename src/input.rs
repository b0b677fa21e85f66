//! Keyboard state for the game loop.
//!
//! Terminals deliver key *events*, but the game wants the set of keys that
//! are held *this tick*. `KeyTracker` bridges the two: it remembers the frame
//! each key was last seen and treats it as held for `HOLD_WINDOW` frames, or
//! until an explicit release when the terminal reports those.

use std::collections::{HashMap, HashSet};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};

/// A key is "held" if its last press/repeat arrived within this many frames.
/// OS key-repeat runs at 15 Hz or more, so 8 frames at 50 Hz (160 ms) is
/// refreshed before it expires.
pub const HOLD_WINDOW: u64 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    LeftShift,
    RightShift,
    Enter,
    Tab,
}

/// Everything one input poll produces.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub quit: bool,
    pub pressed: HashSet<Key>,
}

/// Translate one terminal event into game keys.
///
/// Classic terminals never report a bare Shift, so with `synthesize_shift`
/// a shifted arrow counts as Right Shift + arrow and a shifted W/A/S/D as
/// Left Shift + letter. Terminals with keyboard enhancement report each
/// Shift key on its own and the modifier flag is ignored.
pub fn map_key_event(event: &KeyEvent, synthesize_shift: bool) -> Vec<Key> {
    let shifted = synthesize_shift && event.modifiers.contains(KeyModifiers::SHIFT);
    let mut keys = Vec::with_capacity(2);
    match event.code {
        KeyCode::Up => keys.push(Key::Up),
        KeyCode::Down => keys.push(Key::Down),
        KeyCode::Left => keys.push(Key::Left),
        KeyCode::Right => keys.push(Key::Right),
        KeyCode::Enter => keys.push(Key::Enter),
        KeyCode::Tab => keys.push(Key::Tab),
        // Shift+Tab arrives as BackTab; still the ship 2 shield key.
        KeyCode::BackTab => keys.push(Key::Tab),
        KeyCode::Modifier(ModifierKeyCode::LeftShift) => keys.push(Key::LeftShift),
        KeyCode::Modifier(ModifierKeyCode::RightShift) => keys.push(Key::RightShift),
        KeyCode::Char(c) => {
            let key = match c.to_ascii_lowercase() {
                'w' => Some(Key::W),
                'a' => Some(Key::A),
                's' => Some(Key::S),
                'd' => Some(Key::D),
                _ => None,
            };
            if let Some(key) = key {
                keys.push(key);
                if shifted || (synthesize_shift && c.is_ascii_uppercase()) {
                    keys.push(Key::LeftShift);
                }
            }
            return keys;
        }
        _ => return keys,
    }
    if shifted && matches!(event.code, KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right)
    {
        keys.push(Key::RightShift);
    }
    keys
}

/// Esc, `q` and Ctrl-C end the game.
pub fn is_quit(event: &KeyEvent) -> bool {
    match event.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => event.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[derive(Debug, Default)]
pub struct KeyTracker {
    last_seen: HashMap<Key, u64>,
    keyboard_enhanced: bool,
}

impl KeyTracker {
    /// `keyboard_enhanced` says the terminal reports Shift keys and releases
    /// as separate events.
    pub fn new(keyboard_enhanced: bool) -> Self {
        KeyTracker {
            last_seen: HashMap::new(),
            keyboard_enhanced,
        }
    }

    /// Feed one terminal event observed during `frame`. Returns `true` for a
    /// quit request.
    pub fn handle(&mut self, event: &KeyEvent, frame: u64) -> bool {
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if event.kind == KeyEventKind::Press && is_quit(event) {
                    return true;
                }
                for key in map_key_event(event, !self.keyboard_enhanced) {
                    self.last_seen.insert(key, frame);
                }
            }
            KeyEventKind::Release => {
                for key in map_key_event(event, !self.keyboard_enhanced) {
                    self.last_seen.remove(&key);
                }
            }
        }
        false
    }

    pub fn is_held(&self, key: Key, frame: u64) -> bool {
        self.last_seen
            .get(&key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    /// Keys held at `frame`; stale entries are dropped on the way.
    pub fn pressed(&mut self, frame: u64) -> HashSet<Key> {
        self.last_seen
            .retain(|_, &mut last| frame.saturating_sub(last) <= HOLD_WINDOW);
        self.last_seen.keys().copied().collect()
    }
}
