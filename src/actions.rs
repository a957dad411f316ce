// src/actions.rs - OS input injection behind a fire-and-forget trait
use std::sync::Mutex;

use enigo::{Enigo, KeyboardControllable, MouseControllable};

/// Keys the controller knows how to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Right,
    Left,
    Ctrl,
    Plus,
    Minus,
    W,
}

/// Scroll step per confirmed scroll gesture, in executor units (positive = up).
pub const SCROLL_STEP: i32 = 250;

/// Sink for navigation commands. Implementations are fire-and-forget:
/// the core never reads anything back.
pub trait ActionExecutor: Send + Sync {
    fn press(&self, key: Key);
    fn scroll(&self, amount: i32);
    fn hotkey(&self, modifier: Key, key: Key);
}

/// Production executor backed by enigo. Enigo is not `Sync`, so the
/// handle lives behind a mutex; contention is negligible at command cadence.
pub struct EnigoExecutor {
    enigo: Mutex<Enigo>,
}

impl EnigoExecutor {
    pub fn new() -> Self {
        Self {
            enigo: Mutex::new(Enigo::new()),
        }
    }

    fn map(key: Key) -> enigo::Key {
        match key {
            Key::Right => enigo::Key::RightArrow,
            Key::Left => enigo::Key::LeftArrow,
            Key::Ctrl => enigo::Key::Control,
            Key::Plus => enigo::Key::Layout('+'),
            Key::Minus => enigo::Key::Layout('-'),
            Key::W => enigo::Key::Layout('w'),
        }
    }
}

impl Default for EnigoExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionExecutor for EnigoExecutor {
    fn press(&self, key: Key) {
        if let Ok(mut enigo) = self.enigo.lock() {
            enigo.key_click(Self::map(key));
        }
    }

    fn scroll(&self, amount: i32) {
        if let Ok(mut enigo) = self.enigo.lock() {
            // Positive means up for callers; enigo counts the other way.
            enigo.mouse_scroll_y(-amount);
        }
    }

    fn hotkey(&self, modifier: Key, key: Key) {
        if let Ok(mut enigo) = self.enigo.lock() {
            enigo.key_down(Self::map(modifier));
            enigo.key_click(Self::map(key));
            enigo.key_up(Self::map(modifier));
        }
    }
}
