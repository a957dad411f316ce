// src/debounce.rs - Hold-to-confirm filtering of the raw symbol stream
use std::time::{Duration, Instant};

use crate::classifier::GestureSymbol;

/// How long a symbol must be observed unchanged before it fires,
/// and the minimum spacing between re-fires of a held symbol.
pub const HOLD_THRESHOLD: Duration = Duration::from_millis(500);

/// Turns noisy per-frame gesture symbols into confirmed triggers.
///
/// Raw classification flickers at transition edges; requiring a steady
/// half-second hold trades a little latency for stability, and re-arming
/// the timer on every fire keeps a held gesture from machine-gunning.
pub struct GestureDebouncer {
    last_symbol: GestureSymbol,
    stamp: Instant,
}

impl GestureDebouncer {
    pub fn new(now: Instant) -> Self {
        Self {
            last_symbol: GestureSymbol::None,
            stamp: now,
        }
    }

    /// Feed one frame's symbol; returns the symbol to act on, if any.
    pub fn update(&mut self, symbol: GestureSymbol, now: Instant) -> Option<GestureSymbol> {
        if symbol != self.last_symbol {
            self.last_symbol = symbol;
            self.stamp = now;
            return None;
        }

        if symbol != GestureSymbol::None && now.duration_since(self.stamp) >= HOLD_THRESHOLD {
            self.stamp = now;
            return Some(symbol);
        }

        None
    }
}
