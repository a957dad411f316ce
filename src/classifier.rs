// src/classifier.rs - Per-frame gesture classification
use nalgebra::Vector3;

use crate::geometry::{
    self, PinchShape, INDEX_DIP, INDEX_TIP, LANDMARK_COUNT, MIDDLE_MCP, MIDDLE_DIP, MIDDLE_TIP,
    PINKY_DIP, PINKY_MCP, PINKY_TIP, RING_DIP, RING_MCP, RING_TIP, WRIST,
};

/// Which hand the detector saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

/// Active navigation context. Selected at startup, toggled only by voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Slide,
    Document,
}

impl Mode {
    pub fn toggled(self) -> Mode {
        match self {
            Mode::Slide => Mode::Document,
            Mode::Document => Mode::Slide,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Slide => "slide",
            Mode::Document => "document",
        }
    }
}

/// Raw per-frame gesture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureSymbol {
    None,
    Next,
    Prev,
    Up,
    Down,
    ZoomIn,
    ZoomOut,
    Voice,
}

/// Classify one hand skeleton into a gesture symbol for the given mode.
///
/// Rules are checked in a fixed priority order and the first match wins.
/// The voice gesture is recognized in every mode; all other gestures are
/// mode-specific. Deterministic: same input, same output.
pub fn classify(skel: &[Vector3<f64>], handedness: Handedness, mode: Mode) -> GestureSymbol {
    if skel.len() < LANDMARK_COUNT {
        return GestureSymbol::None;
    }

    // Voice: index and middle raised past wrist and their reference joints,
    // ring and pinky staying down. The escape hatch into the voice session.
    if geometry::above(skel, INDEX_TIP, INDEX_DIP)
        && geometry::above(skel, MIDDLE_TIP, MIDDLE_DIP)
        && !geometry::above(skel, RING_TIP, RING_MCP)
        && !geometry::above(skel, PINKY_TIP, PINKY_MCP)
        && geometry::above(skel, INDEX_TIP, WRIST)
        && geometry::above(skel, MIDDLE_TIP, WRIST)
    {
        return GestureSymbol::Voice;
    }

    match mode {
        Mode::Slide => classify_slide(skel, handedness),
        Mode::Document => classify_document(skel),
    }
}

fn classify_slide(skel: &[Vector3<f64>], handedness: Handedness) -> GestureSymbol {
    // Pointing hand dips the index tip below the wrist in image space.
    let wrist_above_index = geometry::above(skel, WRIST, INDEX_TIP);

    match handedness {
        // Next: right hand pointing right, other fingers not trailing along.
        Handedness::Right => {
            if wrist_above_index
                && geometry::right_of(skel, INDEX_TIP, INDEX_DIP)
                && !(geometry::right_of(skel, MIDDLE_TIP, MIDDLE_DIP)
                    || geometry::right_of(skel, RING_TIP, RING_DIP)
                    || geometry::right_of(skel, PINKY_TIP, PINKY_DIP))
            {
                return GestureSymbol::Next;
            }
        }
        // Prev: mirrored, left hand pointing left.
        Handedness::Left => {
            if wrist_above_index
                && geometry::left_of(skel, INDEX_TIP, INDEX_DIP)
                && !(geometry::left_of(skel, MIDDLE_TIP, MIDDLE_DIP)
                    || geometry::left_of(skel, RING_TIP, RING_DIP)
                    || geometry::left_of(skel, PINKY_TIP, PINKY_DIP))
            {
                return GestureSymbol::Prev;
            }
        }
    }

    GestureSymbol::None
}

fn classify_document(skel: &[Vector3<f64>]) -> GestureSymbol {
    // Scroll up: index raised alone.
    if geometry::above(skel, INDEX_TIP, WRIST)
        && geometry::above(skel, INDEX_TIP, INDEX_DIP)
        && !(geometry::above(skel, MIDDLE_TIP, MIDDLE_MCP)
            || geometry::above(skel, RING_TIP, RING_MCP)
            || geometry::above(skel, PINKY_TIP, PINKY_MCP))
    {
        return GestureSymbol::Up;
    }

    // Scroll down: index dropped alone.
    if geometry::above(skel, WRIST, INDEX_TIP)
        && geometry::above(skel, INDEX_DIP, INDEX_TIP)
        && !(geometry::above(skel, MIDDLE_DIP, MIDDLE_TIP)
            || geometry::above(skel, RING_DIP, RING_TIP)
            || geometry::above(skel, PINKY_DIP, PINKY_TIP))
    {
        return GestureSymbol::Down;
    }

    // Scroll rules take priority over pinch rules.
    match geometry::pinch(skel) {
        PinchShape::Close => GestureSymbol::ZoomIn,
        PinchShape::Far => GestureSymbol::ZoomOut,
        PinchShape::Open => GestureSymbol::None,
    }
}
