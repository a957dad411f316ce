// src/geometry.rs - Pure geometric predicates over a 21-point hand skeleton
use nalgebra::Vector3;

// MediaPipe hand landmark indices
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Number of landmarks the detector reports per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Thumb-index separation below which the hand reads as a pinch.
const PINCH_CLOSE: f64 = 0.05;
/// Thumb-index separation above which the hand reads as fully spread.
const PINCH_FAR: f64 = 0.1;

/// Thumb-index relationship in normalized image space.
///
/// The band between the two thresholds is a deliberate dead zone:
/// a hand resting there maps to no gesture at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinchShape {
    Close,
    Far,
    Open,
}

/// `a` is higher than `b` in the image (smaller y is higher).
pub fn above(skel: &[Vector3<f64>], a: usize, b: usize) -> bool {
    skel[a].y < skel[b].y
}

/// `a` is further right than `b` in the image.
pub fn right_of(skel: &[Vector3<f64>], a: usize, b: usize) -> bool {
    skel[a].x > skel[b].x
}

/// `a` is further left than `b` in the image.
pub fn left_of(skel: &[Vector3<f64>], a: usize, b: usize) -> bool {
    skel[a].x < skel[b].x
}

/// Euclidean distance between two landmarks in the (x, y) image plane.
/// Depth is detector-estimated and too noisy to measure against.
pub fn planar_distance(skel: &[Vector3<f64>], a: usize, b: usize) -> f64 {
    let dx = skel[a].x - skel[b].x;
    let dy = skel[a].y - skel[b].y;
    (dx * dx + dy * dy).sqrt()
}

/// Classify the thumb-index pinch from per-axis separations.
pub fn pinch(skel: &[Vector3<f64>]) -> PinchShape {
    let dx = (skel[THUMB_TIP].x - skel[INDEX_TIP].x).abs();
    let dy = (skel[THUMB_TIP].y - skel[INDEX_TIP].y).abs();

    if dx < PINCH_CLOSE && dy < PINCH_CLOSE {
        PinchShape::Close
    } else if dx > PINCH_FAR && dy > PINCH_FAR {
        PinchShape::Far
    } else {
        PinchShape::Open
    }
}
