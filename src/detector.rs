// src/detector.rs - Hand landmark detector bridge
use anyhow::Result;
use image::DynamicImage;
use nalgebra::Vector3;

use crate::classifier::Handedness;

/// One detected hand in one frame: 21 landmarks in normalized [0,1]
/// camera space plus the detector's left/right label. Owned by the
/// detector output, read-only downstream.
#[derive(Debug, Clone)]
pub struct HandFrame {
    pub landmarks: Vec<Vector3<f64>>,
    pub handedness: Handedness,
}

/// Per-frame landmark source. Yields zero or more hands; the core never
/// calls back into it.
pub trait HandDetector {
    fn detect(&mut self, frame: &DynamicImage) -> Result<Vec<HandFrame>>;
}

/// Bridge to the native hand landmarker. Stub until the model backend is
/// linked in: reports no detections, which keeps the frame loop honest
/// end to end.
pub struct LandmarkBridge;

impl LandmarkBridge {
    pub fn new() -> Result<Self> {
        Ok(Self)
    }
}

impl HandDetector for LandmarkBridge {
    fn detect(&mut self, _frame: &DynamicImage) -> Result<Vec<HandFrame>> {
        Ok(Vec::new())
    }
}
