// src/capture.rs - Webcam capture shim
use anyhow::Result;
use image::{DynamicImage, ImageBuffer};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::Camera;
use tracing::debug;

/// Wraps a nokhwa camera and hands out mirrored RGBA frames.
pub struct CameraSource {
    camera: Camera,
}

impl CameraSource {
    pub fn new(index: u32) -> Result<Self> {
        debug!(index, "opening camera");

        let format = CameraFormat::new(Resolution::new(640, 480), FrameFormat::MJPEG, 30);
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Exact(format));

        let camera = Camera::new(CameraIndex::Index(index), requested)
            .map_err(|e| anyhow::anyhow!("failed to open camera {index}: {e}"))?;

        Ok(Self { camera })
    }

    /// Grab one frame, mirrored horizontally so on-screen movement
    /// matches the user's own left/right.
    pub fn read_frame(&mut self) -> Result<DynamicImage> {
        if !self.camera.is_stream_open() {
            self.camera
                .open_stream()
                .map_err(|e| anyhow::anyhow!("failed to open camera stream: {e}"))?;
        }

        let frame = self
            .camera
            .frame()
            .map_err(|e| anyhow::anyhow!("failed to capture frame: {e}"))?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| anyhow::anyhow!("failed to decode frame: {e}"))?;

        let width = decoded.width();
        let height = decoded.height();
        let rgb_data = decoded.into_vec();

        let mut rgba_data = Vec::with_capacity((width * height * 4) as usize);
        for chunk in rgb_data.chunks(3) {
            rgba_data.push(chunk[0]);
            rgba_data.push(chunk[1]);
            rgba_data.push(chunk[2]);
            rgba_data.push(255);
        }

        let img = ImageBuffer::from_raw(width, height, rgba_data)
            .ok_or_else(|| anyhow::anyhow!("failed to create image buffer"))?;

        let flipped = image::imageops::flip_horizontal(&img);
        Ok(DynamicImage::ImageRgba8(flipped))
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        let _ = self.camera.stop_stream();
    }
}
