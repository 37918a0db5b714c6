use std::path::{Path, PathBuf};
use std::time::Duration;

use image::{ImageBuffer, Luma};
use metrology::DistanceImage;
use tracing::debug;

use crate::{FrameGrabber, FramePair, error::Result};

/// Distances on disk are 16-bit grayscale in millimetres
const MM_PER_M: f32 = 1000.0;

/// Replays a recorded exposure from an amplitude image and a 16-bit
/// distance image. Every wait succeeds immediately.
#[derive(Debug, Clone)]
pub struct FileGrabber {
    amplitude_path: PathBuf,
    distance_path: PathBuf,
}

impl FileGrabber {
    pub fn new(amplitude_path: impl AsRef<Path>, distance_path: impl AsRef<Path>) -> Self {
        Self {
            amplitude_path: amplitude_path.as_ref().to_path_buf(),
            distance_path: distance_path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<FramePair> {
        let amplitude = image::open(&self.amplitude_path)?.to_luma8();
        let raw = image::open(&self.distance_path)?.to_luma16();
        let distance = DistanceImage::from_fn(raw.width(), raw.height(), |x, y| {
            Luma([raw.get_pixel(x, y)[0] as f32 / MM_PER_M])
        });
        debug!(
            amplitude = %self.amplitude_path.display(),
            distance = %self.distance_path.display(),
            "Loaded recorded frame"
        );
        FramePair::new(amplitude, distance)
    }
}

impl FrameGrabber for FileGrabber {
    fn wait_for_frame(&mut self, _timeout: Duration) -> Result<Option<FramePair>> {
        self.load().map(Some)
    }
}

/// Write a frame pair in the layout [`FileGrabber`] reads back.
pub fn save_frame_pair(
    frame: &FramePair,
    amplitude_path: impl AsRef<Path>,
    distance_path: impl AsRef<Path>,
) -> Result<()> {
    frame.amplitude.save(amplitude_path)?;
    let (width, height) = frame.distance.dimensions();
    let raw: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_fn(width, height, |x, y| {
        let mm = (frame.distance.get_pixel(x, y)[0] * MM_PER_M).round();
        Luma([mm.clamp(0.0, u16::MAX as f32) as u16])
    });
    raw.save(distance_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Camera, CaptureParams};
    use image::GrayImage;

    #[test]
    fn test_recorded_frame_round_trip() {
        let dir = std::env::temp_dir();
        let amplitude_path = dir.join("capture_file_test_amp.png");
        let distance_path = dir.join("capture_file_test_dist.png");

        let amplitude = GrayImage::from_fn(8, 6, |x, _| Luma([x as u8 * 10]));
        let distance = DistanceImage::from_fn(8, 6, |_, y| Luma([0.9 + y as f32 * 0.01]));
        let frame = FramePair::new(amplitude, distance).unwrap();
        save_frame_pair(&frame, &amplitude_path, &distance_path).unwrap();

        let grabber = FileGrabber::new(&amplitude_path, &distance_path);
        let loaded = Camera::new(grabber, CaptureParams::default()).capture().unwrap();
        assert_eq!(loaded.amplitude, frame.amplitude);
        let d = loaded.distance.get_pixel(3, 5)[0];
        assert!((d - 0.95).abs() < 1e-6, "distance {}", d);

        let _ = std::fs::remove_file(&amplitude_path);
        let _ = std::fs::remove_file(&distance_path);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut grabber = FileGrabber::new("/nonexistent/a.png", "/nonexistent/d.png");
        assert!(grabber.wait_for_frame(Duration::from_millis(1)).is_err());
    }
}
