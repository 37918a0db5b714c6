//! Range-camera acquisition: a [`FrameGrabber`] delivers amplitude and
//! distance frames, and [`Camera`] bounds how long a run waits for one.

pub mod error;
pub mod file;

use std::time::Duration;

use image::GrayImage;
use metrology::DistanceImage;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use error::{CaptureError, Result};
pub use file::{FileGrabber, save_frame_pair};

/// Co-registered amplitude and distance frames from one exposure
#[derive(Debug, Clone, PartialEq)]
pub struct FramePair {
    pub amplitude: GrayImage,
    pub distance: DistanceImage,
}

impl FramePair {
    pub fn new(amplitude: GrayImage, distance: DistanceImage) -> Result<Self> {
        if amplitude.dimensions() != distance.dimensions() {
            return Err(CaptureError::DimensionMismatch {
                amplitude: amplitude.dimensions(),
                distance: distance.dimensions(),
            });
        }
        Ok(Self { amplitude, distance })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.amplitude.dimensions()
    }
}

/// Source of frames, e.g. a camera driver or recorded files.
pub trait FrameGrabber {
    /// Wait up to `timeout` for the next frame; `Ok(None)` means the wait
    /// timed out and may be retried.
    fn wait_for_frame(&mut self, timeout: Duration) -> Result<Option<FramePair>>;
}

/// Retry policy for frame acquisition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CaptureParams {
    pub attempts: u32,
    pub timeout_ms: u64,
}

impl Default for CaptureParams {
    fn default() -> Self {
        Self {
            attempts: 5,
            timeout_ms: 1000,
        }
    }
}

/// Bounded-retry wrapper around a [`FrameGrabber`]
pub struct Camera<G> {
    grabber: G,
    params: CaptureParams,
}

impl<G: FrameGrabber> Camera<G> {
    pub fn new(grabber: G, params: CaptureParams) -> Self {
        Self { grabber, params }
    }

    /// Take a picture, failing with [`CaptureError::Timeout`] once every
    /// attempt has timed out.
    pub fn capture(&mut self) -> Result<FramePair> {
        let timeout = Duration::from_millis(self.params.timeout_ms);
        for attempt in 1..=self.params.attempts {
            match self.grabber.wait_for_frame(timeout)? {
                Some(frame) => {
                    debug!(attempt, dimensions = ?frame.dimensions(), "Frame received");
                    return Ok(frame);
                }
                None => warn!(attempt, max = self.params.attempts, "Timed out waiting for frame"),
            }
        }
        Err(CaptureError::Timeout {
            attempts: self.params.attempts,
        })
    }

    pub fn grabber(&self) -> &G {
        &self.grabber
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Times out `misses` times, then delivers a frame.
    struct FlakyGrabber {
        misses: u32,
        calls: u32,
        timeouts: Vec<Duration>,
    }

    impl FlakyGrabber {
        fn new(misses: u32) -> Self {
            Self { misses, calls: 0, timeouts: Vec::new() }
        }
    }

    impl FrameGrabber for FlakyGrabber {
        fn wait_for_frame(&mut self, timeout: Duration) -> Result<Option<FramePair>> {
            self.calls += 1;
            self.timeouts.push(timeout);
            if self.calls <= self.misses {
                return Ok(None);
            }
            let amplitude = GrayImage::from_pixel(4, 3, Luma([7]));
            let distance = DistanceImage::from_pixel(4, 3, Luma([1.25]));
            FramePair::new(amplitude, distance).map(Some)
        }
    }

    #[test]
    fn test_capture_retries_until_frame() {
        let mut camera = Camera::new(FlakyGrabber::new(4), CaptureParams::default());
        let frame = camera.capture().unwrap();
        assert_eq!(frame.dimensions(), (4, 3));
        assert_eq!(camera.grabber().calls, 5);
        assert!(camera.grabber().timeouts.iter().all(|t| *t == Duration::from_millis(1000)));
    }

    #[test]
    fn test_capture_times_out() {
        let mut camera = Camera::new(FlakyGrabber::new(5), CaptureParams::default());
        assert!(matches!(camera.capture(), Err(CaptureError::Timeout { attempts: 5 })));
        assert_eq!(camera.grabber().calls, 5);
    }

    #[test]
    fn test_frame_pair_dimension_check() {
        let result = FramePair::new(GrayImage::new(4, 3), DistanceImage::new(3, 4));
        assert!(matches!(result, Err(CaptureError::DimensionMismatch { .. })));
    }
}
