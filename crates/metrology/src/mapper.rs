use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    calibration::CalibrationFrame,
    error::{MetrologyError, Result},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MapperParams {
    /// Largest allowed disagreement between the horizontal and vertical
    /// pixel-to-mm ratios
    pub ratio_tolerance_mm_per_px: f64,
}

impl Default for MapperParams {
    fn default() -> Self {
        Self { ratio_tolerance_mm_per_px: 0.01 }
    }
}

/// Robot-frame translation (mm) from the Top-Left corner to the object center
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct RobotOffset {
    pub dx: f64,
    pub dy: f64,
}

/// Converts image-plane centers into robot-frame offsets.
#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    pub calibration: CalibrationFrame,
    pub params: MapperParams,
}

impl CoordinateMapper {
    pub fn new(calibration: CalibrationFrame, params: MapperParams) -> Self {
        Self { calibration, params }
    }

    /// Millimetres per pixel implied by the calibration corners.
    ///
    /// Top-Right − Top-Left spans the image width and Bottom-Left − Top-Left
    /// spans its height; the two ratios must agree within tolerance.
    pub fn ratio(&self, image_width: u32, image_height: u32) -> Result<f64> {
        if image_width == 0 || image_height == 0 {
            return Err(MetrologyError::EmptyImage {
                width: image_width,
                height: image_height,
            });
        }
        let c = &self.calibration;
        let horizontal = distance(c.top_left, c.top_right) / image_width as f64;
        let vertical = distance(c.top_left, c.bottom_left) / image_height as f64;

        if (vertical - horizontal).abs() > self.params.ratio_tolerance_mm_per_px {
            return Err(MetrologyError::InvalidCalibration { horizontal, vertical });
        }
        debug!(horizontal, vertical, "Pixel to mm ratio");
        Ok(vertical)
    }

    /// Offset of a pixel center, corrected for the camera mounting side.
    ///
    /// A positive Top-Left x (y) flips the x (y) axis; a Top-Left whose
    /// coordinates share a sign swaps the axes.
    pub fn map(&self, center: [f64; 2], image_width: u32, image_height: u32) -> Result<RobotOffset> {
        let ratio = self.ratio(image_width, image_height)?;
        let [tl_x, tl_y] = self.calibration.top_left;

        let mut dx = center[0] * ratio;
        let mut dy = center[1] * ratio;
        if tl_x > 0.0 {
            dx = -dx;
        }
        if tl_y > 0.0 {
            dy = -dy;
        }
        if (tl_x > 0.0 && tl_y > 0.0) || (tl_x < 0.0 && tl_y < 0.0) {
            std::mem::swap(&mut dx, &mut dy);
        }
        Ok(RobotOffset { dx, dy })
    }

    /// Like [`map`](Self::map), but an invalid calibration yields a zero
    /// offset. The error is handed back so the caller can surface it.
    pub fn offset_or_zero(
        &self,
        center: [f64; 2],
        image_width: u32,
        image_height: u32,
    ) -> (RobotOffset, Option<MetrologyError>) {
        match self.map(center, image_width, image_height) {
            Ok(offset) => (offset, None),
            Err(e) => {
                warn!(error = %e, "Falling back to a zero offset");
                (RobotOffset::default(), Some(e))
            }
        }
    }
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    (b[0] - a[0]).hypot(b[1] - a[1])
}
