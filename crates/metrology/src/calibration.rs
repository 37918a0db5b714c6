use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Robot-frame positions (mm) of the four image corners plus the grasp
/// height (mm). Created once per session and reused across runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CalibrationFrame {
    pub top_left: [f64; 2],
    pub top_right: [f64; 2],
    pub bottom_left: [f64; 2],
    pub bottom_right: [f64; 2],
    pub grasp_z_mm: f64,
}

impl CalibrationFrame {
    /// Camera mounted on the left of the robot base
    pub fn left_mount() -> Self {
        Self {
            top_left: [116.0, -319.0],
            top_right: [34.0, -319.0],
            bottom_left: [116.0, -256.0],
            bottom_right: [34.0, -256.0],
            grasp_z_mm: 10.0,
        }
    }

    /// Camera mounted behind the robot base
    pub fn back_mount() -> Self {
        Self {
            top_left: [312.0, 80.0],
            top_right: [312.0, -85.0],
            bottom_left: [187.0, 80.0],
            bottom_right: [187.0, -85.0],
            grasp_z_mm: 10.0,
        }
    }
}

/// Supplies the calibration for a session.
pub trait CalibrationSource {
    fn get_calibration(&self) -> Result<CalibrationFrame>;
}

/// A calibration known up front, e.g. from a rig config file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticCalibration(pub CalibrationFrame);

impl CalibrationSource for StaticCalibration {
    fn get_calibration(&self) -> Result<CalibrationFrame> {
        Ok(self.0)
    }
}

/// Reads a [`CalibrationFrame`] serialized as JSON on every request, so an
/// operator can correct the file between runs.
#[derive(Debug, Clone)]
pub struct JsonCalibrationFile {
    path: PathBuf,
}

impl JsonCalibrationFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CalibrationSource for JsonCalibrationFile {
    fn get_calibration(&self) -> Result<CalibrationFrame> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetrologyError;

    #[test]
    fn test_static_source() {
        let source = StaticCalibration(CalibrationFrame::back_mount());
        assert_eq!(source.get_calibration().unwrap(), CalibrationFrame::back_mount());
    }

    #[test]
    fn test_json_file_source() {
        let path = std::env::temp_dir().join("metrology_calibration_test.json");
        let json = serde_json::to_string(&CalibrationFrame::left_mount()).unwrap();
        std::fs::write(&path, json).unwrap();

        let frame = JsonCalibrationFile::new(&path).get_calibration().unwrap();
        assert_eq!(frame, CalibrationFrame::left_mount());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let source = JsonCalibrationFile::new("/nonexistent/calibration.json");
        assert!(matches!(
            source.get_calibration(),
            Err(MetrologyError::CalibrationRead(_))
        ));
    }
}
