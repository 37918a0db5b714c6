use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetrologyError {
    #[error("Contour is empty; no target was found upstream")]
    EmptyContour,

    #[error("No {region} pixels to average over")]
    EmptyRegion { region: &'static str },

    #[error(
        "Calibration corners disagree with the image: {horizontal:.4} mm/px horizontally, {vertical:.4} mm/px vertically"
    )]
    InvalidCalibration { horizontal: f64, vertical: f64 },

    #[error("Image has no pixels: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("Failed to read calibration: {0}")]
    CalibrationRead(#[from] std::io::Error),

    #[error("Failed to parse calibration: {0}")]
    CalibrationParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MetrologyError>;
