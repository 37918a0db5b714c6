use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Timeout waiting for camera after {attempts} attempts")]
    Timeout { attempts: u32 },

    #[error("Failed to load frame: {0}")]
    Image(#[from] image::ImageError),

    #[error(
        "Amplitude frame is {amplitude:?} but distance frame is {distance:?}"
    )]
    DimensionMismatch { amplitude: (u32, u32), distance: (u32, u32) },
}

pub type Result<T> = std::result::Result<T, CaptureError>;
