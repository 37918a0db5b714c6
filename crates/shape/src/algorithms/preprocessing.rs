use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::region_labelling::{Connectivity, connected_components};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::Result, traits::ImagePreprocessor};

const FOREGROUND: u8 = 255;

/// Gaussian blur preprocessor for sensor noise reduction
#[derive(Debug, Clone)]
pub struct GaussianBlurPreprocessor {
    pub sigma: f32,
}

impl Default for GaussianBlurPreprocessor {
    fn default() -> Self {
        Self { sigma: 1.0 }
    }
}

impl ImagePreprocessor for GaussianBlurPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(imageproc::filter::gaussian_blur_f32(image, self.sigma))
    }
}

/// Canny edge detector with fixed hysteresis thresholds
#[derive(Debug, Clone)]
pub struct CannyEdgePreprocessor {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for CannyEdgePreprocessor {
    fn default() -> Self {
        Self {
            low_threshold: 150.0,
            high_threshold: 190.0,
        }
    }
}

impl ImagePreprocessor for CannyEdgePreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(imageproc::edges::canny(image, self.low_threshold, self.high_threshold))
    }
}

/// Morphological closing with a square structuring element.
///
/// `radius` 3 is equivalent to three iterations of a 3×3 close.
#[derive(Debug, Clone)]
pub struct ClosingPreprocessor {
    pub radius: u8,
}

impl Default for ClosingPreprocessor {
    fn default() -> Self {
        Self { radius: 3 }
    }
}

impl ImagePreprocessor for ClosingPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(imageproc::morphology::close(image, Norm::LInf, self.radius))
    }
}

/// Fills every region enclosed by foreground so rings collapse to disks.
///
/// Background pixels 4-connected to either seed (the top-left corner and a
/// point near the middle of the top edge) are exterior; every other pixel
/// becomes foreground.
#[derive(Debug, Clone, Default)]
pub struct HoleFillPreprocessor;

impl HoleFillPreprocessor {
    fn seeds(width: u32, height: u32) -> [(u32, u32); 2] {
        [(0, 0), (width / 2, 10.min(height - 1))]
    }
}

impl ImagePreprocessor for HoleFillPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Ok(image.clone());
        }

        // Label background components; foreground pixels get label 0
        let labels = connected_components(image, Connectivity::Four, Luma([FOREGROUND]));
        let exterior: Vec<u32> = Self::seeds(width, height)
            .into_iter()
            .map(|(x, y)| labels.get_pixel(x, y)[0])
            .filter(|&label| label != 0)
            .collect();
        debug!(?exterior, "Exterior background labels");

        let filled = GrayImage::from_fn(width, height, |x, y| {
            let label = labels.get_pixel(x, y)[0];
            if image.get_pixel(x, y)[0] == FOREGROUND || !exterior.contains(&label) {
                Luma([FOREGROUND])
            } else {
                Luma([0])
            }
        });
        Ok(filled)
    }
}

/// Tunables for the standard mask preprocessing chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PreprocessParams {
    pub blur_sigma: f32,
    pub canny_low: f32,
    pub canny_high: f32,
    pub close_radius: u8,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            blur_sigma: 1.0,
            canny_low: 150.0,
            canny_high: 190.0,
            close_radius: 3,
        }
    }
}

impl PreprocessParams {
    /// The fixed blur → edges → close → fill chain
    pub fn chain(&self) -> Vec<Box<dyn ImagePreprocessor>> {
        vec![
            Box::new(GaussianBlurPreprocessor { sigma: self.blur_sigma }),
            Box::new(CannyEdgePreprocessor {
                low_threshold: self.canny_low,
                high_threshold: self.canny_high,
            }),
            Box::new(ClosingPreprocessor { radius: self.close_radius }),
            Box::new(HoleFillPreprocessor),
        ]
    }
}
