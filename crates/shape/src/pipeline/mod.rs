pub mod builder;

use image::GrayImage;
use tracing::debug;

use crate::{
    algorithms::{ShapeClassifier, TargetSelector},
    error::{Result, ShapeError},
    traits::{HullExtractor, ImagePreprocessor},
    types::{ClassificationReport, ShapeLabel},
};

/// Frame-to-report classification pipeline: preprocessing chain, hull
/// extraction, classification and target selection, in that order.
pub struct ShapePipeline {
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    extractor: Box<dyn HullExtractor>,
    classifier: ShapeClassifier,
}

impl ShapePipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::ShapePipelineBuilder {
        builder::ShapePipelineBuilder::new()
    }

    pub fn new(
        preprocessors: Vec<Box<dyn ImagePreprocessor>>,
        extractor: Box<dyn HullExtractor>,
        classifier: ShapeClassifier,
    ) -> Self {
        Self {
            preprocessors,
            extractor,
            classifier,
        }
    }

    /// Run the preprocessing chain. The source frame is left untouched.
    pub fn preprocess(&self, frame: &GrayImage) -> Result<GrayImage> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(ShapeError::EmptyFrame { width, height });
        }

        let mut mask = frame.clone();
        for preprocessor in &self.preprocessors {
            mask = preprocessor.preprocess(&mask)?;
        }
        Ok(mask)
    }

    /// Extract, classify and select on an already preprocessed mask
    pub fn classify_mask(&self, mask: &GrayImage, target: ShapeLabel) -> Result<ClassificationReport> {
        let (width, height) = mask.dimensions();
        let hulls = self.extractor.extract_hulls(mask)?;
        debug!(hulls = hulls.len(), %target, "Scanning hulls");

        let classified = self.classifier.classify_all(&hulls, width, height);
        Ok(TargetSelector::new(target).select(classified, width, height))
    }

    /// Full pass over a raw amplitude frame
    pub fn classify(&self, frame: &GrayImage, target: ShapeLabel) -> Result<ClassificationReport> {
        let mask = self.preprocess(frame)?;
        self.classify_mask(&mask, target)
    }
}

impl Default for ShapePipeline {
    fn default() -> Self {
        builder::ShapePipelineBuilder::new()
            .with_standard_preprocessing()
            .build()
    }
}
