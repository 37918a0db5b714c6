use image::GrayImage;
use crate::{error::Result, types::Hull};

/// Trait for mask preprocessing steps (blur, edges, morphology, hole filling)
pub trait ImagePreprocessor: Send + Sync {
    /// Derive a new image from the input; the input is never mutated
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage>;
}

/// Trait for boundary extraction from a binary mask
pub trait HullExtractor: Send + Sync {
    /// Extract the convex hull of every closed boundary, in extraction order
    fn extract_hulls(&self, mask: &GrayImage) -> Result<Vec<Hull>>;
}
