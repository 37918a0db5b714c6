use crate::{
    algorithms::{
        ClassifierParams, ImageprocHullExtractor, PreprocessParams, ShapeClassifier,
    },
    pipeline::ShapePipeline,
    traits::{HullExtractor, ImagePreprocessor},
};

/// Builder for classification pipelines with a fluent API
pub struct ShapePipelineBuilder {
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    extractor: Option<Box<dyn HullExtractor>>,
    classifier_params: ClassifierParams,
}

impl ShapePipelineBuilder {
    pub fn new() -> Self {
        Self {
            preprocessors: Vec::new(),
            extractor: None,
            classifier_params: ClassifierParams::default(),
        }
    }

    /// Add a preprocessor to the end of the chain
    pub fn add_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: ImagePreprocessor + 'static,
    {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    /// Append the blur → edges → close → fill chain with default thresholds
    pub fn with_standard_preprocessing(self) -> Self {
        self.with_preprocessing(&PreprocessParams::default())
    }

    /// Append the blur → edges → close → fill chain
    pub fn with_preprocessing(mut self, params: &PreprocessParams) -> Self {
        self.preprocessors.extend(params.chain());
        self
    }

    /// Set the hull extractor (replaces any existing one)
    pub fn set_extractor<E>(mut self, extractor: E) -> Self
    where
        E: HullExtractor + 'static,
    {
        self.extractor = Some(Box::new(extractor));
        self
    }

    pub fn with_classifier_params(mut self, params: ClassifierParams) -> Self {
        self.classifier_params = params;
        self
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> ShapePipeline {
        let extractor = self
            .extractor
            .unwrap_or_else(|| Box::new(ImageprocHullExtractor));

        ShapePipeline::new(
            self.preprocessors,
            extractor,
            ShapeClassifier::new(self.classifier_params),
        )
    }
}

impl Default for ShapePipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
