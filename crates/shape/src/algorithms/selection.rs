use tracing::{debug, info, warn};

use crate::{
    geometry::min_area_rect,
    types::{ClassificationReport, ClassifiedHull, ShapeLabel, TargetSelection},
};

/// Scans classified hulls for the requested label.
///
/// The first hull whose label equals the target wins and the scan stops
/// there; the `All` wildcard matches every hull and never stops early.
/// Pose and contour are only reported for physical labels.
#[derive(Debug, Clone, Copy)]
pub struct TargetSelector {
    pub target: ShapeLabel,
}

impl TargetSelector {
    pub fn new(target: ShapeLabel) -> Self {
        Self { target }
    }

    /// Consume classified hulls until the target is found.
    ///
    /// `classified` is pulled lazily, so hulls after the match are never
    /// classified at all.
    pub fn select<I>(&self, classified: I, image_width: u32, image_height: u32) -> ClassificationReport
    where
        I: IntoIterator<Item = ClassifiedHull>,
    {
        let mut report = ClassificationReport {
            image_width,
            image_height,
            target: self.target,
            detected: Vec::new(),
            classified: Vec::new(),
            selection: None,
        };

        for hull in classified {
            let label = hull.label;
            report.detected.push(label);

            if self.target != ShapeLabel::All && label == self.target {
                if self.target.is_physical() {
                    report.selection = min_area_rect(&hull.hull.to_f64()).map(|pose| {
                        TargetSelection {
                            contour: hull.approx.clone(),
                            pose,
                        }
                    });
                } else {
                    debug!(%label, "Matched a non-physical label, pose suppressed");
                }
                report.classified.push(hull);
                break;
            }
            report.classified.push(hull);
        }

        match &report.selection {
            Some(selection) => info!(
                target = %self.target,
                center = ?selection.center(),
                angle = selection.angle(),
                "Target found"
            ),
            None if self.target.is_physical() => {
                warn!(target = %self.target, detected = ?report.detected, "Target not found")
            }
            None => info!(detected = ?report.detected, "Shapes detected"),
        }
        report
    }
}
