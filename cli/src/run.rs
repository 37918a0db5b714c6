use capture::{Camera, CaptureError, FrameGrabber, FramePair};
use metrology::{CoordinateMapper, MetrologyError, RobotOffset, SizeEstimate, SizeEstimator};
use robot::{MotionCommand, RobotError, RobotTransport, UrScript, plan_pick};
use serde::{Deserialize, Serialize};
use shape::{ShapeError, ShapeLabel, ShapePipeline, render_annotations};
use thiserror::Error;
use tracing::{info, warn};

use crate::RigConfig;

#[derive(Error, Debug)]
pub enum PickError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Metrology(#[from] MetrologyError),
    #[error(transparent)]
    Robot(#[from] RobotError),
    #[error("Failed to write annotated image: {0}")]
    Annotation(#[from] image::ImageError),
}

/// Outcome of one pick run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickReport {
    pub target: ShapeLabel,
    /// Labels seen in scan order, up to the match
    pub detected: Vec<ShapeLabel>,
    pub contour: Vec<[i32; 2]>,
    pub center: Option<[f64; 2]>,
    pub angle: Option<f64>,
    pub size: Option<SizeEstimate>,
    pub offset: RobotOffset,
    pub grasp_z_mm: Option<f64>,
    /// Empty when there is nothing to pick
    pub commands: Vec<MotionCommand>,
    /// Recovered conditions, e.g. no target or a bad calibration
    pub conditions: Vec<String>,
    pub sent: bool,
}

/// Capture, classify, measure, map and plan; nothing is sent.
pub fn plan_run<G: FrameGrabber>(
    config: &RigConfig,
    camera: &mut Camera<G>,
) -> Result<PickReport, PickError> {
    let FramePair { amplitude, distance } = camera.capture()?;
    let (width, height) = amplitude.dimensions();

    let pipeline = ShapePipeline::builder()
        .with_preprocessing(&config.preprocess)
        .with_classifier_params(config.classifier.clone())
        .build();
    let mask = pipeline.preprocess(&amplitude)?;
    let classification = pipeline.classify_mask(&mask, config.target)?;

    if let Some(path) = &config.annotated_output {
        render_annotations(&mask, &classification, None).save(path)?;
        info!(%path, "Annotated image written");
    }

    let mut report = PickReport {
        target: config.target,
        detected: classification.detected.clone(),
        contour: classification.contour().vertices,
        center: classification.center(),
        angle: classification.angle(),
        size: None,
        offset: RobotOffset::default(),
        grasp_z_mm: None,
        commands: Vec::new(),
        conditions: Vec::new(),
        sent: false,
    };

    let Some(selection) = &classification.selection else {
        report
            .conditions
            .push(format!("No {} found among {:?}", config.target, report.detected));
        return Ok(report);
    };

    let size = match SizeEstimator::new(config.metrology.clone()).estimate(&selection.contour, &distance) {
        Ok(size) => size,
        Err(e) => {
            warn!(error = %e, "Size estimation failed");
            report.conditions.push(e.to_string());
            return Ok(report);
        }
    };
    report.size = Some(size);

    let calibration = config.calibration.source().get_calibration()?;
    let mapper = CoordinateMapper::new(calibration, config.mapper.clone());
    let (offset, condition) = mapper.offset_or_zero(selection.center(), width, height);
    if let Some(e) = condition {
        report.conditions.push(e.to_string());
    }
    report.offset = offset;

    let grasp_z_mm = calibration.grasp_z_mm + size.height * 1000.0;
    report.grasp_z_mm = Some(grasp_z_mm);
    report.commands = plan_pick(&calibration, offset, grasp_z_mm, selection.angle());

    info!(
        ?offset,
        grasp_z_mm,
        commands = report.commands.len(),
        "Pick planned"
    );
    Ok(report)
}

/// Full run. The program is delivered only when a transport is given and
/// there is something to pick.
pub async fn run_pick<G, T>(
    config: &RigConfig,
    camera: &mut Camera<G>,
    transport: Option<&T>,
) -> Result<PickReport, PickError>
where
    G: FrameGrabber,
    T: RobotTransport,
{
    let mut report = plan_run(config, camera)?;

    match transport {
        Some(transport) if !report.commands.is_empty() => {
            transport.send(&UrScript::from_commands(&report.commands)).await?;
            report.sent = true;
        }
        Some(_) => warn!("Nothing to pick, program not sent"),
        None => info!("Dry run, program not sent"),
    }
    Ok(report)
}
