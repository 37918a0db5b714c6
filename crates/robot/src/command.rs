use metrology::{CalibrationFrame, RobotOffset};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Height above the base at which the arm parks over the Top-Left corner (mm)
pub const APPROACH_Z_MM: f64 = 157.28;

/// Tool orientation (rotation vector, rad) used for the approach pose
pub const APPROACH_ORIENTATION: [f64; 3] = [0.0001, -3.166, -0.04];

/// Lift above the grasp height before and after the pick (mm)
pub const LIFT_MM: f64 = 200.0;

/// Hover above the grasp height while moving over the object (mm)
pub const HOVER_MM: f64 = 100.0;

/// One robot motion primitive.
///
/// Distances are millimetres. In `MoveBy`, `dx_mm`/`dy_mm` are relative to
/// the current tool position while `z_mm` is the absolute tool height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Display)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MotionCommand {
    /// Joint move to the home configuration
    MoveHome,
    /// Joint move to an absolute tool pose
    MoveToPose {
        x_mm: f64,
        y_mm: f64,
        z_mm: f64,
        rx: f64,
        ry: f64,
        rz: f64,
    },
    /// Linear move by an offset, rotating the tool and setting the gripper
    MoveBy {
        dx_mm: f64,
        dy_mm: f64,
        z_mm: f64,
        angle_deg: f64,
        close_grip: bool,
    },
}

/// The pick sequence: home, park over the Top-Left corner, lift, move over
/// the object, descend, grip, lift.
pub fn plan_pick(
    calibration: &CalibrationFrame,
    offset: RobotOffset,
    grasp_z_mm: f64,
    angle_deg: f64,
) -> Vec<MotionCommand> {
    let [rx, ry, rz] = APPROACH_ORIENTATION;
    let step = |dx_mm, dy_mm, z_mm, close_grip| MotionCommand::MoveBy {
        dx_mm,
        dy_mm,
        z_mm,
        angle_deg,
        close_grip,
    };

    vec![
        MotionCommand::MoveHome,
        MotionCommand::MoveToPose {
            x_mm: calibration.top_left[0],
            y_mm: calibration.top_left[1],
            z_mm: APPROACH_Z_MM,
            rx,
            ry,
            rz,
        },
        step(0.0, 0.0, grasp_z_mm + LIFT_MM, false),
        step(offset.dx, offset.dy, grasp_z_mm + HOVER_MM, false),
        step(0.0, 0.0, grasp_z_mm, false),
        step(0.0, 0.0, grasp_z_mm, true),
        step(0.0, 0.0, grasp_z_mm + LIFT_MM, true),
    ]
}
