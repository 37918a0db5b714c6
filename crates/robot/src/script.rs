use std::fmt;

use crate::command::MotionCommand;

const PROGRAM_NAME: &str = "urProf";
const HOME_JOINTS: &str = "[0,-1.5708,0,-1.5708,0,0]";
const MOTION: &str = "a=1,v=1";
const INDENT: &str = "    ";

/// A complete robot-native program, ready to be sent as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrScript {
    program: String,
}

impl UrScript {
    /// Serialize commands into one program: header, one block per command,
    /// `end`. Millimetres become metres; angles stay in degrees and are
    /// converted with `d2r` on the controller.
    pub fn from_commands(commands: &[MotionCommand]) -> Self {
        let mut program = format!("def {}():\n", PROGRAM_NAME);
        for command in commands {
            for line in command_lines(command) {
                program.push_str(INDENT);
                program.push_str(&line);
                program.push('\n');
            }
        }
        program.push_str("end\n");
        Self { program }
    }

    pub fn as_str(&self) -> &str {
        &self.program
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.program.as_bytes()
    }
}

impl fmt::Display for UrScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)
    }
}

fn metres(mm: f64) -> f64 {
    mm / 1000.0
}

fn script_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn command_lines(command: &MotionCommand) -> Vec<String> {
    match *command {
        MotionCommand::MoveHome => vec![format!("movej({},{})", HOME_JOINTS, MOTION)],
        MotionCommand::MoveToPose { x_mm, y_mm, z_mm, rx, ry, rz } => vec![format!(
            "movej(p[{},{},{},{},{},{}],{})",
            metres(x_mm),
            metres(y_mm),
            metres(z_mm),
            rx,
            ry,
            rz,
            MOTION
        )],
        MotionCommand::MoveBy { dx_mm, dy_mm, z_mm, angle_deg, close_grip } => vec![
            format!("global x={}", metres(dx_mm)),
            format!("global y={}", metres(dy_mm)),
            format!("global z={}", metres(z_mm)),
            format!("global angle={}", angle_deg),
            "angle=d2r(angle)".to_string(),
            "global pos=get_actual_tcp_pose()".to_string(),
            "pos[0]=pos[0]+x".to_string(),
            "pos[1]=pos[1]+y".to_string(),
            "pos[2]=z".to_string(),
            "pos[3]=angle".to_string(),
            format!("set_tool_digital_out(0,{})", script_bool(close_grip)),
            format!("movel(pos,{})", MOTION),
        ],
    }
}
