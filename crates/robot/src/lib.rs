//! Motion planning and delivery for the pick arm.
//!
//! [`plan_pick`] turns a robot-frame offset into [`MotionCommand`]s,
//! [`UrScript`] renders them as a controller program and a
//! [`RobotTransport`] delivers it.

pub mod error;
pub mod command;
pub mod script;
pub mod transport;

pub use error::{Result, RobotError};
pub use command::{MotionCommand, plan_pick};
pub use script::UrScript;
pub use transport::{RobotTransport, TcpTransport, TransportParams};
