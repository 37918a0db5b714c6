//! Depth-based object measurement and camera-to-robot coordinate mapping.
//!
//! [`SizeEstimator`] turns a selected contour and its distance frame into a
//! [`SizeEstimate`]; [`CoordinateMapper`] turns the contour's pixel center
//! into a [`RobotOffset`] using a [`CalibrationFrame`].

pub mod error;
pub mod size;
pub mod calibration;
pub mod mapper;

pub use error::{MetrologyError, Result};
pub use size::{DistanceImage, MetrologyParams, SizeEstimate, SizeEstimator, fill_polygon};
pub use calibration::{CalibrationFrame, CalibrationSource, JsonCalibrationFile, StaticCalibration};
pub use mapper::{CoordinateMapper, MapperParams, RobotOffset};
