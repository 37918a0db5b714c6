pub mod run;

use capture::CaptureParams;
use metrology::{
    CalibrationFrame, CalibrationSource, JsonCalibrationFile, MapperParams, MetrologyParams,
    StaticCalibration,
};
use robot::TransportParams;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shape::{ClassifierParams, PreprocessParams, ShapeLabel};
use std::fs;
use std::path::Path;
use strum::{Display, EnumString};
use thiserror::Error;

pub use run::{PickError, PickReport, plan_run, run_pick};

#[derive(Error, Debug)]
pub enum RigConfigError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Reference camera mountings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Display, EnumString, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RigMount {
    Left,
    Back,
}

/// Where the session's calibration comes from
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum CalibrationSetting {
    Preset { mount: RigMount },
    Inline { frame: CalibrationFrame },
    File { path: String },
}

impl CalibrationSetting {
    pub fn source(&self) -> Box<dyn CalibrationSource> {
        match self {
            Self::Preset { mount: RigMount::Left } => {
                Box::new(StaticCalibration(CalibrationFrame::left_mount()))
            }
            Self::Preset { mount: RigMount::Back } => {
                Box::new(StaticCalibration(CalibrationFrame::back_mount()))
            }
            Self::Inline { frame } => Box::new(StaticCalibration(*frame)),
            Self::File { path } => Box::new(JsonCalibrationFile::new(path)),
        }
    }
}

/// Recorded exposure to replay instead of a live camera
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FrameSource {
    pub amplitude_path: String,
    /// 16-bit grayscale, millimetres
    pub distance_path: String,
}

/// Everything one pick rig needs
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RigConfig {
    pub frames: FrameSource,
    pub target: ShapeLabel,
    pub calibration: CalibrationSetting,
    /// Where to write the annotated mask, if anywhere
    #[serde(default)]
    pub annotated_output: Option<String>,
    #[serde(default)]
    pub preprocess: PreprocessParams,
    #[serde(default)]
    pub classifier: ClassifierParams,
    #[serde(default)]
    pub metrology: MetrologyParams,
    #[serde(default)]
    pub mapper: MapperParams,
    #[serde(default)]
    pub capture: CaptureParams,
    #[serde(default)]
    pub transport: TransportParams,
}

impl RigConfig {
    /// Load RigConfig configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, RigConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load RigConfig configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, RigConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load RigConfig configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, RigConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load RigConfig configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self, RigConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RigConfigError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(RigConfigError::UnsupportedFileFormat),
        }
    }

    /// Convert RigConfig to TOML string
    pub fn to_toml(&self) -> Result<String, RigConfigError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    /// Convert RigConfig to JSON string
    pub fn to_json(&self) -> Result<String, RigConfigError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// JSON schema of the configuration file
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RigConfig)
    }
}
