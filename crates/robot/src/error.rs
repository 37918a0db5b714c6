use thiserror::Error;

#[derive(Error, Debug)]
pub enum RobotError {
    #[error("Failed to connect to robot at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Timed out after {timeout_ms} ms connecting to robot at {endpoint}")]
    ConnectTimeout { endpoint: String, timeout_ms: u64 },

    #[error("Failed to send program: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RobotError>;
