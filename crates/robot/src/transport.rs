use std::future::Future;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::info;

use crate::{
    error::{Result, RobotError},
    script::UrScript,
};

/// Robot controller endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TransportParams {
    /// `host:port` of the controller's script interface
    pub endpoint: String,
    pub connect_timeout_ms: u64,
}

impl Default for TransportParams {
    fn default() -> Self {
        Self {
            endpoint: "192.168.1.60:30001".to_string(),
            connect_timeout_ms: 2000,
        }
    }
}

/// Delivers programs to a robot controller.
pub trait RobotTransport {
    fn send(&self, script: &UrScript) -> impl Future<Output = Result<()>> + Send;
}

/// Sends each program over a fresh TCP connection.
#[derive(Debug, Clone, Default)]
pub struct TcpTransport {
    pub params: TransportParams,
}

impl TcpTransport {
    pub fn new(params: TransportParams) -> Self {
        Self { params }
    }
}

impl RobotTransport for TcpTransport {
    async fn send(&self, script: &UrScript) -> Result<()> {
        let endpoint = &self.params.endpoint;
        let timeout_ms = self.params.connect_timeout_ms;

        let mut stream = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            TcpStream::connect(endpoint.as_str()),
        )
        .await
        .map_err(|_| RobotError::ConnectTimeout {
            endpoint: endpoint.clone(),
            timeout_ms,
        })?
        .map_err(|source| RobotError::Connect {
            endpoint: endpoint.clone(),
            source,
        })?;

        stream.write_all(script.as_bytes()).await?;
        stream.shutdown().await?;
        info!(%endpoint, bytes = script.as_bytes().len(), "Program sent");
        Ok(())
    }
}
