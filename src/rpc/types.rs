//! Endpoint addressing and transport error definitions.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::config::EndpointConfig;

/// Port a node listens on when an address does not name one.
pub const DEFAULT_RPC_PORT: u16 = 8545;

/// Address of a node's JSON-RPC listener.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// HTTP URL the transport posts to.
    pub fn url(&self) -> RpcResult<Url> {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        Url::parse(&format!("http://{}:{}", host, self.port))
            .map_err(|e| RpcError::InvalidEndpoint(format!("{}: {}", self, e)))
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new("127.0.0.1", DEFAULT_RPC_PORT)
    }
}

impl From<&EndpointConfig> for Endpoint {
    fn from(config: &EndpointConfig) -> Self {
        Self::new(config.host.clone(), config.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = RpcError;

    /// Accepts `host:port` or `http://host:port`. A missing port means
    /// [`DEFAULT_RPC_PORT`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let with_scheme = if s.contains("://") {
            s.to_string()
        } else {
            format!("http://{}", s)
        };
        let url = Url::parse(&with_scheme)
            .map_err(|e| RpcError::InvalidEndpoint(format!("{}: {}", s, e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| RpcError::InvalidEndpoint(format!("{}: missing host", s)))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        Ok(Self::new(host, url.port().unwrap_or(DEFAULT_RPC_PORT)))
    }
}

/// Errors that can occur while talking to a node.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Dial, network or deadline failure. Safe for the caller to retry.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Endpoint could not be turned into a URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The node answered with an application-level error.
    #[error("Remote error {code}: {message}")]
    Remote {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    /// The response did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl RpcError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RpcError::Transport(_) | RpcError::InvalidEndpoint(_) => "transport",
            RpcError::Remote { .. } => "remote",
            RpcError::Decode(_) => "decode",
        }
    }

    /// Whether a retry by the caller could succeed.
    pub fn is_transport(&self) -> bool {
        matches!(self, RpcError::Transport(_))
    }
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;
