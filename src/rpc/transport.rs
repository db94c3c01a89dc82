//! Wire transport for JSON-RPC calls.
//!
//! # Responsibilities
//! - Post a request envelope to a node and read back the reply
//! - Bound every exchange by the configured timeouts
//! - Map network failures to [`RpcError::Transport`]
//!
//! # Design Decisions
//! - Blocking I/O; each call occupies the calling thread
//! - `Transport` and `Dialer` are traits so tests can swap in an in-memory node

use reqwest::blocking::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::RpcConfig;
use crate::rpc::jsonrpc::{Request, Response};
use crate::rpc::types::{Endpoint, RpcError, RpcResult};

/// One established channel to a node.
pub trait Transport: Send + Sync {
    /// Perform a single request/response exchange.
    ///
    /// `timeout` overrides the transport's default request timeout.
    fn send(&self, request: &Request, timeout: Option<Duration>) -> RpcResult<Response>;
}

/// Opens transports to endpoints.
pub trait Dialer: Send + Sync {
    fn dial(&self, endpoint: &Endpoint) -> RpcResult<Arc<dyn Transport>>;
}

/// Timeouts applied by [`HttpDialer`].
#[derive(Debug, Clone, Copy)]
pub struct RpcTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for RpcTimeouts {
    fn default() -> Self {
        Self::from(&RpcConfig::default())
    }
}

impl From<&RpcConfig> for RpcTimeouts {
    fn from(config: &RpcConfig) -> Self {
        Self {
            connect: Duration::from_secs(config.connect_timeout_secs),
            request: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// JSON-RPC over HTTP POST.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    url: Url,
    request_timeout: Duration,
}

impl HttpTransport {
    pub fn new(endpoint: &Endpoint, timeouts: RpcTimeouts) -> RpcResult<Self> {
        let url = endpoint.url()?;
        let client = Client::builder()
            .connect_timeout(timeouts.connect)
            .timeout(timeouts.request)
            .build()
            .map_err(|e| RpcError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url,
            request_timeout: timeouts.request,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// A per-call timeout can shorten the request timeout but never extend it.
    fn effective_timeout(&self, timeout: Option<Duration>) -> Duration {
        timeout.map_or(self.request_timeout, |t| t.min(self.request_timeout))
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &Request, timeout: Option<Duration>) -> RpcResult<Response> {
        let response = self
            .client
            .post(self.url.clone())
            .json(request)
            .timeout(self.effective_timeout(timeout))
            .send().map_err(|e| {
            if e.is_timeout() {
                RpcError::Transport(format!("{} timed out: {}", request.method, e))
            } else {
                RpcError::Transport(format!("{} failed: {}", request.method, e))
            }
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .map_err(|e| RpcError::Transport(format!("Failed to read response body: {}", e)))?;

        // JSON-RPC servers may report errors with a non-2xx status but a valid envelope.
        match serde_json::from_slice::<Response>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => {
                Err(RpcError::Transport(format!("HTTP status {}", status)))
            }
            Err(e) => Err(RpcError::Decode(format!("Invalid JSON-RPC response: {}", e))),
        }
    }
}

/// Dials [`HttpTransport`]s with fixed timeouts.
#[derive(Debug, Clone, Default)]
pub struct HttpDialer {
    timeouts: RpcTimeouts,
}

impl HttpDialer {
    pub fn new(timeouts: RpcTimeouts) -> Self {
        Self { timeouts }
    }
}

impl Dialer for HttpDialer {
    fn dial(&self, endpoint: &Endpoint) -> RpcResult<Arc<dyn Transport>> {
        Ok(Arc::new(HttpTransport::new(endpoint, self.timeouts)?))
    }
}
