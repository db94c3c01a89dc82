//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Root configuration for the ledger client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Default node endpoint.
    pub endpoint: EndpointConfig,

    /// Chain identity used for signing.
    pub chain: ChainConfig,

    /// Process-wide gas defaults.
    pub gas: GasConfig,

    /// Transport timeouts.
    pub rpc: RpcConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Node JSON-RPC endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Host or IP of the node.
    pub host: String,

    /// JSON-RPC port.
    pub port: u16,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8545,
        }
    }
}

/// Chain configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Chain ID mixed into every signing digest.
    pub id: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self { id: 1 }
    }
}

/// Gas defaults applied when assembling transactions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GasConfig {
    /// Gas limit given to every action built by the high-level operations.
    pub limit: u64,

    /// Gas price for assembled transactions (decimal or 0x-hex string).
    pub price: U256,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            limit: 1_000_000,
            price: U256::from(10_000_000_000u64),
        }
    }
}

/// Timeout configuration for remote calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
            timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable output.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
