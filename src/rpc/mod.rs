//! Node connection subsystem.
//!
//! # Data Flow
//! ```text
//! Endpoint
//!     → pool.rs (one shared handle per endpoint, lazy default)
//!     → client.rs (id allocation, deadline, result decoding)
//!     → jsonrpc.rs (request/response envelopes)
//!     → transport.rs (HTTP POST, timeouts)
//!     → node
//! ```

pub mod client;
pub mod jsonrpc;
pub mod pool;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{RpcClient, TransportStats};
pub use pool::ConnectionPool;
pub use transport::{Dialer, HttpDialer, HttpTransport, RpcTimeouts, Transport};
pub use types::{Endpoint, RpcError, RpcResult, DEFAULT_RPC_PORT};
