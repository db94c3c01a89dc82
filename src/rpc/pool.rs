//! Connection pool management.
//!
//! # Responsibilities
//! - Hand out one shared handle per endpoint
//! - Lazily create the process default connection exactly once
//! - Surface dial failures to the caller without caching them
//!
//! # Design Decisions
//! - Handles are keyed by `host:port` in a sharded map; concurrent first
//!   requests for the same endpoint race on the map entry, not on the dial
//! - The default connection is the same handle `connect(default)` returns

use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::ClientConfig;
use crate::observability::metrics;
use crate::rpc::client::{RpcClient, TransportStats};
use crate::rpc::transport::{Dialer, HttpDialer, RpcTimeouts};
use crate::rpc::types::{Endpoint, RpcResult};

/// Shared registry of node connections.
pub struct ConnectionPool {
    dialer: Arc<dyn Dialer>,
    default_endpoint: Endpoint,
    connections: DashMap<Endpoint, Arc<RpcClient>>,
    default: Mutex<Option<Arc<RpcClient>>>,
    dials: AtomicUsize,
    stats: Arc<TransportStats>,
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("default_endpoint", &self.default_endpoint)
            .field("connections", &self.connections.len())
            .finish_non_exhaustive()
    }
}

impl ConnectionPool {
    /// Create a pool that opens connections with `dialer`.
    pub fn new(dialer: Arc<dyn Dialer>, default_endpoint: Endpoint) -> Self {
        Self {
            dialer,
            default_endpoint,
            connections: DashMap::new(),
            default: Mutex::new(None),
            dials: AtomicUsize::new(0),
            stats: Arc::new(TransportStats::default()),
        }
    }

    /// HTTP pool using the endpoint and timeouts from `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            Arc::new(HttpDialer::new(RpcTimeouts::from(&config.rpc))),
            Endpoint::from(&config.endpoint),
        )
    }

    pub fn default_endpoint(&self) -> &Endpoint {
        &self.default_endpoint
    }

    /// Return the handle for `endpoint`, dialing it on first use.
    ///
    /// Concurrent first calls for the same endpoint dial once and all get
    /// the same handle. A failed dial leaves no entry behind.
    pub fn connect(&self, endpoint: &Endpoint) -> RpcResult<Arc<RpcClient>> {
        if let Some(existing) = self.connections.get(endpoint).map(|r| r.value().clone()) {
            return Ok(existing);
        }

        let handle = self
            .connections
            .entry(endpoint.clone())
            .or_try_insert_with(|| self.dial(endpoint))?;
        Ok(handle.value().clone())
    }

    /// Return the process default connection, creating it once.
    pub fn default_connect(&self) -> RpcResult<Arc<RpcClient>> {
        let mut slot = self.default.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        let client = self.connect(&self.default_endpoint)?;
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Drop every cached handle, including the default one.
    ///
    /// Outstanding clones stay usable; the next connect dials afresh.
    pub fn close(&self) {
        let mut slot = self.default.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        let dropped = self.connections.len();
        self.connections.clear();
        tracing::debug!(dropped, "Connection pool closed");
    }

    /// Number of successful dials since the pool was created.
    pub fn dial_count(&self) -> usize {
        self.dials.load(Ordering::SeqCst)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Transactions submitted through any handle of this pool.
    pub fn submitted(&self) -> u64 {
        self.stats.submitted()
    }

    fn dial(&self, endpoint: &Endpoint) -> RpcResult<Arc<RpcClient>> {
        let transport = self.dialer.dial(endpoint).map_err(|e| {
            tracing::warn!(endpoint = %endpoint, error = %e, "Failed to connect to node");
            e
        })?;
        self.dials.fetch_add(1, Ordering::SeqCst);
        metrics::record_connection_created(&endpoint.to_string());
        tracing::info!(endpoint = %endpoint, "Connected to node");
        Ok(Arc::new(RpcClient::new(
            endpoint.clone(),
            transport,
            self.stats.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::{MockDialer, MockTransport};
    use crate::rpc::types::RpcError;
    use serde_json::json;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    fn pool_with(dialer: Arc<MockDialer>) -> ConnectionPool {
        ConnectionPool::new(dialer, Endpoint::default())
    }

    #[test]
    fn test_connect_reuses_handle() {
        let dialer = Arc::new(MockDialer::answering(json!(1)));
        let pool = pool_with(dialer.clone());
        let endpoint = Endpoint::new("10.0.0.1", 8545);

        let a = pool.connect(&endpoint).unwrap();
        let b = pool.connect(&endpoint).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(dialer.dials(), 1);
        assert_eq!(pool.dial_count(), 1);
    }

    #[test]
    fn test_distinct_endpoints_get_distinct_handles() {
        let dialer = Arc::new(MockDialer::answering(json!(1)));
        let pool = pool_with(dialer.clone());

        let a = pool.connect(&Endpoint::new("10.0.0.1", 8545)).unwrap();
        let b = pool.connect(&Endpoint::new("10.0.0.2", 8545)).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(pool.connection_count(), 2);
    }

    #[test]
    fn test_default_connect_matches_connect() {
        let dialer = Arc::new(MockDialer::answering(json!(1)));
        let pool = pool_with(dialer.clone());

        let default = pool.default_connect().unwrap();
        let explicit = pool.connect(&Endpoint::default()).unwrap();
        assert!(Arc::ptr_eq(&default, &explicit));
        assert_eq!(dialer.dials(), 1);
    }

    #[test]
    fn test_concurrent_default_connect_dials_once() {
        let dialer = Arc::new(
            MockDialer::answering(json!(1)).with_dial_delay(Duration::from_millis(50)),
        );
        let pool = pool_with(dialer.clone());

        let handles: Vec<Arc<RpcClient>> = std::thread::scope(|s| {
            let workers: Vec<_> = (0..16).map(|_| s.spawn(|| pool.default_connect())).collect();
            workers.into_iter().map(|w| w.join().unwrap().unwrap()).collect()
        });

        assert_eq!(dialer.dials(), 1);
        assert!(handles.iter().all(|h| Arc::ptr_eq(h, &handles[0])));
    }

    #[test]
    fn test_concurrent_connect_dials_once_per_endpoint() {
        let dialer = Arc::new(
            MockDialer::answering(json!(1)).with_dial_delay(Duration::from_millis(20)),
        );
        let pool = pool_with(dialer.clone());
        let endpoint = Endpoint::new("10.0.0.9", 8545);

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| pool.connect(&endpoint).unwrap());
            }
        });
        assert_eq!(dialer.dials(), 1);
    }

    #[test]
    fn test_failed_dial_is_not_cached() {
        let fail = Arc::new(AtomicBool::new(true));
        let flag = fail.clone();
        let dialer = Arc::new(MockDialer::new(move |endpoint| {
            if flag.load(Ordering::SeqCst) {
                Err(RpcError::Transport(format!("{} refused", endpoint)))
            } else {
                Ok(MockTransport::new(|_| Ok(json!(1))))
            }
        }));
        let pool = pool_with(dialer.clone());

        assert!(matches!(pool.default_connect(), Err(RpcError::Transport(_))));
        assert_eq!(pool.connection_count(), 0);

        fail.store(false, Ordering::SeqCst);
        assert!(pool.default_connect().is_ok());
        assert_eq!(pool.dial_count(), 1);
    }

    #[test]
    fn test_close_forces_redial() {
        let dialer = Arc::new(MockDialer::answering(json!(1)));
        let pool = pool_with(dialer.clone());

        let first = pool.default_connect().unwrap();
        pool.close();
        assert_eq!(pool.connection_count(), 0);
        let second = pool.default_connect().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(dialer.dials(), 2);

        // The closed handle still answers.
        let value: u64 = first.call("p2p_peerCount", vec![]).unwrap();
        assert_eq!(value, 1);
    }

    #[test]
    fn test_submissions_shared_across_handles() {
        let dialer = Arc::new(MockDialer::answering(json!(format!("0x{}", "11".repeat(32)))));
        let pool = pool_with(dialer);

        pool.connect(&Endpoint::new("10.0.0.1", 1)).unwrap().submit(&[0xc0]).unwrap();
        pool.connect(&Endpoint::new("10.0.0.2", 2)).unwrap().submit(&[0xc0]).unwrap();
        assert_eq!(pool.submitted(), 2);
    }
}
