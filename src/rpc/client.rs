//! Connection handle for one node.

use alloy::primitives::{hex, B256};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::observability::metrics;
use crate::rpc::jsonrpc::Request;
use crate::rpc::transport::Transport;
use crate::rpc::types::{Endpoint, RpcError, RpcResult};

/// Counters shared by every handle of a pool.
#[derive(Debug, Default)]
pub struct TransportStats {
    submitted: AtomicU64,
}

impl TransportStats {
    /// Transactions handed to a node, including failed attempts.
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    fn record_submission(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }
}

/// A live connection to one node endpoint.
///
/// Handles are shared through the pool and safe to call from many threads.
pub struct RpcClient {
    endpoint: Endpoint,
    transport: Arc<dyn Transport>,
    next_id: AtomicU64,
    stats: Arc<TransportStats>,
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl RpcClient {
    pub fn new(
        endpoint: Endpoint,
        transport: Arc<dyn Transport>,
        stats: Arc<TransportStats>,
    ) -> Self {
        Self {
            endpoint,
            transport,
            next_id: AtomicU64::new(1),
            stats,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn stats(&self) -> &TransportStats {
        &self.stats
    }

    /// Invoke `method` and decode its result into `T`.
    pub fn call<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> RpcResult<T> {
        self.dispatch(method, params, None)
    }

    /// Like [`RpcClient::call`], giving up once `deadline` has passed.
    ///
    /// A missed deadline surfaces as [`RpcError::Transport`] and leaves the
    /// handle usable.
    pub fn call_with_deadline<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
        deadline: Instant,
    ) -> RpcResult<T> {
        self.dispatch(method, params, Some(deadline))
    }

    fn dispatch<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
        deadline: Option<Instant>,
    ) -> RpcResult<T> {
        let started = Instant::now();
        let result = self.exchange(method, params, deadline);
        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::record_rpc_call(method, outcome, started);
        if let Err(e) = &result {
            tracing::debug!(endpoint = %self.endpoint, method, error = %e, "RPC call failed");
        }
        result
    }

    fn exchange<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
        deadline: Option<Instant>,
    ) -> RpcResult<T> {
        let timeout = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Err(RpcError::Transport(format!("{}: deadline exceeded", method)));
                }
                Some(remaining)
            }
            None => None,
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request::new(id, method, params);
        let value = self.transport.send(&request, timeout)?.into_result(id)?;

        serde_json::from_value(value)
            .map_err(|e| RpcError::Decode(format!("{}: {}", method, e)))
    }

    /// Submit a signed, encoded transaction via `uni_sendRawTransaction`.
    ///
    /// Every attempt counts towards [`TransportStats::submitted`], whether
    /// or not the node accepts it.
    pub fn submit(&self, raw: &[u8]) -> RpcResult<B256> {
        self.stats.record_submission();
        metrics::record_submission();

        let hash: B256 = self.call(
            "uni_sendRawTransaction",
            vec![Value::String(hex::encode_prefixed(raw))],
        )?;
        tracing::info!(endpoint = %self.endpoint, hash = %hash, size = raw.len(), "Transaction submitted");
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::MockTransport;
    use serde_json::json;
    use std::time::Duration;

    fn client(transport: MockTransport) -> RpcClient {
        RpcClient::new(
            Endpoint::default(),
            Arc::new(transport),
            Arc::new(TransportStats::default()),
        )
    }

    #[test]
    fn test_call_decodes_result() {
        let rpc = client(MockTransport::new(|req| {
            assert_eq!(req.method, "account_getNonce");
            assert_eq!(req.params, vec![json!("alice")]);
            Ok(json!(5))
        }));
        let nonce: u64 = rpc.call("account_getNonce", vec![json!("alice")]).unwrap();
        assert_eq!(nonce, 5);
    }

    #[test]
    fn test_ids_increase() {
        let transport = MockTransport::new(|_| Ok(Value::Null));
        let seen = transport.seen();
        let rpc = client(transport);
        let _: Value = rpc.call("p2p_peerCount", vec![]).unwrap();
        let _: Value = rpc.call("p2p_peerCount", vec![]).unwrap();
        let ids: Vec<u64> = seen.lock().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_remote_error() {
        let rpc = client(MockTransport::new(|_| Err((-32000, "unknown account".into()))));
        let err = rpc.call::<Value>("account_getAccountByName", vec![json!("nobody")]);
        assert!(matches!(err, Err(RpcError::Remote { code: -32000, .. })));
    }

    #[test]
    fn test_decode_error() {
        let rpc = client(MockTransport::new(|_| Ok(json!("not a number"))));
        let err = rpc.call::<u64>("account_getNonce", vec![json!("alice")]);
        assert!(matches!(err, Err(RpcError::Decode(_))));
    }

    #[test]
    fn test_past_deadline_fails_without_sending() {
        let transport = MockTransport::new(|_| Ok(json!(1)));
        let seen = transport.seen();
        let rpc = client(transport);
        let deadline = Instant::now() - Duration::from_millis(1);
        let err = rpc.call_with_deadline::<u64>("uni_gasPrice", vec![], deadline);
        assert!(matches!(err, Err(RpcError::Transport(_))));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_slow_node_hits_deadline_and_handle_survives() {
        let rpc = client(
            MockTransport::new(|_| Ok(json!(10_000_000_000u64))).with_delay(Duration::from_millis(200)),
        );
        let deadline = Instant::now() + Duration::from_millis(20);
        let err = rpc.call_with_deadline::<u64>("uni_gasPrice", vec![], deadline);
        assert!(matches!(err, Err(RpcError::Transport(_))));

        let price: u64 = rpc.call("uni_gasPrice", vec![]).unwrap();
        assert_eq!(price, 10_000_000_000);
    }

    #[test]
    fn test_submit_counts_every_attempt() {
        let hash = B256::repeat_byte(0xab);
        let mut calls = 0;
        let rpc = client(MockTransport::new(move |req| {
            assert_eq!(req.method, "uni_sendRawTransaction");
            assert_eq!(req.params, vec![json!("0x0102")]);
            calls += 1;
            if calls == 1 {
                Err((-32000, "invalid nonce".into()))
            } else {
                Ok(json!(hash))
            }
        }));

        assert!(rpc.submit(&[1, 2]).is_err());
        assert_eq!(rpc.submit(&[1, 2]).unwrap(), hash);
        assert_eq!(rpc.stats().submitted(), 2);
    }
}
