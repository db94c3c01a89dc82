//! Transaction pool inspection.

use alloy::primitives::{hex, B256};

use crate::api::types::{PoolSnapshot, PoolStatus};
use crate::rpc::{RpcClient, RpcResult};

impl RpcClient {
    pub fn txpool_inspect(&self) -> RpcResult<PoolSnapshot> {
        self.call("txpool_inspect", vec![])
    }

    pub fn txpool_status(&self) -> RpcResult<PoolStatus> {
        self.call("txpool_status", vec![])
    }

    /// Whether `hash`, sent by `account`, is waiting as (pending, queued).
    pub fn tx_pool_membership(&self, account: &str, hash: B256) -> RpcResult<(bool, bool)> {
        let snapshot = self.txpool_inspect()?;
        Ok(snapshot.membership(account, &hex::encode_prefixed(hash)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::client_answering;
    use serde_json::json;

    #[test]
    fn test_membership() {
        let hash = B256::repeat_byte(0xaa);
        let (rpc, seen) = client_answering(json!({
            "pending": {"alice": {(hex::encode_prefixed(hash)): "alice->bob"}},
            "queued": {}
        }));
        assert_eq!(rpc.tx_pool_membership("alice", hash).unwrap(), (true, false));
        assert_eq!(rpc.tx_pool_membership("bob", hash).unwrap(), (false, false));
        assert_eq!(seen.lock().unwrap()[0].method, "txpool_inspect");
    }

    #[test]
    fn test_status() {
        let (rpc, _) = client_answering(json!({"pending": 2, "queue": 5}));
        let status = rpc.txpool_status().unwrap();
        assert_eq!(status.pending, 2);
        assert_eq!(status.queued, 5);
    }
}
