//! Chain-level queries: gas price, transactions, receipts.

use alloy::primitives::B256;
use serde_json::json;

use crate::api::types::{Amount, RpcReceipt, RpcTransaction};
use crate::rpc::{RpcClient, RpcResult};

impl RpcClient {
    /// Gas price the node currently suggests.
    pub fn gas_price(&self) -> RpcResult<Amount> {
        self.call("uni_gasPrice", vec![])
    }

    pub fn get_transaction(&self, hash: B256) -> RpcResult<RpcTransaction> {
        self.call("uni_getTransactionByHash", vec![json!(hash)])
    }

    /// Receipt for `hash`. Nodes answer `null` while the transaction is
    /// unmined, which decodes to `None`.
    pub fn get_receipt(&self, hash: B256) -> RpcResult<Option<RpcReceipt>> {
        self.call("uni_getTransactionReceipt", vec![json!(hash)])
    }
}
