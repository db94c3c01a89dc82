//! Peer management.

use serde_json::json;

use crate::api::types::Ack;
use crate::rpc::{RpcClient, RpcResult};

impl RpcClient {
    pub fn peer_count(&self) -> RpcResult<u64> {
        self.call("p2p_peerCount", vec![])
    }

    pub fn add_peer(&self, url: &str) -> RpcResult<bool> {
        self.peer_op("p2p_addPeer", url)
    }

    pub fn add_trusted_peer(&self, url: &str) -> RpcResult<bool> {
        self.peer_op("p2p_addTrustedPeer", url)
    }

    pub fn remove_peer(&self, url: &str) -> RpcResult<bool> {
        self.peer_op("p2p_removePeer", url)
    }

    pub fn remove_trusted_peer(&self, url: &str) -> RpcResult<bool> {
        self.peer_op("p2p_removeTrustedPeer", url)
    }

    /// Node URLs of connected peers.
    pub fn peers(&self) -> RpcResult<Vec<String>> {
        self.call("p2p_peers", vec![])
    }

    /// Node URL of the node itself.
    pub fn self_node(&self) -> RpcResult<String> {
        self.call("p2p_selfNode", vec![])
    }

    fn peer_op(&self, method: &str, url: &str) -> RpcResult<bool> {
        let ack: Ack = self.call(method, vec![json!(url)])?;
        Ok(ack.0)
    }
}
