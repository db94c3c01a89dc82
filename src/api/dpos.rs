//! Consensus (candidate, vote, epoch) queries.

use serde_json::{json, Value};

use crate::api::types::{Amount, CandidateInfo, DposConfig, GlobalState, IrreversibleInfo};
use crate::rpc::{RpcClient, RpcResult};

impl RpcClient {
    pub fn get_candidate(&self, epoch: u64, name: &str) -> RpcResult<CandidateInfo> {
        self.call("dpos_candidate", vec![json!(epoch), json!(name)])
    }

    /// All candidates at `epoch`; `detail` asks the node for full records.
    pub fn get_candidates(&self, epoch: u64, detail: bool) -> RpcResult<Vec<CandidateInfo>> {
        self.call("dpos_candidates", vec![json!(epoch), json!(detail)])
    }

    pub fn get_candidate_count(&self, epoch: u64) -> RpcResult<u64> {
        self.call("dpos_candidatesSize", vec![json!(epoch)])
    }

    pub fn get_activated_candidate_count(&self, epoch: u64) -> RpcResult<u64> {
        self.call("dpos_getActivedCandidateSize", vec![json!(epoch)])
    }

    pub fn get_activated_candidate(&self, epoch: u64, index: u64) -> RpcResult<Value> {
        self.call("dpos_getActivedCandidate", vec![json!(epoch), json!(index)])
    }

    pub fn dpos_info(&self) -> RpcResult<DposConfig> {
        self.call("dpos_info", vec![])
    }

    pub fn irreversible_info(&self) -> RpcResult<IrreversibleInfo> {
        self.call("dpos_irreversible", vec![])
    }

    pub fn valid_candidates(&self, epoch: u64) -> RpcResult<GlobalState> {
        self.call("dpos_validCandidates", vec![json!(epoch)])
    }

    pub fn next_valid_candidates(&self) -> RpcResult<GlobalState> {
        self.call("dpos_nextValidCandidates", vec![])
    }

    /// Stake `name` can still vote with at `epoch`.
    pub fn available_stake(&self, epoch: u64, name: &str) -> RpcResult<Amount> {
        self.call("dpos_availableStake", vec![json!(epoch), json!(name)])
    }

    pub fn voters_by_candidate(
        &self,
        epoch: u64,
        candidate: &str,
        detail: bool,
    ) -> RpcResult<Vec<String>> {
        self.call(
            "dpos_votersByCandidate",
            vec![json!(epoch), json!(candidate), json!(detail)],
        )
    }

    pub fn voters_by_voter(&self, epoch: u64, voter: &str, detail: bool) -> RpcResult<Vec<String>> {
        self.call(
            "dpos_votersByVoter",
            vec![json!(epoch), json!(voter), json!(detail)],
        )
    }

    pub fn snapshot_time(&self, epoch: u64) -> RpcResult<Value> {
        self.call("dpos_snapShotTime", vec![json!(epoch)])
    }

    pub fn epoch_by_height(&self, height: u64) -> RpcResult<u64> {
        self.call("dpos_epoch", vec![json!(height)])
    }

    pub fn prev_epoch(&self, epoch: u64) -> RpcResult<u64> {
        self.call("dpos_prevEpoch", vec![json!(epoch)])
    }

    pub fn next_epoch(&self, epoch: u64) -> RpcResult<u64> {
        self.call("dpos_nextEpoch", vec![json!(epoch)])
    }
}
