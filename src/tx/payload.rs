//! Operation-specific action payloads.
//!
//! Each payload is an RLP list carried opaquely in [`Action::payload`](crate::tx::Action::payload)
//! and interpreted by the node according to the action kind.

use alloy::primitives::{Bytes, U256};

use crate::tx::codec;
use crate::tx::types::{Name, PubKey};

/// Types that can be carried as an action payload.
pub trait ActionPayload {
    fn encode_payload(&self, out: &mut Vec<u8>);

    fn to_bytes(&self) -> Bytes {
        let mut out = Vec::new();
        self.encode_payload(&mut out);
        out.into()
    }
}

/// Asset description used by issue, increase and owner-change actions.
///
/// Fields a given action does not use stay at their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetObject {
    pub asset_id: u64,
    pub asset_name: String,
    pub symbol: String,
    pub amount: U256,
    pub decimals: u64,
    pub founder: Name,
    pub owner: Name,
    pub add_issue: U256,
    pub upper_limit: U256,
    pub contract: Name,
    pub description: String,
}

impl ActionPayload for AssetObject {
    fn encode_payload(&self, out: &mut Vec<u8>) {
        codec::encode_list(out, |buf| {
            codec::encode_u64(buf, self.asset_id);
            codec::encode_str(buf, &self.asset_name);
            codec::encode_str(buf, &self.symbol);
            codec::encode_u256(buf, self.amount);
            codec::encode_u64(buf, self.decimals);
            codec::encode_str(buf, self.founder.as_str());
            codec::encode_str(buf, self.owner.as_str());
            codec::encode_u256(buf, self.add_issue);
            codec::encode_u256(buf, self.upper_limit);
            codec::encode_str(buf, self.contract.as_str());
            codec::encode_str(buf, &self.description);
        });
    }
}

/// Candidate registration; `url` is the candidate's public info link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterCandidate {
    pub url: String,
}

impl ActionPayload for RegisterCandidate {
    fn encode_payload(&self, out: &mut Vec<u8>) {
        codec::encode_list(out, |buf| codec::encode_str(buf, &self.url));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCandidate {
    pub url: String,
}

impl ActionPayload for UpdateCandidate {
    fn encode_payload(&self, out: &mut Vec<u8>) {
        codec::encode_list(out, |buf| codec::encode_str(buf, &self.url));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCandidatePubKey {
    pub pub_key: PubKey,
}

impl ActionPayload for UpdateCandidatePubKey {
    fn encode_payload(&self, out: &mut Vec<u8>) {
        codec::encode_list(out, |buf| codec::encode_bytes(buf, self.pub_key.as_bytes()));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteCandidate {
    pub candidate: Name,
    pub stake: U256,
}

impl ActionPayload for VoteCandidate {
    fn encode_payload(&self, out: &mut Vec<u8>) {
        codec::encode_list(out, |buf| {
            codec::encode_str(buf, self.candidate.as_str());
            codec::encode_u256(buf, self.stake);
        });
    }
}
