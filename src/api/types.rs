//! Record types returned by the node's query methods.
//!
//! Nodes differ in which optional fields they fill in, so every record
//! decodes leniently: missing fields take their defaults and fields this
//! crate does not model are kept in `extra`.

use alloy::primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Unmodeled fields of a record.
pub type Extra = BTreeMap<String, Value>;

/// A token quantity as reported by the node.
///
/// Accepts JSON numbers, decimal strings and `0x` hex strings. Serializes
/// as a decimal string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(pub U256);

impl Amount {
    pub fn value(&self) -> U256 {
        self.0
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty amount".to_string());
        }
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) if hex.is_empty() => Ok(U256::ZERO),
            Some(hex) => U256::from_str_radix(hex, 16),
            None => U256::from_str_radix(s, 10),
        };
        parsed
            .map(Self)
            .map_err(|e| format!("invalid amount {:?}: {}", s, e))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Self::default()),
            Value::String(s) => s.parse().map_err(D::Error::custom),
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    return Ok(Self::from(v));
                }
                // Large balances printed as JSON numbers lose their integer form.
                n.to_string().parse().or_else(|_| match n.as_f64() {
                    Some(f) if f >= 0.0 && f.fract() == 0.0 && f < 1.8e19 => {
                        Ok(Self::from(f as u64))
                    }
                    _ => Err(D::Error::custom(format!("invalid amount {}", n))),
                })
            }
            other => Err(D::Error::custom(format!("invalid amount {}", other))),
        }
    }
}

/// Accepts `true`/`false` or a numeric status (non-zero is success).
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_f64().map(|v| v != 0.0).unwrap_or(false)),
        other => Err(D::Error::custom(format!("expected bool, got {}", other))),
    }
}

/// Acknowledgement returned by peer-management calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ack(#[serde(deserialize_with = "lenient_bool")] pub bool);

/// Balance of one asset held by an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetBalance {
    #[serde(rename = "assetID", alias = "assetId")]
    pub asset_id: u64,
    pub balance: Amount,
}

/// On-chain account record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Account {
    pub account_name: String,
    pub founder: String,
    #[serde(rename = "accountID", alias = "accountId")]
    pub account_id: u64,
    pub number: u64,
    pub nonce: u64,
    pub code_hash: String,
    pub code_size: u64,
    pub threshold: u64,
    pub update_author_threshold: u64,
    pub balances: Vec<AssetBalance>,
    pub authors: Vec<Value>,
    pub suicide: bool,
    pub destroy: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Account {
    /// Balance of `asset_id`, zero if the account holds none.
    pub fn balance_of(&self, asset_id: u64) -> Amount {
        self.balances
            .iter()
            .find(|b| b.asset_id == asset_id)
            .map(|b| b.balance)
            .unwrap_or_default()
    }
}

/// Registered asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetInfo {
    #[serde(rename = "assetId", alias = "assetID")]
    pub asset_id: u64,
    pub asset_name: String,
    pub symbol: String,
    pub amount: Amount,
    pub decimals: u64,
    pub founder: String,
    pub owner: String,
    pub add_issue: Amount,
    pub upper_limit: Amount,
    pub contract: String,
    pub description: String,
    pub number: u64,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Producer candidate at some epoch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CandidateInfo {
    pub name: String,
    #[serde(alias = "info")]
    pub url: String,
    pub quantity: Amount,
    pub total_quantity: Amount,
    pub number: u64,
    pub counter: u64,
    pub actual_counter: u64,
    #[serde(rename = "type")]
    pub kind: u64,
    pub pub_key: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Consensus parameters of the node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DposConfig {
    pub unit_stake: Amount,
    pub candidate_min_quantity: Amount,
    pub voter_min_quantity: Amount,
    pub activated_min_quantity: Amount,
    pub block_interval: u64,
    pub block_frequency: u64,
    pub candidate_schedule_size: u64,
    pub backup_schedule_size: u64,
    pub epoch_interval: u64,
    pub freeze_epoch_size: u64,
    pub account_name: String,
    pub system_name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Elected schedule for an epoch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalState {
    pub epoch: u64,
    pub pre_epoch: u64,
    pub activated_candidate_schedule: Vec<String>,
    pub activated_total_quantity: Amount,
    pub total_quantity: Amount,
    pub takeover: bool,
    pub dpos: bool,
    pub number: u64,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Finality heights reported by `dpos_irreversible`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IrreversibleInfo {
    pub bft_irreversible: u64,
    pub reversible: u64,
    pub proposed_irreversible: u64,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A transaction as stored by the node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RpcTransaction {
    pub block_hash: String,
    pub block_number: u64,
    pub tx_hash: String,
    pub transaction_index: u64,
    pub actions: Vec<Value>,
    #[serde(rename = "gasAssetID", alias = "gasAssetId")]
    pub gas_asset_id: u64,
    pub gas_price: Amount,
    pub gas_cost: Amount,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Execution outcome of one action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionResult {
    pub status: u64,
    pub index: u64,
    pub gas_used: u64,
    pub gas_allot: Vec<Value>,
    pub error: String,
}

/// Receipt of an executed transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RpcReceipt {
    pub block_hash: String,
    pub block_number: u64,
    pub hash: String,
    pub transaction_index: u64,
    pub post_state: String,
    pub action_results: Vec<ActionResult>,
    pub cumulative_gas_used: u64,
    pub total_gas_used: u64,
    pub logs: Vec<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl RpcReceipt {
    /// Whether every action executed successfully.
    pub fn succeeded(&self) -> bool {
        !self.action_results.is_empty() && self.action_results.iter().all(|r| r.status == 1)
    }
}

/// One-line summary the pool prints for a waiting transaction.
pub type TxSummary = String;

/// Transactions waiting in the node's pool, keyed by account then hash.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSnapshot {
    pub pending: BTreeMap<String, BTreeMap<String, TxSummary>>,
    pub queued: BTreeMap<String, BTreeMap<String, TxSummary>>,
}

impl PoolSnapshot {
    /// Whether `hash` sits in the pending and/or queued set of `account`.
    ///
    /// Hashes are compared case-insensitively.
    pub fn membership(&self, account: &str, hash: &str) -> (bool, bool) {
        let find = |set: &BTreeMap<String, BTreeMap<String, TxSummary>>| {
            set.get(account)
                .map(|txs| txs.keys().any(|h| h.eq_ignore_ascii_case(hash)))
                .unwrap_or(false)
        };
        (find(&self.pending), find(&self.queued))
    }
}

/// Pool occupancy counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolStatus {
    pub pending: u64,
    #[serde(alias = "queue")]
    pub queued: u64,
}
