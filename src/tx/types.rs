//! Ledger-specific primitive types and error definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Human-readable account name as understood by the node.
///
/// No validation happens client-side: a malformed name is rejected by the
/// node when the transaction is executed.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Name {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Uncompressed secp256k1 public key (`0x04 || X || Y`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PubKey(pub [u8; 65]);

impl PubKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for PubKey {
    type Error = TxError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let raw: [u8; 65] = bytes.try_into().map_err(|_| {
            TxError::Build(format!("public key must be 65 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(raw))
    }
}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKey({})", self)
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", alloy::primitives::hex::encode(self.0))
    }
}

/// Operation kind carried by an action.
///
/// The discriminant is the wire code used by the canonical encoding.
#[repr(u64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    CallContract = 0x000,
    CreateContract = 0x001,

    CreateAccount = 0x100,
    UpdateAccount = 0x101,
    DeleteAccount = 0x102,

    IncreaseAsset = 0x200,
    IssueAsset = 0x201,
    DestroyAsset = 0x202,
    SetAssetOwner = 0x203,
    UpdateAsset = 0x204,
    Transfer = 0x205,

    RegisterCandidate = 0x300,
    UpdateCandidate = 0x301,
    UnregisterCandidate = 0x302,
    RefundCandidate = 0x303,
    VoteCandidate = 0x304,
    UpdateCandidatePubKey = 0x305,
}

impl ActionKind {
    pub const ALL: [ActionKind; 17] = [
        ActionKind::CallContract,
        ActionKind::CreateContract,
        ActionKind::CreateAccount,
        ActionKind::UpdateAccount,
        ActionKind::DeleteAccount,
        ActionKind::IncreaseAsset,
        ActionKind::IssueAsset,
        ActionKind::DestroyAsset,
        ActionKind::SetAssetOwner,
        ActionKind::UpdateAsset,
        ActionKind::Transfer,
        ActionKind::RegisterCandidate,
        ActionKind::UpdateCandidate,
        ActionKind::UnregisterCandidate,
        ActionKind::RefundCandidate,
        ActionKind::VoteCandidate,
        ActionKind::UpdateCandidatePubKey,
    ];

    pub fn code(self) -> u64 {
        self as u64
    }
}

impl TryFrom<u64> for ActionKind {
    type Error = TxError;

    fn try_from(code: u64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or_else(|| TxError::Decoding(format!("unknown action kind {:#x}", code)))
    }
}

/// Errors raised while building, signing or encoding a transaction.
///
/// All of these are local: nothing here ever reached the node.
#[derive(Debug, Error)]
pub enum TxError {
    /// A transaction needs at least one action.
    #[error("Transaction has no actions")]
    EmptyActionSet,

    /// Malformed action or transaction construction.
    #[error("Build error: {0}")]
    Build(String),

    /// Signing targeted an action that is not part of the transaction.
    #[error("Action index {index} out of range for transaction with {len} actions")]
    ActionIndex { index: usize, len: usize },

    /// None of the supplied key pairs is authorized for the key index.
    #[error("No key pair authorized for key index {key_index}")]
    NoMatchingKey { key_index: u64 },

    /// Several key pairs claim the same key index.
    #[error("{count} key pairs claim key index {key_index}")]
    AmbiguousKey { key_index: u64, count: usize },

    /// The signing backend failed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Structurally invalid input to the canonical encoder.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Raw bytes are not a canonical transaction encoding.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),
}

impl From<alloy_rlp::Error> for TxError {
    fn from(err: alloy_rlp::Error) -> Self {
        TxError::Decoding(err.to_string())
    }
}

/// Result type for transaction pipeline operations.
pub type TxResult<T> = Result<T, TxError>;
