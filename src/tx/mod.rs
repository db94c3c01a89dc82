//! Transaction assembly and signing pipeline.
//!
//! # Data Flow
//! ```text
//! action.rs      (one Action per operation)
//!     → transaction.rs (ordered, non-empty Transaction with nonce + gas price)
//!     → signer.rs      (one SignatureRecord per action, collected in a SignatureSet)
//!     → codec.rs       (SignedTransaction → canonical RLP bytes)
//!     → rpc::RpcClient::submit
//! ```
//!
//! # Security Constraints
//! - Private keys never leave wallet.rs and are never logged
//! - Signing digests include the chain id to prevent cross-chain replay

pub mod action;
pub mod codec;
pub mod payload;
pub mod signer;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use action::{Action, ActionBuilder};
pub use codec::SignedTransaction;
pub use payload::ActionPayload;
pub use signer::{ChainSigner, KeyPair, SignatureRecord, SignatureSet, SigningRequest};
pub use transaction::Transaction;
pub use types::{ActionKind, ChainId, Name, PubKey, TxError, TxResult};
pub use wallet::{generate_key, Wallet};
