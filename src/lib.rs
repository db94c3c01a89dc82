//! Client library for building, signing and submitting multi-action ledger
//! transactions over JSON-RPC.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod observability;
pub mod rpc;
pub mod tx;

pub use client::{GasSettings, LedgerClient};
pub use config::schema::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use rpc::{ConnectionPool, Endpoint, RpcClient, RpcError};
pub use tx::{Action, ChainSigner, SignedTransaction, Transaction, TxError, Wallet};
