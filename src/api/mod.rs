//! Typed wrappers over the node's query methods.
//!
//! Each submodule adds methods to [`RpcClient`](crate::rpc::RpcClient) for
//! one method namespace (`account_`, `dpos_`, `p2p_`, `uni_`, `txpool_`).
//! The wrappers only name the remote method and its result shape.

pub mod account;
pub mod dpos;
pub mod p2p;
pub mod txpool;
pub mod types;
pub mod uni;

pub use types::{
    Account, Ack, ActionResult, Amount, AssetBalance, AssetInfo, CandidateInfo, DposConfig,
    GlobalState, IrreversibleInfo, PoolSnapshot, PoolStatus, RpcReceipt, RpcTransaction,
};
