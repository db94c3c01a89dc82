//! Top-level error type for the high-level client.

use thiserror::Error;

use crate::config::ConfigError;
use crate::rpc::RpcError;
use crate::tx::TxError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Tx(#[from] TxError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Whether the failure happened on the wire and the call may be retried.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Rpc(e) if e.is_transport())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
