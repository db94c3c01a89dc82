//! JSON-RPC 2.0 envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rpc::types::{RpcError, RpcResult};

pub const JSONRPC_VERSION: &str = "2.0";

/// Outgoing call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Vec<Value>,
}

impl Request {
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// Error object carried by a failed response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Incoming reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub result: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

impl Response {
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Value::from(id),
            result,
            error: None,
        }
    }

    pub fn failure(id: u64, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Value::from(id),
            result: Value::Null,
            error: Some(ErrorObject {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Unwrap the result, mapping an error object to [`RpcError::Remote`].
    ///
    /// Nodes sometimes echo ids as strings, so both forms are accepted.
    pub fn into_result(self, expected_id: u64) -> RpcResult<Value> {
        let id_matches = match &self.id {
            Value::Number(n) => n.as_u64() == Some(expected_id),
            Value::String(s) => s.parse::<u64>().ok() == Some(expected_id),
            _ => false,
        };
        if let Some(err) = self.error {
            return Err(RpcError::Remote {
                code: err.code,
                message: err.message,
                data: err.data,
            });
        }
        if !id_matches {
            return Err(RpcError::Decode(format!(
                "response id {} does not match request id {}",
                self.id, expected_id
            )));
        }
        Ok(self.result)
    }
}
