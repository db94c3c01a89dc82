//! Shared utilities for integration testing: an in-process JSON-RPC node.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use ledger_client::rpc::jsonrpc::{Request, Response};
use ledger_client::{Endpoint, SignedTransaction};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Code the mock node uses for rejected transactions.
pub const INVALID_TX_CODE: i64 = -32000;

/// State of the mock node, shared with the test.
#[derive(Default)]
pub struct NodeState {
    nonces: Mutex<HashMap<String, u64>>,
    accepted: Mutex<Vec<SignedTransaction>>,
    delay: Mutex<Option<Duration>>,
    requests: AtomicUsize,
}

/// Handle to a running mock node.
pub struct MockNode {
    pub addr: SocketAddr,
    pub state: Arc<NodeState>,
}

#[allow(dead_code)]
impl MockNode {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new("127.0.0.1", self.addr.port())
    }

    pub fn set_nonce(&self, account: &str, nonce: u64) {
        self.state.nonces.lock().unwrap().insert(account.to_string(), nonce);
    }

    pub fn nonce(&self, account: &str) -> u64 {
        self.state.nonces.lock().unwrap().get(account).copied().unwrap_or(0)
    }

    /// Delay every answer by `delay`.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.state.delay.lock().unwrap() = delay;
    }

    pub fn accepted(&self) -> Vec<SignedTransaction> {
        self.state.accepted.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }
}

/// Start a mock node on an ephemeral port.
///
/// The node runs on its own runtime thread so blocking clients can be
/// driven from plain `#[test]` functions.
pub fn start_mock_node() -> MockNode {
    let state = Arc::new(NodeState::default());
    let (addr_tx, addr_rx) = std::sync::mpsc::channel();

    let node_state = state.clone();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            addr_tx.send(listener.local_addr().unwrap()).unwrap();
            let app = Router::new().route("/", post(handle)).with_state(node_state);
            axum::serve(listener, app).await.unwrap();
        });
    });

    let addr = addr_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    MockNode { addr, state }
}

async fn handle(State(state): State<Arc<NodeState>>, Json(req): Json<Request>) -> Json<Response> {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let delay = *state.delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let reply = match req.method.as_str() {
        "account_getNonce" => {
            let account = req.params.first().and_then(Value::as_str).unwrap_or_default();
            let nonce = state.nonces.lock().unwrap().get(account).copied().unwrap_or(0);
            Ok(json!(nonce))
        }
        "uni_gasPrice" => Ok(json!(10_000_000_000u64)),
        "uni_sendRawTransaction" => send_raw_transaction(&state, &req.params),
        other => Err((-32601, format!("the method {} does not exist", other))),
    };

    Json(match reply {
        Ok(result) => Response::success(req.id, result),
        Err((code, message)) => Response::failure(req.id, code, message),
    })
}

fn send_raw_transaction(state: &NodeState, params: &[Value]) -> Result<Value, (i64, String)> {
    let raw = params
        .first()
        .and_then(Value::as_str)
        .and_then(|s| s.strip_prefix("0x"))
        .ok_or((INVALID_TX_CODE, "expected 0x-prefixed hex".to_string()))?;
    let bytes = alloy::primitives::hex::decode(raw)
        .map_err(|e| (INVALID_TX_CODE, format!("invalid hex: {}", e)))?;
    let signed = SignedTransaction::decode(&bytes)
        .map_err(|e| (INVALID_TX_CODE, format!("invalid transaction: {}", e)))?;

    let mut nonces = state.nonces.lock().unwrap();
    let mut expected: HashMap<String, u64> = HashMap::new();
    for action in signed.transaction().actions() {
        let sender = action.sender().as_str().to_string();
        let next = expected
            .entry(sender.clone())
            .or_insert_with(|| nonces.get(&sender).copied().unwrap_or(0));
        if action.nonce() != *next {
            return Err((
                INVALID_TX_CODE,
                format!(
                    "invalid nonce: account {} expected {} got {}",
                    sender,
                    next,
                    action.nonce()
                ),
            ));
        }
        *next += 1;
    }
    nonces.extend(expected);

    let hash = signed.hash();
    state.accepted.lock().unwrap().push(signed);
    Ok(json!(hash))
}
