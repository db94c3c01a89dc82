//! In-memory transport for unit tests.

use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::rpc::jsonrpc::{Request, Response};
use crate::rpc::transport::{Dialer, Transport};
use crate::rpc::types::{Endpoint, RpcError, RpcResult};

type Handler = Box<dyn FnMut(&Request) -> Result<Value, (i64, String)> + Send>;

/// Answers requests with a closure and records what it was sent.
pub struct MockTransport {
    handler: Mutex<Handler>,
    delay: Option<Duration>,
    seen: Arc<Mutex<Vec<Request>>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: FnMut(&Request) -> Result<Value, (i64, String)> + Send + 'static,
    {
        Self {
            handler: Mutex::new(Box::new(handler)),
            delay: None,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Simulate a slow node.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn seen(&self) -> Arc<Mutex<Vec<Request>>> {
        self.seen.clone()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &Request, timeout: Option<Duration>) -> RpcResult<Response> {
        if let Some(delay) = self.delay {
            match timeout {
                Some(timeout) if timeout < delay => {
                    std::thread::sleep(timeout);
                    return Err(RpcError::Transport(format!("{} timed out", request.method)));
                }
                _ => std::thread::sleep(delay),
            }
        }

        self.seen.lock().unwrap().push(request.clone());
        let mut handler = self.handler.lock().unwrap();
        Ok(match handler(request) {
            Ok(result) => Response::success(request.id, result),
            Err((code, message)) => Response::failure(request.id, code, message),
        })
    }
}

/// Dialer that counts dials and hands out transports built by a factory.
pub struct MockDialer {
    factory: Box<dyn Fn(&Endpoint) -> RpcResult<MockTransport> + Send + Sync>,
    dials: AtomicUsize,
    delay: Option<Duration>,
}

impl MockDialer {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&Endpoint) -> RpcResult<MockTransport> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            dials: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Every node answers `result` to every call.
    pub fn answering(result: Value) -> Self {
        Self::new(move |_| {
            let result = result.clone();
            Ok(MockTransport::new(move |_| Ok(result.clone())))
        })
    }

    /// Stretch each dial so concurrent callers overlap.
    pub fn with_dial_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn dials(&self) -> usize {
        self.dials.load(Ordering::SeqCst)
    }
}

impl Dialer for MockDialer {
    fn dial(&self, endpoint: &Endpoint) -> RpcResult<Arc<dyn Transport>> {
        self.dials.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        Ok(Arc::new((self.factory)(endpoint)?))
    }
}
