//! Connection pool behavior over real HTTP.

use ledger_client::rpc::{ConnectionPool, Endpoint, HttpDialer, RpcError, RpcTimeouts};
use std::sync::Arc;
use std::time::{Duration, Instant};

mod common;

fn pool_for(endpoint: Endpoint) -> ConnectionPool {
    ConnectionPool::new(Arc::new(HttpDialer::new(RpcTimeouts::default())), endpoint)
}

#[test]
fn test_concurrent_default_connect_creates_one_handle() {
    let node = common::start_mock_node();
    let pool = pool_for(node.endpoint());

    let handles: Vec<_> = std::thread::scope(|s| {
        let workers: Vec<_> = (0..32).map(|_| s.spawn(|| pool.default_connect())).collect();
        workers
            .into_iter()
            .map(|w| w.join().unwrap().unwrap())
            .collect()
    });

    assert_eq!(pool.dial_count(), 1);
    assert!(handles.iter().all(|h| Arc::ptr_eq(h, &handles[0])));

    let price: u64 = handles[0].call("uni_gasPrice", vec![]).unwrap();
    assert_eq!(price, 10_000_000_000);
}

#[test]
fn test_concurrent_calls_share_a_handle() {
    let node = common::start_mock_node();
    node.set_nonce("alice", 3);
    let pool = pool_for(node.endpoint());
    let rpc = pool.default_connect().unwrap();

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| assert_eq!(rpc.get_nonce("alice").unwrap(), 3));
        }
    });
    assert_eq!(node.request_count(), 8);
}

#[test]
fn test_deadline_expiry_leaves_handle_usable() {
    let node = common::start_mock_node();
    let pool = pool_for(node.endpoint());
    let rpc = pool.default_connect().unwrap();

    node.set_delay(Some(Duration::from_millis(500)));
    let deadline = Instant::now() + Duration::from_millis(50);
    let err = rpc
        .call_with_deadline::<u64>("uni_gasPrice", vec![], deadline)
        .unwrap_err();
    assert!(matches!(err, RpcError::Transport(_)), "{:?}", err);

    node.set_delay(None);
    let price: u64 = rpc.call("uni_gasPrice", vec![]).unwrap();
    assert_eq!(price, 10_000_000_000);
    assert_eq!(pool.dial_count(), 1);
}

#[test]
fn test_distant_deadline_still_honors_request_timeout() {
    let node = common::start_mock_node();
    let pool = ConnectionPool::new(
        Arc::new(HttpDialer::new(RpcTimeouts {
            connect: Duration::from_secs(1),
            request: Duration::from_millis(300),
        })),
        node.endpoint(),
    );
    let rpc = pool.default_connect().unwrap();

    node.set_delay(Some(Duration::from_secs(2)));
    let started = Instant::now();
    let err = rpc
        .call_with_deadline::<u64>("uni_gasPrice", vec![], started + Duration::from_secs(60))
        .unwrap_err();
    assert!(err.is_transport(), "{:?}", err);
    assert!(started.elapsed() < Duration::from_millis(1500));
}

#[test]
fn test_unknown_method_is_remote_error() {
    let node = common::start_mock_node();
    let pool = pool_for(node.endpoint());

    let err = pool
        .default_connect()
        .unwrap()
        .call::<u64>("dpos_epoch", vec![serde_json::json!(10)])
        .unwrap_err();
    assert!(matches!(err, RpcError::Remote { code: -32601, .. }));
}

#[test]
fn test_unreachable_node_is_transport_error() {
    // Grab a free port, then release it so nothing listens there.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let pool = ConnectionPool::new(
        Arc::new(HttpDialer::new(RpcTimeouts {
            connect: Duration::from_millis(500),
            request: Duration::from_secs(2),
        })),
        Endpoint::new("127.0.0.1", port),
    );

    let rpc = pool.default_connect().unwrap();
    let err = rpc.get_nonce("alice").unwrap_err();
    assert!(err.is_transport(), "{:?}", err);
}

#[test]
fn test_close_redials() {
    let node = common::start_mock_node();
    let pool = pool_for(node.endpoint());

    let first = pool.default_connect().unwrap();
    pool.close();
    let second = pool.connect(&node.endpoint()).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(pool.dial_count(), 2);
}
