use serde_json::json;
use switchboard_core::PeerId;
use switchboard_server::{RelayConfig, RelayStats};

use crate::integration::init_tracing;
use crate::utils::{WsClient, spawn_server};

#[tokio::test]
async fn test_queue_overflow_closes_connection() {
    init_tracing();

    let config = RelayConfig {
        max_queued_bytes: 120,
        ..RelayConfig::default()
    };
    let (addr, service) = spawn_server(config).await.expect("Failed to start server");

    let mut a = WsClient::connect(addr).await.expect("A failed to connect");
    let mut b = WsClient::connect(addr).await.expect("B failed to connect");

    a.send(json!({ "type": "join", "roomId": "alpha" })).await.unwrap();
    assert_eq!(a.recv().await.unwrap()["peers"], json!([]));

    b.send(json!({ "type": "join", "roomId": "alpha" })).await.unwrap();
    let reply = b.recv().await.unwrap();
    let a_id: PeerId = reply["peers"][0].as_str().unwrap().parse().unwrap();

    b.send(json!({ "type": "message", "message": "hi" })).await.unwrap();
    let hello = a.recv().await.unwrap();
    let b_id: PeerId = hello["sender"].as_str().unwrap().parse().unwrap();
    assert_ne!(a_id, b_id);

    // Larger than B's whole queue budget.
    a.send(json!({ "type": "message", "message": "x".repeat(200) }))
        .await
        .unwrap();

    assert_eq!(b.expect_close().await.unwrap(), 1008);
    assert_eq!(
        a.recv().await.unwrap(),
        json!({ "type": "peer-disconnected", "peerId": b_id.to_string() })
    );
    assert_eq!(
        service.stats().await.unwrap(),
        RelayStats { peers: 1, rooms: 1 }
    );

    // The sender's own connection is untouched.
    let mut c = WsClient::connect(addr).await.expect("C failed to connect");
    c.send(json!({ "type": "join", "roomId": "alpha" })).await.unwrap();
    assert_eq!(
        c.recv().await.unwrap(),
        json!({ "type": "peers", "peers": [a_id.to_string()] })
    );

    a.close().await.unwrap();
    c.close().await.unwrap();
}
