use serde_json::json;
use switchboard_core::PeerId;
use switchboard_server::{RelayConfig, RelayStats};

use crate::integration::init_tracing;
use crate::utils::{WsClient, spawn_server};

#[tokio::test]
async fn test_oversized_frame_closes_connection() {
    init_tracing();

    let config = RelayConfig {
        max_message_bytes: 256,
        ..RelayConfig::default()
    };
    let (addr, service) = spawn_server(config).await.expect("Failed to start server");

    let mut a = WsClient::connect(addr).await.expect("A failed to connect");
    let mut b = WsClient::connect(addr).await.expect("B failed to connect");

    a.send(json!({ "type": "join", "roomId": "alpha" })).await.unwrap();
    a.recv().await.unwrap();
    b.send(json!({ "type": "join", "roomId": "alpha" })).await.unwrap();
    b.recv().await.unwrap();

    b.send(json!({ "type": "message", "message": "hi" })).await.unwrap();
    let b_id: PeerId = a.recv().await.unwrap()["sender"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    b.send(json!({ "type": "message", "message": "x".repeat(1024) }))
        .await
        .unwrap();

    // The oversized frame is never relayed; B is dropped instead.
    assert_eq!(
        a.recv().await.unwrap(),
        json!({ "type": "peer-disconnected", "peerId": b_id.to_string() })
    );
    assert!(b.recv().await.is_err());
    assert_eq!(
        service.stats().await.unwrap(),
        RelayStats { peers: 1, rooms: 1 }
    );

    a.close().await.unwrap();
}
