use serde_json::json;
use switchboard_server::RelayConfig;

use crate::integration::init_tracing;
use crate::utils::{WsClient, spawn_server};

#[tokio::test]
async fn test_binary_frames_are_relayed() {
    init_tracing();

    let (addr, _service) = spawn_server(RelayConfig::default())
        .await
        .expect("Failed to start server");

    let mut a = WsClient::connect(addr).await.expect("A failed to connect");
    let mut b = WsClient::connect(addr).await.expect("B failed to connect");

    a.send_binary(json!({ "type": "join", "roomId": "alpha" }))
        .await
        .unwrap();
    assert_eq!(
        a.recv().await.unwrap(),
        json!({ "type": "peers", "peers": [] })
    );

    b.send(json!({ "type": "join", "roomId": "alpha" })).await.unwrap();
    b.recv().await.unwrap();

    // Not UTF-8: skipped, connection stays up.
    b.send_bytes(vec![0xff, 0xfe, 0x00]).await.unwrap();

    b.send_binary(json!({ "type": "message", "message": "over binary" }))
        .await
        .unwrap();

    let relayed = a.recv().await.unwrap();
    assert_eq!(relayed["type"], "message");
    assert_eq!(relayed["message"], "over binary");
    assert!(relayed["sender"].is_string());

    a.close().await.unwrap();
    b.close().await.unwrap();
}
