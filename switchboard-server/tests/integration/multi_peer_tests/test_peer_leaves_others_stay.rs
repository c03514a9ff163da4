use serde_json::json;
use switchboard_server::RelayStats;

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_peer_leaves_others_stay() {
    init_tracing();

    let service = create_test_relay();
    let mut leaver = TestPeer::connect(&service).await.unwrap();
    let mut stayer1 = TestPeer::connect(&service).await.unwrap();
    let mut stayer2 = TestPeer::connect(&service).await.unwrap();

    leaver.join("alpha").await.unwrap();
    stayer1.join("alpha").await.unwrap();
    stayer2.join("alpha").await.unwrap();

    leaver.leave().await.unwrap();

    let notice = json!({ "type": "peer-disconnected", "peerId": leaver.peer_id.to_string() });
    assert_eq!(stayer1.drain().await.unwrap(), vec![notice.clone()]);
    assert_eq!(stayer2.drain().await.unwrap(), vec![notice]);

    // Remaining members keep talking; the leaver no longer hears them.
    stayer1
        .send(json!({ "type": "message", "message": "still here" }))
        .await
        .unwrap();
    assert_eq!(stayer2.recv().await.unwrap()["message"], "still here");
    leaver.expect_nothing().await.unwrap();

    // Leaving again is a no-op; rejoining elsewhere works.
    leaver.leave().await.unwrap();
    assert!(leaver.join("beta").await.unwrap().is_empty());
    stayer1.expect_nothing().await.unwrap();

    assert_eq!(
        service.stats().await.unwrap(),
        RelayStats { peers: 3, rooms: 2 }
    );
}
