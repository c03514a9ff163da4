use serde_json::json;
use switchboard_server::RelayStats;

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_peer_disconnect_notifies_room() {
    init_tracing();

    let service = create_test_relay();
    let mut p = TestPeer::connect(&service).await.unwrap();
    let mut q = TestPeer::connect(&service).await.unwrap();
    let mut s = TestPeer::connect(&service).await.unwrap();

    p.join("alpha").await.unwrap();
    q.join("alpha").await.unwrap();
    s.join("alpha").await.unwrap();

    let departed = p.peer_id.clone();
    p.disconnect().await.unwrap();

    let expected = json!({ "type": "peer-disconnected", "peerId": departed.to_string() });
    assert_eq!(q.drain().await.unwrap(), vec![expected.clone()]);
    assert_eq!(s.drain().await.unwrap(), vec![expected]);

    assert_eq!(
        service.stats().await.unwrap(),
        RelayStats { peers: 2, rooms: 1 }
    );
}

#[tokio::test]
async fn test_sole_member_disconnect_removes_room() {
    init_tracing();

    let service = create_test_relay();
    let mut lonely = TestPeer::connect(&service).await.unwrap();
    let mut elsewhere = TestPeer::connect(&service).await.unwrap();

    lonely.join("alpha").await.unwrap();
    elsewhere.join("beta").await.unwrap();

    lonely.disconnect().await.unwrap();

    elsewhere.expect_nothing().await.unwrap();
    assert_eq!(
        service.stats().await.unwrap(),
        RelayStats { peers: 1, rooms: 1 }
    );
}

#[tokio::test]
async fn test_disconnect_before_join() {
    init_tracing();

    let service = create_test_relay();
    let mut member = TestPeer::connect(&service).await.unwrap();
    member.join("alpha").await.unwrap();

    let drifter = TestPeer::connect(&service).await.unwrap();
    drifter.disconnect().await.unwrap();

    member.expect_nothing().await.unwrap();
    assert_eq!(
        service.stats().await.unwrap(),
        RelayStats { peers: 1, rooms: 1 }
    );
}
