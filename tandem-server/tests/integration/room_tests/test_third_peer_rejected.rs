use serde_json::json;
use tandem_core::ServerMessage;

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::TestClient;

#[tokio::test]
async fn test_third_peer_rejected() {
    init_tracing();

    let (relay, _task) = create_test_relay();
    let mut x = TestClient::connect(&relay).await.unwrap();
    let mut y = TestClient::connect(&relay).await.unwrap();
    let mut z = TestClient::connect(&relay).await.unwrap();

    x.join("r1").await.unwrap();
    y.join("r1").await.unwrap();
    x.recv().await.unwrap(); // user-joined
    x.recv().await.unwrap(); // room-ready
    y.recv().await.unwrap(); // room-ready

    match z.join("r1").await.unwrap() {
        ServerMessage::Error { message } => assert!(message.contains("full"), "{}", message),
        other => panic!("Expected error, got {:?}", other),
    }

    x.expect_silence().await.unwrap();
    y.expect_silence().await.unwrap();

    // membership unchanged: x and y can still talk
    x.send(json!({"type": "offer", "roomId": "r1", "offer": {"sdp": "o"}}))
        .await
        .unwrap();
    assert_eq!(
        y.recv().await.unwrap(),
        ServerMessage::Offer {
            offer: json!({"sdp": "o"}),
            from_user_id: x.id,
        }
    );

    let stats = relay.stats().await.unwrap();
    assert_eq!(stats.room_count, 1);
    assert_eq!(stats.connection_count, 3);
}
