use serde_json::json;
use tandem_core::{RoomId, ServerMessage};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::TestClient;

#[tokio::test]
async fn test_room_recreated_after_empty() {
    init_tracing();

    let (relay, _task) = create_test_relay();
    let mut x = TestClient::connect(&relay).await.unwrap();
    let mut y = TestClient::connect(&relay).await.unwrap();

    x.join("r1").await.unwrap();
    y.join("r1").await.unwrap();

    y.disconnect().await.unwrap();
    x.send(json!({"type": "leave-room", "roomId": "r1"}))
        .await
        .unwrap();

    let stats = relay.stats().await.unwrap();
    assert_eq!(stats.room_count, 0);
    assert_eq!(stats.connection_count, 1);

    let mut z = TestClient::connect(&relay).await.unwrap();
    assert_eq!(
        z.join("r1").await.unwrap(),
        ServerMessage::RoomJoined {
            room_id: RoomId::parse("r1").unwrap(),
            participant_count: 1,
        }
    );
}
