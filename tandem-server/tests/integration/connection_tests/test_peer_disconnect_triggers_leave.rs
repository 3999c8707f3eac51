use serde_json::json;
use tandem_core::ServerMessage;

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::TestClient;

#[tokio::test]
async fn test_peer_disconnect_triggers_leave() {
    init_tracing();

    let (relay, _task) = create_test_relay();
    let mut x = TestClient::connect(&relay).await.unwrap();
    let mut y = TestClient::connect(&relay).await.unwrap();

    x.join("r1").await.unwrap();
    y.join("r1").await.unwrap();
    x.recv().await.unwrap(); // user-joined
    x.recv().await.unwrap(); // room-ready

    let y_id = y.id;
    y.disconnect().await.unwrap();

    assert_eq!(
        x.recv().await.unwrap(),
        ServerMessage::UserLeft {
            user_id: y_id,
            participant_count: 1,
        }
    );

    let stats = relay.stats().await.unwrap();
    assert_eq!(stats.room_count, 1, "room survives with one occupant");
    assert_eq!(stats.connection_count, 1);

    // repeated disconnect of the same id is harmless
    relay.disconnect(y_id).await.unwrap();
    x.expect_silence().await.unwrap();

    // offers now go nowhere and produce no error
    x.send(json!({"type": "offer", "roomId": "r1", "offer": {"sdp": "late"}}))
        .await
        .unwrap();
    x.expect_silence().await.unwrap();

    x.disconnect().await.unwrap();
    let stats = relay.stats().await.unwrap();
    assert_eq!(stats.room_count, 0);
    assert_eq!(stats.connection_count, 0);
}
