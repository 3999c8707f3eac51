use tandem_core::{RoomId, ServerMessage};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::TestClient;

#[tokio::test]
async fn test_single_peer_joins_room() {
    init_tracing();

    let (relay, _task) = create_test_relay();
    let mut x = TestClient::connect(&relay).await.expect("connect failed");

    let reply = x.join("r1").await.expect("no join reply");
    assert_eq!(
        reply,
        ServerMessage::RoomJoined {
            room_id: RoomId::parse("r1").unwrap(),
            participant_count: 1,
        }
    );

    // nothing else is sent to a lone occupant
    x.expect_silence().await.expect("unexpected message");

    let stats = relay.stats().await.unwrap();
    assert_eq!(stats.connection_count, 1);
    assert_eq!(stats.room_count, 1);
}
