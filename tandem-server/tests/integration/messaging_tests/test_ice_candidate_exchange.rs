use serde_json::json;
use tandem_core::ServerMessage;

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::TestClient;

#[tokio::test]
async fn test_ice_candidate_exchange() {
    init_tracing();

    let (relay, _task) = create_test_relay();
    let mut x = TestClient::connect(&relay).await.unwrap();
    let mut y = TestClient::connect(&relay).await.unwrap();

    x.join("r1").await.unwrap();

    // candidates racing ahead of the peer's join are dropped without error
    x.send(json!({"type": "ice-candidate", "roomId": "r1", "candidate": {"candidate": "early"}}))
        .await
        .unwrap();
    x.expect_silence().await.unwrap();

    y.join("r1").await.unwrap();
    y.recv().await.unwrap(); // room-ready
    x.recv().await.unwrap(); // user-joined
    x.recv().await.unwrap(); // room-ready

    let candidates = ["c1", "c2", "c3"];
    for c in candidates {
        y.send(json!({"type": "ice-candidate", "candidate": {"candidate": c}}))
            .await
            .unwrap();
    }

    for c in candidates {
        assert_eq!(
            x.recv().await.unwrap(),
            ServerMessage::IceCandidate {
                candidate: json!({"candidate": c}),
                from_user_id: y.id,
            }
        );
    }
    y.expect_silence().await.unwrap();
}
