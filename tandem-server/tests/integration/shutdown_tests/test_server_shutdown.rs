use tandem_core::ServerMessage;
use tandem_server::{RelayError, SHUTDOWN_MESSAGE};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::TestClient;

#[tokio::test]
async fn test_server_shutdown() {
    init_tracing();

    let (relay, task) = create_test_relay();
    let mut x = TestClient::connect(&relay).await.unwrap();
    let mut y = TestClient::connect(&relay).await.unwrap();
    x.join("r1").await.unwrap();
    y.join("r1").await.unwrap();

    relay.shutdown().await.expect("shutdown failed");
    task.await.expect("relay task panicked");

    for client in [&mut x, &mut y] {
        let seen = client.wait_for_close().await.unwrap();
        assert_eq!(
            seen.last(),
            Some(&ServerMessage::ServerShutdown {
                message: SHUTDOWN_MESSAGE.to_string(),
            })
        );
    }

    assert_eq!(relay.stats().await, Err(RelayError::ServiceUnavailable));
    assert!(relay.connect().await.is_err());
}
