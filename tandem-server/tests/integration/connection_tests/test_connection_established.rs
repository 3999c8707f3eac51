use crate::integration::{create_test_relay, init_tracing};
use crate::utils::TestClient;

#[tokio::test]
async fn test_connection_established() {
    init_tracing();

    let (relay, _task) = create_test_relay();

    // TestClient::connect checks the greeting carries the assigned id
    let a = TestClient::connect(&relay).await.unwrap();
    let b = TestClient::connect(&relay).await.unwrap();
    assert_ne!(a.id, b.id);

    assert_eq!(relay.stats().await.unwrap().connection_count, 2);

    a.disconnect().await.unwrap();
    assert_eq!(relay.stats().await.unwrap().connection_count, 1);
}
