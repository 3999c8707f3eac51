use std::time::Duration;

use tandem_core::ServerMessage;
use tandem_server::{Outbound, RelayConfig};

use crate::integration::{create_test_relay_with, init_tracing};
use crate::utils::TestClient;

#[tokio::test(start_paused = true)]
async fn test_probes_do_not_evict_by_default() {
    init_tracing();

    let (relay, _task) = create_test_relay_with(RelayConfig::default(), None);
    let mut x = TestClient::connect(&relay).await.unwrap();

    for _ in 0..3 {
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(x.recv_outbound().await.unwrap(), Outbound::Probe);
    }

    assert_eq!(relay.stats().await.unwrap().connection_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_unresponsive_peer_is_evicted() {
    init_tracing();

    let config = RelayConfig {
        probe_interval: Duration::from_secs(10),
        max_missed_probes: Some(1),
        ..RelayConfig::default()
    };
    let (relay, _task) = create_test_relay_with(config, None);

    let mut x = TestClient::connect(&relay).await.unwrap();
    let mut y = TestClient::connect(&relay).await.unwrap();
    x.join("r1").await.unwrap();
    y.join("r1").await.unwrap();

    // first round: both probed, only y answers
    tokio::time::sleep(Duration::from_secs(15)).await;
    y.answer_probe().await.unwrap();

    // second round: x is over budget
    tokio::time::sleep(Duration::from_secs(10)).await;

    x.wait_for_close().await.unwrap();

    let x_id = x.id;
    let mut left = None;
    while left.is_none() {
        if let ServerMessage::UserLeft {
            user_id,
            participant_count,
        } = y.recv().await.unwrap()
        {
            left = Some((user_id, participant_count));
        }
    }
    assert_eq!(left, Some((x_id, 1)));

    let stats = relay.stats().await.unwrap();
    assert_eq!(stats.connection_count, 1);
    assert_eq!(stats.room_count, 1);
}
