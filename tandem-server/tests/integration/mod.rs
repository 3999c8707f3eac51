pub mod messaging_tests;
pub mod room_tests;
pub mod shutdown_tests;

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::Level;

use tandem_server::{RelayConfig, RelayHandle, RelayService, UserDirectory};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn create_test_relay() -> (RelayHandle, JoinHandle<()>) {
    create_test_relay_with(RelayConfig::default(), None)
}

pub fn create_test_relay_with(
    config: RelayConfig,
    directory: Option<Arc<dyn UserDirectory>>,
) -> (RelayHandle, JoinHandle<()>) {
    RelayService::spawn(config, directory)
}
