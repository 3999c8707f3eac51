use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tandem::server::{RelayConfig, User};

#[derive(Parser, Debug)]
#[command(name = "tandem-relay", version, about = "Two-party WebRTC signaling relay")]
pub struct Cli {
    /// Address to listen on.
    #[arg(long, env = "TANDEM_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(short, long, env = "TANDEM_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Seconds between keepalive probes.
    #[arg(
        long,
        env = "TANDEM_PING_INTERVAL_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub ping_interval_secs: u64,

    /// Disconnect after this many unanswered probes. Unset: never.
    #[arg(
        long,
        env = "TANDEM_MAX_MISSED_PROBES",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_missed_probes: Option<u32>,

    /// Capacity of the relay command queue.
    #[arg(long, env = "TANDEM_COMMAND_BUFFER", default_value_t = 1024)]
    pub command_buffer: usize,

    /// Enable `auth` against an in-memory directory seeded with ID[=NAME].
    #[arg(long = "user", value_name = "ID[=NAME]", value_parser = parse_user)]
    pub users: Vec<User>,
}

impl Cli {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            probe_interval: Duration::from_secs(self.ping_interval_secs),
            max_missed_probes: self.max_missed_probes,
            command_buffer: self.command_buffer,
        }
    }
}

fn parse_user(raw: &str) -> Result<User, String> {
    let (id, display_name) = match raw.split_once('=') {
        Some((id, name)) => (id.trim(), Some(name.trim().to_string())),
        None => (raw.trim(), None),
    };

    if id.is_empty() {
        return Err("user id must not be empty".to_string());
    }

    Ok(User {
        id: id.to_string(),
        display_name: display_name.filter(|n| !n.is_empty()),
    })
}
