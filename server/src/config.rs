//! The bundled binary's command-line configuration (§10.3 ambient addition),
//! grounded on the teacher's top-level `CommandLineArgs` (`motors/src/main.rs`)
//! — a single `clap::Parser` struct parsed once in `main` and threaded down
//! rather than read from globals scattered through the codebase.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "fairy-server", about = "Authoritative room server for a point-budgeted fairy-chess variant")]
pub struct ServerConfig {
    /// Address the transport layer binds to.
    #[arg(long, default_value = "127.0.0.1:7878")]
    pub bind: SocketAddr,

    /// How often the stale-room sweeper runs (§5).
    #[arg(long, value_parser = parse_secs, default_value = "300")]
    pub stale_sweep_interval: Duration,

    /// How long an `ended` room may sit idle before the sweeper evicts it.
    #[arg(long, value_parser = parse_secs, default_value = "3600")]
    pub stale_room_max_idle: Duration,

    /// Default disconnect grace period before a mid-game disconnect is
    /// scored as a timeout loss (§4.10).
    #[arg(long, value_parser = parse_secs, default_value = "60")]
    pub disconnect_grace: Duration,

    /// Default room-code-generation countdown before drafting starts (§4.10).
    #[arg(long, value_parser = parse_secs, default_value = "3")]
    pub countdown_duration: Duration,

    /// Default draft reveal pause before placement starts (§4.10).
    #[arg(long, value_parser = parse_secs, default_value = "3")]
    pub reveal_duration: Duration,
}

fn parse_secs(raw: &str) -> Result<Duration, std::num::ParseIntError> {
    raw.parse::<u64>().map(Duration::from_secs)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:7878".parse().unwrap(),
            stale_sweep_interval: Duration::from_secs(300),
            stale_room_max_idle: Duration::from_secs(3600),
            disconnect_grace: Duration::from_secs(60),
            countdown_duration: Duration::from_secs(3),
            reveal_duration: Duration::from_secs(3),
        }
    }
}
