use clap::Parser;
use server::config::ServerConfig;
use server::{Clock, Dispatcher, InProcessTransport, RoomDirectory, SystemClock};
use std::sync::Arc;
use std::time::Duration;

/// Ticks the stale-room sweeper on `config.stale_sweep_interval` until the
/// process is asked to shut down (§5 "Stale rooms").
async fn run_sweeper(directory: Arc<RoomDirectory>, interval: Duration, max_idle: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        let now = SystemClock.now_ms();
        let evicted = directory.sweep_stale(now, max_idle.as_millis() as i64);
        if !evicted.is_empty() {
            log::info!(target: "server::sweeper", "evicted {} stale room(s): {:?}", evicted.len(), evicted);
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let config = ServerConfig::parse();

    let catalog = Arc::new(engine::Catalog::standard());
    let directory = Arc::new(RoomDirectory::new());
    let transport = Arc::new(InProcessTransport::new());
    let clock = Arc::new(SystemClock);
    let codes = Arc::new(server::rng::ThreadRngCodeSource);

    let _dispatcher = Dispatcher::new(directory.clone(), catalog, clock, transport, codes);

    log::info!(target: "server::main", "listening on {} (sweep every {:?}, max idle {:?})", config.bind, config.stale_sweep_interval, config.stale_room_max_idle);

    let sweeper = tokio::spawn(run_sweeper(directory, config.stale_sweep_interval, config.stale_room_max_idle));

    // The concrete network listener (WebSocket or otherwise) feeds inbound
    // bytes to `_dispatcher.dispatch(...)` and is supplied by whatever
    // deployment wires a real `Transport` in place of `InProcessTransport`;
    // this binary just demonstrates the wiring and keeps the sweeper alive.
    tokio::signal::ctrl_c().await.expect("listening for ctrl-c");
    sweeper.abort();
}
