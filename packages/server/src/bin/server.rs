//! Realtime presence server for the Joblink marketplace.
//!
//! Tracks which clients are viewing each project/freelancer detail page and
//! broadcasts live viewer counts and stat updates to the rooms involved.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin joblink-server
//! cargo run --bin joblink-server -- --host 0.0.0.0 --port 9092
//! ```

use std::sync::Arc;

use clap::Parser;
use joblink_server::{
    infrastructure::{
        broadcaster::RoomBroadcaster, counter::InMemoryViewerCounter,
        message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry,
        stats::InMemoryStatsRepository,
    },
    ui::Server,
    usecase::{
        ConnectViewerUseCase, DisconnectViewerUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        NotifyDomainEventUseCase,
    },
};
use joblink_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "joblink-server")]
#[command(about = "Realtime presence and stats broadcast server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry / Counter / MessagePusher / Stats repository
    // 2. Broadcaster
    // 3. UseCases
    // 4. Server

    // 1. Create the in-memory components
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let viewer_counter = Arc::new(InMemoryViewerCounter::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let stats_repository = Arc::new(InMemoryStatsRepository::new());

    // 2. Create the RoomBroadcaster
    let broadcaster = Arc::new(RoomBroadcaster::new(
        registry.clone(),
        message_pusher.clone(),
    ));

    // 3. Create UseCases
    let connect_viewer_usecase = Arc::new(ConnectViewerUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        broadcaster.clone(),
        Arc::new(SystemClock),
    ));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        registry.clone(),
        viewer_counter.clone(),
        broadcaster.clone(),
        stats_repository.clone(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
        registry.clone(),
        viewer_counter.clone(),
        broadcaster.clone(),
    ));
    let disconnect_viewer_usecase = Arc::new(DisconnectViewerUseCase::new(
        registry.clone(),
        viewer_counter.clone(),
        broadcaster.clone(),
        message_pusher.clone(),
    ));
    let notify_domain_event_usecase = Arc::new(NotifyDomainEventUseCase::new(
        broadcaster.clone(),
        stats_repository.clone(),
    ));

    // 4. Create and run the server
    let server = Server::new(
        connect_viewer_usecase,
        join_room_usecase,
        leave_room_usecase,
        disconnect_viewer_usecase,
        notify_domain_event_usecase,
        registry,
        viewer_counter,
        stats_repository,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
