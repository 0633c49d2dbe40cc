//! CLI debug client for the Joblink realtime presence server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin joblink-client
//! cargo run --bin joblink-client -- --url ws://127.0.0.1:8080/ws --project 42
//! ```

use clap::Parser;
use joblink_client::session::{Command, run_client_session};
use joblink_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "joblink-client")]
#[command(about = "CLI debug client for the realtime presence server", long_about = None)]
struct Args {
    /// WebSocket URL of the realtime server
    #[arg(short, long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Project room to join right after connecting
    #[arg(long, conflicts_with = "freelancer")]
    project: Option<String>,

    /// Freelancer room to join right after connecting
    #[arg(long, conflicts_with = "project")]
    freelancer: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let initial_command = match (args.project, args.freelancer) {
        (Some(project_id), _) => Some(Command::JoinProject(project_id)),
        (_, Some(freelancer_id)) => Some(Command::JoinFreelancer(freelancer_id)),
        _ => None,
    };

    if let Err(e) = run_client_session(&args.url, initial_command).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
